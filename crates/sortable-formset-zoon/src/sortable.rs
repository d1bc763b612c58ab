//! Drag reordering of formset rows.
//!
//! The capability is injected at mount time behind [`DragDriver`], so a
//! page can swap in a different implementation (or none at all in
//! tests) instead of the controller polling for a library to appear.
//! [`Html5Drag`] is the built-in implementation: native HTML5 drag
//! events, with dragging armed only from the row's `.drag-handle`
//! region. `on_settle` fires once per completed reorder; the mount
//! layer routes it into the controller's resequencing pass.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Element, Event, HtmlElement};

use crate::dom::ROW_SELECTOR;

/// Selector of the grab region inside each row.
pub const DRAG_HANDLE_SELECTOR: &str = ".drag-handle";

/// Keeps the drag listeners alive; dropping it detaches nothing but
/// releases the closures, so hold it for the page lifetime.
pub struct DragGuard {
    _closures: Vec<Closure<dyn FnMut(Event)>>,
}

pub trait DragDriver {
    /// Enables drag reordering on `tbody`'s rows.
    fn enable(&self, tbody: &Element, on_settle: Rc<dyn Fn()>) -> DragGuard;
}

/// Native HTML5 drag-and-drop row reordering.
#[derive(Clone, Copy, Default)]
pub struct Html5Drag;

impl Html5Drag {
    pub fn new() -> Self {
        Self
    }
}

fn closest_row(event: &Event) -> Option<Element> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    target.closest(ROW_SELECTOR).ok().flatten()
}

fn listen(
    tbody: &Element,
    event_name: &str,
    handler: impl FnMut(Event) + 'static,
) -> Closure<dyn FnMut(Event)> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let _ = tbody.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
    closure
}

impl DragDriver for Html5Drag {
    fn enable(&self, tbody: &Element, on_settle: Rc<dyn Fn()>) -> DragGuard {
        let dragging: Rc<RefCell<Option<Element>>> = Rc::new(RefCell::new(None));
        let mut closures = Vec::new();

        // Rows become draggable only while the pointer is on the handle,
        // so text selection inside the fields keeps working.
        closures.push(listen(tbody, "mousedown", |event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if target.closest(DRAG_HANDLE_SELECTOR).ok().flatten().is_none() {
                return;
            }
            if let Some(row) = target
                .closest(ROW_SELECTOR)
                .ok()
                .flatten()
                .and_then(|row| row.dyn_into::<HtmlElement>().ok())
            {
                row.set_draggable(true);
            }
        }));

        closures.push(listen(tbody, "dragstart", {
            let dragging = dragging.clone();
            move |event| {
                let Some(row) = closest_row(&event) else {
                    return;
                };
                if let Some(drag_event) = event.dyn_ref::<DragEvent>() {
                    if let Some(transfer) = drag_event.data_transfer() {
                        transfer.set_effect_allowed("move");
                        // Firefox refuses to start a drag without payload.
                        let _ = transfer.set_data("text/plain", "formset-row");
                    }
                }
                *dragging.borrow_mut() = Some(row);
            }
        }));

        closures.push(listen(tbody, "dragover", {
            let dragging = dragging.clone();
            let tbody = tbody.clone();
            move |event| {
                event.prevent_default();
                let source = dragging.borrow().clone();
                let Some(source) = source else { return };
                let Some(target) = closest_row(&event) else {
                    return;
                };
                if target == source {
                    return;
                }
                let Some(drag_event) = event.dyn_ref::<DragEvent>() else {
                    return;
                };
                let rect = target.get_bounding_client_rect();
                let before = f64::from(drag_event.client_y()) < rect.top() + rect.height() / 2.0;
                let anchor: Option<web_sys::Node> = if before {
                    Some(target.into())
                } else {
                    target.next_sibling()
                };
                let _ = tbody.insert_before(&source, anchor.as_ref());
            }
        }));

        closures.push(listen(tbody, "drop", |event| {
            event.prevent_default();
        }));

        closures.push(listen(tbody, "dragend", {
            let dragging = dragging.clone();
            move |_event| {
                if let Some(row) = dragging.borrow_mut().take() {
                    if let Some(row) = row.dyn_ref::<HtmlElement>() {
                        row.set_draggable(false);
                    }
                    on_settle();
                }
            }
        }));

        DragGuard { _closures: closures }
    }
}
