//! Declarative page wiring.
//!
//! One controller is mounted per element carrying `data-formset-type`;
//! its configuration comes from the element's data attributes. Mounted
//! controllers live in a thread-local registry for the page lifetime
//! (the browser runtime is single-threaded).

use std::cell::RefCell;
use std::rc::Rc;

use sortable_formset::{FormsetConfig, FormsetController};
use ulid::Ulid;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event};
use zoon::Task;

use crate::dom::{document, BrowserDom, ROW_SELECTOR};
use crate::net::BrowserNet;
use crate::sortable::{DragDriver, DragGuard, Html5Drag};

/// Elements carrying this attribute get a controller at mount time.
pub const CONTAINER_SELECTOR: &str = "[data-formset-type]";
/// Add button inside a container.
const ADD_BUTTON_SELECTOR: &str = "[data-formset-add]";
/// Delete control inside a row.
const DELETE_SELECTOR: &str = ".delete-form";

type Controller = FormsetController<BrowserDom, BrowserNet>;

thread_local! {
    static MOUNTED: RefCell<Vec<MountedFormset>> = RefCell::new(Vec::new()); // ALLOWED: page registry
}

/// One mounted formset: the controller plus the listeners keeping it
/// responsive.
pub struct MountedFormset {
    instance: Ulid,
    controller: Rc<RefCell<Controller>>,
    _listeners: Vec<Closure<dyn FnMut(Event)>>,
    _drag: DragGuard,
}

impl MountedFormset {
    pub fn instance(&self) -> Ulid {
        self.instance
    }

    pub fn controller(&self) -> &Rc<RefCell<Controller>> {
        &self.controller
    }
}

/// Reads a formset configuration from a container's data attributes.
pub fn config_from_dataset(container: &Element) -> Option<FormsetConfig> {
    let form_type = container.get_attribute("data-formset-type")?;
    let mut config = FormsetConfig::new(&form_type);
    if let Some(max_forms) = container.get_attribute("data-max-forms") {
        if let Ok(max_forms) = max_forms.trim().parse() {
            config.max_forms = max_forms;
        }
    }
    config.ajax_url = container.get_attribute("data-ajax-url");
    config.has_ghost_points = container
        .get_attribute("data-has-ghost-points")
        .map(|flag| matches!(flag.as_str(), "1" | "true"));
    config.item_name = container.get_attribute("data-item-name");
    config.display_name = container.get_attribute("data-display-name");
    if let Some(url) = container.get_attribute("data-delete-notify-url") {
        config.delete_notify_url = Some(url);
    }
    Some(config)
}

/// Mounts one controller on `container`. Returns `None` when the
/// container declares no form type or holds no row element.
pub fn mount(container: Element, driver: &impl DragDriver) -> Option<MountedFormset> {
    let config = config_from_dataset(&container)?;
    let tbody = BrowserDom::find_row_holder(&container)?;
    let dom = BrowserDom::new(container.clone(), tbody.clone());
    let controller = Rc::new(RefCell::new(FormsetController::new(
        config,
        dom,
        BrowserNet::new(),
    )));
    let instance = controller.borrow().instance();
    let mut listeners = Vec::new();

    if let Ok(Some(add_button)) = container.query_selector(ADD_BUTTON_SELECTOR) {
        let closure = {
            let controller = controller.clone();
            Closure::wrap(Box::new(move |event: Event| {
                event.prevent_default();
                let controller = controller.clone();
                Task::start(async move {
                    // One structural mutation in flight per formset; a
                    // click landing mid-await is dropped, not interleaved.
                    match controller.try_borrow_mut() {
                        Ok(mut controller) => {
                            let _ = controller.add_row().await;
                        }
                        Err(_) => zoon::eprintln!(
                            "[SortableFormset] mutation already in flight, ignoring add"
                        ),
                    }
                });
            }) as Box<dyn FnMut(Event)>)
        };
        let _ =
            add_button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        listeners.push(closure);
    }

    // Delete clicks are delegated so rows added later are covered.
    {
        let closure = {
            let controller = controller.clone();
            Closure::wrap(Box::new(move |event: Event| {
                let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok())
                else {
                    return;
                };
                if target.closest(DELETE_SELECTOR).ok().flatten().is_none() {
                    return;
                }
                event.prevent_default();
                let Some(row) = target.closest(ROW_SELECTOR).ok().flatten() else {
                    return;
                };
                let controller = controller.clone();
                Task::start(async move {
                    match controller.try_borrow_mut() {
                        Ok(mut controller) => {
                            let _ = controller.delete_row(row).await;
                        }
                        Err(_) => zoon::eprintln!(
                            "[SortableFormset] mutation already in flight, ignoring delete"
                        ),
                    }
                });
            }) as Box<dyn FnMut(Event)>)
        };
        let _ = tbody.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        listeners.push(closure);
    }

    let drag = driver.enable(&tbody, {
        let controller = controller.clone();
        Rc::new(move || {
            if let Ok(mut controller) = controller.try_borrow_mut() {
                controller.resequence();
            }
        })
    });

    Some(MountedFormset {
        instance,
        controller,
        _listeners: listeners,
        _drag: drag,
    })
}

/// Mounts every declared formset container on the page with the
/// built-in drag driver. Returns the number of mounted formsets.
pub fn mount_all() -> usize {
    mount_all_with(&Html5Drag::new())
}

/// Mounts every declared container with a custom drag capability.
pub fn mount_all_with(driver: &impl DragDriver) -> usize {
    let Ok(containers) = document().query_selector_all(CONTAINER_SELECTOR) else {
        return 0;
    };
    let mut mounted = 0;
    for index in 0..containers.length() {
        let Some(container) = containers
            .item(index)
            .and_then(|node| node.dyn_into::<Element>().ok())
        else {
            continue;
        };
        if let Some(formset) = mount(container, driver) {
            MOUNTED.with(|cell| cell.borrow_mut().push(formset)); // ALLOWED: page registry
            mounted += 1;
        }
    }
    zoon::println!("[SortableFormset] mounted {mounted} formset(s)");
    mounted
}

/// Drops every mounted controller and its listeners.
pub fn unmount_all() {
    MOUNTED.with(|cell| cell.borrow_mut().clear()); // ALLOWED: page registry
}
