//! [`FormsetDom`] over the live document.
//!
//! Every method re-queries the container subtree, so a callback resumed
//! after an await never acts through a stale element list. Row handles
//! are the `<tr>` elements themselves.

use sortable_formset::dom::FormsetDom;
use sortable_formset::naming::{self, FieldName};
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use web_sys::{
    CustomEvent, CustomEventInit, Element, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, NodeList,
};

/// Selector of the row-holding element inside a formset container.
pub const ROW_HOLDER_SELECTOR: &str = ".sortable-formset";
/// Selector of one formset row.
pub const ROW_SELECTOR: &str = "tr.formset-row";
/// Event dispatched on the container after a row is appended, so page
/// enhancers (rich selects etc.) can initialize the new fields.
pub const ROW_ADDED_EVENT: &str = "formset:row-added";

const FIELD_SELECTOR: &str = "input, select, textarea";

pub(crate) fn window() -> web_sys::Window {
    web_sys::window().expect_throw("no window")
}

pub(crate) fn document() -> web_sys::Document {
    window().document().expect_throw("no document")
}

fn elements(list: Option<NodeList>) -> Vec<Element> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn field_value(field: &Element) -> String {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = field.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else if let Some(textarea) = field.dyn_ref::<HtmlTextAreaElement>() {
        textarea.value()
    } else {
        String::new()
    }
}

fn is_visible(element: &Element) -> bool {
    if element.has_attribute("hidden") {
        return false;
    }
    match element.dyn_ref::<HtmlElement>() {
        Some(html) => html.style().get_property_value("display").ok().as_deref() != Some("none"),
        None => true,
    }
}

pub struct BrowserDom {
    container: Element,
    tbody: Element,
}

impl BrowserDom {
    pub fn new(container: Element, tbody: Element) -> Self {
        Self { container, tbody }
    }

    /// Locates the row holder inside a container.
    pub fn find_row_holder(container: &Element) -> Option<Element> {
        container.query_selector(ROW_HOLDER_SELECTOR).ok().flatten()
    }

    pub fn container(&self) -> &Element {
        &self.container
    }

    pub fn tbody(&self) -> &Element {
        &self.tbody
    }

    /// Management inputs and the empty-form template live next to the
    /// formset, inside the enclosing `<form>` when there is one.
    fn scoped(&self, selector: &str) -> Option<Element> {
        if let Ok(Some(form)) = self.container.closest("form") {
            form.query_selector(selector).ok().flatten()
        } else {
            document().query_selector(selector).ok().flatten()
        }
    }

    fn scoped_all(&self, selector: &str) -> Vec<Element> {
        if let Ok(Some(form)) = self.container.closest("form") {
            elements(form.query_selector_all(selector).ok())
        } else {
            elements(document().query_selector_all(selector).ok())
        }
    }

    fn fields(&self, row: &Element) -> Vec<Element> {
        elements(row.query_selector_all(FIELD_SELECTOR).ok())
    }

    /// The `TOTAL_FORMS` input for this formset. When several formsets
    /// share the form, the one matching this formset's step prefix
    /// wins; otherwise the first match is used.
    fn management_input(&self) -> Option<HtmlInputElement> {
        let inputs = self.scoped_all(r#"input[name$="TOTAL_FORMS"]"#);
        let step_prefix = self
            .visible_rows()
            .first()
            .and_then(|row| self.first_field_name(row))
            .map(|name| naming::step_prefix_of(&name).to_string());
        if let Some(prefix) = step_prefix {
            let wanted = format!("{prefix}-TOTAL_FORMS");
            for input in &inputs {
                if input.get_attribute("name").as_deref() == Some(wanted.as_str()) {
                    return input.clone().dyn_into().ok();
                }
            }
        }
        inputs.into_iter().next().and_then(|input| input.dyn_into().ok())
    }
}

impl FormsetDom for BrowserDom {
    type Row = Element;

    fn visible_rows(&self) -> Vec<Element> {
        elements(self.tbody.query_selector_all(ROW_SELECTOR).ok())
            .into_iter()
            .filter(is_visible)
            .collect()
    }

    fn form_index(&self, row: &Element) -> Option<usize> {
        row.get_attribute("data-form-index")?.parse().ok()
    }

    fn set_form_index(&mut self, row: &Element, index: usize) {
        let _ = row.set_attribute("data-form-index", &index.to_string());
    }

    fn set_place_label(&mut self, row: &Element, place: usize) {
        if let Ok(Some(cell)) = row.query_selector(".place-display") {
            cell.set_text_content(Some(&place.to_string()));
        }
    }

    fn set_order_value(&mut self, row: &Element, order: usize) {
        if let Ok(Some(field)) = row.query_selector(r#"input[name*="ORDER"]"#) {
            if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
                input.set_value(&order.to_string());
            }
        }
    }

    fn first_field_name(&self, row: &Element) -> Option<String> {
        self.fields(row)
            .first()
            .and_then(|field| field.get_attribute("name"))
    }

    fn reindex_row(&mut self, row: &Element, old_prefix: &str, new_prefix: &str, new_index: usize) {
        for field in self.fields(row) {
            for attribute in ["name", "id"] {
                if let Some(value) = field.get_attribute(attribute) {
                    let _ = field
                        .set_attribute(attribute, &naming::reindex_attr(&value, old_prefix, new_prefix));
                }
            }
        }
        for label in elements(row.query_selector_all("label").ok()) {
            if let Some(value) = label.get_attribute("for") {
                let _ =
                    label.set_attribute("for", &naming::reindex_attr(&value, old_prefix, new_prefix));
            }
        }
        if let Ok(Some(delete_control)) = row.query_selector(".delete-form") {
            let _ = delete_control.set_attribute("data-form-index", &new_index.to_string());
        }
    }

    fn total_forms(&self) -> usize {
        self.management_input()
            .map(|input| input.value())
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(0)
    }

    fn set_total_forms(&mut self, count: usize) {
        if let Some(input) = self.management_input() {
            input.set_value(&count.to_string());
        }
    }

    fn template_html(&self) -> Option<String> {
        let template = self.scoped(".empty-form")?;
        let html = template.inner_html();
        if html.trim().is_empty() {
            None
        } else {
            Some(html)
        }
    }

    fn append_row(&mut self, html: &str) {
        if let Err(error) = self.tbody.insert_adjacent_html("beforeend", html) {
            zoon::eprintln!("[SortableFormset] failed to append row markup: {error:?}");
        }
    }

    fn has_delete_marker(&self, row: &Element) -> bool {
        matches!(row.query_selector(r#"input[name*="DELETE"]"#), Ok(Some(_)))
    }

    fn mark_deleted(&mut self, row: &Element) {
        if let Ok(Some(marker)) = row.query_selector(r#"input[name*="DELETE"]"#) {
            if let Some(input) = marker.dyn_ref::<HtmlInputElement>() {
                input.set_checked(true);
            }
        }
        if let Some(html) = row.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property("display", "none");
        }
    }

    fn remove_row(&mut self, row: &Element) {
        row.remove();
    }

    fn identifying_fields(&self, row: &Element) -> Vec<(String, String)> {
        self.fields(row)
            .iter()
            .filter_map(|field| {
                let name = FieldName::parse(&field.get_attribute("name")?)?;
                if matches!(name.field.as_str(), "ORDER" | "DELETE" | "id") {
                    return None;
                }
                Some((name.field, field_value(field)))
            })
            .collect()
    }

    fn is_placeholder(&self, row: &Element) -> bool {
        matches!(
            row.get_attribute("data-placeholder").as_deref(),
            Some("1") | Some("true")
        )
    }

    fn set_container_hidden(&mut self, hidden: bool) {
        if let Some(html) = self.container.dyn_ref::<HtmlElement>() {
            let result = if hidden {
                html.style().set_property("display", "none")
            } else {
                html.style().remove_property("display").map(|_| ())
            };
            let _ = result;
        }
    }

    fn enhance_last_row(&mut self) {
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        if let Ok(event) = CustomEvent::new_with_event_init_dict(ROW_ADDED_EVENT, &init) {
            let _ = self.container.dispatch_event(&event);
        }
    }

    fn alert(&mut self, message: &str) {
        let _ = window().alert_with_message(message);
    }
}
