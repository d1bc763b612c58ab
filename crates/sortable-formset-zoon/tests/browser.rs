//! Browser-side checks against a real document.
//!
//! Run with `wasm-pack test --headless --firefox crates/sortable-formset-zoon`.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use sortable_formset::dom::FormsetDom;
use sortable_formset::net::{FetchRowError, FormsetNet, NewRowRequest, RowDeleteNotice};
use sortable_formset::{FormsetConfig, FormsetController};
use sortable_formset_zoon::mount::config_from_dataset;
use sortable_formset_zoon::BrowserDom;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Default)]
struct StubNet {
    notices: Rc<RefCell<Vec<RowDeleteNotice>>>,
}

impl FormsetNet for StubNet {
    async fn fetch_row(&self, _request: NewRowRequest) -> Result<String, FetchRowError> {
        Err(FetchRowError::Transport("no network in tests".to_string()))
    }

    fn notify_row_deleted(&self, notice: RowDeleteNotice) {
        self.notices.borrow_mut().push(notice);
    }
}

fn row_html(form_index: usize) -> String {
    format!(
        concat!(
            r#"<tr class="formset-row" data-form-index="{index}"><td class="drag-handle">"#,
            r#"<span class="place-display"></span></td>"#,
            r#"<td><input name="3-{index}-first_name" id="id_3-{index}-first_name" value="D{index}">"#,
            r#"<input name="3-{index}-last_name" id="id_3-{index}-last_name" value="L{index}">"#,
            r#"<input type="hidden" name="3-{index}-ORDER"></td>"#,
            r#"<td><button class="delete-form" data-form-index="{index}"></button></td></tr>"#,
        ),
        index = form_index,
    )
}

fn install_formset(row_count: usize) -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let body = document.body().unwrap();
    let rows: String = (0..row_count).map(row_html).collect();
    body.set_inner_html(&format!(
        concat!(
            r#"<form><input type="hidden" name="3-TOTAL_FORMS" value="{count}">"#,
            // A <tr> only survives innerHTML parsing inside a table, so
            // the hidden template is a detached tbody.
            r#"<table style="display: none"><tbody class="empty-form">"#,
            r#"<tr class="formset-row" data-form-index="__prefix__"><td class="drag-handle">"#,
            r#"<span class="place-display"></span></td>"#,
            r#"<td><input name="3-__prefix__-first_name" id="id_3-__prefix__-first_name">"#,
            r#"<input name="3-__prefix__-last_name" id="id_3-__prefix__-last_name">"#,
            r#"<input type="hidden" name="3-__prefix__-ORDER"></td>"#,
            r#"<td><button class="delete-form" data-form-index="__prefix__"></button></td></tr>"#,
            r#"</tbody></table>"#,
            r#"<div data-formset-type="debater" data-max-forms="8">"#,
            r#"<table><tbody class="sortable-formset">{rows}</tbody></table>"#,
            r#"</div></form>"#,
        ),
        count = row_count,
        rows = rows,
    ));
    document
        .query_selector("[data-formset-type]")
        .unwrap()
        .unwrap()
}

fn controller_for(
    container: &Element,
) -> FormsetController<BrowserDom, StubNet> {
    let tbody = BrowserDom::find_row_holder(container).unwrap();
    let dom = BrowserDom::new(container.clone(), tbody);
    FormsetController::new(FormsetConfig::new("debater"), dom, StubNet::default())
}

#[wasm_bindgen_test]
fn dataset_config_is_read_from_the_container() {
    let container = install_formset(1);
    let config = config_from_dataset(&container).unwrap();
    assert_eq!(config.form_type, "debater");
    assert_eq!(config.max_forms, 8);
    assert_eq!(config.ajax_url, None);
    assert_eq!(
        config.delete_notify_url.as_deref(),
        Some("/core/debaters/delete")
    );
}

#[wasm_bindgen_test]
async fn template_add_appends_and_renumbers_real_rows() {
    let container = install_formset(2);
    let mut controller = controller_for(&container);

    controller.add_row().await.unwrap();

    let dom = controller.dom();
    let rows = dom.visible_rows();
    assert_eq!(rows.len(), 3);
    assert_eq!(
        dom.first_field_name(&rows[2]).as_deref(),
        Some("3-2-first_name")
    );
    assert_eq!(dom.total_forms(), 3);
}

#[wasm_bindgen_test]
async fn deleting_a_middle_row_renumbers_and_updates_the_count() {
    let container = install_formset(3);
    let mut controller = controller_for(&container);
    let middle = controller.dom().visible_rows()[1].clone();

    controller.delete_row(middle).await.unwrap();

    let dom = controller.dom();
    let rows = dom.visible_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(dom.total_forms(), 2);
    assert_eq!(
        dom.first_field_name(&rows[1]).as_deref(),
        Some("3-1-first_name")
    );
    // The surviving row kept its values through the attribute rewrite.
    let input = rows[1].query_selector("input").unwrap().unwrap();
    let input: web_sys::HtmlInputElement = wasm_bindgen::JsCast::dyn_into(input).unwrap();
    assert_eq!(input.value(), "D2");
}
