//! The formset controller: one instance per container, owning every
//! structural mutation of its row set.
//!
//! All DOM work is synchronous; the only suspension points are the
//! add-row fetch and the awaited add inside the replace-then-delete
//! sequence. Renumbering always completes before an operation settles,
//! so the DOM is consistent whenever control returns to the event loop.

use ulid::Ulid;

use crate::config::FormsetConfig;
use crate::dom::FormsetDom;
use crate::error::FormsetError;
use crate::naming::{self, FieldName};
use crate::net::{FormsetNet, NewRowRequest, RowDeleteNotice};

pub struct FormsetController<D: FormsetDom, N: FormsetNet> {
    instance: Ulid,
    config: FormsetConfig,
    dom: D,
    net: N,
}

impl<D: FormsetDom, N: FormsetNet> FormsetController<D, N> {
    /// Builds the controller and normalizes the initial row ordering.
    pub fn new(config: FormsetConfig, dom: D, net: N) -> Self {
        let mut controller = Self {
            instance: Ulid::new(),
            config,
            dom,
            net,
        };
        controller.resequence();
        controller
    }

    /// Instance id, for log and event correlation.
    pub fn instance(&self) -> Ulid {
        self.instance
    }

    pub fn config(&self) -> &FormsetConfig {
        &self.config
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Renumbers every visible row to its current position.
    ///
    /// Runs after every structural change and when a drag reorder
    /// settles. For each visible row in DOM order: the place label and
    /// `ORDER` value become position+1, and if the stored form index
    /// differs from the position, every indexed attribute is rewritten
    /// from `prefix-old-` to `prefix-new-`. A row with no fields keeps
    /// its ordinal updates but is not renumbered.
    pub fn resequence(&mut self) {
        for (position, row) in self.dom.visible_rows().into_iter().enumerate() {
            self.dom.set_place_label(&row, position + 1);
            self.dom.set_order_value(&row, position + 1);

            let Some(current_index) = self.dom.form_index(&row) else {
                continue;
            };
            if current_index == position {
                continue;
            }
            let Some(first_field_name) = self.dom.first_field_name(&row) else {
                continue;
            };
            let step_prefix = naming::step_prefix_of(&first_field_name);
            let old_prefix = FieldName::index_prefix(step_prefix, current_index);
            let new_prefix = FieldName::index_prefix(step_prefix, position);
            self.dom.reindex_row(&row, &old_prefix, &new_prefix, position);
            self.dom.set_form_index(&row, position);
        }
    }

    /// Adds one row, via the configured AJAX endpoint or the hidden
    /// empty-form template. Until the fetch resolves the row set is
    /// unchanged; a failed fetch inserts nothing.
    pub async fn add_row(&mut self) -> Result<(), FormsetError> {
        let visible_count = self.dom.visible_rows().len();
        if visible_count >= self.config.max_forms {
            self.dom.alert("Maximum number of forms reached");
            return Err(FormsetError::MaxFormsReached {
                max_forms: self.config.max_forms,
            });
        }

        let form_index = self.dom.total_forms();
        let html = match self.config.ajax_url.clone() {
            Some(url) => {
                let request = NewRowRequest {
                    url,
                    form_index,
                    form_type: self.config.form_type.clone(),
                    has_ghost_points: self.config.has_ghost_points,
                    item_name: self.config.item_name.clone(),
                };
                match self.net.fetch_row(request).await {
                    Ok(html) => html,
                    Err(error) => {
                        self.dom.alert("Error adding new form");
                        return Err(FormsetError::AddRowFetch(error));
                    }
                }
            }
            None => match self.dom.template_html() {
                Some(template) => naming::instantiate_template(&template, form_index),
                None => {
                    self.dom.alert("No empty form template found");
                    return Err(FormsetError::MissingTemplate);
                }
            },
        };

        self.dom.append_row(&html);
        self.dom.set_total_forms(form_index + 1);
        self.dom.enhance_last_row();
        self.resequence();
        Ok(())
    }

    /// Deletes one row. The last visible row is never deleted outright:
    /// a replacement is added first (with the container hidden while
    /// the swap is in flight), so the formset never becomes empty. If
    /// the replacement add fails, the deletion is abandoned and the
    /// formset is left untouched.
    pub async fn delete_row(&mut self, row: D::Row) -> Result<(), FormsetError> {
        let visible_count = self.dom.visible_rows().len();
        if visible_count <= 1 {
            self.dom.set_container_hidden(true);
            if let Err(error) = self.add_row().await {
                self.dom.set_container_hidden(false);
                return Err(error);
            }
            self.finish_delete(&row, true);
            self.dom.set_container_hidden(false);
        } else {
            self.finish_delete(&row, false);
        }
        Ok(())
    }

    /// Deletion proper: soft delete when the row carries a `DELETE`
    /// marker field (the server still needs the row in the submitted
    /// data), hard delete otherwise. `replaced_last` skips the
    /// management-count update so the replacement row just added is not
    /// counted against the deletion.
    fn finish_delete(&mut self, row: &D::Row, replaced_last: bool) {
        // Identifying values must be captured before the row leaves the DOM.
        let notice = self.delete_notice(row);

        if self.dom.has_delete_marker(row) {
            self.dom.mark_deleted(row);
        } else {
            self.dom.remove_row(row);
        }

        if let Some(notice) = notice {
            self.net.notify_row_deleted(notice);
        }

        if !replaced_last {
            let visible_count = self.dom.visible_rows().len();
            self.dom.set_total_forms(visible_count);
        }
        self.resequence();
    }

    /// The opportunistic cleanup notification, when this form type has
    /// an endpoint and the row identifies a real record: every key
    /// field non-empty and the row not marked as a placeholder.
    fn delete_notice(&self, row: &D::Row) -> Option<RowDeleteNotice> {
        let endpoint = self.config.delete_notify_url.clone()?;
        if self.dom.is_placeholder(row) {
            return None;
        }
        let fields = self.dom.identifying_fields(row);
        if fields.is_empty() || fields.iter().any(|(_, value)| value.trim().is_empty()) {
            return None;
        }
        Some(RowDeleteNotice { endpoint, fields })
    }
}
