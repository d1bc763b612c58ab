//! DOM boundary of the controller.
//!
//! The controller never touches the document directly; it drives one
//! formset container through this trait. The browser implementation
//! (`sortable-formset-zoon`) re-queries its own subtree on every call,
//! so callbacks resumed after an await never act through stale row
//! references. Tests use an in-memory double.

/// One formset container's DOM surface.
///
/// `Row` is an opaque handle to a table row; implementations may hand
/// out live element references or plain ids.
pub trait FormsetDom {
    type Row: Clone;

    /// Currently visible formset rows, in DOM order. Soft-deleted
    /// (hidden) rows are excluded.
    fn visible_rows(&self) -> Vec<Self::Row>;

    /// Stored form index of a row (`data-form-index`).
    fn form_index(&self, row: &Self::Row) -> Option<usize>;
    fn set_form_index(&mut self, row: &Self::Row, index: usize);

    /// 1-based ordinal shown in the row's place cell.
    fn set_place_label(&mut self, row: &Self::Row, place: usize);
    /// Value of the row's hidden `ORDER` field, if it has one.
    fn set_order_value(&mut self, row: &Self::Row, order: usize);

    /// `name` attribute of the row's first input/select/textarea.
    fn first_field_name(&self, row: &Self::Row) -> Option<String>;

    /// Rewrites `old_prefix` to `new_prefix` in every field `name` and
    /// `id`, every `label[for]`, and the delete control's stored index.
    /// Attribute values are rewritten in place, never rebuilt.
    fn reindex_row(
        &mut self,
        row: &Self::Row,
        old_prefix: &str,
        new_prefix: &str,
        new_index: usize,
    );

    /// Current value of the management `TOTAL_FORMS` input.
    fn total_forms(&self) -> usize;
    fn set_total_forms(&mut self, count: usize);

    /// Markup of the hidden empty-form template, with the
    /// `__prefix__` index token still in place.
    fn template_html(&self) -> Option<String>;
    /// Appends row markup to the row-holding element.
    fn append_row(&mut self, html: &str);

    /// Whether the row carries a server-side `DELETE` marker field.
    fn has_delete_marker(&self, row: &Self::Row) -> bool;
    /// Soft delete: checks the marker field and hides the row, keeping
    /// it in the submitted form data.
    fn mark_deleted(&mut self, row: &Self::Row);
    /// Hard delete: removes a never-persisted row outright.
    fn remove_row(&mut self, row: &Self::Row);

    /// Field name/value pairs identifying the row to the server, for
    /// the delete notification.
    fn identifying_fields(&self, row: &Self::Row) -> Vec<(String, String)>;
    /// Placeholder/virtual entries never trigger delete notifications.
    fn is_placeholder(&self, row: &Self::Row) -> bool;

    /// Hides or restores the whole container during the
    /// replace-then-delete sequence.
    fn set_container_hidden(&mut self, hidden: bool);

    /// Hook fired after a row is appended so rich-select widgets on the
    /// new fields can initialize.
    fn enhance_last_row(&mut self);

    /// Blocking user-facing warning.
    fn alert(&mut self, message: &str);
}
