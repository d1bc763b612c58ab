//! Field naming convention of the server-side form wizard.
//!
//! Every field in a formset row is named `<stepPrefix>-<formIndex>-<fieldName>`
//! (e.g. `3-0-first_name` for the first debater-creation row). The step
//! prefix is opaque to the client and must survive renumbering verbatim;
//! only the form index changes.

use serde::{Deserialize, Serialize};

/// Placeholder token in the hidden empty-form template, substituted with
/// the next form index when a row is added from the template.
pub const EMPTY_FORM_INDEX_TOKEN: &str = "__prefix__";

/// A parsed `<stepPrefix>-<formIndex>-<fieldName>` field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldName {
    pub step_prefix: String,
    pub form_index: usize,
    pub field: String,
}

impl FieldName {
    /// Parses a raw `name` attribute. Returns `None` when the middle
    /// segment is not a number (management fields like `3-TOTAL_FORMS`
    /// or unprefixed inputs).
    pub fn parse(raw: &str) -> Option<Self> {
        let mut segments = raw.splitn(3, '-');
        let step_prefix = segments.next()?;
        let form_index = segments.next()?.parse().ok()?;
        let field = segments.next()?;
        if field.is_empty() {
            return None;
        }
        Some(Self {
            step_prefix: step_prefix.to_string(),
            form_index,
            field: field.to_string(),
        })
    }

    /// The `prefix-index-` token identifying one row's fields, as used
    /// for prefix-replacement renumbering.
    pub fn index_prefix(step_prefix: &str, form_index: usize) -> String {
        format!("{step_prefix}-{form_index}-")
    }
}

/// Text before the first `-` of a field name. Falls back to the whole
/// name for unprefixed inputs.
pub fn step_prefix_of(raw_name: &str) -> &str {
    raw_name.split('-').next().unwrap_or(raw_name)
}

/// Rewrites one attribute value from `old_prefix` to `new_prefix`.
///
/// Replaces the first occurrence only; the rest of the value (including
/// a field name that happens to contain digits) stays untouched.
pub fn reindex_attr(value: &str, old_prefix: &str, new_prefix: &str) -> String {
    value.replacen(old_prefix, new_prefix, 1)
}

/// Instantiates the empty-form template for `form_index`, substituting
/// every `__prefix__` token.
pub fn instantiate_template(template_html: &str, form_index: usize) -> String {
    template_html.replace(EMPTY_FORM_INDEX_TOKEN, &form_index.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_row_field_name() {
        let name = FieldName::parse("3-2-first_name").unwrap();
        assert_eq!(name.step_prefix, "3");
        assert_eq!(name.form_index, 2);
        assert_eq!(name.field, "first_name");
    }

    #[test]
    fn parse_keeps_dashes_inside_field_name() {
        let name = FieldName::parse("2-0-school-name").unwrap();
        assert_eq!(name.field, "school-name");
    }

    #[test]
    fn parse_rejects_management_fields() {
        assert_eq!(FieldName::parse("3-TOTAL_FORMS"), None);
        assert_eq!(FieldName::parse("csrfmiddlewaretoken"), None);
    }

    #[test]
    fn reindex_replaces_first_occurrence_only() {
        assert_eq!(reindex_attr("2-2-first_name", "2-2-", "2-0-"), "2-0-first_name");
        // A value containing the token twice keeps the later occurrence.
        assert_eq!(reindex_attr("id_5-1-5-1-x", "5-1-", "5-0-"), "id_5-0-5-1-x");
    }

    #[test]
    fn template_substitution_replaces_every_token() {
        let template = r#"<input name="3-__prefix__-first_name" id="id_3-__prefix__-first_name">"#;
        let html = instantiate_template(template, 4);
        assert_eq!(html, r#"<input name="3-4-first_name" id="id_3-4-first_name">"#);
    }

    #[test]
    fn step_prefix_of_unprefixed_name() {
        assert_eq!(step_prefix_of("ORDER"), "ORDER");
        assert_eq!(step_prefix_of("4-0-ORDER"), "4");
    }
}
