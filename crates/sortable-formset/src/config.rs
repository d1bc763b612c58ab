//! Per-formset configuration, read once from the container element's
//! data attributes at mount time and immutable afterwards.

use serde::{Deserialize, Serialize};

/// Default row cap when the container declares none.
pub const DEFAULT_MAX_FORMS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormsetConfig {
    /// Free-form tag the server uses to pick the formset class
    /// (`"debater"`, `"school"`, `"team"`, `"speaker"`, ...).
    pub form_type: String,
    /// Visible-row cap enforced before any add.
    pub max_forms: usize,
    /// Endpoint returning freshly rendered row markup. When absent, new
    /// rows are cloned from the hidden empty-form template instead.
    pub ajax_url: Option<String>,
    /// Whether add-row requests carry the `has_ghost_points` flag, and
    /// its value. `None` omits the parameter entirely.
    pub has_ghost_points: Option<bool>,
    /// Extra `item_name` parameter for add-row requests.
    pub item_name: Option<String>,
    /// Human-readable name used in page chrome; unused by the state
    /// machine itself.
    pub display_name: Option<String>,
    /// Endpoint for the fire-and-forget delete notification. `None`
    /// disables notifications for this form type.
    pub delete_notify_url: Option<String>,
}

impl FormsetConfig {
    pub fn new(form_type: impl Into<String>) -> Self {
        let form_type = form_type.into();
        let delete_notify_url =
            Self::default_delete_notify_url(&form_type).map(str::to_string);
        Self {
            form_type,
            max_forms: DEFAULT_MAX_FORMS,
            ajax_url: None,
            has_ghost_points: None,
            item_name: None,
            display_name: None,
            delete_notify_url,
        }
    }

    /// Fixed per-type cleanup endpoints. Only debater and school rows
    /// map to standalone records the server can garbage-collect.
    pub fn default_delete_notify_url(form_type: &str) -> Option<&'static str> {
        match form_type {
            "debater" => Some("/core/debaters/delete"),
            "school" => Some("/core/schools/delete"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = FormsetConfig::new("speaker");
        assert_eq!(config.max_forms, DEFAULT_MAX_FORMS);
        assert_eq!(config.ajax_url, None);
        assert_eq!(config.delete_notify_url, None);
    }

    #[test]
    fn serializes_for_diagnostics() {
        let config = FormsetConfig {
            max_forms: 10,
            ajax_url: Some("/core/tournaments/new-form".to_string()),
            ..FormsetConfig::new("debater")
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["form_type"], "debater");
        assert_eq!(json["max_forms"], 10);
        assert_eq!(json["delete_notify_url"], "/core/debaters/delete");
    }

    #[test]
    fn notifiable_types_get_default_endpoints() {
        assert_eq!(
            FormsetConfig::new("debater").delete_notify_url.as_deref(),
            Some("/core/debaters/delete")
        );
        assert_eq!(
            FormsetConfig::new("school").delete_notify_url.as_deref(),
            Some("/core/schools/delete")
        );
    }
}
