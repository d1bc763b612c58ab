use crate::net::FetchRowError;

/// Failures of the add/delete operations. Every variant leaves the
/// formset fully renumbered and unchanged apart from the user-facing
/// alert already raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormsetError {
    /// The visible-row count already reached the configured cap.
    MaxFormsReached { max_forms: usize },
    /// Template strategy selected but no empty-form template exists.
    MissingTemplate,
    /// The add-row fetch failed; no row was inserted.
    AddRowFetch(FetchRowError),
}

impl std::fmt::Display for FormsetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormsetError::MaxFormsReached { max_forms } => {
                write!(f, "maximum number of forms reached ({max_forms})")
            }
            FormsetError::MissingTemplate => write!(f, "no empty form template found"),
            FormsetError::AddRowFetch(error) => write!(f, "add-row fetch failed: {error}"),
        }
    }
}

impl std::error::Error for FormsetError {}
