use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Query parameters of a searchable list endpoint.
///
/// # Searching
/// The `query` parameter carries a JSON-encoded list of
/// `[fieldIndex, comparison, input]` triples, where `fieldIndex` is the
/// position of a field in the resource's search config:
/// ```json
/// [[0, "%*%", "rust"], [2, ">=", "2024-01-01"]]
/// ```
/// Leaving it out (or sending it empty) disables searching.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// JSON-encoded filter expression.
    ///
    /// Comparisons: `%*%` contains, `*%` starts with, `%*` ends with,
    /// `!%*%` does not contain, or a plain SQL operator such as `=` or `>=`.
    #[param(example = r#"[[0,"%*%","rust"]]"#)]
    pub query: Option<String>,
}

impl SearchParams {
    /// The raw filter expression, if the client sent one
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}
