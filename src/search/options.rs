use serde_json::Value;
use std::{collections::HashMap, fmt, sync::Arc};

use super::config::SelectOptions;
use crate::errors::SearchError;

/// Zero-argument producer of select options.
pub type OptionSource = Arc<dyn Fn() -> SelectOptions + Send + Sync>;

/// Parsed form of an option reference string, holding the registry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionReference {
    /// `Namespace::method()`, registered as `Namespace::method`
    Method(String),
    /// `Namespace::$field`, registered as `Namespace::field`
    Field(String),
}

impl OptionReference {
    #[must_use]
    pub fn parse(reference: &str) -> Option<Self> {
        if let Some(path) = reference.strip_suffix("()")
            && let Some((namespace, method)) = path.split_once("::")
            && !namespace.is_empty()
            && !method.is_empty()
        {
            return Some(Self::Method(format!("{namespace}::{method}")));
        }

        if let Some((namespace, field)) = reference.split_once("::$")
            && !namespace.is_empty()
            && !field.is_empty()
        {
            return Some(Self::Field(format!("{namespace}::{field}")));
        }

        None
    }
}

/// Named option sources that search configs can reference by string.
///
/// ```rust,ignore
/// let registry = OptionRegistry::new()
///     .method("Article::statuses", || statuses_from_db())
///     .field("Article::categories", categories);
///
/// // "Article::statuses()" and "Article::$categories" now resolve
/// ```
#[derive(Clone, Default)]
pub struct OptionRegistry {
    methods: HashMap<String, OptionSource>,
    fields: HashMap<String, OptionSource>,
}

impl OptionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer called on every `Namespace::name()` resolution
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, source: F) -> Self
    where
        F: Fn() -> SelectOptions + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(source));
        self
    }

    /// Register a fixed value read by `Namespace::$name`
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, options: SelectOptions) -> Self {
        self.fields
            .insert(name.into(), Arc::new(move || options.clone()));
        self
    }

    /// Register a field whose current value is read through a getter
    #[must_use]
    pub fn field_with<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn() -> SelectOptions + Send + Sync + 'static,
    {
        self.fields.insert(name.into(), Arc::new(getter));
        self
    }

    /// Resolve a textual option reference.
    ///
    /// # Errors
    /// Returns `SearchError::Config` when the reference matches neither grammar
    /// or nothing is registered under its name.
    pub fn resolve(&self, reference: &str) -> Result<SelectOptions, SearchError> {
        let parsed = OptionReference::parse(reference).ok_or_else(|| {
            SearchError::Config(format!("could not parse option reference: {reference}"))
        })?;

        let source = match &parsed {
            OptionReference::Method(name) => self.methods.get(name),
            OptionReference::Field(name) => self.fields.get(name),
        };
        let source = source.ok_or_else(|| {
            SearchError::Config(format!("no option source registered for {reference}"))
        })?;

        tracing::debug!(reference, "Resolved select options");
        Ok(source())
    }
}

impl fmt::Debug for OptionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<_> = self.methods.keys().collect();
        let mut fields: Vec<_> = self.fields.keys().collect();
        methods.sort();
        fields.sort();
        f.debug_struct("OptionRegistry")
            .field("methods", &methods)
            .field("fields", &fields)
            .finish()
    }
}

/// Objects are used as-is, lists become index-keyed maps.
pub(crate) fn value_to_options(value: Value) -> Option<SelectOptions> {
    match value {
        Value::Object(map) => Some(map),
        Value::Array(items) => Some(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect(),
        ),
        _ => None,
    }
}
