use serde::{Serialize, Serializer, ser::SerializeMap};
use std::{fmt, sync::Arc};

use crate::errors::SearchError;

/// Options of a select field, in display order.
pub type SelectOptions = serde_json::Map<String, serde_json::Value>;

/// App-supplied handler that replaces the default comparison grammar for one field.
///
/// Called with the query, the raw comparison operator and the raw input.
pub type QueryCallback<Q> =
    Arc<dyn Fn(&mut Q, &str, &str) -> Result<(), SearchError> + Send + Sync>;

/// Kind of input the search UI renders for a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "String")]
pub enum FieldType {
    #[default]
    Text,
    Select,
    Other(String),
}

impl FieldType {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Select => "select",
            Self::Other(name) => name.as_str(),
        }
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name {
            "text" => Self::Text,
            "select" => Self::Select,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options attached to a field: either a concrete map or a reference resolved
/// through an [`OptionRegistry`](super::OptionRegistry) at normalisation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldOptions {
    Map(SelectOptions),
    Reference(String),
}

/// How conditions on a field are turned into query clauses.
pub enum FieldQuery<Q> {
    /// The built-in comparison grammar (`=`, `%*%`, `!%*%`, ...)
    Default,
    /// An app-supplied callback with full control over the query
    Custom(QueryCallback<Q>),
}

impl<Q> FieldQuery<Q> {
    /// Wrap a closure as a custom field query
    pub fn custom<F>(callback: F) -> Self
    where
        F: Fn(&mut Q, &str, &str) -> Result<(), SearchError> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(callback))
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl<Q> Default for FieldQuery<Q> {
    fn default() -> Self {
        Self::Default
    }
}

impl<Q> Clone for FieldQuery<Q> {
    fn clone(&self) -> Self {
        match self {
            Self::Default => Self::Default,
            Self::Custom(callback) => Self::Custom(Arc::clone(callback)),
        }
    }
}

/// Callbacks compare by identity.
impl<Q> PartialEq for FieldQuery<Q> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Default, Self::Default) => true,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<Q> fmt::Debug for FieldQuery<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A fully explicit searchable field.
pub struct FieldDescriptor<Q> {
    pub key: String,
    pub field_type: FieldType,
    pub label: String,
    pub options: Option<FieldOptions>,
    /// Underlying column when it differs from `key`. May be table-qualified.
    pub column: Option<String>,
    pub query: FieldQuery<Q>,
}

impl<Q> FieldDescriptor<Q> {
    pub fn new(key: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field_type,
            label: label.into(),
            options: None,
            column: None,
            query: FieldQuery::Default,
        }
    }

    /// The column conditions on this field are applied to
    #[must_use]
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.key)
    }

    /// Resolved select options, if any
    #[must_use]
    pub fn select_options(&self) -> Option<&SelectOptions> {
        match &self.options {
            Some(FieldOptions::Map(options)) => Some(options),
            _ => None,
        }
    }
}

// Manual impls: derives would demand the same traits of the query type.
impl<Q> Clone for FieldDescriptor<Q> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            field_type: self.field_type.clone(),
            label: self.label.clone(),
            options: self.options.clone(),
            column: self.column.clone(),
            query: self.query.clone(),
        }
    }
}

impl<Q> PartialEq for FieldDescriptor<Q> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.field_type == other.field_type
            && self.label == other.label
            && self.options == other.options
            && self.column == other.column
            && self.query == other.query
    }
}

impl<Q> fmt::Debug for FieldDescriptor<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("field_type", &self.field_type)
            .field("label", &self.label)
            .field("options", &self.options)
            .field("column", &self.column)
            .field("query", &self.query)
            .finish()
    }
}

impl<Q> Serialize for FieldDescriptor<Q> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.options.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", &self.field_type)?;
        map.serialize_entry("label", &self.label)?;
        if let Some(options) = &self.options {
            map.serialize_entry("options", options)?;
        }
        map.end()
    }
}

/// The normalised, ordered search config of one resource.
///
/// Clients reference fields by their position in this config, so insertion
/// order is significant and preserved.
pub struct SearchConfig<Q> {
    fields: Vec<FieldDescriptor<Q>>,
}

impl<Q> Clone for SearchConfig<Q> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<Q> PartialEq for SearchConfig<Q> {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl<Q> fmt::Debug for SearchConfig<Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

impl<Q> Default for SearchConfig<Q> {
    fn default() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<Q> SearchConfig<Q> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. An existing key is replaced in its original position.
    pub fn insert(&mut self, descriptor: FieldDescriptor<Q>) {
        match self.fields.iter_mut().find(|f| f.key == descriptor.key) {
            Some(existing) => *existing = descriptor,
            None => self.fields.push(descriptor),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldDescriptor<Q>> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Field at a client-visible position
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&FieldDescriptor<Q>> {
        self.fields.get(index)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor<Q>> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Attach a custom query callback to an existing field.
    ///
    /// # Errors
    /// Returns `SearchError::Config` if the config has no such field.
    pub fn with_query<F>(mut self, key: &str, callback: F) -> Result<Self, SearchError>
    where
        F: Fn(&mut Q, &str, &str) -> Result<(), SearchError> + Send + Sync + 'static,
    {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.key == key)
            .ok_or_else(|| SearchError::Config(format!("no searchable field named '{key}'")))?;
        field.query = FieldQuery::custom(callback);
        Ok(self)
    }
}

impl<'a, Q> IntoIterator for &'a SearchConfig<Q> {
    type Item = &'a FieldDescriptor<Q>;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor<Q>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<Q> IntoIterator for SearchConfig<Q> {
    type Item = FieldDescriptor<Q>;
    type IntoIter = std::vec::IntoIter<FieldDescriptor<Q>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Rendered for the search UI as an ordered `key -> {type, label, options}` object.
impl<Q> Serialize for SearchConfig<Q> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for field in &self.fields {
            map.serialize_entry(&field.key, field)?;
        }
        map.end()
    }
}
