use serde_json::Value;

use super::config::{FieldOptions, FieldQuery, FieldType, SearchConfig, SelectOptions};
use super::options::value_to_options;
use crate::errors::SearchError;

/// Shorthand value that expands into the locale select menu.
pub const LOCALE_MARKER: &str = "locale";

/// Key of a raw search config entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawKey {
    /// Explicit field key
    Named(String),
    /// List position: the entry's value names the field
    Positional(usize),
}

/// Value of a raw search config entry before normalisation.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry<Q> {
    /// A bare string: the `locale` marker, a field type under a named key,
    /// or a text field name under a positional key
    Shorthand(String),
    Descriptor(RawDescriptor<Q>),
}

/// Partially specified field descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDescriptor<Q> {
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub options: Option<FieldOptions>,
    pub column: Option<String>,
    pub query: FieldQuery<Q>,
}

impl<Q> Default for RawDescriptor<Q> {
    fn default() -> Self {
        Self {
            field_type: None,
            label: None,
            options: None,
            column: None,
            query: FieldQuery::Default,
        }
    }
}

impl<Q> RawDescriptor<Q> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field_type(mut self, field_type: impl Into<FieldType>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn options(mut self, options: SelectOptions) -> Self {
        self.options = Some(FieldOptions::Map(options));
        self
    }

    /// Options resolved at normalisation time, e.g. `Article::statuses()` or `Article::$statuses`
    #[must_use]
    pub fn options_from(mut self, reference: impl Into<String>) -> Self {
        self.options = Some(FieldOptions::Reference(reference.into()));
        self
    }

    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    #[must_use]
    pub fn query<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut Q, &str, &str) -> Result<(), SearchError> + Send + Sync + 'static,
    {
        self.query = FieldQuery::custom(callback);
        self
    }

    fn from_json(key: &str, object: &serde_json::Map<String, Value>) -> Result<Self, SearchError> {
        let string_attr = |name: &str| -> Result<Option<String>, SearchError> {
            match object.get(name) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(other) => Err(SearchError::Config(format!(
                    "'{name}' of search field '{key}' must be a string, got {other}"
                ))),
            }
        };

        let options = match object.get("options") {
            None | Some(Value::Null) => None,
            Some(Value::String(reference)) => Some(FieldOptions::Reference(reference.clone())),
            Some(value) => {
                let options = value_to_options(value.clone()).ok_or_else(|| {
                    SearchError::Config(format!(
                        "options of search field '{key}' must be a map, list or reference"
                    ))
                })?;
                Some(FieldOptions::Map(options))
            }
        };

        Ok(Self {
            field_type: string_attr("type")?.map(FieldType::from),
            label: string_attr("label")?,
            options,
            column: string_attr("column")?,
            query: FieldQuery::Default,
        })
    }
}

/// Ordered, possibly shorthand search config as written by the application.
///
/// ```rust,ignore
/// let raw = RawSearchConfig::new()
///     .text("title")                        // {"title": {type: text, label: Title}}
///     .typed("status", "select")            // {"status": {type: select, label: Status}}
///     .locale()                             // {"locale": {type: select, options: site locales}}
///     .field("author", RawDescriptor::new().column("users.name"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawSearchConfig<Q> {
    entries: Vec<(RawKey, RawEntry<Q>)>,
}

impl<Q> Default for RawSearchConfig<Q> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<Q> RawSearchConfig<Q> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry as-is
    #[must_use]
    pub fn entry(mut self, key: RawKey, entry: RawEntry<Q>) -> Self {
        self.entries.push((key, entry));
        self
    }

    /// Positional shorthand: a text field named `name`
    #[must_use]
    pub fn text(self, name: impl Into<String>) -> Self {
        let position = self.entries.len();
        self.entry(RawKey::Positional(position), RawEntry::Shorthand(name.into()))
    }

    /// Named shorthand: `key` with an explicit field type
    #[must_use]
    pub fn typed(self, key: impl Into<String>, field_type: impl Into<String>) -> Self {
        self.entry(RawKey::Named(key.into()), RawEntry::Shorthand(field_type.into()))
    }

    /// The locale select menu
    #[must_use]
    pub fn locale(self) -> Self {
        self.text(LOCALE_MARKER)
    }

    #[must_use]
    pub fn field(self, key: impl Into<String>, descriptor: RawDescriptor<Q>) -> Self {
        self.entry(RawKey::Named(key.into()), RawEntry::Descriptor(descriptor))
    }

    pub fn entries(&self) -> &[(RawKey, RawEntry<Q>)] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a config written as JSON.
    ///
    /// An array is a list of positional shorthands. An object maps keys to
    /// shorthand strings or descriptor objects; all-digit keys are positional.
    ///
    /// # Errors
    /// Returns `SearchError::Config` for any other shape.
    pub fn from_json(value: &Value) -> Result<Self, SearchError> {
        let mut raw = Self::new();
        match value {
            Value::Array(items) => {
                for (position, item) in items.iter().enumerate() {
                    let entry = Self::entry_from_json(&position.to_string(), item)?;
                    raw = raw.entry(RawKey::Positional(position), entry);
                }
            }
            Value::Object(object) => {
                for (key, item) in object {
                    let raw_key = match key.parse::<usize>() {
                        Ok(position) if key.bytes().all(|b| b.is_ascii_digit()) => {
                            RawKey::Positional(position)
                        }
                        _ => RawKey::Named(key.clone()),
                    };
                    let entry = Self::entry_from_json(key, item)?;
                    raw = raw.entry(raw_key, entry);
                }
            }
            other => {
                return Err(SearchError::Config(format!(
                    "search config must be a JSON object or array, got {other}"
                )));
            }
        }
        Ok(raw)
    }

    fn entry_from_json(key: &str, item: &Value) -> Result<RawEntry<Q>, SearchError> {
        match item {
            Value::String(s) => Ok(RawEntry::Shorthand(s.clone())),
            Value::Object(object) => Ok(RawEntry::Descriptor(RawDescriptor::from_json(
                key, object,
            )?)),
            other => Err(SearchError::Config(format!(
                "search field '{key}' must be a string or an object, got {other}"
            ))),
        }
    }
}

impl<Q> IntoIterator for RawSearchConfig<Q> {
    type Item = (RawKey, RawEntry<Q>);
    type IntoIter = std::vec::IntoIter<(RawKey, RawEntry<Q>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Turn a normalised config back into (longhand) raw entries.
impl<Q> From<SearchConfig<Q>> for RawSearchConfig<Q> {
    fn from(config: SearchConfig<Q>) -> Self {
        config.into_iter().fold(Self::new(), |raw, field| {
            let descriptor = RawDescriptor {
                field_type: Some(field.field_type),
                label: Some(field.label),
                options: field.options,
                column: field.column,
                query: field.query,
            };
            raw.field(field.key, descriptor)
        })
    }
}
