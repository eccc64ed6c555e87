use super::config::{FieldDescriptor, FieldOptions, FieldType, SearchConfig};
use super::labels::title_from_key;
use super::options::{OptionRegistry, value_to_options};
use super::shorthand::{LOCALE_MARKER, RawDescriptor, RawEntry, RawKey, RawSearchConfig};
use super::site::{LOCALES_KEY, SiteConfig};
use crate::errors::SearchError;

/// Expands shorthand search configs into explicit field descriptors.
///
/// Runs once per resource when the application builds its search configs,
/// so every `SearchError::Config` surfaces at startup rather than per request.
pub struct Normalizer<'a> {
    site: &'a dyn SiteConfig,
    options: &'a OptionRegistry,
}

impl<'a> Normalizer<'a> {
    pub fn new(site: &'a dyn SiteConfig, options: &'a OptionRegistry) -> Self {
        Self { site, options }
    }

    /// Make every entry of `raw` explicit, keeping its order.
    ///
    /// Already explicit configs come back unchanged, so
    /// `longhand(longhand(raw).into())` equals `longhand(raw)`.
    ///
    /// # Errors
    /// Returns `SearchError::Config` if an option reference cannot be resolved
    /// or a positional entry is not a field name.
    pub fn longhand<Q>(&self, raw: RawSearchConfig<Q>) -> Result<SearchConfig<Q>, SearchError> {
        let mut search = SearchConfig::new();

        for (key, entry) in raw {
            let descriptor = match (key, entry) {
                (_, RawEntry::Shorthand(value)) if value == LOCALE_MARKER => self.locale_menu(),
                (RawKey::Positional(_), RawEntry::Shorthand(name)) => {
                    let label = title_from_key(&name);
                    FieldDescriptor::new(name, FieldType::Text, label)
                }
                (RawKey::Named(key), RawEntry::Shorthand(field_type)) => {
                    let label = title_from_key(&key);
                    FieldDescriptor::new(key, FieldType::from(field_type), label)
                }
                (RawKey::Named(key), RawEntry::Descriptor(descriptor)) => {
                    self.explicit(key, descriptor)?
                }
                (RawKey::Positional(position), RawEntry::Descriptor(_)) => {
                    return Err(SearchError::Config(format!(
                        "search field at position {position} must be a field name, not a descriptor"
                    )));
                }
            };
            search.insert(descriptor);
        }

        tracing::debug!(fields = search.len(), "Normalised search config");
        Ok(search)
    }

    fn locale_menu<Q>(&self) -> FieldDescriptor<Q> {
        let mut descriptor = FieldDescriptor::new(LOCALE_MARKER, FieldType::Select, "Locale");
        descriptor.options = match self.site.get(LOCALES_KEY).and_then(value_to_options) {
            Some(locales) => Some(FieldOptions::Map(locales)),
            None => {
                tracing::warn!(key = LOCALES_KEY, "Site locales are not configured");
                None
            }
        };
        descriptor
    }

    fn explicit<Q>(
        &self,
        key: String,
        raw: RawDescriptor<Q>,
    ) -> Result<FieldDescriptor<Q>, SearchError> {
        let label = match raw.label {
            Some(label) if !label.is_empty() => label,
            _ => title_from_key(&key),
        };
        let field_type = raw.field_type.unwrap_or_default();

        let options = match raw.options {
            Some(FieldOptions::Reference(reference))
                if field_type == FieldType::Select && !reference.is_empty() =>
            {
                Some(FieldOptions::Map(self.options.resolve(&reference)?))
            }
            options => options,
        };

        Ok(FieldDescriptor {
            key,
            field_type,
            label,
            options,
            column: raw.column,
            query: raw.query,
        })
    }
}
