use serde_json::Value;
use std::collections::HashMap;

/// Key holding the site's locales, e.g. `{"en": "English", "fr": "French"}`.
pub const LOCALES_KEY: &str = "site.locales";

/// Read access to application-wide settings.
pub trait SiteConfig {
    /// Current value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Dot-separated keys walk nested objects; a literal key containing dots is
/// tried first.
impl SiteConfig for Value {
    fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.as_object().and_then(|object| object.get(key)) {
            return Some(value.clone());
        }
        key.split('.')
            .try_fold(self, |node, segment| node.as_object()?.get(segment))
            .cloned()
    }
}

impl SiteConfig for HashMap<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        HashMap::get(self, key).cloned()
    }
}
