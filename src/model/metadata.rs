//! Free-form string metadata attached to test results and test runs.

use std::collections::HashMap;

/// String-to-string metadata map, sent as `data`.
pub type MetaData = HashMap<String, String>;

/// Fluent builder for [`MetaData`].
///
/// Later values overwrite earlier ones for the same key.
#[derive(Debug, Clone, Default)]
pub struct MetaDataBuilder {
    data: MetaData,
}

impl MetaDataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry.
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Adds every entry of `entries`.
    pub fn add_all<K, V, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.data
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn to_meta_data(self) -> MetaData {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overwrites_duplicates() {
        let data = MetaDataBuilder::new()
            .add("key", "first")
            .add("other", "value")
            .add("key", "second")
            .to_meta_data();

        assert_eq!(data.len(), 2);
        assert_eq!(data.get("key").map(String::as_str), Some("second"));
    }

    #[test]
    fn test_builder_add_all() {
        let data = MetaDataBuilder::new()
            .add_all([("a", "1"), ("b", "2")])
            .add("c", "3")
            .to_meta_data();
        assert_eq!(data.len(), 3);
        assert_eq!(data["b"], "2");
    }
}
