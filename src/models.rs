//! Data model for property files
//!
//! A property file is a flat list of `<property>` elements, each holding a
//! `<name>`, an optional `<description>` and a `<value>`.

/// A single configuration entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyRecord {
    /// Unique key within a document (case-sensitive, exact match)
    pub name: String,
    /// Optional human-readable description.
    ///
    /// `None` means the element was absent in the source file and is not
    /// written back. `Some("")` is written as an empty `<description/>`.
    pub description: Option<String>,
    /// Property value
    pub value: String,
    /// Additional leaf children (e.g. `<final>`), kept in document order
    pub extras: Vec<(String, String)>,
}

impl PropertyRecord {
    /// Create a record with an explicit description.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            value: value.into(),
            extras: Vec::new(),
        }
    }

    /// Description text, or an empty string when none is present.
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Look up an extra leaf field by element name.
    pub fn extra(&self, field: &str) -> Option<&str> {
        self.extras.iter().find(|(k, _)| k == field).map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_description() {
        let record = PropertyRecord::new("dfs.replication", "block copies", "3");
        assert_eq!(record.name, "dfs.replication");
        assert_eq!(record.description.as_deref(), Some("block copies"));
        assert_eq!(record.value, "3");
        assert!(record.extras.is_empty());
    }

    #[test]
    fn test_description_text_defaults_to_empty() {
        let record = PropertyRecord { name: "a".to_string(), ..Default::default() };
        assert_eq!(record.description_text(), "");
    }

    #[test]
    fn test_extra_lookup() {
        let mut record = PropertyRecord::new("a", "", "1");
        record.extras.push(("final".to_string(), "true".to_string()));
        assert_eq!(record.extra("final"), Some("true"));
        assert_eq!(record.extra("source"), None);
    }
}
