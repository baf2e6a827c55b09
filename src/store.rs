//! Ordered property storage with upsert semantics
//!
//! Lookups are a linear scan by exact name. Property files are small, and a
//! plain `Vec` keeps document order for serialization without a side index.

use tracing::debug;

use crate::models::PropertyRecord;

/// Outcome of an [`PropertyStore::upsert`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new record was appended
    Created,
    /// An existing record was updated in place
    Updated,
}

/// In-memory view over an ordered sequence of property records.
///
/// [`upsert`] never adds a second record with an existing name. A loaded file
/// may still repeat a name; lookups and updates then act on the first record
/// and later ones are kept as they are.
///
/// [`upsert`]: PropertyStore::upsert
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    records: Vec<PropertyRecord>,
}

impl PropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the first record whose name matches exactly.
    pub fn find(&self, name: &str) -> Option<&PropertyRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Mutable variant of [`find`](PropertyStore::find).
    pub fn find_mut(&mut self, name: &str) -> Option<&mut PropertyRecord> {
        self.records.iter_mut().find(|r| r.name == name)
    }

    /// Update the named record or append a new one.
    ///
    /// The value is always replaced. The description is replaced only when
    /// `description` is non-empty, so an update without one keeps whatever
    /// the record already had.
    pub fn upsert(&mut self, name: &str, description: &str, value: &str) -> Upsert {
        if let Some(record) = self.find_mut(name) {
            if !description.is_empty() {
                record.description = Some(description.to_string());
            }
            record.value = value.to_string();
            debug!(property = name, value, "updated property");
            return Upsert::Updated;
        }

        self.records.push(PropertyRecord::new(name, description, value));
        debug!(property = name, value, "created property");
        Upsert::Created
    }

    /// Append a record without checking for an existing name.
    ///
    /// Used by the document parser to keep records exactly as loaded.
    pub(crate) fn push(&mut self, record: PropertyRecord) {
        self.records.push(record);
    }

    /// Iterate over records in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, PropertyRecord> {
        self.records.iter()
    }

    /// Property names in document order.
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }

    /// Names that occur more than once, each listed once in first-seen order.
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut duplicates = Vec::new();
        for (i, record) in self.records.iter().enumerate() {
            let name = record.name.as_str();
            if self.records[..i].iter().any(|r| r.name == name) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a PropertyStore {
    type Item = &'a PropertyRecord;
    type IntoIter = std::slice::Iter<'a, PropertyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, &str, &str)]) -> PropertyStore {
        let mut store = PropertyStore::new();
        for (name, description, value) in entries {
            store.upsert(name, description, value);
        }
        store
    }

    #[test]
    fn test_find_absent_is_none() {
        let store = store_with(&[("a", "", "1")]);
        assert!(store.find("b").is_none());
    }

    #[test]
    fn test_find_is_case_sensitive() {
        let store = store_with(&[("fs.defaultFS", "", "hdfs://nn")]);
        assert!(store.find("fs.defaultfs").is_none());
        assert_eq!(store.find("fs.defaultFS").map(|r| r.value.as_str()), Some("hdfs://nn"));
    }

    #[test]
    fn test_upsert_creates_and_appends() {
        let mut store = store_with(&[("a", "", "1"), ("b", "", "2")]);
        assert_eq!(store.upsert("c", "", "3"), Upsert::Created);
        assert_eq!(store.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let mut store = store_with(&[("a", "", "1"), ("b", "", "2"), ("c", "", "3")]);
        assert_eq!(store.upsert("b", "", "20"), Upsert::Updated);
        assert_eq!(store.names(), vec!["a", "b", "c"]);
        assert_eq!(store.find("b").map(|r| r.value.as_str()), Some("20"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_upsert_empty_description_keeps_existing() {
        let mut store = store_with(&[("a", "original", "1")]);
        store.upsert("a", "", "2");
        let record = store.find("a").expect("should find record");
        assert_eq!(record.description.as_deref(), Some("original"));
        assert_eq!(record.value, "2");
    }

    #[test]
    fn test_upsert_non_empty_description_replaces() {
        let mut store = store_with(&[("a", "original", "1")]);
        store.upsert("a", "replacement", "1");
        let record = store.find("a").expect("should find record");
        assert_eq!(record.description.as_deref(), Some("replacement"));
    }

    #[test]
    fn test_upsert_twice_last_write_wins() {
        let mut store = PropertyStore::new();
        store.upsert("b", "", "1");
        store.upsert("b", "", "2");
        assert_eq!(store.len(), 1);
        assert_eq!(store.find("b").map(|r| r.value.as_str()), Some("2"));
    }

    #[test]
    fn test_upsert_accepts_empty_name() {
        let mut store = PropertyStore::new();
        assert_eq!(store.upsert("", "", "x"), Upsert::Created);
        assert_eq!(store.upsert("", "", "y"), Upsert::Updated);
        assert_eq!(store.find("").map(|r| r.value.as_str()), Some("y"));
    }

    #[test]
    fn test_upsert_updates_first_of_repeated_names() {
        let mut store = PropertyStore::new();
        store.push(PropertyRecord::new("a", "", "1"));
        store.push(PropertyRecord::new("b", "", "2"));
        store.push(PropertyRecord::new("a", "", "3"));

        assert_eq!(store.upsert("a", "", "9"), Upsert::Updated);
        let values: Vec<&str> = store.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["9", "2", "3"]);
        assert_eq!(store.duplicate_names(), vec!["a"]);
    }

    #[test]
    fn test_duplicate_names_empty_for_unique_store() {
        let store = store_with(&[("a", "", "1"), ("b", "", "2")]);
        assert!(store.duplicate_names().is_empty());
    }

    #[test]
    fn test_names_unique_after_many_upserts() {
        let mut store = PropertyStore::new();
        for (i, name) in ["x", "y", "x", "z", "y", "x"].iter().enumerate() {
            store.upsert(name, "", &i.to_string());
        }
        assert_eq!(store.names(), vec!["x", "y", "z"]);
        assert_eq!(store.find("x").map(|r| r.value.as_str()), Some("5"));
    }
}
