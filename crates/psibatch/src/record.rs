use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One labelled input sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub id: String,
    pub payload: String,
}

impl SequenceRecord {
    pub fn new(id: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// A contiguous, non-empty run of records submitted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Position of this batch in partitioner emission order
    pub index: usize,
    records: Vec<SequenceRecord>,
}

impl Batch {
    /// Returns `None` for an empty slice of records.
    pub fn new(index: usize, records: Vec<SequenceRecord>) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        Some(Self { index, records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[SequenceRecord] {
        &self.records
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.id.as_str())
    }

    pub fn into_records(self) -> Vec<SequenceRecord> {
        self.records
    }
}

/// Predicted structure per sequence id for one completed batch.
///
/// Iteration is in ascending id order. A repeated id inside a batch keeps the
/// last prediction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultMap(BTreeMap<String, String>);

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: String, structure: String) -> Option<String> {
        self.0.insert(id, structure)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl IntoIterator for ResultMap {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for ResultMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_batch_is_rejected() {
        assert!(Batch::new(0, Vec::new()).is_none());

        let batch = Batch::new(4, vec![SequenceRecord::new("a", "MKV")]).unwrap();
        assert_eq!(batch.index, 4);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.ids().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_result_map_orders_by_id() {
        let mut results = ResultMap::new();
        results.insert("b".into(), "HHH".into());
        results.insert("a".into(), "CCC".into());
        assert_eq!(results.insert("b".into(), "EEE".into()), Some("HHH".into()));

        let entries = results.iter().collect::<Vec<_>>();
        assert_eq!(entries, vec![("a", "CCC"), ("b", "EEE")]);
    }
}
