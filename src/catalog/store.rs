use std::collections::BTreeMap;

use super::record::MedicineRecord;

/// Read-only, in-memory medicine catalog.
///
/// Built once before the server accepts traffic and shared behind an `Arc`;
/// it is never mutated afterwards, so concurrent readers need no locking.
#[derive(Debug, Default)]
pub struct CatalogStore {
    records: Vec<MedicineRecord>,
}

impl CatalogStore {
    pub fn new(records: Vec<MedicineRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Linear scan in load order.
    ///
    /// A record matches when, for every `(key, value)` pair, the attribute
    /// named `key` contains `value` case-insensitively. Unknown attributes
    /// read as empty text. No criteria matches everything.
    pub fn search(&self, criteria: &BTreeMap<String, String>, limit: usize) -> Vec<&MedicineRecord> {
        let needles: Vec<(&str, String)> = criteria
            .iter()
            .map(|(key, value)| (key.as_str(), value.to_lowercase()))
            .collect();

        self.records
            .iter()
            .filter(|record| {
                needles.iter().all(|(key, needle)| {
                    record
                        .text_field(key)
                        .unwrap_or("")
                        .to_lowercase()
                        .contains(needle.as_str())
                })
            })
            .take(limit)
            .collect()
    }
}
