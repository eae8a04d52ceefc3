use crate::{Error, Result, SequenceRecord, SequenceStore};
use parking_lot::Mutex;
use std::collections::HashMap;

/// An in-process counter store suitable for tests and ephemeral
/// deployments.
///
/// Counter state lives in a mutex-guarded map, so atomicity of the
/// read-modify-write holds across threads within a single process.
/// Nothing is persisted: a restart loses all counters. Use
/// [`FileStore`] when allocations must survive the process.
///
/// ## See Also
/// - [`FileStore`]
///
/// [`FileStore`]: crate::FileStore
pub struct MemoryStore {
    counters: Mutex<HashMap<String, u64>>,
}

impl MemoryStore {
    /// Creates an empty store. Every sequence name starts fresh at 1 on
    /// first allocation.
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a store preloaded with existing counter records.
    ///
    /// Useful for restoring state captured elsewhere or for driving a
    /// counter to a specific value in tests.
    pub fn from_records(records: impl IntoIterator<Item = SequenceRecord>) -> Self {
        Self {
            counters: Mutex::new(
                records
                    .into_iter()
                    .map(|record| (record.name, record.value))
                    .collect(),
            ),
        }
    }

    /// Returns a point-in-time snapshot of all counter records, sorted by
    /// name. Diagnostic only; allocation never reads through this.
    pub fn records(&self) -> Vec<SequenceRecord> {
        let counters = self.counters.lock();
        let mut records: Vec<SequenceRecord> = counters
            .iter()
            .map(|(name, value)| SequenceRecord {
                name: name.clone(),
                value: *value,
            })
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceStore for MemoryStore {
    async fn fetch_and_increment(&self, name: &str) -> Result<u64> {
        let mut counters = self.counters.lock();
        let slot = counters.entry(name.to_owned()).or_insert(0);
        *slot = slot.checked_add(1).ok_or_else(|| Error::SequenceExhausted {
            name: name.to_owned(),
        })?;
        Ok(*slot)
    }
}
