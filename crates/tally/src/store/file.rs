use crate::{Error, Result, SequenceRecord, SequenceStore};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// A counter store persisted as a JSON snapshot on local disk.
///
/// All records are held in memory behind an async mutex; every successful
/// increment rewrites the snapshot to a temporary file and renames it over
/// the previous one, so a crash mid-write never exposes a partial
/// increment. If the write fails, the in-memory record is rolled back and
/// the call reports [`Error::StorageUnavailable`] — a value is only ever
/// handed out once the snapshot holds it.
///
/// Atomicity holds within a single process. Pointing two processes at the
/// same snapshot is not supported; multi-process deployments belong on a
/// document store with a native upsert-and-increment primitive.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    counters: Mutex<HashMap<String, u64>>,
}

impl FileStore {
    /// Opens the snapshot at `path`, creating an empty store if the file
    /// does not exist yet.
    ///
    /// Fails with [`Error::StorageUnavailable`] if the file exists but
    /// cannot be read or parsed.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let counters = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let records: Vec<SequenceRecord> =
                    serde_json::from_slice(&bytes).map_err(|e| Error::StorageUnavailable {
                        context: format!("corrupt snapshot {}: {e}", path.display()),
                    })?;
                records
                    .into_iter()
                    .map(|record| (record.name, record.value))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(Error::StorageUnavailable {
                    context: format!("read {}: {e}", path.display()),
                });
            }
        };
        Ok(Self {
            path,
            counters: Mutex::new(counters),
        })
    }

    /// Writes all records to a temporary file, then renames it over the
    /// snapshot. The rename is what makes a crashed write invisible.
    async fn persist(&self, counters: &HashMap<String, u64>) -> Result<()> {
        let mut records: Vec<SequenceRecord> = counters
            .iter()
            .map(|(name, value)| SequenceRecord {
                name: name.clone(),
                value: *value,
            })
            .collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));

        let bytes = serde_json::to_vec_pretty(&records).map_err(|e| Error::StorageUnavailable {
            context: format!("encode snapshot: {e}"),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| Error::StorageUnavailable {
                context: format!("write {}: {e}", tmp.display()),
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::StorageUnavailable {
                context: format!("rename {} -> {}: {e}", tmp.display(), self.path.display()),
            })
    }
}

impl SequenceStore for FileStore {
    async fn fetch_and_increment(&self, name: &str) -> Result<u64> {
        let mut counters = self.counters.lock().await;

        let current = counters.get(name).copied().unwrap_or(0);
        let next = current.checked_add(1).ok_or_else(|| Error::SequenceExhausted {
            name: name.to_owned(),
        })?;
        counters.insert(name.to_owned(), next);

        match self.persist(&counters).await {
            Ok(()) => Ok(next),
            Err(e) => {
                // Roll back so the value is never observable without a
                // snapshot that holds it.
                if current == 0 {
                    counters.remove(name);
                } else {
                    counters.insert(name.to_owned(), current);
                }
                Err(e)
            }
        }
    }
}
