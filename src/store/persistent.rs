//! Durable record store backed by an append-only JSONL log.
//!
//! One self-describing serialized record per line. Appends are flushed
//! before the in-memory index advances, so a crash mid-write leaves at
//! worst a torn trailing line, which is dropped on the next open without
//! touching previously committed records. Deletions, clears, and access
//! stamps rewrite the log through a temp file + rename.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::record::{MemoryRecord, RecordDraft, RecordId};

use super::{Error, RecordStore, Result, check_dimensions};

/// File-backed record store, readable back in full on process restart.
pub struct PersistentStore {
    path: PathBuf,
    inner: Mutex<Inner>,
}

struct Inner {
    file: File,
    records: BTreeMap<u64, MemoryRecord>,
    next_id: u64,
    dimensions: Option<usize>,
}

impl PersistentStore {
    /// Open or create the log at `path`, replaying existing records.
    ///
    /// # Errors
    ///
    /// Returns `Error::Corrupt` for an unreadable record that is not the
    /// final line, `Error::MismatchedDimensions` if the log holds
    /// embeddings of differing lengths, and `Error::Io` on filesystem
    /// failures.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut records = BTreeMap::new();
        let mut dimensions = None;
        let mut next_id = 1u64;

        if path.exists() {
            let raw = fs::read_to_string(&path)?;
            let mut offset = 0usize;
            let mut truncate_at = None;

            for (index, line) in raw.split_inclusive('\n').enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    offset += line.len();
                    continue;
                }

                match serde_json::from_str::<MemoryRecord>(trimmed) {
                    Ok(record) => {
                        check_dimensions(&mut dimensions, &record.embedding)?;
                        next_id = next_id.max(record.id.0 + 1);
                        records.insert(record.id.0, record);
                    }
                    Err(err) => {
                        let rest = &raw[offset + line.len()..];
                        if rest.trim().is_empty() {
                            // Torn final append from a crash mid-write;
                            // committed records stay intact.
                            warn!(
                                "dropping torn trailing line {} of {}",
                                index + 1,
                                path.display()
                            );
                            truncate_at = Some(offset as u64);
                            break;
                        }
                        return Err(Error::Corrupt {
                            line: index + 1,
                            message: err.to_string(),
                        });
                    }
                }
                offset += line.len();
            }

            if let Some(len) = truncate_at {
                let file = OpenOptions::new().write(true).open(&path)?;
                file.set_len(len)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        info!(
            "opened persistent memory log ({} records, path={})",
            records.len(),
            path.display()
        );

        Ok(Self {
            path,
            inner: Mutex::new(Inner {
                file,
                records,
                next_id,
                dimensions,
            }),
        })
    }

    /// Rewrite the whole log atomically and reopen the append handle.
    fn rewrite(&self, inner: &mut Inner) -> Result<()> {
        let temp_path = self.path.with_extension("jsonl.tmp");
        {
            let mut temp = OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(&temp_path)?;
            for record in inner.records.values() {
                let line = serde_json::to_string(record)
                    .map_err(|err| Error::Serialize(err.to_string()))?;
                writeln!(temp, "{line}")?;
            }
            temp.flush()?;
        }
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        fs::rename(&temp_path, &self.path)?;
        inner.file = OpenOptions::new().append(true).open(&self.path)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means a writer panicked mid-operation; the log
        // itself is still consistent (appends are whole lines), so
        // continue with the inner state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for PersistentStore {
    fn put(&self, draft: RecordDraft) -> Result<RecordId> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        check_dimensions(&mut inner.dimensions, &draft.embedding)?;

        let timestamp = draft.timestamp.unwrap_or_else(Utc::now);
        if let Some(newest) = inner.records.values().next_back() {
            if timestamp < newest.timestamp {
                return Err(Error::TimestampOrder {
                    newest: newest.timestamp,
                    given: timestamp,
                });
            }
        }

        let record = MemoryRecord {
            id: RecordId(inner.next_id),
            timestamp,
            content: draft.content,
            embedding: draft.embedding,
            last_accessed: None,
        };

        let line =
            serde_json::to_string(&record).map_err(|err| Error::Serialize(err.to_string()))?;
        writeln!(inner.file, "{line}")?;
        inner.file.flush()?;

        // The durable line is on disk; only now advance the index.
        let id = record.id;
        inner.records.insert(id.0, record);
        inner.next_id += 1;
        debug!("appended memory record (id={}, path={})", id, self.path.display());
        Ok(id)
    }

    fn get_all(&self) -> Result<Vec<MemoryRecord>> {
        let guard = self.lock();
        Ok(guard.records.values().cloned().collect())
    }

    fn delete(&self, id: RecordId) -> Result<bool> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.records.remove(&id.0).is_none() {
            return Ok(false);
        }
        self.rewrite(inner)?;
        debug!("deleted memory record (id={})", id);
        Ok(true)
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let removed = inner.records.len();
        inner.records.clear();
        // Ids keep rising across a clear so they stay unique for the
        // store's lifetime.
        self.rewrite(inner)?;
        info!("cleared persistent memory log ({} records removed)", removed);
        Ok(())
    }

    fn touch(&self, ids: &[RecordId], at: DateTime<Utc>) -> Result<()> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let mut changed = false;
        for id in ids {
            if let Some(record) = inner.records.get_mut(&id.0) {
                record.last_accessed = Some(at);
                changed = true;
            }
        }
        if changed {
            self.rewrite(inner)?;
        }
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.lock().records.len())
    }
}
