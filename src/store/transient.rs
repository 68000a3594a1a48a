//! Process-lifetime in-memory record store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::record::{MemoryRecord, RecordDraft, RecordId};

use super::{Error, RecordStore, Result, check_dimensions};

/// Keyed in-memory mapping with the same invariants as the persistent
/// backend but no durability; everything is gone when the process ends.
pub struct TransientStore {
    inner: RwLock<Inner>,
}

struct Inner {
    records: BTreeMap<u64, MemoryRecord>,
    next_id: u64,
    dimensions: Option<usize>,
}

impl Default for TransientStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransientStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: BTreeMap::new(),
                next_id: 1,
                dimensions: None,
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStore for TransientStore {
    fn put(&self, draft: RecordDraft) -> Result<RecordId> {
        let mut inner = self.write();

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

        let id = RecordId(inner.next_id);
        inner.records.insert(
            id.0,
            MemoryRecord {
                id,
                timestamp,
                content: draft.content,
                embedding: draft.embedding,
                last_accessed: None,
            },
        );
        inner.next_id += 1;
        Ok(id)
    }

    fn get_all(&self) -> Result<Vec<MemoryRecord>> {
        Ok(self.read().records.values().cloned().collect())
    }

    fn delete(&self, id: RecordId) -> Result<bool> {
        Ok(self.write().records.remove(&id.0).is_some())
    }

    fn clear(&self) -> Result<()> {
        self.write().records.clear();
        Ok(())
    }

    fn touch(&self, ids: &[RecordId], at: DateTime<Utc>) -> Result<()> {
        let mut inner = self.write();
        for id in ids {
            if let Some(record) = inner.records.get_mut(&id.0) {
                record.last_accessed = Some(at);
            }
        }
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.read().records.len())
    }
}
