use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{record_id, Entity, Kind, Record, StoreError, ID_FIELD};

/// Result of a successful [`Store::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record had no id; it was assigned this one and appended
    Inserted(u64),
    /// The record with this id was replaced in place
    Updated(u64),
}

impl SaveOutcome {
    pub fn id(self) -> u64 {
        match self {
            SaveOutcome::Inserted(id) | SaveOutcome::Updated(id) => id,
        }
    }
}

/// File-backed record store rooted at a data directory.
///
/// One JSON file per [`Kind`]; one mutex per kind guards the whole
/// load-mutate-save cycle of that file.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
    locks: [Mutex<()>; 3],
}

impl Store {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        info!(root = %root.display(), "Record store opened");
        Ok(Self {
            root,
            locks: [Mutex::new(()), Mutex::new(()), Mutex::new(())],
        })
    }

    /// Path of the collection file backing `kind`.
    pub fn path_for(&self, kind: Kind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    fn lock(&self, kind: Kind) -> MutexGuard<'_, ()> {
        // The guarded data is (), so a poisoned lock carries no broken state.
        self.locks[kind.index()]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load every raw record of `kind` in file order.
    ///
    /// A missing file is created holding an empty array first.
    pub fn load(&self, kind: Kind) -> Result<Vec<Record>, StoreError> {
        let _guard = self.lock(kind);
        self.read_collection(kind)
    }

    /// All records of `T`'s kind, in file order.
    pub fn all<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        self.load(T::KIND)?
            .into_iter()
            .map(T::from_record)
            .collect()
    }

    /// Every record whose field `key` is strictly equal (type and value) to `value`.
    pub fn find_by<T: Entity>(&self, key: &str, value: &Value) -> Result<Vec<T>, StoreError> {
        self.load(T::KIND)?
            .into_iter()
            .filter(|r| r.get(key) == Some(value))
            .map(T::from_record)
            .collect()
    }

    /// First record whose field `key` is strictly equal to `value`.
    ///
    /// A record holding `""` matches a search for `""`; absence is only
    /// reported when no record matches.
    pub fn find_one<T: Entity>(&self, key: &str, value: &Value) -> Result<Option<T>, StoreError> {
        self.load(T::KIND)?
            .into_iter()
            .find(|r| r.get(key) == Some(value))
            .map(T::from_record)
            .transpose()
    }

    pub fn get<T: Entity>(&self, id: u64) -> Result<Option<T>, StoreError> {
        self.find_one(ID_FIELD, &Value::from(id))
    }

    /// Persist `entity`.
    ///
    /// Without an id the record is appended with `max(ids) + 1` (0 for an
    /// empty collection); the assigned id is written back into `entity`.
    /// This differs from a "last element + 1" policy, which can reissue an
    /// id once records are no longer stored in id order.
    ///
    /// With an id the matching record is replaced in place. An id with no
    /// matching record fails with [`StoreError::UnknownId`] and the file is
    /// not rewritten.
    pub fn save<T: Entity>(&self, entity: &mut T) -> Result<SaveOutcome, StoreError> {
        let kind = T::KIND;
        let _guard = self.lock(kind);
        let mut records = self.read_collection(kind)?;

        let outcome = match entity.id() {
            None => {
                let id = match records.iter().filter_map(record_id).max() {
                    None => 0,
                    Some(max) => max
                        .checked_add(1)
                        .ok_or(StoreError::IdExhausted { kind })?,
                };
                entity.set_id(id);
                records.push(entity.to_record()?);
                SaveOutcome::Inserted(id)
            }
            Some(id) => {
                let slot = records
                    .iter_mut()
                    .find(|r| record_id(r) == Some(id))
                    .ok_or(StoreError::UnknownId { kind, id })?;
                *slot = entity.to_record()?;
                SaveOutcome::Updated(id)
            }
        };

        self.write_collection(kind, &records)?;
        debug!(kind = %kind, outcome = ?outcome, "Record saved");
        Ok(outcome)
    }

    /// Merge `fields` into the record with `id` and persist it.
    ///
    /// The `id` field itself is never overwritten. Returns `None` when no
    /// record has that id.
    pub fn update<T: Entity>(&self, id: u64, fields: Record) -> Result<Option<T>, StoreError> {
        let kind = T::KIND;
        let _guard = self.lock(kind);
        let mut records = self.read_collection(kind)?;

        let Some(slot) = records.iter_mut().find(|r| record_id(r) == Some(id)) else {
            return Ok(None);
        };
        for (key, value) in fields {
            if key != ID_FIELD {
                slot.insert(key, value);
            }
        }
        // Round-trip through the entity so the stored shape stays canonical.
        let entity = T::from_record(slot.clone())?;
        *slot = entity.to_record()?;

        self.write_collection(kind, &records)?;
        debug!(kind = %kind, id, "Record updated");
        Ok(Some(entity))
    }

    /// Remove the first record with `id`. Returns whether one was removed;
    /// the collection is rewritten either way.
    pub fn remove<T: Entity>(&self, id: u64) -> Result<bool, StoreError> {
        let kind = T::KIND;
        let _guard = self.lock(kind);
        let mut records = self.read_collection(kind)?;

        let removed = match records.iter().position(|r| record_id(r) == Some(id)) {
            Some(index) => {
                records.remove(index);
                true
            }
            None => false,
        };

        self.write_collection(kind, &records)?;
        debug!(kind = %kind, id, removed, "Record removed");
        Ok(removed)
    }

    fn ensure_exists(&self, path: &Path) -> Result<(), StoreError> {
        match fs::metadata(path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Creating empty collection file");
                fs::write(path, "[]").map_err(|source| StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn read_collection(&self, kind: Kind) -> Result<Vec<Record>, StoreError> {
        let path = self.path_for(kind);
        self.ensure_exists(&path)?;
        let text = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&text).map_err(|source| {
            warn!(path = %path.display(), error = %source, "Collection file is not valid JSON");
            StoreError::Malformed {
                path: path.clone(),
                source,
            }
        })?;
        let Value::Array(items) = value else {
            warn!(path = %path.display(), "Collection file is not a JSON array");
            return Err(StoreError::NotAnArray { path });
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(StoreError::NotAnArray { path: path.clone() }),
            })
            .collect()
    }

    fn write_collection(&self, kind: Kind, records: &[Record]) -> Result<(), StoreError> {
        let path = self.path_for(kind);
        let text = serde_json::to_string_pretty(records).map_err(|source| {
            StoreError::InvalidRecord { kind, source }
        })?;
        fs::write(&path, text).map_err(|source| StoreError::Io { path, source })
    }
}
