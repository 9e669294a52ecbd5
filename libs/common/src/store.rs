//! Flat-file record store
//!
//! Each entity collection lives in exactly one JSON array file. The
//! [`Repository`] trait is the storage seam handlers talk to; the only
//! implementation, [`JsonFileStore`], reads the whole file, applies the change
//! in memory and writes the whole file back.
//!
//! Read-modify-write cycles on one store are serialized by an async mutex
//! shared between clones, and every write lands in a sibling `.tmp` file that
//! is renamed over the collection afterwards.

use std::{
    io::ErrorKind,
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Keys a patch can never overwrite
pub const IMMUTABLE_FIELDS: [&str; 4] = ["id", "createdAt", "updatedAt", "version"];

/// A record type that can be kept in a [`Repository`]
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Client-supplied fields of a new record
    type Draft: Send + Sync + 'static;

    /// Build a record from a draft, stamping the server-assigned fields
    fn from_draft(id: String, now: DateTime<Utc>, draft: Self::Draft) -> Self;

    fn id(&self) -> &str;

    /// Current optimistic concurrency version; records without one report 0
    fn version(&self) -> u64 {
        0
    }

    /// Mark the record as modified at `now`
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

/// Check run against the whole collection before an insert.
/// Returning `Some(message)` rejects the insert.
pub type ConflictCheck<'a, T> = &'a (dyn Fn(&[T]) -> Option<String> + Send + Sync);

fn no_conflict<T>(_: &[T]) -> Option<String> {
    None
}

/// Storage interface for one entity collection
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// All records in insertion order
    async fn list(&self) -> StoreResult<Vec<T>>;

    /// Find a record by id
    async fn get(&self, id: &str) -> StoreResult<Option<T>>;

    /// Insert a new record
    async fn create(&self, draft: T::Draft) -> StoreResult<T> {
        self.create_unless(draft, &no_conflict::<T>).await
    }

    /// Insert a new record unless `conflict` objects to the existing ones.
    /// The check and the insert happen atomically.
    async fn create_unless(&self, draft: T::Draft, conflict: ConflictCheck<'_, T>)
    -> StoreResult<T>;

    /// Shallow-merge `patch` over the record with `id`.
    ///
    /// Returns `Ok(None)` when no such record exists. When `expected_version`
    /// is set and differs from the stored version the update is rejected.
    async fn update(
        &self,
        id: &str,
        patch: Map<String, Value>,
        expected_version: Option<u64>,
    ) -> StoreResult<Option<T>>;

    /// Remove the record with `id`, returning whether it existed
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

/// Repository backed by a single pretty-printed JSON array file
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFileStore<T> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            lock: Arc::clone(&self.lock),
            _record: PhantomData,
        }
    }
}

impl<T: Record> JsonFileStore<T> {
    /// Create a store for the collection file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            _record: PhantomData,
        }
    }

    /// Create a store for `file_name` inside `data_dir`
    pub fn in_dir(data_dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(data_dir.as_ref().join(file_name))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `seed` when the collection file is missing or holds no records.
    ///
    /// Returns whether the file was (re)written. A corrupt file is reported,
    /// never overwritten.
    pub async fn ensure_initialized(&self, seed: Vec<T::Draft>) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;

        let missing = !fs::try_exists(&self.path).await?;
        let records = self.read_all().await?;

        if !missing && (!records.is_empty() || seed.is_empty()) {
            return Ok(false);
        }

        let now = Utc::now();
        let mut seeded: Vec<T> = Vec::with_capacity(seed.len());
        for draft in seed {
            let id = fresh_id(&seeded);
            seeded.push(T::from_draft(id, now, draft));
        }

        self.write_all(&seeded).await?;
        info!(
            "Initialized collection {} with {} record(s)",
            self.path.display(),
            seeded.len()
        );

        Ok(true)
    }

    async fn read_all(&self) -> StoreResult<Vec<T>> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if data.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&data).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    async fn write_all(&self, records: &[T]) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(records).map_err(StoreError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!(
            "Wrote {} record(s) to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn fresh_id<T: Record>(records: &[T]) -> String {
    loop {
        let id = Uuid::new_v4().to_string();
        if !records.iter().any(|r| r.id() == id) {
            return id;
        }
    }
}

/// Overlay the patch's top-level keys on `record`, skipping immutable ones
fn merge_patch<T: Record>(record: &T, patch: Map<String, Value>) -> StoreResult<T> {
    let mut value = serde_json::to_value(record).map_err(StoreError::Serialize)?;

    if let Value::Object(fields) = &mut value {
        for (key, field) in patch {
            if !IMMUTABLE_FIELDS.contains(&key.as_str()) {
                fields.insert(key, field);
            }
        }
    }

    serde_json::from_value(value).map_err(StoreError::InvalidRecord)
}

#[async_trait]
impl<T: Record> Repository<T> for JsonFileStore<T> {
    async fn list(&self) -> StoreResult<Vec<T>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        let _guard = self.lock.lock().await;
        let records = self.read_all().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn create_unless(
        &self,
        draft: T::Draft,
        conflict: ConflictCheck<'_, T>,
    ) -> StoreResult<T> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;

        if let Some(message) = conflict(&records) {
            return Err(StoreError::Conflict(message));
        }

        let record = T::from_draft(fresh_id(&records), Utc::now(), draft);
        records.push(record.clone());
        self.write_all(&records).await?;

        Ok(record)
    }

    async fn update(
        &self,
        id: &str,
        patch: Map<String, Value>,
        expected_version: Option<u64>,
    ) -> StoreResult<Option<T>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;

        let Some(index) = records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };

        let actual = records[index].version();
        if let Some(expected) = expected_version {
            if expected != actual {
                return Err(StoreError::VersionConflict { expected, actual });
            }
        }

        let mut updated = merge_patch(&records[index], patch)?;
        updated.touch(Utc::now());
        records[index] = updated.clone();
        self.write_all(&records).await?;

        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;

        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }

        self.write_all(&records).await?;
        Ok(true)
    }
}
