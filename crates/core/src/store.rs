//! File-backed surgery document store.
//!
//! ## Storage Layout
//!
//! Each surgery is one JSON document in a sharded directory structure:
//!
//! ```text
//! surgeries/
//!   <s1>/
//!     <s2>/
//!       <id>/
//!         surgery.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the id.
//!
//! ## Atomicity
//!
//! Documents are written to a temporary sibling and renamed into place, so readers only ever
//! see a complete document. Mutations take a store-wide write lock around their
//! read-modify-write, which makes each operation atomic on its document. Concurrent edits to the
//! same record resolve as last-write-wins.

use crate::config::CoreConfig;
use crate::constants::{MAX_ID_ALLOCATION_ATTEMPTS, SURGERY_JSON_FILENAME, TEMP_FILE_SUFFIX};
use crate::query::SurgeryQuery;
use crate::surgery::{NewSurgery, Surgery, SurgeryChanges};
use crate::{SurgeryError, SurgeryResult};
use chrono::Utc;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use surgery_uuid::ShardableUuid;

/// Durable collection of surgeries keyed by id.
///
/// Cheap to clone; clones share the same directory and write lock.
#[derive(Clone, Debug)]
pub struct SurgeryStore {
    cfg: Arc<CoreConfig>,
    write_lock: Arc<Mutex<()>>,
}

impl SurgeryStore {
    /// Opens the store, creating the collection directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeryError::StorageDirCreation`] if the directory cannot be created.
    pub fn open(cfg: Arc<CoreConfig>) -> SurgeryResult<Self> {
        fs::create_dir_all(cfg.surgeries_dir()).map_err(SurgeryError::StorageDirCreation)?;
        Ok(Self {
            cfg,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Stores a validated surgery under a freshly allocated id.
    ///
    /// `created_at` and `updated_at` are both set to the insertion time.
    ///
    /// # Errors
    ///
    /// Returns a store error if the id directory cannot be allocated or the document cannot be
    /// written. A partially created directory is removed before returning.
    pub fn insert(&self, new: NewSurgery) -> SurgeryResult<Surgery> {
        let _guard = self.lock()?;

        let (id, dir) = create_unique_surgery_dir(&self.cfg.surgeries_dir(), ShardableUuid::new)?;
        let surgery = Surgery::create(id, new, Utc::now());

        if let Err(e) = write_document(&dir, &surgery) {
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                tracing::warn!(
                    "failed to clean up surgery directory {}: {}",
                    dir.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        tracing::debug!(id = %surgery.id, "surgery inserted");
        Ok(surgery)
    }

    /// Loads one surgery.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeryError::NotFound`] if no document has this id (malformed ids included).
    pub fn find_by_id(&self, id: &str) -> SurgeryResult<Surgery> {
        let id = parse_id(id)?;
        read_document(&self.document_path(&id), &id)
    }

    /// Returns every stored surgery matching `query`, in the query's order.
    ///
    /// Documents that cannot be parsed are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeryError::FileRead`] if the collection cannot be traversed.
    pub fn find(&self, query: &SurgeryQuery) -> SurgeryResult<Vec<Surgery>> {
        let mut surgeries = Vec::new();

        for path in document_paths(&self.cfg.surgeries_dir())? {
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(SurgeryError::FileRead(e)),
            };
            match serde_json::from_str::<Surgery>(&contents) {
                Ok(surgery) => surgeries.push(surgery),
                Err(e) => {
                    tracing::warn!("failed to parse {}: {}", path.display(), e);
                }
            }
        }

        Ok(query.apply(surgeries))
    }

    /// Applies `changes` to the surgery with this id and returns the updated document.
    ///
    /// `updated_at` is bumped even when `changes` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`SurgeryError::NotFound`] if the id is unknown, or a store error if the document
    /// cannot be read or written.
    pub fn update(&self, id: &str, changes: SurgeryChanges) -> SurgeryResult<Surgery> {
        let id = parse_id(id)?;
        let _guard = self.lock()?;

        let path = self.document_path(&id);
        let mut surgery = read_document(&path, &id)?;
        surgery.apply(changes, Utc::now());

        let dir = id.sharded_dir(&self.cfg.surgeries_dir());
        write_document(&dir, &surgery)?;

        tracing::debug!(id = %surgery.id, status = %surgery.status, "surgery updated");
        Ok(surgery)
    }

    /// Sets the status to `cancelled` regardless of its current value.
    ///
    /// # Errors
    ///
    /// As for [`SurgeryStore::update`].
    pub fn cancel(&self, id: &str) -> SurgeryResult<Surgery> {
        self.update(id, SurgeryChanges::cancel())
    }

    fn document_path(&self, id: &ShardableUuid) -> PathBuf {
        id.sharded_dir(&self.cfg.surgeries_dir())
            .join(SURGERY_JSON_FILENAME)
    }

    fn lock(&self) -> SurgeryResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| SurgeryError::LockPoisoned)
    }
}

fn parse_id(id: &str) -> SurgeryResult<ShardableUuid> {
    ShardableUuid::parse(id).map_err(|_| SurgeryError::NotFound(id.to_owned()))
}

fn read_document(path: &Path, id: &ShardableUuid) -> SurgeryResult<Surgery> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(SurgeryError::NotFound(id.to_string()))
        }
        Err(e) => return Err(SurgeryError::FileRead(e)),
    };
    serde_json::from_str(&contents).map_err(SurgeryError::Deserialization)
}

fn write_document(dir: &Path, surgery: &Surgery) -> SurgeryResult<()> {
    let json = serde_json::to_string_pretty(surgery).map_err(SurgeryError::Serialization)?;

    let target = dir.join(SURGERY_JSON_FILENAME);
    let temp = dir.join(format!("{SURGERY_JSON_FILENAME}{TEMP_FILE_SUFFIX}"));
    fs::write(&temp, json).map_err(SurgeryError::FileWrite)?;
    fs::rename(&temp, &target).map_err(SurgeryError::FileWrite)
}

/// Allocates `<base>/<s1>/<s2>/<id>/` for a new id, retrying if the directory already exists.
fn create_unique_surgery_dir(
    base_dir: &Path,
    mut id_source: impl FnMut() -> ShardableUuid,
) -> SurgeryResult<(ShardableUuid, PathBuf)> {
    for _attempt in 0..MAX_ID_ALLOCATION_ATTEMPTS {
        let id = id_source();
        let candidate = id.sharded_dir(base_dir);

        if candidate.exists() {
            continue;
        }

        if let Some(parent) = candidate.parent() {
            fs::create_dir_all(parent).map_err(SurgeryError::SurgeryDirCreation)?;
        }

        match fs::create_dir(&candidate) {
            Ok(()) => return Ok((id, candidate)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(SurgeryError::SurgeryDirCreation(e)),
        }
    }

    Err(SurgeryError::SurgeryDirCreation(io::Error::new(
        ErrorKind::AlreadyExists,
        format!("failed to allocate a unique surgery directory after {MAX_ID_ALLOCATION_ATTEMPTS} attempts"),
    )))
}

/// Lists `<base>/<s1>/<s2>/<id>/surgery.json` paths. A missing base directory yields nothing.
fn document_paths(base_dir: &Path) -> SurgeryResult<Vec<PathBuf>> {
    let mut paths = Vec::new();

    let s1_iter = match fs::read_dir(base_dir) {
        Ok(it) => it,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(paths),
        Err(e) => return Err(SurgeryError::FileRead(e)),
    };

    for s1 in s1_iter.flatten() {
        let s1_path = s1.path();
        if !s1_path.is_dir() {
            continue;
        }

        let Ok(s2_iter) = fs::read_dir(&s1_path) else {
            continue;
        };
        for s2 in s2_iter.flatten() {
            let s2_path = s2.path();
            if !s2_path.is_dir() {
                continue;
            }

            let Ok(id_iter) = fs::read_dir(&s2_path) else {
                continue;
            };
            for id_ent in id_iter.flatten() {
                let document = id_ent.path().join(SURGERY_JSON_FILENAME);
                if document.is_file() {
                    paths.push(document);
                }
            }
        }
    }

    Ok(paths)
}
