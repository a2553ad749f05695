use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::RecapError;
use crate::utils::{project_digest, project_key};

use super::{codec, ProjectCache};

const PRIMARY_FILE: &str = "project.cache";
const BACKUP_FILE: &str = "project.cache.bkp";
const TEMP_FILE: &str = "project.cache.tmp";

/// A cache document together with how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedCache {
    pub cache: ProjectCache,

    /// True when the primary was unusable and the document came from the
    /// backup or a legacy file.
    pub recovered: bool,
}

/// Owns the durable locations of one project's cache files.
///
/// The store keeps a primary document and a backup one save-cycle behind it.
/// Loads fall back from primary to backup to the legacy flat-layout file, so
/// a corrupted primary never prevents continued operation as long as any
/// fallback source is intact. The cache root is passed in explicitly; the
/// store never consults ambient state for its location.
pub struct CacheStore {
    /// Directory holding the primary and backup files for this project.
    project_dir: PathBuf,

    /// Flat-layout file written by earlier versions. Read as a last resort,
    /// never written back.
    legacy_path: PathBuf,
}

impl CacheStore {
    pub fn new(cache_root: &Path, project_root: &Path) -> Self {
        let digest = project_digest(project_root);
        CacheStore {
            project_dir: cache_root.join(project_key(project_root, &digest)),
            legacy_path: cache_root.join(format!("project_{}.cache", &digest[..16])),
        }
    }

    fn primary_path(&self) -> PathBuf {
        self.project_dir.join(PRIMARY_FILE)
    }

    fn backup_path(&self) -> PathBuf {
        self.project_dir.join(BACKUP_FILE)
    }

    /// Loads the project's cache, falling back from primary to backup to the
    /// legacy file. Returns `Ok(None)` when no source exists or parses —
    /// that is a first run, not a failure.
    pub fn load(&self) -> Result<Option<LoadedCache>, RecapError> {
        if let Some(cache) = self.try_source(&self.primary_path())? {
            debug!("Loaded cache from '{}'.", self.primary_path().display());
            return Ok(Some(LoadedCache {
                cache,
                recovered: false,
            }));
        }

        for path in [self.backup_path(), self.legacy_path.clone()] {
            if let Some(cache) = self.try_source(&path)? {
                info!("Recovered cache from '{}'.", path.display());
                return Ok(Some(LoadedCache {
                    cache,
                    recovered: true,
                }));
            }
        }

        Ok(None)
    }

    /// Persists the cache: rotates a parseable primary into the backup slot,
    /// then writes the new document under a temporary name and renames it
    /// into place. A crash mid-write leaves the old primary untouched.
    pub fn save(&self, cache: &ProjectCache) -> Result<(), RecapError> {
        fs::create_dir_all(&self.project_dir)
            .map_err(|e| RecapError::io(&self.project_dir, e))?;

        let primary = self.primary_path();
        self.rotate_backup(&primary)?;

        let encoded = codec::encode(cache)?;
        let temp = self.project_dir.join(TEMP_FILE);
        fs::write(&temp, &encoded).map_err(|e| RecapError::io(&temp, e))?;
        fs::rename(&temp, &primary).map_err(|e| RecapError::io(&primary, e))?;

        info!(
            "Cache saved: {} session(s) in history, {} recorded in total.",
            cache.session_history().len(),
            cache.session_count()
        );
        Ok(())
    }

    /// Reads and decodes one source file. Missing files and undecodable
    /// contents yield `None` so the caller can fall back; any other I/O
    /// failure surfaces immediately.
    fn try_source(&self, path: &Path) -> Result<Option<ProjectCache>, RecapError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No cache file at '{}'.", path.display());
                return Ok(None);
            }
            Err(e) => return Err(RecapError::io(path, e)),
        };

        match codec::decode(&data) {
            Ok(cache) => Ok(Some(cache)),
            Err(e) => {
                warn!("Cache file '{}' is unusable: {}.", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Copies the current primary into the backup slot, but only when it
    /// still parses. The backup must always hold the last known-good state,
    /// never a broken document.
    fn rotate_backup(&self, primary: &Path) -> Result<(), RecapError> {
        let data = match fs::read(primary) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(RecapError::io(primary, e)),
        };

        if let Err(e) = codec::decode(&data) {
            warn!(
                "Existing primary '{}' is unusable ({}); keeping the prior backup.",
                primary.display(),
                e
            );
            return Ok(());
        }

        let backup = self.backup_path();
        fs::copy(primary, &backup).map_err(|e| RecapError::io(&backup, e))?;
        debug!("Rotated primary into backup '{}'.", backup.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionEntry;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_cache(sessions: usize) -> ProjectCache {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut cache = ProjectCache::new();
        cache.project_name = Some("demo".to_string());
        for i in 0..sessions {
            cache.append_session(SessionEntry::new(
                base + Duration::minutes(i as i64),
                format!("task-{}", i + 1),
                "did things",
            ));
        }
        cache
    }

    fn make_store() -> (CacheStore, TempDir, TempDir) {
        let root = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        let store = CacheStore::new(root.path(), project.path());
        (store, root, project)
    }

    #[test]
    fn save_then_load_round_trips() {
        let (store, _root, _project) = make_store();
        let cache = sample_cache(3);

        store.save(&cache).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded.cache, cache);
        assert!(!loaded.recovered);
    }

    #[test]
    fn total_loss_returns_none() {
        let (store, _root, _project) = make_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn corrupted_primary_falls_back_to_backup() {
        let (store, _root, _project) = make_store();
        let first = sample_cache(2);
        let second = sample_cache(5);

        store.save(&first).unwrap();
        store.save(&second).unwrap();
        fs::write(store.primary_path(), b"not a cache document").unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.recovered);
        assert_eq!(loaded.cache, first);
    }

    #[test]
    fn missing_primary_falls_back_to_backup() {
        let (store, _root, _project) = make_store();
        let first = sample_cache(1);
        let second = sample_cache(4);

        store.save(&first).unwrap();
        store.save(&second).unwrap();
        fs::remove_file(store.primary_path()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.recovered);
        assert_eq!(loaded.cache, first);
    }

    #[test]
    fn legacy_file_is_a_read_only_last_resort() {
        let (store, _root, _project) = make_store();
        let old = sample_cache(2);
        fs::write(&store.legacy_path, codec::encode(&old).unwrap()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.recovered);
        assert_eq!(loaded.cache, old);

        // A save goes to the current layout; the legacy file stays as-is.
        let fresh = sample_cache(6);
        store.save(&fresh).unwrap();
        let legacy_bytes = fs::read(&store.legacy_path).unwrap();
        assert_eq!(legacy_bytes, codec::encode(&old).unwrap());

        let loaded = store.load().unwrap().unwrap();
        assert!(!loaded.recovered);
        assert_eq!(loaded.cache, fresh);
    }

    #[test]
    fn corrupted_backup_cascades_to_legacy() {
        let (store, _root, _project) = make_store();
        let old = sample_cache(2);

        store.save(&sample_cache(3)).unwrap();
        store.save(&sample_cache(4)).unwrap();
        fs::write(store.primary_path(), b"garbage").unwrap();
        fs::write(store.backup_path(), b"more garbage").unwrap();
        fs::write(&store.legacy_path, codec::encode(&old).unwrap()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.recovered);
        assert_eq!(loaded.cache, old);
    }

    #[test]
    fn stray_temp_file_never_shadows_the_primary() {
        let (store, _root, _project) = make_store();
        let cache = sample_cache(3);
        store.save(&cache).unwrap();

        // A crash between backup rotation and the rename leaves a temp file
        // behind; the primary from the last completed save must still win.
        fs::write(store.project_dir.join(TEMP_FILE), b"half-written").unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert!(!loaded.recovered);
        assert_eq!(loaded.cache, cache);
    }

    #[test]
    fn backup_always_holds_the_last_known_good_state() {
        let (store, _root, _project) = make_store();
        let first = sample_cache(1);
        let second = sample_cache(2);
        let third = sample_cache(3);

        store.save(&first).unwrap();
        store.save(&second).unwrap();

        // Corrupt the primary, then save over it. The rotation must refuse
        // to replace the good backup with the broken primary.
        fs::write(store.primary_path(), b"garbage").unwrap();
        store.save(&third).unwrap();

        fs::write(store.primary_path(), b"garbage again").unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert!(loaded.recovered);
        assert_eq!(loaded.cache, first);
    }

    #[test]
    fn eleven_sessions_survive_save_and_load_rotated() {
        let (store, _root, _project) = make_store();
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let mut cache = ProjectCache::new();
        for i in 1..=11 {
            cache.append_session(SessionEntry::new(
                base + Duration::minutes(i),
                format!("task-{}", i),
                "",
            ));
        }
        store.save(&cache).unwrap();

        let loaded = store.load().unwrap().unwrap().cache;
        assert_eq!(loaded.session_count(), 11);
        assert_eq!(loaded.session_history().len(), 10);
        assert_eq!(loaded.session_history()[0].task, "task-2");
        assert_eq!(loaded.session_history()[9].task, "task-11");
    }
}
