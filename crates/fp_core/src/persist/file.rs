use std::fs::{create_dir_all, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, PersistError};

/// File-backed store: one JSON file per key under a base directory.
///
/// Writes are atomic: the value lands in a temp file which is synced and
/// renamed over the target, so a crash never leaves a half-written record.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys contain ':' separators; flatten to a safe file name.
        let name: String =
            key.chars().map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' }).collect();
        self.dir.join(format!("{}.json", name))
    }

    fn write_atomic(path: &Path, value: &str) -> Result<(), PersistError> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.flush()?;

            // sync_all ensures data is written to disk (portable fsync)
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("saved {} bytes to {:?}", value.len(), path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&path)?;
        let mut value = String::new();
        file.read_to_string(&mut value)?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        Self::write_atomic(&self.path_for(key), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn get_set_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        assert!(store.get("prediction:f1").unwrap().is_none());

        store.set("prediction:f1", "{\"a\":1}").unwrap();
        assert_eq!(store.get("prediction:f1").unwrap().as_deref(), Some("{\"a\":1}"));

        store.set("prediction:f1", "{\"a\":2}").unwrap();
        assert_eq!(store.get("prediction:f1").unwrap().as_deref(), Some("{\"a\":2}"));
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        store.set("prediction:f1:home", "{}").unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["prediction_f1_home.json"]);
    }

    #[test]
    fn distinct_keys_use_distinct_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        store.set("prediction:f1", "one").unwrap();
        store.set("community_viewed:f1", "true").unwrap();

        assert_eq!(store.get("prediction:f1").unwrap().as_deref(), Some("one"));
        assert_eq!(store.get("community_viewed:f1").unwrap().as_deref(), Some("true"));
    }
}
