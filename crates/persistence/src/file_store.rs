use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::store::{KeyValueStore, StoreError, StoredValue};

/// Store backed by a single JSON document on disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: HashMap<String, StoredValue>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file starts an empty store. An unreadable or malformed file
    /// is logged and also starts empty; it is replaced on the next save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = Self::read_values(&path);
        Self { path, values }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_values(path: &Path) -> HashMap<String, StoredValue> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No saved form state at {}", path.display());
                return HashMap::new();
            }
            Err(e) => {
                log::warn!("⚠️ Failed to read saved form state {}: {}", path.display(), e);
                return HashMap::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(values) => values,
            Err(e) => {
                log::warn!(
                    "⚠️ Ignoring malformed form state file {}: {}",
                    path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }

    fn write_values(
        path: &Path,
        values: &HashMap<String, StoredValue>,
    ) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn save(&mut self, key: &str, value: &str, ttl_days: u32) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut values: HashMap<String, StoredValue> = self
            .values
            .iter()
            .filter(|(_, stored)| !stored.is_expired(now))
            .map(|(name, stored)| (name.clone(), stored.clone()))
            .collect();
        values.insert(key.to_string(), StoredValue::new(value, ttl_days, now));

        // Memory only changes once the file holds the same values
        Self::write_values(&self.path, &values)?;
        self.values = values;
        log::debug!("💾 Saved {} to {}", key, self.path.display());
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .filter(|stored| !stored.is_expired(Utc::now()))
            .map(|stored| stored.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("form.json");

        let mut store = FileStore::open(&path);
        store
            .save("yosemite_campgrounds", r#"["232447","232450"]"#, 30)
            .unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(
            reopened.load("yosemite_campgrounds"),
            Some(r#"["232447","232450"]"#.to_string())
        );
    }

    #[test]
    fn test_expired_entries_are_absent_and_purged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");

        let mut stale = HashMap::new();
        stale.insert(
            "yosemite_end_date".to_string(),
            StoredValue {
                value: "2025-04-12".to_string(),
                expires_at: Utc::now() - Duration::minutes(5),
            },
        );
        std::fs::write(&path, serde_json::to_string(&stale).unwrap()).unwrap();

        let mut store = FileStore::open(&path);
        assert_eq!(store.load("yosemite_end_date"), None);

        store.save("yosemite_start_date", "2025-04-10", 30).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("yosemite_end_date"));
        assert!(content.contains("yosemite_start_date"));
    }

    #[test]
    fn test_malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, "not json at all").unwrap();

        let mut store = FileStore::open(&path);
        assert_eq!(store.load("yosemite_start_date"), None);

        store.save("yosemite_start_date", "2025-04-10", 30).unwrap();
        assert_eq!(
            FileStore::open(&path).load("yosemite_start_date"),
            Some("2025-04-10".to_string())
        );
    }

    #[test]
    fn test_failed_write_leaves_values_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");

        let mut store = FileStore::open(&path);
        store.save("yosemite_start_date", "2025-04-10", 30).unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.save("yosemite_start_date", "2025-05-01", 30).is_err());
        assert!(store.save("yosemite_end_date", "2025-05-03", 30).is_err());
        assert_eq!(
            store.load("yosemite_start_date"),
            Some("2025-04-10".to_string())
        );
        assert_eq!(store.load("yosemite_end_date"), None);
    }

    #[test]
    fn test_huge_ttl_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");

        let mut store = FileStore::open(&path);
        store
            .save("yosemite_start_date", "2025-04-10", u32::MAX)
            .unwrap();

        assert_eq!(
            FileStore::open(&path).load("yosemite_start_date"),
            Some("2025-04-10".to_string())
        );
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json"));

        assert_eq!(store.load("anything"), None);
        assert!(!store.path().exists());
    }
}
