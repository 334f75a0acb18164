//! Key-value storage backed by a single JSON object file

use crate::{Error, Result};
use serde_json::{Map, Value};
use std::path::PathBuf;

pub struct KvStorage {
    path: PathBuf,
}

impl KvStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Storage file `storage.json` inside `data_dir`
    pub fn in_dir(data_dir: PathBuf) -> Self {
        Self::new(data_dir.join("storage.json"))
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut entries = self.read_all()?;
        Ok(entries.remove(key))
    }

    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&content)? {
            Value::Object(entries) => Ok(entries),
            _ => Err(Error::InvalidData(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_reads_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = KvStorage::in_dir(temp_dir.path().to_path_buf());
        assert!(storage.get("anything").unwrap().is_none());
    }

    #[test]
    fn test_set_keeps_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = KvStorage::in_dir(temp_dir.path().join("nested"));

        storage.set("a", json!(1)).unwrap();
        storage.set("b", json!({ "x": true })).unwrap();
        storage.set("a", json!(2)).unwrap();

        assert_eq!(storage.get("a").unwrap(), Some(json!(2)));
        assert_eq!(storage.get("b").unwrap(), Some(json!({ "x": true })));
    }

    #[test]
    fn test_non_object_file_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let storage = KvStorage::new(path);
        assert!(matches!(storage.get("a"), Err(Error::InvalidData(_))));
    }
}
