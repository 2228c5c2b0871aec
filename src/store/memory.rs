use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::VcError;
use crate::store::{normalize, Result, Secret, SecretStore};

/// In-process `SecretStore` with the remote store's semantics: paths must live
/// under a known mount, and deletes are idempotent.
#[derive(Debug)]
pub struct MemoryStore {
    mounts: BTreeSet<String>,
    secrets: BTreeMap<String, Secret>,
    /// Every call made against the store, as `"<op> <path>"`.
    pub calls: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn new(mounts: &[&str]) -> Self {
        Self {
            mounts: mounts.iter().map(|m| normalize(m).to_string()).collect(),
            secrets: BTreeMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Seed a secret without recording a call.
    pub fn with_secret(mut self, path: &str, pairs: &[(&str, &str)]) -> Self {
        let secret = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::from(*v)))
            .collect();
        self.secrets.insert(normalize(path).to_string(), secret);
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.secrets.contains_key(normalize(path))
    }

    fn record(&self, op: &str, path: &str) {
        self.calls.borrow_mut().push(format!("{} {}", op, path));
    }

    fn check_mount<'a>(&self, path: &'a str) -> Result<&'a str> {
        let path = normalize(path);
        let mounted = self
            .mounts
            .iter()
            .any(|m| path == m || path.starts_with(&format!("{}/", m)));
        if mounted {
            Ok(path)
        } else {
            Err(VcError::MountNotFound(path.to_string()))
        }
    }
}

impl SecretStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Secret> {
        self.record("get", path);
        let key = self.check_mount(path)?;
        self.secrets
            .get(key)
            .cloned()
            .ok_or_else(|| VcError::NotFound(path.to_string()))
    }

    fn put(&mut self, path: &str, secret: &Secret) -> Result<()> {
        self.record("put", path);
        let key = self.check_mount(path)?.to_string();
        self.secrets.insert(key, secret.clone());
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        self.record("delete", path);
        let key = self.check_mount(path)?.to_string();
        self.secrets.remove(&key);
        Ok(())
    }

    fn list(&self, path: &str) -> Result<Vec<String>> {
        self.record("list", path);
        if normalize(path).is_empty() {
            return Ok(self.mounts.iter().map(|m| format!("{}/", m)).collect());
        }

        let dir = self.check_mount(path)?;
        let prefix = format!("{}/", dir);
        let entries: BTreeSet<String> = self
            .secrets
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .map(|rest| match rest.split_once('/') {
                Some((child, _)) => format!("{}/", child),
                None => rest.to_string(),
            })
            .collect();

        // An empty listing is a 404 on the remote store.
        if entries.is_empty() {
            return Err(VcError::NotFound(path.to_string()));
        }
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new(&["secret"])
            .with_secret("secret/app/db", &[("password", "hunter2")])
            .with_secret("secret/app/api/token", &[("value", "abc")])
            .with_secret("secret/top", &[("key", "value")])
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = store();
        store.delete("secret/top").unwrap();
        store.delete("secret/top").unwrap();
        assert!(!store.contains("secret/top"));
    }

    #[test]
    fn test_unknown_mount() {
        let store = store();
        let err = store.get("nope/x").unwrap_err();
        assert!(matches!(err, VcError::MountNotFound(_)));
    }

    #[test]
    fn test_list_marks_directories() {
        let store = store();
        assert_eq!(store.list("secret").unwrap(), vec!["app/", "top"]);
        assert_eq!(store.list("secret/app/").unwrap(), vec!["api/", "db"]);
        assert_eq!(store.list("/").unwrap(), vec!["secret/"]);
    }

    #[test]
    fn test_traverse_returns_full_leaf_paths() {
        let store = store();
        assert_eq!(
            store.traverse("/").unwrap(),
            vec!["secret/app/api/token", "secret/app/db", "secret/top"]
        );
        assert_eq!(store.traverse("secret/app").unwrap(), vec!["secret/app/api/token", "secret/app/db"]);
    }

    #[test]
    fn test_exists() {
        let store = store();
        assert!(store.exists("secret/top").unwrap());
        assert!(!store.exists("secret/missing").unwrap());
        assert!(store.exists("other/top").is_err());
    }
}
