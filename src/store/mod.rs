pub mod kv;
#[cfg(test)]
pub mod memory;

use std::collections::BTreeMap;

use secrecy::SecretString;

use crate::error::VcError;

pub type Result<T> = std::result::Result<T, VcError>;

/// The key/value pairs stored under one secret path.
pub type Secret = BTreeMap<String, serde_json::Value>;

/// Backend behind every command. Commands never see anything more concrete.
///
/// `delete` follows the remote store's semantics and succeeds whether or not
/// anything was stored at the path.
pub trait SecretStore {
    fn get(&self, path: &str) -> Result<Secret>;
    fn put(&mut self, path: &str, secret: &Secret) -> Result<()>;
    fn delete(&mut self, path: &str) -> Result<()>;
    /// Direct children of `path`. Sub-directories end in `/`.
    fn list(&self, path: &str) -> Result<Vec<String>>;

    fn exists(&self, path: &str) -> Result<bool> {
        match self.get(path) {
            Ok(_) => Ok(true),
            Err(VcError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Every leaf secret below `path`, as full paths, sorted.
    fn traverse(&self, path: &str) -> Result<Vec<String>> {
        let root = normalize(path).to_string();
        let mut leaves = Vec::new();
        let mut pending = vec![root.clone()];

        while let Some(dir) = pending.pop() {
            let entries = match self.list(&dir) {
                Ok(entries) => entries,
                // Empty mounts list as 404; only the starting path must exist.
                Err(VcError::NotFound(_)) if dir != root => continue,
                Err(e) => return Err(e),
            };
            for entry in entries {
                let full = join(&dir, &entry);
                if entry.ends_with('/') {
                    pending.push(full);
                } else {
                    leaves.push(full);
                }
            }
        }

        leaves.sort();
        Ok(leaves)
    }
}

/// Exchanges user credentials for a client token.
pub trait Authenticator {
    fn login(&self, auth_path: &str, user: &str, password: &SecretString) -> Result<SecretString>;
}

/// Strip leading and trailing slashes: `/secret/app/` becomes `secret/app`.
pub fn normalize(path: &str) -> &str {
    path.trim_matches('/')
}

/// Join a listing entry onto its directory, dropping any trailing slash.
pub fn join(dir: &str, entry: &str) -> String {
    let entry = entry.trim_end_matches('/');
    if dir.is_empty() {
        entry.to_string()
    } else {
        format!("{}/{}", dir, entry)
    }
}
