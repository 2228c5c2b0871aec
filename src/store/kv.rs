use std::cell::RefCell;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::VcError;
use crate::store::{normalize, Authenticator, Result, Secret, SecretStore};

const TOKEN_HEADER: &str = "X-Vault-Token";
const MOUNTS_ENDPOINT: &str = "sys/internal/ui/mounts";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KvVersion {
    V1,
    V2,
}

/// A key/value secrets engine mounted at `path` (always ends in `/`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mount {
    pub path: String,
    pub version: KvVersion,
}

impl Mount {
    /// The part of `path` below this mount, or `None` if `path` lives elsewhere.
    fn key_of<'a>(&self, path: &'a str) -> Option<&'a str> {
        let path = normalize(path);
        if path == self.path.trim_end_matches('/') {
            return Some("");
        }
        path.strip_prefix(self.path.as_str())
    }

    fn read_path(&self, key: &str) -> String {
        match self.version {
            KvVersion::V1 => format!("{}{}", self.path, key),
            KvVersion::V2 => format!("{}data/{}", self.path, key),
        }
    }

    fn delete_path(&self, key: &str) -> String {
        match self.version {
            KvVersion::V1 => format!("{}{}", self.path, key),
            // Removes every version along with the metadata.
            KvVersion::V2 => format!("{}metadata/{}", self.path, key),
        }
    }

    fn list_path(&self, key: &str) -> String {
        self.delete_path(key)
    }

    fn write_body(&self, secret: &Secret) -> Value {
        match self.version {
            KvVersion::V1 => json!(secret),
            KvVersion::V2 => json!({ "data": secret }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

/// Client for a Vault-style HTTP API serving KV version 1 and 2 engines.
pub struct KvClient {
    http: Client,
    base_url: String,
    token: Option<SecretString>,
    /// Mounts resolved so far, so each engine is looked up once per process.
    mounts: RefCell<Vec<Mount>>,
}

impl KvClient {
    pub fn new(base_url: &str, token: Option<SecretString>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http(http, base_url, token))
    }

    fn with_http(http: Client, base_url: &str, token: Option<SecretString>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            mounts: RefCell::new(Vec::new()),
        }
    }

    fn url(&self, api_path: &str) -> String {
        format!("{}/v1/{}", self.base_url, api_path)
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token.as_ref().ok_or(VcError::NotAuthenticated)?;
        Ok(builder.header(TOKEN_HEADER, token.expose_secret().as_str()))
    }

    fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        let request = self.authed(builder)?.build()?;
        debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self.http.execute(request)?;
        check(response, path)
    }

    /// Find the KV engine responsible for `path` and split off the key below it.
    fn resolve(&self, path: &str) -> Result<(Mount, String)> {
        if let Some(found) = self.cached_mount(path) {
            return Ok(found);
        }

        let path = normalize(path);
        let builder = self.http.get(self.url(&format!("{}/{}", MOUNTS_ENDPOINT, path)));
        // The lookup answers 403 for paths outside every mount, so any 4xx
        // here means the path is unmounted.
        let response = match self.send(builder, path) {
            Ok(response) => response,
            Err(VcError::PermissionDenied(_))
            | Err(VcError::NotFound(_))
            | Err(VcError::Api { status: 400..=499, .. }) => {
                return Err(VcError::MountNotFound(path.to_string()))
            }
            Err(e) => return Err(e),
        };

        let body: Value = response.json()?;
        let mount = parse_mount(&body["data"]).ok_or_else(|| VcError::MountNotFound(path.to_string()))?;
        debug!(mount = %mount.path, version = ?mount.version, "resolved mount");
        self.mounts.borrow_mut().push(mount);

        self.cached_mount(path)
            .ok_or_else(|| VcError::MountNotFound(path.to_string()))
    }

    fn cached_mount(&self, path: &str) -> Option<(Mount, String)> {
        self.mounts.borrow().iter().find_map(|m| {
            m.key_of(path)
                .map(|key| (m.clone(), key.to_string()))
        })
    }

    fn list_mounts(&self) -> Result<Vec<String>> {
        let response = self.send(self.http.get(self.url(MOUNTS_ENDPOINT)), "/")?;
        let body: Value = response.json()?;
        let mounts = parse_mount_table(&body["data"]["secret"]);

        let names = mounts.iter().map(|m| m.path.clone()).collect();
        *self.mounts.borrow_mut() = mounts;
        Ok(names)
    }
}

impl SecretStore for KvClient {
    fn get(&self, path: &str) -> Result<Secret> {
        let (mount, key) = self.resolve(path)?;
        if key.is_empty() {
            return Err(VcError::NotFound(path.to_string()));
        }

        let response = self.send(self.http.get(self.url(&mount.read_path(&key))), path)?;
        let body: Value = response.json()?;
        extract_secret(mount.version, body, path)
    }

    fn put(&mut self, path: &str, secret: &Secret) -> Result<()> {
        let (mount, key) = self.resolve(path)?;
        if key.is_empty() {
            return Err(VcError::Usage(format!(
                "\"{}\" is a mount point, not a secret path.",
                path
            )));
        }

        let builder = self
            .http
            .put(self.url(&mount.read_path(&key)))
            .json(&mount.write_body(secret));
        self.send(builder, path)?;
        info!(path = %path, "secret written");
        Ok(())
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        let (mount, key) = self.resolve(path)?;
        if key.is_empty() {
            return Err(VcError::Usage(format!(
                "\"{}\" is a mount point, not a secret path.",
                path
            )));
        }

        self.send(self.http.delete(self.url(&mount.delete_path(&key))), path)?;
        info!(path = %path, "secret deleted");
        Ok(())
    }

    fn list(&self, path: &str) -> Result<Vec<String>> {
        if normalize(path).is_empty() {
            return self.list_mounts();
        }

        let (mount, key) = self.resolve(path)?;
        let builder = self
            .http
            .get(self.url(&mount.list_path(&key)))
            .query(&[("list", "true")]);
        let response = self.send(builder, path)?;
        let body: Value = response.json()?;
        Ok(extract_keys(&body))
    }
}

impl Authenticator for KvClient {
    fn login(&self, auth_path: &str, user: &str, password: &SecretString) -> Result<SecretString> {
        let url = self.url(&format!("auth/{}/login/{}", normalize(auth_path), user));
        debug!(url = %url, "logging in");

        let response = self
            .http
            .post(url)
            .json(&json!({ "password": password.expose_secret() }))
            .send()?;
        let response = check(response, auth_path)?;
        let body: Value = response.json()?;

        body["auth"]["client_token"]
            .as_str()
            .map(|t| SecretString::new(t.to_string()))
            .ok_or_else(|| VcError::Serialization("login response carried no client token".into()))
    }
}

/// Map non-success statuses onto `VcError`.
fn check(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => Err(VcError::NotFound(path.to_string())),
        StatusCode::FORBIDDEN => Err(VcError::PermissionDenied(path.to_string())),
        _ => {
            let body: ErrorBody = response.json().unwrap_or_default();
            Err(VcError::Api {
                status: status.as_u16(),
                message: body.errors.join("; "),
            })
        }
    }
}

/// Parse one mount entry (`{"path": "secret/", "type": "kv", "options": {...}}`).
fn parse_mount(data: &Value) -> Option<Mount> {
    let path = data["path"].as_str()?;
    mount_from(path, data)
}

fn mount_from(path: &str, data: &Value) -> Option<Mount> {
    match data["type"].as_str()? {
        "kv" | "generic" => {}
        _ => return None,
    }

    let version = match data["options"]["version"].as_str() {
        Some("2") => KvVersion::V2,
        _ => KvVersion::V1,
    };

    let path = format!("{}/", normalize(path));
    Some(Mount { path, version })
}

/// Parse the `secret` section of the mount table into its KV engines.
fn parse_mount_table(table: &Value) -> Vec<Mount> {
    let mut mounts: Vec<Mount> = table
        .as_object()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(path, data)| mount_from(path, data))
                .collect()
        })
        .unwrap_or_default();
    mounts.sort_by(|a, b| a.path.cmp(&b.path));
    mounts
}

fn extract_secret(version: KvVersion, body: Value, path: &str) -> Result<Secret> {
    let data = match version {
        KvVersion::V1 => &body["data"],
        KvVersion::V2 => &body["data"]["data"],
    };

    // KV v2 keeps a null payload around for soft-deleted versions.
    if data.is_null() {
        return Err(VcError::NotFound(path.to_string()));
    }

    serde_json::from_value(data.clone()).map_err(|e| VcError::Serialization(e.to_string()))
}

fn extract_keys(body: &Value) -> Vec<String> {
    body["data"]["keys"]
        .as_array()
        .map(|keys| {
            keys.iter()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
