use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcError {
    #[error("Secret does not exist at \"{0}\"")]
    NotFound(String),

    #[error("Path \"{0}\" is not under a valid mount point.")]
    MountNotFound(String),

    #[error("Permission denied on \"{0}\". Your token may have expired, try `vc login`.")]
    PermissionDenied(String),

    #[error("Not authenticated. Run `vc login` or set VAULT_TOKEN.")]
    NotAuthenticated,

    #[error("Server responded with {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config error: {0}")]
    Config(String),

    /// Bad invocation, detected before any request is made.
    #[error("{0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_yaml::Error> for VcError {
    fn from(e: serde_yaml::Error) -> Self {
        VcError::Serialization(e.to_string())
    }
}
