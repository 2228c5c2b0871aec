use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use crate::commands;
use crate::config::{self, Config};
use crate::error::VcError;
use crate::store::Authenticator;
use crate::ui::Ui;

#[derive(Debug, PartialEq, Eq)]
enum AuthMethod {
    Userpass,
    Ldap { path: String },
}

impl AuthMethod {
    fn mount_path(&self) -> &str {
        match self {
            AuthMethod::Userpass => "userpass",
            AuthMethod::Ldap { path } => path,
        }
    }
}

/// Authenticate with the configured backend and store the new token in the
/// config file at `config_path`.
pub fn run(
    ui: &mut dyn Ui,
    auth: &dyn Authenticator,
    cfg: &Config,
    config_path: &Path,
    password: SecretString,
) -> i32 {
    let result = execute(ui, auth, cfg, config_path, &password);
    commands::exit_code(ui, result)
}

fn execute(
    ui: &mut dyn Ui,
    auth: &dyn Authenticator,
    cfg: &Config,
    config_path: &Path,
    password: &SecretString,
) -> Result<(), VcError> {
    let (user, method) = auth_settings(cfg)?;

    let token = auth
        .login(method.mount_path(), &user, password)
        .map_err(|e| match e {
            VcError::NotFound(_) | VcError::MountNotFound(_) => VcError::Usage(
                "It appears that your configured authentication backend does not exist".into(),
            ),
            e => e,
        })?;

    config::update_token(config_path, token.expose_secret())?;
    info!(user = %user, backend = %method.mount_path(), "logged in");
    ui.output("Successfully authenticated.");
    Ok(())
}

/// Validate the `[authentication]` section, naming the first missing setting.
fn auth_settings(cfg: &Config) -> Result<(String, AuthMethod), VcError> {
    let auth = cfg.authentication.as_ref().ok_or_else(|| {
        VcError::Usage("Please configure the 'authentication' section in your config file".into())
    })?;

    let user = auth.user.clone().filter(|u| !u.is_empty()).ok_or_else(|| {
        VcError::Usage(
            "Please specify a user with which to authenticate against vault ('user' setting)"
                .into(),
        )
    })?;

    let auth_type = auth.auth_type.as_deref().ok_or_else(|| {
        VcError::Usage("Please specify the type of the authentication backend".into())
    })?;

    let method = match auth_type {
        "userpass" => AuthMethod::Userpass,
        "ldap" => {
            let path = auth.path.clone().filter(|p| !p.is_empty()).ok_or_else(|| {
                VcError::Usage("Please specify the path to the authentication backend".into())
            })?;
            AuthMethod::Ldap { path }
        }
        other => {
            return Err(VcError::Usage(format!(
                "Unsupported authentication type '{}' (expected 'userpass' or 'ldap')",
                other
            )))
        }
    };

    Ok((user, method))
}
