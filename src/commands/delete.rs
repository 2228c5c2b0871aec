use tracing::debug;

use crate::commands;
use crate::error::VcError;
use crate::store::SecretStore;
use crate::ui::Ui;

const TOO_MANY_ARGS: &str = "The rm command expects at most one argument";
const MISSING_PATH: &str = "The rm command expects a secret path";

/// Remove the secret named by the single argument. Silent on success.
pub fn run(ui: &mut dyn Ui, store: &mut dyn SecretStore, args: &[String]) -> i32 {
    let result = execute(store, args);
    commands::exit_code(ui, result)
}

/// The single secret path in `args`. Needs nothing but the arguments, so it
/// runs before any config is loaded.
pub fn target(args: &[String]) -> Result<&str, VcError> {
    match args {
        [path] => Ok(path.as_str()),
        [] => Err(VcError::Usage(MISSING_PATH.into())),
        _ => Err(VcError::Usage(TOO_MANY_ARGS.into())),
    }
}

fn execute(store: &mut dyn SecretStore, args: &[String]) -> Result<(), VcError> {
    let path = target(args)?;

    // The store accepts deletes of absent paths, so absence is checked here.
    store.get(path)?;
    store.delete(path)?;
    debug!(path = %path, "rm finished");
    Ok(())
}
