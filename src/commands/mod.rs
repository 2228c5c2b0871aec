pub mod cp;
pub mod delete;
pub mod edit;
pub mod insert;
pub mod login;
pub mod ls;
pub mod mv;
pub mod search;
pub mod show;

use crate::error::VcError;
use crate::store::Secret;
use crate::ui::Ui;

/// Report a command's outcome: errors go to the error sink and exit with 1.
pub fn exit_code(ui: &mut dyn Ui, result: Result<(), VcError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            ui.error(&e.to_string());
            1
        }
    }
}

/// Render a secret as YAML for display or editing.
pub fn to_yaml(secret: &Secret) -> Result<String, VcError> {
    Ok(serde_yaml::to_string(secret)?)
}
