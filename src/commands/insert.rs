use crate::commands;
use crate::error::VcError;
use crate::store::{Secret, SecretStore};
use crate::ui::Ui;

pub fn run(ui: &mut dyn Ui, store: &mut dyn SecretStore, path: &str, data: &str) -> i32 {
    let result = execute(ui, store, path, data);
    commands::exit_code(ui, result)
}

fn execute(
    ui: &mut dyn Ui,
    store: &mut dyn SecretStore,
    path: &str,
    data: &str,
) -> Result<(), VcError> {
    let (key, value) = parse_pair(data)?;

    let mut secret = Secret::new();
    secret.insert(key.to_string(), serde_json::Value::from(value));
    store.put(path, &secret)?;

    ui.output("Secret successfully inserted!");
    Ok(())
}

/// Split `KEY=VALUE` at the first `=`. The value may itself contain `=`.
fn parse_pair(data: &str) -> Result<(&str, &str), VcError> {
    match data.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(VcError::Usage(format!(
            "Data \"{}\" is not a valid key/value pair.",
            data
        ))),
    }
}
