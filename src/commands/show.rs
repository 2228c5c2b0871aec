use crate::commands;
use crate::error::VcError;
use crate::store::SecretStore;
use crate::ui::Ui;

pub fn run(ui: &mut dyn Ui, store: &dyn SecretStore, path: &str) -> i32 {
    let result = execute(ui, store, path);
    commands::exit_code(ui, result)
}

fn execute(ui: &mut dyn Ui, store: &dyn SecretStore, path: &str) -> Result<(), VcError> {
    let secret = store.get(path)?;
    ui.output(commands::to_yaml(&secret)?.trim_end());
    Ok(())
}
