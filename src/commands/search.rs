use crate::commands;
use crate::error::VcError;
use crate::store::SecretStore;
use crate::ui::Ui;

/// Print every secret path containing `query`. A single hit is shown in full.
pub fn run(ui: &mut dyn Ui, store: &dyn SecretStore, query: &str) -> i32 {
    let result = execute(ui, store, query);
    commands::exit_code(ui, result)
}

fn execute(ui: &mut dyn Ui, store: &dyn SecretStore, query: &str) -> Result<(), VcError> {
    let results: Vec<String> = store
        .traverse("/")?
        .into_iter()
        .filter(|path| path.contains(query))
        .collect();

    match results.as_slice() {
        [] => ui.output("No search results."),
        [path] => {
            let secret = store.get(path)?;
            ui.output(&format!("# {}", path));
            ui.output(commands::to_yaml(&secret)?.trim_end());
        }
        paths => {
            for path in paths {
                ui.output(path);
            }
        }
    }
    Ok(())
}
