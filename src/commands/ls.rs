use crate::commands;
use crate::error::VcError;
use crate::store::SecretStore;
use crate::ui::Ui;

pub fn run(ui: &mut dyn Ui, store: &dyn SecretStore, path: &str, recursive: bool) -> i32 {
    let result = execute(ui, store, path, recursive);
    commands::exit_code(ui, result)
}

fn execute(
    ui: &mut dyn Ui,
    store: &dyn SecretStore,
    path: &str,
    recursive: bool,
) -> Result<(), VcError> {
    let entries = if recursive {
        store.traverse(path)
    } else {
        store.list(path)
    };

    let entries = entries.map_err(|e| match e {
        VcError::NotFound(_) => VcError::Usage(format!("Path \"{}\" does not exist.", path)),
        e => e,
    })?;

    for entry in &entries {
        ui.output(entry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::ui::MockUi;

    fn store() -> MemoryStore {
        MemoryStore::new(&["secret", "team"])
            .with_secret("secret/app/db", &[("password", "x")])
            .with_secret("secret/top", &[("key", "value")])
    }

    #[test]
    fn test_ls_root_lists_mounts() {
        let mut ui = MockUi::default();
        assert_eq!(run(&mut ui, &store(), "/", false), 0);
        assert_eq!(ui.output, "secret/\nteam/\n");
    }

    #[test]
    fn test_ls_directory() {
        let mut ui = MockUi::default();
        assert_eq!(run(&mut ui, &store(), "secret", false), 0);
        assert_eq!(ui.output, "app/\ntop\n");
    }

    #[test]
    fn test_ls_recursive() {
        let mut ui = MockUi::default();
        assert_eq!(run(&mut ui, &store(), "secret/", true), 0);
        assert_eq!(ui.output, "secret/app/db\nsecret/top\n");
    }

    #[test]
    fn test_ls_missing_path() {
        let mut ui = MockUi::default();
        assert_eq!(run(&mut ui, &store(), "secret/nothing", false), 1);
        assert!(ui.error.contains("Path \"secret/nothing\" does not exist."));
    }
}
