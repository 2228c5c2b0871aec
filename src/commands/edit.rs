use std::io::Write;
use std::process::Command;

use crate::commands;
use crate::error::VcError;
use crate::store::{Secret, SecretStore};
use crate::ui::Ui;

const DEFAULT_EDITOR: &str = "vi";

/// Open the secret at `path` in an editor and write back the result. A path
/// with nothing stored yet starts from an empty document.
pub fn run<F>(ui: &mut dyn Ui, store: &mut dyn SecretStore, path: &str, edit: F) -> i32
where
    F: FnOnce(&str) -> Result<String, VcError>,
{
    let result = execute(ui, store, path, edit);
    commands::exit_code(ui, result)
}

fn execute<F>(ui: &mut dyn Ui, store: &mut dyn SecretStore, path: &str, edit: F) -> Result<(), VcError>
where
    F: FnOnce(&str) -> Result<String, VcError>,
{
    let original = match store.get(path) {
        Ok(secret) => commands::to_yaml(&secret)?,
        Err(VcError::NotFound(_)) => {
            ui.output(&format!("Path \"{}\" does not exist yet. Creating a new secret.", path));
            String::new()
        }
        Err(e) => return Err(e),
    };

    let edited = edit(&original)?;
    let secret = parse_document(&edited)?;
    store.put(path, &secret)?;

    ui.output("Secret successfully edited!");
    Ok(())
}

/// Parse the edited YAML. It must be a non-empty mapping.
fn parse_document(text: &str) -> Result<Secret, VcError> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    if value.is_null() {
        return Err(VcError::Usage("Secret is empty, nothing was written.".into()));
    }
    if !value.is_mapping() {
        return Err(VcError::Usage("A secret must be a YAML mapping of keys to values.".into()));
    }

    let secret: Secret = serde_yaml::from_value(value)?;
    if secret.is_empty() {
        return Err(VcError::Usage("Secret is empty, nothing was written.".into()));
    }
    Ok(secret)
}

/// Hand `text` to `$VISUAL` / `$EDITOR` through a temporary file and return
/// what was saved.
pub fn open_editor(text: &str) -> Result<String, VcError> {
    let editor = std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .unwrap_or_else(|_| DEFAULT_EDITOR.to_string());

    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(DEFAULT_EDITOR);

    let mut file = tempfile::Builder::new()
        .prefix("vc-")
        .suffix(".yaml")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;

    let status = Command::new(program).args(parts).arg(file.path()).status()?;
    if !status.success() {
        return Err(VcError::Usage(format!(
            "Editor '{}' exited with {}, nothing was written.",
            editor, status
        )));
    }

    Ok(std::fs::read_to_string(file.path())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::ui::MockUi;

    #[test]
    fn test_edit_existing_secret() {
        let mut store = MemoryStore::new(&["secret"]).with_secret("secret/app", &[("key", "old")]);
        let mut ui = MockUi::default();

        let rc = run(&mut ui, &mut store, "secret/app", |text| {
            assert_eq!(text, "key: old\n");
            Ok("key: new\nextra: 1\n".into())
        });

        assert_eq!(rc, 0, "errors: {}", ui.error);
        let secret = store.get("secret/app").unwrap();
        assert_eq!(secret["key"], "new");
        assert_eq!(secret["extra"], 1);
    }

    #[test]
    fn test_edit_new_secret_starts_empty() {
        let mut store = MemoryStore::new(&["secret"]);
        let mut ui = MockUi::default();

        let rc = run(&mut ui, &mut store, "secret/fresh", |text| {
            assert!(text.is_empty());
            Ok("key: value\n".into())
        });

        assert_eq!(rc, 0);
        assert!(ui.output.contains("Creating a new secret."));
        assert_eq!(store.get("secret/fresh").unwrap()["key"], "value");
    }

    #[test]
    fn test_editor_failure_writes_nothing() {
        let mut store = MemoryStore::new(&["secret"]).with_secret("secret/app", &[("key", "old")]);
        let mut ui = MockUi::default();

        let rc = run(&mut ui, &mut store, "secret/app", |_| {
            Err(VcError::Usage("Editor 'false' exited with 1".into()))
        });

        assert_eq!(rc, 1);
        assert_eq!(store.get("secret/app").unwrap()["key"], "old");
    }

    #[test]
    fn test_parse_document_rejects_non_mappings() {
        assert!(parse_document("").is_err());
        assert!(parse_document("- a\n- b\n").is_err());
        assert!(parse_document("{}").is_err());
        assert!(parse_document("just a string").is_err());
        assert_eq!(parse_document("a: b").unwrap()["a"], "b");
    }
}
