use crate::commands;
use crate::error::VcError;
use crate::store::SecretStore;
use crate::ui::Ui;

pub fn run(ui: &mut dyn Ui, store: &mut dyn SecretStore, src: &str, dest: &str) -> i32 {
    let result = transfer(ui, store, src, dest, false);
    if result.is_ok() {
        ui.output("Secret successfully copied!");
    }
    commands::exit_code(ui, result)
}

/// Copy `src` to `dest`, asking before overwriting. With `remove_source` the
/// source is deleted once the destination is written.
pub(crate) fn transfer(
    ui: &mut dyn Ui,
    store: &mut dyn SecretStore,
    src: &str,
    dest: &str,
    remove_source: bool,
) -> Result<(), VcError> {
    let secret = store.get(src).map_err(|e| match e {
        VcError::NotFound(_) => VcError::Usage(format!("Source path \"{}\" does not exist.", src)),
        VcError::MountNotFound(_) => VcError::Usage(format!(
            "Source path \"{}\" is not under a valid mount point.",
            src
        )),
        e => e,
    })?;

    let dest_exists = store.exists(dest).map_err(|e| match e {
        VcError::MountNotFound(_) => VcError::Usage(format!(
            "Destination path \"{}\" is not under a valid mount point.",
            dest
        )),
        e => e,
    })?;

    if dest_exists {
        ui.output("The destination secret already exists.");
        let answer = ui.ask("Do you want to overwrite it? [y/N]: ")?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            return Err(VcError::Usage("Aborted!".into()));
        }
    }

    store.put(dest, &secret)?;
    if remove_source {
        store.delete(src)?;
    }
    Ok(())
}
