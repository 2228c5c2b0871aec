use crate::commands;
use crate::commands::cp::transfer;
use crate::store::SecretStore;
use crate::ui::Ui;

pub fn run(ui: &mut dyn Ui, store: &mut dyn SecretStore, src: &str, dest: &str) -> i32 {
    let result = transfer(ui, store, src, dest, true);
    if result.is_ok() {
        ui.output("Secret successfully moved!");
    }
    commands::exit_code(ui, result)
}
