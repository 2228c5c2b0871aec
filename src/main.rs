mod cli;
mod commands;
mod config;
mod error;
mod store;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use secrecy::SecretString;

use cli::{Cli, Command};
use store::kv::KvClient;
use ui::{ConsoleUi, Ui};

const LOG_ENV: &str = "VC_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let mut ui = ConsoleUi;

    let code = match run(cli, &mut ui) {
        Ok(code) => code,
        Err(e) => {
            ui.error(&format!("Error: {:#}", e));
            1
        }
    };
    std::process::exit(code);
}

/// Logs go to stderr and stay quiet unless `VC_LOG` asks for more.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, ui: &mut dyn Ui) -> Result<i32> {
    if let Command::Rm { args } = &cli.command {
        if let Err(e) = commands::delete::target(args) {
            return Ok(commands::exit_code(ui, Err(e)));
        }
    }

    let config_path = config::config_path(cli.config.as_deref())?;
    let cfg = config::load(&config_path).context("Failed to load config")?;
    let mut store = KvClient::new(&cfg.url, cfg.token(), cfg.timeout())
        .context("Failed to build the HTTP client")?;

    let code = match cli.command {
        Command::Login { password } => {
            let password = match password {
                Some(p) => SecretString::new(p),
                None => SecretString::new(
                    rpassword::prompt_password("Password: ").context("Failed to read password")?,
                ),
            };
            commands::login::run(ui, &store, &cfg, &config_path, password)
        }
        Command::Search { query } => commands::search::run(ui, &store, &query),
        Command::Show { path } => commands::show::run(ui, &store, &path),
        Command::Mv { src, dest } => commands::mv::run(ui, &mut store, &src, &dest),
        Command::Cp { src, dest } => commands::cp::run(ui, &mut store, &src, &dest),
        Command::Edit { path } => {
            commands::edit::run(ui, &mut store, &path, commands::edit::open_editor)
        }
        Command::Insert { path, data } => commands::insert::run(ui, &mut store, &path, &data),
        Command::Ls { path, recursive } => commands::ls::run(ui, &store, &path, recursive),
        Command::Rm { args } => commands::delete::run(ui, &mut store, &args),
    };

    Ok(code)
}
