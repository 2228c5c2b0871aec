use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "vc",
    about = "Browse and edit secrets in a Vault key/value store from the shell.",
    version
)]
pub struct Cli {
    /// Config file to use instead of $VC_CONFIG or the user config directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authenticate using the method configured under [authentication].
    Login {
        /// Password for the configured user (prompted when omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Search for secret paths that contain the search string.
    Search {
        query: String,
    },

    /// Show an existing secret.
    Show {
        path: String,
    },

    /// Move an existing secret to another location.
    Mv {
        src: String,
        dest: String,
    },

    /// Copy an existing secret to another location.
    Cp {
        src: String,
        dest: String,
    },

    /// Edit a secret in $EDITOR.
    Edit {
        path: String,
    },

    /// Insert a new secret from a KEY=VALUE pair.
    Insert {
        path: String,
        /// The KEY=VALUE pair to store.
        data: String,
    },

    /// List all secrets at the specified path.
    Ls {
        #[arg(default_value = "/")]
        path: String,

        /// Descend into sub-directories and print full secret paths.
        #[arg(short, long)]
        recursive: bool,
    },

    /// Remove a secret at the specified path.
    #[command(visible_alias = "delete")]
    Rm {
        /// Secret path to remove. Arity is checked by the command itself.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}
