use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "dalamud-installer")]
#[command(about = "Registers plugin repositories with Dalamud and installs a plugin set")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// XIVLauncher data directory (default: <config dir>/XIVLauncher)
    #[arg(long, global = true)]
    pub dalamud_dir: Option<PathBuf>,

    /// Settings file (default: <config dir>/dalamud-installer/config.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Patch the Dalamud config and install every configured plugin (default)
    Install,

    /// Manage installer settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default settings file if none exists
    Init,

    /// Show the effective settings
    Show,

    /// Show the settings file path
    Path,

    /// Add a plugin to the install set
    Add {
        /// Plugin internal name (e.g., Penumbra)
        name: String,

        /// Repository manifest that lists the plugin
        repo: String,
    },

    /// Remove a plugin from the install set
    Remove {
        /// Plugin internal name
        name: String,
    },
}
