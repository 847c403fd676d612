use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "velocity-arena")]
#[command(about = "Landing-page behaviours: counters, reveal, navigation and session gate")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines on stderr")]
    pub json_logs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Render an eased counter in the terminal
    Counter {
        #[arg(long)]
        target: u64,

        #[arg(long, default_value = "2000", allow_hyphen_values = true)]
        duration: i64,

        #[arg(long, default_value = "")]
        prefix: String,

        #[arg(long, default_value = "")]
        suffix: String,

        #[arg(long, default_value = "60")]
        fps: u32,

        #[arg(long, default_value = ".")]
        separator: String,
    },

    /// Load and validate a TOML site configuration
    Validate {
        #[arg(short, long, default_value = "site-config.toml")]
        config: String,
    },

    /// Run the password gate against an in-memory session
    Gate {
        #[arg(short, long, default_value = "site-config.toml")]
        config: String,

        #[arg(long)]
        password: String,
    },
}
