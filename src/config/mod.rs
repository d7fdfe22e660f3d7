#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "github-sync-plugin")]
#[command(about = "GitHub Issues connector for the ticket sync platform")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "github-plugin.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: cli::Command,
}
