pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lesswrong-bot", disable_help_subcommand = true)]
#[command(about = "Read posts from lesswrong.ru, Slate Star Codex, Astral Codex Ten and lesswrong.com", long_about = None)]
pub struct Cli {
    /// Path to the config file (default: ~/.config/lesswrong-bot/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// User whose source preference is used
    #[arg(short, long, default_value_t = 0, global = true)]
    pub user: i64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a random post
    Random,
    /// Show top posts
    Top,
    /// Show or change the source
    Source {
        /// Source code 1-4; omit to show the current source
        code: Option<String>,
    },
    /// Show help
    Help,
}
