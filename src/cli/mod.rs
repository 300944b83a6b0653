//! CLI module for castctl
//!
//! Command-line interface definitions and handlers for the streaming server
//! admin console.
//!
//! # Commands
//!
//! - `status` - Stream overview (or the offline notice)
//! - `server` - Server details, configuration, social handles
//! - `video` - Output variants and video settings
//! - `logs` - Server logs
//! - `chat` - List and moderate chat messages
//! - `tags` - List, add and remove instance tags
//! - `variants` - Add and edit output variants
//! - `set` - Change a single config field
//! - `upgrade` - Latest release notes and downloads
//! - `watch` - Live status with a viewer chart
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Overview of a local server
//! castctl status
//!
//! # Hide everything a spammer wrote
//! castctl --url https://stream.example.com chat hide --author spammer
//!
//! # Generate shell completions
//! castctl completions bash > ~/.bash_completion.d/castctl
//! ```

pub mod chat;
pub mod completions;
pub mod config;
pub mod output;
pub mod pages;
pub mod session;
pub mod settings;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;
pub use session::{connect, resolve_config};

use crate::api::LogLevel;
use crate::mutation::ConfigField;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// castctl - admin console for self-hosted live streaming
#[derive(Parser, Debug)]
#[command(
    name = "castctl",
    version,
    about = "Admin console for self-hosted live-streaming servers"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and logging overrides shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to configuration file (default: ./castctl.toml if present)
    #[arg(short, long, global = true, env = "CASTCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override server base URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Override admin username
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Override admin password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show stream overview
    Status(JsonArgs),
    /// Show server details and configuration
    Server(JsonArgs),
    /// Show video variants and settings
    Video(JsonArgs),
    /// Show server logs
    Logs(LogsArgs),
    /// List and moderate chat messages
    #[command(subcommand)]
    Chat(ChatCommands),
    /// Manage instance tags
    #[command(subcommand)]
    Tags(TagsCommands),
    /// Manage video output variants
    #[command(subcommand)]
    Variants(VariantsCommands),
    /// Change a single config field
    Set(SetArgs),
    /// Show the latest release
    Upgrade(JsonArgs),
    /// Live status with a viewer chart, until Ctrl-C
    Watch(WatchArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct JsonArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LogsArgs {
    /// Only warnings and errors
    #[arg(short, long)]
    pub warnings: bool,

    /// Filter by level (info, warning, error); repeatable
    #[arg(short, long = "level")]
    pub levels: Vec<LogLevel>,

    /// Oldest first
    #[arg(long)]
    pub ascending: bool,

    /// Entries per page
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ChatCommands {
    /// List chat messages
    List(ChatListArgs),
    /// Show messages
    Show(ChatBulkArgs),
    /// Hide messages
    Hide(ChatBulkArgs),
    /// Flip one message's visibility
    Toggle(ChatToggleArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ChatListArgs {
    /// Only messages by this user; repeatable
    #[arg(short, long = "author")]
    pub authors: Vec<String>,

    /// Only hidden messages
    #[arg(long, conflicts_with = "visible")]
    pub hidden: bool,

    /// Only visible messages
    #[arg(long)]
    pub visible: bool,

    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ChatBulkArgs {
    /// Message IDs
    pub ids: Vec<String>,

    /// Also select every message by this user; repeatable
    #[arg(short, long = "author")]
    pub authors: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ChatToggleArgs {
    /// Message ID
    pub id: String,
}

#[derive(Subcommand, Debug)]
pub enum TagsCommands {
    /// List tags
    List(JsonArgs),
    /// Add a tag
    Add(TagAddArgs),
    /// Remove a tag by its number in `tags list`
    Remove(IndexArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TagAddArgs {
    pub tag: String,
}

#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Number as shown in the list, starting at 1
    pub index: usize,
}

#[derive(Subcommand, Debug)]
pub enum VariantsCommands {
    /// Add a variant (unset options use the defaults)
    Add(VariantArgs),
    /// Edit a variant by its number in `video`
    Edit(VariantEditArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct VariantArgs {
    /// Video bitrate in kbps (0 = same as source)
    #[arg(long)]
    pub video_bitrate: Option<u32>,

    /// Audio bitrate in kbps (0 = same as source)
    #[arg(long)]
    pub audio_bitrate: Option<u32>,

    /// Frames per second (0 = same as source)
    #[arg(long)]
    pub framerate: Option<u32>,

    /// Encoder preset (e.g. veryfast)
    #[arg(long)]
    pub preset: Option<String>,

    /// Pass the inbound video through untouched
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub video_passthrough: Option<bool>,

    /// Pass the inbound audio through untouched
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub audio_passthrough: Option<bool>,
}

#[derive(Args, Debug, Clone)]
pub struct VariantEditArgs {
    /// Number as shown in `video`, starting at 1
    pub index: usize,

    #[command(flatten)]
    pub variant: VariantArgs,
}

#[derive(Args, Debug, Clone)]
pub struct SetArgs {
    /// Field to change (name, title, summary, logo, nsfw, stream-key,
    /// ffmpeg-path, web-port, rtmp-port, page-content, segment-length,
    /// playlist-items)
    pub field: ConfigField,

    /// New value
    pub value: String,
}

#[derive(Args, Debug, Clone, Default)]
pub struct WatchArgs {
    /// Override status poll interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "castctl.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
