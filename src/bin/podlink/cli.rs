//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use podlink::util::shell::ColorChoice;

/// podlink - links generated pod xcconfigs into user build configurations
#[derive(Parser)]
#[command(name = "podlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Output format for messages
    #[arg(long, global = true, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MessageFormat {
    Human,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Point target build configurations at the generated xcconfigs
    Integrate(IntegrateArgs),

    /// Show how each build configuration relates to the generated xcconfigs
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Locating the project and describing the bundle.
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to Project.toml (defaults to searching upward from the cwd)
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Aggregate target label used in generated file names
    #[arg(long)]
    pub label: Option<String>,

    /// Sandbox directory, relative to the project directory
    #[arg(long)]
    pub sandbox: Option<PathBuf>,

    /// Directory holding the label's xcconfigs, relative to the project directory
    #[arg(long)]
    pub support_files_dir: Option<PathBuf>,

    /// Build configurations an xcconfig was generated for (repeatable)
    #[arg(long = "configuration")]
    pub configurations: Vec<String>,
}

#[derive(Args)]
pub struct IntegrateArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Only integrate these targets (repeatable)
    #[arg(short, long = "target")]
    pub targets: Vec<String>,

    /// Report what would change without saving the project
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the build setting override check
    #[arg(long)]
    pub no_override_check: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
