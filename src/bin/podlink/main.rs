//! podlink CLI - links generated pod xcconfigs into user build configurations

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use podlink::core::BundleError;
use podlink::util::diagnostic::suggestions;
use podlink::util::{Diagnostic, Shell};

fn main() {
    if let Err(e) = run() {
        eprint!("{}", error_diagnostic(&e).format(false));
        std::process::exit(1);
    }
}

fn error_diagnostic(err: &anyhow::Error) -> Diagnostic {
    let diagnostic = Diagnostic::error(format!("{:#}", err));
    if err.chain().any(|cause| cause.is::<BundleError>()) {
        diagnostic.with_suggestion(suggestions::UNKNOWN_CONFIGURATION)
    } else {
        diagnostic
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("podlink=debug")
    } else {
        EnvFilter::new("podlink=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    match cli.command {
        Commands::Integrate(args) => commands::integrate::execute(args, &shell),
        Commands::Status(args) => commands::status::execute(args, &shell),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
