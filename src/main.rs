//! webvirt CLI entry point.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;

/// webvirt - A webserver serving a REST-inspired API for managing libvirt virtual machines
#[derive(Parser, Debug)]
#[command(name = "webvirt")]
#[command(about = "A webserver serving a REST-inspired API for managing libvirt virtual machines")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Server options when no subcommand is given.
    #[command(flatten)]
    serve: cli::serve::ServeCmd,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API (default).
    Serve(cli::serve::ServeCmd),

    /// Export the OpenAPI specification.
    Openapi(cli::openapi::OpenapiCmd),
}

fn main() {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Serve(cli.serve));

    let verbose = matches!(&command, Commands::Serve(cmd) if cmd.verbose);
    init_logging(verbose);

    tracing::debug!(version = webvirt::VERSION, "starting webvirt");

    let result = match command {
        Commands::Serve(cmd) => cmd.run(),
        Commands::Openapi(cmd) => cmd.run(),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber.
fn init_logging(verbose: bool) {
    let default = if verbose { "webvirt=debug,tower_http=debug" } else { "webvirt=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
