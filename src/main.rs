//! CLI entry point for akr.

mod commands;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(
    name = "akr",
    version,
    about = "Reconstructs operator keystrokes from terminal audit logs and replays extracted queries"
)]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct commands from an audit log and replay qualifying queries
    Replay {
        /// Path to the audit log
        log: PathBuf,

        /// Reconstruct, correlate, and classify, but skip the network
        #[arg(long)]
        dry_run: bool,

        /// Override the remote query host
        #[arg(long)]
        host: Option<String>,

        /// Override the client certificate path
        #[arg(long)]
        cert: Option<PathBuf>,

        /// Override the client key path
        #[arg(long)]
        key: Option<PathBuf>,

        /// Directory for the output artifacts
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Accept invalid or self-signed server certificates (unsafe)
        #[arg(long)]
        insecure: bool,
    },

    /// Decode one raw keystroke segment and print the reconstructed text
    Parse {
        /// Raw segment; read from stdin when omitted
        segment: Option<String>,
    },

    /// Configuration management
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
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Replay {
            log,
            dry_run,
            host,
            cert,
            key,
            out_dir,
            insecure,
        } => commands::replay::handle_replay(commands::replay::ReplayOptions {
            log,
            dry_run,
            host,
            cert,
            key,
            out_dir,
            insecure,
        }),
        Commands::Parse { segment } => commands::parse::handle_parse(segment.as_deref()),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::handle_show(),
            ConfigAction::Path => commands::config::handle_path(),
        },
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "akr", &mut io::stdout());
            Ok(())
        }
    }
}
