//! Scriptbind CLI
//!
//! Runs the generator outside of `build.rs`: writes artifacts to a
//! directory, checks that generation would succeed, or dumps the metadata
//! extracted for one trait.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scriptbind")]
#[command(about = "Generate bindings for traits implemented by scripts", long_about = None)]
#[command(version)]
struct Cli {
    /// Log generator progress at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate factories, adapters and declaration files
    Generate {
        /// Generator configuration
        #[arg(short, long, default_value = "scriptbind.toml")]
        config: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = "target/scriptbind")]
        out_dir: PathBuf,
    },

    /// Run generation without writing anything and report diagnostics
    Check {
        /// Generator configuration
        #[arg(short, long, default_value = "scriptbind.toml")]
        config: PathBuf,
    },

    /// Print the metadata extracted for one trait as JSON
    Inspect {
        /// Fully qualified trait path (e.g. app::scripts::Calculator)
        interface: String,
        /// Generator configuration
        #[arg(short, long, default_value = "scriptbind.toml")]
        config: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let color = output::resolve_color_choice(cli.color.as_deref());

    let ok = match cli.command {
        Commands::Generate { config, out_dir } => commands::generate::execute(&config, &out_dir, color)?,
        Commands::Check { config } => commands::check::execute(&config, color)?,
        Commands::Inspect { interface, config } => commands::inspect::execute(&config, &interface)?,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
