use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fxb")]
#[command(about = "FX bracket strategy replay CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> overlays)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Replay an event script against the bracket strategy on the paper host
    Replay {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Event script CSV
        #[arg(long)]
        events: String,

        /// Write run artifacts under this directory
        #[arg(long)]
        exports: Option<String>,

        /// Fail instead of warn when the config has keys nothing reads
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent if missing.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::ConfigHash { paths } => commands::config_hash(&paths),
        Commands::Replay {
            config_paths,
            events,
            exports,
            strict_config,
        } => commands::replay::run_replay(commands::replay::ReplayArgs {
            config_paths,
            events,
            exports,
            strict_config,
        }),
    }
}
