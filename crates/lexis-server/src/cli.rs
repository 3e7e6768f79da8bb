use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lexis", version, about = "Keyword generation and dedup service")]
pub struct Cli {
    #[arg(long, global = true, help = "TOML configuration file (default: $LEXIS_CONFIG)")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Serve the HTTP trigger (GET / health, POST / run).
    Serve {
        #[arg(long, help = "Override server.port")]
        port: Option<u16>,
    },
    /// Execute one run and print its report as JSON.
    Run {
        #[arg(long, help = "Skip the corpus read and treat it as empty")]
        no_dedup: bool,
    },
    /// Print the readiness payload.
    Health,
}
