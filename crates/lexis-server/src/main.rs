use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use lexis_core::LexisConfig;
use lexis_pipeline::DedupPipeline;
use lexis_server::cli::{Cli, Commands};
use lexis_server::tracing_setup::init_tracing;
use lexis_server::{health_payload, serve, wiring};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("lexis: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.command == Commands::Health {
        println!("{}", serde_json::to_string_pretty(&health_payload())?);
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = LexisConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.observability);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
            runtime.block_on(serve(config))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { no_dedup } => {
            if no_dedup {
                config.pipeline.check_duplicates = false;
            }
            let env = wiring::production_environment(&config);
            let pipeline = DedupPipeline::new(config, env);
            match pipeline.run() {
                Ok(report) => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                    Ok(if report.is_clean_success() {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::FAILURE
                    })
                }
                Err(aborted) => {
                    error!(error = %aborted.error, "run aborted");
                    println!("{}", serde_json::to_string_pretty(&aborted.report)?);
                    Err(aborted.into())
                }
            }
        }
        Commands::Health => Ok(ExitCode::SUCCESS),
    }
}
