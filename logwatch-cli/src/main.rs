use std::process::ExitCode;

use clap::Parser;

use logwatch_cli::cli::{Cli, Commands};
use logwatch_cli::commands;
use logwatch_cli::error::CliError;
use logwatch_cli::logging::init_tracing;
use logwatch_cli::output::OutputWriter;
use logwatch_core::config::GeneralConfig;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, exit_code = e.exit_code(), "logwatch failed");
            eprintln!("error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Run(args) => {
            let mut config = commands::load_config(cli.config.as_deref()).await?;
            if let Some(level) = cli.log_level {
                config.general.log_level = level;
                config.validate()?;
            }
            init_tracing(&config.general).map_err(|e| CliError::Config(e.to_string()))?;

            commands::run::execute(args, config, &writer).await
        }
        Commands::Config(args) => {
            // 설정 자체를 검사하는 명령이므로 로깅은 기본값으로 초기화
            let mut general = GeneralConfig::default();
            if let Some(level) = cli.log_level {
                general.log_level = level;
            }
            init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;

            commands::config::execute(args, cli.config.as_deref(), &writer).await
        }
    }
}
