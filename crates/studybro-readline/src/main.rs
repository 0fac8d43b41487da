mod cli;
mod commands;
mod helper;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use studybro_application::{ChatService, DoubtSolverUseCase, ProfileService};
use studybro_infrastructure::secret_service::api_key_from_env;
use studybro_infrastructure::{
    ConfigService, FileMediaStore, JsonHistoryRepository, JsonProfileRepository, StudyPaths,
};
use studybro_interaction::GeminiApiClient;
use tracing_appender::non_blocking::WorkerGuard;

use crate::cli::Cli;
use crate::repl::Repl;

/// Terminal logging stays quiet unless `RUST_LOG` asks for more; the rolling
/// file under the logs directory records `info` and above.
fn init_logging(logs_dir: &Path) -> Result<WorkerGuard> {
    use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("failed to create log directory {}", logs_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(logs_dir, "studybro.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let terminal_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let file_filter = EnvFilter::new("warn,studybro=info");

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(terminal_filter),
        )
        .with(
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .try_init()
        .ok();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ===== Configuration =====
    let mut paths = StudyPaths::new(cli.data_dir.as_deref());
    let config_service = match &cli.config {
        Some(path) => ConfigService::new(path.clone()),
        None => ConfigService::from_paths(&paths)?,
    };
    if cli.config.is_none() {
        if let Err(e) = config_service.ensure_config_file() {
            eprintln!("Could not write default config: {e}");
        }
    }
    let config = config_service.load()?;

    if cli.data_dir.is_none() {
        if let Some(data_dir) = config.storage.data_dir.as_deref() {
            paths = StudyPaths::new(Some(data_dir));
        }
    }

    let _log_guard = init_logging(&paths.logs_dir()?)?;
    tracing::info!("[Main] Using config {:?}", config_service.path());

    // ===== Backend Initialization =====
    let api_key = api_key_from_env().context("StudyBro needs a Gemini API key")?;
    let provider = Arc::new(
        GeminiApiClient::new(api_key, config.provider.clone()).with_video_settings(config.video.clone()),
    );
    let history = Arc::new(JsonHistoryRepository::from_paths(&paths)?);
    let profiles = Arc::new(JsonProfileRepository::from_paths(&paths)?);
    let media = Arc::new(FileMediaStore::from_paths(&paths)?);

    let session_config = cli.apply_overrides(config.session.to_session_config());
    session_config.validate()?;

    let solver = DoubtSolverUseCase::new(provider, history, media, session_config);
    let repl = Repl::new(solver, ProfileService::new(profiles), ChatService::new());

    repl.run().await
}
