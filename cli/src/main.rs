//! CLI entrypoint for verdict
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use verdict_application::{AskExpertInput, AskExpertUseCase, SessionRegistry};
use verdict_infrastructure::{ConfigLoader, FileConfig, GeminiGateway, JsonlConversationLogger};
use verdict_presentation::{Cli, Command, ConsoleFormatter, CookieSettings, ServerSettings, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_tracing(cli.verbose, config.logging.dir.as_deref());

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let issues = config.validate();
    for issue in &issues {
        if issue.is_fatal() {
            error!("Configuration error: {}", issue);
        } else {
            warn!("Configuration warning: {}", issue);
        }
    }
    if issues.iter().any(|issue| issue.is_fatal()) {
        bail!("Invalid configuration; run with --show-config to see which files are loaded");
    }

    info!("Starting verdict");

    // === Dependency Injection ===
    let use_case = Arc::new(build_use_case(&config)?);

    match command {
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

            let settings = ServerSettings {
                allowed_origins: config.server.allowed_origins.clone(),
                cookie: CookieSettings {
                    name: config.server.cookie_name.clone(),
                    max_age: Duration::from_secs(config.server.cookie_max_age_secs),
                },
            };
            let router = create_router(use_case, &settings);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!("Listening on http://{}", addr);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            info!("Server stopped");
        }

        Command::Ask {
            message,
            session,
            output,
        } => {
            let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let result = use_case
                .execute(AskExpertInput::new(session_id, message))
                .await?;
            println!("{}", ConsoleFormatter::render(&result, output.into()));
        }
    }

    Ok(())
}

/// Console logging chosen by `-v`, plus daily rolling files when a log dir is configured.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "verdict.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    guard
}

fn build_use_case(config: &FileConfig) -> Result<AskExpertUseCase<GeminiGateway>> {
    let params = config.sessions.to_session_params();
    let gateway = GeminiGateway::new(config.backend.to_gemini_config(None))
        .context("Failed to initialize the Gemini backend")?;

    let mut registry =
        SessionRegistry::new(Arc::new(gateway), config.backend.model()).with_params(params);

    if let Some(path) = &config.logging.conversation_log {
        match JsonlConversationLogger::open(path) {
            Ok(logger) => {
                info!("Writing conversation transcript to {}", logger.path().display());
                registry = registry.with_logger(Arc::new(logger));
            }
            Err(e) => warn!(
                "Could not open conversation log {}: {}",
                path.display(),
                e
            ),
        }
    }

    Ok(AskExpertUseCase::new(
        Arc::new(registry),
        config.prompts.to_panel_config(),
    ))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
