//! CLI entrypoint for planning-poker
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod simulate;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use poker_application::{
    NoSessionEventLogger, PlanningPokerService, SessionEventLogger, SessionRegistry,
    SweepSessionsUseCase,
};
use poker_domain::{ConfigIssue, Deck, OutputFormat};
use poker_infrastructure::{ConfigLoader, FileConfig, JsonResultsExporter, JsonlSessionEventLogger};
use poker_presentation::{Cli, Command, ConsoleFormatter, ServeArgs, poker_router};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // Keep the guard alive so the log file is flushed on exit
    let _log_guard = init_tracing(cli.verbose, config.logging.log_file.as_deref())?;

    let issues = config.validate();
    for issue in &issues {
        eprintln!("{}", issue);
    }
    if ConfigIssue::has_errors(&issues) {
        bail!("Invalid configuration");
    }

    info!("Starting planning-poker");

    match cli.command {
        Some(Command::Serve(args)) => serve(&config, args).await,
        Some(Command::Simulate(args)) => simulate::run(&config, args).await,
        Some(Command::Deck { format }) => {
            let output = match format {
                OutputFormat::Text => ConsoleFormatter::format_deck(),
                OutputFormat::Json => ConsoleFormatter::format_json(&Deck::values()),
            };
            println!("{}", output);
            Ok(())
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Console logging by verbosity, plus a daily rolling file when configured.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("log_file {} has no file name", path.display()))?;
            let appender = tracing_appender::rolling::daily(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn event_logger(config: &FileConfig) -> Arc<dyn SessionEventLogger> {
    match config
        .logging
        .event_log
        .as_ref()
        .and_then(JsonlSessionEventLogger::new)
    {
        Some(logger) => {
            info!("Session events go to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoSessionEventLogger),
    }
}

/// The service with every configured adapter plugged in.
fn build_service(
    config: &FileConfig,
    registry: Arc<SessionRegistry>,
    events: Arc<dyn SessionEventLogger>,
) -> PlanningPokerService {
    let mut service = PlanningPokerService::new(registry, config.session.to_registry_config())
        .with_event_logger(events);
    if let Some(dir) = &config.export.results_dir {
        info!("Results are exported to {}", dir.display());
        service = service.with_results_exporter(Arc::new(JsonResultsExporter::new(dir)));
    }
    service
}

async fn serve(config: &FileConfig, args: ServeArgs) -> Result<()> {
    let addr = match &args.bind {
        Some(bind) => bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind))?,
        None => config.server.parse_bind().0,
    };

    // === Dependency Injection ===
    let registry = Arc::new(SessionRegistry::new());
    let events = event_logger(config);
    let service = Arc::new(build_service(config, Arc::clone(&registry), Arc::clone(&events)));

    let cancel = CancellationToken::new();
    let sweeper = SweepSessionsUseCase::new(registry, config.session.to_registry_config())
        .with_event_logger(events);
    let sweeper_task = tokio::spawn(sweeper.run(cancel.clone()));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    println!("Planning poker listening on http://{}", listener.local_addr()?);

    axum::serve(listener, poker_router(service))
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await
        .context("Server error")?;

    cancel.cancel();
    sweeper_task.await.context("Sweeper task failed")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
    cancel.cancel();
}
