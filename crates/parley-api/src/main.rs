//! Parley CLI and HTTP server entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, sets up tracing, then either starts the HTTP server
//! or runs one of the offline chat history commands.

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use parley_api::cli::{self, Cli, Commands};
use parley_api::http;
use parley_api::state::AppState;
use parley_infra::filesystem::resolve_data_dir;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let enable_otel = matches!(cli.command, Commands::Serve { otel: true, .. });
    parley_observe::init_tracing(enable_otel, cli.log_filter())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = cli.data_dir.clone().unwrap_or_else(resolve_data_dir);

    let result = match cli.command {
        Commands::Serve { host, port, .. } => serve(data_dir, host, port, cli.quiet).await,
        Commands::List => cli::chats::list_chats(&data_dir, cli.json).await,
        Commands::Show { session_id } => {
            cli::chats::show_chat(&data_dir, &session_id, cli.json).await
        }
        Commands::Delete { session_ids } => {
            cli::chats::delete_chats(&data_dir, &session_ids, cli.json).await
        }
        Commands::Completions { .. } => Ok(()),
    };

    parley_observe::shutdown_tracing();
    result
}

/// Run the HTTP server until Ctrl+C or SIGTERM, then save the chat history.
async fn serve(
    data_dir: std::path::PathBuf,
    host: Option<String>,
    port: Option<u16>,
    quiet: bool,
) -> anyhow::Result<()> {
    let state = AppState::init(data_dir).await?;

    let host = host.unwrap_or_else(|| state.config.server.host.clone());
    let port = port.unwrap_or(state.config.server.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    if !quiet {
        println!(
            "  {} Parley listening on {} ({})",
            console::style("⚡").bold(),
            console::style(format!("http://{addr}")).cyan(),
            console::style(&state.config.model.name).dim()
        );
        println!("  {}", console::style("Press Ctrl+C to stop").dim());
    }

    let router = http::router::build_router(state.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state
        .controller
        .lock()
        .await
        .flush()
        .await
        .context("failed to save chat history on shutdown")?;

    if !quiet {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
