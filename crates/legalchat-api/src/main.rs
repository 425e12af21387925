//! legalchat CLI and HTTP API entry point.
//!
//! Binary name: `legalchat`
//!
//! Loads `.env`, parses arguments, initializes tracing, builds the agent
//! (refusing to start without credentials), then runs the terminal chat or
//! the HTTP server.

mod cli;
mod http;
mod state;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use legalchat_core::agent::BoxReasoningAgent;
use legalchat_core::agent::prompt::LEGAL_SYSTEM_PROMPT;
use legalchat_core::chat::service::ConversationService;
use legalchat_core::chat::store::{SessionLimits, SessionStore};
use legalchat_infra::credentials::{Credentials, load_dotenv};
use legalchat_infra::factory::build_agent;
use legalchat_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use legalchat_types::config::ServerSettings;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing so `.env` values feed the clap env fallbacks.
    load_dotenv();
    let cli = Cli::parse();

    let options = TracingOptions::from_verbosity(cli.verbose, cli.quiet)
        .with_json(cli.log_json)
        .with_otel(cli.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = cli.agent.settings();
    let credentials = Credentials::from_env()?;
    let agent = build_agent(&settings, &credentials)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let service = ConversationService::with_prompt(agent, LEGAL_SYSTEM_PROMPT, settings.prompt_placement);
            cli::chat::run(&service).await
        }
        Commands::Serve {
            host,
            port,
            max_sessions,
            session_idle_secs,
        } => {
            let server = ServerSettings {
                host,
                port,
                max_sessions,
                session_idle_secs,
            };
            let state = AppState::new(
                BoxReasoningAgent::new(agent),
                settings.prompt_placement,
                SessionLimits::from(&server),
            );
            serve(state, &server).await
        }
    }
}

async fn serve(state: AppState, server: &ServerSettings) -> anyhow::Result<()> {
    let addr = server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} legalchat API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let sweeper = tokio::spawn(sweep_idle_sessions(Arc::clone(&state.sessions)));
    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    sweeper.abort();

    println!("\n  Server stopped.");
    Ok(())
}

/// Periodically drop sessions that have gone idle.
async fn sweep_idle_sessions(sessions: Arc<SessionStore>) {
    let period = (sessions.limits().idle_ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        sessions.evict_idle();
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
}
