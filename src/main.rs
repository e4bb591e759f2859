//! maestro-server binary - composition root.
//!
//! 1. Parse the command line and load `.env`
//! 2. Load and validate `maestro.toml` (a configuration error stops the process)
//! 3. Build providers, tools, memory, the agent registry and the orchestrator
//! 4. Serve the axum API until Ctrl-C

use anyhow::Context;
use maestro::api::routes::create_router;
use maestro::cli::{self, Cli, Commands};
use maestro::{AppState, MaestroConfig};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse_args();
    let output = args.output();

    match &args.command {
        Some(Commands::CheckConfig) => {
            if cli::check_config(&args, &output).is_err() {
                std::process::exit(1);
            }
            return Ok(());
        }
        Some(Commands::Agents) => {
            let config = match cli::check_config(&args, &output) {
                Ok(config) => config,
                Err(_) => std::process::exit(1),
            };
            cli::show_agents(&config, &output)?;
            return Ok(());
        }
        None => {}
    }

    let config = match MaestroConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            output.error(&format!("Refusing to start: {}", e));
            std::process::exit(1);
        }
    };

    let level = if args.verbose { "debug" } else { config.server.log_level.as_str() };
    init_tracing(level, args.log_json);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config)
        .await
        .context("failed to initialise the server")?;

    tracing::info!(
        domains = ?state.orchestrator.registry().domains(),
        default_domain = %state.orchestrator.router().default_domain(),
        memory = state.memory.as_ref().map(|m| m.name()).unwrap_or("disabled"),
        "Agents registered"
    );

    let app = create_router()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind, is another instance running?");
            return Err(e.into());
        }
    };

    output.banner(&addr);
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
