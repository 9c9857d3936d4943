//! CodeArena - Application Entry Point
//!
//! This is the main entry point for the CodeArena judging server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use bollard::Docker;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codearena::{
    config::Config,
    constants::API_BASE_PATH,
    handlers,
    intake::SubmissionIntake,
    judge::{DockerSandbox, JudgeEngine},
    leaderboard::Leaderboard,
    registry::ContestRegistry,
    state::AppState,
    store::SubmissionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CodeArena server...");

    // Initialize Docker client backing the sandbox
    tracing::info!("Connecting to Docker...");
    let docker = Docker::connect_with_socket_defaults()?;
    let docker_info = docker.version().await?;
    tracing::info!(
        "Connected to Docker version: {}",
        docker_info.version.unwrap_or_default()
    );

    // Construct the engine's owned stores explicitly
    let registry = Arc::new(ContestRegistry::new());
    let submissions = Arc::new(SubmissionStore::new());
    let leaderboard = Arc::new(Leaderboard::new());
    let sandbox = Arc::new(DockerSandbox::new(docker));

    // Start the judging worker pool
    let engine = JudgeEngine::start(
        config.judge.clone(),
        Arc::clone(&registry),
        Arc::clone(&submissions),
        Arc::clone(&leaderboard),
        sandbox,
    );

    let intake = SubmissionIntake::new(
        Arc::clone(&registry),
        Arc::clone(&submissions),
        engine.queue(),
    );

    // Create application state
    let state = AppState::new(
        config.clone(),
        registry,
        submissions,
        leaderboard,
        intake,
    );

    // Build the router
    let app = Router::new()
        .nest(API_BASE_PATH, handlers::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    // Drain in-flight judging before exit
    engine.shutdown().await;

    Ok(())
}
