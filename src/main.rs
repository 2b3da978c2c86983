//! Plan Press server binary.
//!
//! Loads configuration from the environment, connects to PostgreSQL, wires
//! the plan handlers to their adapters and serves the HTTP API.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plan_press::adapters::http::{plan_routes, PlanHandlers};
use plan_press::adapters::pdf::PdfDocumentRenderer;
use plan_press::adapters::postgres::PostgresPlanStore;
use plan_press::adapters::storage::LocalArtifactStore;
use plan_press::application::handlers::plan::{
    DeleteOverrideHandler, RenderDocumentHandler, ResolvePlanHandler, UpdateNarrativeHandler,
    UpsertOverrideHandler,
};
use plan_press::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Configuration ---
    let config = AppConfig::load()?;
    config.validate()?;

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        environment = ?config.server.environment,
        "Loaded configuration"
    );

    // --- Database ---
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!("Database connection pool created");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // --- Adapters ---
    let store = Arc::new(PostgresPlanStore::new(pool));
    let artifacts = Arc::new(LocalArtifactStore::new(config.storage.artifact_root_path()));
    let renderer = Arc::new(PdfDocumentRenderer::new(artifacts));

    // --- Application handlers ---
    let handlers = PlanHandlers::new(
        Arc::new(ResolvePlanHandler::new(store.clone())),
        Arc::new(UpsertOverrideHandler::new(store.clone())),
        Arc::new(DeleteOverrideHandler::new(store.clone())),
        Arc::new(UpdateNarrativeHandler::new(store.clone())),
        Arc::new(RenderDocumentHandler::new(store, renderer)),
    );

    // --- Middleware ---
    let cors = build_cors_layer(&config.server)?;
    let request_id_header = HeaderName::from_static("x-request-id");

    // Layers apply bottom-up.
    let app = plan_routes(handlers)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors);

    // --- Start server ---
    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Build the CORS layer from server configuration.
///
/// Without configured origins the layer stays permissive, which suits local
/// development. A misconfigured origin fails startup.
fn build_cors_layer(config: &ServerConfig) -> Result<CorsLayer, Box<dyn Error>> {
    let origins = config.cors_origins_list();
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let mut values = Vec::with_capacity(origins.len());
    for origin in &origins {
        let value: HeaderValue = origin
            .parse()
            .map_err(|e| format!("Invalid CORS origin '{origin}': {e}"))?;
        values.push(value);
    }

    Ok(CorsLayer::new()
        .allow_origin(values)
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-user-id")])
        .max_age(Duration::from_secs(3600)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
