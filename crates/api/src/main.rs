use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catapult_api::config::ServerConfig;
use catapult_api::router::build_app_router;
use catapult_api::state::AppState;
use catapult_core::builtin::builtin_templates;
use catapult_llm::openai::OpenAiClient;
use catapult_store::repositories::TemplateRepo;
use catapult_store::{BlobStore, StorageBackend};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "catapult_api=debug,catapult_store=debug,catapult_llm=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Storage ---
    let store = catapult_store::connect(&config.storage)
        .await
        .expect("Failed to open blob store");

    store.ping().await.expect("Blob store health check failed");
    tracing::info!(backend = store.backend_name(), "Blob store health check passed");

    // A fresh memory store is always empty, so it always gets the defaults.
    if config.seed_default_templates || matches!(config.storage, StorageBackend::Memory) {
        let written = TemplateRepo::seed_defaults(store.as_ref(), builtin_templates())
            .await
            .expect("Failed to seed default templates");
        tracing::info!(seeded = written.len(), "Default templates seeded");
    }

    // --- Text generation ---
    let generator = Arc::new(OpenAiClient::new(config.openai.clone()));
    tracing::info!(
        model = %config.openai.model,
        draft_model = %config.openai.draft_model,
        "Text generation client ready",
    );

    // --- App state + router ---
    let state = AppState::new(store, generator, config.clone());
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM (on Unix) to begin graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
