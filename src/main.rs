//! Blind Timer - a poker tournament blind-level clock
//!
//! This is the main entry point for the blind-timer server.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use blind_timer::{
    api::{create_router, ApiState},
    config::Config,
    queue::{DirQueue, MessageQueue},
    state::Engine,
    store::FileStore,
    tasks::queue_consumer_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("blind_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting blind-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, state_file={}",
          config.host, config.port, config.state_file.display());

    // Storage must be usable before any traffic is accepted
    let store = FileStore::new(&config.state_file);
    store
        .check_writable()
        .await
        .with_context(|| format!("state file {} is not usable", config.state_file.display()))?;

    let auth = config.auth();
    if auth.api_tokens.is_empty() {
        tracing::warn!("No API tokens configured, structured writes will be rejected");
    }
    if auth.slack_secrets.is_empty() || auth.slack_users.is_empty() {
        tracing::warn!("Chat signing secrets or users missing, chat commands will be rejected");
    }

    // Start the queue consumer if a spool directory is configured
    if let Some(dir) = &config.queue_dir {
        let queue = DirQueue::new(dir);
        queue
            .check_available()
            .await
            .with_context(|| format!("queue directory {} is not usable", dir.display()))?;

        let engine = Arc::new(Engine::new(Arc::new(store.clone())));
        let queue: Arc<dyn MessageQueue> = Arc::new(queue);
        let poll = config.queue_poll_interval();
        tokio::spawn(async move {
            queue_consumer_task(engine, queue, poll).await;
        });
    }

    // Create HTTP router with all endpoints
    let state = Arc::new(ApiState::new(Engine::new(Arc::new(store)), auth));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /state  - Current level (escalates if due)");
    info!("  POST /state  - Update interval/blinds/pause/resume (token)");
    info!("  POST /pause  - Pause the clock (token)");
    info!("  POST /resume - Resume the clock (token)");
    info!("  POST /slack  - Signed chat command");
    info!("  GET  /health - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
