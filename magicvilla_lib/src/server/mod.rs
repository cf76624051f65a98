//! HTTP server exposing the villa repository at `/api/villa`.
//!
//! Every response body is a result envelope, including errors produced by
//! the handlers. Extractor rejections (malformed JSON, non-numeric ids)
//! keep axum's plain-text bodies.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Db;
use crate::error::VillaError;

mod resp;
mod villa;

/// Shared handler state: the repository behind a mutex.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Db>>,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    fn db(&self) -> MutexGuard<'_, Db> {
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn build_app(state: AppState) -> Router {
    villa::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves on an already-bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<(), VillaError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Opens the configured database, binds the configured address and serves
/// until Ctrl-C.
pub async fn serve(config: &Config) -> Result<(), VillaError> {
    let db = Db::open(&config.db_path)?;
    db.init()?;
    tracing::info!(
        "Opened villa store {} with {} villas",
        config.db_path.display(),
        db.count()?
    );

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    serve_on(listener, AppState::new(db), async {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Shutdown signal received");
    })
    .await
}
