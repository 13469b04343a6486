//! REST API over a [`Store`].
//!
//! Every JSON response uses the same envelope as the CLI's `--json` output:
//! `{"success": true, "data": ...}` or `{"success": false, "error": {...}}`.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::db::Store;
use crate::error::PearlError;

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<Store>>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Run a repository call on the blocking pool while holding the store.
    /// rusqlite calls block, so they stay off the async workers.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, PearlError>
    where
        F: FnOnce(&Store) -> Result<T, PearlError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store).lock_owned().await;
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| PearlError::database(format!("Store task failed: {e}")))?
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/tasks/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route(
            "/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/recurrence/preview", post(handlers::preview_recurrence))
        .route("/calendar", get(handlers::calendar))
        .route("/stats", get(handlers::statistics))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    tracing::info!(%method, %uri, status = response.status().as_u16(), "request");
    response
}

/// A running API server.
///
/// Owns the store for its lifetime; [`ApiServer::shutdown`] stops accepting
/// requests, waits for in-flight ones, then closes the store.
pub struct ApiServer {
    addr: SocketAddr,
    store: Arc<Mutex<Store>>,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl ApiServer {
    /// Bind `{host}:{port}` (port `0` picks a free one) and start serving in
    /// a background task.
    pub async fn start(store: Store, host: &str, port: u16) -> Result<Self, PearlError> {
        let state = AppState::new(store);
        let store = Arc::clone(&state.store);
        let app = router(state);

        let bind_addr = format!("{host}:{port}");
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| PearlError::config(format!("Cannot bind {bind_addr}: {e}")))?;
        let addr = listener
            .local_addr()
            .map_err(|e| PearlError::config(format!("Cannot read local address: {e}")))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                tracing::error!(error = %e, "API server error");
            }
        });

        tracing::info!("API listening on http://{addr}");
        Ok(Self {
            addr,
            store,
            shutdown_tx,
            handle,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(self) -> Result<(), PearlError> {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "API server task ended abnormally");
        }
        match Arc::try_unwrap(self.store) {
            Ok(store) => store.into_inner().close()?,
            Err(_) => tracing::warn!("store still shared at shutdown; leaving it to drop"),
        }
        tracing::info!("API server stopped");
        Ok(())
    }
}
