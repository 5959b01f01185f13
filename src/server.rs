//! Router assembly and the HTTP server loop.

use axum::Router;
use axum::routing::{get, post};
use derive_new::new;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

use crate::db::EmployeeStore;
use crate::routes::{self, calculator, employees, game};
use crate::session::SessionManager;

/// Shared handles every handler can reach.
#[derive(Clone, new)]
pub struct AppState {
    /// Guessing-game sessions.
    pub sessions: SessionManager,
    /// Employee storage backend.
    pub employees: Arc<dyn EmployeeStore>,
    /// Repetition rule for new games that do not pick one.
    pub default_allow_repeats: bool,
}

fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/api/game/newgame", post(game::new_game))
        .route("/api/game/guess", post(game::guess))
        .route("/api/game/{id}/history", get(game::history))
}

fn calculator_routes() -> Router<AppState> {
    Router::new().route("/api/calculator/{op}", post(calculator::calculate))
}

fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/api/employees", get(employees::list).post(employees::create))
        .route("/api/employees/search", get(employees::search))
        .route("/api/employees/departments", get(employees::departments))
        .route(
            "/api/employees/{id}",
            get(employees::get)
                .put(employees::update)
                .delete(employees::deactivate),
        )
}

/// Builds the full application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .merge(game_routes())
        .merge(calculator_routes())
        .merge(employee_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Periodically drops game sessions idle for `max_idle`.
///
/// Runs until the returned handle is aborted.
#[instrument(skip(sessions))]
pub fn spawn_session_sweeper(sessions: SessionManager, max_idle: Duration) -> JoinHandle<()> {
    let period = (max_idle / 2).max(Duration::from_secs(1));
    info!(?period, "Starting idle session sweeper");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match sessions.prune_idle(max_idle) {
                Ok(removed) => debug!(removed, "Sweep finished"),
                Err(e) => warn!(error = %e, "Sweep failed"),
            }
        }
    })
}

/// Serves `state` on `listener` until Ctrl+C.
///
/// # Errors
///
/// Returns the I/O error that stopped the server.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let address = listener.local_addr()?;
    let app = app_router(state);

    info!(%address, "Server ready at http://{}/", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
