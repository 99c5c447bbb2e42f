use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use guestlist_api::{AppState, AppStateInner, events, rsvps, stats};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guestlist=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let db_path = std::env::var("GUESTLIST_DB_PATH").unwrap_or_else(|_| "guestlist.db".into());
    let host = std::env::var("GUESTLIST_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("GUESTLIST_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database
    let db = guestlist_db::Database::open(&PathBuf::from(&db_path))?;

    // Shared state
    let state: AppState = Arc::new(AppStateInner { db });

    // Routes
    let app = Router::new()
        .route("/events", post(events::create_event))
        .route("/events/{slug}", get(events::get_event))
        .route("/events/{slug}/slots", get(events::get_slots))
        .route("/events/{slug}/rsvps", post(rsvps::submit_rsvp))
        .route("/events/{slug}/rsvps", get(rsvps::list_rsvps))
        .route("/events/{slug}/stats", get(stats::event_stats))
        .route("/rsvps/{id}", get(rsvps::get_rsvp))
        .route("/rsvps/{id}", patch(rsvps::revise_rsvp))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Guestlist server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
