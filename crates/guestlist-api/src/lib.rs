pub mod error;
pub mod events;
pub mod rsvps;
pub mod stats;

use std::sync::Arc;

use guestlist_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}
