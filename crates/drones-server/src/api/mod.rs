//! API routes for the drones server.

pub mod categories;
pub mod competitions;
pub mod drones;
pub mod error;
pub mod extract;
pub mod links;
pub mod pagination;
pub mod pilots;
pub mod request_id;
mod routes;

use axum::Router;

pub fn routes() -> Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}
