//! REST API routes.

use axum::{
    extract::State,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::links::{UrlBuilder, CATEGORIES, COMPETITIONS, DRONES, PILOTS};
use crate::api::{categories, competitions, drones, pilots, request_id};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api_root))
        .route("/health", get(|| async { "OK" }))
        .route(
            "/drone-categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/drone-categories/:pk",
            get(categories::get_category)
                .put(categories::replace_category)
                .patch(categories::patch_category)
                .delete(categories::delete_category),
        )
        .route(
            "/drones",
            get(drones::list_drones).post(drones::create_drone),
        )
        .route(
            "/drones/:pk",
            get(drones::get_drone)
                .put(drones::replace_drone)
                .patch(drones::patch_drone)
                .delete(drones::delete_drone),
        )
        .route(
            "/pilots",
            get(pilots::list_pilots).post(pilots::create_pilot),
        )
        .route(
            "/pilots/:pk",
            get(pilots::get_pilot)
                .put(pilots::replace_pilot)
                .patch(pilots::patch_pilot)
                .delete(pilots::delete_pilot),
        )
        .route(
            "/competitions",
            get(competitions::list_competitions).post(competitions::create_competition),
        )
        .route(
            "/competitions/:pk",
            get(competitions::get_competition)
                .put(competitions::replace_competition)
                .patch(competitions::patch_competition)
                .delete(competitions::delete_competition),
        )
        .layer(middleware::from_fn(request_id::ensure_request_id))
}

/// Entry point listing the collections.
async fn api_root(State(state): State<Arc<AppState>>) -> Json<Value> {
    let urls = UrlBuilder::new(state.config());
    Json(json!({
        (CATEGORIES): urls.collection_url(CATEGORIES),
        (DRONES): urls.collection_url(DRONES),
        (PILOTS): urls.collection_url(PILOTS),
        (COMPETITIONS): urls.collection_url(COMPETITIONS),
    }))
}
