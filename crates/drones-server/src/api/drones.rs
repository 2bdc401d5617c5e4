//! Drone endpoints.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use drones_core::{
    parse_drone, present_drone, DroneRepresentation, PresentError, RecordLookup, WriteMode,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::extract::{JsonBody, QueryParams};
use crate::api::links::{UrlBuilder, DRONES};
use crate::api::pagination::{paginate, Page, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DroneFilter {
    pub name: Option<String>,
    /// Category name.
    pub drone_category: Option<String>,
    pub has_it_competed: Option<bool>,
}

pub async fn list_drones(
    State(state): State<Arc<AppState>>,
    QueryParams(page): QueryParams<PageQuery>,
    QueryParams(filter): QueryParams<DroneFilter>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Page<DroneRepresentation>>, ApiError> {
    let urls = UrlBuilder::new(state.config());

    // An unknown category name matches nothing rather than everything.
    let category_id = match filter.drone_category.as_deref() {
        Some(name) => Some(state.category_by_name(name).map(|c| c.id)),
        None => None,
    };

    let drones = state
        .list_drones()
        .into_iter()
        .filter(|d| filter.name.as_ref().map_or(true, |name| &d.name == name))
        .filter(|d| category_id.map_or(true, |id| id == Some(d.drone_category_id)))
        .filter(|d| {
            filter
                .has_it_competed
                .map_or(true, |competed| d.has_it_competed == competed)
        })
        .collect();

    let window = paginate(
        drones,
        &page,
        state.config(),
        &urls.collection_url(DRONES),
        raw.as_deref(),
    )?;
    Ok(Json(window.map(|d| present_drone(d, &*state, &urls))?))
}

pub async fn get_drone(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
) -> Result<Json<DroneRepresentation>, ApiError> {
    let drone = state
        .drone(pk)
        .ok_or_else(|| PresentError::not_found("drone", pk))?;
    let urls = UrlBuilder::new(state.config());
    Ok(Json(present_drone(&drone, &*state, &urls)?))
}

pub async fn create_drone(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody,
) -> Result<(StatusCode, Json<DroneRepresentation>), ApiError> {
    let _writes = state.lock_writes().await;
    let draft = parse_drone(&input, &*state, WriteMode::Create)?;
    let drone = state.create_drone(draft).await?;
    tracing::info!("Created drone '{}' ({})", drone.name, drone.id);

    let urls = UrlBuilder::new(state.config());
    Ok((
        StatusCode::CREATED,
        Json(present_drone(&drone, &*state, &urls)?),
    ))
}

pub async fn replace_drone(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
    JsonBody(input): JsonBody,
) -> Result<Json<DroneRepresentation>, ApiError> {
    update_drone(&state, pk, &input, false).await
}

pub async fn patch_drone(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
    JsonBody(input): JsonBody,
) -> Result<Json<DroneRepresentation>, ApiError> {
    update_drone(&state, pk, &input, true).await
}

async fn update_drone(
    state: &AppState,
    pk: i64,
    input: &Value,
    partial: bool,
) -> Result<Json<DroneRepresentation>, ApiError> {
    let _writes = state.lock_writes().await;
    let current = state
        .drone(pk)
        .ok_or_else(|| PresentError::not_found("drone", pk))?;
    let mode = if partial {
        WriteMode::Patch(&current)
    } else {
        WriteMode::Replace(&current)
    };
    let draft = parse_drone(input, state, mode)?;
    let drone = state.update_drone(pk, draft).await?;
    tracing::info!("Updated drone {}", pk);

    let urls = UrlBuilder::new(state.config());
    Ok(Json(present_drone(&drone, state, &urls)?))
}

pub async fn delete_drone(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let _writes = state.lock_writes().await;
    if state.delete_drone(pk).await? {
        tracing::info!("Deleted drone {}", pk);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PresentError::not_found("drone", pk).into())
    }
}
