//! Pilot endpoints.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use drones_core::{
    parse_pilot, present_pilot, Gender, PilotRepresentation, PresentError, RecordLookup,
    WriteMode,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::extract::{JsonBody, QueryParams};
use crate::api::links::{UrlBuilder, PILOTS};
use crate::api::pagination::{paginate, Page, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PilotFilter {
    pub name: Option<String>,
    pub gender: Option<Gender>,
}

pub async fn list_pilots(
    State(state): State<Arc<AppState>>,
    QueryParams(page): QueryParams<PageQuery>,
    QueryParams(filter): QueryParams<PilotFilter>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Page<PilotRepresentation>>, ApiError> {
    let urls = UrlBuilder::new(state.config());
    let pilots = state
        .list_pilots()
        .into_iter()
        .filter(|p| filter.name.as_ref().map_or(true, |name| &p.name == name))
        .filter(|p| filter.gender.map_or(true, |gender| p.gender == gender))
        .collect();

    let window = paginate(
        pilots,
        &page,
        state.config(),
        &urls.collection_url(PILOTS),
        raw.as_deref(),
    )?;
    Ok(Json(window.map(|p| present_pilot(p, &*state, &urls))?))
}

pub async fn get_pilot(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
) -> Result<Json<PilotRepresentation>, ApiError> {
    let pilot = state
        .pilot(pk)
        .ok_or_else(|| PresentError::not_found("pilot", pk))?;
    let urls = UrlBuilder::new(state.config());
    Ok(Json(present_pilot(&pilot, &*state, &urls)?))
}

pub async fn create_pilot(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody,
) -> Result<(StatusCode, Json<PilotRepresentation>), ApiError> {
    let _writes = state.lock_writes().await;
    let draft = parse_pilot(&input, &*state, WriteMode::Create)?;
    let pilot = state.create_pilot(draft).await?;
    tracing::info!("Created pilot '{}' ({})", pilot.name, pilot.id);

    let urls = UrlBuilder::new(state.config());
    Ok((
        StatusCode::CREATED,
        Json(present_pilot(&pilot, &*state, &urls)?),
    ))
}

pub async fn replace_pilot(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
    JsonBody(input): JsonBody,
) -> Result<Json<PilotRepresentation>, ApiError> {
    update_pilot(&state, pk, &input, false).await
}

pub async fn patch_pilot(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
    JsonBody(input): JsonBody,
) -> Result<Json<PilotRepresentation>, ApiError> {
    update_pilot(&state, pk, &input, true).await
}

async fn update_pilot(
    state: &AppState,
    pk: i64,
    input: &Value,
    partial: bool,
) -> Result<Json<PilotRepresentation>, ApiError> {
    let _writes = state.lock_writes().await;
    let current = state
        .pilot(pk)
        .ok_or_else(|| PresentError::not_found("pilot", pk))?;
    let mode = if partial {
        WriteMode::Patch(&current)
    } else {
        WriteMode::Replace(&current)
    };
    let draft = parse_pilot(input, state, mode)?;
    let pilot = state.update_pilot(pk, draft).await?;
    tracing::info!("Updated pilot {}", pk);

    let urls = UrlBuilder::new(state.config());
    Ok(Json(present_pilot(&pilot, state, &urls)?))
}

pub async fn delete_pilot(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let _writes = state.lock_writes().await;
    if state.delete_pilot(pk).await? {
        tracing::info!("Deleted pilot {}", pk);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PresentError::not_found("pilot", pk).into())
    }
}
