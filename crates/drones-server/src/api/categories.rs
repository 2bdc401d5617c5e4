//! Drone category endpoints.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use drones_core::{
    parse_category, present_category, DroneCategoryRepresentation, PresentError, RecordLookup,
    WriteMode,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::extract::{JsonBody, QueryParams};
use crate::api::links::{UrlBuilder, CATEGORIES};
use crate::api::pagination::{paginate, Page, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryFilter {
    pub name: Option<String>,
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    QueryParams(page): QueryParams<PageQuery>,
    QueryParams(filter): QueryParams<CategoryFilter>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Page<DroneCategoryRepresentation>>, ApiError> {
    let urls = UrlBuilder::new(state.config());
    let categories = state
        .list_categories()
        .into_iter()
        .filter(|c| filter.name.as_ref().map_or(true, |name| &c.name == name))
        .collect();

    let window = paginate(
        categories,
        &page,
        state.config(),
        &urls.collection_url(CATEGORIES),
        raw.as_deref(),
    )?;
    let page = window.map(|c| Ok::<_, PresentError>(present_category(c, &*state, &urls)))?;
    Ok(Json(page))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
) -> Result<Json<DroneCategoryRepresentation>, ApiError> {
    let category = state
        .category(pk)
        .ok_or_else(|| PresentError::not_found("drone category", pk))?;
    let urls = UrlBuilder::new(state.config());
    Ok(Json(present_category(&category, &*state, &urls)))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody,
) -> Result<(StatusCode, Json<DroneCategoryRepresentation>), ApiError> {
    let _writes = state.lock_writes().await;
    let draft = parse_category(&input, &*state, WriteMode::Create)?;
    let category = state.create_category(draft).await?;
    tracing::info!("Created drone category '{}' ({})", category.name, category.id);

    let urls = UrlBuilder::new(state.config());
    Ok((
        StatusCode::CREATED,
        Json(present_category(&category, &*state, &urls)),
    ))
}

pub async fn replace_category(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
    JsonBody(input): JsonBody,
) -> Result<Json<DroneCategoryRepresentation>, ApiError> {
    update_category(&state, pk, &input, false).await
}

pub async fn patch_category(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
    JsonBody(input): JsonBody,
) -> Result<Json<DroneCategoryRepresentation>, ApiError> {
    update_category(&state, pk, &input, true).await
}

async fn update_category(
    state: &AppState,
    pk: i64,
    input: &Value,
    partial: bool,
) -> Result<Json<DroneCategoryRepresentation>, ApiError> {
    let _writes = state.lock_writes().await;
    let current = state
        .category(pk)
        .ok_or_else(|| PresentError::not_found("drone category", pk))?;
    let mode = if partial {
        WriteMode::Patch(&current)
    } else {
        WriteMode::Replace(&current)
    };
    let draft = parse_category(input, state, mode)?;
    let category = state.update_category(pk, draft).await?;
    tracing::info!("Updated drone category {}", pk);

    let urls = UrlBuilder::new(state.config());
    Ok(Json(present_category(&category, state, &urls)))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let _writes = state.lock_writes().await;
    if state.delete_category(pk).await? {
        tracing::info!("Deleted drone category {}", pk);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PresentError::not_found("drone category", pk).into())
    }
}
