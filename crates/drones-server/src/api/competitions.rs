//! Competition endpoints.
//!
//! Reads nest the full drone; writes name the drone and the pilot.

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use drones_core::{
    parse_competition, present_competition, CompetitionRepresentation, PresentError,
    RecordLookup, WriteMode,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::extract::{JsonBody, QueryParams};
use crate::api::links::{UrlBuilder, COMPETITIONS};
use crate::api::pagination::{paginate, Page, PageQuery};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CompetitionFilter {
    pub min_distance_in_feet: Option<i32>,
    pub max_distance_in_feet: Option<i32>,
    pub from_achievement_date: Option<NaiveDate>,
    pub to_achievement_date: Option<NaiveDate>,
    pub drone_name: Option<String>,
    pub pilot_name: Option<String>,
}

pub async fn list_competitions(
    State(state): State<Arc<AppState>>,
    QueryParams(page): QueryParams<PageQuery>,
    QueryParams(filter): QueryParams<CompetitionFilter>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Page<CompetitionRepresentation>>, ApiError> {
    let urls = UrlBuilder::new(state.config());

    let drone_id = filter
        .drone_name
        .as_deref()
        .map(|name| state.drone_by_name(name).map(|d| d.id));
    let pilot_id = filter
        .pilot_name
        .as_deref()
        .map(|name| state.pilot_by_name(name).map(|p| p.id));

    let competitions = state
        .list_competitions()
        .into_iter()
        .filter(|c| {
            filter
                .min_distance_in_feet
                .map_or(true, |min| c.distance_in_feet >= min)
        })
        .filter(|c| {
            filter
                .max_distance_in_feet
                .map_or(true, |max| c.distance_in_feet <= max)
        })
        .filter(|c| {
            filter
                .from_achievement_date
                .map_or(true, |from| c.distance_achievement_date >= from)
        })
        .filter(|c| {
            filter
                .to_achievement_date
                .map_or(true, |to| c.distance_achievement_date <= to)
        })
        .filter(|c| drone_id.map_or(true, |id| id == Some(c.drone_id)))
        .filter(|c| pilot_id.map_or(true, |id| id == Some(c.pilot_id)))
        .collect();

    let window = paginate(
        competitions,
        &page,
        state.config(),
        &urls.collection_url(COMPETITIONS),
        raw.as_deref(),
    )?;
    Ok(Json(window.map(|c| present_competition(c, &*state, &urls))?))
}

pub async fn get_competition(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
) -> Result<Json<CompetitionRepresentation>, ApiError> {
    let competition = state
        .competition(pk)
        .ok_or_else(|| PresentError::not_found("competition", pk))?;
    let urls = UrlBuilder::new(state.config());
    Ok(Json(present_competition(&competition, &*state, &urls)?))
}

pub async fn create_competition(
    State(state): State<Arc<AppState>>,
    JsonBody(input): JsonBody,
) -> Result<(StatusCode, Json<CompetitionRepresentation>), ApiError> {
    let _writes = state.lock_writes().await;
    let draft = parse_competition(&input, &*state, WriteMode::Create)?;
    let competition = state.create_competition(draft).await?;
    tracing::info!(
        "Created competition {} ({} ft)",
        competition.id,
        competition.distance_in_feet
    );

    let urls = UrlBuilder::new(state.config());
    Ok((
        StatusCode::CREATED,
        Json(present_competition(&competition, &*state, &urls)?),
    ))
}

pub async fn replace_competition(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
    JsonBody(input): JsonBody,
) -> Result<Json<CompetitionRepresentation>, ApiError> {
    update_competition(&state, pk, &input, false).await
}

pub async fn patch_competition(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
    JsonBody(input): JsonBody,
) -> Result<Json<CompetitionRepresentation>, ApiError> {
    update_competition(&state, pk, &input, true).await
}

async fn update_competition(
    state: &AppState,
    pk: i64,
    input: &Value,
    partial: bool,
) -> Result<Json<CompetitionRepresentation>, ApiError> {
    let _writes = state.lock_writes().await;
    let current = state
        .competition(pk)
        .ok_or_else(|| PresentError::not_found("competition", pk))?;
    let mode = if partial {
        WriteMode::Patch(&current)
    } else {
        WriteMode::Replace(&current)
    };
    let draft = parse_competition(input, state, mode)?;
    let competition = state.update_competition(pk, draft).await?;
    tracing::info!("Updated competition {}", pk);

    let urls = UrlBuilder::new(state.config());
    Ok(Json(present_competition(&competition, state, &urls)?))
}

pub async fn delete_competition(
    State(state): State<Arc<AppState>>,
    Path(pk): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let _writes = state.lock_writes().await;
    if state.delete_competition(pk).await? {
        tracing::info!("Deleted competition {}", pk);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(PresentError::not_found("competition", pk).into())
    }
}
