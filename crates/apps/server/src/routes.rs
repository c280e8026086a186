use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use globe::animation::animate;
use globe::{build_markers, MarkerLayout, Person};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::roster::{sorted_roster, RosterEntry, SortKey};
use crate::AppState;

pub type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

pub async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// Cached person list, refreshed from the source once the TTL has passed.
async fn people(state: &AppState) -> Result<Arc<[Person]>, ApiError> {
    if let Some(people) = state.roster.get(Instant::now()) {
        return Ok(people);
    }

    let people = state.people.fetch_people().await.map_err(|err| {
        warn!(source = state.people.name(), "person fetch failed: {err}");
        api_error(StatusCode::BAD_GATEWAY, format!("Fetch failed: {err}"))
    })?;
    info!(source = state.people.name(), count = people.len(), "roster refreshed");
    Ok(state.roster.put(Instant::now(), people))
}

#[derive(Debug, Default, Deserialize)]
pub struct RosterQuery {
    #[serde(default)]
    pub sort: SortKey,
}

pub async fn list_neighbors(
    State(state): State<AppState>,
    Query(query): Query<RosterQuery>,
) -> Result<Json<Vec<RosterEntry>>, ApiError> {
    let people = people(&state).await?;
    Ok(Json(sorted_roster(&people, query.sort)))
}

pub async fn get_neighbor(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<RosterEntry>, ApiError> {
    let people = people(&state).await?;
    people
        .iter()
        .find(|p| p.id.as_str() == id)
        .map(|p| Json(RosterEntry::from(p)))
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Neighbor not found"))
}

#[derive(Debug, Default, Deserialize)]
pub struct GlobeQuery {
    /// Seconds since the globe was mounted; sets the blink scale.
    #[serde(default)]
    pub elapsed: Option<f64>,
}

pub async fn get_globe(
    State(state): State<AppState>,
    Query(query): Query<GlobeQuery>,
) -> Result<Json<MarkerLayout>, ApiError> {
    if query.elapsed.is_some_and(|t| !t.is_finite()) {
        return Err(api_error(StatusCode::BAD_REQUEST, "elapsed must be finite"));
    }

    let people = people(&state).await?;
    let mut layout = build_markers(&people, &state.airports).map_err(|err| {
        warn!("globe layout rejected: {err}");
        api_error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    })?;

    if !layout.unmatched.is_empty() {
        warn!(codes = ?layout.unmatched, "airport codes with no reference record");
    }
    if let Some(t) = query.elapsed {
        animate(&mut layout.markers, t);
    }
    Ok(Json(layout))
}
