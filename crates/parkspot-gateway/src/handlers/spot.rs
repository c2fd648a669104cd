use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parkspot_core::{ParkingSpot, ParkingSpotPayload, SpotId};

use crate::error::{AppError, Result};
use crate::model::{ListParams, MessageResponse, PageResponse};
use crate::state::AppState;

const DELETED_MESSAGE: &str = "Parking Spot deleted successfully.";

fn parse_id(raw: String) -> Result<SpotId> {
    raw.parse().map_err(|_| AppError::UnknownId(raw))
}

pub async fn create_spot_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ParkingSpotPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ParkingSpot>)> {
    let Json(payload) = payload?;
    let spot = state.spots().create(payload).await?;
    Ok((StatusCode::CREATED, Json(spot)))
}

pub async fn list_spots_handler(
    State(state): State<AppState>,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PageResponse<ParkingSpot>>> {
    let Query(params) = params?;
    let page = state.spots().list(params.into_page_request()?).await?;
    Ok(Json(page.into()))
}

pub async fn get_spot_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ParkingSpot>> {
    let id = parse_id(id)?;
    Ok(Json(state.spots().get(&id).await?))
}

pub async fn update_spot_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<ParkingSpotPayload>, JsonRejection>,
) -> Result<Json<ParkingSpot>> {
    let id = parse_id(id)?;
    let Json(payload) = payload?;
    let spot = state.spots().update(&id, payload).await?;
    Ok(Json(spot))
}

pub async fn delete_spot_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(id)?;
    state.spots().delete(&id).await?;
    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE.to_string(),
    }))
}
