use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CountResponse, CreateCalculationRequest, Pagination, UpdateCalculationRequest};
use super::repo_types::Calculation;
use super::services;
use crate::{auth::CurrentUser, error::Result, state::AppState};

pub fn calculation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/calculations",
            get(list_calculations).post(create_calculation),
        )
        .route("/api/calculations/count", get(count_calculations))
        .route(
            "/api/calculations/:id",
            get(get_calculation)
                .patch(update_calculation)
                .delete(delete_calculation),
        )
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn create_calculation(
    State(state): State<AppState>,
    user: CurrentUser,
    payload: std::result::Result<Json<CreateCalculationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Calculation>)> {
    let Json(payload) = payload?;
    let calc = services::create(state.calculations.as_ref(), user.id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(calc)))
}

#[instrument(skip(state, user, pagination), fields(user_id = %user.id))]
pub async fn list_calculations(
    State(state): State<AppState>,
    user: CurrentUser,
    pagination: std::result::Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Calculation>>> {
    let Query(pagination) = pagination?;
    let window = pagination.window(&state.config.pages)?;
    let calcs = services::list(state.calculations.as_ref(), user.id, window).await?;
    Ok(Json(calcs))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn count_calculations(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<CountResponse>> {
    let count = services::count(state.calculations.as_ref(), user.id).await?;
    Ok(Json(CountResponse { count }))
}

#[instrument(skip(state, user, id), fields(user_id = %user.id))]
pub async fn get_calculation(
    State(state): State<AppState>,
    user: CurrentUser,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Calculation>> {
    let Path(id) = id?;
    let calc = services::get(state.calculations.as_ref(), user.id, id).await?;
    Ok(Json(calc))
}

#[instrument(skip(state, user, id, payload), fields(user_id = %user.id))]
pub async fn update_calculation(
    State(state): State<AppState>,
    user: CurrentUser,
    id: std::result::Result<Path<Uuid>, PathRejection>,
    payload: std::result::Result<Json<UpdateCalculationRequest>, JsonRejection>,
) -> Result<Json<Calculation>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let calc = services::update(state.calculations.as_ref(), user.id, id, &patch).await?;
    Ok(Json(calc))
}

#[instrument(skip(state, user, id), fields(user_id = %user.id))]
pub async fn delete_calculation(
    State(state): State<AppState>,
    user: CurrentUser,
    id: std::result::Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode> {
    let Path(id) = id?;
    services::delete(state.calculations.as_ref(), user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
