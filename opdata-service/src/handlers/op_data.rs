use crate::dtos::{EnvelopeData, MessageResponse, OpDataResponse};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

#[tracing::instrument(skip(state, body))]
pub async fn create_op_data(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let id = state.op_data.create(&body).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_data(
            "Document created successfully",
            EnvelopeData::Id(id.to_hex()),
        )),
    ))
}

#[tracing::instrument(skip(state))]
pub async fn get_op_data(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<OpDataResponse>, AppError> {
    let id = record_id(path)?;
    let record = state.op_data.get(&id).await?;
    Ok(Json(OpDataResponse::from(record)))
}

#[tracing::instrument(skip(state))]
pub async fn list_op_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<OpDataResponse>>, AppError> {
    let records = state.op_data.all().await?;
    Ok(Json(records.into_iter().map(OpDataResponse::from).collect()))
}

#[tracing::instrument(skip(state, body))]
pub async fn update_op_data(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let id = record_id(path)?;
    let modified = state.op_data.update(&id, &body).await?;

    Ok(Json(MessageResponse::with_data(
        "Document updated successfully",
        EnvelopeData::Count(modified),
    )))
}

#[tracing::instrument(skip(state))]
pub async fn delete_op_data(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = record_id(path)?;
    let deleted = state.op_data.delete(&id).await?;

    Ok(Json(MessageResponse::with_data(
        "Document deleted successfully",
        EnvelopeData::Count(deleted),
    )))
}

/// A path that fails to extract (e.g. a non-UTF-8 percent-encoded id) is a
/// bad id.
fn record_id(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    path.map(|Path(id)| id)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid path: {}", e)))
}
