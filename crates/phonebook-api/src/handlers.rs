//! REST API handlers.
//!
//! Each handler validates its input (path phone included), calls
//! `PhoneService`, and lets `ApiError` pick the status code. Nothing reaches
//! the store unless every field passed validation.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use phonebook_store::KeyValueStore;

use crate::ApiState;
use crate::error::ApiError;
use crate::schemas::{
    AddressUpdate, AddressUpdateBody, FieldError, HealthResponse, MessageResponse,
    PhoneAddressCreate, PhoneAddressCreateBody, PhoneAddressResponse, validate_path_phone,
};

/// Body rejections (bad JSON, missing fields, wrong content type) are
/// validation failures like any other.
fn body_error(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(vec![FieldError {
        loc: vec!["body".to_string()],
        msg: rejection.body_text(),
    }])
}

// ── Phones ─────────────────────────────────────────────────────

/// GET /phones/{phone}
pub async fn get_address<S: KeyValueStore>(
    State(state): State<ApiState<S>>,
    Path(phone): Path<String>,
) -> Result<Json<PhoneAddressResponse>, ApiError> {
    let phone = validate_path_phone(&phone).map_err(|e| vec![e])?;
    Ok(Json(state.service.get_phone(&phone).await?))
}

/// POST /phones
pub async fn create_phone<S: KeyValueStore>(
    State(state): State<ApiState<S>>,
    body: Result<Json<PhoneAddressCreateBody>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(body) = body.map_err(body_error)?;
    let data = PhoneAddressCreate::try_from(body)?;
    let message = state.service.create_phone(&data).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// PUT /phones/{phone}
pub async fn update_address<S: KeyValueStore>(
    State(state): State<ApiState<S>>,
    Path(phone): Path<String>,
    body: Result<Json<AddressUpdateBody>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let phone = validate_path_phone(&phone);
    let Json(body) = body.map_err(body_error)?;
    let data = AddressUpdate::try_from(body);
    let (phone, data) = match (phone, data) {
        (Ok(phone), Ok(data)) => (phone, data),
        (phone, data) => {
            let errors = phone.err().into_iter().chain(data.err().into_iter().flatten());
            return Err(ApiError::Validation(errors.collect()));
        }
    };
    Ok(Json(state.service.update_address(&phone, &data).await?))
}

/// DELETE /phones/{phone}
pub async fn delete_phone<S: KeyValueStore>(
    State(state): State<ApiState<S>>,
    Path(phone): Path<String>,
) -> Result<StatusCode, ApiError> {
    let phone = validate_path_phone(&phone).map_err(|e| vec![e])?;
    state.service.delete_phone(&phone).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Health ─────────────────────────────────────────────────────

/// GET /health
pub async fn health<S: KeyValueStore>(State(state): State<ApiState<S>>) -> Json<HealthResponse> {
    Json(state.service.health().await)
}
