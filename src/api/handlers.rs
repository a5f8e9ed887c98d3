//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;
use tracing::info;

use super::error::ApiError;
use crate::request::CalculateRequest;
use crate::sizing::{Sizer, SizingReport};

/// Returns the whole catalog.
///
/// `GET /api/init` → 200 + `{archetypes, packs, tiers, solar}` JSON
pub async fn get_init(State(state): State<Arc<Sizer>>) -> Result<Json<Value>, ApiError> {
    serde_json::to_value(state.catalog())
        .map(Json)
        .map_err(|e| ApiError::Internal(format!("catalog serialization failed: {e}")))
}

/// Sizes a station for the posted household description.
///
/// `POST /api/calculate` → 200 + `{profile, recommendations}` JSON
/// Bad input or an unknown id → 400 + `ErrorResponse`
pub async fn post_calculate(
    State(state): State<Arc<Sizer>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SizingReport>, ApiError> {
    let Json(body) =
        body.map_err(|_| ApiError::BadRequest("Request body must be valid JSON.".into()))?;
    if !body.is_object() {
        return Err(ApiError::BadRequest(
            "Request body must be a JSON object.".into(),
        ));
    }

    let request: CalculateRequest = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request: {e}")))?;
    let report = state.size(request.into_profile_request()?)?;

    info!(
        archetype = report.profile.archetype.as_deref().unwrap_or("-"),
        tiers = report.recommendations.len(),
        "calculated energy profile"
    );
    Ok(Json(report))
}
