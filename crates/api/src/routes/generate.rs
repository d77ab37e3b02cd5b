use crate::{error::ApiError, state::AppState};
use axum::{extract::State, Json};
use serde::Serialize;
use types::GenerateRequest;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct RunCreated {
    pub run_id: String,
    pub status: &'static str,
}

#[utoipa::path(
    post,
    path = "/v1/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Run enqueued", body = RunCreated),
        (status = 400, description = "Input rejected by validation")
    )
)]
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<RunCreated>, ApiError> {
    let report = super::validate::report(&req);
    if !report.ok {
        return Err(ApiError::BadRequest(report.errors.join("; ")));
    }
    let id = state.runs.enqueue(req);
    tracing::info!(run = %id.0, "run enqueued");
    Ok(Json(RunCreated {
        run_id: id.0,
        status: "queued",
    }))
}
