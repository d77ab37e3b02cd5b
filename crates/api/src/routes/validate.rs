use axum::{http::StatusCode, Json};
use sched_core::{validate, ValidationError};
use serde::Serialize;
use types::GenerateRequest;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

pub fn report(req: &GenerateRequest) -> ValidationReport {
    match validate(&req.instance, &req.config) {
        Ok(()) => ValidationReport { ok: true, errors: vec![] },
        Err(ValidationError::Msg(msg)) => {
            let errors = msg
                .split("; ")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            ValidationReport { ok: false, errors }
        }
    }
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = GenerateRequest,
    responses(
    (status = 200, description = "Validation result", body = ValidationReport)
    )
)]
pub async fn validate_handler(Json(req): Json<GenerateRequest>) -> (StatusCode, Json<ValidationReport>) {
    (StatusCode::OK, Json(report(&req)))
}
