use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use jobs::RunStatus;
use sched_core::export::{day_rows, header};
use sched_core::grid::{Problem, Timetable};
use serde::{Deserialize, Serialize};
use types::{DayRow, ExportStyle, GenerateResult};
use utoipa::{IntoParams, ToSchema};

#[utoipa::path(
    get,
    path = "/v1/runs/{id}",
    params(("id" = String, Path, description = "Run ID")),
    responses((status = 200, description = "Run status", body = jobs::RunStatus))
)]
pub async fn status(State(state): State<AppState>, Path(id): Path<String>) -> Json<serde_json::Value> {
    Json(match state.runs.get(&id) {
        None => serde_json::json!({"status": "not_found"}),
        Some(RunStatus::Done { .. }) => serde_json::json!({"status": "done"}),
        Some(s) => serde_json::to_value(s).unwrap_or_else(|_| serde_json::json!({"status": "unknown"})),
    })
}

#[utoipa::path(
    get,
    path = "/v1/runs/{id}/result",
    params(("id" = String, Path, description = "Run ID")),
    responses(
        (status = 200, description = "Generated timetable, metrics and coverage (if ready)", body = GenerateResult)
    )
)]
pub async fn result(State(state): State<AppState>, Path(id): Path<String>) -> Json<serde_json::Value> {
    Json(match state.runs.get(&id) {
        Some(RunStatus::Done { result, .. }) => {
            serde_json::to_value(result).unwrap_or_else(|e| serde_json::json!({"status": "failed", "message": e.to_string()}))
        }
        Some(RunStatus::Failed { message }) => serde_json::json!({"status": "failed", "message": message}),
        Some(_) => serde_json::json!({"status": "not_ready"}),
        None => serde_json::json!({"status": "not_found"}),
    })
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TableQuery {
    #[serde(default)]
    pub style: ExportStyle,
}

#[derive(Serialize, ToSchema)]
pub struct TableOut {
    pub header: Vec<String>,
    pub rows: Vec<DayRow>,
}

#[utoipa::path(
    get,
    path = "/v1/runs/{id}/table",
    params(("id" = String, Path, description = "Run ID"), TableQuery),
    responses(
        (status = 200, description = "Grid as one row per day, one cell per slot", body = TableOut),
        (status = 404, description = "No finished run with this id")
    )
)]
pub async fn table(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<TableQuery>,
) -> Result<Json<TableOut>, ApiError> {
    let Some(RunStatus::Done { result, request }) = state.runs.get(&id) else {
        return Err(ApiError::NotFound(format!("no finished run {id}")));
    };
    let p = Problem::new(&request.instance, &request.config)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let tt = Timetable::from_placements(&p, &result.placements);
    Ok(Json(TableOut {
        header: header(&p),
        rows: day_rows(&p, &tt, q.style),
    }))
}
