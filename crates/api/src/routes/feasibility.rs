use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sched_core::analysis::feasibility_warnings;
use types::{EngineConfig, Instance};

#[derive(Deserialize, ToSchema)]
pub struct FeasibilityIn {
    pub instance: Instance,
    #[serde(default)]
    pub config: EngineConfig,
}

#[derive(Serialize, ToSchema)]
pub struct FeasibilityOut {
    pub feasible: bool,
    pub warnings: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/v1/feasibility",
    request_body = FeasibilityIn,
    responses(
    (status = 200, description = "Capacity warnings for the input, before any placement", body = FeasibilityOut)
    )
)]
pub async fn feasibility(Json(input): Json<FeasibilityIn>) -> Json<FeasibilityOut> {
    let warnings = feasibility_warnings(&input.instance, &input.config);
    Json(FeasibilityOut {
        feasible: warnings.is_empty(),
        warnings,
    })
}
