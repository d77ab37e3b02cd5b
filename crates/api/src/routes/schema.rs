use axum::Json;
use schemars::schema::RootSchema;
use types::GenerateRequest;

#[utoipa::path(
    get,
    path = "/v1/schema",
    responses((status = 200, description = "JSON schema of the generate request body"))
)]
pub async fn schema() -> Json<RootSchema> {
    Json(schemars::schema_for!(GenerateRequest))
}
