mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod feasibility;
    pub mod generate;
    pub mod health;
    pub mod runs;
    pub mod schema;
    pub mod validate;
}

use axum::{
    routing::{get, post},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::validate::validate_handler,
            routes::feasibility::feasibility,
            routes::generate::generate,
            routes::runs::status,
            routes::runs::result,
            routes::runs::table,
            routes::schema::schema,
        ),
        components(schemas(
            types::Instance, types::Course, types::Room, types::CourseKind, types::RoomKind,
            types::TimeCell, types::BalanceWeights, types::Mode, types::EngineConfig,
            types::GenerateRequest, types::GenerateResult, types::Placement, types::Metrics,
            types::CoverageEntry, types::CoverageStatus, types::DayOfWeek, types::ExportStyle,
            types::DayRow, types::TeacherId, types::BatchId, types::RoomId, types::CourseCode,
            jobs::RunId, jobs::RunStatus,
            routes::validate::ValidationReport,
            routes::generate::RunCreated,
            routes::feasibility::FeasibilityIn,
            routes::feasibility::FeasibilityOut,
            routes::runs::TableOut
        )),
        tags(
            (name = "timetable", description = "Weekly timetable generation API")
        )
    )]
struct ApiDoc;

fn app(app_state: state::AppState) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/feasibility", post(routes::feasibility::feasibility))
        .route("/v1/generate", post(routes::generate::generate))
        .route("/v1/runs/:id", get(routes::runs::status))
        .route("/v1/runs/:id/result", get(routes::runs::result))
        .route("/v1/runs/:id/table", get(routes::runs::table))
        .route("/v1/schema", get(routes::schema::schema))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack())
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let app = app(state::AppState::new_default());

    let port = std::env::var("TIMETABLE__SERVER__PORT").unwrap_or_else(|_| "8080".into());
    let addr: std::net::SocketAddr = format!("0.0.0.0:{}", port).parse()?;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
