use axum::{extract::Extension, response::IntoResponse, routing::get, Json, Router};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use serde_json::json;
use std::env;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;
use worktrack::config::{self, status_policy::StatusPolicy};
use worktrack::services::{action_log::ActionLogger, upload::UploadConfig};
use worktrack::{migration, routes, utils};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        // Work requests
        worktrack::handlers::request::get_requests,
        worktrack::handlers::request::create_request,
        worktrack::handlers::request::update_request,
        // Media
        worktrack::handlers::media::upload_media,
        worktrack::handlers::media::list_media,
        // Lookups
        worktrack::handlers::lookup::list_statuses,
        worktrack::handlers::lookup::list_towns,
        worktrack::handlers::lookup::list_subtowns,
        worktrack::handlers::lookup::list_complaint_types,
        worktrack::handlers::lookup::list_complaint_subtypes,
        // Complaints
        worktrack::handlers::complaint::create_complaint,
        worktrack::handlers::complaint::list_complaints,
        worktrack::handlers::complaint::delete_complaint,
    ),
    components(
        schemas(
            worktrack::response::PaginatedResponse<worktrack::handlers::request::WorkRequestResponse>,
            worktrack::response::IdResponse,
            worktrack::error::AppError,
            worktrack::handlers::request::WorkRequestResponse,
            worktrack::handlers::request::CreateWorkRequest,
            worktrack::handlers::request::UpdateWorkRequest,
            worktrack::services::assignment::SmAgentAssignmentInput,
            worktrack::services::assignment::SmAgentAssignmentView,
            worktrack::services::creator::CreatorKind,
            worktrack::handlers::complaint::CreateComplaintRequest,
            worktrack::handlers::complaint::ComplaintResponse,
            worktrack::models::StatusModel,
            worktrack::models::TownModel,
            worktrack::models::SubtownModel,
            worktrack::models::ComplaintTypeModel,
            worktrack::models::ComplaintSubtypeModel,
            worktrack::models::WorkRequestMediaModel,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "requests", description = "Work request lifecycle"),
        (name = "media", description = "Photo and video evidence"),
        (name = "lookups", description = "Statuses, towns and complaint categories"),
        (name = "complaints", description = "Legacy complaint records"),
    )
)]
struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "jwt_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_tracing();

    // Validate configuration before doing anything else
    let (jwt_config, db_config) = validate_config()?;

    utils::jwt::init_jwt_config(jwt_config)?;

    tracing::info!("Starting Work Request API v{}...", env!("CARGO_PKG_VERSION"));

    let db = config::database::get_database(&db_config).await?;
    tracing::info!("Database connected successfully");

    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let upload_config = UploadConfig::from_env();
    let status_policy = StatusPolicy::from_env();
    tracing::info!(?status_policy, "Status transition policy");

    let app = create_app(&upload_config.upload_dir)
        .layer(Extension(ActionLogger::new(db.clone())))
        .layer(Extension(db))
        .layer(Extension(upload_config))
        .layer(Extension(status_policy));

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "worktrack=debug,tower_http=debug,axum=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Validate all required configuration at startup (fail-fast).
fn validate_config() -> anyhow::Result<(
    config::jwt::JwtConfig,
    config::database::DatabaseConfig,
)> {
    let jwt_config = config::jwt::JwtConfig::from_env()?;
    let db_config = config::database::DatabaseConfig::from_env()?;

    // Upload directory, created if needed
    let upload_dir = UploadConfig::from_env().upload_dir;
    std::fs::create_dir_all(&upload_dir).map_err(|e| {
        anyhow::anyhow!("Failed to create upload directory '{}': {}", upload_dir, e)
    })?;

    Ok((jwt_config, db_config))
}

fn build_cors_layer() -> CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    let origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if origins_str == "*" {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<HeaderValue> = origins_str
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

fn create_app(upload_dir: &str) -> Router {
    Router::new()
        .route("/", get(health_check))
        .merge(routes::create_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Health check successful", body = serde_json::Value)
    )
)]
async fn health_check(Extension(db): Extension<DatabaseConnection>) -> impl IntoResponse {
    let db_ok = db
        .query_one(Statement::from_string(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT 1".to_string(),
        ))
        .await
        .is_ok();

    let status = if db_ok { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "service": "Work Request API",
        "version": env!("CARGO_PKG_VERSION"),
        "database": db_ok,
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, gracefully shutting down...");
}
