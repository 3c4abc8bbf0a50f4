use crate::error::AppResult;
use crate::handlers::ApiPath;
use crate::middleware::AuthUser;
use crate::models::{
    ComplaintSubtypeModel, ComplaintTypeModel, StatusModel, SubtownModel, TownModel,
};
use crate::services::lookup::LookupService;
use axum::{response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;

#[utoipa::path(
    get,
    path = "/api/statuses",
    security(("jwt_token" = [])),
    responses((status = 200, description = "All statuses", body = Vec<StatusModel>)),
    tag = "lookups"
)]
pub async fn list_statuses(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    Ok(Json(LookupService::new(db).statuses().await?))
}

#[utoipa::path(
    get,
    path = "/api/towns",
    security(("jwt_token" = [])),
    responses((status = 200, description = "All towns", body = Vec<TownModel>)),
    tag = "lookups"
)]
pub async fn list_towns(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    Ok(Json(LookupService::new(db).towns().await?))
}

#[utoipa::path(
    get,
    path = "/api/towns/{id}/subtowns",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Town ID")),
    responses(
        (status = 200, description = "Subtowns of the town", body = Vec<SubtownModel>),
        (status = 404, description = "Town not found", body = crate::error::AppError),
    ),
    tag = "lookups"
)]
pub async fn list_subtowns(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
    ApiPath(town_id): ApiPath<i32>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(LookupService::new(db).subtowns(town_id).await?))
}

#[utoipa::path(
    get,
    path = "/api/complaint-types",
    security(("jwt_token" = [])),
    responses((status = 200, description = "All complaint types", body = Vec<ComplaintTypeModel>)),
    tag = "lookups"
)]
pub async fn list_complaint_types(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    Ok(Json(LookupService::new(db).complaint_types().await?))
}

#[utoipa::path(
    get,
    path = "/api/complaint-types/{id}/subtypes",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Complaint type ID")),
    responses(
        (status = 200, description = "Subtypes of the complaint type", body = Vec<ComplaintSubtypeModel>),
        (status = 404, description = "Complaint type not found", body = crate::error::AppError),
    ),
    tag = "lookups"
)]
pub async fn list_complaint_subtypes(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
    ApiPath(type_id): ApiPath<i32>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(LookupService::new(db).complaint_subtypes(type_id).await?))
}
