use crate::error::{AppError, AppResult};
use crate::handlers::{ApiJson, ApiQuery};
use crate::middleware::AuthUser;
use crate::response::IdResponse;
use crate::services::action_log::{ActionLogger, ActionType, AuditEntry, RequestMeta};
use crate::services::complaint::{ComplaintRow, ComplaintService, NewComplaint};
use crate::utils::geo::GeoPoint;
use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateComplaintRequest {
    pub town_id: i32,
    pub complaint_type_id: i32,
    #[validate(length(min = 1, max = 30))]
    pub contact_number: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// Combined `"lat,lon"` string
    pub geo_tag: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplaintResponse {
    pub id: i32,
    pub town_id: i32,
    pub town_name: Option<String>,
    pub complaint_type_id: i32,
    pub complaint_type_name: Option<String>,
    pub contact_number: String,
    pub address: String,
    pub description: String,
    pub created_at: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<ComplaintRow> for ComplaintResponse {
    fn from(c: ComplaintRow) -> Self {
        let geo = GeoPoint::from_columns(c.latitude, c.longitude);
        Self {
            id: c.id,
            town_id: c.town_id,
            town_name: c.town_name,
            complaint_type_id: c.complaint_type_id,
            complaint_type_name: c.complaint_type_name,
            contact_number: c.contact_number,
            address: c.address,
            description: c.description,
            created_at: c.created_at.to_string(),
            latitude: geo.map(|p| p.latitude),
            longitude: geo.map(|p| p.longitude),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteComplaintQuery {
    pub id: Option<i32>,
}

#[utoipa::path(
    post,
    path = "/api/complaints",
    security(("jwt_token" = [])),
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint created", body = IdResponse),
        (status = 400, description = "Validation or geo_tag format error", body = AppError),
    ),
    tag = "complaints"
)]
pub async fn create_complaint(
    Extension(db): Extension<DatabaseConnection>,
    Extension(logger): Extension<ActionLogger>,
    auth_user: AuthUser,
    meta: RequestMeta,
    ApiJson(payload): ApiJson<CreateComplaintRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let geo = payload
        .geo_tag
        .as_deref()
        .filter(|tag| !tag.trim().is_empty())
        .map(str::parse::<GeoPoint>)
        .transpose()?;

    let id = ComplaintService::new(db)
        .create(NewComplaint {
            town_id: payload.town_id,
            complaint_type_id: payload.complaint_type_id,
            contact_number: payload.contact_number,
            address: payload.address.clone(),
            description: payload.description,
            geo,
        })
        .await?;

    logger.record(
        Some(&auth_user),
        &meta,
        AuditEntry::new(ActionType::Create, "complaint", id).named(payload.address),
    );

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

#[utoipa::path(
    get,
    path = "/api/complaints",
    security(("jwt_token" = [])),
    responses((status = 200, description = "All complaints, newest first", body = Vec<ComplaintResponse>)),
    tag = "complaints"
)]
pub async fn list_complaints(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let rows = ComplaintService::new(db).list().await?;
    let items: Vec<ComplaintResponse> = rows.into_iter().map(ComplaintResponse::from).collect();
    Ok(Json(items))
}

#[utoipa::path(
    delete,
    path = "/api/complaints",
    security(("jwt_token" = [])),
    params(DeleteComplaintQuery),
    responses(
        (status = 200, description = "Complaint deleted", body = IdResponse),
        (status = 400, description = "Missing id", body = AppError),
        (status = 404, description = "Complaint not found", body = AppError),
    ),
    tag = "complaints"
)]
pub async fn delete_complaint(
    Extension(db): Extension<DatabaseConnection>,
    Extension(logger): Extension<ActionLogger>,
    auth_user: AuthUser,
    meta: RequestMeta,
    ApiQuery(params): ApiQuery<DeleteComplaintQuery>,
) -> AppResult<impl IntoResponse> {
    let id = params
        .id
        .ok_or_else(|| AppError::Validation("Query parameter 'id' is required".to_string()))?;

    ComplaintService::new(db).delete(id).await?;

    logger.record(
        Some(&auth_user),
        &meta,
        AuditEntry::new(ActionType::Delete, "complaint", id).details(json!({ "id": id })),
    );

    Ok(Json(IdResponse { id }))
}
