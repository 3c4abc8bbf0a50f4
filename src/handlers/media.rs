use crate::error::{AppError, AppResult};
use crate::handlers::{ApiMultipart, ApiPath};
use crate::middleware::AuthUser;
use crate::models::WorkRequestMediaModel;
use crate::services::action_log::{ActionLogger, ActionType, AuditEntry, RequestMeta};
use crate::services::media::{MediaService, NewMedia};
use crate::services::upload::UploadConfig;
use axum::{
    extract::Multipart,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde_json::json;

struct MediaForm {
    content_type: String,
    data: Vec<u8>,
    description: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> AppResult<MediaForm> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file data: {}", e)))?;
                file = Some((content_type, data.to_vec()));
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read description: {}", e)))?;
                description = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let (content_type, data) =
        file.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    Ok(MediaForm {
        content_type,
        data,
        description,
    })
}

/// Attach an image or video to a request.
/// POST /api/requests/{id}/media (multipart form: "file", optional "description")
#[utoipa::path(
    post,
    path = "/api/requests/{id}/media",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Work request ID")),
    responses(
        (status = 201, description = "Media stored", body = WorkRequestMediaModel),
        (status = 400, description = "Unsupported or malformed file", body = AppError),
        (status = 403, description = "Request is completed", body = AppError),
        (status = 404, description = "Request not found", body = AppError),
        (status = 413, description = "File too large", body = AppError),
    ),
    tag = "media"
)]
pub async fn upload_media(
    Extension(db): Extension<DatabaseConnection>,
    Extension(config): Extension<UploadConfig>,
    Extension(logger): Extension<ActionLogger>,
    auth_user: AuthUser,
    meta: RequestMeta,
    ApiPath(request_id): ApiPath<i32>,
    ApiMultipart(multipart): ApiMultipart,
) -> AppResult<impl IntoResponse> {
    let form = read_form(multipart).await?;

    let service = MediaService::new(db);
    let media = service
        .upload(
            &config,
            NewMedia {
                request_id,
                uploader: auth_user.creator(),
                role: &auth_user.role,
                content_type: &form.content_type,
                data: &form.data,
                description: form.description,
            },
        )
        .await?;

    logger.record(
        Some(&auth_user),
        &meta,
        AuditEntry::new(ActionType::Upload, "work_request", request_id)
            .named(media.file_url.clone())
            .details(json!({ "media_id": media.id, "kind": media.kind })),
    );

    Ok((StatusCode::CREATED, Json(media)))
}

#[utoipa::path(
    get,
    path = "/api/requests/{id}/media",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Work request ID")),
    responses(
        (status = 200, description = "Media of the request, newest first", body = Vec<WorkRequestMediaModel>),
    ),
    tag = "media"
)]
pub async fn list_media(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
    ApiPath(request_id): ApiPath<i32>,
) -> AppResult<impl IntoResponse> {
    let service = MediaService::new(db);
    Ok(Json(service.list(request_id).await?))
}
