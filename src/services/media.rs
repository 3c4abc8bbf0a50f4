use crate::{
    config::status_policy::COMPLETED,
    error::{AppError, AppResult},
    models::{work_request_media, WorkRequestMedia, WorkRequestMediaModel},
    services::{
        creator::{Creator, CreatorKind},
        upload::{UploadConfig, UploadService},
        work_request::WorkRequestService,
    },
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};

/// Roles that may keep documenting a request after it is completed.
pub fn is_elevated(actor: CreatorKind, role: &str) -> bool {
    matches!(role, "admin" | "manager") || (actor == CreatorKind::SocialMedia && role == "editor")
}

/// Upload gate: a completed request accepts evidence only from elevated roles.
pub fn can_upload(status_label: &str, actor: CreatorKind, role: &str) -> bool {
    status_label != COMPLETED || is_elevated(actor, role)
}

pub struct NewMedia<'a> {
    pub request_id: i32,
    pub uploader: Creator,
    pub role: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
    pub description: Option<String>,
}

pub struct MediaService {
    db: DatabaseConnection,
}

impl MediaService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn upload(
        &self,
        config: &UploadConfig,
        media: NewMedia<'_>,
    ) -> AppResult<WorkRequestMediaModel> {
        let status = WorkRequestService::new(self.db.clone())
            .status_label(media.request_id)
            .await?;

        if !can_upload(&status, media.uploader.kind(), media.role) {
            return Err(AppError::Forbidden(
                "Request is completed; uploads are restricted".to_string(),
            ));
        }

        let stored = UploadService::save_file(config, media.data, media.content_type).await?;

        let row = work_request_media::ActiveModel {
            work_request_id: Set(media.request_id),
            kind: Set(stored.kind.as_str().to_string()),
            file_url: Set(stored.url.clone()),
            description: Set(media.description),
            uploader_id: Set(media.uploader.id()),
            uploader_type: Set(media.uploader.kind().as_str().to_string()),
            uploaded_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        match row.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(e) => {
                UploadService::discard(&stored).await;
                Err(e.into())
            }
        }
    }

    pub async fn list(&self, request_id: i32) -> AppResult<Vec<WorkRequestMediaModel>> {
        Ok(WorkRequestMedia::find()
            .filter(work_request_media::Column::WorkRequestId.eq(request_id))
            .order_by_desc(work_request_media::Column::UploadedAt)
            .order_by_desc(work_request_media::Column::Id)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::status_policy::{IN_PROGRESS, PENDING};

    #[test]
    fn open_requests_accept_anyone() {
        assert!(can_upload(PENDING, CreatorKind::User, "citizen"));
        assert!(can_upload(IN_PROGRESS, CreatorKind::Agent, ""));
    }

    #[test]
    fn completed_requests_need_elevated_role() {
        assert!(!can_upload(COMPLETED, CreatorKind::Agent, "field"));
        assert!(!can_upload(COMPLETED, CreatorKind::User, "editor"));
        assert!(can_upload(COMPLETED, CreatorKind::User, "admin"));
        assert!(can_upload(COMPLETED, CreatorKind::Agent, "manager"));
        assert!(can_upload(COMPLETED, CreatorKind::SocialMedia, "editor"));
    }

    #[test]
    fn role_match_is_exact() {
        assert!(!is_elevated(CreatorKind::User, "Admin"));
        assert!(!is_elevated(CreatorKind::SocialMedia, "editors"));
    }
}
