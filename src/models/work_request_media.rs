use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = WorkRequestMedia)]
#[sea_orm(table_name = "work_request_media")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub work_request_id: i32,
    /// "image" or "video"
    #[sea_orm(column_type = "String(StringLen::N(10))")]
    pub kind: String,
    pub file_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub uploader_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub uploader_type: String,
    pub uploaded_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_request::Entity",
        from = "Column::WorkRequestId",
        to = "super::work_request::Column::Id"
    )]
    WorkRequest,
}

impl Related<super::work_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
