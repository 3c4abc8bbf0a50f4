use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Scalar columns of `work_requests`. The PostGIS `geo_tag` column is read and
/// written through raw statements only, see `services::work_request`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub town_id: i32,
    pub subtown_id: Option<i32>,
    pub complaint_type_id: i32,
    pub complaint_subtype_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub contact_number: String,
    pub address: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub request_date: DateTime,
    pub status_id: i32,
    pub assigned_to: Option<i32>,
    pub creator_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub creator_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::status::Entity",
        from = "Column::StatusId",
        to = "super::status::Column::Id"
    )]
    Status,
    #[sea_orm(has_many = "super::request_assign_smagent::Entity")]
    SmAssignments,
    #[sea_orm(has_many = "super::work_request_media::Entity")]
    Media,
}

impl Related<super::status::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Status.def()
    }
}

impl Related<super::request_assign_smagent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SmAssignments.def()
    }
}

impl Related<super::work_request_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Media.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
