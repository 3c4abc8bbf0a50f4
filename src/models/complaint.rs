use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Legacy complaint records. Like `work_requests`, the `geo_tag` point column is
/// handled by raw statements.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub town_id: i32,
    pub complaint_type_id: i32,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub contact_number: String,
    pub address: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
