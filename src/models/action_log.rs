use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "action_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub actor_id: Option<i32>,
    #[sea_orm(column_type = "String(StringLen::N(20))", nullable)]
    pub actor_type: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub action_type: String,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub entity_type: String,
    pub entity_id: Option<i32>,
    pub entity_name: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub details: Json,
    pub ip_address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
