use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Field agents. Work requests are assigned to them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "agents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub contact_number: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(30))")]
    pub role: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
