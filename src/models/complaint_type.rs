use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = ComplaintType)]
#[sea_orm(table_name = "complaint_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub type_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::complaint_subtype::Entity")]
    Subtype,
}

impl Related<super::complaint_subtype::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subtype.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
