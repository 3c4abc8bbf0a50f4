use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = ComplaintSubtype)]
#[sea_orm(table_name = "complaint_subtypes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub complaint_type_id: i32,
    pub subtype_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::complaint_type::Entity",
        from = "Column::ComplaintTypeId",
        to = "super::complaint_type::Column::Id"
    )]
    ComplaintType,
}

impl Related<super::complaint_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ComplaintType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
