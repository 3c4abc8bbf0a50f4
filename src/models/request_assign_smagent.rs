use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "request_assign_smagent")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub work_requests_id: i32,
    pub socialmedia_agent_id: i32,
    pub status: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_request::Entity",
        from = "Column::WorkRequestsId",
        to = "super::work_request::Column::Id"
    )]
    WorkRequest,
    #[sea_orm(
        belongs_to = "super::socialmedia_agent::Entity",
        from = "Column::SocialmediaAgentId",
        to = "super::socialmedia_agent::Column::Id"
    )]
    SocialmediaAgent,
}

impl Related<super::work_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkRequest.def()
    }
}

impl Related<super::socialmedia_agent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocialmediaAgent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
