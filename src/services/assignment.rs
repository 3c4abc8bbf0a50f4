use crate::{
    error::{AppError, AppResult},
    models::{request_assign_smagent, socialmedia_agent, RequestAssignSmAgent},
    services::creator::missing_identities,
};
use sea_orm::{ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Assignment status written when the caller does not send one.
pub const DEFAULT_ASSIGNMENT_STATUS: i32 = 1;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SmAgentAssignmentInput {
    pub sm_agent_id: i32,
    pub status: Option<i32>,
}

/// One assignment as aggregated into work request rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SmAgentAssignmentView {
    pub id: i32,
    pub sm_agent_id: i32,
    pub sm_agent_name: Option<String>,
    pub status: i32,
    pub created_at: String,
}

/// Resolves default statuses and drops repeated agent ids, keeping the first.
pub fn normalize(inputs: &[SmAgentAssignmentInput]) -> Vec<(i32, i32)> {
    let mut out: Vec<(i32, i32)> = Vec::with_capacity(inputs.len());
    for input in inputs {
        if out.iter().any(|(id, _)| *id == input.sm_agent_id) {
            continue;
        }
        out.push((
            input.sm_agent_id,
            input.status.unwrap_or(DEFAULT_ASSIGNMENT_STATUS),
        ));
    }
    out
}

/// Replaces every social-media assignment of `request_id` with `inputs`.
///
/// Must run on the caller's transaction: the delete and the inserts are only
/// meaningful together. An empty list clears all assignments.
pub async fn replace_sm_agents<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    inputs: &[SmAgentAssignmentInput],
) -> AppResult<usize> {
    let assignments = normalize(inputs);

    let ids: Vec<i32> = assignments.iter().map(|(id, _)| *id).collect();
    let missing = missing_identities::<socialmedia_agent::Entity, _>(conn, &ids).await?;
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Unknown social media agent ids: {:?}",
            missing
        )));
    }

    let removed = RequestAssignSmAgent::delete_many()
        .filter(request_assign_smagent::Column::WorkRequestsId.eq(request_id))
        .exec(conn)
        .await?;

    if !assignments.is_empty() {
        let now = chrono::Utc::now().naive_utc();
        let rows = assignments
            .iter()
            .map(|(agent_id, status)| request_assign_smagent::ActiveModel {
                work_requests_id: Set(request_id),
                socialmedia_agent_id: Set(*agent_id),
                status: Set(*status),
                created_at: Set(now),
                ..Default::default()
            });
        RequestAssignSmAgent::insert_many(rows).exec(conn).await?;
    }

    tracing::debug!(
        request_id,
        removed = removed.rows_affected,
        inserted = assignments.len(),
        "social media assignments replaced"
    );

    Ok(assignments.len())
}
