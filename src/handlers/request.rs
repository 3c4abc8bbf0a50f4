use crate::config::status_policy::StatusPolicy;
use crate::error::{AppError, AppResult};
use crate::handlers::{ApiJson, ApiQuery};
use crate::middleware::AuthUser;
use crate::response::{IdResponse, PageWindow, PaginatedResponse};
use crate::services::action_log::{ActionLogger, ActionType, AuditEntry, RequestMeta};
use crate::services::assignment::{SmAgentAssignmentInput, SmAgentAssignmentView};
use crate::services::creator::Creator;
use crate::services::work_request::{
    NewWorkRequest, RequestFilter, WorkRequestRow, WorkRequestService, WorkRequestUpdate,
};
use crate::utils::geo::{deserialize_coordinate, GeoPoint};
use axum::{http::StatusCode, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RequestQuery {
    /// Fetch a single request
    pub id: Option<i32>,
    /// Creator id; requires `creator_type`
    pub creator_id: Option<i32>,
    /// `user`, `agent` or `socialmedia`; requires `creator_id`
    pub creator_type: Option<String>,
    /// Page size; a positive value selects the paginated listing
    pub limit: Option<i64>,
    /// 1-based page number
    pub page: Option<i64>,
    /// Case-insensitive text matched against address, creator and complaint type
    pub filter: Option<String>,
    /// Only requests assigned to this social media agent
    pub assigned_smagent_id: Option<i32>,
}

impl RequestQuery {
    fn creator(&self) -> AppResult<Option<Creator>> {
        match (self.creator_id, self.creator_type.as_deref()) {
            (Some(id), Some(kind)) => Creator::parse(id, kind).map(Some),
            (None, None) => Ok(None),
            _ => Err(AppError::Validation(
                "creator_id and creator_type must be provided together".to_string(),
            )),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkRequestResponse {
    pub id: i32,
    pub town_id: i32,
    pub town_name: Option<String>,
    pub subtown_id: Option<i32>,
    pub subtown_name: Option<String>,
    pub complaint_type_id: i32,
    pub complaint_type_name: Option<String>,
    pub complaint_subtype_id: Option<i32>,
    pub complaint_subtype_name: Option<String>,
    pub contact_number: String,
    pub address: String,
    pub description: String,
    pub request_date: String,
    pub status_id: i32,
    pub status_name: Option<String>,
    pub assigned_to: Option<i32>,
    pub assigned_to_name: Option<String>,
    pub creator_id: i32,
    pub creator_type: String,
    pub creator_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Omitted in the unpaginated listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_sm_agents: Option<Vec<SmAgentAssignmentView>>,
}

impl TryFrom<WorkRequestRow> for WorkRequestResponse {
    type Error = AppError;

    fn try_from(row: WorkRequestRow) -> AppResult<Self> {
        let geo = row.geo_point();
        let assigned_sm_agents = row
            .assigned_sm_agents
            .map(serde_json::from_value::<Vec<SmAgentAssignmentView>>)
            .transpose()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Bad assignment aggregate: {}", e)))?;

        Ok(Self {
            id: row.id,
            town_id: row.town_id,
            town_name: row.town_name,
            subtown_id: row.subtown_id,
            subtown_name: row.subtown_name,
            complaint_type_id: row.complaint_type_id,
            complaint_type_name: row.complaint_type_name,
            complaint_subtype_id: row.complaint_subtype_id,
            complaint_subtype_name: row.complaint_subtype_name,
            contact_number: row.contact_number,
            address: row.address,
            description: row.description,
            request_date: row.request_date.to_string(),
            status_id: row.status_id,
            status_name: row.status_name,
            assigned_to: row.assigned_to,
            assigned_to_name: row.assigned_to_name,
            creator_id: row.creator_id,
            creator_type: row.creator_type,
            creator_name: row.creator_name,
            latitude: geo.map(|p| p.latitude),
            longitude: geo.map(|p| p.longitude),
            assigned_sm_agents,
        })
    }
}

fn to_responses(rows: Vec<WorkRequestRow>) -> AppResult<Vec<WorkRequestResponse>> {
    rows.into_iter().map(WorkRequestResponse::try_from).collect()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkRequest {
    pub town_id: i32,
    pub subtown_id: Option<i32>,
    pub complaint_type_id: i32,
    pub complaint_subtype_id: Option<i32>,
    #[validate(length(min = 1, max = 30))]
    pub contact_number: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub creator_id: i32,
    /// `user`, `agent` or `socialmedia`
    pub creator_type: String,
    /// Stored only when longitude is also present
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateWorkRequest {
    pub id: i32,
    pub assigned_to: Option<i32>,
    pub status_id: i32,
    /// Absent or null: assignments untouched. Array: replaces all of them.
    #[serde(default)]
    pub assigned_sm_agents: Option<Vec<SmAgentAssignmentInput>>,
}

/// Detail, paginated listing or full listing depending on the query.
#[utoipa::path(
    get,
    path = "/api/requests",
    security(("jwt_token" = [])),
    params(RequestQuery),
    responses(
        (status = 200, description = "Single request, `{data, total}` page, or full array", body = WorkRequestResponse),
        (status = 400, description = "Invalid query", body = AppError),
        (status = 404, description = "Request not found", body = AppError),
    ),
    tag = "requests"
)]
pub async fn get_requests(
    Extension(db): Extension<DatabaseConnection>,
    _auth_user: AuthUser,
    ApiQuery(params): ApiQuery<RequestQuery>,
) -> AppResult<axum::response::Response> {
    let service = WorkRequestService::new(db);

    if let Some(id) = params.id {
        let row = service.get_detail(id).await?;
        return Ok(Json(WorkRequestResponse::try_from(row)?).into_response());
    }

    if let Some(window) = PageWindow::from_query(params.limit, params.page) {
        let filter = RequestFilter {
            creator: params.creator()?,
            assigned_sm_agent_id: params.assigned_smagent_id,
            text: params.filter.clone(),
        };
        let (rows, total) = service
            .list_page(&filter, window.limit, window.offset())
            .await?;
        return Ok(PaginatedResponse::new(to_responses(rows)?, total).into_response());
    }

    let rows = service.list_all().await?;
    Ok(Json(to_responses(rows)?).into_response())
}

#[utoipa::path(
    post,
    path = "/api/requests",
    security(("jwt_token" = [])),
    request_body = CreateWorkRequest,
    responses(
        (status = 201, description = "Request created", body = IdResponse),
        (status = 400, description = "Validation error", body = AppError),
    ),
    tag = "requests"
)]
pub async fn create_request(
    Extension(db): Extension<DatabaseConnection>,
    Extension(logger): Extension<ActionLogger>,
    auth_user: AuthUser,
    meta: RequestMeta,
    ApiJson(payload): ApiJson<CreateWorkRequest>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let creator = Creator::parse(payload.creator_id, &payload.creator_type)?;
    let geo = GeoPoint::from_parts(payload.latitude, payload.longitude)?;

    let service = WorkRequestService::new(db);
    let id = service
        .create(NewWorkRequest {
            town_id: payload.town_id,
            subtown_id: payload.subtown_id,
            complaint_type_id: payload.complaint_type_id,
            complaint_subtype_id: payload.complaint_subtype_id,
            contact_number: payload.contact_number,
            address: payload.address.clone(),
            description: payload.description,
            creator,
            geo,
        })
        .await?;

    logger.record(
        Some(&auth_user),
        &meta,
        AuditEntry::new(ActionType::Create, "work_request", id)
            .named(payload.address)
            .details(json!({
                "creator_id": creator.id(),
                "creator_type": creator.kind(),
                "has_location": geo.is_some(),
            })),
    );

    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

#[utoipa::path(
    put,
    path = "/api/requests",
    security(("jwt_token" = [])),
    request_body = UpdateWorkRequest,
    responses(
        (status = 200, description = "Updated request", body = WorkRequestResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Request not found", body = AppError),
    ),
    tag = "requests"
)]
pub async fn update_request(
    Extension(db): Extension<DatabaseConnection>,
    Extension(logger): Extension<ActionLogger>,
    Extension(policy): Extension<StatusPolicy>,
    auth_user: AuthUser,
    meta: RequestMeta,
    ApiJson(payload): ApiJson<UpdateWorkRequest>,
) -> AppResult<impl IntoResponse> {
    let update = WorkRequestUpdate {
        id: payload.id,
        assigned_to: payload.assigned_to,
        status_id: payload.status_id,
        assigned_sm_agents: payload.assigned_sm_agents,
    };

    let service = WorkRequestService::new(db);
    let row = service.update(&update, policy).await?;

    logger.record(
        Some(&auth_user),
        &meta,
        AuditEntry::new(ActionType::Update, "work_request", update.id).details(json!({
            "assigned_to": update.assigned_to,
            "status_id": update.status_id,
        })),
    );
    if let Some(agents) = &update.assigned_sm_agents {
        let ids: Vec<i32> = agents.iter().map(|a| a.sm_agent_id).collect();
        logger.record(
            Some(&auth_user),
            &meta,
            AuditEntry::new(ActionType::Assign, "work_request", update.id)
                .details(json!({ "sm_agent_ids": ids })),
        );
    }

    Ok(Json(WorkRequestResponse::try_from(row)?))
}
