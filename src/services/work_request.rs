use crate::{
    config::status_policy::{StatusPolicy, PENDING},
    error::{AppError, AppResult},
    models::{work_request, Agent, Status, WorkRequest},
    services::{
        assignment::{self, SmAgentAssignmentInput},
        creator::Creator,
        lookup,
        query::{number_placeholders, SqlFilter},
    },
    utils::geo::{self, GeoPoint},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    DatabaseTransaction, EntityTrait, FromQueryResult, JsonValue, QuerySelect, Statement,
    TransactionTrait,
};

/// Columns common to every listing mode, minus the point decoding.
const ROW_FIELDS: &str = "SELECT wr.id, \
    wr.town_id, t.name AS town_name, \
    wr.subtown_id, st.name AS subtown_name, \
    wr.complaint_type_id, ct.type_name AS complaint_type_name, \
    wr.complaint_subtype_id, cst.subtype_name AS complaint_subtype_name, \
    wr.contact_number, wr.address, wr.description, wr.request_date, \
    wr.status_id, s.name AS status_name, \
    wr.assigned_to, asg.name AS assigned_to_name, \
    wr.creator_id, wr.creator_type, \
    COALESCE(cu.name, ca.name, cs.name) AS creator_name";

fn row_columns() -> String {
    format!("{}, {}", ROW_FIELDS, geo::decode_columns("wr"))
}

/// Correlated aggregate of social-media assignments, `[]` when there are none.
const ASSIGNMENTS_COLUMN: &str = "(SELECT COALESCE(json_agg(json_build_object( \
        'id', ra.id, \
        'sm_agent_id', ra.socialmedia_agent_id, \
        'sm_agent_name', sp.name, \
        'status', ra.status, \
        'created_at', ra.created_at) ORDER BY ra.id), '[]'::json) \
    FROM request_assign_smagent ra \
    JOIN socialmediaperson sp ON sp.id = ra.socialmedia_agent_id \
    WHERE ra.work_requests_id = wr.id) AS assigned_sm_agents";

/// Creator joins are gated on the type tag so at most one of them matches.
const ROW_SOURCE: &str = "FROM work_requests wr \
    LEFT JOIN town t ON t.id = wr.town_id \
    LEFT JOIN subtown st ON st.id = wr.subtown_id \
    LEFT JOIN complaint_types ct ON ct.id = wr.complaint_type_id \
    LEFT JOIN complaint_subtypes cst ON cst.id = wr.complaint_subtype_id \
    LEFT JOIN status s ON s.id = wr.status_id \
    LEFT JOIN agents asg ON asg.id = wr.assigned_to \
    LEFT JOIN users cu ON wr.creator_type = 'user' AND cu.id = wr.creator_id \
    LEFT JOIN agents ca ON wr.creator_type = 'agent' AND ca.id = wr.creator_id \
    LEFT JOIN socialmediaperson cs ON wr.creator_type = 'socialmedia' AND cs.id = wr.creator_id";

const NEWEST_FIRST: &str = "ORDER BY wr.request_date DESC";

/// Columns matched by the free-text filter.
const TEXT_FILTER_COLUMNS: [&str; 5] = [
    "wr.address ILIKE ?",
    "cu.name ILIKE ?",
    "ca.name ILIKE ?",
    "cs.name ILIKE ?",
    "ct.type_name ILIKE ?",
];

#[derive(Debug, Clone, FromQueryResult)]
pub struct WorkRequestRow {
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
    pub request_date: chrono::NaiveDateTime,
    pub status_id: i32,
    pub status_name: Option<String>,
    pub assigned_to: Option<i32>,
    pub assigned_to_name: Option<String>,
    pub creator_id: i32,
    pub creator_type: String,
    pub creator_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Present only in detail and paginated rows.
    pub assigned_sm_agents: Option<JsonValue>,
}

impl WorkRequestRow {
    pub fn geo_point(&self) -> Option<GeoPoint> {
        GeoPoint::from_columns(self.latitude, self.longitude)
    }
}

/// Optional filters of the paginated listing. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub creator: Option<Creator>,
    pub assigned_sm_agent_id: Option<i32>,
    /// Case-insensitive substring matched against address, creator names and
    /// complaint type name.
    pub text: Option<String>,
}

impl RequestFilter {
    fn to_sql(&self) -> SqlFilter {
        let mut filter = SqlFilter::new();

        if let Some(creator) = self.creator {
            filter.and(
                "wr.creator_id = ? AND wr.creator_type = ?",
                [creator.id().into(), creator.kind().as_str().into()],
            );
        }

        if let Some(agent_id) = self.assigned_sm_agent_id {
            filter
                .join("JOIN request_assign_smagent fa ON fa.work_requests_id = wr.id")
                .and("fa.socialmedia_agent_id = ?", [agent_id.into()]);
        }

        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            filter.any_of(&TEXT_FILTER_COLUMNS, format!("%{}%", text).into());
        }

        filter
    }
}

#[derive(Debug, Clone)]
pub struct NewWorkRequest {
    pub town_id: i32,
    pub subtown_id: Option<i32>,
    pub complaint_type_id: i32,
    pub complaint_subtype_id: Option<i32>,
    pub contact_number: String,
    pub address: String,
    pub description: String,
    pub creator: Creator,
    pub geo: Option<GeoPoint>,
}

#[derive(Debug, Clone)]
pub struct WorkRequestUpdate {
    pub id: i32,
    pub assigned_to: Option<i32>,
    pub status_id: i32,
    /// `None` leaves assignments untouched; `Some(vec![])` clears them.
    pub assigned_sm_agents: Option<Vec<SmAgentAssignmentInput>>,
}

/// Reads use raw statements: rows are enriched across the lookup and identity
/// tables and the point column needs PostGIS accessors.
pub struct WorkRequestService {
    db: DatabaseConnection,
}

impl WorkRequestService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_detail(&self, id: i32) -> AppResult<WorkRequestRow> {
        let mut filter = SqlFilter::new();
        filter.and("wr.id = ?", [id.into()]);
        let head = format!("{}, {} {}", row_columns(), ASSIGNMENTS_COLUMN, ROW_SOURCE);

        WorkRequestRow::find_by_statement(filter.statement(&head, "", vec![]))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// One page of matching rows plus the total match count.
    pub async fn list_page(
        &self,
        filter: &RequestFilter,
        limit: u64,
        offset: i64,
    ) -> AppResult<(Vec<WorkRequestRow>, u64)> {
        let sql_filter = filter.to_sql();

        let count_head = format!("SELECT COUNT(*) AS count {}", ROW_SOURCE);
        let count_row = self
            .db
            .query_one(sql_filter.statement(&count_head, "", vec![]))
            .await?
            .ok_or(AppError::Internal(anyhow::anyhow!("Count query failed")))?;
        let total: i64 = count_row.try_get_by_index(0)?;

        let head = format!("{}, {} {}", row_columns(), ASSIGNMENTS_COLUMN, ROW_SOURCE);
        let rows = WorkRequestRow::find_by_statement(sql_filter.statement(
            &head,
            &format!("{} LIMIT ? OFFSET ?", NEWEST_FIRST),
            vec![(limit as i64).into(), offset.into()],
        ))
        .all(&self.db)
        .await?;

        Ok((rows, total as u64))
    }

    /// Every row, newest first, without the assignment aggregate.
    pub async fn list_all(&self) -> AppResult<Vec<WorkRequestRow>> {
        let head = format!(
            "{}, NULL::json AS assigned_sm_agents {}",
            row_columns(),
            ROW_SOURCE
        );
        let rows = WorkRequestRow::find_by_statement(SqlFilter::new().statement(
            &head,
            NEWEST_FIRST,
            vec![],
        ))
        .all(&self.db)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, input: NewWorkRequest) -> AppResult<i32> {
        let creator_name = input.creator.ensure_exists(&self.db).await?;
        lookup::ensure_location(&self.db, input.town_id, input.subtown_id).await?;
        lookup::ensure_category(&self.db, input.complaint_type_id, input.complaint_subtype_id)
            .await?;

        let sql = number_placeholders(&format!(
            "INSERT INTO work_requests \
                (town_id, subtown_id, complaint_type_id, complaint_subtype_id, contact_number, \
                 address, description, geo_tag, request_date, status_id, creator_id, creator_type) \
             VALUES (?, ?, ?, ?, ?, ?, ?, {}, NOW(), \
                 (SELECT id FROM status WHERE name = ?), ?, ?) \
             RETURNING id",
            geo::point_from_param()
        ));

        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                sql,
                vec![
                    input.town_id.into(),
                    input.subtown_id.into(),
                    input.complaint_type_id.into(),
                    input.complaint_subtype_id.into(),
                    input.contact_number.into(),
                    input.address.into(),
                    input.description.into(),
                    input.geo.map(|p| p.to_wkt()).into(),
                    PENDING.into(),
                    input.creator.id().into(),
                    input.creator.kind().as_str().into(),
                ],
            ))
            .await?
            .ok_or(AppError::Internal(anyhow::anyhow!("Insert returned no id")))?;

        let id: i32 = row.try_get("", "id")?;
        tracing::info!(
            request_id = id,
            creator_type = %input.creator.kind(),
            creator_id = input.creator.id(),
            creator_name = %creator_name,
            "work request created"
        );
        Ok(id)
    }

    /// Writes assignee, status and (when supplied) the full assignment list in
    /// one transaction, then returns the refreshed detail row.
    pub async fn update(
        &self,
        update: &WorkRequestUpdate,
        policy: StatusPolicy,
    ) -> AppResult<WorkRequestRow> {
        let txn = self.db.begin().await?;

        match apply_update(&txn, update, policy).await {
            Ok(()) => txn.commit().await?,
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Rollback failed: {:?}", rollback_err);
                }
                return Err(e);
            }
        }

        self.get_detail(update.id).await
    }

    /// Status label of a request, used by the media upload gate.
    pub async fn status_label(&self, id: i32) -> AppResult<String> {
        let request = WorkRequest::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        let status = Status::find_by_id(request.status_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::Internal(anyhow::anyhow!(
                "work request {} references missing status {}",
                id,
                request.status_id
            )))?;
        Ok(status.name)
    }
}

async fn apply_update(
    txn: &DatabaseTransaction,
    update: &WorkRequestUpdate,
    policy: StatusPolicy,
) -> AppResult<()> {
    // Row lock keeps the status check and the write consistent.
    let existing = WorkRequest::find_by_id(update.id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let target = Status::find_by_id(update.status_id)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown status_id: {}", update.status_id)))?;

    if existing.status_id != target.id {
        let current = Status::find_by_id(existing.status_id)
            .one(txn)
            .await?
            .map(|s| s.name)
            .unwrap_or_default();
        if !policy.allows(&current, &target.name) {
            return Err(AppError::Validation(format!(
                "Status change from '{}' to '{}' is not allowed",
                current, target.name
            )));
        }
    }

    if let Some(agent_id) = update.assigned_to {
        Agent::find_by_id(agent_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown assigned_to agent: {}", agent_id)))?;
    }

    let mut active: work_request::ActiveModel = existing.into();
    active.assigned_to = Set(update.assigned_to);
    active.status_id = Set(update.status_id);
    active.update(txn).await?;

    if let Some(inputs) = &update.assigned_sm_agents {
        assignment::replace_sm_agents(txn, update.id, inputs).await?;
    }

    Ok(())
}
