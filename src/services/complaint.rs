use crate::{
    error::{AppError, AppResult},
    models::Complaint,
    services::{lookup, query::number_placeholders},
    utils::geo::{self, GeoPoint},
};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, FromQueryResult, Statement,
};

#[derive(Debug, Clone, FromQueryResult)]
pub struct ComplaintRow {
    pub id: i32,
    pub town_id: i32,
    pub town_name: Option<String>,
    pub complaint_type_id: i32,
    pub complaint_type_name: Option<String>,
    pub contact_number: String,
    pub address: String,
    pub description: String,
    pub created_at: chrono::NaiveDateTime,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewComplaint {
    pub town_id: i32,
    pub complaint_type_id: i32,
    pub contact_number: String,
    pub address: String,
    pub description: String,
    pub geo: Option<GeoPoint>,
}

pub struct ComplaintService {
    db: DatabaseConnection,
}

impl ComplaintService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: NewComplaint) -> AppResult<i32> {
        lookup::ensure_location(&self.db, input.town_id, None).await?;
        lookup::ensure_category(&self.db, input.complaint_type_id, None).await?;

        let sql = number_placeholders(&format!(
            "INSERT INTO complaints \
                (town_id, complaint_type_id, contact_number, address, description, geo_tag, created_at) \
             VALUES (?, ?, ?, ?, ?, {}, NOW()) RETURNING id",
            geo::point_from_param()
        ));

        let row = self
            .db
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                sql,
                vec![
                    input.town_id.into(),
                    input.complaint_type_id.into(),
                    input.contact_number.into(),
                    input.address.into(),
                    input.description.into(),
                    input.geo.map(|p| p.to_wkt()).into(),
                ],
            ))
            .await?
            .ok_or(AppError::Internal(anyhow::anyhow!("Insert returned no id")))?;

        Ok(row.try_get("", "id")?)
    }

    pub async fn list(&self) -> AppResult<Vec<ComplaintRow>> {
        let sql = format!(
            "SELECT c.id, c.town_id, t.name AS town_name, \
                c.complaint_type_id, ct.type_name AS complaint_type_name, \
                c.contact_number, c.address, c.description, c.created_at, {} \
             FROM complaints c \
             LEFT JOIN town t ON t.id = c.town_id \
             LEFT JOIN complaint_types ct ON ct.id = c.complaint_type_id \
             ORDER BY c.created_at DESC, c.id DESC",
            geo::decode_columns("c")
        );

        Ok(ComplaintRow::find_by_statement(Statement::from_string(
            DatabaseBackend::Postgres,
            sql,
        ))
        .all(&self.db)
        .await?)
    }

    pub async fn delete(&self, id: i32) -> AppResult<i32> {
        let result = Complaint::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        tracing::info!(complaint_id = id, "complaint deleted");
        Ok(id)
    }
}
