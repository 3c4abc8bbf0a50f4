use crate::{
    error::{AppError, AppResult},
    models::{
        complaint_subtype, complaint_type, subtown, ComplaintSubtype, ComplaintSubtypeModel,
        ComplaintType, ComplaintTypeModel, Status, StatusModel, Subtown, SubtownModel, Town,
        TownModel,
    },
};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Read-only access to the static town and complaint-category hierarchies.
pub struct LookupService {
    db: DatabaseConnection,
}

impl LookupService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn statuses(&self) -> AppResult<Vec<StatusModel>> {
        Ok(Status::find()
            .order_by_asc(crate::models::status::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn towns(&self) -> AppResult<Vec<TownModel>> {
        Ok(Town::find()
            .order_by_asc(crate::models::town::Column::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn subtowns(&self, town_id: i32) -> AppResult<Vec<SubtownModel>> {
        Town::find_by_id(town_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(Subtown::find()
            .filter(subtown::Column::TownId.eq(town_id))
            .order_by_asc(subtown::Column::Name)
            .all(&self.db)
            .await?)
    }

    pub async fn complaint_types(&self) -> AppResult<Vec<ComplaintTypeModel>> {
        Ok(ComplaintType::find()
            .order_by_asc(complaint_type::Column::TypeName)
            .all(&self.db)
            .await?)
    }

    pub async fn complaint_subtypes(&self, type_id: i32) -> AppResult<Vec<ComplaintSubtypeModel>> {
        ComplaintType::find_by_id(type_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(ComplaintSubtype::find()
            .filter(complaint_subtype::Column::ComplaintTypeId.eq(type_id))
            .order_by_asc(complaint_subtype::Column::SubtypeName)
            .all(&self.db)
            .await?)
    }
}

/// Checks that the town exists and, when given, that the subtown belongs to it.
pub async fn ensure_location<C: ConnectionTrait>(
    conn: &C,
    town_id: i32,
    subtown_id: Option<i32>,
) -> AppResult<()> {
    Town::find_by_id(town_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown town_id: {}", town_id)))?;

    if let Some(subtown_id) = subtown_id {
        let subtown = Subtown::find_by_id(subtown_id)
            .one(conn)
            .await?
            .ok_or_else(|| AppError::Validation(format!("Unknown subtown_id: {}", subtown_id)))?;
        if subtown.town_id != town_id {
            return Err(AppError::Validation(format!(
                "Subtown {} does not belong to town {}",
                subtown_id, town_id
            )));
        }
    }
    Ok(())
}

/// Checks that the complaint type exists and, when given, that the subtype
/// belongs to it.
pub async fn ensure_category<C: ConnectionTrait>(
    conn: &C,
    complaint_type_id: i32,
    complaint_subtype_id: Option<i32>,
) -> AppResult<()> {
    ComplaintType::find_by_id(complaint_type_id)
        .one(conn)
        .await?
        .ok_or_else(|| {
            AppError::Validation(format!("Unknown complaint_type_id: {}", complaint_type_id))
        })?;

    if let Some(subtype_id) = complaint_subtype_id {
        let subtype = ComplaintSubtype::find_by_id(subtype_id)
            .one(conn)
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!("Unknown complaint_subtype_id: {}", subtype_id))
            })?;
        if subtype.complaint_type_id != complaint_type_id {
            return Err(AppError::Validation(format!(
                "Complaint subtype {} does not belong to type {}",
                subtype_id, complaint_type_id
            )));
        }
    }
    Ok(())
}
