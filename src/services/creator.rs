use crate::{
    error::{AppError, AppResult},
    models::{agent, socialmedia_agent, user},
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CreatorKind {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "agent")]
    Agent,
    #[serde(rename = "socialmedia")]
    SocialMedia,
}

impl CreatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatorKind::User => "user",
            CreatorKind::Agent => "agent",
            CreatorKind::SocialMedia => "socialmedia",
        }
    }
}

impl fmt::Display for CreatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreatorKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(CreatorKind::User),
            "agent" => Ok(CreatorKind::Agent),
            "socialmedia" => Ok(CreatorKind::SocialMedia),
            _ => Err(AppError::Validation(format!("Invalid creator type: {}", s))),
        }
    }
}

/// Typed form of a `(creator_id, creator_type)` pair. Each variant points into
/// its own identity table, reached through [`IdentityTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creator {
    User(i32),
    Agent(i32),
    SocialMedia(i32),
}

impl Creator {
    pub fn new(kind: CreatorKind, id: i32) -> Self {
        match kind {
            CreatorKind::User => Creator::User(id),
            CreatorKind::Agent => Creator::Agent(id),
            CreatorKind::SocialMedia => Creator::SocialMedia(id),
        }
    }

    /// Parses the wire pair. The type tag is checked before anything else.
    pub fn parse(id: i32, kind: &str) -> AppResult<Self> {
        let kind: CreatorKind = kind.parse()?;
        Ok(Self::new(kind, id))
    }

    pub fn id(&self) -> i32 {
        match *self {
            Creator::User(id) | Creator::Agent(id) | Creator::SocialMedia(id) => id,
        }
    }

    pub fn kind(&self) -> CreatorKind {
        match self {
            Creator::User(_) => CreatorKind::User,
            Creator::Agent(_) => CreatorKind::Agent,
            Creator::SocialMedia(_) => CreatorKind::SocialMedia,
        }
    }

    pub async fn exists<C: ConnectionTrait>(&self, conn: &C) -> AppResult<bool> {
        match *self {
            Creator::User(id) => identity_exists::<user::Entity, _>(conn, id).await,
            Creator::Agent(id) => identity_exists::<agent::Entity, _>(conn, id).await,
            Creator::SocialMedia(id) => {
                identity_exists::<socialmedia_agent::Entity, _>(conn, id).await
            }
        }
    }

    pub async fn display_name<C: ConnectionTrait>(&self, conn: &C) -> AppResult<Option<String>> {
        match *self {
            Creator::User(id) => identity_name::<user::Entity, _>(conn, id).await,
            Creator::Agent(id) => identity_name::<agent::Entity, _>(conn, id).await,
            Creator::SocialMedia(id) => {
                identity_name::<socialmedia_agent::Entity, _>(conn, id).await
            }
        }
    }

    /// Gate used before inserting anything that references this creator.
    /// Returns the creator's display name.
    pub async fn ensure_exists<C: ConnectionTrait>(&self, conn: &C) -> AppResult<String> {
        self.display_name(conn).await?.ok_or_else(|| {
            AppError::Validation(format!(
                "Creator not found: {} {}",
                self.kind(),
                self.id()
            ))
        })
    }
}

/// An identity table exposing at least `id` and `name`.
pub trait IdentityTable: EntityTrait {
    fn id_column() -> Self::Column;
    fn name_column() -> Self::Column;
}

impl IdentityTable for user::Entity {
    fn id_column() -> Self::Column {
        user::Column::Id
    }
    fn name_column() -> Self::Column {
        user::Column::Name
    }
}

impl IdentityTable for agent::Entity {
    fn id_column() -> Self::Column {
        agent::Column::Id
    }
    fn name_column() -> Self::Column {
        agent::Column::Name
    }
}

impl IdentityTable for socialmedia_agent::Entity {
    fn id_column() -> Self::Column {
        socialmedia_agent::Column::Id
    }
    fn name_column() -> Self::Column {
        socialmedia_agent::Column::Name
    }
}

pub async fn identity_exists<E, C>(conn: &C, id: i32) -> AppResult<bool>
where
    E: IdentityTable,
    C: ConnectionTrait,
{
    let found = E::find()
        .select_only()
        .column(E::id_column())
        .filter(E::id_column().eq(id))
        .into_tuple::<i32>()
        .one(conn)
        .await?;
    Ok(found.is_some())
}

pub async fn identity_name<E, C>(conn: &C, id: i32) -> AppResult<Option<String>>
where
    E: IdentityTable,
    C: ConnectionTrait,
{
    let name = E::find()
        .select_only()
        .column(E::name_column())
        .filter(E::id_column().eq(id))
        .into_tuple::<String>()
        .one(conn)
        .await?;
    Ok(name)
}

/// Returns the ids from `ids` that have no row in `E`.
pub async fn missing_identities<E, C>(conn: &C, ids: &[i32]) -> AppResult<Vec<i32>>
where
    E: IdentityTable,
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let found: Vec<i32> = E::find()
        .select_only()
        .column(E::id_column())
        .filter(E::id_column().is_in(ids.iter().copied()))
        .into_tuple::<i32>()
        .all(conn)
        .await?;
    Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
}
