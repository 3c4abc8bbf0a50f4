use crate::{middleware::auth::AuthUser, models::action_log};
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, JsonValue};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Create,
    Update,
    Delete,
    View,
    Assign,
    Unassign,
    Upload,
    Download,
    Login,
    Logout,
    Export,
    Import,
    Approve,
    Reject,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Create => "CREATE",
            ActionType::Update => "UPDATE",
            ActionType::Delete => "DELETE",
            ActionType::View => "VIEW",
            ActionType::Assign => "ASSIGN",
            ActionType::Unassign => "UNASSIGN",
            ActionType::Upload => "UPLOAD",
            ActionType::Download => "DOWNLOAD",
            ActionType::Login => "LOGIN",
            ActionType::Logout => "LOGOUT",
            ActionType::Export => "EXPORT",
            ActionType::Import => "IMPORT",
            ActionType::Approve => "APPROVE",
            ActionType::Reject => "REJECT",
        }
    }
}

/// Client address and user agent of the current request.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        // First hop of X-Forwarded-For wins over the socket peer.
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Self {
            ip_address: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
            user_agent,
        }
    }
}

impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_parts(&parts.headers, peer))
    }
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub action: ActionType,
    pub entity_type: &'static str,
    pub entity_id: Option<i32>,
    pub entity_name: Option<String>,
    pub details: JsonValue,
}

impl AuditEntry {
    pub fn new(action: ActionType, entity_type: &'static str, entity_id: i32) -> Self {
        Self {
            action,
            entity_type,
            entity_id: Some(entity_id),
            entity_name: None,
            details: JsonValue::Object(Default::default()),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.entity_name = Some(name.into());
        self
    }

    pub fn details(mut self, details: JsonValue) -> Self {
        self.details = details;
        self
    }
}

/// Audit sink. Inserts run on a detached task; a failed insert is logged and
/// never reaches the caller.
#[derive(Clone)]
pub struct ActionLogger {
    db: DatabaseConnection,
}

impl ActionLogger {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Queues an audit row and returns immediately.
    pub fn record(&self, actor: Option<&AuthUser>, meta: &RequestMeta, entry: AuditEntry) {
        let row = action_log::ActiveModel {
            actor_id: Set(actor.map(|a| a.id)),
            actor_type: Set(actor.map(|a| a.actor.as_str().to_string())),
            action_type: Set(entry.action.as_str().to_string()),
            entity_type: Set(entry.entity_type.to_string()),
            entity_id: Set(entry.entity_id),
            entity_name: Set(entry.entity_name),
            details: Set(entry.details),
            ip_address: Set(meta.ip_address.clone()),
            user_agent: Set(meta.user_agent.clone()),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        };

        let db = self.db.clone();
        let action = entry.action;
        tokio::spawn(async move {
            if let Err(e) = row.insert(&db).await {
                tracing::warn!(action = action.as_str(), "Failed to write action log: {}", e);
            }
        });
    }
}
