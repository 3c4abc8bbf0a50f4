use crate::{
    error::AppError,
    services::creator::{Creator, CreatorKind},
    utils::jwt::{decode_jwt, is_access_token},
};
use axum::{
    extract::{FromRequestParts, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
    Extension,
};
use sea_orm::DatabaseConnection;

/// Identity of the caller, taken from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub actor: CreatorKind,
    pub role: String,
}

impl AuthUser {
    pub fn creator(&self) -> Creator {
        Creator::new(self.actor, self.id)
    }
}

/// JWT authentication middleware
///
/// Verifies the bearer token, checks that the identity still exists in the
/// table named by its actor type, and adds it to request extensions.
pub async fn auth_middleware(
    Extension(db): Extension<DatabaseConnection>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&headers).ok_or(AppError::Unauthorized)?;

    let claims = decode_jwt(&token).map_err(|_| AppError::Unauthorized)?;

    if !is_access_token(&claims) {
        return Err(AppError::Unauthorized);
    }

    let id: i32 = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;
    let auth_user = AuthUser {
        id,
        actor: claims.actor,
        role: claims.role,
    };

    if !auth_user.creator().exists(&db).await? {
        tracing::debug!(actor = %auth_user.actor, id, "token for unknown identity");
        return Err(AppError::Unauthorized);
    }

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    let token = auth_header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
