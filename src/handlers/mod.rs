pub mod complaint;
pub mod lookup;
pub mod media;
pub mod request;

use crate::error::AppError;
use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Multipart, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

/// `Json` whose rejections (malformed body, missing fields, wrong content type)
/// surface as `AppError::Validation` so clients always get `{error}` with 400.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// `Query` with the same error body as [`ApiJson`].
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

pub struct ApiMultipart(pub Multipart);

impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(multipart_rejection)
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn path_rejection(rejection: PathRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    AppError::Validation(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct IdQuery {
        id: Option<i32>,
    }

    #[tokio::test]
    async fn bad_query_value_is_a_validation_error() {
        let (mut parts, _) = HttpRequest::builder()
            .uri("/api/requests?id=abc")
            .body(())
            .unwrap()
            .into_parts();

        let err = ApiQuery::<IdQuery>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn good_query_passes_through() {
        let (mut parts, _) = HttpRequest::builder()
            .uri("/api/requests?id=7")
            .body(())
            .unwrap()
            .into_parts();

        let ApiQuery(q) = ApiQuery::<IdQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(q.id, Some(7));
    }

    #[tokio::test]
    async fn non_multipart_body_is_a_validation_error() {
        let req = HttpRequest::builder()
            .uri("/api/requests/1/media")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{}"))
            .unwrap();

        let err = ApiMultipart::from_request(req, &()).await.err().unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
