//! Extractors that turn axum's plain-text rejections into `ApiError`s, so
//! malformed input always gets the `{ "message": ... }` shape.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::request::Parts,
};
use tracing::debug;

use crate::error::ApiError;

/// JSON body. Unknown fields are rejected by the DTOs themselves.
pub struct ValidJson<T>(pub T);

pub struct ValidPath<T>(pub T);

pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!("Rejected request body: {}", rejection.body_text());
                Err(ApiError::invalid_data())
            }
        }
    }
}

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!("Rejected path: {}", rejection.body_text());
                Err(ApiError::invalid_data())
            }
        }
    }
}

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => {
                debug!("Rejected query: {}", rejection.body_text());
                Err(ApiError::invalid_data())
            }
        }
    }
}
