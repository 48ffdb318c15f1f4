use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::auth::AppState;
use crate::error::ApiError;

/// The authenticated caller, available to protected handlers as an extension.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub student_id: i64,
    pub token: String,
}

/// Resolve the `Authorization: Bearer` token against the session registry.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
        .ok_or(ApiError::Unauthorized)?;

    let student_id = state
        .sessions
        .validate(&token)
        .await
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(AuthSession { student_id, token });
    Ok(next.run(req).await)
}
