use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use roomswap_db::Store;
use roomswap_db::models::NewStudent;
use roomswap_types::api::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, StatusMessage,
};

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::middleware::AuthSession;
use crate::password;
use crate::sessions::SessionRegistry;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn Store>,
    pub sessions: SessionRegistry,
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.student_id.trim().is_empty()
        || req.name.trim().is_empty()
        || req.password.is_empty()
        || !req.email.contains('@')
    {
        return Err(ApiError::invalid_data());
    }

    // Friendly messages first; the store's unique constraints catch any race.
    if state
        .store
        .get_student_by_student_id(&req.student_id)?
        .is_some()
    {
        return Err(ApiError::BadRequest("Student ID already exists".to_string()));
    }
    if state.store.get_student_by_email(&req.email)?.is_some() {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = password::hash(req.password).await?;

    let student = state.store.create_student(NewStudent {
        student_id: req.student_id,
        name: req.name,
        email: req.email,
        password_hash,
        current_room_id: None,
        preferences: req.preferences,
        is_looking_to_swap: req.is_looking_to_swap.unwrap_or(false),
    })?;

    info!("Registered student {} (id {})", student.student_id, student.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            student: (&student).into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.student_id.is_empty() || req.password.is_empty() {
        return Err(ApiError::invalid_data());
    }

    let student = state
        .store
        .get_student_by_student_id(&req.student_id)?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify(req.password, student.password_hash.clone()).await? {
        return Err(ApiError::InvalidCredentials);
    }

    let session_id = state.sessions.create(student.id).await;
    info!("Student {} logged in", student.id);

    Ok(Json(LoginResponse {
        session_id,
        student: (&student).into(),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Json<StatusMessage> {
    state.sessions.revoke(&session.token).await;
    info!("Student {} logged out", session.student_id);

    Json(StatusMessage {
        message: "Logged out successfully".to_string(),
    })
}
