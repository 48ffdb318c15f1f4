use axum::{Extension, Json, extract::State};
use tracing::{debug, info};

use roomswap_db::Store;
use roomswap_db::models::StudentChanges;
use roomswap_types::api::{ProfileResponse, RoomDetails, UpdateProfileRequest};
use roomswap_types::models::Student;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::middleware::AuthSession;
use crate::password;

/// Room joined with its hostel, or `None` when the student has no room or the
/// room id no longer resolves.
pub(crate) fn room_details(
    store: &dyn Store,
    room_id: Option<i64>,
) -> Result<Option<RoomDetails>, ApiError> {
    let Some(room) = room_id.map(|id| store.get_room(id)).transpose()?.flatten() else {
        return Ok(None);
    };
    let hostel = store.get_hostel(room.hostel_id)?;
    Ok(Some(RoomDetails { room, hostel }))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let store = state.store.as_ref();
    let student = store
        .get_student(session.student_id)?
        .ok_or(ApiError::NotFound("Student not found"))?;

    let room_details = room_details(store, student.current_room_id)?;
    let roommate_details = match student.current_roommate_id {
        Some(id) => store.get_student(id)?,
        None => None,
    };

    Ok(Json(ProfileResponse {
        student,
        room_details,
        roommate_details,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    ValidJson(req): ValidJson<UpdateProfileRequest>,
) -> Result<Json<Student>, ApiError> {
    let store = state.store.as_ref();

    if req.carries_identity() {
        debug!(
            "Ignoring identity fields in profile update from student {}",
            session.student_id
        );
    }
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty())
        || req.password.as_deref().is_some_and(str::is_empty)
    {
        return Err(ApiError::invalid_data());
    }
    if let Some(Some(room_id)) = req.current_room_id {
        store
            .get_room(room_id)?
            .ok_or(ApiError::NotFound("Room not found"))?;
    }
    if let Some(Some(roommate_id)) = req.current_roommate_id {
        if roommate_id == session.student_id {
            return Err(ApiError::BadRequest(
                "A student cannot be their own roommate".to_string(),
            ));
        }
        store
            .get_student(roommate_id)?
            .ok_or(ApiError::NotFound("Roommate not found"))?;
    }

    let password_hash = match req.password {
        Some(plain) => Some(password::hash(plain).await?),
        None => None,
    };

    let student = store
        .update_student(
            session.student_id,
            StudentChanges {
                name: req.name,
                password_hash,
                current_room_id: req.current_room_id,
                current_roommate_id: req.current_roommate_id,
                preferences: req.preferences,
                is_looking_to_swap: req.is_looking_to_swap,
            },
        )?
        .ok_or(ApiError::NotFound("Student not found"))?;

    info!("Student {} updated their profile", student.id);
    Ok(Json(student))
}
