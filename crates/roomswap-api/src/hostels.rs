use axum::{Json, extract::State};

use roomswap_types::api::{RoomOccupancy, RoomQuery};
use roomswap_types::models::{Hostel, Room};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::{ValidPath, ValidQuery};

pub async fn list_hostels(State(state): State<AppState>) -> Result<Json<Vec<Hostel>>, ApiError> {
    Ok(Json(state.store.list_hostels()?))
}

pub async fn get_hostel(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<Hostel>, ApiError> {
    let hostel = state
        .store
        .get_hostel(id)?
        .ok_or(ApiError::NotFound("Hostel not found"))?;
    Ok(Json(hostel))
}

/// `GET /api/rooms?hostelId=` — all rooms, or one hostel's.
pub async fn list_rooms(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<RoomQuery>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let rooms = match query.hostel_id {
        Some(hostel_id) => state.store.list_rooms_by_hostel(hostel_id)?,
        None => state.store.list_rooms()?,
    };
    Ok(Json(rooms))
}

pub async fn get_room(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i64>,
) -> Result<Json<RoomOccupancy>, ApiError> {
    let room = state
        .store
        .get_room(id)?
        .ok_or(ApiError::NotFound("Room not found"))?;
    let hostel = state.store.get_hostel(room.hostel_id)?;
    let occupants = state.store.room_occupants(room.id)?;

    Ok(Json(RoomOccupancy {
        room,
        hostel,
        occupants,
    }))
}
