//! Insert and patch types for the store.
//! Ids and timestamps are assigned by the store, never by callers.

use roomswap_types::models::{SwapKind, SwapStatus};

pub struct NewHostel {
    pub name: String,
    pub description: Option<String>,
}

pub struct NewRoom {
    pub hostel_id: i64,
    pub room_number: String,
    pub capacity: i64,
    pub floor: i64,
}

pub struct NewStudent {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub current_room_id: Option<i64>,
    pub preferences: Option<String>,
    pub is_looking_to_swap: bool,
}

/// Partial student update. `None` leaves a field alone; for nullable
/// columns `Some(None)` clears it.
#[derive(Debug, Default)]
pub struct StudentChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub current_room_id: Option<Option<i64>>,
    pub current_roommate_id: Option<Option<i64>>,
    pub preferences: Option<Option<String>>,
    pub is_looking_to_swap: Option<bool>,
}

pub struct NewSwapRequest {
    pub requester_id: i64,
    pub target_student_id: Option<i64>,
    pub target_room_id: Option<i64>,
    pub request_type: SwapKind,
    pub message: Option<String>,
}

/// Partial swap request update, same conventions as [`StudentChanges`].
#[derive(Debug, Default)]
pub struct SwapRequestChanges {
    pub status: Option<SwapStatus>,
    pub request_type: Option<SwapKind>,
    pub target_student_id: Option<Option<i64>>,
    pub target_room_id: Option<Option<i64>>,
    pub message: Option<Option<String>>,
}

pub struct NewMessage {
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
}
