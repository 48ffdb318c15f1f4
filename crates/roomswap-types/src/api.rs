use serde::{Deserialize, Deserializer, Serialize};

use crate::models::{Hostel, Room, Student, SwapKind, SwapRequest, SwapStatus};

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
/// in partial updates. Pair with `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub student_id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: String,
    pub student: StudentSummary,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default)]
    pub is_looking_to_swap: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub student: StudentSummary,
}

/// The public identity fields returned by login and registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    pub email: String,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            student_id: student.student_id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
        }
    }
}

/// Plain `{ "message": ... }` body used for errors and acknowledgements.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

// -- Students --

/// `PUT /api/students/me`. Identity fields (`id`, `studentId`, `email`) are
/// accepted so a full profile form can be posted back, but never applied.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_room_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub current_roommate_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub preferences: Option<Option<String>>,
    #[serde(default)]
    pub is_looking_to_swap: Option<bool>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    /// True when any read-only identity field was sent along.
    pub fn carries_identity(&self) -> bool {
        self.id.is_some() || self.student_id.is_some() || self.email.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomDetails {
    #[serde(flatten)]
    pub room: Room,
    pub hostel: Option<Hostel>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub student: Student,
    pub room_details: Option<RoomDetails>,
    pub roommate_details: Option<Student>,
}

// -- Hostels & rooms --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomQuery {
    pub hostel_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct RoomOccupancy {
    #[serde(flatten)]
    pub room: Room,
    pub hostel: Option<Hostel>,
    pub occupants: Vec<Student>,
}

// -- Swap requests --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSwapRequest {
    pub request_type: SwapKind,
    #[serde(default)]
    pub target_student_id: Option<i64>,
    #[serde(default)]
    pub target_room_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    /// Accepted for compatibility, always overwritten by the session identity.
    #[serde(default)]
    pub requester_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSwapRequest {
    #[serde(default)]
    pub status: Option<SwapStatus>,
    #[serde(default)]
    pub request_type: Option<SwapKind>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_student_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_room_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub message: Option<Option<String>>,
}

/// Which side of a request the caller is on, with the other party joined in.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SwapDirection {
    #[serde(rename_all = "camelCase")]
    Outgoing { target_student: Option<Student> },
    Incoming { requester: Option<Student> },
}

#[derive(Debug, Serialize)]
pub struct SwapRequestView {
    #[serde(flatten)]
    pub request: SwapRequest,
    #[serde(flatten)]
    pub direction: SwapDirection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSwap {
    #[serde(flatten)]
    pub student: Student,
    pub room_details: Option<RoomDetails>,
    pub match_score: u8,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    pub other_student_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendMessageRequest {
    pub receiver_id: i64,
    pub content: String,
    /// Ignored; the sender is always the authenticated student.
    #[serde(default)]
    pub sender_id: Option<i64>,
}
