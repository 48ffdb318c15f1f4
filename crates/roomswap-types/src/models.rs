use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hostel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub hostel_id: i64,
    pub room_number: String,
    pub capacity: i64,
    pub floor: i64,
}

/// A registered student.
///
/// The password hash never leaves the server: it is skipped on serialization,
/// so any `Student` can be returned from a handler as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub current_room_id: Option<i64>,
    /// Not kept symmetric: B naming A does not make A name B.
    pub current_roommate_id: Option<i64>,
    pub preferences: Option<String>,
    pub is_looking_to_swap: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapKind {
    Direct,
    Chain,
}

/// Swap request status.
///
/// `Accepted`, `Declined` and `Completed` are terminal in intent, but nothing
/// stops an update from moving a request out of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    Completed,
}

impl SwapKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapKind::Direct => "direct",
            SwapKind::Chain => "chain",
        }
    }
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Declined => "declined",
            SwapStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SwapStatus::Pending)
    }
}

/// Returned when a stored enum column holds an unrecognised value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for SwapKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(SwapKind::Direct),
            "chain" => Ok(SwapKind::Chain),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl FromStr for SwapStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SwapStatus::Pending),
            "accepted" => Ok(SwapStatus::Accepted),
            "declined" => Ok(SwapStatus::Declined),
            "completed" => Ok(SwapStatus::Completed),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub id: i64,
    pub requester_id: i64,
    pub target_student_id: Option<i64>,
    pub target_room_id: Option<i64>,
    pub request_type: SwapKind,
    pub status: SwapStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A multi-party rotation. Storable, but nothing produces one yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapChain {
    pub id: i64,
    pub chain_data: String,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_match_storage_names() {
        for status in [
            SwapStatus::Pending,
            SwapStatus::Accepted,
            SwapStatus::Declined,
            SwapStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<SwapStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!("triangle".parse::<SwapKind>().is_err());
        assert!(serde_json::from_str::<SwapKind>("\"triangle\"").is_err());
    }

    #[test]
    fn student_serialization_omits_password() {
        let student = Student {
            id: 1,
            student_id: "CS21B047".into(),
            name: "Rahul Sharma".into(),
            email: "rahul@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            current_room_id: Some(1),
            current_roommate_id: None,
            preferences: None,
            is_looking_to_swap: false,
        };

        let value = serde_json::to_value(&student).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(value["studentId"], "CS21B047");
        assert_eq!(value["currentRoomId"], 1);
        assert_eq!(value["isLookingToSwap"], false);
    }
}
