use std::str::FromStr;

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Params, Row};

use roomswap_types::models::{Hostel, Message, Room, Student, SwapChain, SwapRequest, SwapStatus};

use crate::models::{
    NewHostel, NewMessage, NewRoom, NewStudent, NewSwapRequest, StudentChanges,
    SwapRequestChanges,
};
use crate::{Database, DbError, Result, Store};

const HOSTEL_COLUMNS: &str = "id, name, description";
const ROOM_COLUMNS: &str = "id, hostel_id, room_number, capacity, floor";
const STUDENT_COLUMNS: &str = "id, student_id, name, email, password, current_room_id, \
     current_roommate_id, preferences, is_looking_to_swap";
const SWAP_REQUEST_COLUMNS: &str = "id, requester_id, target_student_id, target_room_id, \
     request_type, status, message, created_at, updated_at";
const SWAP_CHAIN_COLUMNS: &str = "id, chain_data, status, created_at";
const MESSAGE_COLUMNS: &str = "id, sender_id, receiver_id, content, is_read, created_at";

impl Store for Database {
    // -- Hostels --

    fn list_hostels(&self) -> Result<Vec<Hostel>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!("SELECT {HOSTEL_COLUMNS} FROM hostels ORDER BY id"),
                [],
                hostel_from_row,
            )
        })
    }

    fn get_hostel(&self, id: i64) -> Result<Option<Hostel>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {HOSTEL_COLUMNS} FROM hostels WHERE id = ?1"),
                [id],
                hostel_from_row,
            )
        })
    }

    fn create_hostel(&self, hostel: NewHostel) -> Result<Hostel> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO hostels (name, description) VALUES (?1, ?2)",
                rusqlite::params![hostel.name, hostel.description],
            )?;
            Ok(Hostel {
                id: conn.last_insert_rowid(),
                name: hostel.name,
                description: hostel.description,
            })
        })
    }

    // -- Rooms --

    fn list_rooms(&self) -> Result<Vec<Room>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!("SELECT {ROOM_COLUMNS} FROM rooms ORDER BY id"),
                [],
                room_from_row,
            )
        })
    }

    fn list_rooms_by_hostel(&self, hostel_id: i64) -> Result<Vec<Room>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE hostel_id = ?1 ORDER BY id"),
                [hostel_id],
                room_from_row,
            )
        })
    }

    fn get_room(&self, id: i64) -> Result<Option<Room>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {ROOM_COLUMNS} FROM rooms WHERE id = ?1"),
                [id],
                room_from_row,
            )
        })
    }

    fn create_room(&self, room: NewRoom) -> Result<Room> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO rooms (hostel_id, room_number, capacity, floor) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![room.hostel_id, room.room_number, room.capacity, room.floor],
            )?;
            Ok(Room {
                id: conn.last_insert_rowid(),
                hostel_id: room.hostel_id,
                room_number: room.room_number,
                capacity: room.capacity,
                floor: room.floor,
            })
        })
    }

    fn room_occupants(&self, room_id: i64) -> Result<Vec<Student>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!(
                    "SELECT {STUDENT_COLUMNS} FROM students WHERE current_room_id = ?1 ORDER BY id"
                ),
                [room_id],
                student_from_row,
            )
        })
    }

    // -- Students --

    fn get_student(&self, id: i64) -> Result<Option<Student>> {
        self.with_conn(|conn| query_student_by_id(conn, id))
    }

    fn get_student_by_student_id(&self, student_id: &str) -> Result<Option<Student>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1"),
                [student_id],
                student_from_row,
            )
        })
    }

    fn get_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE email = ?1"),
                [email],
                student_from_row,
            )
        })
    }

    fn create_student(&self, student: NewStudent) -> Result<Student> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO students (student_id, name, email, password, current_room_id, preferences, is_looking_to_swap)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    student.student_id,
                    student.name,
                    student.email,
                    student.password_hash,
                    student.current_room_id,
                    student.preferences,
                    student.is_looking_to_swap,
                ],
            )
            .map_err(map_unique_violation)?;

            Ok(Student {
                id: conn.last_insert_rowid(),
                student_id: student.student_id,
                name: student.name,
                email: student.email,
                password_hash: student.password_hash,
                current_room_id: student.current_room_id,
                current_roommate_id: None,
                preferences: student.preferences,
                is_looking_to_swap: student.is_looking_to_swap,
            })
        })
    }

    fn update_student(&self, id: i64, changes: StudentChanges) -> Result<Option<Student>> {
        self.with_conn(|conn| {
            let Some(mut student) = query_student_by_id(conn, id)? else {
                return Ok(None);
            };

            if let Some(name) = changes.name {
                student.name = name;
            }
            if let Some(password_hash) = changes.password_hash {
                student.password_hash = password_hash;
            }
            if let Some(room) = changes.current_room_id {
                student.current_room_id = room;
            }
            if let Some(roommate) = changes.current_roommate_id {
                student.current_roommate_id = roommate;
            }
            if let Some(preferences) = changes.preferences {
                student.preferences = preferences;
            }
            if let Some(looking) = changes.is_looking_to_swap {
                student.is_looking_to_swap = looking;
            }

            conn.execute(
                "UPDATE students
                 SET name = ?1, password = ?2, current_room_id = ?3, current_roommate_id = ?4,
                     preferences = ?5, is_looking_to_swap = ?6
                 WHERE id = ?7",
                rusqlite::params![
                    student.name,
                    student.password_hash,
                    student.current_room_id,
                    student.current_roommate_id,
                    student.preferences,
                    student.is_looking_to_swap,
                    id,
                ],
            )?;

            Ok(Some(student))
        })
    }

    fn students_looking_to_swap(&self) -> Result<Vec<Student>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!(
                    "SELECT {STUDENT_COLUMNS} FROM students WHERE is_looking_to_swap = 1 ORDER BY id"
                ),
                [],
                student_from_row,
            )
        })
    }

    // -- Swap requests --

    fn get_swap_request(&self, id: i64) -> Result<Option<SwapRequest>> {
        self.with_conn(|conn| query_swap_request_by_id(conn, id))
    }

    fn outgoing_swap_requests(&self, student_id: i64) -> Result<Vec<SwapRequest>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!(
                    "SELECT {SWAP_REQUEST_COLUMNS} FROM swap_requests WHERE requester_id = ?1 ORDER BY id"
                ),
                [student_id],
                swap_request_from_row,
            )
        })
    }

    fn incoming_swap_requests(&self, student_id: i64) -> Result<Vec<SwapRequest>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!(
                    "SELECT {SWAP_REQUEST_COLUMNS} FROM swap_requests WHERE target_student_id = ?1 ORDER BY id"
                ),
                [student_id],
                swap_request_from_row,
            )
        })
    }

    fn create_swap_request(&self, request: NewSwapRequest) -> Result<SwapRequest> {
        let now = Utc::now();
        let status = SwapStatus::default();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO swap_requests
                 (requester_id, target_student_id, target_room_id, request_type, status, message, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                rusqlite::params![
                    request.requester_id,
                    request.target_student_id,
                    request.target_room_id,
                    request.request_type.as_str(),
                    status.as_str(),
                    request.message,
                    now,
                ],
            )?;

            Ok(SwapRequest {
                id: conn.last_insert_rowid(),
                requester_id: request.requester_id,
                target_student_id: request.target_student_id,
                target_room_id: request.target_room_id,
                request_type: request.request_type,
                status,
                message: request.message,
                created_at: now,
                updated_at: now,
            })
        })
    }

    fn update_swap_request(
        &self,
        id: i64,
        changes: SwapRequestChanges,
    ) -> Result<Option<SwapRequest>> {
        self.with_conn(|conn| {
            let Some(mut request) = query_swap_request_by_id(conn, id)? else {
                return Ok(None);
            };

            if let Some(status) = changes.status {
                request.status = status;
            }
            if let Some(kind) = changes.request_type {
                request.request_type = kind;
            }
            if let Some(target) = changes.target_student_id {
                request.target_student_id = target;
            }
            if let Some(room) = changes.target_room_id {
                request.target_room_id = room;
            }
            if let Some(message) = changes.message {
                request.message = message;
            }
            request.updated_at = Utc::now();

            conn.execute(
                "UPDATE swap_requests
                 SET target_student_id = ?1, target_room_id = ?2, request_type = ?3, status = ?4,
                     message = ?5, updated_at = ?6
                 WHERE id = ?7",
                rusqlite::params![
                    request.target_student_id,
                    request.target_room_id,
                    request.request_type.as_str(),
                    request.status.as_str(),
                    request.message,
                    request.updated_at,
                    id,
                ],
            )?;

            Ok(Some(request))
        })
    }

    // -- Swap chains --

    fn create_swap_chain(&self, chain_data: &str) -> Result<SwapChain> {
        let now = Utc::now();
        let status = SwapStatus::default();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO swap_chains (chain_data, status, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![chain_data, status.as_str(), now],
            )?;
            Ok(SwapChain {
                id: conn.last_insert_rowid(),
                chain_data: chain_data.to_string(),
                status,
                created_at: now,
            })
        })
    }

    fn get_swap_chain(&self, id: i64) -> Result<Option<SwapChain>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {SWAP_CHAIN_COLUMNS} FROM swap_chains WHERE id = ?1"),
                [id],
                swap_chain_from_row,
            )
        })
    }

    // -- Messages --

    fn get_message(&self, id: i64) -> Result<Option<Message>> {
        self.with_conn(|conn| query_message_by_id(conn, id))
    }

    fn messages_between(&self, student_a: i64, student_b: i64) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages
                     WHERE (sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1)
                     ORDER BY created_at, id"
                ),
                [student_a, student_b],
                message_from_row,
            )
        })
    }

    fn messages_for_student(&self, student_id: i64) -> Result<Vec<Message>> {
        self.with_conn(|conn| {
            query_all(
                conn,
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages
                     WHERE sender_id = ?1 OR receiver_id = ?1
                     ORDER BY created_at, id"
                ),
                [student_id],
                message_from_row,
            )
        })
    }

    fn create_message(&self, message: NewMessage) -> Result<Message> {
        let now = Utc::now();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (sender_id, receiver_id, content, is_read, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                rusqlite::params![message.sender_id, message.receiver_id, message.content, now],
            )?;
            Ok(Message {
                id: conn.last_insert_rowid(),
                sender_id: message.sender_id,
                receiver_id: message.receiver_id,
                content: message.content,
                is_read: false,
                created_at: now,
            })
        })
    }

    fn mark_message_read(&self, id: i64) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            let changed = conn.execute("UPDATE messages SET is_read = 1 WHERE id = ?1", [id])?;
            if changed == 0 {
                return Ok(None);
            }
            query_message_by_id(conn, id)
        })
    }
}

fn query_all<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn query_one<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Option<T>> {
    Ok(conn.query_row(sql, params, map).optional()?)
}

fn query_student_by_id(conn: &Connection, id: i64) -> Result<Option<Student>> {
    query_one(
        conn,
        &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
        [id],
        student_from_row,
    )
}

fn query_swap_request_by_id(conn: &Connection, id: i64) -> Result<Option<SwapRequest>> {
    query_one(
        conn,
        &format!("SELECT {SWAP_REQUEST_COLUMNS} FROM swap_requests WHERE id = ?1"),
        [id],
        swap_request_from_row,
    )
}

fn query_message_by_id(conn: &Connection, id: i64) -> Result<Option<Message>> {
    query_one(
        conn,
        &format!("SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"),
        [id],
        message_from_row,
    )
}

fn hostel_from_row(row: &Row<'_>) -> rusqlite::Result<Hostel> {
    Ok(Hostel {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
    })
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        hostel_id: row.get(1)?,
        room_number: row.get(2)?,
        capacity: row.get(3)?,
        floor: row.get(4)?,
    })
}

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        student_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        current_room_id: row.get(5)?,
        current_roommate_id: row.get(6)?,
        preferences: row.get(7)?,
        is_looking_to_swap: row.get(8)?,
    })
}

fn swap_request_from_row(row: &Row<'_>) -> rusqlite::Result<SwapRequest> {
    Ok(SwapRequest {
        id: row.get(0)?,
        requester_id: row.get(1)?,
        target_student_id: row.get(2)?,
        target_room_id: row.get(3)?,
        request_type: parse_column(row, 4)?,
        status: parse_column(row, 5)?,
        message: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn swap_chain_from_row(row: &Row<'_>) -> rusqlite::Result<SwapChain> {
    Ok(SwapChain {
        id: row.get(0)?,
        chain_data: row.get(1)?,
        status: parse_column(row, 2)?,
        created_at: row.get(3)?,
    })
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        receiver_id: row.get(2)?,
        content: row.get(3)?,
        is_read: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Read a TEXT column into one of the string-backed enums.
fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_unique_violation(err: rusqlite::Error) -> DbError {
    if let rusqlite::Error::SqliteFailure(code, Some(msg)) = &err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            if msg.contains("students.student_id") {
                return DbError::Duplicate("Student ID");
            }
            if msg.contains("students.email") {
                return DbError::Duplicate("Email");
            }
        }
    }
    DbError::Sqlite(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomswap_types::models::SwapKind;

    fn new_student(student_id: &str, email: &str) -> NewStudent {
        NewStudent {
            student_id: student_id.into(),
            name: format!("Student {}", student_id),
            email: email.into(),
            password_hash: "hash".into(),
            current_room_id: None,
            preferences: None,
            is_looking_to_swap: false,
        }
    }

    fn chain_request(requester_id: i64) -> NewSwapRequest {
        NewSwapRequest {
            requester_id,
            target_student_id: None,
            target_room_id: None,
            request_type: SwapKind::Chain,
            message: None,
        }
    }

    #[test]
    fn ids_increase_per_table() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_student(new_student("A1", "a@x.io")).unwrap();
        let b = db.create_student(new_student("B1", "b@x.io")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        let h = db
            .create_hostel(NewHostel { name: "H".into(), description: None })
            .unwrap();
        assert_eq!(h.id, 1);
    }

    #[test]
    fn duplicate_student_id_and_email_are_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.create_student(new_student("CS1", "one@x.io")).unwrap();

        let err = db.create_student(new_student("CS1", "two@x.io")).unwrap_err();
        assert!(matches!(err, DbError::Duplicate("Student ID")));

        let err = db.create_student(new_student("CS2", "one@x.io")).unwrap_err();
        assert!(matches!(err, DbError::Duplicate("Email")));

        assert!(db.get_student_by_student_id("CS2").unwrap().is_none());
    }

    #[test]
    fn student_update_merges_and_clears() {
        let db = Database::open_in_memory().unwrap();
        let mut s = new_student("CS1", "one@x.io");
        s.preferences = Some("quiet".into());
        let s = db.create_student(s).unwrap();

        let updated = db
            .update_student(
                s.id,
                StudentChanges {
                    current_room_id: Some(Some(7)),
                    preferences: Some(None),
                    is_looking_to_swap: Some(true),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.current_room_id, Some(7));
        assert_eq!(updated.preferences, None);
        assert!(updated.is_looking_to_swap);
        assert_eq!(updated.name, s.name);

        let stored = db.get_student(s.id).unwrap().unwrap();
        assert_eq!(stored, updated);
        assert_eq!(db.room_occupants(7).unwrap().len(), 1);
        assert_eq!(db.students_looking_to_swap().unwrap().len(), 1);

        assert!(db.update_student(99, StudentChanges::default()).unwrap().is_none());
    }

    #[test]
    fn swap_status_can_leave_terminal_states() {
        let db = Database::open_in_memory().unwrap();
        let req = db.create_swap_request(chain_request(1)).unwrap();
        assert_eq!(req.status, SwapStatus::Pending);

        let declined = db
            .update_swap_request(
                req.id,
                SwapRequestChanges { status: Some(SwapStatus::Declined), ..Default::default() },
            )
            .unwrap()
            .unwrap();
        assert_eq!(declined.status, SwapStatus::Declined);
        assert!(declined.updated_at >= req.created_at);

        let reopened = db
            .update_swap_request(
                req.id,
                SwapRequestChanges { status: Some(SwapStatus::Pending), ..Default::default() },
            )
            .unwrap()
            .unwrap();
        assert_eq!(reopened.status, SwapStatus::Pending);
        assert_eq!(db.get_swap_request(req.id).unwrap().unwrap().status, SwapStatus::Pending);
    }

    #[test]
    fn outgoing_and_incoming_split_by_role() {
        let db = Database::open_in_memory().unwrap();
        db.create_swap_request(NewSwapRequest {
            target_student_id: Some(2),
            request_type: SwapKind::Direct,
            ..chain_request(1)
        })
        .unwrap();
        db.create_swap_request(chain_request(2)).unwrap();

        assert_eq!(db.outgoing_swap_requests(1).unwrap().len(), 1);
        assert_eq!(db.incoming_swap_requests(1).unwrap().len(), 0);
        assert_eq!(db.outgoing_swap_requests(2).unwrap().len(), 1);
        assert_eq!(db.incoming_swap_requests(2).unwrap().len(), 1);
    }

    #[test]
    fn conversation_is_ordered_and_scoped_to_the_pair() {
        let db = Database::open_in_memory().unwrap();
        for (from, to, text) in [(1, 2, "hi"), (2, 1, "hello"), (1, 3, "other"), (1, 2, "swap?")] {
            db.create_message(NewMessage { sender_id: from, receiver_id: to, content: text.into() })
                .unwrap();
        }

        let thread: Vec<String> = db
            .messages_between(2, 1)
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(thread, vec!["hi", "hello", "swap?"]);
        assert_eq!(db.messages_for_student(1).unwrap().len(), 4);
        assert_eq!(db.messages_for_student(3).unwrap().len(), 1);
    }

    #[test]
    fn mark_read_reports_missing_message() {
        let db = Database::open_in_memory().unwrap();
        let m = db
            .create_message(NewMessage { sender_id: 1, receiver_id: 2, content: "x".into() })
            .unwrap();
        assert!(!m.is_read);
        assert!(db.mark_message_read(m.id).unwrap().unwrap().is_read);
        assert!(db.mark_message_read(m.id + 1).unwrap().is_none());
    }

    #[test]
    fn swap_chain_round_trips_through_storage() {
        let db = Database::open_in_memory().unwrap();
        let chain = db.create_swap_chain(r#"[1,4,6]"#).unwrap();
        let stored = db.get_swap_chain(chain.id).unwrap().unwrap();
        assert_eq!(stored.chain_data, "[1,4,6]");
        assert_eq!(stored.status, SwapStatus::Pending);
    }
}
