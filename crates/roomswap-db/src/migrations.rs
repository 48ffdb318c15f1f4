use rusqlite::Connection;
use tracing::info;

use crate::Result;

/// Versioned schema setup. No foreign keys: references between tables are
/// plain integers and may dangle.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE hostels (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                description TEXT
            );

            CREATE TABLE rooms (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                hostel_id   INTEGER NOT NULL,
                room_number TEXT NOT NULL,
                capacity    INTEGER NOT NULL DEFAULT 2,
                floor       INTEGER NOT NULL
            );

            CREATE INDEX idx_rooms_hostel ON rooms(hostel_id);

            CREATE TABLE students (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id          TEXT NOT NULL UNIQUE,
                name                TEXT NOT NULL,
                email               TEXT NOT NULL UNIQUE,
                password            TEXT NOT NULL,
                current_room_id     INTEGER,
                current_roommate_id INTEGER,
                preferences         TEXT,
                is_looking_to_swap  INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE swap_requests (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                requester_id      INTEGER NOT NULL,
                target_student_id INTEGER,
                target_room_id    INTEGER,
                request_type      TEXT NOT NULL,
                status            TEXT NOT NULL DEFAULT 'pending',
                message           TEXT,
                created_at        TEXT NOT NULL,
                updated_at        TEXT NOT NULL
            );

            CREATE INDEX idx_swap_requests_requester ON swap_requests(requester_id);
            CREATE INDEX idx_swap_requests_target ON swap_requests(target_student_id);

            CREATE TABLE swap_chains (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                chain_data TEXT NOT NULL,
                status     TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL
            );

            CREATE TABLE messages (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                sender_id   INTEGER NOT NULL,
                receiver_id INTEGER NOT NULL,
                content     TEXT NOT NULL,
                is_read     INTEGER NOT NULL DEFAULT 0,
                created_at  TEXT NOT NULL
            );

            CREATE INDEX idx_messages_pair ON messages(sender_id, receiver_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
