use tracing::info;

use crate::models::{NewHostel, NewRoom, NewStudent, StudentChanges};
use crate::{Result, Store};

const SHARED_PREFERENCES: &str = "Non-smoking environment, Quiet study hours, Early sleeper (10 PM)";

/// (student id, name, email, room, looking to swap)
const SAMPLE_STUDENTS: &[(&str, &str, &str, i64, bool)] = &[
    ("CS21B047", "Rahul Sharma", "rahul@example.com", 1, false),
    ("CS21B023", "Amit Kumar", "amit@example.com", 1, false),
    ("CS21B089", "Priya Kashyap", "priya@example.com", 15, true),
    ("CS21B012", "Arjun Joshi", "arjun@example.com", 25, true),
    ("CS21B092", "Sneha Kapoor", "sneha@example.com", 35, true),
    ("CS21B078", "Rohit Gupta", "rohit@example.com", 16, true),
];

/// Load demo hostels, rooms and students into an empty store.
///
/// Every sample student shares `password_hash`. Returns `false` without
/// touching anything if hostels already exist.
pub fn seed_demo_data(store: &dyn Store, password_hash: &str) -> Result<bool> {
    if !store.list_hostels()?.is_empty() {
        return Ok(false);
    }

    let mut hostel_ids = Vec::new();
    for (name, description) in [
        ("Hostel A", "Main hostel block"),
        ("Hostel B", "Second block"),
        ("Hostel C", "Third block"),
        ("Hostel D", "Fourth block"),
    ] {
        let hostel = store.create_hostel(NewHostel {
            name: name.to_string(),
            description: Some(description.to_string()),
        })?;
        hostel_ids.push(hostel.id);
    }

    // Ten rooms in each of the first three hostels, three per floor: A-101 .. C-310.
    let mut room_ids = Vec::new();
    for (block, hostel_id) in hostel_ids.iter().take(3).enumerate() {
        let letter = (b'A' + block as u8) as char;
        for n in 1..=10_i64 {
            let room = store.create_room(NewRoom {
                hostel_id: *hostel_id,
                room_number: format!("{}-{}{:02}", letter, block + 1, n),
                capacity: 2,
                floor: (n + 2) / 3,
            })?;
            room_ids.push(room.id);
        }
    }

    let mut student_ids = Vec::new();
    for &(student_id, name, email, room, looking) in SAMPLE_STUDENTS {
        let student = store.create_student(NewStudent {
            student_id: student_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            current_room_id: room_ids.get(room as usize - 1).copied(),
            preferences: None,
            is_looking_to_swap: looking,
        })?;
        student_ids.push(student.id);
    }

    // The first two share room A-101.
    let (rahul, amit) = (student_ids[0], student_ids[1]);
    for (id, roommate) in [(rahul, amit), (amit, rahul)] {
        store.update_student(
            id,
            StudentChanges {
                current_roommate_id: Some(Some(roommate)),
                preferences: Some(Some(SHARED_PREFERENCES.to_string())),
                ..Default::default()
            },
        )?;
    }

    info!(
        "Seeded {} hostels, {} rooms, {} students",
        hostel_ids.len(),
        room_ids.len(),
        student_ids.len()
    );
    Ok(true)
}
