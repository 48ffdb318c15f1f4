use roomswap_types::models::{Hostel, Message, Room, Student, SwapChain, SwapRequest};

use crate::Result;
use crate::models::{
    NewHostel, NewMessage, NewRoom, NewStudent, NewSwapRequest, StudentChanges,
    SwapRequestChanges,
};

/// Entity store contract shared by request handlers.
///
/// Lookups return `Ok(None)` for a missing row; updates return `Ok(None)`
/// when the target id does not exist. Nothing is ever deleted.
pub trait Store: Send + Sync {
    // -- Hostels --

    fn list_hostels(&self) -> Result<Vec<Hostel>>;
    fn get_hostel(&self, id: i64) -> Result<Option<Hostel>>;
    fn create_hostel(&self, hostel: NewHostel) -> Result<Hostel>;

    // -- Rooms --

    fn list_rooms(&self) -> Result<Vec<Room>>;
    fn list_rooms_by_hostel(&self, hostel_id: i64) -> Result<Vec<Room>>;
    fn get_room(&self, id: i64) -> Result<Option<Room>>;
    fn create_room(&self, room: NewRoom) -> Result<Room>;
    /// Students whose current room is `room_id`.
    fn room_occupants(&self, room_id: i64) -> Result<Vec<Student>>;

    // -- Students --

    fn get_student(&self, id: i64) -> Result<Option<Student>>;
    fn get_student_by_student_id(&self, student_id: &str) -> Result<Option<Student>>;
    fn get_student_by_email(&self, email: &str) -> Result<Option<Student>>;
    /// Fails with [`DbError::Duplicate`](crate::DbError::Duplicate) when the
    /// student id or email is taken.
    fn create_student(&self, student: NewStudent) -> Result<Student>;
    fn update_student(&self, id: i64, changes: StudentChanges) -> Result<Option<Student>>;
    fn students_looking_to_swap(&self) -> Result<Vec<Student>>;

    // -- Swap requests --

    fn get_swap_request(&self, id: i64) -> Result<Option<SwapRequest>>;
    /// Requests where `student_id` is the requester.
    fn outgoing_swap_requests(&self, student_id: i64) -> Result<Vec<SwapRequest>>;
    /// Requests where `student_id` is the named target.
    fn incoming_swap_requests(&self, student_id: i64) -> Result<Vec<SwapRequest>>;
    fn create_swap_request(&self, request: NewSwapRequest) -> Result<SwapRequest>;
    /// Merges `changes` and bumps `updated_at`. No status transition checks.
    fn update_swap_request(
        &self,
        id: i64,
        changes: SwapRequestChanges,
    ) -> Result<Option<SwapRequest>>;

    // -- Swap chains --

    fn create_swap_chain(&self, chain_data: &str) -> Result<SwapChain>;
    fn get_swap_chain(&self, id: i64) -> Result<Option<SwapChain>>;

    // -- Messages --

    fn get_message(&self, id: i64) -> Result<Option<Message>>;
    /// Both directions between two students, oldest first.
    fn messages_between(&self, student_a: i64, student_b: i64) -> Result<Vec<Message>>;
    /// Everything sent or received by `student_id`, oldest first.
    fn messages_for_student(&self, student_id: i64) -> Result<Vec<Message>>;
    fn create_message(&self, message: NewMessage) -> Result<Message>;
    fn mark_message_read(&self, id: i64) -> Result<Option<Message>>;
}
