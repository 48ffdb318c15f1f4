use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{debug, info, warn};

use roomswap_db::models::{NewSwapRequest, SwapRequestChanges};
use roomswap_types::api::{
    AvailableSwap, CreateSwapRequest, SwapDirection, SwapRequestView, UpdateSwapRequest,
};
use roomswap_types::models::{SwapKind, SwapRequest};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::{ValidJson, ValidPath};
use crate::matching;
use crate::middleware::AuthSession;
use crate::students::room_details;

/// `GET /api/swap-requests`: the caller's outgoing requests followed by the
/// incoming ones, each listed once.
pub async fn list_swap_requests(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<SwapRequestView>>, ApiError> {
    let store = state.store.as_ref();
    let me = session.student_id;

    let outgoing = store.outgoing_swap_requests(me)?;
    let incoming = store.incoming_swap_requests(me)?;

    let mut views = Vec::with_capacity(outgoing.len() + incoming.len());
    for request in outgoing {
        let target_student = match request.target_student_id {
            Some(id) => store.get_student(id)?,
            None => None,
        };
        views.push(SwapRequestView {
            request,
            direction: SwapDirection::Outgoing { target_student },
        });
    }
    // A request aimed at its own requester is already listed as outgoing.
    for request in incoming.into_iter().filter(|r| r.requester_id != me) {
        let requester = store.get_student(request.requester_id)?;
        views.push(SwapRequestView {
            request,
            direction: SwapDirection::Incoming { requester },
        });
    }

    Ok(Json(views))
}

pub async fn create_swap_request(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    ValidJson(req): ValidJson<CreateSwapRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store.as_ref();
    let me = session.student_id;

    if let Some(claimed) = req.requester_id.filter(|&claimed| claimed != me) {
        debug!("Ignoring requesterId {} supplied by student {}", claimed, me);
    }

    match (req.request_type, req.target_student_id) {
        (SwapKind::Direct, None) => {
            return Err(ApiError::BadRequest(
                "Direct swap requests need a target student".to_string(),
            ));
        }
        (_, Some(target)) if target == me => {
            return Err(ApiError::BadRequest(
                "Cannot send a swap request to yourself".to_string(),
            ));
        }
        (_, Some(target)) => {
            store
                .get_student(target)?
                .ok_or(ApiError::NotFound("Target student not found"))?;
        }
        (SwapKind::Chain, None) => {}
    }
    if let Some(room) = req.target_room_id {
        store
            .get_room(room)?
            .ok_or(ApiError::NotFound("Target room not found"))?;
    }

    let request = store.create_swap_request(NewSwapRequest {
        requester_id: me,
        target_student_id: req.target_student_id,
        target_room_id: req.target_room_id,
        request_type: req.request_type,
        message: req.message,
    })?;

    info!(
        "Student {} opened {} swap request {}",
        me,
        request.request_type.as_str(),
        request.id
    );

    Ok((StatusCode::CREATED, Json(request)))
}

/// `PUT /api/swap-requests/:id`: merge whatever fields were sent. The merged
/// request must pass the same target checks as a new one.
///
/// Status changes are not checked against any transition table; a declined
/// or completed request can be put back to pending. Accepting does not move
/// either student.
pub async fn update_swap_request(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    ValidPath(id): ValidPath<i64>,
    ValidJson(req): ValidJson<UpdateSwapRequest>,
) -> Result<Json<SwapRequest>, ApiError> {
    let store = state.store.as_ref();
    let me = session.student_id;

    let existing = store
        .get_swap_request(id)?
        .ok_or(ApiError::NotFound("Swap request not found"))?;

    if existing.requester_id != me && existing.target_student_id != Some(me) {
        warn!(
            "Student {} is updating swap request {} without being a party to it",
            me, id
        );
    }
    let kind = req.request_type.unwrap_or(existing.request_type);
    let target = req.target_student_id.unwrap_or(existing.target_student_id);
    match (kind, target) {
        (SwapKind::Direct, None) => {
            return Err(ApiError::BadRequest(
                "Direct swap requests need a target student".to_string(),
            ));
        }
        (_, Some(target)) if target == existing.requester_id => {
            return Err(ApiError::BadRequest(
                "Cannot send a swap request to yourself".to_string(),
            ));
        }
        _ => {}
    }
    if let Some(Some(target)) = req.target_student_id {
        store
            .get_student(target)?
            .ok_or(ApiError::NotFound("Target student not found"))?;
    }
    if let Some(Some(room)) = req.target_room_id {
        store
            .get_room(room)?
            .ok_or(ApiError::NotFound("Target room not found"))?;
    }
    if let Some(status) = req.status {
        if existing.status.is_terminal() && status != existing.status {
            warn!(
                "Swap request {} moved out of terminal state {} to {}",
                id,
                existing.status.as_str(),
                status.as_str()
            );
        }
    }

    let updated = store
        .update_swap_request(
            id,
            SwapRequestChanges {
                status: req.status,
                request_type: req.request_type,
                target_student_id: req.target_student_id,
                target_room_id: req.target_room_id,
                message: req.message,
            },
        )?
        .ok_or(ApiError::NotFound("Swap request not found"))?;

    info!(
        "Swap request {} updated by student {} (status {})",
        id,
        me,
        updated.status.as_str()
    );
    Ok(Json(updated))
}

/// `GET /api/available-swaps`: everyone else who is looking to swap, best
/// preference match first.
pub async fn available_swaps(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
) -> Result<Json<Vec<AvailableSwap>>, ApiError> {
    let store = state.store.as_ref();
    let me = store
        .get_student(session.student_id)?
        .ok_or(ApiError::NotFound("Student not found"))?;

    let mut swaps = Vec::new();
    for student in store
        .students_looking_to_swap()?
        .into_iter()
        .filter(|s| s.id != me.id)
    {
        let room_details = room_details(store, student.current_room_id)?;
        let match_score =
            matching::match_score(me.preferences.as_deref(), student.preferences.as_deref());
        swaps.push(AvailableSwap {
            student,
            room_details,
            match_score,
        });
    }

    swaps.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then(a.student.id.cmp(&b.student.id))
    });

    Ok(Json(swaps))
}
