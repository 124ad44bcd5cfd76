//! HTTP API endpoints.
//!
//! Every handler validates its body, runs one registry operation and answers
//! with the room filtered for the requesting player.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::{RoomError, RoomResult};
use crate::protocol::*;
use crate::registry::{LeaveResult, Registry};
use crate::types::Room;

impl IntoResponse for RoomError {
    fn into_response(self) -> Response {
        let status = match self {
            RoomError::RoomNotFound(_) | RoomError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            RoomError::Forbidden(_) => StatusCode::FORBIDDEN,
            RoomError::InsufficientPlayers { .. }
            | RoomError::InvalidPhase { .. }
            | RoomError::GameInProgress => StatusCode::CONFLICT,
            RoomError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RoomError::NoFreeRoomCode => StatusCode::SERVICE_UNAVAILABLE,
        };
        tracing::debug!(code = self.code(), "Rejected request: {}", self);
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

/// Unwrap a JSON body, reporting malformed input as `InvalidRequest`
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> RoomResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| RoomError::InvalidRequest(rejection.body_text()))
}

/// Same for query strings
fn query<T>(params: Result<Query<T>, QueryRejection>) -> RoomResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| RoomError::InvalidRequest(rejection.body_text()))
}

fn room_response(room: &Room, viewer: &str) -> Json<RoomResponse> {
    Json(RoomResponse {
        room: RoomView::for_viewer(room, Some(viewer)),
    })
}

/// POST /create-lobby
pub async fn create_lobby(
    State(registry): State<Registry>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> RoomResult<Json<CreateRoomResponse>> {
    let req = body(payload)?.validate()?;
    let room = registry
        .create_room(&req.player_id, req.player_name)
        .await?;

    Ok(Json(CreateRoomResponse {
        room_id: room.id.clone(),
        room: RoomView::for_viewer(&room, Some(&req.player_id)),
    }))
}

/// POST /join-lobby
pub async fn join_lobby(
    State(registry): State<Registry>,
    payload: Result<Json<JoinRoomRequest>, JsonRejection>,
) -> RoomResult<Json<RoomResponse>> {
    let req = body(payload)?.validate()?;
    let room = registry
        .join_room(&req.room_id, &req.player_id, req.player_name)
        .await?;
    Ok(room_response(&room, &req.player_id))
}

/// POST /leave-lobby
///
/// Leaving a room that is already gone reports `roomDeleted: true`.
pub async fn leave_lobby(
    State(registry): State<Registry>,
    payload: Result<Json<RoomActionRequest>, JsonRejection>,
) -> RoomResult<Json<LeaveRoomResponse>> {
    let req = body(payload)?.validate()?;
    let response = match registry.leave_room(&req.room_id, &req.player_id).await {
        LeaveResult::Left(room) => LeaveRoomResponse {
            room_deleted: false,
            room: Some(RoomView::for_viewer(&room, Some(&req.player_id))),
        },
        LeaveResult::RoomDeleted => LeaveRoomResponse {
            room_deleted: true,
            room: None,
        },
    };
    Ok(Json(response))
}

/// POST /start-game
pub async fn start_game(
    State(registry): State<Registry>,
    payload: Result<Json<RoomActionRequest>, JsonRejection>,
) -> RoomResult<Json<RoomResponse>> {
    let req = body(payload)?.validate()?;
    let room = registry.start_game(&req.room_id, &req.player_id).await?;
    Ok(room_response(&room, &req.player_id))
}

/// POST /submit-clue
pub async fn submit_clue(
    State(registry): State<Registry>,
    payload: Result<Json<SubmitClueRequest>, JsonRejection>,
) -> RoomResult<Json<RoomResponse>> {
    let req = body(payload)?.validate()?;
    let room = registry
        .submit_clue(&req.room_id, &req.player_id, req.clue)
        .await?;
    Ok(room_response(&room, &req.player_id))
}

/// POST /vote
pub async fn vote(
    State(registry): State<Registry>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> RoomResult<Json<RoomResponse>> {
    let req = body(payload)?.validate()?;
    let room = registry
        .submit_vote(&req.room_id, &req.player_id, &req.target_player_id)
        .await?;
    Ok(room_response(&room, &req.player_id))
}

/// POST /advance-phase
pub async fn advance_phase(
    State(registry): State<Registry>,
    payload: Result<Json<RoomActionRequest>, JsonRejection>,
) -> RoomResult<Json<RoomResponse>> {
    let req = body(payload)?.validate()?;
    let room = registry.advance_phase(&req.room_id, &req.player_id).await?;
    Ok(room_response(&room, &req.player_id))
}

/// POST /new-game
pub async fn new_game(
    State(registry): State<Registry>,
    payload: Result<Json<RoomActionRequest>, JsonRejection>,
) -> RoomResult<Json<RoomResponse>> {
    let req = body(payload)?.validate()?;
    let room = registry.new_game(&req.room_id, &req.player_id).await?;
    Ok(room_response(&room, &req.player_id))
}

/// GET /room/{roomId}?playerId=
pub async fn get_room(
    State(registry): State<Registry>,
    Path(room_id): Path<String>,
    params: Result<Query<RoomQuery>, QueryRejection>,
) -> RoomResult<Json<RoomResponse>> {
    let code = normalize_room_code(&room_id)?;
    let viewer = query(params)?.viewer()?;
    let room = registry.get_room(&code).await?;
    Ok(Json(RoomResponse {
        room: RoomView::for_viewer(&room, viewer.as_deref()),
    }))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let Some(origin) = origin else {
        return CorsLayer::permissive();
    };
    match HeaderValue::from_str(origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
        Err(e) => {
            tracing::warn!(origin, "Invalid CORS_ORIGIN ({}), allowing any origin", e);
            CorsLayer::permissive()
        }
    }
}

/// Build the application router
pub fn router(registry: Registry, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/create-lobby", post(create_lobby))
        .route("/join-lobby", post(join_lobby))
        .route("/leave-lobby", post(leave_lobby))
        .route("/start-game", post(start_game))
        .route("/submit-clue", post(submit_clue))
        .route("/vote", post(vote))
        .route("/advance-phase", post(advance_phase))
        .route("/new-game", post(new_game))
        .route("/room/{room_id}", get(get_room))
        .route("/health", get(health))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Phase;

    #[tokio::test]
    async fn test_error_status_mapping() {
        let cases = [
            (RoomError::RoomNotFound("ABCD".into()), StatusCode::NOT_FOUND),
            (RoomError::PlayerNotFound("p9".into()), StatusCode::NOT_FOUND),
            (RoomError::Forbidden("start the game"), StatusCode::FORBIDDEN),
            (
                RoomError::InsufficientPlayers {
                    required: 3,
                    actual: 2,
                },
                StatusCode::CONFLICT,
            ),
            (
                RoomError::InvalidPhase {
                    action: "vote",
                    phase: Phase::Lobby,
                },
                StatusCode::CONFLICT,
            ),
            (RoomError::GameInProgress, StatusCode::CONFLICT),
            (
                RoomError::InvalidRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (RoomError::NoFreeRoomCode, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = RoomError::GameInProgress.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["code"], "GAME_IN_PROGRESS");
        assert_eq!(body["error"], "Game already in progress");
    }
}
