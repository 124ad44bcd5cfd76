use crate::error::{RoomError, RoomResult};
use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MAX_ID_LENGTH: usize = 64;
pub const MAX_NAME_LENGTH: usize = 20;
pub const MAX_CLUE_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub player_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomRequest {
    pub room_id: String,
    pub player_id: String,
    pub player_name: String,
}

/// Body shared by leave, start, advance and new-game
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomActionRequest {
    pub room_id: String,
    pub player_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitClueRequest {
    pub room_id: String,
    pub player_id: String,
    pub clue: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub room_id: String,
    pub player_id: String,
    pub target_player_id: String,
}

/// Query string of `GET /room/{roomId}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomQuery {
    pub player_id: Option<String>,
}

impl CreateRoomRequest {
    pub fn validate(self) -> RoomResult<Self> {
        Ok(Self {
            player_id: normalize_id("playerId", &self.player_id)?,
            player_name: normalize_text("playerName", &self.player_name, MAX_NAME_LENGTH)?,
        })
    }
}

impl JoinRoomRequest {
    pub fn validate(self) -> RoomResult<Self> {
        Ok(Self {
            room_id: normalize_room_code(&self.room_id)?,
            player_id: normalize_id("playerId", &self.player_id)?,
            player_name: normalize_text("playerName", &self.player_name, MAX_NAME_LENGTH)?,
        })
    }
}

impl RoomActionRequest {
    pub fn validate(self) -> RoomResult<Self> {
        Ok(Self {
            room_id: normalize_room_code(&self.room_id)?,
            player_id: normalize_id("playerId", &self.player_id)?,
        })
    }
}

impl SubmitClueRequest {
    pub fn validate(self) -> RoomResult<Self> {
        Ok(Self {
            room_id: normalize_room_code(&self.room_id)?,
            player_id: normalize_id("playerId", &self.player_id)?,
            clue: normalize_text("clue", &self.clue, MAX_CLUE_LENGTH)?,
        })
    }
}

impl VoteRequest {
    pub fn validate(self) -> RoomResult<Self> {
        Ok(Self {
            room_id: normalize_room_code(&self.room_id)?,
            player_id: normalize_id("playerId", &self.player_id)?,
            target_player_id: normalize_id("targetPlayerId", &self.target_player_id)?,
        })
    }
}

impl RoomQuery {
    /// The viewer, if one was given. A blank `playerId` counts as none.
    pub fn viewer(&self) -> RoomResult<Option<String>> {
        match self.player_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(id) => normalize_id("playerId", id).map(Some),
        }
    }
}

/// Room codes are matched case-insensitively
pub fn normalize_room_code(raw: &str) -> RoomResult<RoomCode> {
    normalize_id("roomId", raw).map(|code| code.to_ascii_uppercase())
}

fn normalize_id(field: &str, raw: &str) -> RoomResult<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(RoomError::InvalidRequest(format!("{} is required", field)));
    }
    if id.chars().count() > MAX_ID_LENGTH {
        return Err(RoomError::InvalidRequest(format!(
            "{} must be at most {} characters",
            field, MAX_ID_LENGTH
        )));
    }
    Ok(id.to_string())
}

fn normalize_text(field: &str, raw: &str, max: usize) -> RoomResult<String> {
    let text = raw.trim();
    let len = text.chars().count();
    if len == 0 || len > max {
        return Err(RoomError::InvalidRequest(format!(
            "{} must be 1-{} characters",
            field, max
        )));
    }
    Ok(text.to_string())
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// A player as seen by one particular viewer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    /// Only the viewer's own word until the game is over
    pub word: Option<String>,
    pub clue: Option<String>,
    /// Hidden for other players while voting is open
    pub vote: Option<PlayerId>,
    pub has_voted: bool,
    /// None when the viewer may not know
    pub is_imposter: Option<bool>,
}

/// Room snapshot filtered for one viewer. Secrets (words, roles, the word
/// pair) only become public once the game is over.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomView {
    pub id: RoomCode,
    pub players: Vec<PlayerView>,
    pub phase: Phase,
    pub current_round: u32,
    pub max_rounds: u32,
    pub word_pair: Option<WordPair>,
    pub imposter_id: Option<PlayerId>,
    /// Empty while voting is open
    pub votes: BTreeMap<PlayerId, u32>,
    pub game_started: bool,
    pub game_ended: bool,
    pub winner: Option<Winner>,
    pub created_at: DateTime<Utc>,
    pub version: u64,
    pub voted_out: Option<PlayerId>,
    pub phase_deadline: Option<String>,
}

impl RoomView {
    pub fn for_viewer(room: &Room, viewer: Option<&str>) -> Self {
        let revealed = room.phase == Phase::GameOver;
        let voting = room.phase == Phase::Voting;

        let players = room
            .players
            .iter()
            .map(|p| {
                let own = viewer == Some(p.id.as_str());
                let can_see_secrets = revealed || own;
                PlayerView {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    is_host: p.is_host,
                    word: if can_see_secrets { p.word.clone() } else { None },
                    clue: p.clue.clone(),
                    vote: if voting && !own { None } else { p.vote.clone() },
                    has_voted: p.vote.is_some(),
                    is_imposter: can_see_secrets.then_some(p.is_imposter),
                }
            })
            .collect();

        Self {
            id: room.id.clone(),
            players,
            phase: room.phase,
            current_round: room.current_round,
            max_rounds: room.max_rounds,
            word_pair: if revealed { room.word_pair.clone() } else { None },
            imposter_id: if revealed { room.imposter_id.clone() } else { None },
            votes: if voting {
                BTreeMap::new()
            } else {
                room.votes.clone()
            },
            game_started: room.game_started,
            game_ended: room.game_ended,
            winner: room.winner,
            created_at: room.created_at,
            version: room.version,
            voted_out: room.voted_out.clone(),
            phase_deadline: room.phase_deadline.clone(),
        }
    }

    pub fn player(&self, id: &str) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomResponse {
    pub room: RoomView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub room_id: RoomCode,
    pub room: RoomView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRoomResponse {
    pub room_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomView>,
}

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

impl From<&RoomError> for ErrorBody {
    fn from(e: &RoomError) -> Self {
        Self {
            error: e.to_string(),
            code: e.code().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_room() -> Room {
        let mut room = Room::new("ABCD".to_string(), "p1".to_string(), "One".to_string());
        for (id, name) in [("p2", "Two"), ("p3", "Three")] {
            room.join(id, name.to_string()).unwrap();
        }
        room.phase = Phase::Voting;
        room.game_started = true;
        room.word_pair = Some(WordPair::new("CAT", "DOG"));
        room.imposter_id = Some("p3".to_string());
        for player in &mut room.players {
            player.is_imposter = player.id == "p3";
            player.word = Some(if player.is_imposter { "DOG" } else { "CAT" }.to_string());
            player.clue = Some(format!("clue from {}", player.id));
        }
        room.players[0].vote = Some("p3".to_string());
        room.players[2].vote = Some("p1".to_string());
        room.votes = crate::room::tally(&room.players);
        room
    }

    #[test]
    fn test_viewer_sees_only_own_secrets() {
        let room = game_room();
        let view = RoomView::for_viewer(&room, Some("p1"));

        let me = view.player("p1").unwrap();
        assert_eq!(me.word.as_deref(), Some("CAT"));
        assert_eq!(me.is_imposter, Some(false));

        let other = view.player("p3").unwrap();
        assert_eq!(other.word, None);
        assert_eq!(other.is_imposter, None);
        assert_eq!(other.clue.as_deref(), Some("clue from p3"));

        assert!(view.word_pair.is_none());
        assert!(view.imposter_id.is_none());
    }

    #[test]
    fn test_imposter_learns_own_role() {
        let room = game_room();
        let view = RoomView::for_viewer(&room, Some("p3"));
        let me = view.player("p3").unwrap();
        assert_eq!(me.word.as_deref(), Some("DOG"));
        assert_eq!(me.is_imposter, Some(true));
    }

    #[test]
    fn test_votes_hidden_while_voting() {
        let room = game_room();
        let view = RoomView::for_viewer(&room, Some("p1"));

        assert!(view.votes.is_empty());
        assert_eq!(view.player("p1").unwrap().vote.as_deref(), Some("p3"));
        let other = view.player("p3").unwrap();
        assert_eq!(other.vote, None);
        assert!(other.has_voted);
        assert!(!view.player("p2").unwrap().has_voted);
    }

    #[test]
    fn test_votes_visible_in_results() {
        let mut room = game_room();
        room.phase = Phase::Results;
        let view = RoomView::for_viewer(&room, None);

        assert_eq!(view.votes.get("p3"), Some(&1));
        assert_eq!(view.player("p3").unwrap().vote.as_deref(), Some("p1"));
        assert_eq!(view.player("p3").unwrap().word, None);
    }

    #[test]
    fn test_everything_revealed_at_game_over() {
        let mut room = game_room();
        room.phase = Phase::GameOver;
        room.game_ended = true;
        room.winner = Some(Winner::Imposter);
        let view = RoomView::for_viewer(&room, None);

        assert_eq!(view.imposter_id.as_deref(), Some("p3"));
        assert_eq!(view.word_pair, Some(WordPair::new("CAT", "DOG")));
        assert!(view.players.iter().all(|p| p.word.is_some()));
        assert_eq!(view.player("p3").unwrap().is_imposter, Some(true));
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let room = game_room();
        let json = serde_json::to_value(RoomView::for_viewer(&room, Some("p1"))).unwrap();
        assert_eq!(json["phase"], "voting");
        assert_eq!(json["currentRound"], 1);
        assert_eq!(json["players"][0]["isHost"], true);
        assert_eq!(json["players"][0]["hasVoted"], true);
        assert!(json.get("gameId").is_none());
    }

    #[test]
    fn test_validate_trims_and_uppercases() {
        let req = JoinRoomRequest {
            room_id: " abcd ".to_string(),
            player_id: " p1 ".to_string(),
            player_name: "  Alice ".to_string(),
        }
        .validate()
        .unwrap();

        assert_eq!(req.room_id, "ABCD");
        assert_eq!(req.player_id, "p1");
        assert_eq!(req.player_name, "Alice");
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let name_too_long = CreateRoomRequest {
            player_id: "p1".to_string(),
            player_name: "x".repeat(MAX_NAME_LENGTH + 1),
        };
        assert!(matches!(
            name_too_long.validate(),
            Err(RoomError::InvalidRequest(_))
        ));

        let blank_id = RoomActionRequest {
            room_id: "ABCD".to_string(),
            player_id: "   ".to_string(),
        };
        assert_eq!(
            blank_id.validate().unwrap_err(),
            RoomError::InvalidRequest("playerId is required".to_string())
        );

        let empty_clue = SubmitClueRequest {
            room_id: "ABCD".to_string(),
            player_id: "p1".to_string(),
            clue: " ".to_string(),
        };
        assert!(empty_clue.validate().is_err());

        let long_clue = SubmitClueRequest {
            room_id: "ABCD".to_string(),
            player_id: "p1".to_string(),
            clue: "y".repeat(MAX_CLUE_LENGTH + 1),
        };
        assert!(long_clue.validate().is_err());

        let long_id = VoteRequest {
            room_id: "ABCD".to_string(),
            player_id: "p1".to_string(),
            target_player_id: "z".repeat(MAX_ID_LENGTH + 1),
        };
        assert!(long_id.validate().is_err());
    }

    #[test]
    fn test_name_length_counts_characters() {
        let req = CreateRoomRequest {
            player_id: "p1".to_string(),
            player_name: "é".repeat(MAX_NAME_LENGTH),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_room_query_viewer() {
        assert_eq!(RoomQuery::default().viewer(), Ok(None));
        let blank = RoomQuery {
            player_id: Some("  ".to_string()),
        };
        assert_eq!(blank.viewer(), Ok(None));
        let given = RoomQuery {
            player_id: Some(" p2 ".to_string()),
        };
        assert_eq!(given.viewer(), Ok(Some("p2".to_string())));
    }

    #[test]
    fn test_leave_response_omits_deleted_room() {
        let body = LeaveRoomResponse {
            room_deleted: true,
            room: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"roomDeleted":true}"#
        );
    }
}
