//! JSON-lines protocol for driving battles.
//!
//! One JSON object per line in each direction.
//!
//! **Input:** requests tagged with `cmd`
//! **Output:** responses tagged with `type`
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0"}
//! -> {"cmd":"create_battle","size":9}
//! <- {"type":"battle_created","id":4821,"board_size":9}
//! -> {"cmd":"place_robot","battle_id":4821,"row":3,"col":3,"direction":"north"}
//! <- {"type":"entity_placed","entity_id":"R-0193"}
//! -> {"cmd":"place_dinosaur","battle_id":4821,"position":"2,4"}
//! <- {"type":"entity_placed","entity_id":"D-7310"}
//! -> {"cmd":"command","battle_id":4821,"robot":"R-0193","action":"move-forward"}
//! <- {"type":"ack","action":"move-forward","robot":{...},"destroyed":[]}
//! -> {"cmd":"state","battle_id":4821}
//! <- {"type":"state","battle":{...}}
//! ```
//!
//! Raw fields stay untyped (`i64`, `String`) here; validation happens in the
//! service so every bad value maps to the same error codes as the core.

use dino_core::entity::Position;
use dino_core::error::{BattleError, Result};
use dino_core::view::{BattleView, EntityView};
use serde::{Deserialize, Serialize};

/// Protocol version announced in the `ready` line.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Board position in a placement request.
///
/// Either separate `row`/`col` fields or a single `"position": "row,col"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionInput {
    /// Separate coordinates.
    Fields {
        /// One-based row.
        row: i64,
        /// One-based column.
        col: i64,
    },
    /// `"row,col"` pair.
    Pair {
        /// Pair text, e.g. `"3,4"`.
        position: String,
    },
}

impl PositionInput {
    /// Resolve to a [`Position`].
    ///
    /// # Errors
    ///
    /// `BattleError::InvalidPosition` if a pair does not parse.
    pub fn resolve(&self) -> Result<Position> {
        match self {
            PositionInput::Fields { row, col } => Ok(Position::new(*row, *col)),
            PositionInput::Pair { position } => Position::parse_pair(position),
        }
    }
}

impl From<Position> for PositionInput {
    fn from(position: Position) -> Self {
        PositionInput::Fields {
            row: position.row,
            col: position.col,
        }
    }
}

/// Requests accepted by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    /// Create an empty battle.
    CreateBattle {
        /// Board side length; the configured default when absent.
        #[serde(default)]
        size: Option<i64>,
    },
    /// Place a robot.
    PlaceRobot {
        /// Target battle.
        battle_id: i64,
        /// Cell to place on.
        #[serde(flatten)]
        at: PositionInput,
        /// Initial facing: `north`, `east`, `south` or `west`.
        direction: String,
    },
    /// Place a dinosaur.
    PlaceDinosaur {
        /// Target battle.
        battle_id: i64,
        /// Cell to place on.
        #[serde(flatten)]
        at: PositionInput,
    },
    /// Command a robot.
    Command {
        /// Target battle.
        battle_id: i64,
        /// Robot id, e.g. `R-0042`.
        robot: String,
        /// One of `turn-left`, `turn-right`, `move-forward`,
        /// `move-backwards`, `attack`.
        action: String,
    },
    /// Snapshot a battle.
    State {
        /// Target battle.
        battle_id: i64,
    },
    /// Liveness probe.
    Health,
}

/// Responses produced by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Driver is ready for requests.
    Ready {
        /// Protocol version.
        version: String,
    },
    /// A battle was created.
    BattleCreated {
        /// New battle id.
        id: u16,
        /// Side length of its board.
        board_size: usize,
    },
    /// An entity was placed.
    EntityPlaced {
        /// Id of the new entity.
        entity_id: String,
    },
    /// A robot command succeeded.
    Ack {
        /// Applied action.
        action: String,
        /// Robot after the action.
        robot: EntityView,
        /// Dinosaurs destroyed by an attack.
        destroyed: Vec<String>,
    },
    /// Battle snapshot.
    State {
        /// The battle.
        battle: BattleView,
    },
    /// Health probe answer.
    Health {
        /// Always `pass` while the driver runs.
        status: String,
    },
    /// The request failed.
    Error {
        /// Stable snake_case error code.
        code: String,
        /// Human-readable detail.
        message: String,
    },
}

impl Response {
    /// `ready` line for the current protocol version.
    #[must_use]
    pub fn ready() -> Self {
        Response::Ready {
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    /// Error response for a line that is not a valid request.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Response::Error {
            code: "malformed_request".to_string(),
            message: message.into(),
        }
    }

    /// Whether this is an error response.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

impl From<BattleError> for Response {
    fn from(err: BattleError) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_requests() {
        let request: Request = serde_json::from_str(
            r#"{"cmd":"command","battle_id":1234,"robot":"R-0001","action":"attack"}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            Request::Command {
                battle_id: 1234,
                robot: "R-0001".to_string(),
                action: "attack".to_string(),
            }
        );

        let request: Request = serde_json::from_str(r#"{"cmd":"create_battle"}"#).unwrap();
        assert_eq!(request, Request::CreateBattle { size: None });

        let request: Request = serde_json::from_str(r#"{"cmd":"health"}"#).unwrap();
        assert_eq!(request, Request::Health);
    }

    #[test]
    fn test_placement_positions() {
        let request: Request = serde_json::from_str(
            r#"{"cmd":"place_robot","battle_id":1234,"row":3,"col":4,"direction":"east"}"#,
        )
        .unwrap();
        let Request::PlaceRobot { at, .. } = request else {
            panic!("unexpected request: {request:?}");
        };
        assert_eq!(at.resolve(), Ok(Position::new(3, 4)));

        let request: Request =
            serde_json::from_str(r#"{"cmd":"place_dinosaur","battle_id":1234,"position":"5, 6"}"#)
                .unwrap();
        let Request::PlaceDinosaur { at, .. } = request else {
            panic!("unexpected request: {request:?}");
        };
        assert_eq!(at.resolve(), Ok(Position::new(5, 6)));

        let bad = PositionInput::Pair {
            position: "five,six".to_string(),
        };
        assert_eq!(
            bad.resolve(),
            Err(BattleError::InvalidPosition("five,six".to_string()))
        );

        assert!(serde_json::from_str::<Request>(r#"{"cmd":"place_dinosaur","battle_id":1234}"#)
            .is_err());
    }

    #[test]
    fn test_unknown_command_rejected() {
        assert!(serde_json::from_str::<Request>(r#"{"cmd":"fly"}"#).is_err());
    }

    #[test]
    fn test_error_response_shape() {
        let response = Response::from(BattleError::InvalidAction("jump".into()));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "invalid_action");
        assert!(response.is_error());
    }
}
