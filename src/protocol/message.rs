//! Wire messages exchanged between peers.
//!
//! Messages are JSON text frames tagged by `type`:
//!
//! ```json
//! { "type": "JOIN", "name": "B" }
//! { "type": "START", "config": { "p1Name": "A", "p2Name": "B", "gridSize": 6,
//!   "mode": "ONLINE", "roomId": "4821", "myPlayer": "First" } }
//! { "type": "MOVE", "lineType": "horizontal", "r": 0, "c": 1 }
//! { "type": "RESTART" }
//! { "type": "QUIT" }
//! ```
//!
//! Anything that does not decode into one of these five variants is
//! rejected by `decode` and ignored by the session.

use serde::{Deserialize, Serialize};

use crate::board::{Edge, Orientation};
use crate::core::{validate_grid_size, GameMode, Player, RoomCode, SessionConfig};
use crate::error::ConfigError;

/// Every message a peer may send.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkMessage {
    /// Guest introduces itself to the host.
    Join { name: String },

    /// Host hands the agreed configuration to the guest.
    Start { config: WireConfig },

    /// A claimed edge.
    Move {
        #[serde(rename = "lineType")]
        orientation: Orientation,
        #[serde(rename = "r")]
        row: usize,
        #[serde(rename = "c")]
        col: usize,
    },

    /// Both sides reset to a fresh board.
    Restart,

    /// Sender is leaving; best effort.
    Quit,
}

impl NetworkMessage {
    /// `MOVE` frame for an edge.
    #[must_use]
    pub fn from_edge(edge: Edge) -> Self {
        NetworkMessage::Move {
            orientation: edge.orientation,
            row: edge.row,
            col: edge.col,
        }
    }

    /// Edge carried by a `MOVE` frame.
    #[must_use]
    pub fn edge(&self) -> Option<Edge> {
        match *self {
            NetworkMessage::Move {
                orientation,
                row,
                col,
            } => Some(Edge::new(orientation, row, col)),
            _ => None,
        }
    }

    /// Wire tag, for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            NetworkMessage::Join { .. } => "JOIN",
            NetworkMessage::Start { .. } => "START",
            NetworkMessage::Move { .. } => "MOVE",
            NetworkMessage::Restart => "RESTART",
            NetworkMessage::Quit => "QUIT",
        }
    }

    /// Serialize to a text frame.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a text frame.
    pub fn decode(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}

/// Match configuration as carried by `START`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireConfig {
    pub p1_name: String,
    pub p2_name: String,
    pub grid_size: usize,
    pub mode: GameMode,
    pub room_id: String,
    pub my_player: Player,
}

impl WireConfig {
    /// Turn a received config into the local one, controlling `local`.
    ///
    /// The sender's `myPlayer` describes the sender; the receiver always
    /// replaces it with its own seat.
    pub fn adopt(self, local: Player) -> Result<SessionConfig, ConfigError> {
        let grid_size = validate_grid_size(self.grid_size)?;
        let room = RoomCode::parse(&self.room_id)?;
        Ok(SessionConfig::online(
            self.p1_name,
            self.p2_name,
            grid_size,
            room,
            local,
        ))
    }
}

impl TryFrom<&SessionConfig> for WireConfig {
    type Error = ConfigError;

    fn try_from(config: &SessionConfig) -> Result<Self, Self::Error> {
        let (Some(room), Some(local)) = (config.room_code, config.local_player) else {
            return Err(ConfigError::MissingOnlineIdentity);
        };
        Ok(Self {
            p1_name: config.first_name.clone(),
            p2_name: config.second_name.clone(),
            grid_size: config.grid_size,
            mode: GameMode::Online,
            room_id: room.to_string(),
            my_player: local,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value(message: &NetworkMessage) -> serde_json::Value {
        serde_json::from_str(&message.encode().unwrap()).unwrap()
    }

    #[test]
    fn test_join_shape() {
        let message = NetworkMessage::Join { name: "B".into() };
        assert_eq!(value(&message), json!({ "type": "JOIN", "name": "B" }));
    }

    #[test]
    fn test_move_shape() {
        let message = NetworkMessage::from_edge(Edge::vertical(2, 3));
        assert_eq!(
            value(&message),
            json!({ "type": "MOVE", "lineType": "vertical", "r": 2, "c": 3 })
        );
        assert_eq!(message.edge(), Some(Edge::vertical(2, 3)));
    }

    #[test]
    fn test_unit_shapes() {
        assert_eq!(value(&NetworkMessage::Restart), json!({ "type": "RESTART" }));
        assert_eq!(value(&NetworkMessage::Quit), json!({ "type": "QUIT" }));
    }

    #[test]
    fn test_start_shape() {
        let room = RoomCode::new(4821).unwrap();
        let config = SessionConfig::online("A", "B", 6, room, Player::First);
        let message = NetworkMessage::Start {
            config: WireConfig::try_from(&config).unwrap(),
        };

        assert_eq!(
            value(&message),
            json!({
                "type": "START",
                "config": {
                    "p1Name": "A",
                    "p2Name": "B",
                    "gridSize": 6,
                    "mode": "ONLINE",
                    "roomId": "4821",
                    "myPlayer": "First"
                }
            })
        );
    }

    #[test]
    fn test_decode_from_peer_text() {
        let frame = r#"{"type":"MOVE","lineType":"horizontal","r":0,"c":4}"#;
        assert_eq!(
            NetworkMessage::decode(frame).unwrap(),
            NetworkMessage::from_edge(Edge::horizontal(0, 4))
        );
    }

    #[test]
    fn test_decode_rejects_garbage() {
        for frame in [
            "",
            "not json",
            r#"{"type":"PING"}"#,
            r#"{"name":"B"}"#,
            r#"{"type":"MOVE","lineType":"diagonal","r":0,"c":0}"#,
            r#"{"type":"MOVE","lineType":"vertical","r":-1,"c":0}"#,
            r#"{"type":"JOIN"}"#,
        ] {
            assert!(NetworkMessage::decode(frame).is_err(), "accepted {frame:?}");
        }
    }

    #[test]
    fn test_adopt_overrides_seat() {
        let wire = WireConfig {
            p1_name: "A".into(),
            p2_name: "B".into(),
            grid_size: 6,
            mode: GameMode::Online,
            room_id: "4821".into(),
            my_player: Player::First,
        };
        let config = wire.adopt(Player::Second).unwrap();

        assert_eq!(config.local_player, Some(Player::Second));
        assert_eq!(config.room_code, Some(RoomCode::new(4821).unwrap()));
        assert_eq!(config.grid_size, 6);
        assert!(config.is_online());
    }

    #[test]
    fn test_adopt_rejects_bad_values() {
        let wire = WireConfig {
            p1_name: "A".into(),
            p2_name: "B".into(),
            grid_size: 1,
            mode: GameMode::Online,
            room_id: "4821".into(),
            my_player: Player::First,
        };
        assert_eq!(wire.clone().adopt(Player::Second), Err(ConfigError::GridSize(1)));

        let wire = WireConfig {
            grid_size: 6,
            room_id: "xyz".into(),
            ..wire
        };
        assert!(wire.adopt(Player::Second).is_err());
    }

    #[test]
    fn test_offline_config_has_no_wire_form() {
        let config = SessionConfig::offline("A", "B", 6);
        assert_eq!(
            WireConfig::try_from(&config),
            Err(ConfigError::MissingOnlineIdentity)
        );
    }
}
