//! Match configuration types.
//!
//! - `GameMode`: local alternation or peer link
//! - `RoomCode`: 4-digit rendezvous code
//! - `SessionConfig`: names, grid size, mode and local identity
//!
//! Configs are built with the builder methods below and checked with
//! `SessionConfig::validate` before a match starts.

use serde::{Deserialize, Serialize};

use super::Player;
use crate::error::ConfigError;

/// Smallest playable grid (one box).
pub const MIN_GRID_SIZE: usize = 2;

/// Largest grid accepted from setup or from a peer's `START` frame.
pub const MAX_GRID_SIZE: usize = 1024;

/// Grid sizes offered by the offline setup screen.
pub const GRID_PRESETS: [usize; 3] = [6, 8, 10];

/// Grid size used when nothing else is chosen.
pub const DEFAULT_GRID_SIZE: usize = 6;

/// Check a grid size (dots per side).
pub fn validate_grid_size(size: usize) -> Result<usize, ConfigError> {
    if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(ConfigError::GridSize(size))
    }
}

/// How moves reach the board. Wire form is `"OFFLINE"` / `"ONLINE"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameMode {
    /// Both players share one input stream.
    Offline,
    /// Each peer controls one seat over a direct link.
    Online,
}

/// Short numeric code two peers use to find each other.
///
/// Always a 4-digit number in `1000..=9999`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoomCode(u16);

impl RoomCode {
    pub const MIN: u16 = 1000;
    pub const MAX: u16 = 9999;

    /// Create a room code from its numeric value.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::RoomCode(value.to_string()))
        }
    }

    /// Create a room code, clamping into the valid range.
    pub(crate) fn clamped(value: u16) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Parse user or wire input. Surrounding whitespace is ignored.
    ///
    /// ```
    /// use dots_boxes::core::RoomCode;
    ///
    /// assert_eq!(RoomCode::parse(" 4821 ").unwrap().to_string(), "4821");
    /// assert!(RoomCode::parse("0999").is_err());
    /// assert!(RoomCode::parse("48a1").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let trimmed = input.trim();
        if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::RoomCode(input.to_string()));
        }
        let value: u16 = trimmed
            .parse()
            .map_err(|_| ConfigError::RoomCode(input.to_string()))?;
        Self::new(value)
    }

    /// Numeric value.
    #[must_use]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Rendezvous identity for this room, `"<namespace>-<code>"`.
    #[must_use]
    pub fn peer_id(self, namespace: &str) -> String {
        format!("{}-{}", namespace, self.0)
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RoomCode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Everything both replicas must agree on before the first move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Display name of the `First` seat.
    pub first_name: String,

    /// Display name of the `Second` seat.
    pub second_name: String,

    /// Dots per side (N ≥ 2).
    pub grid_size: usize,

    /// Offline hot-seat or online peer link.
    pub mode: GameMode,

    /// Room the peers met in (online only).
    pub room_code: Option<RoomCode>,

    /// Seat controlled by this process (online only).
    pub local_player: Option<Player>,
}

impl SessionConfig {
    /// Offline hot-seat match.
    pub fn offline(
        first_name: impl Into<String>,
        second_name: impl Into<String>,
        grid_size: usize,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            second_name: second_name.into(),
            grid_size,
            mode: GameMode::Offline,
            room_code: None,
            local_player: None,
        }
    }

    /// Online match in `room`, controlling `local_player`.
    pub fn online(
        first_name: impl Into<String>,
        second_name: impl Into<String>,
        grid_size: usize,
        room: RoomCode,
        local_player: Player,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            second_name: second_name.into(),
            grid_size,
            mode: GameMode::Online,
            room_code: Some(room),
            local_player: Some(local_player),
        }
    }

    /// Set the room code.
    #[must_use]
    pub fn with_room_code(mut self, room: RoomCode) -> Self {
        self.room_code = Some(room);
        self
    }

    /// Set the locally controlled seat.
    #[must_use]
    pub fn with_local_player(mut self, player: Player) -> Self {
        self.local_player = Some(player);
        self
    }

    /// Is this an online match?
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.mode == GameMode::Online
    }

    /// Display name of a seat.
    #[must_use]
    pub fn name_of(&self, player: Player) -> &str {
        match player {
            Player::First => &self.first_name,
            Player::Second => &self.second_name,
        }
    }

    /// Check the config can start a match.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_grid_size(self.grid_size)?;
        if self.is_online() && (self.room_code.is_none() || self.local_player.is_none()) {
            return Err(ConfigError::MissingOnlineIdentity);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::offline("Player 1", "Player 2", DEFAULT_GRID_SIZE)
    }
}
