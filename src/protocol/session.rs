//! Peer session: handshake, move propagation, restart and quit.
//!
//! ```text
//! host:  Idle ──host()──▶ Hosting ──JOIN──▶ Active ──quit/close/error──▶ Terminated
//! guest: Idle ──join()──▶ Joining ──START─▶ Active ──quit/close/error──▶ Terminated
//! ```
//!
//! Handshake failures send the session back to `Idle` with a status
//! update; nothing is retried. `Terminated` is absorbing.
//!
//! Both peers hold their own `Game`. Local moves pass turn authority, are
//! applied, then sent as `MOVE`. Received moves are applied unchecked.
//! Replicas agree because both apply the same moves in the same order.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::connection::ConnectionManager;
use super::message::{NetworkMessage, WireConfig};
use super::transport::{Link, LinkEvent, LinkId, Rendezvous};
use crate::board::Edge;
use crate::core::{validate_grid_size, Player, RoomCode, SessionConfig, SessionRng};
use crate::error::{ConfigError, SessionError, SessionResult, TransportError};
use crate::game::Game;
use crate::rules::MoveOutcome;

/// Prefix of every rendezvous identity, `"db-game-<code>"`.
pub const PEER_NAMESPACE: &str = "db-game";

/// Name given to a guest that joined without one.
pub const DEFAULT_OPPONENT_NAME: &str = "Opponent";

/// Status texts surfaced to the user.
pub mod status {
    pub const INITIALIZING: &str = "Initializing room...";
    pub const WAITING: &str = "Waiting for opponent to join...";
    pub const CREATE_FAILED: &str = "Error creating room. Please try again.";
    pub const CONNECTING: &str = "Connecting to room...";
    pub const JOINING: &str = "Connected! Joining game...";
    pub const CONNECT_FAILED: &str = "Could not connect. Check Room ID.";
    pub const CLOSED_BY_HOST: &str = "Connection closed by host.";
    pub const CONNECTION_LOST: &str = "Connection lost.";
    pub const OPPONENT_LEFT: &str = "Opponent has left the game.";
}

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Idle,
    Hosting,
    Joining,
    Active,
    Terminated,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Hosting => "hosting",
            SessionPhase::Joining => "joining",
            SessionPhase::Active => "active",
            SessionPhase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Notifications for the front-end, drained with `Session::next_event`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Human-readable progress or failure text.
    Status(String),
    /// Handshake finished; a fresh board is ready.
    Started(SessionConfig),
    /// An edge was claimed, locally or by the peer.
    MoveApplied {
        edge: Edge,
        outcome: MoveOutcome,
        local: bool,
    },
    /// The board was reset.
    Restarted { local: bool },
    /// The peer sent `QUIT`.
    OpponentQuit,
    /// The link closed or failed mid-match.
    PeerDisconnected,
    /// The session is over for good.
    Terminated,
}

/// One online session attempt over a transport `R`.
pub struct Session<R: Rendezvous> {
    phase: SessionPhase,
    connection: ConnectionManager<R>,
    rng: SessionRng,
    local_name: String,
    grid_size: usize,
    room: Option<RoomCode>,
    game: Option<Game>,
    events: VecDeque<SessionEvent>,
}

impl<R: Rendezvous> Session<R> {
    /// New idle session. Room codes come from entropy.
    pub fn new(rendezvous: R) -> Self {
        Self::with_rng(rendezvous, SessionRng::from_entropy())
    }

    /// New idle session with a given RNG.
    pub fn with_rng(rendezvous: R, rng: SessionRng) -> Self {
        Self {
            phase: SessionPhase::Idle,
            connection: ConnectionManager::new(rendezvous),
            rng,
            local_name: String::new(),
            grid_size: 0,
            room: None,
            game: None,
            events: VecDeque::new(),
        }
    }

    // === Queries ===

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Room of this attempt, once hosting or joining.
    #[must_use]
    pub fn room_code(&self) -> Option<RoomCode> {
        self.room
    }

    /// The running match, while `Active`.
    #[must_use]
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// The connection manager.
    #[must_use]
    pub fn connection(&self) -> &ConnectionManager<R> {
        &self.connection
    }

    /// Next pending notification.
    pub fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.pop_front()
    }

    /// All pending notifications.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    // === Handshake ===

    /// Create a room and wait for a guest. Returns the room code to share.
    pub fn host(&mut self, name: &str, grid_size: usize) -> SessionResult<RoomCode> {
        self.require(SessionPhase::Idle)?;
        let name = validate_name(name)?;
        let grid_size = validate_grid_size(grid_size)?;

        let room = self.rng.room_code();
        let peer_id = room.peer_id(PEER_NAMESPACE);
        self.push_status(status::INITIALIZING);

        if let Err(error) = self.connection.register(&peer_id) {
            warn!(peer = %peer_id, %error, "room registration failed");
            self.fail_handshake(status::CREATE_FAILED);
            return Err(error.into());
        }

        info!(room = %room, grid_size, "hosting room");
        self.local_name = name;
        self.grid_size = grid_size;
        self.room = Some(room);
        self.phase = SessionPhase::Hosting;
        self.push_status(status::WAITING);
        Ok(room)
    }

    /// Connect to a host's room. `JOIN` goes out once the link opens.
    pub fn join(&mut self, name: &str, room_code: &str) -> SessionResult<()> {
        self.require(SessionPhase::Idle)?;
        let name = validate_name(name)?;
        let room = RoomCode::parse(room_code)?;
        let peer_id = room.peer_id(PEER_NAMESPACE);
        self.push_status(status::CONNECTING);

        if let Err(error) = self.connection.connect(&peer_id) {
            warn!(peer = %peer_id, %error, "could not reach host");
            self.fail_handshake(status::CONNECT_FAILED);
            return Err(error.into());
        }

        info!(room = %room, "joining room");
        self.local_name = name;
        self.room = Some(room);
        self.phase = SessionPhase::Joining;
        Ok(())
    }

    // === In-session actions ===

    /// Submit a local move.
    ///
    /// Returns `Ok(None)` when the move was dropped (not our turn, edge
    /// taken, edge off the board); nothing is sent in that case.
    pub fn play(&mut self, edge: Edge) -> SessionResult<Option<MoveOutcome>> {
        self.require(SessionPhase::Active)?;
        let game = self
            .game
            .as_mut()
            .ok_or(SessionError::InvalidPhase(SessionPhase::Active))?;

        let Some(outcome) = game.submit(edge) else {
            return Ok(None);
        };

        self.events.push_back(SessionEvent::MoveApplied {
            edge,
            outcome: outcome.clone(),
            local: true,
        });
        self.send_or_disconnect(&NetworkMessage::from_edge(edge));
        Ok(Some(outcome))
    }

    /// Reset both boards.
    pub fn restart(&mut self) -> SessionResult<()> {
        self.require(SessionPhase::Active)?;
        if let Some(game) = self.game.as_mut() {
            game.restart();
        }
        self.events.push_back(SessionEvent::Restarted { local: true });
        self.send_or_disconnect(&NetworkMessage::Restart);
        Ok(())
    }

    /// Leave: best-effort `QUIT`, close, release, terminate.
    pub fn quit(&mut self) {
        if self.phase == SessionPhase::Terminated {
            return;
        }
        info!(phase = %self.phase, "quitting session");
        self.connection.quit();
        self.terminate();
    }

    // === Transport events ===

    /// Process every queued transport event. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.connection.poll() {
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Process one transport event.
    pub fn handle(&mut self, event: LinkEvent<R::Link>) {
        match event {
            LinkEvent::Incoming(link) => self.on_incoming(link),
            LinkEvent::Open(id) => self.on_open(id),
            LinkEvent::Data(id, frame) => self.on_data(id, &frame),
            LinkEvent::Closed(id) => self.on_closed(id),
            LinkEvent::Error(id, error) => self.on_error(id, error),
        }
    }

    fn on_incoming(&mut self, mut link: R::Link) {
        if self.phase != SessionPhase::Hosting {
            debug!(phase = %self.phase, link = %link.id(), "refusing connection");
            link.close();
            return;
        }
        self.connection.attach(link);
    }

    fn on_open(&mut self, id: LinkId) {
        if !self.connection.mark_open(id) {
            return;
        }
        debug!(phase = %self.phase, link = %id, "link open");
        if self.phase == SessionPhase::Joining {
            self.push_status(status::JOINING);
            let join = NetworkMessage::Join {
                name: self.local_name.clone(),
            };
            if let Err(error) = self.connection.send(&join) {
                warn!(%error, "join not sent");
                self.fail_handshake(status::CONNECT_FAILED);
            }
        }
    }

    fn on_data(&mut self, id: LinkId, frame: &str) {
        if !self.connection.owns(id) {
            debug!(link = %id, "frame from stale link dropped");
            return;
        }
        match NetworkMessage::decode(frame) {
            Ok(message) => self.dispatch(message),
            Err(error) => debug!(%error, "ignoring malformed frame"),
        }
    }

    fn dispatch(&mut self, message: NetworkMessage) {
        match (self.phase, message) {
            (SessionPhase::Hosting, NetworkMessage::Join { name }) => self.accept_guest(name),
            (SessionPhase::Joining, NetworkMessage::Start { config }) => self.adopt_start(config),
            (
                SessionPhase::Active,
                NetworkMessage::Move {
                    orientation,
                    row,
                    col,
                },
            ) => self.apply_remote(Edge::new(orientation, row, col)),
            (SessionPhase::Active, NetworkMessage::Restart) => {
                if let Some(game) = self.game.as_mut() {
                    game.restart();
                }
                self.events.push_back(SessionEvent::Restarted { local: false });
            }
            (SessionPhase::Active, NetworkMessage::Quit) => {
                info!("opponent left");
                self.push_status(status::OPPONENT_LEFT);
                self.events.push_back(SessionEvent::OpponentQuit);
                self.connection.teardown();
                self.terminate();
            }
            (phase, message) => {
                debug!(%phase, kind = message.kind(), "ignoring message");
            }
        }
    }

    fn on_closed(&mut self, id: LinkId) {
        if !self.connection.mark_closed(id) {
            return;
        }
        match self.phase {
            SessionPhase::Active => self.disconnect(),
            SessionPhase::Joining => self.fail_handshake(status::CLOSED_BY_HOST),
            SessionPhase::Hosting => {
                debug!(link = %id, "guest left before joining");
                self.connection.close_link();
                self.push_status(status::WAITING);
            }
            SessionPhase::Idle | SessionPhase::Terminated => {}
        }
    }

    fn on_error(&mut self, id: Option<LinkId>, error: TransportError) {
        if let Some(id) = id {
            if !self.connection.owns(id) {
                return;
            }
        }
        warn!(phase = %self.phase, %error, "transport error");
        match (self.phase, id) {
            (SessionPhase::Active, _) => self.disconnect(),
            (SessionPhase::Hosting, None) => self.fail_handshake(status::CREATE_FAILED),
            (SessionPhase::Hosting, Some(_)) => {
                self.connection.close_link();
                self.push_status(status::WAITING);
            }
            (SessionPhase::Joining, _) => self.fail_handshake(status::CONNECT_FAILED),
            (SessionPhase::Idle | SessionPhase::Terminated, _) => {}
        }
    }

    // === Handshake steps ===

    fn accept_guest(&mut self, name: String) {
        let Some(room) = self.room else {
            return;
        };
        let guest_name = if name.trim().is_empty() {
            DEFAULT_OPPONENT_NAME.to_string()
        } else {
            name
        };
        let config = SessionConfig::online(
            self.local_name.clone(),
            guest_name,
            self.grid_size,
            room,
            Player::First,
        );
        let start = match WireConfig::try_from(&config) {
            Ok(wire) => NetworkMessage::Start { config: wire },
            Err(error) => {
                warn!(%error, "cannot describe config");
                return;
            }
        };
        if let Err(error) = self.connection.send(&start) {
            warn!(%error, "start not sent");
            self.fail_handshake(status::CONNECTION_LOST);
            return;
        }
        self.begin(config);
    }

    fn adopt_start(&mut self, wire: WireConfig) {
        match wire.adopt(Player::Second) {
            Ok(config) => self.begin(config),
            Err(error) => {
                warn!(%error, "START carried an unusable config");
                self.fail_handshake(status::CONNECT_FAILED);
            }
        }
    }

    fn begin(&mut self, config: SessionConfig) {
        match Game::new(config.clone()) {
            Ok(game) => {
                info!(
                    room = ?config.room_code.map(|r| r.to_string()),
                    first = %config.first_name,
                    second = %config.second_name,
                    grid_size = config.grid_size,
                    "match started"
                );
                self.game = Some(game);
                self.phase = SessionPhase::Active;
                self.events.push_back(SessionEvent::Started(config));
            }
            Err(error) => {
                warn!(%error, "match could not start");
                self.fail_handshake(status::CONNECTION_LOST);
            }
        }
    }

    fn apply_remote(&mut self, edge: Edge) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        let outcome = game.apply_remote(edge);
        if outcome.is_claimed() {
            self.events.push_back(SessionEvent::MoveApplied {
                edge,
                outcome,
                local: false,
            });
        } else {
            debug!(%edge, "remote move had no effect");
        }
    }

    // === Teardown ===

    fn send_or_disconnect(&mut self, message: &NetworkMessage) {
        if let Err(error) = self.connection.send(message) {
            warn!(kind = message.kind(), %error, "send failed");
            self.disconnect();
        }
    }

    fn disconnect(&mut self) {
        info!("peer disconnected");
        self.push_status(status::CONNECTION_LOST);
        self.events.push_back(SessionEvent::PeerDisconnected);
        self.connection.teardown();
        self.terminate();
    }

    fn fail_handshake(&mut self, text: &str) {
        self.connection.teardown();
        self.room = None;
        self.game = None;
        self.phase = SessionPhase::Idle;
        self.push_status(text);
    }

    fn terminate(&mut self) {
        self.game = None;
        self.phase = SessionPhase::Terminated;
        self.events.push_back(SessionEvent::Terminated);
    }

    fn require(&self, phase: SessionPhase) -> SessionResult<()> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase(self.phase))
        }
    }

    fn push_status(&mut self, text: &str) {
        self.events.push_back(SessionEvent::Status(text.to_string()));
    }
}

fn validate_name(name: &str) -> Result<String, ConfigError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(ConfigError::BlankName)
    } else {
        Ok(trimmed.to_string())
    }
}
