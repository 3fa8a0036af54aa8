//! Connection lifecycle: the single owner of the link and the registered
//! peer id for one session attempt.
//!
//! ```text
//! Connecting ──open──▶ Open ──close/error──▶ Closed
//!      └──────────close/error──────────────────┘
//! ```
//!
//! `Closed` is terminal for a connection. A new attempt gets a new one.

use tracing::{debug, warn};

use super::message::NetworkMessage;
use super::transport::{Link, LinkEvent, LinkId, Rendezvous};
use crate::error::TransportError;

/// Lifecycle state of the current link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

struct Connection<L> {
    link: L,
    state: ConnectionState,
}

/// Owns at most one link and one registered peer id.
pub struct ConnectionManager<R: Rendezvous> {
    rendezvous: R,
    identity: Option<String>,
    connection: Option<Connection<R::Link>>,
}

impl<R: Rendezvous> ConnectionManager<R> {
    /// Wrap a transport.
    pub fn new(rendezvous: R) -> Self {
        Self {
            rendezvous,
            identity: None,
            connection: None,
        }
    }

    /// The underlying transport.
    pub fn rendezvous(&self) -> &R {
        &self.rendezvous
    }

    /// Registered peer id, if hosting.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// State of the current link, `None` when there is none.
    #[must_use]
    pub fn state(&self) -> Option<ConnectionState> {
        self.connection.as_ref().map(|c| c.state)
    }

    /// Is there a link ready for traffic?
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == Some(ConnectionState::Open)
    }

    /// Is `id` the current link?
    #[must_use]
    pub fn owns(&self, id: LinkId) -> bool {
        self.connection.as_ref().is_some_and(|c| c.link.id() == id)
    }

    /// Register a discoverable peer id, replacing any previous one.
    pub fn register(&mut self, peer_id: &str) -> Result<(), TransportError> {
        self.release_identity();
        self.rendezvous.register(peer_id)?;
        debug!(peer = peer_id, "peer id registered");
        self.identity = Some(peer_id.to_string());
        Ok(())
    }

    /// Start connecting to a host.
    pub fn connect(&mut self, peer_id: &str) -> Result<(), TransportError> {
        self.close_link();
        let link = self.rendezvous.connect(peer_id)?;
        debug!(peer = peer_id, link = %link.id(), "connecting");
        self.connection = Some(Connection {
            link,
            state: ConnectionState::Connecting,
        });
        Ok(())
    }

    /// Can an incoming link be accepted?
    #[must_use]
    pub fn can_attach(&self) -> bool {
        !matches!(&self.connection, Some(c) if c.state != ConnectionState::Closed)
    }

    /// Take ownership of an incoming link. A link arriving while another
    /// one is live is closed and refused.
    pub fn attach(&mut self, mut link: R::Link) -> bool {
        if !self.can_attach() {
            debug!(link = %link.id(), "refusing second connection");
            link.close();
            return false;
        }
        debug!(link = %link.id(), "incoming connection attached");
        self.connection = Some(Connection {
            link,
            state: ConnectionState::Connecting,
        });
        true
    }

    /// Record that link `id` opened. Returns false for stale links.
    pub fn mark_open(&mut self, id: LinkId) -> bool {
        match self.connection.as_mut() {
            Some(c) if c.link.id() == id && c.state == ConnectionState::Connecting => {
                c.state = ConnectionState::Open;
                true
            }
            _ => false,
        }
    }

    /// Record that link `id` closed. Returns false for stale links.
    pub fn mark_closed(&mut self, id: LinkId) -> bool {
        match self.connection.as_mut() {
            Some(c) if c.link.id() == id && c.state != ConnectionState::Closed => {
                c.state = ConnectionState::Closed;
                true
            }
            _ => false,
        }
    }

    /// Send a message on the open link.
    pub fn send(&mut self, message: &NetworkMessage) -> Result<(), TransportError> {
        let connection = self.connection.as_mut().ok_or(TransportError::NotOpen)?;
        match connection.state {
            ConnectionState::Open => {}
            ConnectionState::Connecting => return Err(TransportError::NotOpen),
            ConnectionState::Closed => return Err(TransportError::Closed),
        }
        let frame = message
            .encode()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        connection.link.send(&frame)
    }

    /// Next queued transport event.
    pub fn poll(&mut self) -> Option<LinkEvent<R::Link>> {
        self.rendezvous.poll()
    }

    /// Leave: best-effort `QUIT`, then tear everything down regardless.
    pub fn quit(&mut self) {
        if self.is_open() {
            if let Err(error) = self.send(&NetworkMessage::Quit) {
                warn!(%error, "quit notification not sent");
            }
        }
        self.teardown();
    }

    /// Close the link and release the peer id.
    pub fn teardown(&mut self) {
        self.close_link();
        self.release_identity();
    }

    /// Close the link but keep the peer id (host keeps waiting).
    pub fn close_link(&mut self) {
        if let Some(mut connection) = self.connection.take() {
            connection.link.close();
            debug!(link = %connection.link.id(), "connection closed");
        }
    }

    fn release_identity(&mut self) {
        if let Some(peer) = self.identity.take() {
            self.rendezvous.release();
            debug!(peer = %peer, "peer id released");
        }
    }
}

impl<R: Rendezvous> Drop for ConnectionManager<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
