//! Transport seam.
//!
//! The session never touches sockets. A transport provides:
//! - `Rendezvous`: register a discoverable peer id, connect to one, and
//!   queue everything that happens as `LinkEvent`s
//! - `Link`: one bidirectional text channel to the other peer
//!
//! Delivery on a link is assumed ordered and lossless. The session does no
//! sequencing, acknowledgement, or retransmission of its own.

use crate::error::TransportError;

/// Identifies one end of a link, so events from stale links can be told
/// apart from the live one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u64);

impl std::fmt::Display for LinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// One end of a peer connection.
pub trait Link {
    /// Identity of this end.
    fn id(&self) -> LinkId;

    /// Queue a text frame for the peer.
    fn send(&mut self, frame: &str) -> Result<(), TransportError>;

    /// Close the link. Idempotent; never fails.
    fn close(&mut self);
}

/// Something the transport reports back to the session.
#[derive(Debug)]
pub enum LinkEvent<L> {
    /// A peer connected to our registered id (host side).
    Incoming(L),
    /// The link is ready for traffic.
    Open(LinkId),
    /// A text frame arrived.
    Data(LinkId, String),
    /// The peer (or the transport) closed the link.
    Closed(LinkId),
    /// A failure on a link, or on the registration itself when `None`.
    Error(Option<LinkId>, TransportError),
}

/// Peer discovery plus the event queue for everything this side owns.
pub trait Rendezvous {
    type Link: Link;

    /// Make this side discoverable as `peer_id`.
    fn register(&mut self, peer_id: &str) -> Result<(), TransportError>;

    /// Start connecting to `peer_id`. The link reports `Open` when ready.
    fn connect(&mut self, peer_id: &str) -> Result<Self::Link, TransportError>;

    /// Drop the registered peer id, if any.
    fn release(&mut self);

    /// Next pending event, if any. Never blocks.
    fn poll(&mut self) -> Option<LinkEvent<Self::Link>>;
}
