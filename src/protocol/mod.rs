//! Peer session protocol.
//!
//! - `message`: the five wire messages and their JSON shape
//! - `transport`: `Link` / `Rendezvous` traits the session is written against
//! - `connection`: lifecycle owner of the link and registered peer id
//! - `session`: handshake and in-match message handling
//! - `memory`: in-process transport

pub mod connection;
pub mod memory;
pub mod message;
pub mod session;
pub mod transport;

pub use connection::{ConnectionManager, ConnectionState};
pub use memory::{MemoryEndpoint, MemoryLink, MemoryNetwork};
pub use message::{NetworkMessage, WireConfig};
pub use session::{
    status, Session, SessionEvent, SessionPhase, DEFAULT_OPPONENT_NAME, PEER_NAMESPACE,
};
pub use transport::{Link, LinkEvent, LinkId, Rendezvous};
