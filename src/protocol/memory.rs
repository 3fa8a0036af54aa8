//! In-process transport.
//!
//! `MemoryNetwork` is a shared switchboard; each `MemoryEndpoint` is one
//! participant's view of it (a `Rendezvous`). Frames are delivered in send
//! order and never lost, matching what the session expects from a real
//! peer link. Nothing is delivered until the receiving side polls.
//!
//! ```
//! use dots_boxes::protocol::{Link, LinkEvent, MemoryNetwork, Rendezvous};
//!
//! let network = MemoryNetwork::new();
//! let mut host = network.endpoint();
//! let mut guest = network.endpoint();
//!
//! host.register("db-game-1234").unwrap();
//! let mut link = guest.connect("db-game-1234").unwrap();
//! link.send("hello").unwrap();
//!
//! assert!(matches!(host.poll(), Some(LinkEvent::Incoming(_))));
//! assert!(matches!(host.poll(), Some(LinkEvent::Open(_))));
//! assert!(matches!(host.poll(), Some(LinkEvent::Data(_, ref text)) if text == "hello"));
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::transport::{Link, LinkEvent, LinkId, Rendezvous};
use crate::error::TransportError;

type EndpointId = u64;

/// One open link end. Records are removed as soon as the link closes.
struct LinkRecord {
    owner: EndpointId,
    remote: LinkId,
}

#[derive(Default)]
struct Switchboard {
    next_id: u64,
    registry: FxHashMap<String, EndpointId>,
    refused: FxHashSet<String>,
    queues: FxHashMap<EndpointId, VecDeque<LinkEvent<MemoryLink>>>,
    links: FxHashMap<LinkId, LinkRecord>,
}

impl Switchboard {
    fn alloc(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, endpoint: EndpointId, event: LinkEvent<MemoryLink>) {
        self.queues.entry(endpoint).or_default().push_back(event);
    }

    /// Forget both ends of a link. Returns the remote end if it was open.
    fn shut(&mut self, id: LinkId) -> Option<(EndpointId, LinkId)> {
        let record = self.links.remove(&id)?;
        let remote = self.links.remove(&record.remote)?;
        Some((remote.owner, record.remote))
    }

    /// Remove everything belonging to a departing endpoint. Its links close
    /// and their remote ends are notified.
    fn evict(&mut self, endpoint: EndpointId) {
        self.queues.remove(&endpoint);
        self.registry.retain(|_, owner| *owner != endpoint);
        let owned: Vec<LinkId> = self
            .links
            .iter()
            .filter(|(_, record)| record.owner == endpoint)
            .map(|(id, _)| *id)
            .collect();
        for id in owned {
            if let Some((owner, remote)) = self.shut(id) {
                if owner != endpoint {
                    self.push(owner, LinkEvent::Closed(remote));
                }
            }
        }
    }
}

/// Shared in-process network. Cloning yields another handle to the same one.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    inner: Rc<RefCell<Switchboard>>,
}

impl MemoryNetwork {
    /// Create an empty network.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new participant.
    #[must_use]
    pub fn endpoint(&self) -> MemoryEndpoint {
        let id = self.inner.borrow_mut().alloc();
        MemoryEndpoint {
            network: self.clone(),
            id,
            registered: None,
        }
    }

    /// Is `peer_id` currently registered?
    #[must_use]
    pub fn is_registered(&self, peer_id: &str) -> bool {
        self.inner.borrow().registry.contains_key(peer_id)
    }

    /// Make future registrations of `peer_id` fail.
    pub fn refuse_registration(&self, peer_id: impl Into<String>) {
        self.inner.borrow_mut().refused.insert(peer_id.into());
    }

    /// Break every open link, reporting a transport error to both ends.
    pub fn sever_all(&self) {
        let mut board = self.inner.borrow_mut();
        let open: Vec<(LinkId, EndpointId)> = board
            .links
            .drain()
            .map(|(id, record)| (id, record.owner))
            .collect();
        for (id, owner) in open {
            board.push(
                owner,
                LinkEvent::Error(Some(id), TransportError::Other("link severed".into())),
            );
        }
    }

    /// Number of open link ends.
    #[must_use]
    pub fn open_links(&self) -> usize {
        self.inner.borrow().links.len()
    }

    fn make_link(&self, id: LinkId) -> MemoryLink {
        MemoryLink {
            board: Rc::downgrade(&self.inner),
            id,
        }
    }
}

impl std::fmt::Debug for MemoryNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let board = self.inner.borrow();
        f.debug_struct("MemoryNetwork")
            .field("registered", &board.registry.len())
            .field("links", &board.links.len())
            .finish()
    }
}

/// One participant on a `MemoryNetwork`.
#[derive(Debug)]
pub struct MemoryEndpoint {
    network: MemoryNetwork,
    id: EndpointId,
    registered: Option<String>,
}

impl MemoryEndpoint {
    /// The network this endpoint lives on.
    #[must_use]
    pub fn network(&self) -> &MemoryNetwork {
        &self.network
    }
}

impl Rendezvous for MemoryEndpoint {
    type Link = MemoryLink;

    fn register(&mut self, peer_id: &str) -> Result<(), TransportError> {
        let mut board = self.network.inner.borrow_mut();
        let reason = if board.refused.contains(peer_id) {
            Some("registration refused")
        } else if board.registry.contains_key(peer_id) {
            Some("id is taken")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(TransportError::Registration {
                peer: peer_id.to_string(),
                reason: reason.to_string(),
            });
        }
        board.registry.insert(peer_id.to_string(), self.id);
        self.registered = Some(peer_id.to_string());
        Ok(())
    }

    fn connect(&mut self, peer_id: &str) -> Result<MemoryLink, TransportError> {
        let mut board = self.network.inner.borrow_mut();
        let host = *board
            .registry
            .get(peer_id)
            .ok_or_else(|| TransportError::PeerUnavailable(peer_id.to_string()))?;

        let local = LinkId(board.alloc());
        let remote = LinkId(board.alloc());
        board.links.insert(
            local,
            LinkRecord {
                owner: self.id,
                remote,
            },
        );
        board.links.insert(
            remote,
            LinkRecord {
                owner: host,
                remote: local,
            },
        );

        board.push(host, LinkEvent::Incoming(self.network.make_link(remote)));
        board.push(host, LinkEvent::Open(remote));
        board.push(self.id, LinkEvent::Open(local));
        trace!(peer = peer_id, %local, %remote, "memory link created");

        Ok(self.network.make_link(local))
    }

    fn release(&mut self) {
        if let Some(peer_id) = self.registered.take() {
            let mut board = self.network.inner.borrow_mut();
            if board.registry.get(&peer_id) == Some(&self.id) {
                board.registry.remove(&peer_id);
            }
        }
    }

    fn poll(&mut self) -> Option<LinkEvent<MemoryLink>> {
        self.network
            .inner
            .borrow_mut()
            .queues
            .get_mut(&self.id)?
            .pop_front()
    }
}

impl Drop for MemoryEndpoint {
    fn drop(&mut self) {
        self.network.inner.borrow_mut().evict(self.id);
    }
}

/// One end of an in-memory link.
///
/// Holds a weak handle so links parked in event queues do not keep the
/// network alive.
pub struct MemoryLink {
    board: Weak<RefCell<Switchboard>>,
    id: LinkId,
}

impl Link for MemoryLink {
    fn id(&self) -> LinkId {
        self.id
    }

    fn send(&mut self, frame: &str) -> Result<(), TransportError> {
        let board = self.board.upgrade().ok_or(TransportError::Closed)?;
        let mut board = board.borrow_mut();
        let remote = board
            .links
            .get(&self.id)
            .ok_or(TransportError::Closed)?
            .remote;
        let owner = board
            .links
            .get(&remote)
            .map(|r| r.owner)
            .ok_or(TransportError::Closed)?;
        board.push(owner, LinkEvent::Data(remote, frame.to_string()));
        Ok(())
    }

    fn close(&mut self) {
        let Some(board) = self.board.upgrade() else {
            return;
        };
        let mut board = board.borrow_mut();
        if let Some((owner, remote)) = board.shut(self.id) {
            board.push(owner, LinkEvent::Closed(remote));
        }
    }
}

impl std::fmt::Debug for MemoryLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MemoryLink").field(&self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice_fails() {
        let network = MemoryNetwork::new();
        let mut a = network.endpoint();
        let mut b = network.endpoint();

        a.register("db-game-1111").unwrap();
        assert!(matches!(
            b.register("db-game-1111"),
            Err(TransportError::Registration { .. })
        ));
    }

    #[test]
    fn test_refused_registration() {
        let network = MemoryNetwork::new();
        network.refuse_registration("db-game-2222");

        let mut a = network.endpoint();
        assert!(a.register("db-game-2222").is_err());
        assert!(!network.is_registered("db-game-2222"));
    }

    #[test]
    fn test_frames_in_order() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        let mut guest = network.endpoint();
        host.register("db-game-3333").unwrap();

        let mut link = guest.connect("db-game-3333").unwrap();
        for i in 0..5 {
            link.send(&i.to_string()).unwrap();
        }

        let frames: Vec<String> = std::iter::from_fn(|| host.poll())
            .filter_map(|event| match event {
                LinkEvent::Data(_, text) => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(frames, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_close_notifies_peer_once() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        let mut guest = network.endpoint();
        host.register("db-game-4444").unwrap();

        let mut link = guest.connect("db-game-4444").unwrap();
        link.close();
        link.close();
        assert_eq!(link.send("late"), Err(TransportError::Closed));

        let closes = std::iter::from_fn(|| host.poll())
            .filter(|event| matches!(event, LinkEvent::Closed(_)))
            .count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_sever_reports_errors() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        let mut guest = network.endpoint();
        host.register("db-game-5555").unwrap();
        let mut link = guest.connect("db-game-5555").unwrap();

        network.sever_all();

        assert!(link.send("x").is_err());
        assert!(std::iter::from_fn(|| guest.poll())
            .any(|event| matches!(event, LinkEvent::Error(Some(_), _))));
    }

    #[test]
    fn test_closed_links_forgotten() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        let mut guest = network.endpoint();
        host.register("db-game-7777").unwrap();

        for _ in 0..3 {
            let mut link = guest.connect("db-game-7777").unwrap();
            assert_eq!(network.open_links(), 2);
            link.close();
            assert_eq!(network.open_links(), 0);
        }

        guest.connect("db-game-7777").unwrap();
        network.sever_all();
        assert_eq!(network.open_links(), 0);
    }

    #[test]
    fn test_dropped_endpoint_evicted() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        host.register("db-game-8888").unwrap();

        let mut guest = network.endpoint();
        let _link = guest.connect("db-game-8888").unwrap();
        drop(host);

        assert!(!network.is_registered("db-game-8888"));
        assert_eq!(network.open_links(), 0);
        assert_eq!(network.inner.borrow().queues.len(), 1);
        assert!(std::iter::from_fn(|| guest.poll())
            .any(|event| matches!(event, LinkEvent::Closed(_))));

        drop(guest);
        assert!(network.inner.borrow().queues.is_empty());
    }

    #[test]
    fn test_release_only_own_id() {
        let network = MemoryNetwork::new();
        let mut host = network.endpoint();
        host.register("db-game-6666").unwrap();

        let mut other = network.endpoint();
        other.release();
        assert!(network.is_registered("db-game-6666"));

        host.release();
        assert!(!network.is_registered("db-game-6666"));
    }
}
