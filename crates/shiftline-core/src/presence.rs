//! # Session Presence
//!
//! Lobby readiness between this player and one connected peer (a second
//! client watching the same session). The transport that carries the peer's
//! flag lives outside the engine; it calls [`PresenceSignal::on_peer_ready_changed`].

use tracing::info;

/// Readiness change seen by presence observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceChange {
    pub own_ready: bool,
    pub peer_ready: bool,
}

impl PresenceChange {
    pub fn both_ready(&self) -> bool {
        self.own_ready && self.peer_ready
    }
}

pub trait PresenceObserver {
    fn on_presence_changed(&mut self, change: PresenceChange);
}

/// Own and peer ready flags for one session.
#[derive(Default)]
pub struct PresenceSignal {
    own_ready: bool,
    peer_ready: bool,
    observers: Vec<Box<dyn PresenceObserver>>,
}

impl PresenceSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer. Observers are notified in subscription order.
    pub fn subscribe(&mut self, observer: Box<dyn PresenceObserver>) {
        self.observers.push(observer);
    }

    /// The peer toggled its ready flag.
    pub fn on_peer_ready_changed(&mut self, ready: bool) {
        if self.peer_ready == ready {
            return;
        }
        self.peer_ready = ready;
        info!(peer_ready = ready, "Peer readiness changed");
        self.notify();
    }

    /// This player toggled their own ready flag.
    pub fn set_own_ready_status(&mut self, ready: bool) {
        if self.own_ready == ready {
            return;
        }
        self.own_ready = ready;
        info!(own_ready = ready, "Own readiness changed");
        self.notify();
    }

    pub fn own_ready(&self) -> bool {
        self.own_ready
    }

    pub fn peer_ready(&self) -> bool {
        self.peer_ready
    }

    pub fn both_ready(&self) -> bool {
        self.own_ready && self.peer_ready
    }

    fn notify(&mut self) {
        let change = PresenceChange {
            own_ready: self.own_ready,
            peer_ready: self.peer_ready,
        };
        for observer in &mut self.observers {
            observer.on_presence_changed(change);
        }
    }
}

impl std::fmt::Debug for PresenceSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceSignal")
            .field("own_ready", &self.own_ready)
            .field("peer_ready", &self.peer_ready)
            .field("observers", &self.observers.len())
            .finish()
    }
}
