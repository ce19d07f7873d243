//! Spectators and permission-filtered event delivery.
//!
//! Every raid event is appended to a bounded [`EventLog`] and queued for each
//! spectator whose [`SpectatorPermissions`] allow its [`EventKind`]. The
//! transport drains the queue; late joiners catch up with
//! [`SpectatorManager::replay_for`].
pub mod events;
pub mod manager;

pub use events::{EventKind, EventLog, LoggedEvent, RaidEvent};
pub use manager::{SpectatorDelivery, SpectatorManager, SpectatorPermissions, SpectatorRecord};
