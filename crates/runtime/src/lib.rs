//! Runtime hosting for raid battles.
//!
//! This crate wraps the synchronous `raid-core` engine with the pieces a
//! transport layer needs: a repository of live raids, a validated command
//! boundary, a response envelope and a topic-based event bus.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the [`RaidService`] façade, its builder and config
//! - [`api`] exposes the types downstream clients exchange with the service
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] stores raids behind per-raid locks
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;

pub use api::{CommandReply, RaidCommand, RaidResponse, Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use repository::{InMemoryRaidRepository, RaidId, RaidRepository, RepositoryError, SharedRaid};
pub use runtime::{Clock, RaidService, RaidServiceBuilder, RuntimeConfig};
