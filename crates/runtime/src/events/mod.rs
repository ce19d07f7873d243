//! Event bus for broadcasting raid activity to the transport layer.
//!
//! Every entry a raid appends to its event log is republished on the bus,
//! routed to a [`Topic`] by its kind. Subscribers pick the topics they need.

mod bus;

pub use bus::{Event, EventBus, Topic};
