//! Types the transport layer exchanges with the runtime.
mod command;
mod errors;
mod response;

pub use command::{CommandReply, RaidCommand};
pub use errors::{Result, RuntimeError};
pub use response::RaidResponse;
