//! Response envelope returned to the transport for every command.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use raid_core::GameError;

use super::errors::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RaidResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            error: None,
            code: None,
            data: Some(data),
        }
    }

    /// Failure carrying the error's message and stable code.
    pub fn failure(err: &impl GameError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            code: Some(err.error_code().to_owned()),
            data: None,
        }
    }

    /// Serializes a successful value, or wraps the error.
    pub fn from_result<T: Serialize>(result: Result<T>) -> Self {
        match result.and_then(|value| serde_json::to_value(value).map_err(Into::into)) {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failure(&err),
        }
    }
}
