//! Standard response envelope: `{status, msg, data, data2}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const STATUS_OK: &str = "ok";
pub const STATUS_ERROR: &str = "error";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Value,
    /// Total page count on paginated lists; absent elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data2: Option<Value>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Envelope {
            status: STATUS_OK.into(),
            msg: String::new(),
            data,
            data2: None,
        }
    }

    pub fn ok_with(data: Value, data2: Value) -> Self {
        Envelope {
            data2: Some(data2),
            ..Envelope::ok(data)
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Envelope {
            status: STATUS_ERROR.into(),
            msg: msg.into(),
            data: Value::Null,
            data2: None,
        }
    }

    /// Wraps the outcome of an add/update/delete.
    pub fn action(affected: bool) -> Self {
        let data = if affected { "Affected" } else { "Unaffected" };
        Envelope::ok(Value::String(data.into()))
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
