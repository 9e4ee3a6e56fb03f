use std::fmt;
use std::time::Duration;

use grocery_core::TaskStatus;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Opaque id of a remote task. Numeric ids are kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskHandle(String);

impl TaskHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Body of a task creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub parameters: Map<String, Value>,
    pub priority: Priority,
    /// Hint for the remote side, in seconds.
    #[serde(rename = "timeout")]
    pub timeout_secs: u64,
}

impl TaskSpec {
    /// Task asking the remote agent to read active items from a Notion database.
    pub fn notion_grocery_fetch(database_id: &str, notion_token: &str) -> Self {
        let parameters = json!({
            "database_id": database_id,
            "notion_token": notion_token,
            "fields": ["Item", "Quantity", "Category", "Notes"],
            "filter": {
                "property": "Status",
                "select": { "equals": "Active" }
            }
        });
        Self {
            name: "Fetch Notion Grocery List".to_string(),
            description: "Fetch grocery list data from Notion database".to_string(),
            kind: "data_fetch".to_string(),
            source: "notion".to_string(),
            parameters: match parameters {
                Value::Object(map) => map,
                _ => Map::new(),
            },
            priority: Priority::High,
            timeout_secs: 300,
        }
    }
}

/// One status read of a remote task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    /// Full response body, kept for diagnostics.
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    TaskCreated {
        task: TaskHandle,
    },
    StatusObserved {
        task: TaskHandle,
        attempt: u32,
        max_attempts: u32,
        status: TaskStatus,
    },
    /// Non-fatal: the session keeps polling.
    StatusQueryFailed {
        task: TaskHandle,
        attempt: u32,
        max_attempts: u32,
        error: ApiError,
    },
    /// Emitted right before sleeping after `attempt`.
    Waiting {
        task: TaskHandle,
        attempt: u32,
        delay: Duration,
    },
    ResultFetched {
        task: TaskHandle,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    MissingField(&'static str),
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::MissingField(field) => write!(f, "response has no `{field}`"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
