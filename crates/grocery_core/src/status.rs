use std::fmt;

use serde::{Deserialize, Serialize};

/// Status reported by the remote task API.
///
/// Unknown strings are kept in `Unrecognized` and treated as still waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Running,
    Processing,
    Completed,
    Failed,
    Unrecognized(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Unrecognized(raw) => raw,
        }
    }

    /// True for every status that keeps the poller waiting, including unrecognized ones.
    pub fn is_waiting(&self) -> bool {
        !matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, TaskStatus::Unrecognized(_))
    }
}

impl From<&str> for TaskStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "pending" => TaskStatus::Pending,
            "running" => TaskStatus::Running,
            "processing" => TaskStatus::Processing,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            other => TaskStatus::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match TaskStatus::from(raw.as_str()) {
            TaskStatus::Unrecognized(_) => TaskStatus::Unrecognized(raw),
            known => known,
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
