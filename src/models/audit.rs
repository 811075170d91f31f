use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Accepted,
    Rejected,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// One immutable record of a command-handling outcome, one per inbound
/// attempt regardless of the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub status: CommandStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    /// The command as received: the raw text when parsing failed, the
    /// parsed value otherwise.
    pub command: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuditEntry {
    pub fn accepted(command: Value, received_at: OffsetDateTime) -> Self {
        Self {
            status: CommandStatus::Accepted,
            received_at,
            command,
            reason: None,
        }
    }

    pub fn rejected(command: Value, reason: String, received_at: OffsetDateTime) -> Self {
        Self {
            status: CommandStatus::Rejected,
            received_at,
            command,
            reason: Some(reason),
        }
    }
}
