//! Protocol module - JSON message types for the host bridge
//!
//! One JSON object per line in both directions, tagged by `"type"`.

use match_drop_core::Error;
use match_drop_engine::RoundSnapshot;
use match_drop_types::{Command, InputEvent};
use serde::{Deserialize, Serialize};

// ============== Host -> Engine Messages ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inbound {
    /// Raw pointer/click input.
    Input { event: InputEvent },
    /// Back to level 1.
    Restart,
    /// Ask for a `snapshot` line.
    Snapshot,
    /// End the session.
    Quit,
}

// ============== Engine -> Host Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Line is not valid JSON or not a known message.
    InvalidMessage,
    /// The session reached victory; send `restart`.
    GameFinished,
    LevelOutOfRange,
    /// Building a round failed (pool, palette or layout).
    LoadFailed,
}

impl ErrorCode {
    pub fn from_error(err: &Error) -> Self {
        match err {
            Error::GameFinished => ErrorCode::GameFinished,
            Error::LevelOutOfRange { .. } => ErrorCode::LevelOutOfRange,
            _ => ErrorCode::LoadFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    Command { command: Command },
    Snapshot(RoundSnapshot),
    Error { code: ErrorCode, message: String },
}

impl Outbound {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Outbound::Error {
            code,
            message: message.into(),
        }
    }
}

/// Parse one inbound line (already trimmed).
pub fn parse_inbound(line: &str) -> Result<Inbound, (ErrorCode, String)> {
    serde_json::from_str(line).map_err(|e| (ErrorCode::InvalidMessage, e.to_string()))
}
