//! Error and warning types for the match-drop engine

use std::fmt;

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that prevent an operation (usually building a round) from completing.
///
/// Per-drop and per-cue problems are not errors; they are logged and recovered
/// where they happen.
#[derive(Error, Debug)]
pub enum Error {
    /// The item pool is smaller than the round size
    #[error("insufficient pool: round needs {requested} distinct items, pool has {available}")]
    InsufficientPool { requested: usize, available: usize },

    /// Not enough palette colors to assign at all
    #[error("palette needs at least {required} colors, got {available}")]
    EmptyPalette { required: usize, available: usize },

    /// A slot index outside the active round
    #[error("slot {index} is out of range (round has {len} slots)")]
    OutOfRangeSlot { index: usize, len: usize },

    /// An asset referenced by identity does not exist
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// Level outside 1..=max_level
    #[error("level {level} is out of range (1..={max})")]
    LevelOutOfRange { level: u32, max: u32 },

    /// The session reached victory; restart to play again
    #[error("game finished; restart to play again")]
    GameFinished,

    /// Configuration loading or validation error
    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-fatal conditions reported alongside a successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Fewer palette colors than slots; primary colors repeat.
    PaletteTooSmall { palette: usize, slots: usize },
    /// Asset missing; a transparent color or a skipped cue is used instead.
    MissingAsset(String),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::PaletteTooSmall { palette, slots } => write!(
                f,
                "not enough unique colors ({}) for {} slots; some colors will repeat",
                palette, slots
            ),
            Warning::MissingAsset(what) => write!(f, "missing asset: {}", what),
        }
    }
}
