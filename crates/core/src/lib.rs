//! Core engine module - pure, deterministic, and testable
//!
//! This crate holds the leaves of the match-drop engine. It has no I/O, no
//! threads and no wall-clock reads in the hot path, which makes it:
//!
//! - **Deterministic**: the same seed produces identical selections and layouts
//! - **Testable**: every component is driven by explicit calls and elapsed time
//! - **Host-agnostic**: the host loop feeds input and time, and renders commands
//!
//! # Module Structure
//!
//! - [`rng`]: seeded LCG with unbiased bounded draws and Fisher-Yates shuffle
//! - [`assign`]: round item selection, position shuffling, color/decoy assignment
//! - [`matching`]: drop-correctness rules (identity, color tolerance, type+color)
//! - [`timeline`]: `after(delay, task)` timer queue advanced by the host
//! - [`playback`]: single-flight intro cue sequencing on top of the timeline
//! - [`board`]: a round's slots and draggable tokens
//! - [`drag`]: per-pointer drag state machine producing drop events
//! - [`word`]: spelling-game word selection and decoy letters
//! - [`error`]: error and warning types
//!
//! # Example
//!
//! ```
//! use match_drop_core::{PlaybackScheduler, PlaybackState};
//! use match_drop_types::{Command, CueHandle};
//!
//! let mut scheduler = PlaybackScheduler::new(2000);
//! let mut out = Vec::new();
//!
//! let queue: Vec<CueHandle> = (0..6).map(CueHandle).collect();
//! assert!(scheduler.start(queue.clone(), &mut out));
//! assert!(!scheduler.start(queue, &mut out)); // single flight
//!
//! scheduler.tick(12_000, &mut out);
//! assert_eq!(out.len(), 6);
//! assert!(out.iter().all(|c| matches!(c, Command::PlayCue { .. })));
//! assert_eq!(scheduler.state(), PlaybackState::Idle);
//! ```

pub mod assign;
pub mod board;
pub mod drag;
pub mod error;
pub mod matching;
pub mod playback;
pub mod rng;
pub mod timeline;
pub mod word;

pub use match_drop_types as types;

// Re-export commonly used types for convenience
pub use assign::{AssignmentEngine, AssignmentTable, ColorAssignment, SlotAssignment};
pub use board::{Board, Token};
pub use drag::{DragMachine, DragOutcome, DragRejection, DragSession, DragState};
pub use error::{Error, Result, Warning};
pub use matching::{colors_match, MatchPolicy, MatchRule};
pub use playback::{PlaybackScheduler, PlaybackState};
pub use rng::SimpleRng;
pub use timeline::{Timeline, TimerId};
