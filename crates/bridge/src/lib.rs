//! Bridge module - host control via line-delimited JSON
//!
//! The bridge lets any host (a game engine, a web front end, a test script) drive
//! a [`RoundController`](match_drop_engine::RoundController) over a byte stream.
//! The `match-drop` binary runs it over stdin/stdout.
//!
//! # Protocol Overview
//!
//! One JSON object per line, tagged by `"type"`.
//!
//! ## Host → Engine
//!
//! - **input**: a pointer/click event (`pointer_down`, `pointer_move`, `pointer_up`,
//!   `item_clicked`, `replay_clicked`)
//! - **restart**: back to level 1
//! - **snapshot**: request a state snapshot
//! - **quit**: end the session
//!
//! ## Engine → Host
//!
//! - **command**: one render/audio command (`set_position`, `set_active`,
//!   `set_color`, `play_cue`, `reparent`, `set_carried`)
//! - **snapshot**: controller state (phase, level, matched, slots, ...)
//! - **error**: error response with code and message; the session continues
//!
//! # Environment Variables
//!
//! - `MATCH_DROP_TICK_MS`: host tick interval (default: 16)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Engine -> Host: {"type":"command","command":{"type":"set_active","target":{"kind":"victory_panel"},"active":false}}
//! Engine -> Host: {"type":"command","command":{"type":"play_cue","cue":3}}
//! Host -> Engine: {"type":"input","event":{"type":"pointer_down","item":"cat","pos":{"x":10.0,"y":20.0}}}
//! Host -> Engine: {"type":"input","event":{"type":"pointer_up","pos":{"x":100.0,"y":100.0},"slot":0}}
//! Engine -> Host: {"type":"command","command":{"type":"play_cue","cue":100}}
//! Host -> Engine: {"type":"snapshot"}
//! Engine -> Host: {"type":"snapshot","phase":"playing","level":1,...}
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async I/O and the fixed tick
//! - Works over any `AsyncRead`/`AsyncWrite` pair (stdio, TCP, `tokio::io::duplex`)
//! - See [`protocol`] for message definitions
//! - See [`runtime`] for the session loop

pub mod protocol;
pub mod runtime;

pub use match_drop_engine as engine;

pub use protocol::{parse_inbound, ErrorCode, Inbound, Outbound};
pub use runtime::{run, BridgeConfig};
