//! match-drop (workspace facade crate).
//!
//! This package exposes `match_drop::{types,core,engine,bridge}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use match_drop_bridge as bridge;
pub use match_drop_core as core;
pub use match_drop_engine as engine;
pub use match_drop_types as types;
