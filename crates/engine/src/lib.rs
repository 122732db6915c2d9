//! Engine module - game configuration, round planning and the round controller
//!
//! This crate turns the leaves in `match-drop-core` into playable games:
//!
//! - [`config`]: `GameConfig` (variant, match rule, level ladder, layout, cues)
//! - [`catalog`]: item assets looked up by identity
//! - [`plan`]: per-variant round planning (sound match, shape color, spelling)
//! - [`round`]: `RoundController`, the level lifecycle driven by host input and time
//! - [`snapshot`]: serializable controller view
//!
//! # Example
//!
//! ```
//! use match_drop_engine::{GameConfig, RoundController};
//! use match_drop_types::Phase;
//!
//! let mut controller = RoundController::from_config(GameConfig {
//!     seed: Some(7),
//!     ..GameConfig::sound_match()
//! });
//! let mut out = Vec::new();
//! controller.initialize(&mut out).unwrap();
//!
//! assert_eq!(controller.phase(), Phase::Playing);
//! assert_eq!(controller.level(), 1);
//! assert!(!out.is_empty());
//! ```

pub mod catalog;
pub mod config;
pub mod plan;
pub mod round;
pub mod snapshot;

pub use match_drop_core as core;
pub use match_drop_types as types;

pub use catalog::{AssetCatalog, Catalog};
pub use config::{GameConfig, Layout, Variant};
pub use plan::{plan_round, RoundPlan};
pub use round::{Round, RoundController};
pub use snapshot::{RoundSnapshot, SlotSnapshot};
