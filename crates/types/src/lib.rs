//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types shared by the engine, the host bridge
//! and any frontend that drives the games. Everything here is plain data: no RNG,
//! no timers, no logging.
//!
//! # Level Ladder
//!
//! Round size by level (number of participating items and active slots):
//!
//! | Level | Items |
//! |-------|-------|
//! | 1 | 2 |
//! | 2 | 3 |
//! | 3 | 3 |
//! | 4 | 4 |
//! | other | 2 |
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Host loop tick interval (~60 FPS) |
//! | `CUE_HOLD_MS` | 2000 | Time each intro cue is held before the next one plays |
//!
//! # Wire Format
//!
//! [`InputEvent`] and [`Command`] are tagged by `"type"` with snake_case names so a
//! host can exchange them as JSON:
//!
//! ```text
//! {"type":"pointer_down","pointer":0,"item":"cat","pos":{"x":10.0,"y":20.0}}
//! {"type":"play_cue","cue":3}
//! ```
//!
//! # Examples
//!
//! ```
//! use match_drop_types::{level_size, Color, Position, MAX_LEVEL};
//!
//! assert_eq!(level_size(1), 2);
//! assert_eq!(level_size(4), 4);
//! assert_eq!(level_size(9), 2);
//! assert_eq!(MAX_LEVEL, 4);
//!
//! let p = Position::new(1.0, 2.0) + Position::new(3.0, 4.0);
//! assert_eq!(p, Position::new(4.0, 6.0));
//!
//! assert!(Color::RED.approx_eq(&Color::rgb(1.0, 0.0, 0.0), 0.01));
//! ```

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Host loop tick interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// How long each intro cue is held before the next one plays (2 time units)
pub const CUE_HOLD_MS: u32 = 2000;

/// Last level of the ladder; completing it triggers the terminal action
pub const MAX_LEVEL: u32 = 4;

/// Round sizes for levels 1..=4
pub const LEVEL_SIZES: [usize; 4] = [2, 3, 3, 4];

/// Round size for any level outside the table
pub const DEFAULT_LEVEL_SIZE: usize = 2;

/// Default per-channel tolerance for color matching
pub const COLOR_EPSILON: f32 = 0.01;

/// Maximum number of pointers that may carry items at the same time
pub const MAX_POINTERS: usize = 4;

/// Extra letters mixed into a spelling round
pub const DECOY_LETTERS: usize = 3;

/// Words kept from the shuffled word list for one spelling session
pub const WORDS_PER_GAME: usize = 4;

/// Round size for a level using the fixed ladder.
///
/// # Examples
///
/// ```
/// use match_drop_types::level_size;
///
/// assert_eq!(level_size(2), 3);
/// assert_eq!(level_size(3), 3);
/// assert_eq!(level_size(0), 2);
/// ```
pub fn level_size(level: u32) -> usize {
    match level {
        1..=4 => LEVEL_SIZES[(level - 1) as usize],
        _ => DEFAULT_LEVEL_SIZE,
    }
}

/// RGBA color with normalized 0-1 components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 0.92, 0.016);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    /// Fully transparent; the fallback for a missing color asset.
    pub const CLEAR: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Components in R, G, B, A order.
    pub fn channels(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channel-wise comparison with an absolute tolerance.
    ///
    /// # Examples
    ///
    /// ```
    /// use match_drop_types::Color;
    ///
    /// let a = Color::rgb(0.5, 0.5, 0.5);
    /// assert!(a.approx_eq(&Color::rgb(0.505, 0.5, 0.5), 0.01));
    /// assert!(!a.approx_eq(&Color::rgb(0.6, 0.5, 0.5), 0.01));
    /// ```
    pub fn approx_eq(&self, other: &Color, epsilon: f32) -> bool {
        self.channels()
            .iter()
            .zip(other.channels().iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R:{:.2}, G:{:.2}, B:{:.2}, A:{:.2}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// Default palette for the shape-color game (15 colors).
pub const DEFAULT_PALETTE: [Color; 15] = [
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::YELLOW,
    Color::rgb(0.6, 0.3, 0.0),
    Color::rgb(0.5, 0.0, 0.5),
    Color::CYAN,
    Color::MAGENTA,
    Color::GRAY,
    Color::BLACK,
    Color::WHITE,
    Color::rgb(1.0, 0.65, 0.0),
    Color::rgb(0.54, 0.17, 0.89),
    Color::rgb(0.25, 0.88, 0.82),
    Color::rgb(0.98, 0.5, 0.45),
];

/// 2D position in the host's layout space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ZERO: Position = Position::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// String key identifying an item, or a draggable token on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to an audio clip owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueHandle(pub u32);

/// Index of a slot within the active round (0..N-1).
pub type SlotIndex = usize;

/// Identifier of a pointer (mouse = 0, touches 0..MAX_POINTERS).
pub type PointerId = u8;

/// A matchable item: identity plus optional assets.
///
/// Immutable once a round is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue: Option<CueHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            color: None,
            cue: None,
            type_tag: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_cue(mut self, cue: CueHandle) -> Self {
        self.cue = Some(cue);
        self
    }

    pub fn with_type(mut self, type_tag: impl Into<String>) -> Self {
        self.type_tag = Some(type_tag.into());
        self
    }
}

/// What a slot accepts. Which fields are consulted depends on the match rule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Expectation {
    pub identity: Option<ItemId>,
    pub color: Option<Color>,
    pub type_tag: Option<String>,
}

impl Expectation {
    pub fn identity(id: impl Into<ItemId>) -> Self {
        Self {
            identity: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    /// Expectation derived from an item: its identity, color and type.
    pub fn of(item: &Item) -> Self {
        Self {
            identity: Some(item.id.clone()),
            color: item.color,
            type_tag: item.type_tag.clone(),
        }
    }
}

/// Drop target within a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: SlotIndex,
    /// Where a correctly dropped item snaps to.
    pub anchor: Position,
    pub expected: Expectation,
    pub active: bool,
    pub occupant: Option<ItemId>,
}

impl Slot {
    pub fn new(index: SlotIndex, anchor: Position, expected: Expectation) -> Self {
        Self {
            index,
            anchor,
            expected,
            active: true,
            occupant: None,
        }
    }

    /// Active and not yet occupied: a legal drop target.
    pub fn is_open(&self) -> bool {
        self.active && self.occupant.is_none()
    }
}

/// Target of a visibility or color command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Target {
    Item(ItemId),
    Slot(SlotIndex),
    VictoryPanel,
}

/// Layout container an item is attached to (layout hint only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Container {
    Tray,
    Slot(SlotIndex),
}

/// Command emitted by the engine for the rendering/audio collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetPosition { item: ItemId, pos: Position },
    SetActive { target: Target, active: bool },
    SetColor { target: Target, color: Color },
    PlayCue { cue: CueHandle },
    Reparent { item: ItemId, container: Container },
    /// Item is being dragged (host shows reduced opacity, raycast pass-through).
    SetCarried { item: ItemId, carried: bool },
}

fn unit_zoom() -> f32 {
    1.0
}

/// Raw input delivered by the host loop, one at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        #[serde(default)]
        pointer: PointerId,
        item: ItemId,
        pos: Position,
    },
    PointerMove {
        #[serde(default)]
        pointer: PointerId,
        pos: Position,
        /// View zoom factor; pointer displacement is divided by it.
        #[serde(default = "unit_zoom")]
        zoom: f32,
    },
    PointerUp {
        #[serde(default)]
        pointer: PointerId,
        pos: Position,
        /// Slot under the pointer at release, if any.
        #[serde(default)]
        slot: Option<SlotIndex>,
    },
    ItemClicked {
        item: ItemId,
    },
    ReplayClicked,
}

/// Outcome of validating a drop against a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DropEvent {
    Correct { item: ItemId, slot: SlotIndex },
    Incorrect { item: ItemId, slot: SlotIndex },
}

impl DropEvent {
    pub fn item(&self) -> &ItemId {
        match self {
            DropEvent::Correct { item, .. } | DropEvent::Incorrect { item, .. } => item,
        }
    }

    pub fn slot(&self) -> SlotIndex {
        match self {
            DropEvent::Correct { slot, .. } | DropEvent::Incorrect { slot, .. } => *slot,
        }
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, DropEvent::Correct { .. })
    }
}

/// Round lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Loading,
    Playing,
    Completed,
    Victory,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Playing => "playing",
            Phase::Completed => "completed",
            Phase::Victory => "victory",
        }
    }
}

/// What happens after the last level is completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalAction {
    /// Show the victory panel and stop.
    #[default]
    Victory,
    /// Start over at level 1.
    Loop,
}

impl TerminalAction {
    /// Parse from string (case-insensitive): "victory" | "loop"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "victory" => Some(TerminalAction::Victory),
            "loop" => Some(TerminalAction::Loop),
            _ => None,
        }
    }
}
