//! Game configuration
//!
//! A [`GameConfig`] fully describes one game instance: which variant is played,
//! the match rule, the level ladder, the layout anchors supplied by the host, the
//! item catalog and the feedback cues.
//!
//! Sources, lowest priority first:
//! 1. Built-in preset ([`GameConfig::default`] is the animal-sound demo)
//! 2. JSON file ([`GameConfig::load`]); omitted fields keep their defaults
//! 3. Environment variables ([`GameConfig::with_env_overrides`]):
//!    - `MATCH_DROP_SEED`: RNG seed (u32)
//!    - `MATCH_DROP_MAX_LEVEL`: last level of the ladder
//!    - `MATCH_DROP_TERMINAL`: `victory` or `loop`

use std::path::Path;

use match_drop_core::{Error, MatchRule, Result};
use match_drop_types::{
    Color, CueHandle, Item, Position, TerminalAction, CUE_HOLD_MS, DECOY_LETTERS,
    DEFAULT_LEVEL_SIZE, DEFAULT_PALETTE, LEVEL_SIZES, MAX_LEVEL, WORDS_PER_GAME,
};
use serde::{Deserialize, Serialize};

pub const ENV_SEED: &str = "MATCH_DROP_SEED";
pub const ENV_MAX_LEVEL: &str = "MATCH_DROP_MAX_LEVEL";
pub const ENV_TERMINAL: &str = "MATCH_DROP_TERMINAL";

/// Which game of the family is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Variant {
    /// Hear the animals, drag each into the slot of its sound.
    SoundMatch,
    /// Drag each shape onto the slot of its color, optionally among decoys.
    ShapeColor {
        #[serde(default)]
        decoys: bool,
    },
    /// Spell the word from its letters plus a few decoys.
    Spelling,
}

impl Variant {
    /// Match rule used when the config does not name one.
    pub fn default_rule(&self) -> MatchRule {
        match self {
            Variant::SoundMatch | Variant::Spelling => MatchRule::Identity,
            Variant::ShapeColor { .. } => MatchRule::color(),
        }
    }
}

/// Anchor positions supplied by the host layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Slot anchors; slot `i` of a round uses `slots[i]`.
    pub slots: Vec<Position>,
    /// Tray anchors where draggable tokens rest before a round.
    pub tray: Vec<Position>,
}

impl Layout {
    /// `count` anchors in a horizontal row.
    pub fn row(count: usize, origin: Position, spacing: f32) -> Vec<Position> {
        (0..count)
            .map(|i| Position::new(origin.x + spacing * i as f32, origin.y))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: Variant,
    /// Overrides the variant's default rule.
    pub match_rule: Option<MatchRule>,
    pub max_level: u32,
    pub terminal: TerminalAction,
    /// Round size for levels 1.. (index 0 is level 1).
    pub level_sizes: Vec<usize>,
    pub default_level_size: usize,
    pub cue_hold_ms: u32,
    pub palette: Vec<Color>,
    /// Fixed seed; `None` seeds from the clock.
    pub seed: Option<u32>,
    pub layout: Layout,
    pub items: Vec<Item>,
    pub correct_cue: Option<CueHandle>,
    pub incorrect_cue: Option<CueHandle>,
    pub click_cue: Option<CueHandle>,
    pub words: Vec<String>,
    pub words_per_game: usize,
    pub decoy_letters: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::sound_match()
    }
}

impl GameConfig {
    fn base(variant: Variant) -> Self {
        Self {
            variant,
            match_rule: None,
            max_level: MAX_LEVEL,
            terminal: TerminalAction::Victory,
            level_sizes: LEVEL_SIZES.to_vec(),
            default_level_size: DEFAULT_LEVEL_SIZE,
            cue_hold_ms: CUE_HOLD_MS,
            palette: DEFAULT_PALETTE.to_vec(),
            seed: None,
            layout: Layout::default(),
            items: Vec::new(),
            correct_cue: Some(CueHandle(100)),
            incorrect_cue: Some(CueHandle(101)),
            click_cue: None,
            words: Vec::new(),
            words_per_game: WORDS_PER_GAME,
            decoy_letters: DECOY_LETTERS,
        }
    }

    /// Six animals, four slots.
    pub fn sound_match() -> Self {
        let animals = ["cat", "dog", "cow", "pig", "duck", "sheep"];
        let mut config = Self::base(Variant::SoundMatch);
        config.items = animals
            .iter()
            .zip(1u32..)
            .map(|(name, cue)| Item::new(*name).with_cue(CueHandle(cue)))
            .collect();
        config.layout = Layout {
            slots: Layout::row(4, Position::new(100.0, 100.0), 150.0),
            tray: Layout::row(animals.len(), Position::new(50.0, 400.0), 120.0),
        };
        config
    }

    /// Four shapes matched by color, each with a decoy when `decoys` is set.
    pub fn shape_color(decoys: bool) -> Self {
        let shapes = ["circle", "triangle", "hexagon", "square"];
        let mut config = Self::base(Variant::ShapeColor { decoys });
        config.items = shapes
            .iter()
            .map(|name| Item::new(*name).with_type(*name))
            .collect();
        let tray = if decoys { shapes.len() * 2 } else { shapes.len() };
        config.layout = Layout {
            slots: Layout::row(shapes.len(), Position::new(100.0, 100.0), 150.0),
            tray: Layout::row(tray, Position::new(50.0, 400.0), 100.0),
        };
        config
    }

    /// Word spelling with the bundled Estonian word list.
    pub fn spelling() -> Self {
        let words = ["JALGRATAS", "RONG", "BUSS", "AUTO", "LENNUK", "LAEV"];
        let mut config = Self::base(Variant::Spelling);
        config.words = words.iter().map(|w| w.to_string()).collect();
        config.items = words
            .iter()
            .zip(1u32..)
            .map(|(w, cue)| Item::new(*w).with_cue(CueHandle(cue)))
            .collect();
        config.click_cue = Some(CueHandle(102));
        let longest = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);
        config.layout = Layout {
            slots: Layout::row(longest, Position::new(60.0, 100.0), 70.0),
            tray: Layout::row(longest + DECOY_LETTERS, Position::new(40.0, 400.0), 60.0),
        };
        config
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Apply `MATCH_DROP_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    /// Apply overrides from a key lookup (the environment in production).
    ///
    /// Unparseable values are ignored.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = get(ENV_SEED).and_then(|s| s.trim().parse().ok()) {
            self.seed = Some(seed);
        }
        if let Some(max) = get(ENV_MAX_LEVEL).and_then(|s| s.trim().parse().ok()) {
            self.max_level = max;
        }
        if let Some(terminal) = get(ENV_TERMINAL).and_then(|s| TerminalAction::from_str(&s)) {
            self.terminal = terminal;
        }
    }

    pub fn match_rule(&self) -> MatchRule {
        self.match_rule.unwrap_or_else(|| self.variant.default_rule())
    }

    /// Round size for a level from the configured ladder.
    pub fn level_size(&self, level: u32) -> usize {
        level
            .checked_sub(1)
            .and_then(|i| self.level_sizes.get(i as usize))
            .copied()
            .unwrap_or(self.default_level_size)
    }

    /// Largest round size over levels 1..=max_level.
    pub fn max_round_size(&self) -> usize {
        (1..=self.max_level)
            .map(|l| self.level_size(l))
            .max()
            .unwrap_or(0)
    }

    /// Check that every round the ladder will build can be planned: item ids
    /// are unique, the pool covers the largest round, the layout holds it.
    pub fn validate(&self) -> Result<()> {
        if self.max_level == 0 {
            return Err(Error::Config("max_level must be at least 1".to_string()));
        }
        if self.cue_hold_ms == 0 {
            return Err(Error::Config("cue_hold_ms must be positive".to_string()));
        }
        for (i, item) in self.items.iter().enumerate() {
            if self.items[..i].iter().any(|other| other.id == item.id) {
                return Err(Error::Config(format!("duplicate item id {}", item.id)));
            }
        }

        match self.variant {
            Variant::SoundMatch => {
                self.require_sizes()?;
                self.require_pool(self.max_round_size())?;
                self.require_slots(self.max_round_size())?;
                self.require_tray(self.items.len())?;
            }
            Variant::ShapeColor { decoys } => {
                self.require_sizes()?;
                let size = self.max_round_size();
                self.require_pool(size)?;
                self.require_slots(size)?;
                self.require_tray(if decoys { size * 2 } else { size })?;
                let needed = if decoys { 2 } else { 1 };
                let mut distinct: Vec<Color> = Vec::with_capacity(self.palette.len());
                for &color in &self.palette {
                    if !distinct.contains(&color) {
                        distinct.push(color);
                    }
                }
                if distinct.len() < needed {
                    return Err(Error::EmptyPalette {
                        required: needed,
                        available: distinct.len(),
                    });
                }
            }
            Variant::Spelling => {
                if self.words.iter().all(|w| w.trim().is_empty()) {
                    return Err(Error::Config("spelling needs at least one word".to_string()));
                }
                if self.words_per_game == 0 {
                    return Err(Error::Config("words_per_game must be at least 1".to_string()));
                }
                let longest = self
                    .words
                    .iter()
                    .map(|w| w.trim().chars().count())
                    .max()
                    .unwrap_or(0);
                self.require_slots(longest)?;
                self.require_tray(longest + self.decoy_letters)?;
            }
        }
        Ok(())
    }

    fn require_sizes(&self) -> Result<()> {
        if self.default_level_size == 0 || self.level_sizes.iter().any(|&s| s == 0) {
            return Err(Error::Config("level sizes must be at least 1".to_string()));
        }
        Ok(())
    }

    fn require_pool(&self, needed: usize) -> Result<()> {
        if self.items.len() < needed {
            return Err(Error::InsufficientPool {
                requested: needed,
                available: self.items.len(),
            });
        }
        Ok(())
    }

    fn require_slots(&self, needed: usize) -> Result<()> {
        if self.layout.slots.len() < needed {
            return Err(Error::Config(format!(
                "layout has {} slot anchors, rounds need {}",
                self.layout.slots.len(),
                needed
            )));
        }
        Ok(())
    }

    fn require_tray(&self, needed: usize) -> Result<()> {
        if self.layout.tray.len() < needed {
            return Err(Error::Config(format!(
                "layout has {} tray anchors, rounds need {}",
                self.layout.tray.len(),
                needed
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_presets_validate() {
        GameConfig::sound_match().validate().unwrap();
        GameConfig::shape_color(false).validate().unwrap();
        GameConfig::shape_color(true).validate().unwrap();
        GameConfig::spelling().validate().unwrap();
    }

    #[test]
    fn test_level_size_ladder() {
        let config = GameConfig::default();
        assert_eq!(config.level_size(0), 2);
        assert_eq!(config.level_size(1), 2);
        assert_eq!(config.level_size(2), 3);
        assert_eq!(config.level_size(3), 3);
        assert_eq!(config.level_size(4), 4);
        assert_eq!(config.level_size(5), 2);
        assert_eq!(config.max_round_size(), 4);
    }

    #[test]
    fn test_json_defaults_fill_missing_fields() {
        let config = GameConfig::from_json_str(
            r#"{
                "variant": {"kind": "sound_match"},
                "terminal": "loop",
                "seed": 42
            }"#,
        )
        .unwrap();
        assert_eq!(config.terminal, TerminalAction::Loop);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.max_level, MAX_LEVEL);
        assert_eq!(config.items.len(), 6);
        assert_eq!(config.match_rule(), MatchRule::Identity);
    }

    #[test]
    fn test_json_match_rule_override() {
        let json = serde_json::to_string(&GameConfig {
            match_rule: Some(MatchRule::compound()),
            ..GameConfig::shape_color(true)
        })
        .unwrap();
        let config = GameConfig::from_json_str(&json).unwrap();
        assert_eq!(config.match_rule(), MatchRule::compound());
        assert_eq!(config.variant, Variant::ShapeColor { decoys: true });
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(
            GameConfig::from_json_str("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_small_layout() {
        let mut config = GameConfig::sound_match();
        config.layout.slots.truncate(3);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = GameConfig::shape_color(true);
        config.layout.tray.truncate(7);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = GameConfig::shape_color(true);
        config.palette = vec![Color::RED];
        assert!(matches!(config.validate(), Err(Error::EmptyPalette { .. })));

        let mut config = GameConfig::spelling();
        config.words.clear();
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = GameConfig::sound_match();
        config.max_level = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_pool_smaller_than_largest_round() {
        let mut config = GameConfig::sound_match();
        config.items.truncate(3);
        assert!(matches!(
            config.validate(),
            Err(Error::InsufficientPool {
                requested: 4,
                available: 3
            })
        ));
        config.max_level = 3;
        config.validate().unwrap();

        let mut config = GameConfig::shape_color(false);
        config.items.pop();
        assert!(matches!(config.validate(), Err(Error::InsufficientPool { .. })));
    }

    #[test]
    fn test_validate_rejects_duplicate_item_ids() {
        let mut config = GameConfig::sound_match();
        let twin = config.items[0].clone().with_cue(CueHandle(77));
        config.items[5] = twin;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_counts_distinct_palette_colors() {
        let mut config = GameConfig::shape_color(true);
        config.palette = vec![Color::RED, Color::RED];
        assert!(matches!(
            config.validate(),
            Err(Error::EmptyPalette {
                required: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_SEED, "77"),
            (ENV_MAX_LEVEL, "2"),
            (ENV_TERMINAL, "loop"),
        ]
        .into_iter()
        .collect();

        let mut config = GameConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.seed, Some(77));
        assert_eq!(config.max_level, 2);
        assert_eq!(config.terminal, TerminalAction::Loop);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = GameConfig::default();
        config.apply_overrides(|k| match k {
            ENV_SEED => Some("not-a-number".to_string()),
            ENV_TERMINAL => Some("sometimes".to_string()),
            _ => None,
        });
        assert_eq!(config.seed, None);
        assert_eq!(config.terminal, TerminalAction::Victory);
    }
}
