//! Round planning
//!
//! A [`RoundPlan`] is everything a level load needs, computed up front so that a
//! planning failure (pool too small, empty palette, broken layout) leaves the
//! running round untouched.

use match_drop_core::{word, AssignmentEngine, AssignmentTable, Error, Result, Token, Warning};
use match_drop_types::{Color, CueHandle, Expectation, Item, ItemId, Position, Slot};
use tracing::warn;

use crate::catalog::AssetCatalog;
use crate::config::{GameConfig, Variant};

/// Token-key suffix of a shape decoy.
pub const DECOY_SUFFIX: &str = "~decoy";

#[derive(Debug, Clone, PartialEq)]
pub struct RoundPlan {
    pub level: u32,
    /// Participating items in slot order.
    pub items: Vec<Item>,
    pub slots: Vec<Slot>,
    pub tokens: Vec<Token>,
    /// Slot index -> color, decoy and token home for this round.
    pub table: AssignmentTable,
    /// Intro cue list in slot order (missing cues skipped).
    pub cues: Vec<CueHandle>,
    pub warnings: Vec<Warning>,
}

impl RoundPlan {
    pub fn size(&self) -> usize {
        self.items.len()
    }
}

/// Plan `level` for the configured variant.
///
/// `word` is the session word for the level; only the spelling variant reads it.
pub fn plan_round<C: AssetCatalog + ?Sized>(
    config: &GameConfig,
    catalog: &C,
    engine: &mut AssignmentEngine,
    level: u32,
    word: Option<&str>,
) -> Result<RoundPlan> {
    match config.variant {
        Variant::SoundMatch => plan_sound(config, catalog, engine, level),
        Variant::ShapeColor { decoys } => plan_shape(config, catalog, engine, level, decoys),
        Variant::Spelling => {
            let word = word.ok_or_else(|| Error::MissingAsset(format!("word for level {}", level)))?;
            plan_spelling(config, catalog, engine, level, word)
        }
    }
}

/// Slot `i` expects the `i`-th selected animal; every catalog animal is a token
/// resting at its own tray anchor.
fn plan_sound<C: AssetCatalog + ?Sized>(
    config: &GameConfig,
    catalog: &C,
    engine: &mut AssignmentEngine,
    level: u32,
) -> Result<RoundPlan> {
    let size = config.level_size(level);
    let items = engine.select_round_items(catalog.items(), size)?;
    let slots = build_slots(config, &items)?;

    let tokens = catalog
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let home = anchor(&config.layout.tray, i, "tray")?;
            Ok(Token::new(item.id.clone(), item.clone(), home))
        })
        .collect::<Result<Vec<Token>>>()?;
    let homes: Vec<Position> = items
        .iter()
        .filter_map(|item| tokens.iter().find(|t| t.key == item.id).map(|t| t.home))
        .collect();
    let table = AssignmentTable::from_positions(&homes);

    let mut warnings = Vec::new();
    let mut cues = Vec::with_capacity(items.len());
    for item in &items {
        match item.cue {
            Some(cue) => cues.push(cue),
            None => {
                warn!(item = %item.id, "item has no cue; skipped in intro");
                warnings.push(Warning::MissingAsset(format!("cue for {}", item.id)));
            }
        }
    }

    Ok(RoundPlan {
        level,
        items,
        slots,
        tokens,
        table,
        cues,
        warnings,
    })
}

/// Selected shapes take their slot's primary color; decoys are the same shape in
/// another palette color. Token homes are the tray anchors, shuffled.
fn plan_shape<C: AssetCatalog + ?Sized>(
    config: &GameConfig,
    catalog: &C,
    engine: &mut AssignmentEngine,
    level: u32,
    decoys: bool,
) -> Result<RoundPlan> {
    let size = config.level_size(level);
    let selected = engine.select_round_items(catalog.items(), size)?;

    let anchors = tray_anchors(config, if decoys { size * 2 } else { size })?;
    let table = engine.build_table(size, &config.palette, decoys, anchors)?;

    let mut items = Vec::with_capacity(size);
    let mut tokens = Vec::with_capacity(anchors.len());
    let mut decoy_tokens = Vec::new();
    for (item, entry) in selected.into_iter().zip(table.entries.iter()) {
        let item = colored(item, entry.color);
        let home = entry.position.unwrap_or(Position::ZERO);
        tokens.push(Token::new(item.id.clone(), item.clone(), home));
        if decoys {
            let key = ItemId::new(format!("{}{}", item.id, DECOY_SUFFIX));
            let home = entry.decoy_position.unwrap_or(Position::ZERO);
            decoy_tokens.push(Token::new(key, colored(item.clone(), entry.decoy), home));
        }
        items.push(item);
    }
    tokens.extend(decoy_tokens);
    let slots = build_slots(config, &items)?;

    let cues = items.iter().filter_map(|item| item.cue).collect();
    let warnings = table.warnings.clone();

    Ok(RoundPlan {
        level,
        items,
        slots,
        tokens,
        table,
        cues,
        warnings,
    })
}

fn colored(item: Item, color: Option<Color>) -> Item {
    match color {
        Some(color) => item.with_color(color),
        None => item,
    }
}

/// Slot `i` expects letter `i` of the word; letters and decoy letters are tokens
/// `letter-<n>` in shuffled tray positions.
fn plan_spelling<C: AssetCatalog + ?Sized>(
    config: &GameConfig,
    catalog: &C,
    engine: &mut AssignmentEngine,
    level: u32,
    word: &str,
) -> Result<RoundPlan> {
    let word = word.trim().to_uppercase();
    let items: Vec<Item> = word.chars().map(|c| Item::new(c.to_string())).collect();
    if items.is_empty() {
        return Err(Error::Config(format!("level {} has an empty word", level)));
    }
    let slots = build_slots(config, &items)?;

    let decoys = word::decoy_letters(engine, &word, config.decoy_letters)?;
    let letters: Vec<Item> = items
        .iter()
        .cloned()
        .chain(decoys.iter().map(|c| Item::new(c.to_string())))
        .collect();

    let homes = engine.assign_positions(tray_anchors(config, letters.len())?);
    let table = AssignmentTable::from_positions(&homes[..items.len()]);
    let tokens = letters
        .into_iter()
        .zip(homes)
        .enumerate()
        .map(|(n, (item, home))| Token::new(format!("letter-{}", n), item, home))
        .collect();

    let mut warnings = Vec::new();
    let cue = catalog
        .items()
        .iter()
        .find(|item| item.id.as_str().eq_ignore_ascii_case(&word))
        .and_then(|item| item.cue);
    if cue.is_none() {
        warn!(word = %word, "word has no cue; intro skipped");
        warnings.push(Warning::MissingAsset(format!("cue for {}", word)));
    }

    Ok(RoundPlan {
        level,
        items,
        slots,
        tokens,
        table,
        cues: cue.into_iter().collect(),
        warnings,
    })
}

fn build_slots(config: &GameConfig, items: &[Item]) -> Result<Vec<Slot>> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let at = anchor(&config.layout.slots, i, "slot")?;
            Ok(Slot::new(i, at, Expectation::of(item)))
        })
        .collect()
}

fn tray_anchors(config: &GameConfig, count: usize) -> Result<&[Position]> {
    config.layout.tray.get(..count).ok_or_else(|| {
        Error::Config(format!(
            "round needs {} tray anchors, layout has {}",
            count,
            config.layout.tray.len()
        ))
    })
}

fn anchor(anchors: &[Position], index: usize, kind: &str) -> Result<Position> {
    anchors.get(index).copied().ok_or_else(|| {
        Error::Config(format!(
            "no {} anchor {} (layout has {})",
            kind,
            index,
            anchors.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use match_drop_core::{MatchPolicy, MatchRule};

    fn setup(config: &GameConfig) -> (Catalog, AssignmentEngine) {
        (Catalog::new(config.items.clone()), AssignmentEngine::with_seed(9))
    }

    #[test]
    fn test_sound_plan() {
        let config = GameConfig::sound_match();
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 2, None).unwrap();

        assert_eq!(plan.size(), 3);
        assert_eq!(plan.slots.len(), 3);
        assert_eq!(plan.tokens.len(), 6);
        assert_eq!(plan.cues.len(), 3);
        for (slot, item) in plan.slots.iter().zip(plan.items.iter()) {
            assert_eq!(slot.expected.identity.as_ref(), Some(&item.id));
            assert_eq!(slot.anchor, config.layout.slots[slot.index]);
        }
        for (i, token) in plan.tokens.iter().enumerate() {
            assert_eq!(token.key, config.items[i].id);
            assert_eq!(token.home, config.layout.tray[i]);
        }
        assert_eq!(
            plan.cues,
            plan.items.iter().filter_map(|i| i.cue).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sound_plan_skips_missing_cue() {
        let mut config = GameConfig::sound_match();
        config.items = vec![Item::new("cat"), Item::new("dog")];
        config.layout.tray.truncate(2);
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 1, None).unwrap();
        assert!(plan.cues.is_empty());
        assert_eq!(plan.warnings.len(), 2);
    }

    #[test]
    fn test_sound_plan_pool_too_small() {
        let mut config = GameConfig::sound_match();
        config.items.truncate(3);
        let (catalog, mut engine) = setup(&config);
        let err = plan_round(&config, &catalog, &mut engine, 4, None).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientPool {
                requested: 4,
                available: 3
            }
        ));
    }

    #[test]
    fn test_shape_plan_with_decoys() {
        let config = GameConfig::shape_color(true);
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 4, None).unwrap();

        assert_eq!(plan.size(), 4);
        assert_eq!(plan.tokens.len(), 8);
        let rule = MatchRule::compound();
        for slot in &plan.slots {
            let id = slot.expected.identity.clone().unwrap();
            let original = plan.tokens.iter().find(|t| t.key == id).unwrap();
            let decoy = plan
                .tokens
                .iter()
                .find(|t| t.key.as_str() == format!("{}{}", id, DECOY_SUFFIX))
                .unwrap();
            assert!(rule.is_match(&original.item, slot));
            assert!(!rule.is_match(&decoy.item, slot));
            assert_ne!(original.item.color, decoy.item.color);
        }

        let mut homes: Vec<Position> = plan.tokens.iter().map(|t| t.home).collect();
        homes.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(homes, config.layout.tray);
    }

    #[test]
    fn test_table_drives_shape_tokens() {
        let config = GameConfig::shape_color(true);
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 3, None).unwrap();

        assert_eq!(plan.table.len(), plan.size());
        for (slot, entry) in plan.slots.iter().zip(plan.table.entries.iter()) {
            let id = slot.expected.identity.clone().unwrap();
            let decoy_key = format!("{}{}", id, DECOY_SUFFIX);
            let token = plan.tokens.iter().find(|t| t.key == id).unwrap();
            let decoy = plan.tokens.iter().find(|t| t.key.as_str() == decoy_key).unwrap();

            assert_eq!(slot.expected.color, entry.color);
            assert_eq!(Some(token.home), entry.position);
            assert_eq!(decoy.item.color, entry.decoy);
            assert_eq!(Some(decoy.home), entry.decoy_position);
        }
    }

    #[test]
    fn test_table_homes_for_sound_and_spelling() {
        let config = GameConfig::sound_match();
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 4, None).unwrap();
        for (item, entry) in plan.items.iter().zip(plan.table.entries.iter()) {
            let token = plan.tokens.iter().find(|t| t.key == item.id).unwrap();
            assert_eq!(entry.position, Some(token.home));
            assert!(entry.color.is_none());
        }

        let config = GameConfig::spelling();
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 1, Some("AUTO")).unwrap();
        assert_eq!(plan.table.len(), 4);
        for (n, entry) in plan.table.entries.iter().enumerate() {
            assert_eq!(entry.position, Some(plan.tokens[n].home));
            assert_eq!(plan.tokens[n].item.id, plan.items[n].id);
        }
    }

    #[test]
    fn test_shape_plan_primary_colors_distinct() {
        let config = GameConfig::shape_color(false);
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 4, None).unwrap();
        assert_eq!(plan.tokens.len(), 4);
        let colors: Vec<_> = plan.slots.iter().map(|s| s.expected.color.unwrap()).collect();
        for (i, c) in colors.iter().enumerate() {
            assert!(!colors[i + 1..].contains(c));
        }
    }

    #[test]
    fn test_spelling_plan() {
        let config = GameConfig::spelling();
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 1, Some("buss")).unwrap();

        let letters: Vec<&str> = plan.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(letters, vec!["B", "U", "S", "S"]);
        assert_eq!(plan.tokens.len(), 4 + config.decoy_letters);
        assert!(plan.tokens.iter().all(|t| t.key.as_str().starts_with("letter-")));
        assert_eq!(plan.cues.len(), 1);

        let decoys: Vec<&str> = plan.tokens[4..].iter().map(|t| t.item.id.as_str()).collect();
        for d in decoys {
            assert!(!"BUSS".contains(d));
        }
    }

    #[test]
    fn test_spelling_plan_without_word_cue() {
        let config = GameConfig::spelling();
        let (catalog, mut engine) = setup(&config);
        let plan = plan_round(&config, &catalog, &mut engine, 1, Some("KASS")).unwrap();
        assert!(plan.cues.is_empty());
        assert_eq!(plan.warnings, vec![Warning::MissingAsset("cue for KASS".to_string())]);
    }

    #[test]
    fn test_spelling_plan_word_too_long_for_layout() {
        let config = GameConfig::spelling();
        let (catalog, mut engine) = setup(&config);
        let err = plan_round(&config, &catalog, &mut engine, 1, Some("RAUDTEEJAAMAD")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
