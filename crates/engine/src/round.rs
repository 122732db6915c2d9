//! Round lifecycle controller
//!
//! `Loading -> Playing -> Completed -> (Loading next | Victory)`.
//!
//! The controller owns the active [`Round`] and is the only writer of its slots;
//! the drag machine borrows the board for the duration of one input. All output
//! goes to the caller's command buffer.

use match_drop_core::{
    word, AssignmentEngine, AssignmentTable, Board, DragMachine, Error, MatchPolicy, MatchRule, PlaybackScheduler,
    Result, SimpleRng, Warning,
};
use match_drop_types::{
    Command, Container, CueHandle, DropEvent, InputEvent, Item, Phase, Target, TerminalAction,
};
use tracing::{debug, error, info, warn};

use crate::catalog::{AssetCatalog, Catalog};
use crate::config::{GameConfig, Variant};
use crate::plan::{plan_round, RoundPlan};
use crate::snapshot::{RoundSnapshot, SlotSnapshot};

/// One level's worth of play state.
#[derive(Debug, Clone)]
pub struct Round {
    pub level: u32,
    /// Session-wide round counter.
    pub epoch: u64,
    /// Participating items in slot order.
    pub items: Vec<Item>,
    pub board: Board,
    /// Colors and token homes assigned at load.
    pub table: AssignmentTable,
    pub cues: Vec<CueHandle>,
    pub matched: usize,
    pub completed: bool,
    pub warnings: Vec<Warning>,
}

impl Round {
    fn from_plan(plan: RoundPlan, epoch: u64) -> Self {
        Self {
            level: plan.level,
            epoch,
            items: plan.items,
            board: Board::new(plan.slots, plan.tokens),
            table: plan.table,
            cues: plan.cues,
            matched: 0,
            completed: false,
            warnings: plan.warnings,
        }
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }
}

pub struct RoundController<V: MatchPolicy = MatchRule, C: AssetCatalog = Catalog> {
    config: GameConfig,
    catalog: C,
    engine: AssignmentEngine,
    validator: V,
    scheduler: PlaybackScheduler,
    drags: DragMachine,
    phase: Phase,
    round: Option<Round>,
    epoch: u64,
    seed: u32,
    /// Spelling session words; level k spells `words[k - 1]`.
    words: Vec<String>,
    max_level: u32,
}

impl RoundController {
    /// Wire the default collaborators from a config.
    ///
    /// Without a configured seed the RNG is seeded from the clock.
    pub fn from_config(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_time(),
        };
        let catalog = Catalog::new(config.items.clone());
        let validator = config.match_rule();
        let scheduler = PlaybackScheduler::new(config.cue_hold_ms);
        Self::new(
            config,
            catalog,
            AssignmentEngine::new(rng),
            validator,
            scheduler,
        )
    }
}

impl<V: MatchPolicy, C: AssetCatalog> RoundController<V, C> {
    pub fn new(
        config: GameConfig,
        catalog: C,
        mut engine: AssignmentEngine,
        validator: V,
        scheduler: PlaybackScheduler,
    ) -> Self {
        let seed = engine.rng_mut().seed();
        let words = session_words(&config, &mut engine);
        let max_level = session_max_level(&config, &words);
        Self {
            config,
            catalog,
            engine,
            validator,
            scheduler,
            drags: DragMachine::new(),
            phase: Phase::Loading,
            round: None,
            epoch: 0,
            seed,
            words,
            max_level,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn level(&self) -> u32 {
        self.round.as_ref().map_or(0, |r| r.level)
    }

    pub fn matched(&self) -> usize {
        self.round.as_ref().map_or(0, |r| r.matched)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Spelling words kept for this session (empty for other variants).
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    pub fn drags(&self) -> &DragMachine {
        &self.drags
    }

    /// Hide the victory panel and load level 1.
    pub fn initialize(&mut self, out: &mut Vec<Command>) -> Result<()> {
        out.push(Command::SetActive {
            target: Target::VictoryPanel,
            active: false,
        });
        self.load_level(1, out)
    }

    /// Build and start `level`.
    ///
    /// Rejected after victory (`GameFinished`) and for levels outside
    /// `1..=max_level`. On error nothing has changed.
    pub fn load_level(&mut self, level: u32, out: &mut Vec<Command>) -> Result<()> {
        if self.phase == Phase::Victory {
            return Err(Error::GameFinished);
        }
        self.load(level, out)
    }

    fn load(&mut self, level: u32, out: &mut Vec<Command>) -> Result<()> {
        if level == 0 || level > self.max_level {
            return Err(Error::LevelOutOfRange {
                level,
                max: self.max_level,
            });
        }

        let word = self.words.get(level as usize - 1).map(String::as_str);
        let plan = plan_round(&self.config, &self.catalog, &mut self.engine, level, word)?;

        self.phase = Phase::Loading;
        self.epoch += 1;
        self.drags.cancel_all();

        if let Some(previous) = self.round.take() {
            for token in previous.board.tokens() {
                if !plan.tokens.iter().any(|t| t.key == token.key) {
                    out.push(Command::SetActive {
                        target: Target::Item(token.key.clone()),
                        active: false,
                    });
                }
            }
        }

        let size = plan.size();
        let anchors = self.config.layout.slots.len().max(size);
        for i in 0..anchors {
            out.push(Command::SetActive {
                target: Target::Slot(i),
                active: i < size,
            });
        }
        for (index, entry) in plan.table.entries.iter().enumerate() {
            if let Some(color) = entry.color {
                out.push(Command::SetColor {
                    target: Target::Slot(index),
                    color,
                });
            }
        }
        for token in &plan.tokens {
            if let Some(color) = token.item.color {
                out.push(Command::SetColor {
                    target: Target::Item(token.key.clone()),
                    color,
                });
            }
            out.push(Command::Reparent {
                item: token.key.clone(),
                container: Container::Tray,
            });
            out.push(Command::SetPosition {
                item: token.key.clone(),
                pos: token.home,
            });
            out.push(Command::SetActive {
                target: Target::Item(token.key.clone()),
                active: true,
            });
        }

        let round = Round::from_plan(plan, self.epoch);
        self.scheduler.load(round.cues.clone());
        self.scheduler.start(round.cues.clone(), out);

        info!(
            level,
            size,
            epoch = self.epoch,
            warnings = round.warnings.len(),
            "level loaded"
        );
        self.round = Some(round);
        self.phase = Phase::Playing;
        Ok(())
    }

    /// Dispatch one host input event.
    ///
    /// Only a level load triggered by a completed round can fail here.
    pub fn on_input(&mut self, event: InputEvent, out: &mut Vec<Command>) -> Result<()> {
        match event {
            InputEvent::PointerDown { pointer, item, pos } => {
                if self.phase != Phase::Playing {
                    debug!(phase = self.phase.as_str(), "pointer down ignored");
                    return Ok(());
                }
                let Some(round) = self.round.as_mut() else {
                    return Ok(());
                };
                if let Err(reason) = self
                    .drags
                    .begin_drag(pointer, &item, pos, &mut round.board, out)
                {
                    debug!(pointer, item = %item, reason = reason.as_str(), "drag rejected");
                }
                Ok(())
            }
            InputEvent::PointerMove { pointer, pos, zoom } => {
                if let Some(round) = self.round.as_mut() {
                    // moves without a drag are routine
                    let _ = self.drags.drag(pointer, pos, zoom, &mut round.board, out);
                }
                Ok(())
            }
            InputEvent::PointerUp { pointer, slot, .. } => {
                let Some(round) = self.round.as_mut() else {
                    return Ok(());
                };
                let outcome = match self.drags.end_drag(
                    pointer,
                    slot,
                    &self.validator,
                    &mut round.board,
                    out,
                ) {
                    Ok(outcome) => outcome,
                    Err(reason) => {
                        debug!(pointer, reason = reason.as_str(), "release ignored");
                        return Ok(());
                    }
                };
                match outcome.event() {
                    Some(event) => self.on_drop_result(event.clone(), out),
                    None => Ok(()),
                }
            }
            InputEvent::ItemClicked { item } => {
                if let Some(cue) = self.config.click_cue {
                    debug!(item = %item, "item clicked");
                    out.push(Command::PlayCue { cue });
                }
                Ok(())
            }
            InputEvent::ReplayClicked => {
                self.replay_sounds(out);
                Ok(())
            }
        }
    }

    /// Apply a drop result to the round's progress.
    pub fn on_drop_result(&mut self, event: DropEvent, out: &mut Vec<Command>) -> Result<()> {
        if self.phase != Phase::Playing {
            debug!(phase = self.phase.as_str(), "drop result outside play ignored");
            return Ok(());
        }
        let Some(round) = self.round.as_mut() else {
            return Ok(());
        };
        let size = round.size();
        if event.slot() >= size {
            let err = Error::OutOfRangeSlot {
                index: event.slot(),
                len: size,
            };
            warn!(item = %event.item(), "{}", err);
            return Ok(());
        }

        match event {
            DropEvent::Correct { item, slot } => {
                round.matched += 1;
                debug!(item = %item, slot, matched = round.matched, size, "correct drop");
                if let Some(cue) = self.config.correct_cue {
                    out.push(Command::PlayCue { cue });
                }
                if round.matched >= size {
                    return self.complete_round(out);
                }
            }
            DropEvent::Incorrect { item, slot } => {
                debug!(item = %item, slot, "incorrect drop");
                if let Some(cue) = self.config.incorrect_cue {
                    out.push(Command::PlayCue { cue });
                }
            }
        }
        Ok(())
    }

    fn complete_round(&mut self, out: &mut Vec<Command>) -> Result<()> {
        let Some(round) = self.round.as_mut() else {
            return Ok(());
        };
        round.completed = true;
        self.phase = Phase::Completed;

        let level = round.level;
        if self.config.variant == Variant::Spelling {
            let formed: String = round
                .board
                .occupant_identities()
                .iter()
                .map(|id| id.as_str())
                .collect();
            info!(level, word = %formed, "word formed");
        }
        info!(level, epoch = round.epoch, "round completed");

        round.board.restore_homes(out);
        self.scheduler.abandon();

        if level < self.max_level {
            return self.load(level + 1, out);
        }

        match self.config.terminal {
            TerminalAction::Victory => {
                self.drags.cancel_all();
                self.phase = Phase::Victory;
                out.push(Command::SetActive {
                    target: Target::VictoryPanel,
                    active: true,
                });
                info!(levels = self.max_level, "victory");
                Ok(())
            }
            TerminalAction::Loop => {
                info!(levels = self.max_level, "ladder finished; starting over");
                self.start_over(out)
            }
        }
    }

    /// Back to level 1 from any phase, with fresh spelling words.
    pub fn restart(&mut self, out: &mut Vec<Command>) -> Result<()> {
        self.start_over(out)?;
        out.push(Command::SetActive {
            target: Target::VictoryPanel,
            active: false,
        });
        info!(epoch = self.epoch, "session restarted");
        Ok(())
    }

    fn start_over(&mut self, out: &mut Vec<Command>) -> Result<()> {
        let words = session_words(&self.config, &mut self.engine);
        let max_level = session_max_level(&self.config, &words);
        let previous_words = std::mem::replace(&mut self.words, words);
        let previous_max = std::mem::replace(&mut self.max_level, max_level);

        if let Err(e) = self.load(1, out) {
            error!(error = %e, "failed to start over");
            self.words = previous_words;
            self.max_level = previous_max;
            return Err(e);
        }
        Ok(())
    }

    /// Replay the latest round's intro cues, in any phase. Ignored while a run
    /// is in flight.
    pub fn replay_sounds(&mut self, out: &mut Vec<Command>) -> bool {
        self.scheduler.replay(out)
    }

    /// Advance time-driven work (intro playback).
    pub fn tick(&mut self, elapsed_ms: u32, out: &mut Vec<Command>) {
        self.scheduler.tick(elapsed_ms, out);
    }

    pub fn snapshot_into(&self, snap: &mut RoundSnapshot) {
        snap.clear();
        snap.phase = self.phase;
        snap.max_level = self.max_level;
        snap.epoch = self.epoch;
        snap.seed = self.seed;
        snap.playback_running = self.scheduler.is_running();
        snap.dragging
            .extend(self.drags.sessions().iter().map(|s| s.item.clone()));

        if let Some(round) = &self.round {
            snap.level = round.level;
            snap.size = round.size();
            snap.matched = round.matched;
            snap.completed = round.completed;
            snap.slots.extend(round.board.slots().iter().map(|s| SlotSnapshot {
                index: s.index,
                active: s.active,
                expected: s.expected.identity.clone(),
                occupant: s.occupant.clone(),
            }));
        }
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let mut snap = RoundSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }
}

fn session_words(config: &GameConfig, engine: &mut AssignmentEngine) -> Vec<String> {
    match config.variant {
        Variant::Spelling => word::pick_words(engine, &config.words, config.words_per_game),
        _ => Vec::new(),
    }
}

/// The spelling ladder ends with the session's last word.
fn session_max_level(config: &GameConfig, words: &[String]) -> u32 {
    match config.variant {
        Variant::Spelling => config.max_level.min(words.len() as u32),
        _ => config.max_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use match_drop_types::{ItemId, Position};

    fn controller() -> RoundController {
        RoundController::from_config(GameConfig {
            seed: Some(5),
            ..GameConfig::sound_match()
        })
    }

    fn drop_on_slot(c: &mut RoundController, key: &ItemId, slot: usize, out: &mut Vec<Command>) {
        c.on_input(
            InputEvent::PointerDown {
                pointer: 0,
                item: key.clone(),
                pos: Position::ZERO,
            },
            out,
        )
        .unwrap();
        c.on_input(
            InputEvent::PointerUp {
                pointer: 0,
                pos: Position::ZERO,
                slot: Some(slot),
            },
            out,
        )
        .unwrap();
    }

    fn expected(c: &RoundController) -> Vec<ItemId> {
        c.round()
            .unwrap()
            .items
            .iter()
            .map(|i| i.id.clone())
            .collect()
    }

    #[test]
    fn test_initialize_loads_level_one() {
        let mut c = controller();
        let mut out = Vec::new();
        c.initialize(&mut out).unwrap();

        assert_eq!(c.phase(), Phase::Playing);
        assert_eq!(c.level(), 1);
        assert_eq!(c.round().unwrap().size(), 2);
        assert_eq!(
            out[0],
            Command::SetActive {
                target: Target::VictoryPanel,
                active: false
            }
        );
        let active_slots = out
            .iter()
            .filter(|cmd| {
                matches!(cmd, Command::SetActive { target: Target::Slot(_), active: true })
            })
            .count();
        assert_eq!(active_slots, 2);
        assert!(c.scheduler().is_running());
        assert!(matches!(out.last(), Some(Command::PlayCue { .. })));
    }

    #[test]
    fn test_correct_drops_complete_round() {
        let mut c = controller();
        let mut out = Vec::new();
        c.initialize(&mut out).unwrap();

        let ids = expected(&c);
        drop_on_slot(&mut c, &ids[0], 0, &mut out);
        assert_eq!(c.matched(), 1);
        assert_eq!(c.phase(), Phase::Playing);

        out.clear();
        drop_on_slot(&mut c, &ids[1], 1, &mut out);
        assert_eq!(c.level(), 2);
        assert_eq!(c.matched(), 0);
        assert!(out.contains(&Command::PlayCue {
            cue: CueHandle(100)
        }));
        assert!(out.contains(&Command::Reparent {
            item: ids[0].clone(),
            container: Container::Tray
        }));
    }

    #[test]
    fn test_incorrect_drop_keeps_playing() {
        let mut c = controller();
        let mut out = Vec::new();
        c.initialize(&mut out).unwrap();

        let ids = expected(&c);
        let outsider = c
            .round()
            .unwrap()
            .board
            .tokens()
            .iter()
            .map(|t| t.key.clone())
            .find(|k| !ids.contains(k))
            .unwrap();

        drop_on_slot(&mut c, &ids[0], 0, &mut out);
        drop_on_slot(&mut c, &outsider, 1, &mut out);
        assert_eq!(c.matched(), 1);
        assert_eq!(c.phase(), Phase::Playing);
        assert!(c.round().unwrap().board.slot(1).unwrap().occupant.is_none());
    }

    #[test]
    fn test_wrong_item_plays_incorrect_cue() {
        let mut c = controller();
        let mut out = Vec::new();
        c.initialize(&mut out).unwrap();

        let ids = expected(&c);
        out.clear();
        drop_on_slot(&mut c, &ids[1], 0, &mut out);
        assert_eq!(c.matched(), 0);
        assert!(out.contains(&Command::PlayCue {
            cue: CueHandle(101)
        }));
    }

    #[test]
    fn test_out_of_range_drop_result_ignored() {
        let mut c = controller();
        let mut out = Vec::new();
        c.initialize(&mut out).unwrap();
        c.on_drop_result(
            DropEvent::Correct {
                item: ItemId::from("cat"),
                slot: 7,
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(c.matched(), 0);
    }

    #[test]
    fn test_level_out_of_range() {
        let mut c = controller();
        let mut out = Vec::new();
        assert!(matches!(
            c.load_level(0, &mut out),
            Err(Error::LevelOutOfRange { level: 0, max: 4 })
        ));
        assert!(matches!(
            c.load_level(5, &mut out),
            Err(Error::LevelOutOfRange { level: 5, .. })
        ));
        assert!(c.round().is_none());
    }

    #[test]
    fn test_failed_load_leaves_round_intact() {
        let mut config = GameConfig::sound_match();
        config.seed = Some(3);
        config.items.truncate(3);
        config.layout.tray.truncate(3);
        let mut c = RoundController::from_config(config);
        let mut out = Vec::new();
        c.initialize(&mut out).unwrap();
        let epoch = c.epoch();

        out.clear();
        assert!(matches!(
            c.load_level(4, &mut out),
            Err(Error::InsufficientPool { .. })
        ));
        assert!(out.is_empty());
        assert_eq!(c.level(), 1);
        assert_eq!(c.epoch(), epoch);
        assert_eq!(c.phase(), Phase::Playing);
    }

    #[test]
    fn test_click_plays_click_cue() {
        let mut c = RoundController::from_config(GameConfig {
            seed: Some(1),
            ..GameConfig::spelling()
        });
        let mut out = Vec::new();
        c.initialize(&mut out).unwrap();
        out.clear();
        c.on_input(
            InputEvent::ItemClicked {
                item: ItemId::from("letter-0"),
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(out, vec![Command::PlayCue { cue: CueHandle(102) }]);
    }

    #[test]
    fn test_snapshot() {
        let mut c = controller();
        let mut out = Vec::new();
        c.initialize(&mut out).unwrap();
        let ids = expected(&c);
        drop_on_slot(&mut c, &ids[0], 0, &mut out);

        let snap = c.snapshot();
        assert!(snap.playable());
        assert_eq!(snap.level, 1);
        assert_eq!(snap.size, 2);
        assert_eq!(snap.matched, 1);
        assert_eq!(snap.seed, 5);
        assert_eq!(snap.slots[0].occupant.as_ref(), Some(&ids[0]));
        assert!(snap.dragging.is_empty());
    }
}
