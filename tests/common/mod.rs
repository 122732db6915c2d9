//! Shared helpers for integration tests

#![allow(dead_code)]

use match_drop::core::MatchPolicy;
use match_drop::engine::{AssetCatalog, RoundController};
use match_drop::types::{Command, InputEvent, ItemId, Position, SlotIndex};

pub fn press(c: &mut RoundController, key: &ItemId, out: &mut Vec<Command>) {
    c.on_input(
        InputEvent::PointerDown {
            pointer: 0,
            item: key.clone(),
            pos: Position::ZERO,
        },
        out,
    )
    .unwrap();
}

pub fn release(c: &mut RoundController, slot: Option<SlotIndex>, out: &mut Vec<Command>) {
    c.on_input(
        InputEvent::PointerUp {
            pointer: 0,
            pos: Position::ZERO,
            slot,
        },
        out,
    )
    .unwrap();
}

pub fn drop_on(c: &mut RoundController, key: &ItemId, slot: SlotIndex, out: &mut Vec<Command>) {
    press(c, key, out);
    release(c, Some(slot), out);
}

/// Key of an unlocked token the controller's rule accepts on `slot`.
pub fn matching_token<V: MatchPolicy, C: AssetCatalog>(
    c: &RoundController<V, C>,
    rule: &V,
    slot: SlotIndex,
) -> Option<ItemId> {
    let board = &c.round()?.board;
    let slot = board.slot(slot)?;
    board
        .tokens()
        .iter()
        .find(|t| !t.locked && rule.is_match(&t.item, slot))
        .map(|t| t.key.clone())
}

/// Drop a matching token on every slot of the current round.
pub fn solve_round(c: &mut RoundController, out: &mut Vec<Command>) {
    let rule = c.config().match_rule();
    let size = c.round().unwrap().size();
    for slot in 0..size {
        let key = matching_token(c, &rule, slot).unwrap();
        drop_on(c, &key, slot, out);
    }
}

pub fn played_cues(out: &[Command]) -> Vec<u32> {
    out.iter()
        .filter_map(|c| match c {
            Command::PlayCue { cue } => Some(cue.0),
            _ => None,
        })
        .collect()
}
