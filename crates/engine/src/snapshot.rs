use match_drop_types::{ItemId, Phase, SlotIndex};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub index: SlotIndex,
    pub active: bool,
    pub expected: Option<ItemId>,
    /// Token key of the occupant.
    pub occupant: Option<ItemId>,
}

/// Serializable view of the controller for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: Phase,
    pub level: u32,
    pub max_level: u32,
    pub epoch: u64,
    pub seed: u32,
    pub size: usize,
    pub matched: usize,
    pub completed: bool,
    pub playback_running: bool,
    /// Token keys currently carried by a pointer.
    pub dragging: Vec<ItemId>,
    pub slots: Vec<SlotSnapshot>,
}

impl RoundSnapshot {
    pub fn clear(&mut self) {
        self.phase = Phase::Loading;
        self.level = 0;
        self.max_level = 0;
        self.epoch = 0;
        self.seed = 0;
        self.size = 0;
        self.matched = 0;
        self.completed = false;
        self.playback_running = false;
        self.dragging.clear();
        self.slots.clear();
    }

    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing
    }
}

impl Default for RoundSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            level: 0,
            max_level: 0,
            epoch: 0,
            seed: 0,
            size: 0,
            matched: 0,
            completed: false,
            playback_running: false,
            dragging: Vec::new(),
            slots: Vec::new(),
        }
    }
}
