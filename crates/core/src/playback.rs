//! Sequenced cue playback with a single-flight guard.
//!
//! A run plays its queue in order: a cue fires, is held for `hold_ms`, then the next
//! cue fires. The scheduler returns to `Idle` once the last cue's hold elapses. While
//! a run is in flight further `start`/`replay` requests are dropped.
//!
//! Each run gets an id; steps scheduled by an abandoned run are ignored when they
//! come due.

use match_drop_types::{Command, CueHandle, CUE_HOLD_MS};
use tracing::debug;

use crate::timeline::{Timeline, TimerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy)]
struct Step {
    run: u64,
    index: usize,
}

#[derive(Debug, Clone)]
pub struct PlaybackScheduler {
    state: PlaybackState,
    hold_ms: u32,
    /// The current round's full cue list (what `replay` plays).
    round_cues: Vec<CueHandle>,
    /// Queue of the run in flight.
    queue: Vec<CueHandle>,
    run_id: u64,
    timeline: Timeline<Step>,
    /// The in-flight run's next step.
    next_step: Option<TimerId>,
}

impl PlaybackScheduler {
    pub fn new(hold_ms: u32) -> Self {
        Self {
            state: PlaybackState::Idle,
            hold_ms,
            round_cues: Vec::new(),
            queue: Vec::new(),
            run_id: 0,
            timeline: Timeline::new(),
            next_step: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn hold_ms(&self) -> u32 {
        self.hold_ms
    }

    pub fn round_cues(&self) -> &[CueHandle] {
        &self.round_cues
    }

    /// Install a new round's cue list, abandoning any run of the previous round.
    pub fn load(&mut self, cues: Vec<CueHandle>) {
        self.abandon();
        self.round_cues = cues;
    }

    /// Stop the run in flight (if any). Its pending steps become stale.
    pub fn abandon(&mut self) {
        if self.is_running() {
            debug!(run = self.run_id, "playback run abandoned");
        }
        self.run_id = self.run_id.wrapping_add(1);
        if let Some(id) = self.next_step.take() {
            self.timeline.cancel(id);
        }
        self.queue.clear();
        self.state = PlaybackState::Idle;
    }

    /// Start a run over `queue`. The first cue fires immediately.
    ///
    /// Returns false (and does nothing) if a run is already in flight.
    pub fn start(&mut self, queue: Vec<CueHandle>, out: &mut Vec<Command>) -> bool {
        if self.is_running() {
            debug!(run = self.run_id, "playback already running; start ignored");
            return false;
        }

        self.run_id = self.run_id.wrapping_add(1);
        self.queue = queue;
        self.state = PlaybackState::Running;
        self.play_step(0, out);
        true
    }

    /// Start a run over the current round's full cue list.
    pub fn replay(&mut self, out: &mut Vec<Command>) -> bool {
        let cues = self.round_cues.clone();
        self.start(cues, out)
    }

    /// Advance the host clock and fire due cues.
    pub fn tick(&mut self, elapsed_ms: u32, out: &mut Vec<Command>) {
        self.timeline.advance(elapsed_ms);
        while let Some(step) = self.timeline.pop_due() {
            if step.run != self.run_id {
                continue;
            }
            self.next_step = None;
            self.play_step(step.index, out);
        }
    }

    fn play_step(&mut self, index: usize, out: &mut Vec<Command>) {
        match self.queue.get(index) {
            Some(&cue) => {
                out.push(Command::PlayCue { cue });
                let next = self.timeline.after(
                    self.hold_ms,
                    Step {
                        run: self.run_id,
                        index: index + 1,
                    },
                );
                self.next_step = Some(next);
            }
            None => {
                self.queue.clear();
                self.state = PlaybackState::Idle;
            }
        }
    }
}

impl Default for PlaybackScheduler {
    fn default() -> Self {
        Self::new(CUE_HOLD_MS)
    }
}
