//! Random assignment engine - item selection, layout shuffling, color assignment
//!
//! The engine is stateless apart from its RNG. Every operation returns a fresh
//! assignment; nothing is written back into the caller's data.

use match_drop_types::{Color, Position};
use tracing::warn;

use crate::error::{Error, Result, Warning};
use crate::rng::SimpleRng;

/// Primary (and optionally decoy) colors for each slot of a round.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorAssignment {
    pub primary: Vec<Color>,
    pub warning: Option<Warning>,
}

/// Per-slot assignment built once for a round.
///
/// `position` is the tray home of the token the slot expects; `decoy_position`
/// is the home of that slot's decoy when the round has one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotAssignment {
    pub color: Option<Color>,
    pub decoy: Option<Color>,
    pub position: Option<Position>,
    pub decoy_position: Option<Position>,
}

/// Slot index -> assigned color/decoy/position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssignmentTable {
    pub entries: Vec<SlotAssignment>,
    pub warnings: Vec<Warning>,
}

impl AssignmentTable {
    pub fn with_len(len: usize) -> Self {
        Self {
            entries: vec![SlotAssignment::default(); len],
            warnings: Vec::new(),
        }
    }

    /// Table for a round without colors: slot `i` expects the token homed at
    /// `positions[i]`.
    pub fn from_positions(positions: &[Position]) -> Self {
        Self {
            entries: positions
                .iter()
                .map(|&p| SlotAssignment {
                    position: Some(p),
                    ..SlotAssignment::default()
                })
                .collect(),
            warnings: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SlotAssignment> {
        self.entries.get(index)
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentEngine {
    rng: SimpleRng,
}

impl AssignmentEngine {
    pub fn new(rng: SimpleRng) -> Self {
        Self { rng }
    }

    pub fn with_seed(seed: u32) -> Self {
        Self::new(SimpleRng::new(seed))
    }

    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }

    /// Uniform in-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        self.rng.shuffle(items);
    }

    /// Shuffled copy of `items`.
    pub fn shuffled<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut copy = items.to_vec();
        self.rng.shuffle(&mut copy);
        copy
    }

    /// Shuffle the pool and take the first `count` distinct entries.
    pub fn select_round_items<T: Clone + PartialEq>(
        &mut self,
        pool: &[T],
        count: usize,
    ) -> Result<Vec<T>> {
        let mut picked: Vec<T> = Vec::with_capacity(count);
        for item in self.shuffled(pool) {
            if picked.len() == count {
                break;
            }
            if !picked.contains(&item) {
                picked.push(item);
            }
        }

        if picked.len() < count {
            // picked holds every distinct entry here
            return Err(Error::InsufficientPool {
                requested: count,
                available: picked.len(),
            });
        }
        Ok(picked)
    }

    /// Redistribute the given positions across the same set of slots.
    ///
    /// The result is a permutation of `positions`: slot `i` moves to `result[i]`.
    pub fn assign_positions(&mut self, positions: &[Position]) -> Vec<Position> {
        self.shuffled(positions)
    }

    /// One primary color per slot, pairwise distinct while the palette holds
    /// enough distinct colors. A short palette repeats colors and reports a warning.
    pub fn assign_colors(&mut self, slots: usize, palette: &[Color]) -> Result<ColorAssignment> {
        if slots == 0 {
            return Ok(ColorAssignment::default());
        }

        let mut distinct: Vec<Color> = Vec::with_capacity(palette.len());
        for &color in palette {
            if !distinct.contains(&color) {
                distinct.push(color);
            }
        }
        if distinct.is_empty() {
            return Err(Error::EmptyPalette {
                required: 1,
                available: 0,
            });
        }

        let warning = if distinct.len() < slots {
            let w = Warning::PaletteTooSmall {
                palette: distinct.len(),
                slots,
            };
            warn!("{}", w);
            Some(w)
        } else {
            None
        };

        self.shuffle(&mut distinct);
        let primary = (0..slots).map(|i| distinct[i % distinct.len()]).collect();
        Ok(ColorAssignment { primary, warning })
    }

    /// For each primary color, a random palette color different from it.
    pub fn assign_decoy_colors(&mut self, primary: &[Color], palette: &[Color]) -> Result<Vec<Color>> {
        if palette.len() < 2 {
            return Err(Error::EmptyPalette {
                required: 2,
                available: palette.len(),
            });
        }

        primary
            .iter()
            .map(|p| {
                let others: Vec<Color> = palette.iter().copied().filter(|c| c != p).collect();
                if others.is_empty() {
                    return Err(Error::EmptyPalette {
                        required: 2,
                        available: 1,
                    });
                }
                Ok(others[self.rng.next_index(others.len())])
            })
            .collect()
    }

    /// Colors, decoys and token homes for a round in one table.
    ///
    /// `positions` is either empty (homes are not assigned) or holds one anchor
    /// per token: `slots` of them, twice that with decoys. The anchors are
    /// shuffled; slot `i` takes home `i` and its decoy home `slots + i`.
    pub fn build_table(
        &mut self,
        slots: usize,
        palette: &[Color],
        with_decoys: bool,
        positions: &[Position],
    ) -> Result<AssignmentTable> {
        let tokens = if with_decoys { slots * 2 } else { slots };
        if !positions.is_empty() && positions.len() < tokens {
            return Err(Error::Config(format!(
                "round needs {} token anchors, got {}",
                tokens,
                positions.len()
            )));
        }

        let mut table = AssignmentTable::with_len(slots);

        let colors = self.assign_colors(slots, palette)?;
        let decoys = if with_decoys {
            Some(self.assign_decoy_colors(&colors.primary, palette)?)
        } else {
            None
        };
        table.warnings.extend(colors.warning);

        for (i, entry) in table.entries.iter_mut().enumerate() {
            entry.color = colors.primary.get(i).copied();
            entry.decoy = decoys.as_ref().and_then(|d| d.get(i).copied());
        }

        if !positions.is_empty() {
            let homes = self.assign_positions(&positions[..tokens]);
            for (i, entry) in table.entries.iter_mut().enumerate() {
                entry.position = homes.get(i).copied();
                if with_decoys {
                    entry.decoy_position = homes.get(slots + i).copied();
                }
            }
        }
        Ok(table)
    }
}
