//! Drag interaction state machine.
//!
//! Per pointer: `Idle -> Dragging -> {Dropped | Cancelled} -> Idle`. `Dropped` and
//! `Cancelled` are reported as the [`DragOutcome`] of `end_drag`; the session is
//! released in the same call, so the pointer is `Idle` again when it returns.
//!
//! The machine mutates token positions only for tokens it is carrying. Slot
//! occupancy is written on a correct drop, with the board lent by the controller.

use arrayvec::ArrayVec;
use match_drop_types::{
    Command, Container, DropEvent, ItemId, PointerId, Position, SlotIndex, MAX_POINTERS,
};
use tracing::{debug, warn};

use crate::board::Board;
use crate::matching::MatchPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragState {
    Idle,
    Dragging,
}

/// Transient record of an item being carried by a pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub pointer: PointerId,
    pub item: ItemId,
    /// Token position when the drag began; an unsuccessful drop returns here.
    pub origin: Position,
    /// Pointer position when the drag began.
    pub press: Position,
}

/// Why a drag request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragRejection {
    /// This pointer already carries an item.
    PointerBusy,
    /// This pointer carries nothing.
    NotDragging,
    UnknownItem,
    /// The item is already placed in a slot.
    ItemLocked,
    /// Another pointer carries the item.
    AlreadyCarried,
    TooManyPointers,
}

impl DragRejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DragRejection::PointerBusy => "pointer_busy",
            DragRejection::NotDragging => "not_dragging",
            DragRejection::UnknownItem => "unknown_item",
            DragRejection::ItemLocked => "item_locked",
            DragRejection::AlreadyCarried => "already_carried",
            DragRejection::TooManyPointers => "too_many_pointers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Correct match; the item is snapped and locked in the slot.
    Dropped(DropEvent),
    /// Item returned to its origin. Carries the incorrect-drop event when the
    /// release was over a legal slot.
    Cancelled(Option<DropEvent>),
}

impl DragOutcome {
    pub fn event(&self) -> Option<&DropEvent> {
        match self {
            DragOutcome::Dropped(ev) => Some(ev),
            DragOutcome::Cancelled(ev) => ev.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    sessions: ArrayVec<DragSession, MAX_POINTERS>,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, pointer: PointerId) -> DragState {
        if self.session(pointer).is_some() {
            DragState::Dragging
        } else {
            DragState::Idle
        }
    }

    pub fn session(&self, pointer: PointerId) -> Option<&DragSession> {
        self.sessions.iter().find(|s| s.pointer == pointer)
    }

    pub fn sessions(&self) -> &[DragSession] {
        &self.sessions
    }

    pub fn is_idle(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn begin_drag(
        &mut self,
        pointer: PointerId,
        item: &ItemId,
        pos: Position,
        board: &mut Board,
        out: &mut Vec<Command>,
    ) -> Result<(), DragRejection> {
        if self.session(pointer).is_some() {
            return Err(DragRejection::PointerBusy);
        }
        let token = board.token_mut(item).ok_or(DragRejection::UnknownItem)?;
        if token.locked {
            return Err(DragRejection::ItemLocked);
        }
        if token.carried {
            return Err(DragRejection::AlreadyCarried);
        }
        if self.sessions.is_full() {
            return Err(DragRejection::TooManyPointers);
        }

        token.carried = true;
        self.sessions.push(DragSession {
            pointer,
            item: item.clone(),
            origin: token.position,
            press: pos,
        });
        out.push(Command::SetCarried {
            item: item.clone(),
            carried: true,
        });
        debug!(pointer, item = %item, "drag started");
        Ok(())
    }

    /// Move the carried item with the pointer. Displacement is divided by `zoom`.
    pub fn drag(
        &mut self,
        pointer: PointerId,
        pos: Position,
        zoom: f32,
        board: &mut Board,
        out: &mut Vec<Command>,
    ) -> Result<(), DragRejection> {
        let session = self
            .session(pointer)
            .ok_or(DragRejection::NotDragging)?;
        let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        let target = session.origin + (pos - session.press).scale(1.0 / zoom);
        let key = session.item.clone();

        let token = board.token_mut(&key).ok_or(DragRejection::UnknownItem)?;
        token.position = target;
        out.push(Command::SetPosition {
            item: key,
            pos: target,
        });
        Ok(())
    }

    /// Release the pointer over `candidate` (or over nothing).
    pub fn end_drag<V: MatchPolicy + ?Sized>(
        &mut self,
        pointer: PointerId,
        candidate: Option<SlotIndex>,
        validator: &V,
        board: &mut Board,
        out: &mut Vec<Command>,
    ) -> Result<DragOutcome, DragRejection> {
        let idx = self
            .sessions
            .iter()
            .position(|s| s.pointer == pointer)
            .ok_or(DragRejection::NotDragging)?;
        let session = self.sessions.remove(idx);

        out.push(Command::SetCarried {
            item: session.item.clone(),
            carried: false,
        });

        let target = candidate.and_then(|index| match board.slot(index) {
            None => {
                warn!(
                    slot = index,
                    len = board.slot_count(),
                    "drop on out-of-range slot ignored"
                );
                None
            }
            Some(slot) if !slot.is_open() => {
                debug!(slot = index, "drop on inactive or occupied slot");
                None
            }
            Some(_) => Some(index),
        });

        let Some(index) = target else {
            return_to_origin(board, &session, out)?;
            return Ok(DragOutcome::Cancelled(None));
        };

        let is_match = {
            let token = board
                .token(&session.item)
                .ok_or(DragRejection::UnknownItem)?;
            let slot = board.slot(index).ok_or(DragRejection::UnknownItem)?;
            validator.is_match(&token.item, slot)
        };

        if !is_match {
            return_to_origin(board, &session, out)?;
            return Ok(DragOutcome::Cancelled(Some(DropEvent::Incorrect {
                item: session.item,
                slot: index,
            })));
        }

        let anchor = match board.slot_mut(index) {
            Some(slot) => {
                slot.occupant = Some(session.item.clone());
                slot.anchor
            }
            None => return Err(DragRejection::UnknownItem),
        };
        let token = board
            .token_mut(&session.item)
            .ok_or(DragRejection::UnknownItem)?;
        token.carried = false;
        token.locked = true;
        token.position = anchor;
        token.container = Container::Slot(index);

        out.push(Command::Reparent {
            item: session.item.clone(),
            container: Container::Slot(index),
        });
        out.push(Command::SetPosition {
            item: session.item.clone(),
            pos: anchor,
        });
        Ok(DragOutcome::Dropped(DropEvent::Correct {
            item: session.item,
            slot: index,
        }))
    }

    /// Drop every session without touching the board (the round is being replaced).
    pub fn cancel_all(&mut self) {
        if !self.sessions.is_empty() {
            debug!(sessions = self.sessions.len(), "drag sessions discarded");
        }
        self.sessions.clear();
    }
}

fn return_to_origin(
    board: &mut Board,
    session: &DragSession,
    out: &mut Vec<Command>,
) -> Result<(), DragRejection> {
    let token = board
        .token_mut(&session.item)
        .ok_or(DragRejection::UnknownItem)?;
    token.carried = false;
    token.position = session.origin;
    out.push(Command::SetPosition {
        item: session.item.clone(),
        pos: session.origin,
    });
    Ok(())
}
