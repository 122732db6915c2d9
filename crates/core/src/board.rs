//! Board - the round's slots and draggable tokens
//!
//! Tokens are the draggable instances of items. A token's key is what the host
//! refers to in pointer events; the item it carries is what gets matched. Several
//! tokens may carry items with the same identity (repeated letters in a word).

use match_drop_types::{Command, Container, Item, ItemId, Position, Slot, SlotIndex};

/// Draggable instance of an item.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub key: ItemId,
    pub item: Item,
    pub position: Position,
    /// Pre-round anchor; where the token returns when the round completes.
    pub home: Position,
    pub container: Container,
    /// Placed in a slot; no further dragging.
    pub locked: bool,
    pub carried: bool,
}

impl Token {
    pub fn new(key: impl Into<ItemId>, item: Item, home: Position) -> Self {
        Self {
            key: key.into(),
            item,
            position: home,
            home,
            container: Container::Tray,
            locked: false,
            carried: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    slots: Vec<Slot>,
    tokens: Vec<Token>,
}

impl Board {
    pub fn new(slots: Vec<Slot>, tokens: Vec<Token>) -> Self {
        Self { slots, tokens }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: SlotIndex) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slot_mut(&mut self, index: SlotIndex) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, key: &ItemId) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.key == key)
    }

    pub fn token_mut(&mut self, key: &ItemId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| &t.key == key)
    }

    /// Identities of the slot occupants in slot order (empty slots skipped).
    pub fn occupant_identities(&self) -> Vec<&ItemId> {
        self.slots
            .iter()
            .filter_map(|s| s.occupant.as_ref())
            .filter_map(|key| self.token(key))
            .map(|t| &t.item.id)
            .collect()
    }

    /// Send every token back to its pre-round anchor and free the slots.
    pub fn restore_homes(&mut self, out: &mut Vec<Command>) {
        for token in &mut self.tokens {
            token.position = token.home;
            token.container = Container::Tray;
            token.locked = false;
            token.carried = false;
            out.push(Command::Reparent {
                item: token.key.clone(),
                container: Container::Tray,
            });
            out.push(Command::SetPosition {
                item: token.key.clone(),
                pos: token.home,
            });
        }
        for slot in &mut self.slots {
            slot.occupant = None;
        }
    }
}
