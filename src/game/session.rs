//! Game session — the active architecture and its placement tracker.
//!
//! Uses `thread_local!` + `RefCell` for safe mutable access in single-threaded
//! WASM. The Web Worker keeps the WASM module alive, so the session persists
//! across `handle_request` calls for the entire browser tab lifetime.
//!
//! The placement tracker maps slot id → placed component name, scoped to the
//! active architecture. Loading a different architecture discards it entirely.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::catalog::{self, Architecture, ARCHITECTURES};

/// One game session: progression index plus the slot placements for the
/// architecture currently on the board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameSession {
    /// Index into [`ARCHITECTURES`] for the architecture being assembled.
    pub current: usize,
    /// slot id → component name for the active architecture only.
    pub placements: HashMap<String, String>,
}

impl GameSession {
    /// The architecture currently on the board.
    pub fn architecture(&self) -> &'static Architecture {
        // `current` is only ever set through load/advance, which bound it.
        &ARCHITECTURES[self.current]
    }

    /// Switch the board to the architecture at `index`, discarding all
    /// placements. Errors on an out-of-range index.
    pub fn load_architecture(&mut self, index: usize) -> Result<(), String> {
        if index >= ARCHITECTURES.len() {
            return Err(format!("No architecture at index {}", index));
        }
        self.current = index;
        self.placements.clear();
        Ok(())
    }

    /// Clear all placements, keeping the same architecture.
    pub fn reset_placements(&mut self) {
        self.placements.clear();
    }

    /// Place a component into a slot, overwriting any prior occupant.
    ///
    /// Unknown slot ids and unknown component names are rejected rather than
    /// silently stored, so the tracker never holds orphan entries.
    pub fn place(&mut self, slot_id: &str, component: &str) -> Result<(), String> {
        let arch = self.architecture();
        if arch.slot(slot_id).is_none() {
            return Err(format!("Unknown slot '{}' for {}", slot_id, arch.name));
        }
        if catalog::find_component(component).is_none() {
            return Err(format!("Unknown component '{}'", component));
        }
        self.placements.insert(slot_id.to_string(), component.to_string());
        Ok(())
    }

    /// Clear a slot. Removing from an empty slot is a no-op, not an error.
    pub fn remove(&mut self, slot_id: &str) {
        self.placements.remove(slot_id);
    }

    /// The component currently placed in a slot, if any.
    pub fn placed(&self, slot_id: &str) -> Option<&str> {
        self.placements.get(slot_id).map(String::as_str)
    }

    /// True iff every slot of the active architecture has an entry.
    pub fn is_complete(&self) -> bool {
        self.architecture()
            .slots
            .iter()
            .all(|s| self.placements.contains_key(s.id))
    }

    /// Whether the active architecture is the last one in catalog order.
    pub fn is_last(&self) -> bool {
        self.current + 1 == ARCHITECTURES.len()
    }

    /// Move to the next architecture in catalog order, clearing placements.
    /// Returns `false` (and stays put) when already at the last.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        self.placements.clear();
        true
    }
}

thread_local! {
    static SESSION: RefCell<GameSession> = RefCell::new(GameSession::default());
}

/// Execute a closure with read access to the session.
pub fn with_session<F, R>(f: F) -> R
where
    F: FnOnce(&GameSession) -> R,
{
    SESSION.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the session.
pub fn with_session_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut GameSession) -> R,
{
    SESSION.with(|s| f(&mut s.borrow_mut()))
}

/// Replace the entire session (used by tests and full resets).
pub fn replace_session(new_session: GameSession) {
    SESSION.with(|s| {
        *s.borrow_mut() = new_session;
    });
}
