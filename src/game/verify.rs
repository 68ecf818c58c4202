//! Verification engine — judges the board against the catalog mapping.
//!
//! One `verify` per button press. Evaluation is all-or-nothing over the
//! full slot set: there is no partial credit, and an incomplete board is
//! judged before any per-slot comparison happens.

use crate::game::players::PlayerStore;
use crate::game::session::GameSession;

/// Outcome of one verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Fewer filled slots than the architecture requires.
    Incomplete,
    /// Complete, but at least one slot holds the wrong component.
    Incorrect,
    /// Every slot matches. `finished` is true when the active architecture
    /// was the last one in catalog order.
    Correct { finished: bool },
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct { .. })
    }
}

/// Judge the current board. Pure: no counters move here.
pub fn judge(session: &GameSession) -> Verdict {
    if !session.is_complete() {
        return Verdict::Incomplete;
    }
    let arch = session.architecture();
    let all_correct = arch
        .slots
        .iter()
        .all(|slot| session.placed(slot.id) == Some(slot.correct));
    if all_correct {
        Verdict::Correct {
            finished: session.is_last(),
        }
    } else {
        Verdict::Incorrect
    }
}

/// Judge the board and apply the verdict to the player store: every
/// outcome counts an attempt; a correct one also bumps the correct count
/// and records the architecture completion (idempotent set union).
///
/// Advancing to the next architecture is NOT done here — the UI shows the
/// verdict for a fixed delay first, then issues the advance.
pub fn run_verification(session: &GameSession, store: &mut PlayerStore, now: u64) -> Verdict {
    let verdict = judge(session);
    store.record_attempt(verdict.is_correct(), now);
    if verdict.is_correct() {
        store.add_completed(session.architecture().name);
    }
    verdict
}
