//! Session rollups and the opaque session code.
//!
//! The aggregator is a pure read over the player store. The session code
//! identifies one game-hosting session for export grouping: generated once
//! from a timestamp/entropy pair handed in by the JS bridge, persisted to
//! localStorage through the bridge, regenerated only when no persisted
//! code exists.

use std::cell::RefCell;

use crate::game::players::PlayerRecord;

/// Read-only rollups over all player records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub total_players: usize,
    pub total_attempts: u64,
    /// Rounded mean of all scores; `0` for an empty store.
    pub avg_score: u32,
    pub total_completions: usize,
}

/// Aggregate the store contents.
pub fn aggregate(records: &[PlayerRecord]) -> SessionStats {
    let total_players = records.len();
    let total_attempts = records.iter().map(|p| p.attempt_count as u64).sum();
    let total_completions = records.iter().map(|p| p.completed_architectures.len()).sum();
    let avg_score = if total_players == 0 {
        0
    } else {
        let sum: u64 = records.iter().map(|p| p.score as u64).sum();
        let n = total_players as u64;
        ((2 * sum + n) / (2 * n)) as u32
    };
    SessionStats {
        total_players,
        total_attempts,
        avg_score,
        total_completions,
    }
}

/// Lowercase base-36 rendering, "0" for zero.
fn base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Build a fresh session code: `AWS-{timestamp}-{entropy}` in uppercase
/// base 36, matching codes produced by earlier sessions.
pub fn generate_session_code(now_ms: u64, entropy: u64) -> String {
    format!("AWS-{}-{}", base36(now_ms), base36(entropy)).to_uppercase()
}

thread_local! {
    static SESSION_CODE: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// The session code, generating and caching one when none exists yet.
pub fn get_or_create_session_code(now_ms: u64, entropy: u64) -> String {
    SESSION_CODE.with(|cell| {
        let mut code = cell.borrow_mut();
        match code.as_ref() {
            Some(existing) => existing.clone(),
            None => {
                let fresh = generate_session_code(now_ms, entropy);
                *code = Some(fresh.clone());
                fresh
            }
        }
    })
}

/// Adopt a code restored from localStorage. Empty input is ignored.
pub fn restore_session_code(code: &str) {
    if code.is_empty() {
        return;
    }
    SESSION_CODE.with(|cell| {
        *cell.borrow_mut() = Some(code.to_string());
    });
}

/// The current code without generating one.
pub fn session_code() -> Option<String> {
    SESSION_CODE.with(|cell| cell.borrow().clone())
}

/// Forget the session code (part of the admin full reset).
pub fn clear_session_code() {
    SESSION_CODE.with(|cell| {
        *cell.borrow_mut() = None;
    });
}
