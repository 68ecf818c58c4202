//! Player record store — cumulative per-nickname statistics.
//!
//! The store owns every [`PlayerRecord`]; the current player is a
//! non-owning nickname reference into it. Held in `thread_local!` WASM
//! memory like all other state; the JS bridge persists the serialized
//! store to localStorage on every mutation (write-through) and restores
//! it on page load (read-through).
//!
//! JSON field names stay camelCase so exports round-trip against files
//! produced by earlier sessions and by the remote realtime store.

use serde::{Deserialize, Deserializer, Serialize};
use std::cell::RefCell;

use crate::game::time::parse_iso8601;

/// Cumulative statistics for one nickname.
///
/// Invariant: `score == round(100 * correct_count / attempt_count)` when
/// `attempt_count > 0`, else `0`. Imported records are taken verbatim and
/// may violate this until their next attempt recomputes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub nickname: String,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub attempt_count: u32,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub completed_architectures: Vec<String>,
    /// Epoch milliseconds. Imports may carry ISO-8601 strings instead;
    /// both parse.
    #[serde(default, deserialize_with = "de_timestamp")]
    pub last_played: u64,
    /// Presence flag used by the remote-synchronized variant.
    #[serde(default)]
    pub is_online: bool,
}

impl PlayerRecord {
    fn new(nickname: &str, now: u64) -> Self {
        Self {
            nickname: nickname.to_string(),
            correct_count: 0,
            attempt_count: 0,
            score: 0,
            completed_architectures: Vec::new(),
            last_played: now,
            is_online: true,
        }
    }
}

/// Score formula shared by attempts and re-derivations: percentage of
/// correct attempts, rounded to nearest, `0` for zero attempts.
pub fn compute_score(correct: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    let c = correct as u64;
    let a = attempts as u64;
    ((200 * c + a) / (2 * a)) as u32
}

/// Accept epoch milliseconds (number) or an ISO-8601 string.
fn de_timestamp<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(u64),
        Float(f64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Millis(ms) => Ok(ms),
        Raw::Float(f) if f >= 0.0 => Ok(f as u64),
        Raw::Float(_) => Ok(0),
        Raw::Text(s) => Ok(parse_iso8601(&s).unwrap_or(0)),
    }
}

/// All player records plus the current-player designation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStore {
    players: Vec<PlayerRecord>,
    #[serde(skip)]
    current: Option<String>,
}

impl PlayerStore {
    pub fn records(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn find_index(&self, nickname: &str) -> Option<usize> {
        let needle = nickname.to_lowercase();
        self.players
            .iter()
            .position(|p| p.nickname.to_lowercase() == needle)
    }

    /// The current player's record, if one has logged in.
    pub fn current(&self) -> Option<&PlayerRecord> {
        let nickname = self.current.as_deref()?;
        let idx = self.find_index(nickname)?;
        self.players.get(idx)
    }

    /// Case-insensitive lookup by nickname; creates a zeroed record when
    /// absent, refreshes `last_played` when present. Designates the record
    /// as current either way.
    pub fn create_or_update(&mut self, nickname: &str, now: u64) -> &PlayerRecord {
        let idx = match self.find_index(nickname) {
            Some(i) => {
                let p = &mut self.players[i];
                p.last_played = now;
                p.is_online = true;
                i
            }
            None => {
                self.players.push(PlayerRecord::new(nickname, now));
                self.players.len() - 1
            }
        };
        self.current = Some(self.players[idx].nickname.clone());
        &self.players[idx]
    }

    /// Update the current record after one verification attempt.
    /// No-op when nobody has logged in.
    pub fn record_attempt(&mut self, correct: bool, now: u64) {
        let Some(idx) = self.current.as_deref().and_then(|n| self.find_index(n)) else {
            return;
        };
        let p = &mut self.players[idx];
        p.attempt_count += 1;
        if correct {
            p.correct_count += 1;
        }
        p.score = compute_score(p.correct_count, p.attempt_count);
        p.last_played = now;
    }

    /// Record an architecture completion for the current player. Set-union
    /// semantics: re-completing the same architecture never duplicates it.
    pub fn add_completed(&mut self, arch_name: &str) {
        let Some(idx) = self.current.as_deref().and_then(|n| self.find_index(n)) else {
            return;
        };
        let p = &mut self.players[idx];
        if !p.completed_architectures.iter().any(|a| a == arch_name) {
            p.completed_architectures.push(arch_name.to_string());
        }
    }

    /// Merge imported records into the store.
    ///
    /// Matched (case-insensitive) records take the field-wise maximum of
    /// each counter and the union of completed architectures; the later
    /// `last_played` wins. Counters are deliberately NOT summed, so
    /// re-importing an overlapping export never double-counts. Unmatched
    /// records are inserted verbatim. Returns `(new, merged)` counts.
    pub fn merge_import(&mut self, incoming: Vec<PlayerRecord>) -> (usize, usize) {
        let mut new_count = 0;
        let mut merged_count = 0;
        for rec in incoming {
            match self.find_index(&rec.nickname) {
                Some(idx) => {
                    let existing = &mut self.players[idx];
                    existing.correct_count = existing.correct_count.max(rec.correct_count);
                    existing.attempt_count = existing.attempt_count.max(rec.attempt_count);
                    existing.score = existing.score.max(rec.score);
                    for arch in rec.completed_architectures {
                        if !existing.completed_architectures.contains(&arch) {
                            existing.completed_architectures.push(arch);
                        }
                    }
                    if rec.last_played > existing.last_played {
                        existing.last_played = rec.last_played;
                    }
                    merged_count += 1;
                }
                None => {
                    self.players.push(rec);
                    new_count += 1;
                }
            }
        }
        (new_count, merged_count)
    }

    /// Empty the store and forget the current-player designation.
    /// Callers gather the explicit user confirmation; this just executes.
    pub fn clear_all(&mut self) {
        self.players.clear();
        self.current = None;
    }

    /// Replace all records while keeping the current-player designation.
    /// Used when the remote store's value listener delivers a snapshot.
    pub fn replace_records(&mut self, players: Vec<PlayerRecord>) {
        self.players = players;
    }
}

/// Parse an import payload: a bare array of records or an object with a
/// `players` array. Anything else is a format error and nothing merges.
pub fn parse_import(json: &str) -> Result<Vec<PlayerRecord>, String> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ImportPayload {
        Bare(Vec<PlayerRecord>),
        Wrapped { players: Vec<PlayerRecord> },
    }
    match serde_json::from_str(json) {
        Ok(ImportPayload::Bare(players)) | Ok(ImportPayload::Wrapped { players }) => Ok(players),
        Err(_) => Err("Invalid format: expected an array of players or {\"players\": [...]}".to_string()),
    }
}

thread_local! {
    static STORE: RefCell<PlayerStore> = RefCell::new(PlayerStore::default());
}

/// Execute a closure with read access to the player store.
pub fn with_store<F, R>(f: F) -> R
where
    F: FnOnce(&PlayerStore) -> R,
{
    STORE.with(|s| f(&s.borrow()))
}

/// Execute a closure with mutable access to the player store.
pub fn with_store_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut PlayerStore) -> R,
{
    STORE.with(|s| f(&mut s.borrow_mut()))
}

/// Replace the entire store (full reset; also used by tests).
pub fn replace_store(new_store: PlayerStore) {
    STORE.with(|s| {
        *s.borrow_mut() = new_store;
    });
}

/// Serialize all records for the localStorage bridge.
pub fn export_records_json() -> String {
    with_store(|store| {
        serde_json::to_string(store.records()).unwrap_or_else(|_| "[]".to_string())
    })
}

/// Restore records previously persisted by [`export_records_json`].
/// An empty string (first visit) is a no-op.
pub fn restore_records_json(json: &str) -> Result<(), String> {
    if json.trim().is_empty() {
        return Ok(());
    }
    let players: Vec<PlayerRecord> =
        serde_json::from_str(json).map_err(|e| format!("Invalid players JSON: {}", e))?;
    with_store_mut(|store| store.replace_records(players));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(nickname: &str, correct: u32, attempts: u32, score: u32) -> PlayerRecord {
        PlayerRecord {
            nickname: nickname.to_string(),
            correct_count: correct,
            attempt_count: attempts,
            score,
            completed_architectures: Vec::new(),
            last_played: 0,
            is_online: false,
        }
    }

    #[test]
    fn score_zero_attempts_is_zero() {
        assert_eq!(compute_score(0, 0), 0);
    }

    #[test]
    fn score_rounds_to_nearest() {
        assert_eq!(compute_score(1, 1), 100);
        assert_eq!(compute_score(1, 2), 50);
        assert_eq!(compute_score(1, 3), 33);
        assert_eq!(compute_score(2, 3), 67);
        assert_eq!(compute_score(1, 8), 13); // 12.5 rounds up
    }

    #[test]
    fn score_recomputation_is_idempotent() {
        let once = compute_score(3, 7);
        assert_eq!(once, compute_score(3, 7));
    }

    #[test]
    fn create_new_player_is_zeroed() {
        let mut store = PlayerStore::default();
        let p = store.create_or_update("Nury", 1_000);
        assert_eq!(p.nickname, "Nury");
        assert_eq!(p.correct_count, 0);
        assert_eq!(p.attempt_count, 0);
        assert_eq!(p.score, 0);
        assert_eq!(p.last_played, 1_000);
        assert!(p.is_online);
    }

    #[test]
    fn create_or_update_is_case_insensitive() {
        let mut store = PlayerStore::default();
        store.create_or_update("Mario", 1_000);
        store.record_attempt(true, 1_500);
        let p = store.create_or_update("MARIO", 2_000);
        // Same record: counters preserved, last_played refreshed.
        assert_eq!(p.nickname, "Mario");
        assert_eq!(p.attempt_count, 1);
        assert_eq!(p.last_played, 2_000);
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn record_attempt_updates_counters_and_score() {
        let mut store = PlayerStore::default();
        store.create_or_update("Aleja", 0);
        store.record_attempt(true, 10);
        store.record_attempt(false, 20);
        let p = store.current().unwrap();
        assert_eq!(p.correct_count, 1);
        assert_eq!(p.attempt_count, 2);
        assert_eq!(p.score, 50);
        assert_eq!(p.last_played, 20);
    }

    #[test]
    fn record_attempt_without_login_is_noop() {
        let mut store = PlayerStore::default();
        store.record_attempt(true, 10);
        assert!(store.is_empty());
    }

    #[test]
    fn add_completed_is_idempotent() {
        let mut store = PlayerStore::default();
        store.create_or_update("Cristian", 0);
        store.add_completed("Static Website");
        store.add_completed("Static Website");
        let p = store.current().unwrap();
        assert_eq!(p.completed_architectures, vec!["Static Website"]);
    }

    #[test]
    fn merge_import_takes_fieldwise_max() {
        let mut store = PlayerStore::default();
        store.create_or_update("Ana", 0);
        store.record_attempt(true, 10);
        store.record_attempt(true, 20);
        store.record_attempt(false, 30); // 2/3, score 67

        let mut incoming = record("ana", 1, 5, 20);
        incoming.completed_architectures = vec!["Data Pipeline".to_string()];
        incoming.last_played = 999;

        let (new, merged) = store.merge_import(vec![incoming]);
        assert_eq!((new, merged), (0, 1));
        let p = store.current().unwrap();
        assert_eq!(p.correct_count, 2); // max(2, 1)
        assert_eq!(p.attempt_count, 5); // max(3, 5)
        assert_eq!(p.score, 67); // max(67, 20)
        assert_eq!(p.completed_architectures, vec!["Data Pipeline"]);
        assert_eq!(p.last_played, 999);
    }

    #[test]
    fn merge_import_inserts_unmatched_verbatim() {
        let mut store = PlayerStore::default();
        let (new, merged) = store.merge_import(vec![record("Ghost", 4, 4, 100)]);
        assert_eq!((new, merged), (1, 0));
        assert_eq!(store.records()[0].nickname, "Ghost");
        assert_eq!(store.records()[0].score, 100);
    }

    #[test]
    fn merge_import_is_idempotent() {
        let mut store = PlayerStore::default();
        let mut rec = record("Rey", 3, 4, 75);
        rec.completed_architectures = vec!["Static Website".to_string()];
        rec.last_played = 42;

        store.merge_import(vec![rec.clone()]);
        let after_once = serde_json::to_string(store.records()).unwrap();
        store.merge_import(vec![rec]);
        let after_twice = serde_json::to_string(store.records()).unwrap();
        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn merge_import_keeps_later_local_timestamp() {
        let mut store = PlayerStore::default();
        store.create_or_update("Zoe", 5_000);
        let mut rec = record("zoe", 0, 0, 0);
        rec.last_played = 1_000; // stale export
        store.merge_import(vec![rec]);
        assert_eq!(store.current().unwrap().last_played, 5_000);
    }

    #[test]
    fn clear_all_forgets_current_player() {
        let mut store = PlayerStore::default();
        store.create_or_update("Tmp", 0);
        store.clear_all();
        assert!(store.is_empty());
        assert!(store.current().is_none());
        // A later attempt must not resurrect anything.
        store.record_attempt(true, 99);
        assert!(store.is_empty());
    }

    #[test]
    fn parse_import_bare_array() {
        let players = parse_import(r#"[{"nickname":"A","correctCount":1}]"#).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].nickname, "A");
        assert_eq!(players[0].correct_count, 1);
    }

    #[test]
    fn parse_import_wrapped_object() {
        let json = r#"{"sessionCode":"AWS-X","exportDate":"2026-01-01","players":[{"nickname":"B"}]}"#;
        let players = parse_import(json).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].nickname, "B");
    }

    #[test]
    fn parse_import_rejects_other_shapes() {
        assert!(parse_import(r#"{"nickname":"solo"}"#).is_err());
        assert!(parse_import("42").is_err());
        assert!(parse_import("not json {{{").is_err());
    }

    #[test]
    fn record_accepts_iso_timestamp() {
        let p: PlayerRecord =
            serde_json::from_str(r#"{"nickname":"C","lastPlayed":"2024-01-01T00:00:00.000Z"}"#)
                .unwrap();
        assert_eq!(p.last_played, 1_704_067_200_000);
    }

    #[test]
    fn record_accepts_numeric_timestamp() {
        let p: PlayerRecord =
            serde_json::from_str(r#"{"nickname":"D","lastPlayed":1704067200000}"#).unwrap();
        assert_eq!(p.last_played, 1_704_067_200_000);
    }

    #[test]
    fn export_restore_roundtrip() {
        replace_store(PlayerStore::default());
        with_store_mut(|store| {
            store.create_or_update("Persisted", 77);
            store.record_attempt(true, 78);
        });
        let json = export_records_json();
        assert!(json.contains("Persisted"));

        replace_store(PlayerStore::default());
        restore_records_json(&json).unwrap();
        with_store(|store| {
            assert_eq!(store.records().len(), 1);
            assert_eq!(store.records()[0].nickname, "Persisted");
            assert_eq!(store.records()[0].score, 100);
        });
        replace_store(PlayerStore::default());
    }

    #[test]
    fn restore_empty_is_noop() {
        replace_store(PlayerStore::default());
        assert!(restore_records_json("").is_ok());
        assert!(restore_records_json("  ").is_ok());
        with_store(|store| assert!(store.is_empty()));
    }

    #[test]
    fn restore_invalid_json_errors() {
        assert!(restore_records_json("not json {{{").is_err());
    }
}
