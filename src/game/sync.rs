//! Remote realtime-store bridge — the optional synchronized variant.
//!
//! The JS bridge owns the actual realtime-database connection (value
//! listeners, on-disconnect presence hooks, server timestamps); this module
//! only holds the state those callbacks deliver and prepares the documents
//! the bridge writes back. Concurrency control is the remote store's native
//! last-write-wins, acceptable because each client only ever writes its own
//! nickname's record.
//!
//! The shared timer is broadcast as `{duration, startTime, isActive}`;
//! remaining time is always derived locally from `now`, never trusted from
//! the wire.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::game::players::{self, PlayerRecord};

/// Workshop timer state as broadcast to every connected client.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Total duration in minutes.
    #[serde(default)]
    pub duration: u64,
    /// Epoch milliseconds when the timer started.
    #[serde(default)]
    pub start_time: u64,
    #[serde(default)]
    pub is_active: bool,
}

impl TimerState {
    /// Seconds left at `now_ms`, clamped at zero. A timer that started in
    /// the future counts as not yet elapsed.
    pub fn remaining_seconds(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.start_time) / 1_000;
        (self.duration * 60).saturating_sub(elapsed)
    }
}

thread_local! {
    static TIMER: RefCell<Option<TimerState>> = const { RefCell::new(None) };
    static REMOTE_CONNECTED: RefCell<bool> = const { RefCell::new(false) };
}

/// Replace the timer with freshly broadcast state. Any countdown derived
/// from the previous state is implicitly cancelled. Inactive broadcasts
/// clear the timer.
pub fn apply_timer_json(json: &str) -> Result<(), String> {
    let state: Option<TimerState> =
        serde_json::from_str(json).map_err(|e| format!("Invalid timer JSON: {}", e))?;
    TIMER.with(|cell| {
        *cell.borrow_mut() = state.filter(|t| t.is_active);
    });
    Ok(())
}

/// The active timer, if any.
pub fn timer() -> Option<TimerState> {
    TIMER.with(|cell| *cell.borrow())
}

/// Drop any timer state (tests and disconnects).
pub fn clear_timer() {
    TIMER.with(|cell| {
        *cell.borrow_mut() = None;
    });
}

/// Mark the remote bridge connected or not.
pub fn set_remote_connected(connected: bool) {
    REMOTE_CONNECTED.with(|cell| {
        *cell.borrow_mut() = connected;
    });
}

pub fn is_remote_connected() -> bool {
    REMOTE_CONNECTED.with(|cell| *cell.borrow())
}

/// Ingest a `players` snapshot from the remote store's value listener.
///
/// The payload is either the realtime database's native object keyed by
/// nickname or a bare array. The local current player stays authoritative:
/// a remote copy of the same nickname is dropped so an in-flight local
/// mutation can't be rolled back by a stale echo.
pub fn apply_players_snapshot(json: &str) -> Result<usize, String> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Snapshot {
        Keyed(BTreeMap<String, PlayerRecord>),
        Listed(Vec<PlayerRecord>),
    }
    let incoming: Vec<PlayerRecord> = match serde_json::from_str(json) {
        Ok(Snapshot::Keyed(map)) => map.into_values().collect(),
        Ok(Snapshot::Listed(list)) => list,
        Err(e) => return Err(format!("Invalid players snapshot: {}", e)),
    };

    let count = players::with_store_mut(|store| {
        let own = store.current().cloned();
        let own_key = own.as_ref().map(|p| p.nickname.to_lowercase());
        let mut merged: Vec<PlayerRecord> = incoming
            .into_iter()
            .filter(|p| Some(p.nickname.to_lowercase()) != own_key)
            .collect();
        if let Some(own) = own {
            merged.push(own);
        }
        let count = merged.len();
        store.replace_records(merged);
        count
    });
    Ok(count)
}

/// The current player's document for the bridge to write to
/// `players/{nickname}`, presence flag set. `"null"` when nobody is
/// logged in.
pub fn self_document_json() -> String {
    players::with_store(|store| match store.current() {
        Some(record) => {
            let mut doc = record.clone();
            doc.is_online = true;
            serde_json::to_string(&doc).unwrap_or_else(|_| "null".to_string())
        }
        None => "null".to_string(),
    })
}
