//! Game core — placement/verification state machine, player record store,
//! and the derived projections (leaderboard, stats). State lives in WASM
//! memory (thread_local) for the lifetime of the Web Worker; the JS bridge
//! persists and syncs it.

pub mod leaderboard;
pub mod players;
pub mod session;
pub mod stats;
pub mod sync;
pub mod time;
pub mod verify;
