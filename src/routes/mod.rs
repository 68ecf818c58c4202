//! Route handlers, grouped by URL namespace.

pub mod admin;
pub mod game;
pub mod player;
pub mod sync;
pub mod util;
