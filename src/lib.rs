//! AWS Architecture Game — in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the Web Worker
//! bridge to call. Uses `matchit` for URL routing — the same router
//! engine that powers Axum. Handlers return HTML fragments for HTMX to
//! swap into the DOM; the `/api/player/state` and `/api/sync/self`
//! endpoints return JSON for the persistence and realtime bridges instead.
//!
//! All game state lives in WASM memory for the lifetime of the worker.
//! The JS side persists it to localStorage after every mutating request
//! and, in the synchronized variant, mirrors player records through a
//! realtime database.

use wasm_bindgen::prelude::*;

pub mod catalog;
pub mod game;
pub mod routes;

/// Process an HTTP-like request and return a response fragment.
///
/// Called from JavaScript (Web Worker) via wasm-bindgen.
///
/// # Arguments
/// * `method` — HTTP method (e.g., "GET", "POST")
/// * `path`   — URL path (e.g., "/api/game/board")
/// * `query`  — Query string (e.g., "?now=1704067200000")
/// * `body`   — Request body (POST form data). Empty string for GET requests.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    // Build the router. matchit compiles route patterns into a radix tree.
    let mut router = matchit::Router::new();

    // Board and placement routes
    router.insert("/api/game/board", "game_board").ok();
    router.insert("/api/game/palette", "game_palette").ok();
    router.insert("/api/game/place", "game_place").ok();
    router.insert("/api/game/remove", "game_remove").ok();
    router.insert("/api/game/verify", "game_verify").ok();
    router.insert("/api/game/advance", "game_advance").ok();
    router.insert("/api/game/select", "game_select").ok();
    router.insert("/api/game/reset", "game_reset").ok();

    // Player routes
    router.insert("/api/player/login", "player_login").ok();
    router.insert("/api/player/score", "player_score").ok();
    router.insert("/api/player/state", "player_state").ok();
    router.insert("/api/player/restore", "player_restore").ok();
    router.insert("/api/leaderboard", "leaderboard").ok();

    // Admin dashboard routes
    router.insert("/api/admin/stats", "admin_stats").ok();
    router.insert("/api/admin/table", "admin_table").ok();
    router.insert("/api/admin/export/json", "admin_export_json").ok();
    router.insert("/api/admin/export/csv", "admin_export_csv").ok();
    router.insert("/api/admin/import", "admin_import").ok();
    router.insert("/api/admin/clear", "admin_clear").ok();

    // Realtime bridge routes (synchronized variant)
    router.insert("/api/sync/players", "sync_players").ok();
    router.insert("/api/sync/self", "sync_self").ok();
    router.insert("/api/sync/timer", "sync_timer").ok();
    router.insert("/api/sync/connected", "sync_connected").ok();

    match router.at(path) {
        Ok(matched) => match (*matched.value, method) {
            // GET routes
            ("game_board", "GET") => routes::game::handle_board_get(query),
            ("game_palette", "GET") => routes::game::handle_palette_get(query),
            ("player_score", "GET") => routes::player::handle_score_get(query),
            ("player_state", "GET") => routes::player::handle_state_get(query),
            ("leaderboard", "GET") => routes::player::handle_leaderboard_get(query),
            ("admin_stats", "GET") => routes::admin::handle_stats_get(query),
            ("admin_table", "GET") => routes::admin::handle_table_get(query),
            ("admin_export_json", "GET") => routes::admin::handle_export_json_get(query),
            ("admin_export_csv", "GET") => routes::admin::handle_export_csv_get(query),
            ("sync_self", "GET") => routes::sync::handle_self_get(query),
            ("sync_timer", "GET") => routes::sync::handle_timer_get(query),

            // POST routes
            ("game_place", "POST") => routes::game::handle_place_post(body),
            ("game_remove", "POST") => routes::game::handle_remove_post(body),
            ("game_verify", "POST") => routes::game::handle_verify_post(body),
            ("game_advance", "POST") => routes::game::handle_advance_post(body),
            ("game_select", "POST") => routes::game::handle_select_post(body),
            ("game_reset", "POST") => routes::game::handle_reset_post(body),
            ("player_login", "POST") => routes::player::handle_login_post(body),
            ("player_restore", "POST") => routes::player::handle_restore_post(body),
            ("admin_import", "POST") => routes::admin::handle_import_post(body),
            ("admin_clear", "POST") => routes::admin::handle_clear_post(body),
            ("sync_players", "POST") => routes::sync::handle_players_post(body),
            ("sync_timer", "POST") => routes::sync::handle_timer_post(body),
            ("sync_connected", "POST") => routes::sync::handle_connected_post(body),

            _ => method_not_allowed(),
        },
        Err(_) => not_found(),
    }
}

fn not_found() -> String {
    r#"<span class="text-red-500">404 — route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-500">405 — method not allowed</span>"#.to_string()
}
