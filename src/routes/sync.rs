//! `/api/sync/*` routes — the realtime-store bridge surface.
//!
//! The JS side owns the actual connection. It posts inbound events here
//! (player snapshots, timer broadcasts, connectivity changes) and polls
//! `self` for the document to write back under `players/{nickname}`.

use crate::game::sync::{
    self, apply_players_snapshot, apply_timer_json, self_document_json,
};
use crate::routes::util::{get_param, get_u64_param, html_escape, parse_form_body, parse_query};

/// Remaining seconds at which the countdown turns amber.
const WARNING_SECONDS: u64 = 300;
/// Remaining seconds at which the countdown turns red.
const ALERT_SECONDS: u64 = 60;

fn error_span(message: &str) -> String {
    format!(r#"<span class="text-red-500">{}</span>"#, message)
}

// ── POST /api/sync/players ─────────────────────────────────────────

/// Handle POST /api/sync/players
/// Body: `data={json}` — the value listener's snapshot, keyed object or
/// array. The local current player stays authoritative over its own echo.
pub fn handle_players_post(body: &str) -> String {
    let params = parse_form_body(body);
    let data = get_param(&params, "data").unwrap_or("");
    match apply_players_snapshot(data) {
        Ok(count) => format!(
            r#"<span class="text-emerald-400">{} players synced</span>"#,
            count
        ),
        Err(e) => error_span(&html_escape(&e)),
    }
}

// ── GET /api/sync/self ─────────────────────────────────────────────

/// Handle GET /api/sync/self
/// Returns the current player's document (JSON) for the bridge to write
/// remotely, `"null"` when nobody is logged in.
pub fn handle_self_get(_query: &str) -> String {
    self_document_json()
}

// ── POST /api/sync/timer ───────────────────────────────────────────

/// Handle POST /api/sync/timer
/// Body: `data={json}` — the broadcast `{duration, startTime, isActive}`.
/// Inactive or null broadcasts clear the timer.
pub fn handle_timer_post(body: &str) -> String {
    let params = parse_form_body(body);
    let data = get_param(&params, "data").unwrap_or("null");
    match apply_timer_json(data) {
        Ok(()) => r#"<span class="text-emerald-400">timer updated</span>"#.to_string(),
        Err(e) => error_span(&html_escape(&e)),
    }
}

// ── GET /api/sync/timer ────────────────────────────────────────────

/// Handle GET /api/sync/timer
/// Query: `now={epoch ms}`. Renders the countdown fragment the header
/// polls every second. Remaining time is derived locally from `now`.
pub fn handle_timer_get(query: &str) -> String {
    let params = parse_query(query);
    let now = get_u64_param(&params, "now");

    let Some(timer) = sync::timer() else {
        return String::new();
    };

    let remaining = timer.remaining_seconds(now);
    if remaining == 0 {
        return r#"<div class="timer expired text-red-500 font-bold">Time is up! Check your results in the admin panel</div>"#
            .to_string();
    }

    let color = if remaining <= ALERT_SECONDS {
        "text-red-500 animate-pulse"
    } else if remaining <= WARNING_SECONDS {
        "text-amber-500"
    } else {
        "text-emerald-400"
    };
    format!(
        r#"<div class="timer font-mono {}">&#9201; {:02}:{:02}</div>"#,
        color,
        remaining / 60,
        remaining % 60
    )
}

// ── POST /api/sync/connected ───────────────────────────────────────

/// Handle POST /api/sync/connected
/// Body: `state=true|false`. Returns the connectivity badge.
pub fn handle_connected_post(body: &str) -> String {
    let params = parse_form_body(body);
    let connected = get_param(&params, "state") == Some("true");
    sync::set_remote_connected(connected);
    if connected {
        r#"<span class="text-emerald-400">&#9679; online</span>"#.to_string()
    } else {
        r#"<span class="text-slate-500">&#9675; offline</span>"#.to_string()
    }
}
