//! `/api/player/*` routes — login, the score panel, and the
//! localStorage persistence bridge.
//!
//! `state`/`restore` are the write-through/read-through pair the JS worker
//! calls: `state` after every mutating request, `restore` once on page load
//! with whatever localStorage held.

use serde_json::json;

use crate::catalog::ARCHITECTURES;
use crate::game::leaderboard::ranked;
use crate::game::players::{self, restore_records_json, PlayerRecord};
use crate::game::stats;
use crate::routes::util::{get_param, get_u64_param, html_escape, parse_form_body};

/// Shortest nickname accepted at login.
const MIN_NICKNAME_LEN: usize = 2;

fn error_span(message: &str) -> String {
    format!(r#"<span class="text-red-500">{}</span>"#, message)
}

// ── POST /api/player/login ─────────────────────────────────────────

/// Handle POST /api/player/login
/// Body: `nickname={name}&now={epoch ms}`. Creates or resumes the record
/// (case-insensitive) and returns the welcome fragment plus score panel.
pub fn handle_login_post(body: &str) -> String {
    let params = parse_form_body(body);
    let nickname = get_param(&params, "nickname").unwrap_or("").trim();
    let now = get_u64_param(&params, "now");

    if nickname.chars().count() < MIN_NICKNAME_LEN {
        return error_span("Nickname must be at least 2 characters");
    }

    players::with_store_mut(|store| {
        let record = store.create_or_update(nickname, now).clone();
        let mut html = String::with_capacity(512);
        html.push_str(&format!(
            r#"<div class="welcome text-amber-500 font-bold">Welcome, {}!</div>"#,
            html_escape(&record.nickname)
        ));
        html.push_str(&render_score_panel(&record));
        html
    })
}

// ── GET /api/player/score ──────────────────────────────────────────

/// Handle GET /api/player/score
/// Returns the current player's score panel, or a login prompt.
pub fn handle_score_get(_query: &str) -> String {
    players::with_store(|store| match store.current() {
        Some(record) => render_score_panel(record),
        None => r#"<div class="text-slate-400">Enter a nickname to start playing</div>"#.to_string(),
    })
}

fn render_score_panel(record: &PlayerRecord) -> String {
    format!(
        r#"<div class="score-panel flex gap-4 text-sm" id="score-panel"><div><span class="font-bold">{}</span></div><div>Score: <span class="text-amber-500">{}</span></div><div>Correct: {}/{}</div><div>Completed: {}/{}</div></div>"#,
        html_escape(&record.nickname),
        record.score,
        record.correct_count,
        record.attempt_count,
        record.completed_architectures.len(),
        ARCHITECTURES.len()
    )
}

// ── GET /api/leaderboard ───────────────────────────────────────────

/// Handle GET /api/leaderboard
/// The player-facing ranked panel: medals for the top three, the current
/// player's row highlighted and marked.
pub fn handle_leaderboard_get(_query: &str) -> String {
    players::with_store(|store| {
        if store.is_empty() {
            return r#"<div class="text-slate-400 text-center p-4">No players yet — be the first!</div>"#
                .to_string();
        }
        let current = store.current().map(|p| p.nickname.clone());
        let mut html = String::with_capacity(2048);
        html.push_str(
            r#"<div class="leaderboard"><h3 class="font-bold text-amber-500">Leaderboard</h3><ol class="mt-2 space-y-1">"#,
        );
        for entry in ranked(store.records()) {
            let p = entry.record;
            let is_current = current.as_deref() == Some(p.nickname.as_str());
            let medal = match entry.rank {
                1 => "\u{1F947}",
                2 => "\u{1F948}",
                3 => "\u{1F949}",
                _ => "",
            };
            let row_class = if is_current {
                "leaderboard-row current bg-amber-500/20 rounded px-2"
            } else {
                "leaderboard-row px-2"
            };
            html.push_str(&format!(
                r#"<li class="{}"><span class="rank">{}{}</span> <span class="font-bold">{}{}</span> <span class="text-amber-500">{} pts</span> <span class="text-xs text-slate-400">&#10003; {}/{} &middot; {} completed</span></li>"#,
                row_class,
                entry.rank,
                medal,
                html_escape(&p.nickname),
                if is_current { " (you)" } else { "" },
                p.score,
                p.correct_count,
                p.attempt_count,
                p.completed_architectures.len()
            ));
        }
        html.push_str("</ol></div>");
        html
    })
}

// ── GET /api/player/state ──────────────────────────────────────────

/// Handle GET /api/player/state
/// Returns the persistence document (JSON, not HTML) the worker writes to
/// localStorage: all records plus the session code, if one exists.
pub fn handle_state_get(_query: &str) -> String {
    let doc = json!({
        "players": serde_json::from_str::<serde_json::Value>(&players::export_records_json())
            .unwrap_or_else(|_| json!([])),
        "sessionCode": stats::session_code(),
    });
    doc.to_string()
}

// ── POST /api/player/restore ───────────────────────────────────────

/// Handle POST /api/player/restore
/// Body: `players={json array}&sessionCode={code}`, both optional — a
/// first visit posts nothing and gets an empty OK back.
pub fn handle_restore_post(body: &str) -> String {
    let params = parse_form_body(body);
    if let Some(json) = get_param(&params, "players") {
        if let Err(e) = restore_records_json(json) {
            return error_span(&html_escape(&e));
        }
    }
    if let Some(code) = get_param(&params, "sessionCode") {
        stats::restore_session_code(code);
    }
    r#"<span class="text-emerald-400">restored</span>"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::players::{replace_store, with_store, with_store_mut, PlayerStore};
    use crate::game::stats::clear_session_code;

    fn reset() {
        replace_store(PlayerStore::default());
        clear_session_code();
    }

    #[test]
    fn login_creates_record_and_renders_panel() {
        reset();
        let html = handle_login_post("nickname=Nury&now=1000");
        assert!(html.contains("Welcome, Nury!"));
        assert!(html.contains("Score: <span class=\"text-amber-500\">0</span>"));
        with_store(|s| assert_eq!(s.current().unwrap().last_played, 1_000));
        reset();
    }

    #[test]
    fn login_resumes_existing_record() {
        reset();
        with_store_mut(|s| {
            s.create_or_update("Mario", 10);
            s.record_attempt(true, 20);
        });
        let html = handle_login_post("nickname=MARIO&now=30");
        assert!(html.contains("Welcome, Mario!"));
        assert!(html.contains("Correct: 1/1"));
        with_store(|s| assert_eq!(s.records().len(), 1));
        reset();
    }

    #[test]
    fn login_rejects_short_nickname() {
        reset();
        assert!(handle_login_post("nickname=A&now=1").contains("at least 2 characters"));
        assert!(handle_login_post("nickname=+++&now=1").contains("at least 2 characters"));
        with_store(|s| assert!(s.is_empty()));
        reset();
    }

    #[test]
    fn login_escapes_nickname() {
        reset();
        let html = handle_login_post("nickname=%3Cb%3Ehi%3C%2Fb%3E&now=1");
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(!html.contains("<b>hi</b>"));
        reset();
    }

    #[test]
    fn score_panel_denominator_tracks_catalog() {
        reset();
        let html = handle_login_post("nickname=Denom&now=1");
        assert!(html.contains(&format!("Completed: 0/{}", ARCHITECTURES.len())));
        reset();
    }

    #[test]
    fn leaderboard_ranks_and_marks_current_player() {
        reset();
        with_store_mut(|s| {
            s.create_or_update("Top", 0);
            s.record_attempt(true, 0); // 100
            s.create_or_update("Mid", 0);
            s.record_attempt(true, 0);
            s.record_attempt(false, 0); // 50, stays current
        });
        let html = handle_leaderboard_get("");
        assert!(html.find("Top").unwrap() < html.find("Mid").unwrap());
        assert!(html.contains("\u{1F947}")); // gold medal on rank 1
        assert!(html.contains("Mid (you)"));
        assert!(!html.contains("Top (you)"));
        assert!(html.contains("100 pts"));
        reset();
    }

    #[test]
    fn leaderboard_empty_store_invites() {
        reset();
        assert!(handle_leaderboard_get("").contains("No players yet"));
        reset();
    }

    #[test]
    fn score_panel_without_login_prompts() {
        reset();
        assert!(handle_score_get("").contains("Enter a nickname"));
        reset();
    }

    #[test]
    fn state_restore_roundtrip() {
        reset();
        handle_login_post("nickname=Persist&now=123");
        stats::restore_session_code("AWS-TEST-CODE");
        let doc = handle_state_get("");
        assert!(doc.contains("\"Persist\""));
        assert!(doc.contains("AWS-TEST-CODE"));

        reset();
        let parsed: serde_json::Value = serde_json::from_str(&doc).unwrap();
        let players_json = parsed["players"].to_string();
        let code = parsed["sessionCode"].as_str().unwrap();
        let body = format!(
            "players={}&sessionCode={}",
            players_json.replace('&', "%26"),
            code
        );
        assert!(handle_restore_post(&body).contains("restored"));
        with_store(|s| assert_eq!(s.records()[0].nickname, "Persist"));
        assert_eq!(stats::session_code().as_deref(), Some("AWS-TEST-CODE"));
        reset();
    }

    #[test]
    fn restore_empty_body_is_ok() {
        reset();
        assert!(handle_restore_post("").contains("restored"));
        with_store(|s| assert!(s.is_empty()));
        reset();
    }

    #[test]
    fn restore_invalid_players_errors() {
        reset();
        let html = handle_restore_post("players=not-json");
        assert!(html.contains("Invalid players JSON"));
        reset();
    }

    #[test]
    fn state_without_session_code_is_null() {
        reset();
        let doc = handle_state_get("");
        assert!(doc.contains("\"sessionCode\":null"));
        reset();
    }
}
