//! `/api/admin/*` routes — facilitator dashboard: session stats, the
//! ranked results table, JSON/CSV export, import-merge, and the full reset.
//!
//! Exports are delivered as a `<script>` fragment that assembles a data URL
//! from a base64 payload and clicks a synthetic anchor, so HTMX can trigger
//! a file download from a fragment swap.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;

use crate::game::leaderboard::ranked;
use crate::game::players::{self, parse_import, PlayerRecord};
use crate::game::stats::{self, aggregate};
use crate::game::time::{format_compact, format_iso8601};
use crate::routes::util::{
    csv_cell, get_param, get_u64_param, html_escape, parse_form_body, parse_query,
};

fn error_span(message: &str) -> String {
    format!(r#"<span class="text-red-500">{}</span>"#, message)
}

// ── GET /api/admin/stats ───────────────────────────────────────────

/// Handle GET /api/admin/stats
/// Query: `now={epoch ms}&seed={u64}` (session-code generation inputs).
/// Returns the stat cards plus the session code badge.
pub fn handle_stats_get(query: &str) -> String {
    let params = parse_query(query);
    let now = get_u64_param(&params, "now");
    let seed = get_u64_param(&params, "seed");
    let code = stats::get_or_create_session_code(now, seed);

    let snapshot = players::with_store(|store| aggregate(store.records()));

    let mut html = String::with_capacity(1024);
    html.push_str(r#"<div class="stats-grid grid grid-cols-4 gap-2 text-center">"#);
    for (label, value) in [
        ("Players", snapshot.total_players.to_string()),
        ("Attempts", snapshot.total_attempts.to_string()),
        ("Avg Score", snapshot.avg_score.to_string()),
        ("Completions", snapshot.total_completions.to_string()),
    ] {
        html.push_str(&format!(
            r#"<div class="stat-card bg-slate-800 rounded p-2"><div class="text-2xl font-bold text-amber-500">{}</div><div class="text-xs text-slate-400">{}</div></div>"#,
            value, label
        ));
    }
    html.push_str(r#"</div>"#);
    html.push_str(&format!(
        r#"<div class="session-code mt-2 text-xs text-slate-400">Session: <span class="font-mono">{}</span></div>"#,
        code
    ));
    html
}

// ── GET /api/admin/table ───────────────────────────────────────────

/// Handle GET /api/admin/table
/// Returns the ranked results table. Ordering is score descending, then
/// correct count descending, ties in store order.
pub fn handle_table_get(_query: &str) -> String {
    players::with_store(|store| {
        if store.is_empty() {
            return r#"<div class="text-slate-400 text-center p-4">No players yet</div>"#
                .to_string();
        }
        let mut html = String::with_capacity(2048);
        html.push_str(
            r#"<table class="results w-full text-sm"><thead><tr class="text-left text-slate-400"><th>#</th><th>Nickname</th><th>Score</th><th>Correct</th><th>Attempts</th><th>Architectures</th><th>Last Played</th></tr></thead><tbody>"#,
        );
        for entry in ranked(store.records()) {
            let p = entry.record;
            html.push_str(&format!(
                r#"<tr><td>{}</td><td>{}</td><td class="text-amber-500">{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                entry.rank,
                html_escape(&p.nickname),
                p.score,
                p.correct_count,
                p.attempt_count,
                architectures_cell(p),
                format_compact(p.last_played)
            ));
        }
        html.push_str("</tbody></table>");
        html
    })
}

fn architectures_cell(p: &PlayerRecord) -> String {
    if p.completed_architectures.is_empty() {
        "None".to_string()
    } else {
        html_escape(&p.completed_architectures.join("; "))
    }
}

// ── GET /api/admin/export/json ─────────────────────────────────────

/// Handle GET /api/admin/export/json
/// Query: `now={epoch ms}&seed={u64}`. Triggers a download of
/// `{sessionCode, exportDate, players}` — the shape `import` accepts back.
pub fn handle_export_json_get(query: &str) -> String {
    let params = parse_query(query);
    let now = get_u64_param(&params, "now");
    let seed = get_u64_param(&params, "seed");
    let code = stats::get_or_create_session_code(now, seed);

    let players_value =
        serde_json::from_str::<serde_json::Value>(&players::export_records_json())
            .unwrap_or_else(|_| json!([]));
    let doc = json!({
        "sessionCode": code,
        "exportDate": format_iso8601(now),
        "players": players_value,
    });
    let payload = serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string());
    download_script(
        &format!("aws-game-results-{}.json", code),
        "application/json",
        &payload,
    )
}

// ── GET /api/admin/export/csv ──────────────────────────────────────

/// Handle GET /api/admin/export/csv
/// Query: `now={epoch ms}&seed={u64}`. Triggers a spreadsheet-friendly
/// download: one row per player in leaderboard order, every cell quoted.
pub fn handle_export_csv_get(query: &str) -> String {
    let params = parse_query(query);
    let now = get_u64_param(&params, "now");
    let seed = get_u64_param(&params, "seed");
    let code = stats::get_or_create_session_code(now, seed);

    let mut csv = String::with_capacity(1024);
    csv.push_str("Rank,Nickname,Score,Correct,Attempts,Architectures,Last Played\n");
    players::with_store(|store| {
        for entry in ranked(store.records()) {
            let p = entry.record;
            let architectures = if p.completed_architectures.is_empty() {
                "None".to_string()
            } else {
                p.completed_architectures.join("; ")
            };
            let row = [
                entry.rank.to_string(),
                p.nickname.clone(),
                p.score.to_string(),
                p.correct_count.to_string(),
                p.attempt_count.to_string(),
                architectures,
                format_compact(p.last_played),
            ];
            let quoted: Vec<String> = row.iter().map(|c| csv_cell(c)).collect();
            csv.push_str(&quoted.join(","));
            csv.push('\n');
        }
    });
    download_script(&format!("aws-game-results-{}.csv", code), "text/csv", &csv)
}

fn download_script(filename: &str, mime: &str, payload: &str) -> String {
    let encoded = BASE64.encode(payload);
    format!(
        r#"<script>(function(){{var a=document.createElement('a');a.href='data:{};base64,{}';a.download='{}';document.body.appendChild(a);a.click();a.remove();}})();</script>"#,
        mime, encoded, filename
    )
}

// ── POST /api/admin/import ─────────────────────────────────────────

/// Handle POST /api/admin/import
/// Body: `data={json}` — a bare array or a full export document. Merges
/// without double counting and reports what happened.
pub fn handle_import_post(body: &str) -> String {
    let params = parse_form_body(body);
    let data = get_param(&params, "data").unwrap_or("");
    match parse_import(data) {
        Ok(incoming) => {
            let total = incoming.len();
            let (new, merged) = players::with_store_mut(|store| store.merge_import(incoming));
            format!(
                r#"<span class="text-emerald-400">Imported {} players: {} new, {} merged</span>"#,
                total, new, merged
            )
        }
        Err(e) => error_span(&html_escape(&e)),
    }
}

// ── POST /api/admin/clear ──────────────────────────────────────────

/// Handle POST /api/admin/clear
/// Wipes every record and the session code. The confirmation dialog
/// happens client-side before this is ever posted.
pub fn handle_clear_post(_body: &str) -> String {
    players::with_store_mut(|store| store.clear_all());
    stats::clear_session_code();
    r#"<span class="text-emerald-400">All results cleared</span>"#.to_string()
}
