//! `/api/game/*` routes — board rendering, placement, and verification.
//!
//! The drag layer lives in JS: dragstart/drop handlers on the rendered
//! fragments post back here (`/api/game/place`, `/api/game/remove`) and
//! swap the returned board HTML. After any mutating POST the worker bridge
//! re-persists the player store to localStorage.

use crate::catalog::{self, Architecture, COMPONENTS};
use crate::game::session::{self, GameSession};
use crate::game::verify::{run_verification, Verdict};
use crate::game::{players, sync};
use crate::routes::util::{get_param, get_u64_param, html_escape, parse_form_body};

const FEEDBACK_CORRECT: &str = "CORRECT! \u{1F389}";
const FEEDBACK_INCORRECT: &str = "Incorrect. Try again";
const FEEDBACK_MISSING: &str = "Missing components!";
const FEEDBACK_ALL_DONE: &str = "You completed every architecture! \u{1F3C6}";

/// Milliseconds the verdict stays on screen before the board advances.
const ADVANCE_DELAY_MS: u32 = 4000;

fn error_span(message: &str) -> String {
    format!(r#"<span class="text-red-500">{}</span>"#, message)
}

// ── GET /api/game/board ────────────────────────────────────────────

/// Handle GET /api/game/board
/// Returns the full board for the active architecture: header, use case,
/// and the slot row. Swapped into `#game-board`.
pub fn handle_board_get(_query: &str) -> String {
    session::with_session(render_board)
}

/// Render the board fragment for the given session.
pub fn render_board(sess: &GameSession) -> String {
    let arch = sess.architecture();

    let mut html = String::with_capacity(4096);
    html.push_str(r#"<div class="w-full">"#);

    // Header
    html.push_str(&format!(
        r#"<h2 class="text-xl font-bold text-amber-500">{} {}</h2>"#,
        arch.icon, arch.name
    ));

    // Use case panel
    html.push_str(r#"<div class="use-case mt-2 p-3 bg-slate-800 rounded-lg">"#);
    html.push_str(&format!(
        r#"<p class="font-bold">{}</p>"#,
        arch.use_case.title
    ));
    html.push_str(&format!(
        r#"<p class="text-sm text-slate-300">{}</p>"#,
        arch.use_case.scenario
    ));
    html.push_str(&format!(
        r#"<p class="text-xs text-emerald-400 mt-1">{}</p>"#,
        arch.use_case.benefits
    ));
    html.push_str(r#"</div>"#);

    // Slot row with arrows between slots
    html.push_str(r#"<div class="slots flex items-center gap-2 mt-4">"#);
    for (i, slot) in arch.slots.iter().enumerate() {
        render_slot(&mut html, sess, arch, slot.id);
        if i + 1 < arch.slots.len() {
            html.push_str(r#"<div class="arrow text-2xl text-slate-500">&rarr;</div>"#);
        }
    }
    html.push_str(r#"</div>"#);

    html.push_str(r#"</div>"#);
    html
}

fn render_slot(html: &mut String, sess: &GameSession, arch: &Architecture, slot_id: &str) {
    // Caller iterates arch.slots, so the lookup always succeeds.
    let Some(slot) = arch.slot(slot_id) else {
        return;
    };

    match sess.placed(slot.id) {
        Some(name) => {
            let icon = catalog::find_component(name).map(|c| c.icon).unwrap_or("");
            html.push_str(&format!(
                r#"<div class="slot filled rounded-lg border-2 border-amber-500 p-2" data-slot-id="{}">"#,
                slot.id
            ));
            // Click removes the occupant and re-renders the board.
            html.push_str(&format!(
                "<button class=\"component\" hx-post=\"/api/game/remove\" hx-vals='{{\"slot\":\"{}\"}}' hx-target=\"#game-board\" hx-swap=\"innerHTML\">",
                slot.id
            ));
            html.push_str(&format!(
                r#"<img src="{}" alt="{}" onerror="this.style.display='none'"><div>{}</div>"#,
                icon, name, name
            ));
            html.push_str("</button></div>");
        }
        None => {
            html.push_str(&format!(
                r#"<div class="slot rounded-lg border-2 border-dashed border-slate-500 p-2" data-slot-id="{}"><div class="slot-label text-slate-400">{}</div></div>"#,
                slot.id, slot.label
            ));
        }
    }
}

// ── GET /api/game/palette ──────────────────────────────────────────

/// Handle GET /api/game/palette
/// Returns the draggable component grid. Rendered once at startup.
pub fn handle_palette_get(_query: &str) -> String {
    let mut html = String::with_capacity(2048);
    html.push_str(r#"<div class="components-grid grid grid-cols-2 gap-2">"#);
    for component in COMPONENTS {
        html.push_str(&format!(
            r#"<div class="component cursor-grab rounded border border-slate-600 p-2" draggable="true" data-component="{}"><img src="{}" alt="{}" onerror="this.style.display='none'"><div>{}</div></div>"#,
            component.name, component.icon, component.name, component.name
        ));
    }
    html.push_str(r#"</div>"#);
    html
}

// ── POST /api/game/place ───────────────────────────────────────────

/// Handle POST /api/game/place
/// Body: `slot={id}&component={name}`. Rejects unknown slots and unknown
/// components; on success returns the re-rendered board.
pub fn handle_place_post(body: &str) -> String {
    let params = parse_form_body(body);
    let slot = get_param(&params, "slot").unwrap_or("");
    let component = get_param(&params, "component").unwrap_or("");
    if slot.is_empty() || component.is_empty() {
        return error_span("Missing slot or component parameter");
    }
    session::with_session_mut(|sess| match sess.place(slot, component) {
        Ok(()) => render_board(sess),
        Err(e) => error_span(&html_escape(&e)),
    })
}

// ── POST /api/game/remove ──────────────────────────────────────────

/// Handle POST /api/game/remove
/// Body: `slot={id}`. Clearing an empty slot is a no-op.
pub fn handle_remove_post(body: &str) -> String {
    let params = parse_form_body(body);
    let slot = get_param(&params, "slot").unwrap_or("");
    if slot.is_empty() {
        return error_span("Missing slot parameter");
    }
    session::with_session_mut(|sess| {
        sess.remove(slot);
        render_board(sess)
    })
}

// ── POST /api/game/verify ──────────────────────────────────────────

/// Handle POST /api/game/verify
/// Body: `now={epoch ms}`. Judges the board, applies the verdict to the
/// player store, and returns the feedback fragment. A correct (and not
/// final) verdict embeds a delayed self-firing advance trigger.
pub fn handle_verify_post(body: &str) -> String {
    let params = parse_form_body(body);
    let now = get_u64_param(&params, "now");

    // Timer expiry freezes verification in the synchronized variant.
    if let Some(timer) = sync::timer() {
        if timer.remaining_seconds(now) == 0 {
            return error_span("Time is up! Check your results in the admin panel");
        }
    }

    let verdict = session::with_session(|sess| {
        players::with_store_mut(|store| run_verification(sess, store, now))
    });

    match verdict {
        Verdict::Incomplete => format!(
            r#"<div class="feedback incorrect text-red-400">{}</div>"#,
            FEEDBACK_MISSING
        ),
        Verdict::Incorrect => format!(
            r#"<div class="feedback incorrect text-red-400">{}</div>"#,
            FEEDBACK_INCORRECT
        ),
        Verdict::Correct { finished } => {
            let arch = session::with_session(|s| *s.architecture());
            let mut html = String::with_capacity(1024);
            html.push_str(r#"<div class="feedback correct text-emerald-400">"#);
            html.push_str(&format!("<div>{}</div>", FEEDBACK_CORRECT));
            html.push_str(&format!(
                r#"<div class="reference-link mt-2"><p class="text-sm">{}</p><a class="underline" href="{}" target="_blank" rel="noopener noreferrer">Official reference &rarr;</a></div>"#,
                arch.description, arch.reference_url
            ));
            if finished {
                html.push_str(&format!(
                    r#"<div class="mt-2 font-bold">{}</div>"#,
                    FEEDBACK_ALL_DONE
                ));
            } else {
                // The verdict stays visible, then the board advances.
                html.push_str(&format!(
                    "<div hx-post=\"/api/game/advance\" hx-trigger=\"load delay:{}ms\" hx-target=\"#game-board\" hx-swap=\"innerHTML\"></div>",
                    ADVANCE_DELAY_MS
                ));
            }
            html.push_str("</div>");
            html
        }
    }
}

// ── POST /api/game/advance ─────────────────────────────────────────

/// Handle POST /api/game/advance
/// Moves to the next architecture in catalog order; at the last one the
/// completion message renders instead.
pub fn handle_advance_post(_body: &str) -> String {
    session::with_session_mut(|sess| {
        if sess.advance() {
            render_board(sess)
        } else {
            format!(
                r#"<div class="feedback correct text-emerald-400">{}</div>"#,
                FEEDBACK_ALL_DONE
            )
        }
    })
}

// ── POST /api/game/select ──────────────────────────────────────────

/// Handle POST /api/game/select
/// Body: `arch={index}`. Switches the board, discarding placements.
pub fn handle_select_post(body: &str) -> String {
    let params = parse_form_body(body);
    let index: usize = match get_param(&params, "arch").and_then(|v| v.parse().ok()) {
        Some(i) => i,
        None => return error_span("Missing or invalid arch parameter"),
    };
    session::with_session_mut(|sess| match sess.load_architecture(index) {
        Ok(()) => render_board(sess),
        Err(e) => error_span(&html_escape(&e)),
    })
}

// ── POST /api/game/reset ───────────────────────────────────────────

/// Handle POST /api/game/reset
/// Clears all placements on the current board.
pub fn handle_reset_post(_body: &str) -> String {
    session::with_session_mut(|sess| {
        sess.reset_placements();
        render_board(sess)
    })
}
