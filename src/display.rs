/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  The glyph sprites below stand in for
/// the sprite images of a graphical build.

use std::io::Write;
use std::time::Instant;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::compute::PLAYER_SIZE;
use crate::entities::{GameState, GameStatus, Laser, Obstacle};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_STAR: Color = Color::DarkGrey;
const C_OBSTACLE: Color = Color::DarkYellow;
const C_LASER: Color = Color::Yellow;
const C_PLAYER: Color = Color::White;
const C_FLASH: Color = Color::Red;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_AMMO: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

// ── Sprites ───────────────────────────────────────────────────────────────────

/// Right-facing ship, 4×4 cells.  Spaces are transparent.
const PLAYER_SPRITE: [&str; 4] = ["▗▄▖ ", "▐█▌▶", "▐█▌▶", "▝▀▘ "];

/// Tumbling debris chunk, 4×4 cells.
const OBSTACLE_SPRITE: [&str; 4] = ["▛▀▀▜", "▌░░▐", "▌░░▐", "▙▄▄▟"];

const LASER_GLYPHS: &str = "━━";

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.  Layering order matters: background first,
/// then obstacles, lasers, player, damage flash, HUD text, and finally
/// the game-over overlay.  Pure read of state — the expired flash
/// timestamp is pruned by the next tick, not here.
pub fn render<W: Write>(out: &mut W, state: &GameState, now: Instant) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_background(out, state)?;
    for obstacle in &state.obstacles {
        draw_obstacle(out, obstacle, state)?;
    }
    for laser in &state.lasers {
        draw_laser(out, laser, state)?;
    }
    draw_player(out, state)?;
    if state.flash_until.map_or(false, |t| now < t) {
        draw_damage_flash(out, state)?;
    }
    draw_hud(out, state)?;
    draw_controls_hint(out, state)?;

    if state.status == GameStatus::GameOver {
        draw_game_over(out, state)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, state.height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Background ────────────────────────────────────────────────────────────────

/// Scrolling starfield.  Screen column `c` shows tile column
/// `(c + scrolled) mod width`, which is the two-copies-with-wrap scheme
/// expressed as modulo addressing of one deterministic tile.
fn draw_background<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    if state.width == 0 {
        return Ok(());
    }
    out.queue(style::SetForegroundColor(C_STAR))?;
    let scrolled = (-state.bg_x) as i32;
    for row in 0..state.height {
        for col in 0..state.width {
            let src = (col as i32 + scrolled).rem_euclid(state.width as i32);
            if let Some(glyph) = star_at(src as u32, row as u32) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

/// Sparse deterministic star pattern — the background "image".
fn star_at(col: u32, row: u32) -> Option<&'static str> {
    let h = col
        .wrapping_mul(2_654_435_761)
        .wrapping_add(row.wrapping_mul(40_503));
    match h % 89 {
        0 => Some("·"),
        1 => Some("✦"),
        _ => None,
    }
}

// ── Sprite plumbing ───────────────────────────────────────────────────────────

/// Print one sprite row with per-cell clipping at the field edges.
/// Spaces in the row are skipped so sprites keep ragged outlines.
fn draw_glyphs<W: Write>(
    out: &mut W,
    x: i32,
    y: i32,
    row: &str,
    state: &GameState,
) -> std::io::Result<()> {
    if y < 0 || y >= state.height as i32 {
        return Ok(());
    }
    for (i, ch) in row.chars().enumerate() {
        let cx = x + i as i32;
        if ch == ' ' || cx < 0 || cx >= state.width as i32 {
            continue;
        }
        out.queue(cursor::MoveTo(cx as u16, y as u16))?;
        out.queue(Print(ch))?;
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_obstacle<W: Write>(
    out: &mut W,
    obstacle: &Obstacle,
    state: &GameState,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_OBSTACLE))?;
    let x = obstacle.x.round() as i32;
    let y = obstacle.y.round() as i32;
    for (i, row) in OBSTACLE_SPRITE.iter().enumerate() {
        draw_glyphs(out, x, y + i as i32, row, state)?;
    }
    Ok(())
}

fn draw_laser<W: Write>(out: &mut W, laser: &Laser, state: &GameState) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_LASER))?;
    draw_glyphs(
        out,
        laser.x.round() as i32,
        laser.y.round() as i32,
        LASER_GLYPHS,
        state,
    )
}

fn draw_player<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    let x = state.player.x.round() as i32;
    let y = state.player.y.round() as i32;
    for (i, row) in PLAYER_SPRITE.iter().enumerate() {
        draw_glyphs(out, x, y + i as i32, row, state)?;
    }
    Ok(())
}

/// Red ring centred on the player, aspect-corrected for the roughly 2:1
/// cell shape so it reads as a circle.
fn draw_damage_flash<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_FLASH))?;
    let cx = state.player.x + PLAYER_SIZE / 2.0;
    let cy = state.player.y + PLAYER_SIZE / 2.0;
    let r = PLAYER_SIZE;

    let row_lo = (cy - r).floor() as i32;
    let row_hi = (cy + r).ceil() as i32;
    let col_lo = (cx - 2.0 * r).floor() as i32;
    let col_hi = (cx + 2.0 * r).ceil() as i32;

    for row in row_lo..=row_hi {
        if row < 0 || row >= state.height as i32 {
            continue;
        }
        for col in col_lo..=col_hi {
            if col < 0 || col >= state.width as i32 {
                continue;
            }
            let dx = (col as f32 - cx) / 2.0;
            let dy = row as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if (dist - r).abs() <= 0.5 {
                out.queue(cursor::MoveTo(col as u16, row as u16))?;
                out.queue(Print("░"))?;
            }
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>6}", state.score)))?;

    // HP — centre, coloured by how much is left
    let hp_text = format!("HP: {:>3}", state.player.hp);
    let hp_color = if state.player.hp > 60 {
        Color::Green
    } else if state.player.hp > 30 {
        Color::Yellow
    } else {
        Color::Red
    };
    let hx = (state.width / 2).saturating_sub(hp_text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(hx, 0))?;
    out.queue(style::SetForegroundColor(hp_color))?;
    out.queue(Print(&hp_text))?;

    // Ammo — right
    let ammo_text = format!("Ammo: {:>2}", state.player.ammo);
    let ax = state
        .width
        .saturating_sub(ammo_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(ax, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_AMMO))?;
    out.queue(Print(&ammo_text))?;

    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, state.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ ← → : Move   SPACE : Shoot   Q : Quit"))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", state.score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (&score_line, Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = state.width / 2;
    let start_row = (state.height / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
