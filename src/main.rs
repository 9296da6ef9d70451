use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use debris_dodge::compute::{init_state, player_shoot, start_game, steer, tick, PLAYER_SPEED};
use debris_dodge::display;
use debris_dodge::entities::{GameState, GameStatus};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈128 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Start screen ──────────────────────────────────────────────────────────────

enum StartResult {
    Start,
    Quit,
}

/// Shown while the session is idle; blocks until the player starts or quits.
fn show_start_screen<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<StartResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  DEBRIS  DODGE  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let lines: &[(&str, Color)] = &[
        ("Debris drifts in from the right — dodge it or shoot it.", Color::White),
        ("Every hit costs 10 HP.  You get 30 shots.  Outlast the field.", Color::White),
        ("", Color::White),
        ("↑ ↓ ← → : Move   SPACE : Shoot   Q : Quit", Color::DarkGrey),
        ("", Color::White),
        ("Press ENTER or SPACE to start", Color::Green),
    ];
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(
            cx.saturating_sub(msg.chars().count() as u16 / 2),
            row,
        ))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the player makes a choice
    loop {
        if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(StartResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(StartResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to the start screen.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key.  Each frame the four direction keys
/// still "fresh" (within `HOLD_WINDOW` frames) are folded into a velocity,
/// which mirrors keydown-sets / keyup-clears semantics even on terminals
/// that never report key release.  Firing is per key event, so holding
/// Space shoots at the key-repeat rate.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(true);
                        }
                        KeyCode::Char('c')
                            if modifiers.contains(KeyModifiers::CONTROL) =>
                        {
                            return Ok(true);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.status == GameStatus::GameOver =>
                        {
                            return Ok(false);
                        }
                        KeyCode::Char(' ') if state.status == GameStatus::Running => {
                            *state = player_shoot(state);
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp; Space keeps firing on repeat
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                    if code == KeyCode::Char(' ') && state.status == GameStatus::Running {
                        *state = player_shoot(state);
                    }
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if state.status == GameStatus::Running {
            // Fold the held direction keys into this frame's velocity
            let left = is_held(&key_frame, &KeyCode::Left, frame);
            let right = is_held(&key_frame, &KeyCode::Right, frame);
            let up = is_held(&key_frame, &KeyCode::Up, frame);
            let down = is_held(&key_frame, &KeyCode::Down, frame);

            let dx = (right as i32 - left as i32) as f32 * PLAYER_SPEED;
            let dy = (down as i32 - up as i32) as f32 * PLAYER_SPEED;
            *state = steer(state, dx, dy);

            *state = tick(state, &mut rng, frame_start);
        }

        display::render(out, state, Instant::now())?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    loop {
        match show_start_screen(out, rx)? {
            StartResult::Quit => break,
            StartResult::Start => {
                let (width, height) = terminal::size()?;
                let mut state = start_game(&init_state(width, height));
                let quit = game_loop(out, &mut state, rx)?;
                if quit {
                    break;
                }
                // Otherwise back to the start screen
            }
        }
    }
    Ok(())
}
