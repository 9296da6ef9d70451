/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle and a timestamp) and
/// returns a brand-new `GameState`.  Side effects are limited to the
/// injected RNG.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::entities::{GameState, GameStatus, Laser, Obstacle, Player};

// ── Tuning constants (terminal-cell units) ───────────────────────────────────

/// Side length of the player's square bounding box.
pub const PLAYER_SIZE: f32 = 4.0;
/// Cells moved per frame per held direction key.
pub const PLAYER_SPEED: f32 = 0.5;

pub const OBSTACLE_SIZE: f32 = 4.0;
/// Leftward drift per frame.
pub const OBSTACLE_SPEED: f32 = 0.4;

pub const LASER_WIDTH: f32 = 2.0;
pub const LASER_HEIGHT: f32 = 1.0;
/// Rightward travel per frame.
pub const LASER_SPEED: f32 = 1.0;

/// Background scroll per frame; the offset wraps after one field width.
pub const BG_SPEED: f32 = 0.2;

pub const START_HP: i32 = 100;
pub const COLLISION_DAMAGE: i32 = 10;
pub const START_AMMO: u32 = 30;

/// Per-frame spawn probability is SPAWN_BASE + score / SPAWN_SCORE_SCALE,
/// so the field gets busier the longer the player survives.
pub const SPAWN_BASE: f64 = 0.02;
pub const SPAWN_SCORE_SCALE: f64 = 5000.0;

/// Frames per score point — one point per nominal second at 60 FPS.
pub const SCORE_INTERVAL: u64 = 60;

/// How long the damage flash stays on screen after a hit.
pub const FLASH_DURATION: Duration = Duration::from_millis(200);

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Strict AABB overlap: each box's near edge must lie strictly before the
/// other's far edge on both axes, so boxes that merely touch do not collide.
fn overlaps(ax: f32, ay: f32, aw: f32, ah: f32, bx: f32, by: f32, bw: f32, bh: f32) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial (idle) state for the given field dimensions.
pub fn init_state(width: u16, height: u16) -> GameState {
    GameState {
        player: Player {
            x: width as f32 / 2.0,
            y: height as f32 / 2.0,
            dx: 0.0,
            dy: 0.0,
            hp: START_HP,
            ammo: START_AMMO,
        },
        obstacles: Vec::new(),
        lasers: Vec::new(),
        bg_x: 0.0,
        score: 0,
        status: GameStatus::Idle,
        frame: 0,
        flash_until: None,
        width,
        height,
    }
}

/// The start trigger: reset score, hp, ammo and all collections, then
/// enter `Running`.  Field dimensions carry over.
pub fn start_game(state: &GameState) -> GameState {
    GameState {
        status: GameStatus::Running,
        ..init_state(state.width, state.height)
    }
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Set the player's velocity for this frame (cells/frame).  The driver
/// calls this once per frame with values derived from the held keys;
/// released axes come through as zero.
pub fn steer(state: &GameState, dx: f32, dy: f32) -> GameState {
    GameState {
        player: Player {
            dx,
            dy,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire a laser from the player's right edge.  With no ammo left the
/// request is silently ignored.
pub fn player_shoot(state: &GameState) -> GameState {
    if state.player.ammo == 0 {
        return state.clone();
    }
    let laser = Laser {
        x: state.player.x + PLAYER_SIZE,
        y: state.player.y + PLAYER_SIZE / 2.0 - LASER_HEIGHT,
    };
    let mut lasers = state.lasers.clone();
    lasers.push(laser);
    GameState {
        lasers,
        player: Player {
            ammo: state.player.ammo - 1,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG and clock are injected) ────────────────

/// Advance the simulation by one frame.  All randomness comes through
/// `rng` so callers control determinism, and `now` anchors the damage
/// flash expiry.  Frames only advance while `Running`.
///
/// Order within a frame: background scroll → spawn → obstacle movement
/// and collision resolution → laser movement → player movement → score
/// timer.  If a collision drops hp to 0 the frame is abandoned at that
/// point: later obstacles keep last frame's positions and lasers do not
/// advance.
pub fn tick(state: &GameState, rng: &mut impl Rng, now: Instant) -> GameState {
    if state.status != GameStatus::Running {
        return state.clone();
    }
    let frame = state.frame + 1;

    // ── 1. Scroll the background ─────────────────────────────────────────────
    let mut bg_x = state.bg_x - BG_SPEED;
    if bg_x <= -(state.width as f32) {
        bg_x = 0.0;
    }

    // ── 2. Maybe spawn an obstacle at the right edge ─────────────────────────
    let mut obstacles = state.obstacles.clone();
    let p = (SPAWN_BASE + state.score as f64 / SPAWN_SCORE_SCALE).min(1.0);
    if rng.gen_bool(p) {
        let y_max = (state.height as f32 - OBSTACLE_SIZE).max(1.0);
        obstacles.push(Obstacle {
            x: state.width as f32,
            y: rng.gen_range(0.0..y_max),
            size: OBSTACLE_SIZE,
        });
    }

    // ── 3. Advance obstacles; resolve laser and player collisions ────────────
    // Single forward pass building a retained set, so removals never alias
    // live indices.  Each laser is consumable once, and each obstacle
    // consumes at most one laser per frame.
    let player = &state.player;
    let mut used_lasers: Vec<usize> = Vec::new();
    let mut survivors: Vec<Obstacle> = Vec::new();
    let mut hp = player.hp;
    let mut flash_until = state.flash_until.filter(|&t| now < t);
    let mut died = false;

    let mut pending = obstacles.into_iter();
    for mut ob in pending.by_ref() {
        ob.x -= OBSTACLE_SPEED;

        let laser_hit = state.lasers.iter().enumerate().find(|(li, l)| {
            !used_lasers.contains(li)
                && overlaps(l.x, l.y, LASER_WIDTH, LASER_HEIGHT, ob.x, ob.y, ob.size, ob.size)
        });
        if let Some((li, _)) = laser_hit {
            used_lasers.push(li);
            continue;
        }

        if overlaps(player.x, player.y, PLAYER_SIZE, PLAYER_SIZE, ob.x, ob.y, ob.size, ob.size) {
            hp -= COLLISION_DAMAGE;
            flash_until = Some(now + FLASH_DURATION);
            if hp <= 0 {
                died = true;
                break;
            }
            continue;
        }

        // Fully past the left edge
        if ob.x + ob.size < 0.0 {
            continue;
        }
        survivors.push(ob);
    }

    if died {
        // Abandon the rest of the frame: unprocessed obstacles keep their
        // previous positions, lasers already consumed stay gone but none
        // advance, and the score timer does not run on the death tick.
        survivors.extend(pending);
        let lasers: Vec<Laser> = state
            .lasers
            .iter()
            .enumerate()
            .filter(|(i, _)| !used_lasers.contains(i))
            .map(|(_, l)| l.clone())
            .collect();
        return GameState {
            player: Player {
                hp: 0,
                ..player.clone()
            },
            obstacles: survivors,
            lasers,
            bg_x,
            status: GameStatus::GameOver,
            frame,
            flash_until,
            ..state.clone()
        };
    }

    // ── 4. Advance surviving lasers; cull past the right edge ────────────────
    let lasers: Vec<Laser> = state
        .lasers
        .iter()
        .enumerate()
        .filter(|(i, _)| !used_lasers.contains(i))
        .map(|(_, l)| Laser {
            x: l.x + LASER_SPEED,
            ..l.clone()
        })
        .filter(|l| l.x <= state.width as f32)
        .collect();

    // ── 5. Move the player and clamp to the field ────────────────────────────
    // min-then-max, so a field smaller than the player pins to 0 instead
    // of panicking on an inverted clamp range
    let px = (player.x + player.dx)
        .min(state.width as f32 - PLAYER_SIZE)
        .max(0.0);
    let py = (player.y + player.dy)
        .min(state.height as f32 - PLAYER_SIZE)
        .max(0.0);

    // ── 6. Score timer: one point per SCORE_INTERVAL frames ──────────────────
    let score = if frame % SCORE_INTERVAL == 0 {
        state.score + 1
    } else {
        state.score
    };

    GameState {
        player: Player {
            x: px,
            y: py,
            hp,
            ..player.clone()
        },
        obstacles: survivors,
        lasers,
        bg_x,
        score,
        status: GameStatus::Running,
        frame,
        flash_until,
        ..state.clone()
    }
}
