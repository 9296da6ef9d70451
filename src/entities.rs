/// All game entity types — pure data, no logic.

use std::time::Instant;

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    /// Start screen is showing; no simulation runs.
    Idle,
    Running,
    GameOver,
}

#[derive(Clone, Debug)]
pub struct Player {
    /// Top-left corner of the player's bounding square (fractional cells).
    pub x: f32,
    pub y: f32,
    /// Velocity applied once per frame.  Written only by the input path;
    /// key release resets the matching component to zero.
    pub dx: f32,
    pub dy: f32,
    pub hp: i32,
    pub ammo: u32,
}

/// Debris drifting leftward across the field.  Spawned at the right edge,
/// removed on exit, on a laser hit, or on player contact.
#[derive(Clone, Debug)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// A rightward-travelling player shot.
#[derive(Clone, Debug)]
pub struct Laser {
    pub x: f32,
    pub y: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub lasers: Vec<Laser>,
    /// Background scroll offset; slides left and wraps to 0 after one
    /// full field width, so two tiled copies scroll seamlessly.
    pub bg_x: f32,
    pub score: u32,
    pub status: GameStatus,
    /// Frames elapsed this session; drives the score timer.
    pub frame: u64,
    /// The damage flash stays visible until this instant.
    pub flash_until: Option<Instant>,
    pub width: u16,
    pub height: u16,
}
