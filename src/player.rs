//! The player-controlled sprite: velocity ramping on key presses, wall handling
//! and the lives / invincibility counters.

use crate::config::{GameConfig, MoveTuning, PositionModel, Reversal};
use crate::entity::{Entity, EntityKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Damage state derived from the player's counters and the engine's game-over flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Vulnerable,
    Invincible,
    Dead,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Entity,
    pub lives: u32,
    /// Remaining invulnerability, in score units (ms). Positive means invincible.
    pub invincible_score: f64,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let (x, y) = config.player_start;
        Self {
            body: Entity::new(EntityKind::Player, x, y),
            lives: config.starting_lives,
            invincible_score: 0.0,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_score > 0.0
    }

    /// Reacts to one key press. Presses that would push further into a wall the
    /// player already touches are ignored.
    pub fn move_towards(&mut self, direction: Direction, config: &GameConfig) {
        let b = &mut self.body;
        match direction {
            Direction::Left if b.x > 0.0 => {
                b.horizontal_speed = ramp_down(b.horizontal_speed, config.horizontal_tuning)
            }
            Direction::Right if b.x + config.player_width < config.game_width => {
                b.horizontal_speed = ramp_up(b.horizontal_speed, config.horizontal_tuning)
            }
            Direction::Up if b.y > 0.0 => {
                b.vertical_speed = ramp_down(b.vertical_speed, config.vertical_tuning)
            }
            Direction::Down if b.y + config.player_height < config.game_height => {
                b.vertical_speed = ramp_up(b.vertical_speed, config.vertical_tuning)
            }
            _ => {}
        }
    }

    pub fn update_horizontal(&mut self, dt: f64, config: &GameConfig) {
        let max_x = config.player_max_x();
        let b = &mut self.body;
        match config.position_model {
            PositionModel::Clamped => {
                (b.x, b.horizontal_speed) = clamp_step(b.x, b.horizontal_speed * dt, b.horizontal_speed, max_x);
            }
            PositionModel::PerFrame => {
                let next = b.x + b.horizontal_speed;
                if next > 0.0 && next < max_x {
                    b.x = next;
                } else {
                    b.horizontal_speed = js_round(b.horizontal_speed - b.horizontal_speed / 2.0);
                }
                if b.x == 1.0 {
                    b.x = 0.0;
                } else if b.x == max_x - 1.0 {
                    b.x = max_x;
                }
            }
        }
    }

    pub fn update_vertical(&mut self, dt: f64, config: &GameConfig) {
        let max_y = config.player_max_y();
        let b = &mut self.body;
        match config.position_model {
            PositionModel::Clamped => {
                (b.y, b.vertical_speed) = clamp_step(b.y, b.vertical_speed * dt, b.vertical_speed, max_y);
            }
            PositionModel::PerFrame => {
                let next = b.y + b.vertical_speed;
                if next > 0.0 && next < max_y {
                    b.y = next;
                } else {
                    b.vertical_speed = 0.0;
                }
            }
        }
    }
}

fn ramp_down(speed: f64, t: MoveTuning) -> f64 {
    if speed > 0.0 {
        match t.reversal {
            Reversal::Snap => -t.kick,
            Reversal::Brake => speed - t.kick,
        }
    } else {
        (speed - t.step).max(-t.max)
    }
}

fn ramp_up(speed: f64, t: MoveTuning) -> f64 {
    if speed < 0.0 {
        match t.reversal {
            Reversal::Snap => t.kick,
            Reversal::Brake => speed + t.kick,
        }
    } else {
        (speed + t.step).min(t.max)
    }
}

/// Moves `pos` by `delta` inside `[0, max]`; a wall hit stops that axis.
fn clamp_step(pos: f64, delta: f64, speed: f64, max: f64) -> (f64, f64) {
    let next = pos + delta;
    if next < 0.0 {
        (0.0, 0.0)
    } else if next > max {
        (max, 0.0)
    } else {
        (next, speed)
    }
}

/// Rounds half towards positive infinity, like `Math.round`.
fn js_round(v: f64) -> f64 {
    (v + 0.5).floor()
}
