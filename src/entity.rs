//! Movable sprites: enemies, bonuses and the body of the player.

use crate::config::GameConfig;
use crate::error::Result;
use crate::render::{Sprite, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Enemy,
    Player,
    Bonus,
}

impl EntityKind {
    pub fn sprite(self) -> Sprite {
        match self {
            EntityKind::Enemy => Sprite::Enemy,
            EntityKind::Player => Sprite::Player,
            EntityKind::Bonus => Sprite::Bonus,
        }
    }
}

/// Axis-aligned rectangle in playfield pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Strict overlap; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
    pub horizontal_speed: f64, // px/ms
    pub vertical_speed: f64,   // px/ms
}

impl Entity {
    pub fn new(kind: EntityKind, x: f64, y: f64) -> Self {
        Self { kind, x, y, horizontal_speed: 0.0, vertical_speed: 0.0 }
    }

    /// Enemy entering from above the playfield in `lane`, falling at `speed`.
    pub fn enemy(config: &GameConfig, lane: usize, speed: f64) -> Self {
        Self {
            vertical_speed: speed,
            ..Self::new(EntityKind::Enemy, lane as f64 * config.enemy_width, -config.enemy_height)
        }
    }

    /// Bonus entering from below the playfield in `lane`, rising at `speed`.
    pub fn bonus(config: &GameConfig, lane: usize, speed: f64) -> Self {
        Self {
            vertical_speed: -speed,
            ..Self::new(EntityKind::Bonus, lane as f64 * config.bonus_width, config.game_height)
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.x += dt * self.horizontal_speed;
        self.y += dt * self.vertical_speed;
    }

    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.draw_sprite(self.kind.sprite(), self.x, self.y)
    }

    pub fn bounds(&self, config: &GameConfig) -> Rect {
        let (w, h) = config.size_of(self.kind);
        Rect::new(self.x, self.y, w, h)
    }

    /// Collision box. Enemies ignore the transparent band at the top of their
    /// sprite.
    pub fn hitbox(&self, config: &GameConfig) -> Rect {
        let b = self.bounds(config);
        match self.kind {
            EntityKind::Enemy => {
                Rect::new(b.x, b.y + config.enemy_hitbox_top, b.w, b.h - config.enemy_hitbox_top)
            }
            _ => b,
        }
    }
}
