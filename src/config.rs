//! Immutable game configuration.
//!
//! Screen size, sprite sizes, speeds and timers (the values a game would usually
//! keep in globals) live in [`GameConfig`], handed to the engine once at
//! construction. Two presets exist: [`GameConfig::classic`] reproduces the first
//! release of the game, [`GameConfig::extended`] (the default) adds bonuses and
//! smooth movement.

use crate::entity::EntityKind;
use crate::error::{GameError, Result};

/// Per-axis input response: each key press nudges velocity by `step`, capped at
/// `max`; pressing against the current direction of travel applies `kick` as
/// chosen by `reversal`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveTuning {
    pub step: f64,
    pub max: f64,
    pub kick: f64,
    pub reversal: Reversal,
}

/// What a key press against the direction of travel does to the speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reversal {
    /// Speed jumps to `kick` in the pressed direction.
    Snap,
    /// Speed moves `kick` towards the pressed direction; several presses may
    /// be needed to turn around.
    Brake,
}

/// How the player's position follows its velocity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionModel {
    /// `speed` is pixels per frame; hitting a wall halves the horizontal speed
    /// and zeroes the vertical one. Positions one pixel from a wall snap to it.
    PerFrame,
    /// `speed` is pixels per millisecond; crossing a wall clamps to it and
    /// zeroes that velocity component.
    Clamped,
}

/// Source of the per-frame time delta.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timestep {
    /// Wall-clock delta, clamped so a suspended tab cannot produce one huge step.
    Variable { max_step_ms: f64 },
    /// Every tick advances exactly `step_ms`, independent of the wall clock.
    Fixed { step_ms: f64 },
}

/// When the bonus cap is re-rolled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusReroll {
    /// Only when the enemy cap changes.
    OnThreshold,
    /// On every tick (visible flicker in the bonus count).
    EveryFrame,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    // --- Canvas / playfield ---
    pub app_width: f64,
    pub app_height: f64,
    pub game_width: f64,
    pub game_height: f64,

    // --- Sprite sizes ---
    pub enemy_width: f64,
    pub enemy_height: f64,
    pub player_width: f64,
    pub player_height: f64,
    pub bonus_width: f64,
    pub bonus_height: f64,
    /// Transparent padding at the top of the enemy sprite, ignored by collision.
    pub enemy_hitbox_top: f64,

    // --- Spawning ---
    /// Enemy downward speed range in px/ms.
    pub enemy_speed: (f64, f64),
    /// Bonus upward speed range in px/ms (magnitude; applied negated).
    pub bonus_speed: (f64, f64),
    pub bonuses: bool,
    pub max_bonuses: usize,
    pub bonus_reroll: BonusReroll,

    // --- Player ---
    pub player_start: (f64, f64),
    pub horizontal_tuning: MoveTuning,
    pub vertical_tuning: MoveTuning,
    pub position_model: PositionModel,
    pub starting_lives: u32,
    pub hit_invincibility: f64,
    pub restart_invincibility: f64,

    // --- Scoring / timing ---
    /// Score needed per additional simultaneous enemy.
    pub score_per_enemy: f64,
    pub timestep: Timestep,

    // --- Presentation ---
    pub asset_root: String,
    pub font: String,
}

impl GameConfig {
    /// The first release: integer speed steps, per-frame movement, no bonuses.
    pub fn classic() -> Self {
        let game_width = 600.0;
        let game_height = 700.0;
        let player_width = 75.0;
        let player_height = 54.0;
        Self {
            app_width: 850.0,
            app_height: 700.0,
            game_width,
            game_height,
            enemy_width: 75.0,
            enemy_height: 156.0,
            player_width,
            player_height,
            bonus_width: 75.0,
            bonus_height: 75.0,
            enemy_hitbox_top: 0.0,
            enemy_speed: (0.25, 0.75),
            bonus_speed: (0.0, 0.25),
            bonuses: false,
            max_bonuses: 0,
            bonus_reroll: BonusReroll::OnThreshold,
            player_start: (2.0 * player_width, game_height - player_height - 10.0),
            horizontal_tuning: MoveTuning { step: 3.0, max: 8.0, kick: 5.0, reversal: Reversal::Snap },
            vertical_tuning: MoveTuning { step: 2.0, max: 6.0, kick: 4.0, reversal: Reversal::Brake },
            position_model: PositionModel::PerFrame,
            starting_lives: 3,
            hit_invincibility: 1000.0,
            restart_invincibility: 2000.0,
            score_per_enemy: 10_000.0,
            timestep: Timestep::Variable { max_step_ms: 100.0 },
            asset_root: "images/".to_string(),
            font: "bold 30px Impact".to_string(),
        }
    }

    /// Smooth fractional movement, bonuses and a padded enemy hitbox.
    pub fn extended() -> Self {
        let base = Self::classic();
        let tuning = MoveTuning { step: 0.05, max: 0.8, kick: 0.1, reversal: Reversal::Snap };
        Self {
            enemy_hitbox_top: 50.0,
            bonuses: true,
            max_bonuses: 2,
            player_start: (
                ((base.game_width - base.player_width) / 2.0).floor(),
                base.game_height - base.player_height - 10.0,
            ),
            horizontal_tuning: tuning,
            vertical_tuning: tuning,
            position_model: PositionModel::Clamped,
            ..base
        }
    }

    /// Parse a JSON document produced by serializing a `GameConfig`.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn size_of(&self, kind: EntityKind) -> (f64, f64) {
        match kind {
            EntityKind::Enemy => (self.enemy_width, self.enemy_height),
            EntityKind::Player => (self.player_width, self.player_height),
            EntityKind::Bonus => (self.bonus_width, self.bonus_height),
        }
    }

    pub fn enemy_lanes(&self) -> usize {
        (self.game_width / self.enemy_width).floor() as usize
    }

    pub fn bonus_lanes(&self) -> usize {
        (self.game_width / self.bonus_width).floor() as usize
    }

    /// Hard ceiling on simultaneous enemies; three lanes always stay open.
    pub fn max_enemies(&self) -> usize {
        self.enemy_lanes().saturating_sub(3)
    }

    /// Largest x the player may occupy.
    pub fn player_max_x(&self) -> f64 {
        self.game_width - self.player_width
    }

    /// Largest y the player may occupy.
    pub fn player_max_y(&self) -> f64 {
        self.game_height - self.player_height
    }

    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("app_width", self.app_width),
            ("app_height", self.app_height),
            ("game_width", self.game_width),
            ("game_height", self.game_height),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("bonus_width", self.bonus_width),
            ("bonus_height", self.bonus_height),
        ];
        for (name, v) in dims {
            if !(v.is_finite() && v > 0.0) {
                return Err(GameError::InvalidConfig(format!("{name} must be positive, got {v}")));
            }
        }
        if self.game_width > self.app_width || self.game_height > self.app_height {
            return Err(GameError::InvalidConfig("playfield larger than canvas".into()));
        }
        if self.player_width > self.game_width || self.player_height > self.game_height {
            return Err(GameError::InvalidConfig("player larger than playfield".into()));
        }
        if !(0.0..self.enemy_height).contains(&self.enemy_hitbox_top) {
            return Err(GameError::InvalidConfig("enemy_hitbox_top outside sprite".into()));
        }
        if self.max_enemies() == 0 {
            return Err(GameError::InvalidConfig(format!(
                "{} enemy lanes leave no room for enemies",
                self.enemy_lanes()
            )));
        }
        if self.bonuses && self.max_bonuses >= self.bonus_lanes() {
            return Err(GameError::InvalidConfig(format!(
                "max_bonuses {} must stay below {} bonus lanes",
                self.max_bonuses,
                self.bonus_lanes()
            )));
        }
        for (name, (lo, hi)) in [("enemy_speed", self.enemy_speed), ("bonus_speed", self.bonus_speed)] {
            if !(lo >= 0.0 && lo <= hi && hi.is_finite()) {
                return Err(GameError::InvalidConfig(format!("{name} range {lo}..{hi} is invalid")));
            }
        }
        for t in [self.horizontal_tuning, self.vertical_tuning] {
            if !(t.step > 0.0 && t.max > 0.0 && t.kick > 0.0) {
                return Err(GameError::InvalidConfig(format!("move tuning {t:?} must be positive")));
            }
        }
        let (sx, sy) = self.player_start;
        if !(0.0..=self.player_max_x()).contains(&sx) || !(0.0..=self.player_max_y()).contains(&sy) {
            return Err(GameError::InvalidConfig("player_start outside playfield".into()));
        }
        if self.score_per_enemy <= 0.0 {
            return Err(GameError::InvalidConfig("score_per_enemy must be positive".into()));
        }
        match self.timestep {
            Timestep::Variable { max_step_ms: ms } | Timestep::Fixed { step_ms: ms } if ms > 0.0 => {}
            other => return Err(GameError::InvalidConfig(format!("{other:?} needs a positive step"))),
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::extended()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(GameConfig::classic().validate().is_ok());
        assert!(GameConfig::extended().validate().is_ok());
    }

    #[test]
    fn test_lane_counts() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.enemy_lanes(), 8);
        assert_eq!(cfg.bonus_lanes(), 8);
        assert_eq!(cfg.max_enemies(), 5);
    }

    #[test]
    fn test_player_start_positions() {
        assert_eq!(GameConfig::classic().player_start, (150.0, 636.0));
        assert_eq!(GameConfig::extended().player_start, (262.0, 636.0));
    }

    #[test]
    fn test_validate_rejects_crowded_lanes() {
        let cfg = GameConfig { enemy_width: 200.0, ..GameConfig::default() };
        assert!(matches!(cfg.validate(), Err(GameError::InvalidConfig(_))));

        let cfg = GameConfig { max_bonuses: 8, ..GameConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timestep() {
        let cfg = GameConfig { timestep: Timestep::Fixed { step_ms: 0.0 }, ..GameConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_json_roundtrip_keeps_preset() {
        let json = serde_json::to_string(&GameConfig::classic()).unwrap();
        let cfg = GameConfig::from_json(&json).unwrap();
        assert_eq!(cfg, GameConfig::classic());
    }
}
