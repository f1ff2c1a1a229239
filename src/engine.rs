//! The game engine: owns every entity and runs one frame per `tick`.
//!
//! A frame advances time, updates enemies, bonuses and the player, recomputes
//! difficulty, draws the scene, culls entities that left the playfield, tops the
//! lanes back up and finally resolves collisions. The caller (the browser
//! animation loop) keeps scheduling frames while the game is live, even after a
//! frame reported a drawing error, and stops on [`Frame::GameOver`] until
//! [`Engine::restart`].

use rand::Rng;

use crate::config::{GameConfig, Timestep};
use crate::difficulty::Difficulty;
use crate::entity::Entity;
use crate::error::Result;
use crate::input::KeyAction;
use crate::lanes::LaneSet;
use crate::player::{Player, PlayerState};
use crate::render::{Sprite, Surface};

const HUD_STYLE: &str = "#ffffff";
const HUD_INVINCIBLE_STYLE: &str = "#ff0000";

/// Whether the caller should schedule another frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Frame {
    Running,
    GameOver,
}

pub struct Engine<R: Rng> {
    config: GameConfig,
    rng: R,
    pub player: Player,
    pub enemies: LaneSet<Entity>,
    pub bonuses: LaneSet<Entity>,
    /// Milliseconds of vulnerable play.
    pub score: f64,
    pub difficulty: Difficulty,
    last_frame: f64,
    game_over: bool,
}

impl<R: Rng> Engine<R> {
    pub fn new(config: GameConfig, rng: R, now: f64) -> Result<Self> {
        config.validate()?;
        let mut engine = Self {
            player: Player::new(&config),
            enemies: LaneSet::new(config.enemy_lanes()),
            bonuses: LaneSet::new(config.bonus_lanes()),
            score: 0.0,
            difficulty: Difficulty::new(),
            last_frame: now,
            game_over: false,
            config,
            rng,
        };
        engine.setup_enemies()?;
        Ok(engine)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn last_frame(&self) -> f64 {
        self.last_frame
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Score as shown on the HUD.
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn player_state(&self) -> PlayerState {
        if self.game_over {
            PlayerState::Dead
        } else if self.player.is_invincible() {
            PlayerState::Invincible
        } else {
            PlayerState::Vulnerable
        }
    }

    /// Applies one key press. Returns true when the frame loop must be re-armed.
    pub fn handle_key(&mut self, action: KeyAction, now: f64) -> bool {
        match action {
            KeyAction::Move(direction) => {
                self.player.move_towards(direction, &self.config);
                false
            }
            KeyAction::Restart => self.restart(now),
        }
    }

    /// Starts a new round after a game over. Entities and the player position
    /// carry over; counters reset. Ignored while the player is alive.
    pub fn restart(&mut self, now: f64) -> bool {
        if !self.game_over {
            return false;
        }
        self.player.lives = self.config.starting_lives;
        self.player.invincible_score = self.config.restart_invincibility;
        self.difficulty.max_enemies = 1;
        self.score = 0.0;
        self.last_frame = now;
        self.game_over = false;
        log::info!("restart with {} lives", self.player.lives);
        true
    }

    /// Tops up the enemy lanes to the current cap.
    pub fn setup_enemies(&mut self) -> Result<()> {
        let cfg = &self.config;
        let (lo, hi) = cfg.enemy_speed;
        let filled = self.enemies.fill_to(self.difficulty.max_enemies, &mut self.rng, |lane, rng| {
            Entity::enemy(cfg, lane, lo + rng.r#gen::<f64>() * (hi - lo))
        })?;
        if !filled.is_empty() {
            log::trace!("enemies spawned in lanes {filled:?}");
        }
        Ok(())
    }

    /// Tops up the bonus lanes to the current cap.
    pub fn setup_bonuses(&mut self) -> Result<()> {
        if !self.config.bonuses {
            return Ok(());
        }
        let cfg = &self.config;
        let (lo, hi) = cfg.bonus_speed;
        let filled = self.bonuses.fill_to(self.difficulty.max_bonuses, &mut self.rng, |lane, rng| {
            Entity::bonus(cfg, lane, lo + rng.r#gen::<f64>() * (hi - lo))
        })?;
        if !filled.is_empty() {
            log::trace!("bonuses spawned in lanes {filled:?}");
        }
        Ok(())
    }

    fn frame_delta(&self, now: f64) -> f64 {
        match self.config.timestep {
            Timestep::Fixed { step_ms } => step_ms,
            Timestep::Variable { max_step_ms } => {
                let elapsed = (now - self.last_frame).max(0.0);
                if elapsed > max_step_ms {
                    log::warn!("frame gap of {elapsed:.0}ms clamped to {max_step_ms}ms");
                    max_step_ms
                } else {
                    elapsed
                }
            }
        }
    }

    /// Runs one frame at wall-clock time `now` (ms).
    ///
    /// A drawing failure does not cut the frame short: the simulation still
    /// completes and the first drawing error is returned afterwards.
    pub fn tick(&mut self, now: f64, surface: &mut dyn Surface) -> Result<Frame> {
        if self.game_over {
            return Ok(Frame::GameOver);
        }
        let dt = self.frame_delta(now);

        // Invincibility burns the same clock the score would have used.
        if self.player.is_invincible() {
            self.player.invincible_score -= dt;
            surface.set_fill_style(HUD_INVINCIBLE_STYLE);
        } else {
            self.score += dt;
            surface.set_fill_style(HUD_STYLE);
        }

        self.enemies.values_mut().for_each(|e| e.update(dt));
        self.bonuses.values_mut().for_each(|b| b.update(dt));
        self.player.update_horizontal(dt, &self.config);
        self.player.update_vertical(dt, &self.config);
        self.difficulty.recompute(self.score, &self.config, &mut self.rng);

        let drawn = self.render_scene(surface);

        let game_height = self.config.game_height;
        let bonus_height = self.config.bonus_height;
        self.enemies.retain(|e| e.y <= game_height);
        self.bonuses.retain(|b| b.y + bonus_height >= 0.0);
        self.setup_enemies()?;
        self.setup_bonuses()?;

        if self.check_enemy_hits() {
            self.game_over = true;
            log::info!("game over at score {}", self.display_score());
            return drawn.and(self.render_game_over(surface)).map(|_| Frame::GameOver);
        }

        let drawn = drawn.and(self.render_hud(surface));
        self.last_frame = now;
        if self.config.bonuses {
            self.check_bonus_pickup();
        }
        drawn.map(|_| Frame::Running)
    }

    /// Resolves enemy contact. Returns true when the player died.
    fn check_enemy_hits(&mut self) -> bool {
        let cfg = &self.config;
        let player_box = self.player.body.hitbox(cfg);
        for enemy in self.enemies.values() {
            if self.player.is_invincible() {
                break;
            }
            if !enemy.hitbox(cfg).overlaps(&player_box) {
                continue;
            }
            if self.player.lives == 0 {
                return true;
            }
            self.player.lives -= 1;
            self.player.invincible_score = cfg.hit_invincibility;
            self.difficulty.on_hit(cfg);
            log::info!("hit, {} lives left", self.player.lives);
        }
        false
    }

    fn check_bonus_pickup(&mut self) {
        if self.player.lives == 0 {
            return;
        }
        let cfg = &self.config;
        let player_box = self.player.body.hitbox(cfg);
        let picked = self.bonuses.retain(|b| !b.hitbox(cfg).overlaps(&player_box));
        if picked > 0 {
            self.player.lives += picked as u32;
            log::info!("bonus collected, {} lives", self.player.lives);
        }
    }

    /// Draws every layer even if one fails; reports the first failure.
    fn render_scene(&self, surface: &mut dyn Surface) -> Result<()> {
        let mut drawn = surface.draw_sprite(Sprite::Background, 0.0, 0.0);
        drawn = drawn.and(surface.draw_sprite(Sprite::ScorePanel, self.config.game_width, 0.0));
        for entity in self.enemies.values().chain(self.bonuses.values()) {
            drawn = drawn.and(entity.render(surface));
        }
        drawn.and(self.player.body.render(surface))
    }

    fn render_hud(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.set_font(&self.config.font);
        surface.fill_text(&self.display_score().to_string(), self.config.game_width + 5.0, 30.0)?;
        surface.fill_text(
            &format!("Lives: {}", self.player.lives),
            self.config.app_width - 100.0,
            30.0,
        )
    }

    fn render_game_over(&self, surface: &mut dyn Surface) -> Result<()> {
        surface.set_font(&self.config.font);
        surface.fill_text(
            &format!("{} GAME OVER", self.display_score()),
            self.config.game_width + 5.0,
            30.0,
        )?;
        surface.fill_text(
            "Press Space to Restart",
            self.config.game_width / 2.0,
            self.config.game_height / 2.0,
        )
    }
}
