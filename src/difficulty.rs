//! Difficulty curve: how many enemies and bonuses may be on screen at once.

use rand::Rng;

use crate::config::{BonusReroll, GameConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Difficulty {
    pub max_enemies: usize,
    pub max_bonuses: usize,
}

impl Difficulty {
    pub fn new() -> Self {
        Self { max_enemies: 1, max_bonuses: 0 }
    }

    /// Recomputes both caps from `score`. Returns true when the enemy cap moved.
    pub fn recompute(&mut self, score: f64, config: &GameConfig, rng: &mut impl Rng) -> bool {
        let target = ((score / config.score_per_enemy).ceil().max(0.0) as usize).min(config.max_enemies());
        let changed = target != self.max_enemies;
        if changed {
            log::debug!("enemy cap {} -> {} at score {}", self.max_enemies, target, score as u64);
            self.max_enemies = target;
        }
        if config.bonuses {
            let reroll = match config.bonus_reroll {
                BonusReroll::EveryFrame => true,
                BonusReroll::OnThreshold => changed,
            };
            if reroll {
                self.max_bonuses = roll_bonuses(self.max_enemies, config, rng);
            }
        } else {
            self.max_bonuses = 0;
        }
        changed
    }

    /// A hit makes room for one more bonus, up to the configured cap.
    pub fn on_hit(&mut self, config: &GameConfig) {
        if config.bonuses {
            self.max_bonuses = (self.max_bonuses + 1).min(config.max_bonuses);
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::new()
    }
}

fn roll_bonuses(max_enemies: usize, config: &GameConfig, rng: &mut impl Rng) -> usize {
    let roll = (rng.gen_range(0.0..1.0) * max_enemies as f64 / 2.0).floor() as usize;
    roll.min(config.max_bonuses)
}
