// Frame-level gameplay tests (native). A recording surface stands in for the
// canvas so draw order and HUD text can be checked without a browser.

use kitten_dodge::config::{GameConfig, Timestep};
use kitten_dodge::entity::{Entity, EntityKind};
use kitten_dodge::error::Result;
use kitten_dodge::input::KeyAction;
use kitten_dodge::player::{Direction, PlayerState};
use kitten_dodge::render::{Sprite, Surface};
use kitten_dodge::{Engine, Frame, GameError};

use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Sprite(Sprite, f64, f64),
    Text(String, f64, f64),
    Style(String),
    Font(String),
}

#[derive(Default)]
struct Recorder {
    ops: Vec<Op>,
}

impl Recorder {
    fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t, _, _) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn sprites(&self) -> Vec<Sprite> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Sprite(s, _, _) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl Surface for Recorder {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> Result<()> {
        self.ops.push(Op::Sprite(sprite, x, y));
        Ok(())
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.ops.push(Op::Text(text.to_string(), x, y));
        Ok(())
    }
    fn set_fill_style(&mut self, style: &str) {
        self.ops.push(Op::Style(style.to_string()));
    }
    fn set_font(&mut self, font: &str) {
        self.ops.push(Op::Font(font.to_string()));
    }
}

/// Records like `Recorder` but fails to draw the bonus sprite, the way a
/// broken image makes `drawImage` throw.
#[derive(Default)]
struct BrokenBonus {
    rec: Recorder,
}

impl Surface for BrokenBonus {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> Result<()> {
        if sprite == Sprite::Bonus {
            return Err(GameError::Js("InvalidStateError".into()));
        }
        self.rec.draw_sprite(sprite, x, y)
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.rec.fill_text(text, x, y)
    }
    fn set_fill_style(&mut self, style: &str) {
        self.rec.set_fill_style(style);
    }
    fn set_font(&mut self, font: &str) {
        self.rec.set_font(font);
    }
}

const STEP: f64 = 16.0;

fn new_engine(config: GameConfig, seed: u64) -> Engine<SmallRng> {
    Engine::new(config, SmallRng::seed_from_u64(seed), 0.0).unwrap()
}

/// Runs `frames` ticks at 16ms spacing starting after `start`.
fn run(engine: &mut Engine<SmallRng>, start: f64, frames: usize) -> (f64, Frame) {
    let mut now = start;
    let mut frame = Frame::Running;
    for _ in 0..frames {
        now += STEP;
        frame = engine.tick(now, &mut Recorder::default()).unwrap();
        if frame == Frame::GameOver {
            break;
        }
    }
    (now, frame)
}

fn parked_enemy(config: &GameConfig, lane: usize, y: f64) -> Entity {
    let mut e = Entity::enemy(config, lane, 0.0);
    e.y = y;
    e
}

#[test]
fn lanes_hold_at_most_one_entity_and_cap_holds() {
    let mut engine = new_engine(GameConfig::default(), 99);
    // jump straight to a high difficulty
    engine.score = 80_000.0;
    engine.player.lives = 1_000;
    let mut now = 0.0;
    for _ in 0..2_000 {
        now += STEP;
        engine.tick(now, &mut Recorder::default()).unwrap();
        let max = engine.config().max_enemies();
        assert!(engine.difficulty.max_enemies <= max);
        assert!(engine.enemies.len() <= engine.enemies.lanes());
        for (lane, enemy) in engine.enemies.iter() {
            assert_eq!(enemy.x, lane as f64 * engine.config().enemy_width);
        }
        for (lane, bonus) in engine.bonuses.iter() {
            assert_eq!(bonus.x, lane as f64 * engine.config().bonus_width);
        }
    }
    assert_eq!(engine.difficulty.max_enemies, 5);
}

#[test]
fn player_stays_in_bounds_under_input() {
    for config in [GameConfig::extended(), GameConfig::classic()] {
        let mut engine = new_engine(config, 3);
        engine.enemies.clear();
        engine.player.invincible_score = 1.0e9;
        let dirs = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
        let mut now = 0.0;
        for (i, dir) in dirs.iter().cycle().take(400).enumerate() {
            // hold each direction for a while
            for _ in 0..(i % 7) {
                engine.handle_key(KeyAction::Move(*dir), now);
            }
            now += STEP;
            engine.tick(now, &mut Recorder::default()).unwrap();
            let cfg = engine.config();
            let b = &engine.player.body;
            assert!((0.0..=cfg.player_max_x()).contains(&b.x), "x {} out of bounds", b.x);
            assert!((0.0..=cfg.player_max_y()).contains(&b.y), "y {} out of bounds", b.y);
        }
    }
}

#[test]
fn invincibility_freezes_score_then_resumes() {
    let mut engine = new_engine(GameConfig::default(), 1);
    engine.enemies.clear();
    engine.player.invincible_score = 40.0;
    engine.tick(16.0, &mut Recorder::default()).unwrap();
    engine.tick(32.0, &mut Recorder::default()).unwrap();
    assert_eq!(engine.score, 0.0);
    assert_eq!(engine.player_state(), PlayerState::Invincible);
    engine.tick(48.0, &mut Recorder::default()).unwrap();
    assert_eq!(engine.score, 0.0);
    assert!(engine.player.invincible_score <= 0.0);
    assert_eq!(engine.player_state(), PlayerState::Vulnerable);
    engine.tick(64.0, &mut Recorder::default()).unwrap();
    assert_eq!(engine.score, 16.0);
}

#[test]
fn hud_turns_red_while_invincible() {
    let mut engine = new_engine(GameConfig::default(), 1);
    engine.enemies.clear();
    engine.player.invincible_score = 100.0;
    let mut rec = Recorder::default();
    engine.tick(16.0, &mut rec).unwrap();
    assert_eq!(rec.ops[0], Op::Style("#ff0000".into()));
    engine.player.invincible_score = 0.0;
    let mut rec = Recorder::default();
    engine.tick(32.0, &mut rec).unwrap();
    assert_eq!(rec.ops[0], Op::Style("#ffffff".into()));
}

#[test]
fn hit_while_vulnerable_costs_one_life() {
    let cfg = GameConfig::default();
    let mut engine = new_engine(cfg.clone(), 8);
    engine.enemies.clear();
    // lane 3 spans x 225..300, over the player at x 262
    engine.enemies.insert(3, parked_enemy(&cfg, 3, 550.0));
    engine.enemies.insert(4, parked_enemy(&cfg, 4, 550.0));
    let frame = engine.tick(16.0, &mut Recorder::default()).unwrap();
    assert_eq!(frame, Frame::Running);
    assert_eq!(engine.player.lives, 2);
    assert_eq!(engine.player.invincible_score, 1000.0);
    assert_eq!(engine.difficulty.max_bonuses, 1);
    assert_eq!(engine.player_state(), PlayerState::Invincible);

    // still overlapping, but invincible
    engine.tick(32.0, &mut Recorder::default()).unwrap();
    assert_eq!(engine.player.lives, 2);
}

#[test]
fn enemy_hitbox_ignores_top_padding() {
    let cfg = GameConfig::default();
    let mut engine = new_engine(cfg.clone(), 8);
    engine.enemies.clear();
    // enemy sprite spans y 440..596, its hitbox 490..596; the player spans 420..474
    engine.enemies.insert(3, parked_enemy(&cfg, 3, 440.0));
    engine.player.body.y = 420.0;
    engine.tick(16.0, &mut Recorder::default()).unwrap();
    assert_eq!(engine.player.lives, 3);

    let classic = GameConfig { player_start: (225.0, 420.0), ..GameConfig::classic() };
    let mut engine = new_engine(classic.clone(), 8);
    engine.enemies.clear();
    engine.enemies.insert(3, parked_enemy(&classic, 3, 440.0));
    engine.tick(16.0, &mut Recorder::default()).unwrap();
    assert_eq!(engine.player.lives, 2);
}

#[test]
fn hit_with_no_lives_ends_game_and_restart_resets() {
    let cfg = GameConfig::default();
    let mut engine = new_engine(cfg.clone(), 8);
    engine.enemies.clear();
    engine.enemies.insert(3, parked_enemy(&cfg, 3, 550.0));
    engine.player.lives = 0;
    engine.score = 5_000.0;

    let mut rec = Recorder::default();
    let frame = engine.tick(16.0, &mut rec).unwrap();
    assert_eq!(frame, Frame::GameOver);
    assert!(engine.is_game_over());
    assert_eq!(engine.player_state(), PlayerState::Dead);
    assert_eq!(rec.texts(), vec!["5016 GAME OVER", "Press Space to Restart"]);
    // the frame that died does not advance the frame marker
    assert_eq!(engine.last_frame(), 0.0);

    // a dead game does not simulate
    let score = engine.score;
    assert_eq!(engine.tick(32.0, &mut Recorder::default()).unwrap(), Frame::GameOver);
    assert_eq!(engine.score, score);

    assert!(engine.handle_key(KeyAction::Restart, 1_000.0));
    assert_eq!(engine.player.lives, 3);
    assert_eq!(engine.score, 0.0);
    assert_eq!(engine.player.invincible_score, 2000.0);
    assert_eq!(engine.difficulty.max_enemies, 1);
    assert_eq!(engine.last_frame(), 1_000.0);
    assert_eq!(engine.player_state(), PlayerState::Invincible);

    // loop resumes; the enemy is still parked on the player but cannot hurt it yet
    assert_eq!(engine.tick(1_016.0, &mut Recorder::default()).unwrap(), Frame::Running);
    assert_eq!(engine.player.lives, 3);
    // a second restart press while alive does nothing
    assert!(!engine.handle_key(KeyAction::Restart, 1_020.0));
}

#[test]
fn fallen_enemy_is_culled_and_replaced() {
    let cfg = GameConfig::default();
    let mut engine = new_engine(cfg.clone(), 21);
    engine.enemies.clear();
    // keep the player out of lane 0
    engine.player.body.x = cfg.player_max_x();
    let mut e = Entity::enemy(&cfg, 0, 0.25);
    e.y = -156.0;
    engine.enemies.insert(0, e);

    let mut now = 0.0;
    let mut replaced_at = None;
    // slowest enemy needs 856 / 0.25 = 3424ms to pass the bottom
    for frame in 0..(3424 / 16 + 2) {
        now += STEP;
        engine.tick(now, &mut Recorder::default()).unwrap();
        assert_eq!(engine.enemies.len(), 1);
        let enemy = engine.enemies.values().next().unwrap();
        if enemy.y == -156.0 {
            replaced_at = Some(frame);
            break;
        }
        assert!(enemy.y <= cfg.game_height);
    }
    let frame = replaced_at.expect("enemy was never replaced");
    assert!(frame * 16 >= 3424 - 16);
}

#[test]
fn overlapping_bonus_is_picked_up() {
    let cfg = GameConfig::default();
    let mut engine = new_engine(cfg.clone(), 4);
    assert_eq!(engine.player.body.x, 262.0);
    engine.enemies.clear();
    let mut bonus = Entity::bonus(&cfg, 3, 0.0);
    bonus.y = 600.0;
    engine.bonuses.insert(3, bonus);

    engine.tick(16.0, &mut Recorder::default()).unwrap();
    assert_eq!(engine.player.lives, 4);
    assert!(engine.bonuses.get(3).is_none());
}

#[test]
fn classic_rules_never_spawn_bonuses() {
    let mut engine = new_engine(GameConfig::classic(), 4);
    engine.score = 60_000.0;
    engine.player.lives = 1_000;
    run(&mut engine, 0.0, 300);
    assert!(engine.bonuses.is_empty());
    assert_eq!(engine.difficulty.max_bonuses, 0);
}

#[test]
fn bonuses_rise_and_leave_through_the_top() {
    let cfg = GameConfig { timestep: Timestep::Fixed { step_ms: 16.0 }, ..GameConfig::default() };
    let mut engine = new_engine(cfg.clone(), 4);
    engine.enemies.clear();
    engine.player.body.x = 0.0;
    let mut bonus = Entity::bonus(&cfg, 7, 0.25);
    bonus.y = 10.0;
    engine.bonuses.insert(7, bonus);
    engine.tick(16.0, &mut Recorder::default()).unwrap();
    assert!(engine.bonuses.get(7).is_some_and(|b| b.y == 6.0));
    // 6 + 75 px left to climb at 4px per frame
    run(&mut engine, 16.0, 21);
    assert!(engine.bonuses.get(7).is_none_or(|b| b.y == cfg.game_height));
}

#[test]
fn draws_in_fixed_z_order_and_hud() {
    let cfg = GameConfig::default();
    let mut engine = new_engine(cfg.clone(), 2);
    engine.enemies.clear();
    engine.enemies.insert(0, parked_enemy(&cfg, 0, 0.0));
    engine.bonuses.insert(7, Entity::new(EntityKind::Bonus, 525.0, 300.0));
    engine.score = 1_234.0;

    let mut rec = Recorder::default();
    engine.tick(16.0, &mut rec).unwrap();
    assert_eq!(
        rec.sprites(),
        vec![Sprite::Background, Sprite::ScorePanel, Sprite::Enemy, Sprite::Bonus, Sprite::Player]
    );
    assert!(rec.ops.contains(&Op::Sprite(Sprite::ScorePanel, 600.0, 0.0)));
    assert!(rec.ops.contains(&Op::Font("bold 30px Impact".into())));
    assert!(rec.ops.contains(&Op::Text("1250".into(), 605.0, 30.0)));
    assert!(rec.ops.contains(&Op::Text("Lives: 3".into(), 750.0, 30.0)));
}

#[test]
fn draw_failure_still_completes_the_frame() {
    let cfg = GameConfig::default();
    let mut engine = new_engine(cfg.clone(), 6);
    engine.enemies.clear();
    engine.player.body.x = 0.0;
    engine.bonuses.insert(7, Entity::bonus(&cfg, 7, 0.0));
    engine.bonuses.get_mut(7).unwrap().y = 300.0;

    let mut surface = BrokenBonus::default();
    let err = engine.tick(16.0, &mut surface).unwrap_err();
    assert!(matches!(err, GameError::Js(ref m) if m == "InvalidStateError"));
    assert_eq!(engine.score, 16.0);
    assert_eq!(engine.last_frame(), 16.0);
    assert!(!engine.is_game_over());
    // the scene after the failed sprite and the HUD are still drawn
    assert!(surface.rec.sprites().contains(&Sprite::Player));
    assert_eq!(surface.rec.texts(), vec!["16", "Lives: 3"]);
    assert_eq!(engine.enemies.len(), 1);

    // the next frame advances from where the failed one left off
    assert!(engine.tick(32.0, &mut BrokenBonus::default()).is_err());
    assert_eq!(engine.score, 32.0);
    engine.bonuses.clear();
    assert_eq!(engine.tick(48.0, &mut BrokenBonus::default()).unwrap(), Frame::Running);
    assert_eq!(engine.score, 48.0);
}

#[test]
fn draw_failure_on_a_fatal_frame_still_ends_the_game() {
    let cfg = GameConfig::default();
    let mut engine = new_engine(cfg.clone(), 6);
    engine.enemies.clear();
    engine.enemies.insert(3, parked_enemy(&cfg, 3, 550.0));
    engine.bonuses.insert(7, Entity::bonus(&cfg, 7, 0.0));
    engine.player.lives = 0;

    let mut surface = BrokenBonus::default();
    assert!(engine.tick(16.0, &mut surface).is_err());
    assert!(engine.is_game_over());
    assert_eq!(surface.rec.texts(), vec!["16 GAME OVER", "Press Space to Restart"]);
    assert!(engine.handle_key(KeyAction::Restart, 100.0));
    assert!(!engine.is_game_over());
}
