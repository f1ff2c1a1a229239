//! Browser glue: canvas setup, the `requestAnimationFrame` loop and the
//! keyboard listener. All game state lives in a thread-local engine; the frame
//! closure is created once and re-requested while the game is running.

use std::cell::{Cell, RefCell};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, KeyboardEvent, window};

use crate::config::GameConfig;
use crate::engine::Engine;
use crate::error::{GameError, Result};
use crate::input::KeyAction;

pub mod canvas;

use canvas::CanvasSurface;

struct Game {
    engine: Engine<SmallRng>,
    surface: CanvasSurface,
}

thread_local! {
    static GAME: RefCell<Option<Game>> = const { RefCell::new(None) };
    static FRAME: RefCell<Option<Closure<dyn FnMut(f64)>>> = const { RefCell::new(None) };
    // Id of the outstanding animation frame request, if any.
    static PENDING: Cell<Option<i32>> = const { Cell::new(None) };
}

/// Mounts the canvas, builds the engine and starts the frame loop. Calling it
/// again replaces the running game without adding another key listener.
pub fn start(config: GameConfig) -> Result<()> {
    config.validate()?;
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;

    let ctx = canvas::mount(&doc, &config)?;
    let surface = CanvasSurface::new(ctx, &config)?;
    let engine = Engine::new(config, seeded_rng()?, performance_now())?;

    let replaced = GAME.with(|g| g.replace(Some(Game { engine, surface })));
    if replaced.is_none() {
        install_key_listener(&doc)?;
    }
    log::info!("game started");
    request_frame()
}

pub fn performance_now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn seeded_rng() -> Result<SmallRng> {
    let mut seed = [0u8; 8];
    getrandom::getrandom(&mut seed).map_err(|e| GameError::Entropy(e.to_string()))?;
    Ok(SmallRng::seed_from_u64(u64::from_le_bytes(seed)))
}

/// Arms the next animation frame unless one is already pending.
fn request_frame() -> Result<()> {
    if PENDING.with(Cell::get).is_some() {
        return Ok(());
    }
    let win = window().ok_or(GameError::NoWindow)?;
    let id = FRAME.with(|slot| -> Result<i32> {
        let mut slot = slot.borrow_mut();
        let callback = slot.get_or_insert_with(|| Closure::wrap(Box::new(on_frame) as Box<dyn FnMut(f64)>));
        Ok(win.request_animation_frame(callback.as_ref().unchecked_ref())?)
    })?;
    PENDING.with(|p| p.set(Some(id)));
    Ok(())
}

fn on_frame(ts: f64) {
    PENDING.with(|p| p.set(None));
    let outcome = GAME.with(|cell| {
        let mut guard = cell.borrow_mut();
        let game = guard.as_mut()?;
        let frame = game.engine.tick(ts, &mut game.surface);
        Some((frame, game.engine.is_game_over()))
    });
    let Some((frame, game_over)) = outcome else {
        return;
    };
    if let Err(e) = frame {
        log::error!("frame failed: {e}");
    }
    if game_over {
        log::debug!("frame loop halted");
    } else if let Err(e) = request_frame() {
        log::error!("cannot schedule next frame: {e}");
    }
}

fn install_key_listener(doc: &Document) -> Result<()> {
    let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
        let Some(action) = KeyAction::from_key(&evt.key()).or_else(|| KeyAction::from_key_code(evt.key_code()))
        else {
            return;
        };
        // keep arrows and space from scrolling the page
        evt.prevent_default();
        let rearm = GAME.with(|cell| {
            cell.borrow_mut()
                .as_mut()
                .is_some_and(|game| game.engine.handle_key(action, performance_now()))
        });
        if rearm {
            if let Err(e) = request_frame() {
                log::error!("cannot resume after restart: {e}");
            }
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
