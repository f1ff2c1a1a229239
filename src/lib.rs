//! Kitten Dodge core crate.
//!
//! A canvas arcade game: steer the player past falling enemies, collect rising
//! bonuses for extra lives, and survive as the enemy count climbs with the
//! score. The game core (`engine` and the modules it drives) is plain Rust and
//! runs natively under `cargo test`; `web` wires it to the browser.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod difficulty;
pub mod engine;
pub mod entity;
pub mod error;
pub mod input;
pub mod lanes;
mod logger;
pub mod player;
pub mod render;
pub mod web;

pub use config::GameConfig;
pub use engine::{Engine, Frame};
pub use error::GameError;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info });
}

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Starts the default (extended) game.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(GameConfig::default())?;
    Ok(())
}

/// Starts the first-release rules: no bonuses, per-frame movement.
#[wasm_bindgen]
pub fn start_classic_game() -> Result<(), JsValue> {
    web::start(GameConfig::classic())?;
    Ok(())
}

/// Starts a game from a JSON-serialized `GameConfig`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    web::start(GameConfig::from_json(json)?)?;
    Ok(())
}
