//! Error type shared by the game core and the browser glue.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("canvas has no 2d context")]
    NoContext,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("entropy source unavailable: {0}")]
    Entropy(String),
    /// A spawn cap larger than the number of lanes can never be satisfied.
    #[error("cannot place {cap} entities in {lanes} lanes")]
    LaneExhausted { cap: usize, lanes: usize },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[cfg(feature = "serde_json")]
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
