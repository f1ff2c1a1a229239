//! Keyboard mapping. Arrows and WASD move, space restarts.

use crate::player::Direction;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Restart,
}

pub const LEFT_ARROW_CODE: u32 = 37;
pub const UP_ARROW_CODE: u32 = 38;
pub const RIGHT_ARROW_CODE: u32 = 39;
pub const DOWN_ARROW_CODE: u32 = 40;
pub const W_CODE: u32 = 87;
pub const A_CODE: u32 = 65;
pub const S_CODE: u32 = 83;
pub const D_CODE: u32 = 68;
pub const SPACEBAR_CODE: u32 = 32;

impl KeyAction {
    /// From a legacy `keyCode`.
    pub fn from_key_code(code: u32) -> Option<Self> {
        use Direction::*;
        match code {
            LEFT_ARROW_CODE | A_CODE => Some(KeyAction::Move(Left)),
            RIGHT_ARROW_CODE | D_CODE => Some(KeyAction::Move(Right)),
            UP_ARROW_CODE | W_CODE => Some(KeyAction::Move(Up)),
            DOWN_ARROW_CODE | S_CODE => Some(KeyAction::Move(Down)),
            SPACEBAR_CODE => Some(KeyAction::Restart),
            _ => None,
        }
    }

    /// From a DOM `KeyboardEvent.key` value.
    pub fn from_key(key: &str) -> Option<Self> {
        use Direction::*;
        match key {
            "ArrowLeft" | "a" | "A" => Some(KeyAction::Move(Left)),
            "ArrowRight" | "d" | "D" => Some(KeyAction::Move(Right)),
            "ArrowUp" | "w" | "W" => Some(KeyAction::Move(Up)),
            "ArrowDown" | "s" | "S" => Some(KeyAction::Move(Down)),
            " " | "Spacebar" => Some(KeyAction::Restart),
            _ => None,
        }
    }
}
