//! Drawing abstraction between the game core and the canvas.

use crate::error::Result;

/// Every image the game draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    ScorePanel,
    Enemy,
    Player,
    Bonus,
}

impl Sprite {
    pub const ALL: [Sprite; 5] = [
        Sprite::Background,
        Sprite::ScorePanel,
        Sprite::Enemy,
        Sprite::Player,
        Sprite::Bonus,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Sprite::Background => "NetSpace5.png",
            Sprite::ScorePanel => "stars.png",
            Sprite::Enemy => "enemy.png",
            Sprite::Player => "player.png",
            Sprite::Bonus => "bonus.png",
        }
    }
}

/// A 2d drawing target. Implemented over `CanvasRenderingContext2d` in the
/// browser and by recorders in tests.
pub trait Surface {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> Result<()>;
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()>;
    fn set_fill_style(&mut self, style: &str);
    fn set_font(&mut self, font: &str);
}
