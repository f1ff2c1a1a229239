//! Canvas bootstrap and the canvas-backed `Surface`.
use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlImageElement};

use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::render::{Sprite, Surface};

pub const CANVAS_ID: &str = "kd-canvas";
/// Container the canvas is appended to; falls back to `<body>`.
pub const APP_ID: &str = "app";

/// Finds or creates the game canvas and returns its 2d context.
pub fn mount(doc: &Document, config: &GameConfig) -> Result<CanvasRenderingContext2d> {
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()
            .map_err(|_| GameError::MissingElement(format!("#{CANVAS_ID} is not a canvas")))?
    } else {
        let c: HtmlCanvasElement = doc
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| GameError::MissingElement("canvas".into()))?;
        c.set_id(CANVAS_ID);
        c.set_width(config.app_width as u32);
        c.set_height(config.app_height as u32);
        let parent: Element = match doc.get_element_by_id(APP_ID) {
            Some(el) => el,
            None => doc.body().ok_or_else(|| GameError::MissingElement("body".into()))?.into(),
        };
        parent.append_child(&c)?;
        c
    };
    canvas
        .get_context("2d")?
        .ok_or(GameError::NoContext)?
        .dyn_into()
        .map_err(|_| GameError::NoContext)
}

/// Draws onto a 2d canvas context using preloaded sprite images.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<Sprite, HtmlImageElement>,
}

impl CanvasSurface {
    /// Starts loading every sprite the config needs. Images are assumed to be
    /// decoded by the time they are first drawn.
    pub fn new(ctx: CanvasRenderingContext2d, config: &GameConfig) -> Result<Self> {
        let mut images = HashMap::new();
        for sprite in Sprite::ALL {
            if sprite == Sprite::Bonus && !config.bonuses {
                continue;
            }
            let img = HtmlImageElement::new()?;
            img.set_src(&format!("{}{}", config.asset_root, sprite.file_name()));
            images.insert(sprite, img);
        }
        Ok(Self { ctx, images })
    }
}

impl Surface for CanvasSurface {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> Result<()> {
        let img = self
            .images
            .get(&sprite)
            .ok_or_else(|| GameError::MissingElement(sprite.file_name().to_string()))?;
        // Still loading or broken: drawImage would throw InvalidStateError.
        if !img.complete() || img.natural_width() == 0 {
            return Ok(());
        }
        self.ctx.draw_image_with_html_image_element(img, x, y)?;
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<()> {
        self.ctx.fill_text(text, x, y)?;
        Ok(())
    }

    fn set_fill_style(&mut self, style: &str) {
        self.ctx.set_fill_style_str(style);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }
}
