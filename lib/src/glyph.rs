use crate::font::Rasterizer;
use crate::Canvas;
use image::Luma;
use log::debug;

pub const BACKGROUND: Luma<u8> = Luma([255]);

/// What to render: one character at one size on a canvas of fixed dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphSpec {
    pub character: char,
    /// Canvas width and height
    pub canvas_size: (u32, u32),
    pub font_size: f32,
}

/// A blank white canvas.
pub fn blank_canvas((width, height): (u32, u32)) -> Canvas {
    Canvas::from_pixel(width, height, BACKGROUND)
}

/// Render `spec` in black on a white canvas, centered on the glyph's measured bounding box.
///
/// With `center_on_ink` half of the glyph's offset from the layout origin is subtracted, which
/// pulls glyphs with a large left bearing or a low top back towards the middle.
///
/// A glyph without ink yields a blank canvas.
pub fn render_glyph<R: Rasterizer + ?Sized>(font: &R, spec: &GlyphSpec, center_on_ink: bool) -> Canvas {
    let (width, height) = spec.canvas_size;
    let mut canvas = blank_canvas(spec.canvas_size);
    let bb = match font.glyph_box(spec.character, spec.font_size) {
        Some(bb) => bb,
        None => {
            debug!("{:?} has no ink, leaving canvas blank", spec.character);
            return canvas;
        }
    };
    let mut x = (width as i32 - bb.width()).div_euclid(2);
    let mut y = (height as i32 - bb.height()).div_euclid(2);
    if center_on_ink {
        x -= bb.min_x / 2;
        y -= bb.min_y / 2;
    }
    font.draw(&mut canvas, spec.character, spec.font_size, x, y);
    canvas
}
