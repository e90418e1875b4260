use crate::font::{GlyphBox, Rasterizer};
use crate::Canvas;
use image::Luma;
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// A rasterizer that draws every glyph as a solid square with side `size`.
///
/// Spaces have no ink. The square is offset from the layout origin by `(offset_x, offset_y)`,
/// like the bearing of a real glyph.
#[derive(Debug, Clone)]
pub(crate) struct BlockFont {
    pub offset_x: i32,
    pub offset_y: i32,
    /// Squares are never smaller than this
    pub min_side: i32,
}

impl Default for BlockFont {
    fn default() -> Self {
        BlockFont {
            offset_x: 2,
            offset_y: 4,
            min_side: 0,
        }
    }
}

impl Rasterizer for BlockFont {
    fn glyph_box(&self, c: char, size: f32) -> Option<GlyphBox> {
        if c.is_whitespace() {
            return None;
        }
        let side = (size.round() as i32).max(self.min_side);
        Some(GlyphBox {
            min_x: self.offset_x,
            min_y: self.offset_y,
            max_x: self.offset_x + side,
            max_y: self.offset_y + side,
        })
    }

    fn draw(&self, canvas: &mut Canvas, c: char, size: f32, x: i32, y: i32) {
        if let Some(bb) = self.glyph_box(c, size) {
            let rect = Rect::at(x + bb.min_x, y + bb.min_y)
                .of_size(bb.width().max(1) as u32, bb.height().max(1) as u32);
            draw_filled_rect_mut(canvas, rect, Luma([0u8]));
        }
    }
}

/// Bounding box of the pixels darker than 128, as `(min_x, min_y, max_x, max_y)` inclusive.
pub(crate) fn ink_bounds(canvas: &Canvas) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in canvas.enumerate_pixels() {
        if p[0] < 128 {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }
    bounds
}
