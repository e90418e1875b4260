use crate::glyph::BACKGROUND;
use crate::Canvas;
use image::imageops::{replace, resize, FilterType};

/// Lay out canvases on a single sheet, e.g. to eyeball a glyph and its variations.
///
/// The cell size is taken from the first canvas; other sizes are resized to it. The sheet is
/// roughly square unless `maxrows` caps the number of rows. Unused cells stay white.
pub fn contact_sheet(canvases: &[Canvas], maxrows: Option<u32>) -> Canvas {
    if canvases.is_empty() {
        return Canvas::new(0, 0);
    }
    let n = canvases.len();
    let mut nrows = ((n as f64).sqrt().floor() as u32).max(1);
    if let Some(maxrows) = maxrows {
        nrows = nrows.min(maxrows.max(1));
    }
    let ncols = (n as f64 / nrows as f64).ceil() as u32;
    let (w, h) = canvases[0].dimensions();
    let mut sheet = Canvas::from_pixel(w * ncols, h * nrows, BACKGROUND);
    for (i, canvas) in canvases.iter().enumerate() {
        let (row, col) = (i as u32 / ncols, i as u32 % ncols);
        let (x, y) = ((col * w) as i64, (row * h) as i64);
        if canvas.dimensions() != (w, h) {
            let resized = resize(canvas, w, h, FilterType::Lanczos3);
            replace(&mut sheet, &resized, x, y);
        } else {
            replace(&mut sheet, canvas, x, y);
        }
    }
    sheet
}
