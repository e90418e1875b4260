use crate::config::FontSize;
use crate::{Canvas, Error};
use image::Luma;
use imageproc::drawing::draw_text_mut;
use log::warn;
use rusttype::{point, Font, Scale};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as outline fonts.
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// Pixel bounding box of a rendered glyph, relative to the layout origin.
///
/// The glyph is laid out with the pen at `(0, ascent)`, so `min_y` is the distance from the top of
/// the line to the top of the ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphBox {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl GlyphBox {
    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    /// True if the box fits inside a `width` x `height` area on both axes.
    pub fn fits(&self, (width, height): (u32, u32)) -> bool {
        self.width() <= width as i32 && self.height() <= height as i32
    }
}

/// Something that can measure and draw single glyphs.
///
/// Implementations must not mutate themselves while rendering, so one font can serve any number
/// of renders.
pub trait Rasterizer {
    /// The ink bounding box of `c` at `size`, or `None` if the glyph has no visible pixels.
    fn glyph_box(&self, c: char, size: f32) -> Option<GlyphBox>;

    /// Draw `c` in black onto `canvas`, with the layout origin at `(x, y)`.
    fn draw(&self, canvas: &mut Canvas, c: char, size: f32, x: i32, y: i32);
}

/// An outline font loaded from a TrueType or OpenType file.
pub struct TrueTypeFont {
    name: String,
    font: Font<'static>,
}

impl TrueTypeFont {
    /// Load the font at `path`. The font name is the lowercased file stem.
    ///
    /// # Errors
    /// [`Error::FontRead`] if the file can not be read, [`Error::FontParse`] if it is not a font.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TrueTypeFont, Error> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| Error::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let name = font_name(path);
        TrueTypeFont::from_bytes(name, data).ok_or_else(|| Error::FontParse {
            path: path.to_path_buf(),
        })
    }

    /// Parse a font from memory. Returns `None` if `data` is not a valid font.
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Option<TrueTypeFont> {
        let font = Font::try_from_vec(data)?;
        Some(TrueTypeFont {
            name: name.into(),
            font,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Rasterizer for TrueTypeFont {
    fn glyph_box(&self, c: char, size: f32) -> Option<GlyphBox> {
        let scale = Scale::uniform(size);
        let ascent = self.font.v_metrics(scale).ascent;
        let bb = self
            .font
            .glyph(c)
            .scaled(scale)
            .positioned(point(0.0, ascent))
            .pixel_bounding_box()?;
        Some(GlyphBox {
            min_x: bb.min.x,
            min_y: bb.min.y,
            max_x: bb.max.x,
            max_y: bb.max.y,
        })
    }

    fn draw(&self, canvas: &mut Canvas, c: char, size: f32, x: i32, y: i32) {
        let mut buf = [0u8; 4];
        let text: &str = c.encode_utf8(&mut buf);
        draw_text_mut(canvas, Luma([0u8]), x, y, Scale::uniform(size), &self.font, text);
    }
}

/// The lowercased file stem of a font path, e.g. `fonts/Arial.ttf` -> `arial`.
pub fn font_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// List the font files in `dir`, sorted by path.
///
/// # Errors
/// [`Error::FontRead`] if the directory can not be read.
pub fn find_font_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>, Error> {
    let dir = dir.as_ref();
    let read_err = |source| Error::FontRead {
        path: dir.to_path_buf(),
        source,
    };
    let mut fonts = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        let is_font = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map_or(false, |ext| FONT_EXTENSIONS.contains(&ext.as_str()));
        if is_font && path.is_file() {
            fonts.push(path);
        }
    }
    fonts.sort();
    Ok(fonts)
}

/// Find the largest font size `<= max` at which `c` fits inside `canvas`.
///
/// The search steps down by one from `max`. It never fails: if nothing fits, the floor of `1.0`
/// is returned and a warning is logged. Glyphs without ink fit at any size.
pub fn fit_font_size<R: Rasterizer + ?Sized>(font: &R, c: char, max: f32, canvas: (u32, u32)) -> f32 {
    let mut size = max.max(1.0);
    loop {
        match font.glyph_box(c, size) {
            None => return size,
            Some(bb) if bb.fits(canvas) => return size,
            Some(_) => {}
        }
        if size <= 1.0 {
            warn!(
                "{:?} does not fit a {}x{} canvas at any size, using size 1",
                c, canvas.0, canvas.1
            );
            return 1.0;
        }
        size = (size - 1.0).max(1.0);
    }
}

impl FontSize {
    /// The concrete size to render `c` at.
    pub fn resolve<R: Rasterizer + ?Sized>(&self, font: &R, c: char, canvas: (u32, u32)) -> f32 {
        match *self {
            FontSize::Fixed(size) => size,
            FontSize::Fit { max } => fit_font_size(font, c, max, canvas),
        }
    }
}
