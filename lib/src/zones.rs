use image::math::Rect;
use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::map::map_pixels;
use imageproc::point::Point;
use log::debug;

const RED: Rgb<u8> = Rgb([255, 0, 0]);
const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const ORANGE: Rgb<u8> = Rgb([255, 165, 0]);
const PURPLE: Rgb<u8> = Rgb([128, 0, 128]);
const BLUE: Rgb<u8> = Rgb([0, 0, 255]);

/// Size thresholds and subdivisions used to classify the regions of a puzzle image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneConfig {
    /// Pixels at or below this gray value are ink
    pub threshold: u8,
    /// A region wider and taller than this is the letter grid
    pub grid_min: (u32, u32),
    /// A region wider and taller than this (and not a grid) is the word list
    pub word_list_min: (u32, u32),
    /// Columns and rows of the letter grid
    pub grid_cells: (u32, u32),
    /// Number of words in the word list
    pub words: u32,
    /// Character slots per word
    pub chars_per_word: u32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        ZoneConfig {
            threshold: 150,
            grid_min: (300, 300),
            word_list_min: (100, 300),
            grid_cells: (10, 10),
            words: 10,
            chars_per_word: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneKind {
    Grid,
    WordList,
}

/// A classified region of a puzzle image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub kind: ZoneKind,
    /// Bounding rectangle of the region
    pub area: Rect,
    /// Word rows of a word list, empty for a grid
    pub words: Vec<Rect>,
    /// Letter cells, row by row. For a word list: the character slots of each word in turn.
    pub cells: Vec<Rect>,
}

/// Find the letter grid and the word list in `gray`.
///
/// The image is binarized (dark is foreground), the outermost contours are collected and their
/// bounding boxes classified by size. Zones are returned top to bottom, left to right.
pub fn detect_zones(gray: &GrayImage, config: &ZoneConfig) -> Vec<Zone> {
    let threshold = config.threshold;
    let binary = map_pixels(gray, |_x, _y, p| {
        if p[0] <= threshold {
            Luma([255u8])
        } else {
            Luma([0])
        }
    });
    let mut zones: Vec<Zone> = find_contours::<u32>(&binary)
        .iter()
        .filter(|c| c.parent.is_none() && c.border_type == BorderType::Outer)
        .filter_map(|c| bounding_rect(&c.points))
        .filter_map(|area| classify(area, config))
        .collect();
    zones.sort_by_key(|z| (z.area.y, z.area.x));
    debug!("found {} zones", zones.len());
    zones
}

fn bounding_rect(points: &[Point<u32>]) -> Option<Rect> {
    let first = points.first()?;
    let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
    for p in points.iter() {
        x0 = x0.min(p.x);
        y0 = y0.min(p.y);
        x1 = x1.max(p.x);
        y1 = y1.max(p.y);
    }
    Some(Rect {
        x: x0,
        y: y0,
        width: x1 - x0 + 1,
        height: y1 - y0 + 1,
    })
}

fn classify(area: Rect, config: &ZoneConfig) -> Option<Zone> {
    let larger = |(w, h): (u32, u32)| area.width > w && area.height > h;
    if larger(config.grid_min) {
        let (cols, rows) = config.grid_cells;
        Some(Zone {
            kind: ZoneKind::Grid,
            area,
            words: Vec::new(),
            cells: subdivide(area, cols, rows),
        })
    } else if larger(config.word_list_min) {
        let words = subdivide(area, 1, config.words);
        let cells = words
            .iter()
            .flat_map(|&word| {
                let w = word.width / config.chars_per_word.max(1);
                (0..config.chars_per_word).map(move |j| Rect {
                    x: word.x + j * w,
                    y: word.y,
                    width: w,
                    height: word.height,
                })
            })
            .collect();
        Some(Zone {
            kind: ZoneKind::WordList,
            area,
            words,
            cells,
        })
    } else {
        None
    }
}

/// Split `area` into a `cols` x `rows` lattice of equal cells, row by row.
pub fn subdivide(area: Rect, cols: u32, rows: u32) -> Vec<Rect> {
    let (cols, rows) = (cols.max(1), rows.max(1));
    let (w, h) = (area.width / cols, area.height / rows);
    let mut cells = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            cells.push(Rect {
                x: area.x + j * w,
                y: area.y + i * h,
                width: w,
                height: h,
            });
        }
    }
    cells
}

fn outline(image: &mut RgbImage, rect: Rect, color: Rgb<u8>, thickness: u32) {
    for t in 0..thickness {
        if rect.width <= 2 * t || rect.height <= 2 * t {
            break;
        }
        let r = imageproc::rect::Rect::at((rect.x + t) as i32, (rect.y + t) as i32)
            .of_size(rect.width - 2 * t, rect.height - 2 * t);
        draw_hollow_rect_mut(image, r, color);
    }
}

/// Draw the zones onto a copy of `image`.
///
/// Grid border red with green cells; word list border orange, words purple, character slots blue.
pub fn annotate(image: &RgbImage, zones: &[Zone]) -> RgbImage {
    let mut out = image.clone();
    for zone in zones.iter() {
        match zone.kind {
            ZoneKind::Grid => {
                outline(&mut out, zone.area, RED, 2);
                for &cell in zone.cells.iter() {
                    outline(&mut out, cell, GREEN, 1);
                }
            }
            ZoneKind::WordList => {
                outline(&mut out, zone.area, ORANGE, 2);
                for &word in zone.words.iter() {
                    outline(&mut out, word, PURPLE, 1);
                }
                for &cell in zone.cells.iter() {
                    outline(&mut out, cell, BLUE, 1);
                }
            }
        }
    }
    out
}
