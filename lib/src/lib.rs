//! Synthetic training data for letter classifiers.
//!
//! This library renders alphabet characters from font files onto small grayscale canvases and
//! produces randomly perturbed copies of them (rotation, blur, erasure, noise). The output is
//! bucketed by lowercase letter, ready for a case-insensitive classifier.
//!
//! # Basic usage
//! ```no_run
//! # use glyph_augment::{Generator, GeneratorConfig, Error};
//! let config = GeneratorConfig {
//!     font_dir: "fonts".into(),
//!     output_dir: "images".into(),
//!     variation_count: 3,
//!     ..GeneratorConfig::wide()
//! };
//! let summary = Generator::new(config)?.run()?;
//! println!("wrote {} files", summary.files);
//! # Ok::<(), Error>(())
//! ```
//! With a font directory holding only `Arial.ttf` and the alphabet `"Aa"` this writes:
//!
//! ```text
//! images/a/a_cap_arial.png
//! images/a/a_cap_arial_variation_0.png
//! images/a/a_cap_arial_variation_1.png
//! images/a/a_cap_arial_variation_2.png
//! images/a/a_low_arial.png
//! images/a/a_low_arial_variation_0.png
//! images/a/a_low_arial_variation_1.png
//! images/a/a_low_arial_variation_2.png
//! ```
//!
//! The crate also carries the two helper tools of the experiment: [`zones`] finds the letter grid
//! and word list of a puzzle image, and [`Labeler`] sorts images by hand, one keystroke each.

pub mod augment;
mod config;
mod error;
pub mod font;
mod generator;
mod glyph;
mod labeler;
mod sheet;
#[cfg(test)]
mod test_utils;
pub mod zones;

/// A fixed-size single-channel training image.
pub type Canvas = image::GrayImage;

pub use augment::{Pipeline, Transform};
pub use config::{FontSize, GeneratorConfig, LATIN_ALPHABET};
pub use error::Error;
pub use font::{fit_font_size, GlyphBox, Rasterizer, TrueTypeFont};
pub use generator::{
    bucket_name, canonical_file_name, render_with_config, variation_file_name, Case,
    GenerationSummary, Generator,
};
pub use glyph::{blank_canvas, render_glyph, GlyphSpec, BACKGROUND};
pub use labeler::{KeySource, LabelSummary, Labeler, IMAGE_EXTENSIONS};
pub use sheet::contact_sheet;
pub use zones::{annotate, detect_zones, Zone, ZoneConfig, ZoneKind};
