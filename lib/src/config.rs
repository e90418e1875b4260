use crate::Error;
use image::ImageFormat;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// The 26 letters of the latin alphabet in both cases, uppercase first.
pub const LATIN_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// How the font size of a rendered glyph is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    /// Always render at this size (in pixels).
    Fixed(f32),
    /// Use the largest size `<= max` at which the glyph fits the canvas.
    Fit { max: f32 },
}

impl FontSize {
    fn is_valid(&self) -> bool {
        match *self {
            FontSize::Fixed(size) => size > 0.0,
            FontSize::Fit { max } => max >= 1.0,
        }
    }
}

/// Configuration of a dataset generation run.
///
/// [`GeneratorConfig::default`] is the narrow preset: mild rotation, no erasure, ten variations
/// per glyph and no canonical image. [`GeneratorConfig::wide`] is the wide preset.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Directory scanned for `ttf`, `otf` and `ttc` files
    pub font_dir: PathBuf,
    /// Root of the bucketed output tree
    pub output_dir: PathBuf,
    /// Canvas width and height
    pub canvas_size: (u32, u32),
    /// Characters to render, case-sensitive
    pub alphabet: String,
    /// Number of perturbed copies per glyph
    pub variation_count: usize,
    /// Maximum rotation in degrees; angles are drawn from `-max..=max`
    pub rotation_range: f32,
    pub blur_probability: f64,
    /// Gaussian blur radius (sigma) range
    pub blur_radius_range: RangeInclusive<f32>,
    /// Probability of the erasure artifact; `0.0` disables it
    pub erase_probability: f64,
    /// Side length range of the erased rectangle
    pub erase_size_range: RangeInclusive<u32>,
    pub noise_probability: f64,
    pub noise_stddev: f64,
    pub font_size: FontSize,
    /// Subtract half of the glyph's bearing offset when centering
    pub center_on_ink: bool,
    /// Also write the unperturbed glyph image
    pub save_canonical: bool,
    /// Drop lowercase characters from the alphabet
    pub uppercase_only: bool,
    /// Output file extension, also selects the encoder
    pub extension: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            font_dir: PathBuf::from("fonts"),
            output_dir: PathBuf::from("images"),
            canvas_size: (32, 32),
            alphabet: String::from(LATIN_ALPHABET),
            variation_count: 10,
            rotation_range: 15.0,
            blur_probability: 0.5,
            blur_radius_range: 0.5..=1.3,
            erase_probability: 0.0,
            erase_size_range: 2..=8,
            noise_probability: 0.5,
            noise_stddev: 25.0,
            font_size: FontSize::Fixed(24.0),
            center_on_ink: false,
            save_canonical: false,
            uppercase_only: false,
            extension: String::from("png"),
        }
    }
}

impl GeneratorConfig {
    /// The wide preset: strong rotation, erasure artifacts, five variations and the canonical
    /// image saved next to them.
    pub fn wide() -> Self {
        GeneratorConfig {
            variation_count: 5,
            rotation_range: 75.0,
            erase_probability: 0.3,
            save_canonical: true,
            ..GeneratorConfig::default()
        }
    }

    /// The characters that will actually be rendered, in alphabet order.
    pub fn characters(&self) -> Vec<char> {
        self.alphabet
            .chars()
            .filter(|c| !(self.uppercase_only && c.is_lowercase()))
            .collect()
    }

    /// Check that every parameter is in range.
    ///
    /// # Errors
    /// [`Error::InvalidConfig`] naming the first offending parameter.
    pub fn validate(&self) -> Result<(), Error> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));
        let (w, h) = self.canvas_size;
        if w == 0 || h == 0 {
            return invalid("canvas size must be non-zero");
        }
        let characters = self.characters();
        if characters.is_empty() {
            return invalid("alphabet is empty");
        }
        for (i, &c) in characters.iter().enumerate() {
            if c.is_whitespace() || c.is_control() || matches!(c, '.' | '/' | '\\') {
                return Err(Error::InvalidConfig(format!("{:?} cannot name a bucket directory", c)));
            }
            if characters[..i].contains(&c) {
                return Err(Error::InvalidConfig(format!("{:?} appears twice in the alphabet", c)));
            }
        }
        for (name, p) in [
            ("blur_probability", self.blur_probability),
            ("erase_probability", self.erase_probability),
            ("noise_probability", self.noise_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfig(format!("{} must be in [0, 1], got {}", name, p)));
            }
        }
        if !(self.rotation_range.is_finite() && self.rotation_range >= 0.0) {
            return invalid("rotation_range must be finite and not negative");
        }
        let (blur_min, blur_max) = (*self.blur_radius_range.start(), *self.blur_radius_range.end());
        if !(blur_min > 0.0 && blur_min <= blur_max && blur_max.is_finite()) {
            return invalid("blur_radius_range must be a non-empty finite positive range");
        }
        if self.erase_size_range.is_empty() {
            return invalid("erase_size_range is empty");
        }
        if !(self.noise_stddev.is_finite() && self.noise_stddev >= 0.0) {
            return invalid("noise_stddev must be finite and not negative");
        }
        if !self.font_size.is_valid() {
            return invalid("font size must be positive");
        }
        if ImageFormat::from_extension(&self.extension).is_none() {
            return Err(Error::InvalidConfig(format!("unknown image extension {:?}", self.extension)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(GeneratorConfig::wide().validate().is_ok());
        assert_eq!(GeneratorConfig::default().erase_probability, 0.0);
        assert_eq!(GeneratorConfig::wide().rotation_range, 75.0);
    }

    #[test]
    fn test_uppercase_only() {
        let config = GeneratorConfig {
            alphabet: String::from("AbC1d"),
            uppercase_only: true,
            ..GeneratorConfig::default()
        };
        assert_eq!(config.characters(), vec!['A', 'C', '1']);
    }

    #[test]
    fn test_validate_rejects() {
        let bad = [
            GeneratorConfig {
                canvas_size: (0, 32),
                ..GeneratorConfig::default()
            },
            GeneratorConfig {
                alphabet: String::from("ab"),
                uppercase_only: true,
                ..GeneratorConfig::default()
            },
            GeneratorConfig {
                noise_probability: 1.5,
                ..GeneratorConfig::default()
            },
            GeneratorConfig {
                blur_radius_range: 0.0..=1.0,
                ..GeneratorConfig::default()
            },
            GeneratorConfig {
                font_size: FontSize::Fit { max: 0.5 },
                ..GeneratorConfig::default()
            },
        ];
        for config in bad.iter() {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "{:?}", config);
        }
    }

    #[test]
    fn test_validate_rejects_unusable_alphabet() {
        for alphabet in ["AbA", "..", "a/b", "a\\b", "A B", "A\tB", "x\u{7}"] {
            let config = GeneratorConfig {
                alphabet: String::from(alphabet),
                ..GeneratorConfig::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "{:?}", alphabet);
        }
        // Duplicates only count among the characters that are rendered.
        let config = GeneratorConfig {
            alphabet: String::from("AaBa"),
            uppercase_only: true,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_infinite_values() {
        let bad = [
            GeneratorConfig {
                rotation_range: f32::INFINITY,
                ..GeneratorConfig::default()
            },
            GeneratorConfig {
                blur_radius_range: 0.5..=f32::INFINITY,
                ..GeneratorConfig::default()
            },
            GeneratorConfig {
                noise_stddev: f64::INFINITY,
                ..GeneratorConfig::default()
            },
            GeneratorConfig {
                rotation_range: f32::NAN,
                ..GeneratorConfig::default()
            },
        ];
        for config in bad.iter() {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "{:?}", config);
        }
    }

    #[test]
    fn test_validate_extension() {
        for ext in ["png", "PNG", "bmp", "jpg"] {
            let config = GeneratorConfig {
                extension: String::from(ext),
                ..GeneratorConfig::default()
            };
            assert!(config.validate().is_ok(), "{}", ext);
        }
        for ext in ["", "xyz", "png/"] {
            let config = GeneratorConfig {
                extension: String::from(ext),
                ..GeneratorConfig::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))), "{:?}", ext);
        }
    }
}
