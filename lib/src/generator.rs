use crate::augment::Pipeline;
use crate::config::GeneratorConfig;
use crate::font::{find_font_files, Rasterizer, TrueTypeFont};
use crate::glyph::{render_glyph, GlyphSpec};
use crate::{Canvas, Error};
use log::{debug, info};
use rand::Rng;
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Case tag embedded in output file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Cap,
    Low,
}

impl Case {
    /// `Low` for lowercase characters, `Cap` for everything else (digits included).
    pub fn of(c: char) -> Case {
        if c.is_lowercase() {
            Case::Low
        } else {
            Case::Cap
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Case::Cap => "cap",
            Case::Low => "low",
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The class directory of `c`. Both cases of a letter share one bucket.
pub fn bucket_name(c: char) -> String {
    c.to_lowercase().collect()
}

/// File name of the unperturbed glyph, e.g. `a_cap_arial.png`.
pub fn canonical_file_name(c: char, font: &str, ext: &str) -> String {
    format!("{}_{}_{}.{}", bucket_name(c), Case::of(c), font, ext)
}

/// File name of a perturbed copy, e.g. `a_cap_arial_variation_0.png`.
pub fn variation_file_name(c: char, font: &str, index: usize, ext: &str) -> String {
    format!(
        "{}_{}_{}_variation_{}.{}",
        bucket_name(c),
        Case::of(c),
        font,
        index,
        ext
    )
}

/// Counts of what a generation run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub fonts: usize,
    pub glyphs: usize,
    pub files: usize,
}

/// Dataset generator: renders every character of the alphabet in every font and writes the
/// canonical glyph plus its perturbed variations into per-letter buckets.
pub struct Generator {
    config: GeneratorConfig,
    pipeline: Pipeline,
}

impl Generator {
    /// # Errors
    /// [`Error::InvalidConfig`] if the configuration does not validate.
    pub fn new(config: GeneratorConfig) -> Result<Generator, Error> {
        config.validate()?;
        let pipeline = Pipeline::from_config(&config);
        Ok(Generator { config, pipeline })
    }

    /// Use `pipeline` instead of the one derived from the configuration.
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Generator {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Generate the whole dataset with the thread-local random generator.
    pub fn run(&self) -> Result<GenerationSummary, Error> {
        self.run_with_rng(&mut rand::thread_rng())
    }

    /// Generate the whole dataset.
    ///
    /// A font that can not be loaded aborts the run; files already written are kept.
    ///
    /// # Errors
    /// * The font directory can not be read, or a font can not be read or parsed
    /// * An output directory can not be created or an image can not be written
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GenerationSummary, Error> {
        let font_files = find_font_files(&self.config.font_dir)?;
        info!(
            "found {} fonts in {}",
            font_files.len(),
            self.config.font_dir.display()
        );
        self.create_buckets()?;
        let mut summary = GenerationSummary::default();
        for path in font_files.iter() {
            let font = TrueTypeFont::load(path)?;
            info!("Using font: {}", font.name());
            let done = self.generate_font(&font, font.name(), rng)?;
            summary.fonts += 1;
            summary.glyphs += done.glyphs;
            summary.files += done.files;
        }
        info!(
            "generated {} files for {} glyphs in {} fonts",
            summary.files, summary.glyphs, summary.fonts
        );
        Ok(summary)
    }

    /// Create one bucket directory per character. Existing directories are fine.
    pub fn create_buckets(&self) -> Result<(), Error> {
        for c in self.config.characters() {
            fs::create_dir_all(self.bucket_dir(c))?;
        }
        Ok(())
    }

    /// Render every character with `font` and write its images. Buckets must exist.
    pub fn generate_font<F, R>(&self, font: &F, font_name: &str, rng: &mut R) -> Result<GenerationSummary, Error>
    where
        F: Rasterizer + ?Sized,
        R: Rng + ?Sized,
    {
        let config = &self.config;
        let mut summary = GenerationSummary {
            fonts: 1,
            ..GenerationSummary::default()
        };
        for c in config.characters() {
            let glyph = render_with_config(font, c, config);
            let dir = self.bucket_dir(c);
            if config.save_canonical {
                save(&glyph, dir.join(canonical_file_name(c, font_name, &config.extension)))?;
                summary.files += 1;
            }
            for (i, variation) in self.variations(&glyph, rng).enumerate() {
                let name = variation_file_name(c, font_name, i, &config.extension);
                save(&variation, dir.join(name))?;
                summary.files += 1;
            }
            summary.glyphs += 1;
        }
        Ok(summary)
    }

    /// The configured number of perturbed copies of `glyph`.
    pub fn variations<'a, R: Rng + ?Sized>(
        &'a self,
        glyph: &'a Canvas,
        rng: &'a mut R,
    ) -> impl Iterator<Item = Canvas> + 'a {
        (0..self.config.variation_count).map(move |_| self.pipeline.apply(glyph, rng))
    }

    fn bucket_dir(&self, c: char) -> PathBuf {
        self.config.output_dir.join(bucket_name(c))
    }
}

fn save(canvas: &Canvas, path: PathBuf) -> Result<(), Error> {
    canvas
        .save(&path)
        .map_err(|source| Error::ImageWrite {
            path: path.clone(),
            source,
        })?;
    debug!("Saved {}", path.display());
    Ok(())
}

/// Render `c` with `font` using the sizing and centering options from `config`.
pub fn render_with_config<F: Rasterizer + ?Sized>(font: &F, c: char, config: &GeneratorConfig) -> Canvas {
    let spec = GlyphSpec {
        character: c,
        canvas_size: config.canvas_size,
        font_size: config.font_size.resolve(font, c, config.canvas_size),
    };
    render_glyph(font, &spec, config.center_on_ink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::Transform;
    use crate::config::FontSize;
    use crate::test_utils::BlockFont;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_file_names() {
        assert_eq!(canonical_file_name('A', "arial", "png"), "a_cap_arial.png");
        assert_eq!(canonical_file_name('a', "arial", "png"), "a_low_arial.png");
        assert_eq!(
            variation_file_name('Q', "dejavusans", 3, "bmp"),
            "q_cap_dejavusans_variation_3.bmp"
        );
        assert_eq!(canonical_file_name('7', "x", "png"), "7_cap_x.png");
    }

    #[test]
    fn test_bucket_is_lowercase() {
        assert_eq!(bucket_name('A'), "a");
        assert_eq!(bucket_name('a'), "a");
        assert_eq!(Case::of('A'), Case::Cap);
        assert_eq!(Case::of('a'), Case::Low);
    }

    #[test]
    fn test_generate_font_writes_buckets() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let config = GeneratorConfig {
            output_dir: dir.path().to_path_buf(),
            alphabet: String::from("Bb"),
            variation_count: 2,
            save_canonical: true,
            font_size: FontSize::Fit { max: 40.0 },
            ..GeneratorConfig::default()
        };
        let generator = Generator::new(config)?;
        generator.create_buckets()?;
        let mut rng = StdRng::seed_from_u64(3);
        let summary = generator.generate_font(&BlockFont::default(), "block", &mut rng)?;
        assert_eq!(
            summary,
            GenerationSummary {
                fonts: 1,
                glyphs: 2,
                files: 6
            }
        );
        let mut names: Vec<String> = fs::read_dir(dir.path().join("b"))?
            .map(|e| e.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<Result<_, _>>()?;
        names.sort();
        assert_eq!(
            names,
            [
                "b_cap_block.png",
                "b_cap_block_variation_0.png",
                "b_cap_block_variation_1.png",
                "b_low_block.png",
                "b_low_block_variation_0.png",
                "b_low_block_variation_1.png",
            ]
        );
        Ok(())
    }

    #[test]
    fn test_variations_count_and_size() -> Result<(), Error> {
        let generator = Generator::new(GeneratorConfig {
            variation_count: 4,
            canvas_size: (20, 28),
            ..GeneratorConfig::wide()
        })?
        .with_pipeline(Pipeline::new().then(Transform::Rotate { max_degrees: 30.0 }, 1.0));
        let glyph = render_with_config(&BlockFont::default(), 'X', generator.config());
        let mut rng = StdRng::seed_from_u64(11);
        let variations: Vec<Canvas> = generator.variations(&glyph, &mut rng).collect();
        assert_eq!(variations.len(), 4);
        assert!(variations.iter().all(|v| v.dimensions() == (20, 28)));
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        let config = GeneratorConfig {
            alphabet: String::new(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(Generator::new(config), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_alphabet_must_map_to_buckets() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        for alphabet in ["..", "A/", "Bb b"] {
            let config = GeneratorConfig {
                output_dir: dir.path().to_path_buf(),
                alphabet: String::from(alphabet),
                ..GeneratorConfig::default()
            };
            assert!(matches!(Generator::new(config), Err(Error::InvalidConfig(_))), "{:?}", alphabet);
        }
        assert_eq!(fs::read_dir(dir.path())?.count(), 0);
        Ok(())
    }
}
