use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glyph_augment::{
    annotate, contact_sheet, detect_zones, render_with_config, Error, FontSize, Generator,
    GeneratorConfig, KeySource, Labeler, TrueTypeFont, ZoneConfig, ZoneKind,
};
use image::DynamicImage;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "glyph-augment",
    about = "Generate augmented letter datasets from fonts, and the helper tools around them",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every letter in every font and write perturbed variations
    Generate(GenerateArgs),
    /// Render one letter and its variations onto a single sheet
    Preview(PreviewArgs),
    /// Detect the letter grid and word list of a puzzle image
    Zones(ZonesArgs),
    /// Sort images by hand: one key per image copies it with that key as prefix
    Label(LabelArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Preset {
    /// Mild rotation, no erasure, ten variations, no canonical image
    Narrow,
    /// Strong rotation, erasure artifacts, five variations plus the canonical image
    Wide,
}

/// Parameters shared by `generate` and `preview`. Unset values come from the preset.
#[derive(Args, Debug)]
struct AugmentArgs {
    #[arg(long, value_enum, default_value_t = Preset::Narrow)]
    preset: Preset,

    /// Canvas size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    /// Number of variations per glyph
    #[arg(long)]
    variations: Option<usize>,

    /// Maximum rotation in degrees
    #[arg(long)]
    rotation: Option<f32>,

    #[arg(long)]
    blur_probability: Option<f64>,

    /// Blur radius range as MIN,MAX
    #[arg(long, value_parser = parse_pair::<f32>)]
    blur_radius: Option<(f32, f32)>,

    #[arg(long)]
    erase_probability: Option<f64>,

    /// Erased rectangle side range as MIN,MAX
    #[arg(long, value_parser = parse_pair::<u32>)]
    erase_size: Option<(u32, u32)>,

    #[arg(long)]
    noise_probability: Option<f64>,

    #[arg(long)]
    noise_stddev: Option<f64>,

    /// Font size in pixels; with --fit the largest size tried
    #[arg(long)]
    font_size: Option<f32>,

    /// Shrink each glyph until it fits the canvas
    #[arg(long)]
    fit: bool,

    /// Compensate for the glyph's bearing when centering
    #[arg(long)]
    center_on_ink: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Directory with ttf/otf font files
    #[arg(short, long, default_value = "fonts")]
    fonts: PathBuf,

    /// Output root, one subdirectory per letter
    #[arg(short, long, default_value = "images")]
    output: PathBuf,

    /// Characters to render
    #[arg(long)]
    alphabet: Option<String>,

    /// Skip lowercase characters
    #[arg(long)]
    uppercase_only: bool,

    /// Do not write the unperturbed glyph
    #[arg(long, conflicts_with = "canonical")]
    no_canonical: bool,

    /// Write the unperturbed glyph
    #[arg(long)]
    canonical: bool,

    /// Output image extension
    #[arg(long)]
    ext: Option<String>,

    #[command(flatten)]
    augment: AugmentArgs,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Font file
    font: PathBuf,

    /// Character to render
    #[arg(short, long, default_value_t = 'A')]
    character: char,

    /// Output image
    #[arg(short, long, default_value = "preview.png")]
    output: PathBuf,

    #[command(flatten)]
    augment: AugmentArgs,
}

#[derive(Args, Debug)]
struct ZonesArgs {
    /// Puzzle image
    image: PathBuf,

    /// Annotated output image
    #[arg(short, long, default_value = "zones.png")]
    output: PathBuf,

    /// Gray level at or below which a pixel is ink
    #[arg(long, default_value_t = 150)]
    threshold: u8,
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// Directory with the images to label
    #[arg(short, long)]
    source: PathBuf,

    /// Directory receiving the labeled copies
    #[arg(short, long, default_value = "renamed")]
    dest: PathBuf,

    /// Key that ends the session
    #[arg(long, default_value_t = '7')]
    quit_key: char,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(|c| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| e.to_string());
    Ok((parse(w)?, parse(h)?))
}

fn parse_pair<T: std::str::FromStr>(s: &str) -> Result<(T, T), String>
where
    T::Err: std::fmt::Display,
{
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected MIN,MAX, got {:?}", s))?;
    let parse = |v: &str| v.trim().parse::<T>().map_err(|e| e.to_string());
    Ok((parse(a)?, parse(b)?))
}

impl AugmentArgs {
    fn config(&self) -> GeneratorConfig {
        let mut config = match self.preset {
            Preset::Narrow => GeneratorConfig::default(),
            Preset::Wide => GeneratorConfig::wide(),
        };
        if let Some(size) = self.size {
            config.canvas_size = size;
        }
        if let Some(n) = self.variations {
            config.variation_count = n;
        }
        if let Some(r) = self.rotation {
            config.rotation_range = r;
        }
        if let Some(p) = self.blur_probability {
            config.blur_probability = p;
        }
        if let Some((lo, hi)) = self.blur_radius {
            config.blur_radius_range = lo..=hi;
        }
        if let Some(p) = self.erase_probability {
            config.erase_probability = p;
        }
        if let Some((lo, hi)) = self.erase_size {
            config.erase_size_range = lo..=hi;
        }
        if let Some(p) = self.noise_probability {
            config.noise_probability = p;
        }
        if let Some(s) = self.noise_stddev {
            config.noise_stddev = s;
        }
        let size = match (self.font_size, config.font_size) {
            (Some(size), _) => size,
            (None, FontSize::Fixed(size)) => size,
            (None, FontSize::Fit { max }) => max,
        };
        config.font_size = if self.fit {
            FontSize::Fit { max: size }
        } else {
            FontSize::Fixed(size)
        };
        config.center_on_ink = self.center_on_ink;
        config
    }
}

impl GenerateArgs {
    fn config(&self) -> GeneratorConfig {
        let mut config = self.augment.config();
        config.font_dir = self.fonts.clone();
        config.output_dir = self.output.clone();
        if let Some(alphabet) = &self.alphabet {
            config.alphabet = alphabet.clone();
        }
        config.uppercase_only = self.uppercase_only;
        if self.canonical {
            config.save_canonical = true;
        }
        if self.no_canonical {
            config.save_canonical = false;
        }
        if let Some(ext) = &self.ext {
            config.extension = ext.trim_start_matches('.').to_string();
        }
        config
    }
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let generator = Generator::new(args.config())?;
    info!("pipeline: {}", generator.pipeline());
    let summary = generator
        .run()
        .with_context(|| format!("Failed to generate dataset from {}", args.fonts.display()))?;
    println!(
        "{} files for {} glyphs in {} fonts written to {}",
        summary.files,
        summary.glyphs,
        summary.fonts,
        args.output.display()
    );
    Ok(())
}

fn preview(args: &PreviewArgs) -> Result<()> {
    let generator = Generator::new(args.augment.config())?;
    let font = TrueTypeFont::load(&args.font)?;
    let glyph = render_with_config(&font, args.character, generator.config());
    let mut tiles = vec![glyph.clone()];
    tiles.extend(generator.variations(&glyph, &mut rand::thread_rng()));
    contact_sheet(&tiles, None)
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    println!("{} tiles written to {}", tiles.len(), args.output.display());
    Ok(())
}

fn zones(args: &ZonesArgs) -> Result<()> {
    let img = image::open(&args.image)
        .with_context(|| format!("Failed to open {}", args.image.display()))?;
    let config = ZoneConfig {
        threshold: args.threshold,
        ..ZoneConfig::default()
    };
    let zones = detect_zones(&img.to_luma8(), &config);
    for zone in zones.iter() {
        let a = zone.area;
        match zone.kind {
            ZoneKind::Grid => println!(
                "grid at {},{} {}x{}: {} cells",
                a.x,
                a.y,
                a.width,
                a.height,
                zone.cells.len()
            ),
            ZoneKind::WordList => println!(
                "word list at {},{} {}x{}: {} words",
                a.x,
                a.y,
                a.width,
                a.height,
                zone.words.len()
            ),
        }
    }
    annotate(&img.to_rgb8(), &zones)
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;
    Ok(())
}

/// Reads one key per image from a line of standard input. End of input quits.
struct TerminalKeys<R> {
    input: R,
}

impl<R: BufRead> KeySource for TerminalKeys<R> {
    fn read_key(&mut self, path: &Path, image: &DynamicImage) -> Result<Option<char>, Error> {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        print!(
            "Press a key for '{}' ({}x{}): ",
            name,
            image.width(),
            image.height()
        );
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).chars().next().unwrap_or('\n')))
    }
}

fn label(args: &LabelArgs) -> Result<()> {
    let labeler = Labeler {
        quit_key: args.quit_key,
        ..Labeler::new(&args.source, &args.dest)
    };
    println!("Press a letter or digit to label, '{}' to quit.", args.quit_key);
    let stdin = io::stdin();
    let mut keys = TerminalKeys {
        input: stdin.lock(),
    };
    let summary = labeler.run(&mut keys)?;
    println!("{} copied, {} skipped", summary.copied, summary.skipped);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match &cli.command {
        Command::Generate(args) => generate(args),
        Command::Preview(args) => preview(args),
        Command::Zones(args) => zones(args),
        Command::Label(args) => label(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use image::{GrayImage, Luma};
    use std::io::Cursor;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("32x32"), Ok((32, 32)));
        assert_eq!(parse_size("28X40"), Ok((28, 40)));
        assert!(parse_size("32").is_err());
        assert!(parse_size("ax3").is_err());
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair::<f32>("0.5,1.3"), Ok((0.5, 1.3)));
        assert_eq!(parse_pair::<u32>("2, 8"), Ok((2, 8)));
        assert!(parse_pair::<u32>("2-8").is_err());
    }

    #[test]
    fn test_generate_args() {
        let cli = Cli::parse_from([
            "glyph-augment",
            "generate",
            "--fonts",
            "f",
            "--preset",
            "wide",
            "--size",
            "28x28",
            "--variations",
            "3",
            "--fit",
            "--font-size",
            "40",
            "--no-canonical",
            "--ext",
            ".bmp",
        ]);
        let args = match cli.command {
            Command::Generate(args) => args,
            other => panic!("unexpected command {:?}", other),
        };
        let config = args.config();
        assert_eq!(config.font_dir, PathBuf::from("f"));
        assert_eq!(config.output_dir, PathBuf::from("images"));
        assert_eq!(config.canvas_size, (28, 28));
        assert_eq!(config.variation_count, 3);
        assert_eq!(config.rotation_range, 75.0);
        assert_eq!(config.erase_probability, 0.3);
        assert_eq!(config.font_size, FontSize::Fit { max: 40.0 });
        assert!(!config.save_canonical);
        assert_eq!(config.extension, "bmp");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_narrow_defaults() {
        let cli = Cli::parse_from(["glyph-augment", "generate"]);
        let args = match cli.command {
            Command::Generate(args) => args,
            other => panic!("unexpected command {:?}", other),
        };
        assert_eq!(args.config(), GeneratorConfig::default());
    }

    #[test]
    fn test_terminal_keys() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([0])));
        let path = Path::new("x.png");
        let mut keys = TerminalKeys {
            input: Cursor::new("b\r\n\nq\n"),
        };
        assert_eq!(keys.read_key(path, &image).unwrap(), Some('b'));
        assert_eq!(keys.read_key(path, &image).unwrap(), Some('\n'));
        assert_eq!(keys.read_key(path, &image).unwrap(), Some('q'));
        assert_eq!(keys.read_key(path, &image).unwrap(), None);
    }
}
