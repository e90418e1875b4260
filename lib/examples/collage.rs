use anyhow::{Context, Result};
use glyph_augment::{contact_sheet, render_with_config, Generator, GeneratorConfig, TrueTypeFont};

fn run() -> Result<()> {
    let path = std::env::args().nth(1).expect("Usage: collage FONT [CHAR]");
    let c = std::env::args()
        .nth(2)
        .and_then(|s| s.chars().next())
        .unwrap_or('A');

    let font = TrueTypeFont::load(&path).with_context(|| format!("Failed to load {}", path))?;
    eprintln!("loaded font {}", font.name());
    let generator = Generator::new(GeneratorConfig {
        variation_count: 24,
        ..GeneratorConfig::wide()
    })?;
    let glyph = render_with_config(&font, c, generator.config());
    let mut tiles = vec![glyph.clone()];
    tiles.extend(generator.variations(&glyph, &mut rand::thread_rng()));

    let sheet = contact_sheet(&tiles, None);
    sheet.save("collage.png")?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:?}", err);
    }
}
