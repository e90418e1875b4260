use anyhow::{Context, Result};
use glyph_augment::{annotate, detect_zones, ZoneConfig, ZoneKind};

fn run() -> Result<()> {
    let path = std::env::args().nth(1).expect("Usage: zones PUZZLE");
    eprintln!("read image from {}", path);
    let img = image::open(&path).with_context(|| format!("Failed to open {}", path))?;

    let zones = detect_zones(&img.to_luma8(), &ZoneConfig::default());
    for zone in zones.iter() {
        match zone.kind {
            ZoneKind::Grid => eprintln!("grid: {:?}, {} cells", zone.area, zone.cells.len()),
            ZoneKind::WordList => eprintln!(
                "word list: {:?}, {} words, {} slots",
                zone.area,
                zone.words.len(),
                zone.cells.len()
            ),
        }
    }
    annotate(&img.to_rgb8(), &zones).save("zones.png")?;
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", err);
    }
}
