use anyhow::Result;
use glyph_augment::{Generator, GeneratorConfig};

fn main() -> Result<()> {
    env_logger::init();
    let config = GeneratorConfig {
        font_dir: "tests/fonts".into(),
        output_dir: "images".into(),
        ..GeneratorConfig::wide()
    };
    let summary = Generator::new(config)?.run()?;
    println!("{:?}", summary);
    Ok(())
}
