use image::{Rgb, Rgba};
use placeholder_gen::{Caption, GeneratorConfig, PlaceholderGenerator, VerticalGradient};

pub fn main() -> Result<(), placeholder_gen::Error> {
    // A blue-to-pink card instead of the default palette.
    let mut config = GeneratorConfig::new("demo-output");
    config.gradient = VerticalGradient::new(Rgb([0, 0, 255]), Rgb([255, 0, 128]));
    config.caption =
        Caption::new("hello world").with_font_size(64.0).with_color(Rgba([255, 255, 255, 255]));

    let mut generator = PlaceholderGenerator::new(config);
    println!("font: {:?}", generator.font_choice());

    // Draw the text!
    let path = generator.generate_with_size("simple.webp", 512, 512)?;
    println!("wrote {}", path.display());

    Ok(())
}
