use std::process::ExitCode;

use anyhow::Context;
use placeholder_gen::{GeneratorConfig, PlaceholderGenerator, DEFAULT_FILENAME};

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Bail out before the photos directory is created.
    if let Err(err) = placeholder_gen::encode::probe() {
        println!("{err}");
        return Ok(ExitCode::FAILURE);
    }

    let project_root = std::env::current_dir().context("could not read the working directory")?;
    let config = GeneratorConfig::new(project_root.join("src").join("photos"));
    let photos_dir = config.photos_dir.clone();

    println!("Generating placeholder images...\n");

    let mut generator = PlaceholderGenerator::new(config);
    let path = generator
        .generate(DEFAULT_FILENAME)
        .with_context(|| format!("could not generate {DEFAULT_FILENAME}"))?;
    log::debug!("generated {}", path.display());
    println!("✓ Generated: {DEFAULT_FILENAME}");

    println!("\n✓ Done!");
    println!("\nImages saved to: {}", photos_dir.display());

    Ok(ExitCode::SUCCESS)
}
