use std::path::{Path, PathBuf};

use image::RgbImage;
use log::debug;
use thiserror::Error;

mod builtin_font;
pub mod encode;
pub mod gradient;
pub mod text;

pub use builtin_font::BuiltinFont;
pub use gradient::VerticalGradient;
pub use text::{Caption, FontChoice, TextPainter};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_FILENAME: &str = "placeholder-1.webp";
pub const PREFERRED_FONT_FAMILY: &str = "Arial";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{hint}")]
    MissingCapability { dependency: &'static str, hint: &'static str },
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Everything a generation run needs to know. Built by the caller, so the
/// generator never looks at where the process or its sources live.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub photos_dir: PathBuf,
    pub gradient: VerticalGradient,
    pub caption: Caption,
    pub preferred_font_family: String,
    pub quality: f32,
}

impl GeneratorConfig {
    pub fn new(photos_dir: impl Into<PathBuf>) -> Self {
        Self {
            photos_dir: photos_dir.into(),
            gradient: VerticalGradient::default(),
            caption: Caption::default(),
            preferred_font_family: PREFERRED_FONT_FAMILY.to_string(),
            quality: encode::DEFAULT_QUALITY,
        }
    }

    pub fn output_path(&self, filename: &str) -> PathBuf {
        self.photos_dir.join(filename)
    }
}

pub struct PlaceholderGenerator {
    config: GeneratorConfig,
    text_painter: TextPainter,
}

impl PlaceholderGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        let text_painter = TextPainter::new(&config.preferred_font_family);

        Self::new_with_text_painter(config, text_painter)
    }

    pub fn new_with_text_painter(config: GeneratorConfig, text_painter: TextPainter) -> Self {
        Self { config, text_painter }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn font_choice(&self) -> FontChoice {
        self.text_painter.font_choice()
    }

    /// Builds the canvas: gradient rows with the caption centered on top.
    pub fn render(&mut self, width: u32, height: u32) -> RgbImage {
        let mut canvas = RgbImage::new(width, height);

        self.config.gradient.paint(&mut canvas);
        self.text_painter.paint_centered(&mut canvas, &self.config.caption);

        canvas
    }

    pub fn generate(&mut self, filename: &str) -> Result<PathBuf, Error> {
        self.generate_with_size(filename, DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Renders a `width` by `height` placeholder and writes it to
    /// `<photos_dir>/<filename>`, replacing any existing file.
    pub fn generate_with_size(
        &mut self,
        filename: &str,
        width: u32,
        height: u32,
    ) -> Result<PathBuf, Error> {
        encode::probe()?;

        let photos_dir = &self.config.photos_dir;
        std::fs::create_dir_all(photos_dir)
            .map_err(|source| Error::Io { path: photos_dir.clone(), source })?;

        debug!("rendering {width}x{height} canvas with {:?}", self.font_choice());
        let canvas = self.render(width, height);

        let bytes = encode::encode_webp(&canvas, self.config.quality)?;

        let path = self.config.output_path(filename);
        std::fs::write(&path, &bytes).map_err(|source| Error::Io { path: path.clone(), source })?;
        debug!("wrote {} bytes to {}", bytes.len(), path.display());

        Ok(path)
    }
}

/// Writes the default 800x600 placeholder to `<photos_dir>/<filename>`.
pub fn generate(photos_dir: impl AsRef<Path>, filename: &str) -> Result<PathBuf, Error> {
    let config = GeneratorConfig::new(photos_dir.as_ref());
    PlaceholderGenerator::new(config).generate(filename)
}

/// Decodes a written placeholder back into pixels.
pub fn load(path: impl AsRef<Path>) -> Result<RgbImage, Error> {
    Ok(image::open(path)?.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    fn builtin_generator(photos_dir: &Path) -> PlaceholderGenerator {
        PlaceholderGenerator::new_with_text_painter(
            GeneratorConfig::new(photos_dir),
            TextPainter::builtin(),
        )
    }

    #[test]
    fn default_config() {
        let config = GeneratorConfig::new("src/photos");

        assert_eq!(config.output_path("a.webp"), PathBuf::from("src/photos/a.webp"));
        assert_eq!(config.quality, 80.0);
        assert_eq!(config.preferred_font_family, "Arial");
        assert_eq!(config.caption, Caption::default());
    }

    #[test]
    fn render_has_gradient_corners() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = builtin_generator(dir.path());

        let canvas = generator.render(DEFAULT_WIDTH, DEFAULT_HEIGHT);

        assert_eq!(canvas.dimensions(), (800, 600));
        assert_eq!(*canvas.get_pixel(0, 0), Rgb([102, 126, 234]));
        assert_eq!(*canvas.get_pixel(799, 0), Rgb([102, 126, 234]));
        assert_eq!(*canvas.get_pixel(0, 599), Rgb([117, 75, 162]));
        assert_eq!(*canvas.get_pixel(799, 599), Rgb([117, 75, 162]));
    }

    #[test]
    fn render_draws_the_caption() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = builtin_generator(dir.path());

        let canvas = generator.render(DEFAULT_WIDTH, DEFAULT_HEIGHT);

        let white = canvas.pixels().filter(|p| **p == Rgb([255, 255, 255])).count();
        assert!(white > 0);
    }

    #[test]
    fn render_degenerate_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = builtin_generator(dir.path());

        assert_eq!(generator.render(0, 0).dimensions(), (0, 0));
        assert_eq!(generator.render(3, 1).dimensions(), (3, 1));
    }

    #[cfg(feature = "webp")]
    #[test]
    fn degenerate_size_fails_to_encode() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = builtin_generator(dir.path());

        let result = generator.generate_with_size("empty.webp", 0, 600);

        assert!(matches!(result, Err(Error::Encode(_))));
        assert!(!dir.path().join("empty.webp").exists());
    }

    #[cfg(not(feature = "webp"))]
    #[test]
    fn missing_encoder_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let photos_dir = dir.path().join("src").join("photos");
        let mut generator = builtin_generator(&photos_dir);

        let err = generator.generate(DEFAULT_FILENAME).unwrap_err();

        assert!(matches!(err, Error::MissingCapability { .. }));
        assert!(!photos_dir.exists());
    }
}
