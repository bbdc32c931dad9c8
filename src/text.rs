use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping, SwashCache, SwashContent};
use fontdb::Family;
use image::{GenericImage, ImageBuffer, Luma, Pixel, Rgb, Rgba};
use log::debug;

use crate::builtin_font::BuiltinFont;

/// A single line of text painted onto the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub font_size: f32,
    /// Non-premultiplied RGBA.
    ///
    /// The canvas has no alpha channel, so only the RGB part reaches the
    /// pixels. Glyph coverage is the only thing blended.
    pub color: Rgba<u8>,
}

impl Default for Caption {
    fn default() -> Self {
        Self { text: "Placeholder".to_string(), font_size: 48.0, color: Rgba([255, 255, 255, 77]) }
    }
}

impl Caption {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), ..Self::default() }
    }

    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_color(mut self, color: Rgba<u8>) -> Self {
        self.color = color;
        self
    }
}

/// Which font ended up being used for painting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontChoice {
    System { family: String },
    BuiltIn,
}

struct SystemFont {
    family: String,
    font_system: FontSystem,
    swash_cache: SwashCache,
}

enum Typeface {
    System(SystemFont),
    BuiltIn,
}

pub struct TextPainter {
    typeface: Typeface,
}

impl TextPainter {
    /// Loads the system fonts and picks `preferred_family` if it is installed,
    /// otherwise the built-in font.
    pub fn new(preferred_family: &str) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();

        Self::new_with_font_db(db, preferred_family)
    }

    pub fn new_with_font_db(font_database: fontdb::Database, preferred_family: &str) -> Self {
        let query = fontdb::Query {
            families: &[Family::Name(preferred_family)],
            ..fontdb::Query::default()
        };

        if font_database.query(&query).is_none() {
            debug!("font family {preferred_family:?} not found, using the built-in font");
            return Self::builtin();
        }

        debug!("using system font family {preferred_family:?}");

        let locale = sys_locale::get_locale().unwrap_or_else(|| "en-US".to_string());
        let font_system = FontSystem::new_with_locale_and_db(locale, font_database);
        let swash_cache = SwashCache::new();

        Self {
            typeface: Typeface::System(SystemFont {
                family: preferred_family.to_string(),
                font_system,
                swash_cache,
            }),
        }
    }

    pub fn builtin() -> Self {
        Self { typeface: Typeface::BuiltIn }
    }

    pub fn font_choice(&self) -> FontChoice {
        match &self.typeface {
            Typeface::System(font) => FontChoice::System { family: font.family.clone() },
            Typeface::BuiltIn => FontChoice::BuiltIn,
        }
    }

    /// Width and height of the caption's layout box, in whole pixels.
    pub fn measure(&mut self, caption: &Caption) -> (u32, u32) {
        match &mut self.typeface {
            Typeface::System(font) => {
                let buffer = font.shape(caption);
                let (width, height) = SystemFont::measure_buffer(&buffer);
                (width.ceil() as u32, height.ceil() as u32)
            },
            Typeface::BuiltIn => BuiltinFont::with_size(caption.font_size).measure(&caption.text),
        }
    }

    /// The top-left corner that centers a `text_width` by `text_height` box on
    /// the canvas. Floor division, so oversized text gets a negative origin.
    pub fn centered_origin(
        (canvas_width, canvas_height): (u32, u32),
        (text_width, text_height): (u32, u32),
    ) -> (i64, i64) {
        let x = (canvas_width as i64 - text_width as i64).div_euclid(2);
        let y = (canvas_height as i64 - text_height as i64).div_euclid(2);
        (x, y)
    }

    /// Paints `caption` with the top-left of its layout box at (`x`, `y`).
    pub fn paint<I: GenericImage<Pixel = Rgb<u8>>>(
        &mut self,
        image: &mut I,
        caption: &Caption,
        x: i64,
        y: i64,
    ) {
        match &mut self.typeface {
            Typeface::System(font) => {
                let buffer = font.shape(caption);
                font.add_text(image, x as f32, y as f32, &buffer, caption.color.to_rgb());
            },
            Typeface::BuiltIn => {
                BuiltinFont::with_size(caption.font_size).paint(
                    image,
                    x,
                    y,
                    &caption.text,
                    caption.color.to_rgb(),
                );
            },
        }
    }

    /// Measures `caption`, centers it on `image` and paints it. Returns the
    /// origin used and the measured size.
    pub fn paint_centered<I: GenericImage<Pixel = Rgb<u8>>>(
        &mut self,
        image: &mut I,
        caption: &Caption,
    ) -> ((i64, i64), (u32, u32)) {
        let size = self.measure(caption);
        let (x, y) = Self::centered_origin(image.dimensions(), size);

        debug!("caption {:?} measured {}x{}, origin ({x}, {y})", caption.text, size.0, size.1);

        self.paint(image, caption, x, y);

        ((x, y), size)
    }
}

impl SystemFont {
    fn shape(&mut self, caption: &Caption) -> Buffer {
        let mut buffer = Buffer::new_empty(Metrics::relative(caption.font_size, 1.0));
        let attrs = Attrs::new().family(Family::Name(&self.family));

        buffer.set_text(&mut self.font_system, &caption.text, attrs, Shaping::Advanced);
        buffer.set_size(&mut self.font_system, None, None);

        let prune = true;
        buffer.shape_until_scroll(&mut self.font_system, prune);

        buffer
    }

    fn measure_buffer(buffer: &Buffer) -> (f32, f32) {
        let width = buffer.layout_runs().fold(0.0, |width: f32, run| run.line_w.max(width));
        let total_lines = buffer.layout_runs().count();

        (width, total_lines as f32 * buffer.metrics().line_height)
    }

    fn add_text<I: GenericImage<Pixel = Rgb<u8>>>(
        &mut self,
        image: &mut I,
        x: f32,
        y: f32,
        buffer: &Buffer,
        fill: Rgb<u8>,
    ) {
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let scale = 1.0;
                let physical_glyph = glyph.physical((x, y), scale);

                let Some(glyph_image) =
                    self.swash_cache.get_image(&mut self.font_system, physical_glyph.cache_key)
                else {
                    continue;
                };

                let glyph_x = physical_glyph.x + glyph_image.placement.left;
                let glyph_y =
                    run.line_y.round() as i32 + physical_glyph.y - glyph_image.placement.top;

                let glyph_width = glyph_image.placement.width;
                let glyph_height = glyph_image.placement.height;

                let glyph_rgba_image: ImageBuffer<Rgba<u8>, Vec<u8>> = match glyph_image.content
                {
                    SwashContent::Mask | SwashContent::SubpixelMask => {
                        let Some(coverage) = ImageBuffer::<Luma<u8>, &[u8]>::from_raw(
                            glyph_width,
                            glyph_height,
                            &glyph_image.data[..],
                        ) else {
                            continue;
                        };

                        let [r, g, b] = fill.0;
                        ImageBuffer::from_fn(glyph_width, glyph_height, |gx, gy| {
                            Rgba([r, g, b, coverage.get_pixel(gx, gy)[0]])
                        })
                    },
                    SwashContent::Color => {
                        let Some(colored) = ImageBuffer::from_raw(
                            glyph_width,
                            glyph_height,
                            glyph_image.data.clone(),
                        ) else {
                            continue;
                        };
                        colored
                    },
                };

                blend_onto(image, &glyph_rgba_image, glyph_x as i64, glyph_y as i64);
            }
        }
    }
}

/// Alpha-composites `top` onto an opaque RGB canvas, clipping at the edges.
fn blend_onto<I: GenericImage<Pixel = Rgb<u8>>>(
    image: &mut I,
    top: &ImageBuffer<Rgba<u8>, Vec<u8>>,
    x: i64,
    y: i64,
) {
    let (width, height) = image.dimensions();

    for (tx, ty, pixel) in top.enumerate_pixels() {
        let px = x + tx as i64;
        let py = y + ty as i64;
        if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
            continue;
        }

        let (px, py) = (px as u32, py as u32);
        let mut under = image.get_pixel(px, py).to_rgba();
        under.blend(pixel);
        image.put_pixel(px, py, under.to_rgb());
    }
}
