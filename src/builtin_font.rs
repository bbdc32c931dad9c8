//! A bitmap font compiled into the binary, used when no preferred system font
//! can be found. Glyphs come from the 8x8 `font8x8` tables and are scaled up by
//! an integer factor so that every pixel of the source bitmap becomes a solid
//! square.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{GenericImage, Rgb};

const CELL: u32 = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BuiltinFont {
    scale: u32,
}

impl BuiltinFont {
    /// Picks the integer scale that brings the 8px cell closest to `font_size`.
    pub fn with_size(font_size: f32) -> Self {
        let scale = (font_size / CELL as f32).round().max(1.0) as u32;
        Self { scale }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    fn cell_size(&self) -> u32 {
        CELL * self.scale
    }

    fn glyph(c: char) -> [u8; 8] {
        BASIC_FONTS
            .get(c)
            .or_else(|| LATIN_FONTS.get(c))
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8])
    }

    /// Width and height of the laid out text. Every glyph advances by one cell.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let glyphs = text.chars().count() as u32;
        if glyphs == 0 {
            return (0, 0);
        }

        (glyphs * self.cell_size(), self.cell_size())
    }

    /// Draws `text` with its top-left corner at (`x`, `y`). Anything outside the
    /// canvas is clipped.
    pub fn paint<I: GenericImage<Pixel = Rgb<u8>>>(
        &self,
        image: &mut I,
        x: i64,
        y: i64,
        text: &str,
        color: Rgb<u8>,
    ) {
        let (width, height) = image.dimensions();
        let scale = self.scale as i64;

        for (index, c) in text.chars().enumerate() {
            let cell_x = x + index as i64 * self.cell_size() as i64;

            for (row, bits) in Self::glyph(c).iter().enumerate() {
                for column in 0..CELL as i64 {
                    // Bit 0 is the leftmost pixel.
                    if bits & (1 << column) == 0 {
                        continue;
                    }

                    let block_x = cell_x + column * scale;
                    let block_y = y + row as i64 * scale;

                    for py in block_y..block_y + scale {
                        for px in block_x..block_x + scale {
                            if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                                continue;
                            }
                            image.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}
