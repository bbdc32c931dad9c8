use image::{GenericImage, Rgb};

/// A two-color gradient running from the top row of a canvas to the bottom row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VerticalGradient {
    pub top: Rgb<u8>,
    pub bottom: Rgb<u8>,
}

impl Default for VerticalGradient {
    fn default() -> Self {
        Self { top: Rgb([102, 126, 234]), bottom: Rgb([118, 75, 162]) }
    }
}

impl VerticalGradient {
    pub fn new(top: Rgb<u8>, bottom: Rgb<u8>) -> Self {
        Self { top, bottom }
    }

    /// The solid color of row `y` on a canvas `height` rows tall.
    ///
    /// Each channel is `top + (bottom - top) * y / height`, truncated toward
    /// zero and clamped to the 8-bit range. Row 0 is exactly `top`; the last
    /// row lands within one step of `bottom`.
    pub fn row_color(&self, y: u32, height: u32) -> Rgb<u8> {
        if height == 0 {
            return self.top;
        }

        let t = y as f64 / height as f64;

        let channel = |i: usize| -> u8 {
            let start = self.top[i] as f64;
            let end = self.bottom[i] as f64;
            let value = (start + (end - start) * t).trunc();

            num_traits::clamp(value, 0.0, 255.0) as u8
        };

        Rgb([channel(0), channel(1), channel(2)])
    }

    /// Fills every row of `image` with its interpolated color.
    pub fn paint<I: GenericImage<Pixel = Rgb<u8>>>(&self, image: &mut I) {
        let (width, height) = image.dimensions();

        for y in 0..height {
            let color = self.row_color(y, height);
            for x in 0..width {
                image.put_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use pretty_assertions::assert_eq;

    fn close_to(actual: Rgb<u8>, expected: Rgb<u8>, tolerance: u8) -> bool {
        actual.0.iter().zip(expected.0.iter()).all(|(a, e)| a.abs_diff(*e) <= tolerance)
    }

    #[test]
    fn first_row_is_top_color() {
        let gradient = VerticalGradient::default();

        for height in [1, 2, 7, 600, 4096] {
            assert_eq!(gradient.row_color(0, height), gradient.top);
        }
    }

    #[test]
    fn last_row_is_near_bottom_color() {
        let gradient = VerticalGradient::default();

        // Below ~72 rows the final step is larger than one unit of blue.
        for height in [100, 256, 600, 1080] {
            let last = gradient.row_color(height - 1, height);
            assert!(
                close_to(last, gradient.bottom, 1),
                "height {height}: {last:?} is not within 1 of {:?}",
                gradient.bottom
            );
        }
    }

    #[test]
    fn default_gradient_on_600_rows() {
        let gradient = VerticalGradient::default();

        assert_eq!(gradient.row_color(0, 600), Rgb([102, 126, 234]));
        // 126 - 51 * 599 / 600 = 75.085, truncated.
        assert_eq!(gradient.row_color(599, 600), Rgb([117, 75, 162]));
        assert_eq!(gradient.row_color(300, 600), Rgb([110, 100, 198]));
    }

    #[test]
    fn channels_are_monotonic() {
        let gradient = VerticalGradient::default();
        let height = 600;

        let rows: Vec<Rgb<u8>> = (0..height).map(|y| gradient.row_color(y, height)).collect();

        for pair in rows.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            // Red rises, green and blue fall.
            assert!(next[0] >= prev[0]);
            assert!(next[1] <= prev[1]);
            assert!(next[2] <= prev[2]);
        }
    }

    #[test]
    fn flat_gradient_stays_flat() {
        let gradient = VerticalGradient::new(Rgb([0, 255, 10]), Rgb([0, 255, 10]));

        for y in 0..50 {
            assert_eq!(gradient.row_color(y, 50), Rgb([0, 255, 10]));
        }
    }

    #[test]
    fn paint_fills_whole_rows() {
        let gradient = VerticalGradient::default();
        let mut image = RgbImage::new(16, 8);

        gradient.paint(&mut image);

        for (x, y, pixel) in image.enumerate_pixels() {
            assert_eq!(*pixel, gradient.row_color(y, 8), "pixel ({x}, {y})");
        }
    }

    #[test]
    fn paint_on_empty_canvas_is_a_no_op() {
        let mut image = RgbImage::new(0, 0);
        VerticalGradient::default().paint(&mut image);
        assert_eq!(image.dimensions(), (0, 0));
    }
}
