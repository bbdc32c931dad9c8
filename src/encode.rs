//! Lossy WebP output.
//!
//! The encoder lives behind the `webp` cargo feature. Builds without it can
//! still render canvases but report a missing capability when asked to encode.

use image::RgbImage;

use crate::Error;

pub const DEFAULT_QUALITY: f32 = 80.0;

const DEPENDENCY: &str = "libwebp (the `webp` crate)";
const INSTALL_HINT: &str =
    "Lossy WebP support is missing, rebuild with it enabled: cargo build --features webp";

/// Checks that this build can produce lossy WebP output.
pub fn probe() -> Result<(), Error> {
    if cfg!(feature = "webp") {
        Ok(())
    } else {
        Err(Error::MissingCapability { dependency: DEPENDENCY, hint: INSTALL_HINT })
    }
}

/// Encodes `canvas` as lossy WebP at `quality` (0 to 100).
#[cfg(feature = "webp")]
pub fn encode_webp(canvas: &RgbImage, quality: f32) -> Result<Vec<u8>, Error> {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::Encode(format!("cannot encode a {width}x{height} canvas")));
    }

    let encoder = webp::Encoder::from_rgb(canvas.as_raw(), width, height);
    let memory = encoder
        .encode_simple(false, quality)
        .map_err(|e| Error::Encode(format!("libwebp rejected the canvas: {e:?}")))?;

    Ok(memory.to_vec())
}

#[cfg(not(feature = "webp"))]
pub fn encode_webp(_canvas: &RgbImage, _quality: f32) -> Result<Vec<u8>, Error> {
    probe().map(|_| Vec::new())
}
