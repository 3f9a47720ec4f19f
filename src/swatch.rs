//! Swatch strips for previewing a palette.

use image::{ImageFormat, ImageResult, Rgb, RgbImage};
use palette::Srgb;

use crate::error::{PaletteError, Result};
use crate::reduce::Palette;

/// Largest strip `render_swatch` will allocate, in pixels.
pub const MAX_SWATCH_PIXELS: u64 = 1 << 24;

/// Lay the palette out left to right, one `cell_size`-square per entry.
///
/// An empty palette or a zero `cell_size` gives a zero-sized image. Strips
/// larger than [`MAX_SWATCH_PIXELS`], or wider than `u32::MAX`, are rejected
/// before anything is allocated.
pub fn render_swatch(palette: &Palette, cell_size: u32) -> Result<RgbImage> {
    let colors: Vec<Srgb<u8>> = palette.iter().map(|&c| c.into()).collect();
    let width = u32::try_from(colors.len())
        .ok()
        .and_then(|n| cell_size.checked_mul(n))
        .filter(|&w| u64::from(w) * u64::from(cell_size) <= MAX_SWATCH_PIXELS)
        .ok_or_else(|| PaletteError::InvalidParameter {
            parameter: "cell_size",
            value: format!("{cell_size} ({} colors)", colors.len()),
        })?;

    Ok(RgbImage::from_fn(width, cell_size, |x, _| {
        let c = colors[(x / cell_size) as usize];
        Rgb([c.red, c.green, c.blue])
    }))
}

/// PNG-encode a swatch image.
pub fn encode_png(img: &RgbImage) -> ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut cursor = std::io::Cursor::new(&mut buf);
        img.write_to(&mut cursor, ImageFormat::Png)?;
    }
    Ok(buf)
}
