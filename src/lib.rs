use wasm_bindgen::prelude::*;
use js_sys::Array;

pub mod color;
pub mod error;
pub mod extract;
pub mod kmeans;
pub mod reduce;
pub mod swatch;

pub use color::Color;
pub use error::{PaletteError, Result};
pub use extract::{ColorSet, extract, scan};
pub use reduce::{DEFAULT_N_COLORS, Palette, PaletteReducer, ReduceOptions, reduce};

/// Find the dominant colors of a markup document.
///
/// Steps performed:
/// 1. Scan the text for `#rrggbb` and `rgb(r, g, b)` literals and collect
///    them as a canonical, deduplicated [`ColorSet`].
/// 2. If there are at most `n_colors` of them, return them all.
/// 3. Otherwise reduce them to exactly `n_colors` with mini-batch k-means.
///
/// ```
/// use svg_palette::{ReduceOptions, find_dominant_colors};
///
/// let svg = "<rect fill='#FF0000'/><rect fill='rgb(0, 255, 0)'/>";
/// let palette = find_dominant_colors(svg, 5, &ReduceOptions::default())?;
/// assert_eq!(palette.to_hex_strings(), ["#00ff00", "#ff0000"]);
/// # Ok::<(), svg_palette::PaletteError>(())
/// ```
pub fn find_dominant_colors(
    text: &str,
    n_colors: usize,
    options: &ReduceOptions,
) -> Result<Palette> {
    let colors = extract(text);
    reduce(&colors, n_colors, options)
}

// ------------------------------------------------------------
// JavaScript bindings
// ------------------------------------------------------------

fn hex_array(hex: Vec<String>) -> Array {
    let out = Array::new();
    for h in hex {
        out.push(&JsValue::from_str(&h));
    }
    out
}

/// Every distinct color literal in `svg`, as canonical hex strings.
#[wasm_bindgen(js_name = extractColors)]
pub fn extract_colors(svg: &str) -> Array {
    hex_array(extract(svg).to_hex_strings())
}

/// Dominant colors of `svg` as canonical hex strings.
///
/// `batch_size` and `seed` fall back to the library defaults when omitted.
#[wasm_bindgen(js_name = dominantColors)]
pub fn dominant_colors(
    svg: &str,
    n_colors: usize,
    batch_size: Option<usize>,
    seed: Option<u32>,
) -> std::result::Result<Array, JsValue> {
    let mut options = ReduceOptions::new();
    if let Some(b) = batch_size {
        options = options.with_batch_size(b);
    }
    if let Some(s) = seed {
        options = options.with_seed(s as u64);
    }

    let palette = find_dominant_colors(svg, n_colors, &options)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(hex_array(palette.to_hex_strings()))
}
