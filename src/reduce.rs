//! Reducing a color set to a fixed-size palette.

use crate::color::{Color, Point};
use crate::error::{PaletteError, Result};
use crate::extract::ColorSet;
use crate::kmeans::{MiniBatchKMeans, nearest_center};

/// Palette size used when the caller does not pick one.
pub const DEFAULT_N_COLORS: usize = 5;
/// Points inspected per mini-batch iteration.
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
/// Largest squared center shift (in channel units) that still counts as converged.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Parameters for the clustering path of a reduction.
///
/// ```
/// use svg_palette::ReduceOptions;
///
/// let options = ReduceOptions::new().with_batch_size(256).with_seed(7);
/// assert_eq!(options.batch_size(), 256);
/// assert_eq!(options.seed(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReduceOptions {
    batch_size: usize,
    seed: u64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReduceOptions {
    pub const fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Number of points drawn per iteration. Must be at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Seed for initialization and batch sampling.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Upper bound on mini-batch iterations. Zero keeps the initial centers.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Stop once no center moves by this much (squared distance) in one
    /// iteration. Zero disables early stopping.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Reject parameters that cannot describe a run.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PaletteError::InvalidParameter {
                parameter: "batch_size",
                value: self.batch_size.to_string(),
            });
        }
        // Also catches NaN.
        if !(self.tolerance >= 0.0) {
            return Err(PaletteError::InvalidParameter {
                parameter: "tolerance",
                value: self.tolerance.to_string(),
            });
        }
        Ok(())
    }
}

/// Ordered representative colors for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    pub fn as_slice(&self) -> &[Color] {
        &self.colors
    }

    pub fn into_vec(self) -> Vec<Color> {
        self.colors
    }

    pub fn to_hex_strings(&self) -> Vec<String> {
        self.colors.iter().map(Color::to_hex).collect()
    }

    /// Index of the palette entry closest to `color` in RGB space, ties to
    /// the lowest index. `None` for an empty palette.
    pub fn nearest(&self, color: &Color) -> Option<usize> {
        let entries: Vec<Point> = self.colors.iter().map(Color::to_point).collect();
        nearest_center(&color.to_point(), &entries).map(|(idx, _)| idx)
    }
}

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        Self { colors }
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}

impl IntoIterator for Palette {
    type Item = Color;
    type IntoIter = std::vec::IntoIter<Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.into_iter()
    }
}

/// Reduces color lists to at most `k` representative colors.
#[derive(Debug, Clone, Default)]
pub struct PaletteReducer {
    kmeans: MiniBatchKMeans,
}

impl PaletteReducer {
    pub fn new(options: ReduceOptions) -> Self {
        Self {
            kmeans: MiniBatchKMeans::new(options),
        }
    }

    pub fn options(&self) -> &ReduceOptions {
        self.kmeans.options()
    }

    /// Reduce a canonical color set to `min(k, colors.len())` colors.
    ///
    /// When the set already fits, it is returned unchanged in canonical
    /// order. Otherwise the colors are clustered and the palette holds the
    /// rounded cluster centers in center order; collapsed clusters show up
    /// as repeated entries.
    pub fn reduce(&self, colors: &ColorSet, k: usize) -> Result<Palette> {
        self.reduce_colors(colors.as_slice(), k)
    }

    /// Like [`reduce`](Self::reduce) for an arbitrary color list. The list
    /// is neither deduplicated nor reordered, so its order feeds the seeded
    /// sampling directly.
    pub fn reduce_colors(&self, colors: &[Color], k: usize) -> Result<Palette> {
        self.options().validate()?;

        if colors.len() <= k {
            tracing::debug!(colors = colors.len(), k, "Palette fits, skipping clustering");
            return Ok(Palette::from(colors.to_vec()));
        }

        let points: Vec<Point> = colors.iter().map(Color::to_point).collect();
        let clustering = self.kmeans.fit(&points, k)?;

        Ok(clustering
            .centers
            .iter()
            .map(Color::from_point)
            .collect::<Vec<_>>()
            .into())
    }
}

/// Reduce `colors` to at most `k` colors with the given options.
pub fn reduce(colors: &ColorSet, k: usize, options: &ReduceOptions) -> Result<Palette> {
    PaletteReducer::new(*options).reduce(colors, k)
}
