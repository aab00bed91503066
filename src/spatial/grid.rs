//! Output pixels and per-cell candidate weights for a generation run
//!
//! Both grids are stored row-major (`[y, x]`) in `ndarray` arrays. Positions
//! handed across the public API are `(x, y)` pairs. Anything outside the
//! grid reads as the `Outside` sentinel, which models the permanent one-cell
//! border around the output.

use ndarray::{Array2, Array3, ArrayView1, ArrayViewMut1, Axis};

/// Grid coordinate as `(x, y)`
pub type Position = (usize, usize);

/// Value a rule can observe at an offset: a palette color or the edge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Neighbor {
    /// Beyond the grid edge
    Outside,
    /// Palette color by index
    Color(usize),
}

/// State of a single output cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Pixel {
    /// Border sentinel, never part of the palette
    Outside,
    /// Not resolved yet
    #[default]
    Unset,
    /// Resolved to a palette color
    Color(usize),
}

impl Pixel {
    /// The value this pixel contributes to propagation, if fixed
    pub const fn as_neighbor(self) -> Option<Neighbor> {
        match self {
            Self::Outside => Some(Neighbor::Outside),
            Self::Color(index) => Some(Neighbor::Color(index)),
            Self::Unset => None,
        }
    }

    /// Whether the pixel still awaits a color
    pub const fn is_unset(self) -> bool {
        matches!(self, Self::Unset)
    }
}

impl From<Neighbor> for Pixel {
    fn from(neighbor: Neighbor) -> Self {
        match neighbor {
            Neighbor::Outside => Self::Outside,
            Neighbor::Color(index) => Self::Color(index),
        }
    }
}

/// Convert a signed position to grid indices if it lies inside `width` x `height`
pub fn checked_position(x: i64, y: i64, width: usize, height: usize) -> Option<Position> {
    let col = usize::try_from(x).ok()?;
    let row = usize::try_from(y).ok()?;
    (col < width && row < height).then_some((col, row))
}

/// Width x height buffer of output pixels
#[derive(Clone, Debug)]
pub struct OutputGrid {
    pixels: Array2<Pixel>,
}

impl OutputGrid {
    /// Create a grid with every cell unset
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), Pixel::Unset),
        }
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    /// Pixel at a signed position; the border and beyond read as `Outside`
    pub fn get(&self, x: i64, y: i64) -> Pixel {
        checked_position(x, y, self.width(), self.height())
            .and_then(|(col, row)| self.pixels.get([row, col]).copied())
            .unwrap_or(Pixel::Outside)
    }

    /// Fix an in-grid cell; positions outside the grid are ignored
    pub fn set(&mut self, position: Position, pixel: Pixel) {
        let (x, y) = position;
        if let Some(cell) = self.pixels.get_mut([y, x]) {
            *cell = pixel;
        }
    }

    /// Count of cells still unset
    pub fn unset_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| pixel.is_unset()).count()
    }

    /// Iterate over `((x, y), pixel)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, Pixel)> + '_ {
        self.pixels
            .indexed_iter()
            .map(|((row, col), &pixel)| ((col, row), pixel))
    }

    /// Raw row-major pixel array
    pub const fn pixels(&self) -> &Array2<Pixel> {
        &self.pixels
    }
}

/// Per-cell mapping from palette color to non-negative compatibility weight
///
/// Weight 0 means eliminated. Every entry starts at 1.
#[derive(Clone, Debug)]
pub struct CandidateGrid {
    weights: Array3<u64>,
}

impl CandidateGrid {
    /// Create a grid where every palette color has weight 1 in every cell
    pub fn new(width: usize, height: usize, palette_len: usize) -> Self {
        Self {
            weights: Array3::ones((height, width, palette_len)),
        }
    }

    /// Number of palette colors tracked per cell
    pub fn palette_len(&self) -> usize {
        self.weights.dim().2
    }

    fn contains(&self, position: Position) -> bool {
        let (height, width, _) = self.weights.dim();
        position.0 < width && position.1 < height
    }

    /// Weight vector of a cell, indexed by palette color
    pub fn weights(&self, position: Position) -> Option<ArrayView1<'_, u64>> {
        let (x, y) = position;
        self.contains(position).then(|| {
            self.weights
                .index_axis(Axis(0), y)
                .index_axis_move(Axis(0), x)
        })
    }

    /// Mutable weight vector of a cell
    pub fn weights_mut(&mut self, position: Position) -> Option<ArrayViewMut1<'_, u64>> {
        let (x, y) = position;
        if self.contains(position) {
            Some(
                self.weights
                    .index_axis_mut(Axis(0), y)
                    .index_axis_move(Axis(0), x),
            )
        } else {
            None
        }
    }

    /// Number of colors with strictly positive weight at a cell
    pub fn viable_count(&self, position: Position) -> usize {
        self.weights(position)
            .map_or(0, |weights| weights.iter().filter(|&&w| w > 0).count())
    }
}
