//! Exemplar images as read-only grids of RGBA colors

use crate::io::error::{AlgorithmError, Result};
use ndarray::Array2;
use std::path::Path;

/// Read-only access to a rectangular grid of colors
///
/// The learner only ever asks for dimensions and individual pixels, so any
/// image type can act as an exemplar.
pub trait ColorSource {
    /// Number of columns
    fn width(&self) -> usize;

    /// Number of rows
    fn height(&self) -> usize;

    /// Color at `(x, y)`, `None` when out of bounds
    fn color_at(&self, x: usize, y: usize) -> Option<[u8; 4]>;
}

/// In-memory exemplar stored row-major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exemplar {
    pixels: Array2<[u8; 4]>,
}

impl Exemplar {
    /// Build an exemplar from rows of RGBA values
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are empty or of unequal length
    pub fn from_rows(rows: &[Vec<[u8; 4]>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if height == 0 || width == 0 {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "Exemplar must contain at least one pixel".to_string(),
            });
        }
        if rows.iter().any(|row| row.len() != width) {
            return Err(AlgorithmError::InvalidSourceData {
                reason: format!("Exemplar rows must all be {width} pixels wide"),
            });
        }

        let flat: Vec<[u8; 4]> = rows.iter().flatten().copied().collect();
        let pixels = Array2::from_shape_vec((height, width), flat).map_err(|e| {
            AlgorithmError::InvalidSourceData {
                reason: e.to_string(),
            }
        })?;

        Ok(Self { pixels })
    }

    /// Convert a decoded RGBA image
    ///
    /// # Errors
    ///
    /// Returns an error if the image has no pixels
    pub fn from_rgba_image(img: &image::RgbaImage) -> Result<Self> {
        let (width, height) = (img.width() as usize, img.height() as usize);
        if width == 0 || height == 0 {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "Exemplar image is empty".to_string(),
            });
        }

        let mut pixels = Array2::from_elem((height, width), [0u8; 4]);
        for (x, y, pixel) in img.enumerate_pixels() {
            if let Some(cell) = pixels.get_mut([y as usize, x as usize]) {
                *cell = pixel.0;
            }
        }

        Ok(Self { pixels })
    }

    /// Load an exemplar from an image file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file at the given path cannot be opened or decoded
    /// - The decoded image has no pixels
    pub fn from_png_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let img = image::open(&path_buf).map_err(|e| AlgorithmError::ImageLoad {
            path: path_buf,
            source: e,
        })?;

        Self::from_rgba_image(&img.to_rgba8())
    }
}

impl ColorSource for Exemplar {
    fn width(&self) -> usize {
        self.pixels.ncols()
    }

    fn height(&self) -> usize {
        self.pixels.nrows()
    }

    fn color_at(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        self.pixels.get([y, x]).copied()
    }
}

impl ColorSource for image::RgbaImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn color_at(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.get_pixel_checked(x, y).map(|pixel| pixel.0)
    }
}
