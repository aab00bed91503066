//! Rendering an output grid to RGBA and exporting it as PNG

use crate::analysis::rules::Palette;
use crate::io::configuration::{OUTSIDE_COLOR, UNSET_COLOR};
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::{OutputGrid, Pixel};
use image::{ImageBuffer, Rgba, RgbaImage};

/// Map a single pixel to RGBA, unset cells become the placeholder color
///
/// # Errors
///
/// Returns an error if a resolved pixel refers to a color outside the palette
pub fn pixel_to_rgba(pixel: Pixel, palette: &Palette) -> Result<[u8; 4]> {
    match pixel {
        Pixel::Unset => Ok(UNSET_COLOR),
        Pixel::Outside => Ok(OUTSIDE_COLOR),
        Pixel::Color(index) => {
            palette
                .color(index)
                .ok_or_else(|| AlgorithmError::InvalidSourceData {
                    reason: format!(
                        "Palette index {index} out of range (palette has {} colors)",
                        palette.len()
                    ),
                })
        }
    }
}

/// Render the full grid, unset cells included
///
/// # Errors
///
/// Returns an error if a resolved pixel refers to a color outside the palette
pub fn render_grid(grid: &OutputGrid, palette: &Palette) -> Result<RgbaImage> {
    let mut img = ImageBuffer::new(grid.width() as u32, grid.height() as u32);
    for ((x, y), pixel) in grid.iter() {
        img.put_pixel(x as u32, y as u32, Rgba(pixel_to_rgba(pixel, palette)?));
    }
    Ok(img)
}

/// Export the grid as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - A resolved pixel refers to a color outside the palette
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &OutputGrid, palette: &Palette, output_path: &str) -> Result<()> {
    let img = render_grid(grid, palette)?;

    if let Some(parent) = std::path::Path::new(output_path).parent() {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.into(),
            source: e,
        })?;

    Ok(())
}
