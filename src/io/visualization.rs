//! Frame capture and GIF generation for watching a run unfold

use crate::io::configuration::{UNSET_COLOR, VIEWER_MIN_FRAME_DELAY_MS};
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::Position;
use image::{Frame, Rgba, RgbaImage};

/// A single resolved cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPlacement {
    /// Column
    pub x: usize,
    /// Row
    pub y: usize,
    /// Palette index drawn
    pub color: usize,
    /// Resolution order, starting at 1
    pub iteration: usize,
}

/// Records resolved cells so the run can be replayed as an animation
pub struct VisualizationCapture {
    placements: Vec<PixelPlacement>,
    dims: (usize, usize),
    palette: Vec<[u8; 4]>,
}

impl VisualizationCapture {
    /// Create an empty capture for a `width` x `height` output
    pub fn new(width: usize, height: usize, palette: Vec<[u8; 4]>) -> Self {
        Self {
            placements: Vec::with_capacity(width * height),
            dims: (width, height),
            palette,
        }
    }

    /// Records a resolved cell
    pub fn record_placement(&mut self, position: Position, color: usize, iteration: usize) {
        self.placements.push(PixelPlacement {
            x: position.0,
            y: position.1,
            color,
            iteration,
        });
    }

    /// Returns all recorded placements
    pub fn placements(&self) -> &[PixelPlacement] {
        &self.placements
    }

    /// Returns the total number of placement events
    pub const fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Export the captured run as a GIF with automatic frame skipping
    ///
    /// Frames faster than viewers support are merged, keeping the apparent
    /// animation speed. The last frame is held longer. A run that placed
    /// nothing still yields the blank canvas and the held final frame.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A placement refers to a color outside the palette
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &str, frame_delay_ms: u32) -> Result<()> {
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms.max(1))
        } else {
            1
        };

        let frames = self.generate_frames(effective_delay_ms, skip_factor as usize)?;

        if let Some(parent) = std::path::Path::new(output_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| AlgorithmError::FileSystem {
            path: output_path.into(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| AlgorithmError::ImageExport {
                path: output_path.into(),
                source: e,
            })?;

        Ok(())
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize) -> Result<Vec<Frame>> {
        let (width, height) = self.dims;
        let mut canvas = RgbaImage::from_pixel(width as u32, height as u32, Rgba(UNSET_COLOR));
        let mut frames = vec![Self::frame(&canvas, delay_ms)];

        for (count, placement) in self.placements.iter().enumerate() {
            let rgba = self.palette.get(placement.color).copied().ok_or_else(|| {
                AlgorithmError::InvalidSourceData {
                    reason: format!(
                        "Palette index {} out of range (palette has {} colors)",
                        placement.color,
                        self.palette.len()
                    ),
                }
            })?;
            if let Some(pixel) = canvas.get_pixel_mut_checked(placement.x as u32, placement.y as u32)
            {
                *pixel = Rgba(rgba);
            }

            if (count + 1) % skip_factor == 0 {
                frames.push(Self::frame(&canvas, delay_ms));
            }
        }

        if self.placements.len() % skip_factor != 0 {
            frames.push(Self::frame(&canvas, delay_ms));
        }

        // Final frame displays longer for better visibility
        frames.push(Self::frame(&canvas, delay_ms * 25));

        Ok(frames)
    }

    fn frame(canvas: &RgbaImage, delay_ms: u32) -> Frame {
        Frame::from_parts(
            canvas.clone(),
            0,
            0,
            image::Delay::from_numer_denom_ms(delay_ms, 1),
        )
    }
}
