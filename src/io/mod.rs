/// Command-line interface and batch processing
pub mod cli;
/// Constants and defaults
pub mod configuration;
/// Error types
pub mod error;
/// PNG rendering and export
pub mod image;
/// Terminal progress display
pub mod progress;
/// GIF capture of a run
pub mod visualization;
