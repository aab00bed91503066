//! Command-line interface for batch synthesis from PNG exemplars

use crate::algorithm::executor::{Synthesizer, validate_dimensions};
use crate::analysis::exemplar::Exemplar;
use crate::io::configuration::{
    DEFAULT_RADIUS, DEFAULT_SEED, DEFAULT_SIZE, GIF_FRAME_DELAY_MS, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::export_grid_as_png;
use crate::io::progress::ProgressManager;
use crate::spatial::neighborhood::NeighborhoodOffsets;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Cells resolved between progress bar refreshes
const PROGRESS_REFRESH_CELLS: usize = 64;

#[derive(Parser)]
#[command(name = "pixelcollapse")]
#[command(
    author,
    version,
    about = "Synthesize images that locally resemble an exemplar"
)]
/// Command-line arguments for the synthesis tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input PNG file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Side length of a square output (overridden by --width/--height)
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Output width in pixels
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Output height in pixels
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Manhattan radius of the learned neighborhood
    #[arg(short, long, default_value_t = DEFAULT_RADIUS)]
    pub radius: usize,

    /// Random seed for reproducible generation
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Also write the generation process as an animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(short, long)]
    pub no_skip: bool,

    /// Print every learned rule before generating
    #[arg(long)]
    pub dump_rules: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Output dimensions as `(width, height)`
    ///
    /// A single explicit side makes the output square.
    pub const fn dimensions(&self) -> (usize, usize) {
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w),
            (None, Some(h)) => (h, h),
            (None, None) => (self.size, self.size),
        }
    }

    /// Reject malformed size or radius before any work starts
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions or the radius are out of range
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.dimensions();
        validate_dimensions(width, height)?;
        NeighborhoodOffsets::new(self.radius)?;
        Ok(())
    }
}

/// Orchestrates batch processing of PNG files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Process files according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if argument validation, target discovery or file
    /// processing fails
    pub fn process(&mut self) -> Result<()> {
        self.cli.validate()?;
        let files = self.collect_files()?;

        if files.is_empty() {
            return Ok(());
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(files.len());
        }

        for (index, file) in files.iter().enumerate() {
            self.process_file(file, index)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(())
    }

    /// PNG files the target refers to, minus those already processed
    ///
    /// # Errors
    ///
    /// Returns an error if the target is neither a PNG file nor a directory
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        if self.cli.target.is_file() {
            if is_png(&self.cli.target) {
                if self.should_process_file(&self.cli.target) {
                    Ok(vec![self.cli.target.clone()])
                } else {
                    Ok(vec![])
                }
            } else {
                Err(invalid_parameter(
                    "target",
                    &self.cli.target.display(),
                    &"file must be a PNG image",
                ))
            }
        } else if self.cli.target.is_dir() {
            let mut files = Vec::new();
            for entry in std::fs::read_dir(&self.cli.target)? {
                let path = entry?.path();
                if is_png(&path) && !is_generated(&path) && self.should_process_file(&path) {
                    files.push(path);
                }
            }
            files.sort();
            Ok(files)
        } else {
            Err(invalid_parameter(
                "target",
                &self.cli.target.display(),
                &"must be a PNG file or directory",
            ))
        }
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }

        let output_path = Self::get_output_path(input_path);
        if output_path.exists() {
            // Allow print for user feedback for progress messages
            #[allow(clippy::print_stderr)]
            if !self.cli.quiet {
                eprintln!("Skipping: {} (output exists)", input_path.display());
            }
            false
        } else {
            true
        }
    }

    // Allow print for learning summaries, rule dumps and contradiction notices
    #[allow(clippy::print_stderr)]
    fn process_file(&mut self, input_path: &Path, index: usize) -> Result<()> {
        let output_path = Self::get_output_path(input_path);
        let (width, height) = self.cli.dimensions();

        let mut synthesizer = Synthesizer::new(Exemplar::from_png_file(input_path)?);
        synthesizer.prepare(self.cli.radius)?;

        if let Some(model) = synthesizer.model() {
            if !self.cli.quiet {
                eprintln!(
                    "{}: learned {} colors and {} rules",
                    input_path.display(),
                    model.palette().len(),
                    model.rules().len()
                );
            }
            if self.cli.dump_rules {
                for rule in model.rules().rules() {
                    eprintln!("{}", rule.display(model.palette()));
                }
            }
        }

        let mut session = synthesizer.session(width, height, self.cli.seed)?;
        if self.cli.visualize {
            session.enable_visualization();
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.start_file(index, input_path, session.cell_count());
        }

        loop {
            let outcome = session.step()?;
            if outcome.is_terminal() {
                break;
            }
            let resolved = session.stats().resolved;
            if resolved % PROGRESS_REFRESH_CELLS == 0 {
                if let Some(ref mut pm) = self.progress_manager {
                    pm.update_cells(index, resolved);
                }
            }
        }

        let stats = session.stats();
        if stats.contradictions > 0 && !self.cli.quiet {
            eprintln!(
                "{}: {} cells left unresolved by contradictions",
                input_path.display(),
                stats.contradictions
            );
        }

        export_grid_as_png(
            session.output(),
            session.model().palette(),
            path_str(&output_path)?,
        )?;

        if let Some(viz) = &session.visualization {
            let viz_path = Self::get_visualization_path(input_path);
            viz.export_gif(path_str(&viz_path)?, GIF_FRAME_DELAY_MS)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.complete_file(index, &stats);
        }

        Ok(())
    }

    /// Path of the generated PNG for an input
    pub fn get_output_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let extension = input_path.extension().unwrap_or_default();
        let output_name = format!(
            "{}{}.{}",
            stem.to_string_lossy(),
            OUTPUT_SUFFIX,
            extension.to_string_lossy()
        );

        input_path.with_file_name(output_name)
    }

    /// Path of the generation GIF for an input
    pub fn get_visualization_path(input_path: &Path) -> PathBuf {
        let stem = input_path.file_stem().unwrap_or_default();
        let viz_name = format!("{}_visualization.gif", stem.to_string_lossy());

        input_path.with_file_name(viz_name)
    }
}

fn is_png(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("png")
}

// Results written next to their inputs must not be picked up as exemplars
fn is_generated(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(OUTPUT_SUFFIX))
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| invalid_parameter("path", &path.display(), &"path is not valid UTF-8"))
}
