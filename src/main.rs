//! CLI entry point for exemplar-driven pixel synthesis

use clap::Parser;
use pixelcollapse::io::cli::{Cli, FileProcessor};

fn main() -> pixelcollapse::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
