//! CLI entry point for cloud and shadow segmentation

use clap::Parser;
use cloudmask::io::cli::{Cli, FileProcessor};
use cloudmask::io::logging;

fn main() -> cloudmask::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.quiet);
    let mut processor = FileProcessor::new(cli);
    processor.process().map(|_| ())
}
