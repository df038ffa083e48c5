//! Extract structured JSON from a directory of RTF documents.
//!
//! Usage:
//!   rtf_extract books/
//!   rtf_extract books/ --output-dir out --batch-size 32 --workers 4
//!   RUST_LOG=debug rtf_extract books/ --stitched-text

use clap::Parser;
use rtf_oxide::config::{
    ExtractionConfig, DEFAULT_BATCH_SIZE, DEFAULT_DOCUMENTS_FILE, DEFAULT_FOOTNOTES_FILE,
};
use rtf_oxide::pipeline::DirectoryDriver;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(version, about = "Extract titles, breadcrumbs and footnotes from RTF collections")]
struct Cli {
    /// Directory holding the source documents
    input_dir: PathBuf,

    /// Directory receiving the JSON artifacts (defaults to the input directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Files extracted per batch
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Worker threads per batch (defaults to the number of cores)
    #[arg(long)]
    workers: Option<usize>,

    /// Eligible file extension
    #[arg(long, default_value = "rtf")]
    extension: String,

    /// Documents artifact file name
    #[arg(long, default_value = DEFAULT_DOCUMENTS_FILE)]
    documents_file: String,

    /// Footnotes artifact file name
    #[arg(long, default_value = DEFAULT_FOOTNOTES_FILE)]
    footnotes_file: String,

    /// Fixed metadata source label (defaults to each file name)
    #[arg(long = "source")]
    source_label: Option<String>,

    /// Include the stitched text of each document
    #[arg(long)]
    stitched_text: bool,
}

impl Cli {
    fn into_config(self) -> ExtractionConfig {
        let mut config = ExtractionConfig::new(self.input_dir)
            .with_batch_size(self.batch_size)
            .with_extension(&self.extension)
            .with_documents_file(self.documents_file)
            .with_footnotes_file(self.footnotes_file)
            .with_stitched_text(self.stitched_text);
        if let Some(dir) = self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(label) = self.source_label {
            config = config.with_source_label(label);
        }
        config
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let config = Cli::parse().into_config();

    let start = Instant::now();
    let report = match DirectoryDriver::new(config).run() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        },
    };

    println!("Files:      {}", report.files);
    println!("Documents:  {}", report.documents);
    println!("Footnotes:  {}", report.footnotes);
    println!("Duplicates: {}", report.duplicates);
    println!("Failures:   {}", report.failures.len());
    for failure in &report.failures {
        println!("  {}: {}", failure.path.display(), failure.error);
    }
    println!("Elapsed:    {:.2}s", start.elapsed().as_secs_f64());

    if report.artifacts_written() {
        println!("Wrote {}", report.documents_path.display());
        println!("Wrote {}", report.footnotes_path.display());
        ExitCode::SUCCESS
    } else {
        for e in &report.write_errors {
            eprintln!("Error: {}", e);
        }
        ExitCode::FAILURE
    }
}
