//! Directory-level driver.
//!
//! Lists the eligible files of the input directory in lexicographic order,
//! feeds them to the [`BatchOrchestrator`] one batch at a time and writes the
//! documents and footnotes artifacts.

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::extractors::{ExtractOptions, FinishedDocument};
use crate::pipeline::batch::{BatchOrchestrator, FileFailure, RunState};
use crate::record::{DocumentEntry, DocumentsArtifact, FootnotesArtifact};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of a directory run.
#[derive(Debug)]
pub struct RunReport {
    /// Eligible files found
    pub files: usize,
    /// Documents written
    pub documents: usize,
    /// Footnotes written
    pub footnotes: usize,
    /// Documents flagged duplicate
    pub duplicates: usize,
    /// Files skipped
    pub failures: Vec<FileFailure>,
    /// Artifacts that could not be written
    pub write_errors: Vec<Error>,
    /// Documents artifact location
    pub documents_path: PathBuf,
    /// Footnotes artifact location
    pub footnotes_path: PathBuf,
}

impl RunReport {
    /// True when both artifacts were written.
    pub fn artifacts_written(&self) -> bool {
        self.write_errors.is_empty()
    }
}

/// Drives a whole directory through extraction.
///
/// # Example
///
/// ```no_run
/// use rtf_oxide::config::ExtractionConfig;
/// use rtf_oxide::pipeline::DirectoryDriver;
///
/// let config = ExtractionConfig::new("books").with_batch_size(32);
/// let report = DirectoryDriver::new(config).run()?;
/// println!("{} documents, {} footnotes", report.documents, report.footnotes);
/// # Ok::<(), rtf_oxide::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryDriver {
    config: ExtractionConfig,
}

impl DirectoryDriver {
    /// Create a driver for a configuration.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Run extraction over the directory and write both artifacts.
    ///
    /// Per-file and write failures are collected in the report; only an
    /// invalid configuration, an unreadable input directory or a worker pool
    /// failure abort the run.
    pub fn run(&self) -> Result<RunReport> {
        self.config.validate()?;
        let files = discover_files(&self.config)?;
        let batches = files.len().div_ceil(self.config.batch_size);
        let options = ExtractOptions::new(self.config.source_label.clone());
        let orchestrator = BatchOrchestrator::new(&self.config, options)?;
        log::info!(
            "Processing {} file(s) from {} in {} batch(es) on {} worker(s)",
            files.len(),
            self.config.input_dir.display(),
            batches,
            orchestrator.workers()
        );

        let mut state = RunState::new();
        for (n, batch) in files.chunks(self.config.batch_size).enumerate() {
            log::debug!("Batch {}/{}: {} file(s)", n + 1, batches, batch.len());
            orchestrator.run_batch(batch, &mut state);
        }

        let (documents, failures) = state.into_parts();
        let entries: Vec<DocumentEntry> = documents
            .into_iter()
            .map(|doc: FinishedDocument| doc.entry)
            .collect();

        let mut report = RunReport {
            files: files.len(),
            documents: entries.len(),
            footnotes: entries.iter().map(|e| e.record.footnotes.len()).sum(),
            duplicates: entries.iter().filter(|e| e.is_duplicate).count(),
            failures,
            write_errors: Vec::new(),
            documents_path: self.config.documents_path(),
            footnotes_path: self.config.footnotes_path(),
        };

        let artifact = DocumentsArtifact {
            documents: &entries,
        };
        if let Err(e) = write_json(&report.documents_path, &artifact) {
            log::error!("{}", e);
            report.write_errors.push(e);
        }

        let footnotes = FootnotesArtifact {
            footnotes: entries
                .iter()
                .flat_map(|e| e.record.footnotes.iter())
                .collect(),
        };
        if let Err(e) = write_json(&report.footnotes_path, &footnotes) {
            log::error!("{}", e);
            report.write_errors.push(e);
        }

        log::info!(
            "Extracted {} document(s), {} footnote(s), {} duplicate(s), {} failure(s)",
            report.documents,
            report.footnotes,
            report.duplicates,
            report.failures.len()
        );
        Ok(report)
    }
}

/// Eligible files of the input directory, sorted by name.
pub fn discover_files(config: &ExtractionConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(&config.input_dir)? {
        let path = entry?.path();
        if path.is_file() && config.is_eligible(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Write a value as pretty JSON, creating the parent directory if needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let write_error = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(write_error)?);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| write_error(e.into()))?;
    writer.flush().map_err(write_error)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.rtf", "a.RTF", "c.txt", "10.rtf", "2.rtf"] {
            fs::write(dir.path().join(name), "{\\rtf1 }").unwrap();
        }
        fs::create_dir(dir.path().join("sub.rtf")).unwrap();

        let config = ExtractionConfig::new(dir.path());
        let names: Vec<String> = discover_files(&config)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["10.rtf", "2.rtf", "a.RTF", "b.rtf"]);
    }

    #[test]
    fn test_missing_input_dir() {
        let config = ExtractionConfig::new("/nonexistent/input/dir");
        assert!(matches!(discover_files(&config), Err(Error::Io(_))));
    }

    #[test]
    fn test_write_json_creates_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.json");
        write_json(&path, &serde_json::json!({"k": "שלום"})).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("שלום"));
        assert!(written.contains("\n  \"k\""));
    }

    #[test]
    fn test_invalid_config_aborts() {
        let config = ExtractionConfig::new("in").with_batch_size(0);
        assert!(matches!(
            DirectoryDriver::new(config).run(),
            Err(Error::InvalidConfig(_))
        ));
    }
}
