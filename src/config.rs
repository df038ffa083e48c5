//! Configuration for directory extraction runs.
//!
//! All settings are explicit; nothing is read from the environment.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Default number of files per batch.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Upper bound accepted for `batch_size`.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Default documents artifact file name.
pub const DEFAULT_DOCUMENTS_FILE: &str = "documents_output.json";

/// Default footnotes artifact file name.
pub const DEFAULT_FOOTNOTES_FILE: &str = "footnotes_output.json";

/// Directory extraction configuration.
///
/// # Example
///
/// ```
/// use rtf_oxide::config::ExtractionConfig;
///
/// let config = ExtractionConfig::new("/data/books")
///     .with_batch_size(8)
///     .with_workers(4)
///     .with_source_label("Library export");
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.output_dir(), std::path::Path::new("/data/books"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Directory holding the source documents
    pub input_dir: PathBuf,

    /// Directory receiving the two artifacts (None = `input_dir`)
    pub output_dir: Option<PathBuf>,

    /// Files per batch; batches run strictly one after another
    pub batch_size: usize,

    /// Worker threads per batch (None = one per available core)
    pub workers: Option<usize>,

    /// Eligible file extension, compared case-insensitively, without the dot
    pub extension: String,

    /// File name of the documents artifact
    pub documents_file: String,

    /// File name of the footnotes artifact
    pub footnotes_file: String,

    /// Fixed `Metadata.source` value (None = each document's file name)
    pub source_label: Option<String>,

    /// Emit the post-stitching text with each document entry
    pub include_stitched_text: bool,
}

impl ExtractionConfig {
    /// Create a configuration with defaults for everything but the input directory.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: None,
            extension: "rtf".to_string(),
            documents_file: DEFAULT_DOCUMENTS_FILE.to_string(),
            footnotes_file: DEFAULT_FOOTNOTES_FILE.to_string(),
            source_label: None,
            include_stitched_text: false,
        }
    }

    /// Write artifacts somewhere other than the input directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the number of files per batch.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Bound the worker pool used inside a batch.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Change the eligible extension (leading dot is ignored).
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Rename the documents artifact.
    pub fn with_documents_file(mut self, name: impl Into<String>) -> Self {
        self.documents_file = name.into();
        self
    }

    /// Rename the footnotes artifact.
    pub fn with_footnotes_file(mut self, name: impl Into<String>) -> Self {
        self.footnotes_file = name.into();
        self
    }

    /// Use a fixed source label in every document's metadata.
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    /// Include the stitched text in the documents artifact.
    pub fn with_stitched_text(mut self, enable: bool) -> Self {
        self.include_stitched_text = enable;
        self
    }

    /// Directory the artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.input_dir)
    }

    /// Full path of the documents artifact.
    pub fn documents_path(&self) -> PathBuf {
        self.output_dir().join(&self.documents_file)
    }

    /// Full path of the footnotes artifact.
    pub fn footnotes_path(&self) -> PathBuf {
        self.output_dir().join(&self.footnotes_file)
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be at least 1".to_string()));
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(Error::InvalidConfig(format!(
                "batch_size {} exceeds the maximum of {}",
                self.batch_size, MAX_BATCH_SIZE
            )));
        }
        if self.workers == Some(0) {
            return Err(Error::InvalidConfig("workers must be at least 1".to_string()));
        }
        if self.extension.is_empty() {
            return Err(Error::InvalidConfig("extension must not be empty".to_string()));
        }
        if self.documents_file.is_empty() || self.footnotes_file.is_empty() {
            return Err(Error::InvalidConfig("output file names must not be empty".to_string()));
        }
        if self.documents_file == self.footnotes_file {
            return Err(Error::InvalidConfig(format!(
                "documents and footnotes artifacts share the name {}",
                self.documents_file
            )));
        }
        Ok(())
    }

    /// True when `path` carries the eligible extension.
    pub fn is_eligible(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::new("in");
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.workers, None);
        assert_eq!(config.extension, "rtf");
        assert_eq!(config.documents_path(), PathBuf::from("in").join(DEFAULT_DOCUMENTS_FILE));
        assert_eq!(config.footnotes_path(), PathBuf::from("in").join(DEFAULT_FOOTNOTES_FILE));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = ExtractionConfig::new("in").with_batch_size(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_batch_size_upper_bound() {
        assert!(ExtractionConfig::new("in")
            .with_batch_size(MAX_BATCH_SIZE)
            .validate()
            .is_ok());
        assert!(ExtractionConfig::new("in")
            .with_batch_size(MAX_BATCH_SIZE + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = ExtractionConfig::new("in").with_workers(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_same_artifact_names_rejected() {
        let config = ExtractionConfig::new("in")
            .with_documents_file("out.json")
            .with_footnotes_file("out.json");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extension_matching() {
        let config = ExtractionConfig::new("in").with_extension(".RTF");
        assert!(config.is_eligible(Path::new("a/b/chapter1.rtf")));
        assert!(config.is_eligible(Path::new("chapter1.Rtf")));
        assert!(!config.is_eligible(Path::new("chapter1.docx")));
        assert!(!config.is_eligible(Path::new("rtf")));
    }

    #[test]
    fn test_output_dir_override() {
        let config = ExtractionConfig::new("in").with_output_dir("out");
        assert_eq!(config.output_dir(), Path::new("out"));
        assert_eq!(config.documents_path(), PathBuf::from("out/documents_output.json"));
    }
}
