//! End-to-end extraction of one source document.
//!
//! Extraction runs in two steps. [`DocumentExtractor::extract_file`] needs
//! nothing but the file itself and is safe to run in parallel: it reads,
//! decodes and classifies the document and evaluates the overlap predicates.
//! [`Extraction::finish`] then applies the overlap policy once the
//! neighbours' windows and the duplicate flags are known.

use crate::error::{Error, Result};
use crate::extractors::footnotes::{breadcrumbs, FootnoteExtractor};
use crate::layout::{classify_line, segment_body, LineCategory};
use crate::lexer::{self, RawLine};
use crate::markup;
use crate::pipeline::duplicates::DuplicateFlags;
use crate::pipeline::overlap::{self, OverlapSignals, OverlapWindow, StitchContext, StitchDecision};
use crate::record::{DocumentEntry, DocumentRecord, Metadata};
use std::path::{Path, PathBuf};

/// Settings shared by every document of a run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Fixed metadata source (None = file name)
    pub source_label: Option<String>,
    /// Extraction date stamped on every record
    pub uploaded_date: String,
}

impl ExtractOptions {
    /// Options stamped with today's date.
    pub fn new(source_label: Option<String>) -> Self {
        Self {
            source_label,
            uploaded_date: Metadata::current_date(),
        }
    }
}

/// A classified document waiting for neighbour context.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Source path
    pub path: PathBuf,
    /// File name used in the artifact
    pub source_file: String,
    /// Structured content
    pub record: DocumentRecord,
    /// Overlap predicates
    pub signals: OverlapSignals,
    /// Whole-document text with codes stripped
    pub text: String,
    /// Duplicate comparison key of `record`
    pub comparison_key: String,
    /// Head window of the unstitched text
    pub head: OverlapWindow,
    /// Tail window of the unstitched text
    pub tail: OverlapWindow,
}

/// A document after the overlap policy has run.
#[derive(Debug, Clone)]
pub struct FinishedDocument {
    /// Source path
    pub path: PathBuf,
    /// Artifact entry
    pub entry: DocumentEntry,
    /// Stitching applied
    pub decision: StitchDecision,
    /// Head window of the stitched text
    pub head: OverlapWindow,
    /// Tail window of the stitched text
    pub tail: OverlapWindow,
}

/// Per-document extractor.
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    options: ExtractOptions,
}

impl DocumentExtractor {
    /// Create an extractor.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Read, decode and classify a file.
    pub fn extract_file(&self, path: &Path) -> Result<Extraction> {
        let bytes = std::fs::read(path).map_err(|source| Error::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        let lines = lexer::decode_bytes(&bytes).map_err(|e| e.with_path(path))?;

        let source_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut extraction = self.extract_lines(&source_file, &lines)?;
        extraction.path = path.to_path_buf();
        Ok(extraction)
    }

    /// Decode and classify an in-memory source.
    pub fn extract_source(&self, source_file: &str, source: &str) -> Result<Extraction> {
        let lines = lexer::decode(source)?;
        self.extract_lines(source_file, &lines)
    }

    /// Classify decoded lines.
    pub fn extract_lines(&self, source_file: &str, lines: &[RawLine]) -> Result<Extraction> {
        let metadata = Metadata {
            source: self
                .options
                .source_label
                .clone()
                .unwrap_or_else(|| source_file.to_string()),
            uploaded_date: self.options.uploaded_date.clone(),
        };

        let record = build_record(lines, metadata);
        let body = segment_body(lines);
        let signals = OverlapSignals::evaluate(
            record.breadcrumbs(),
            &body,
            lines
                .iter()
                .map(|line| line.text.as_str())
                .find(|text| !markup::clean_text(text).is_empty()),
        );
        let text = document_text(lines);
        let comparison_key = record.comparison_key()?;

        log::debug!(
            "{}: {} text lines, {} footnotes, suppression={}",
            source_file,
            record.text_line_count(),
            record.footnotes.len(),
            signals.any()
        );

        Ok(Extraction {
            path: PathBuf::from(source_file),
            source_file: source_file.to_string(),
            head: OverlapWindow::head(&text),
            tail: OverlapWindow::tail(&text),
            record,
            signals,
            text,
            comparison_key,
        })
    }
}

impl Extraction {
    /// Apply the overlap policy and annotate the record.
    ///
    /// `keep_text` attaches the stitched text to the artifact entry.
    pub fn finish(
        self,
        ctx: &StitchContext<'_>,
        flags: DuplicateFlags,
        keep_text: bool,
    ) -> FinishedDocument {
        let (decision, stitched) = overlap::stitch(&self.text, &self.signals, ctx);
        if decision != StitchDecision::Suppressed {
            log::trace!("{}: stitched {:?}", self.source_file, decision);
        }

        FinishedDocument {
            path: self.path,
            head: OverlapWindow::head(&stitched),
            tail: OverlapWindow::tail(&stitched),
            decision,
            entry: DocumentEntry {
                record: self.record,
                source_file: self.source_file,
                is_duplicate: flags.is_duplicate,
                first_in_book: flags.first_in_book,
                stitched_text: keep_text.then_some(stitched),
            },
        }
    }
}

/// Classify every line into a fresh record.
pub fn build_record(lines: &[RawLine], metadata: Metadata) -> DocumentRecord {
    let mut record = DocumentRecord::new(metadata);
    let mut notes = FootnoteExtractor::new();

    for line in lines {
        let classified = classify_line(&line.text);
        record.green_background_text.extend(classified.green_runs);
        let text = classified.text;

        match classified.category {
            LineCategory::Breadcrumb => record.set_breadcrumbs(breadcrumbs(&text)),
            LineCategory::Footnote => {
                let note = notes.footnote(line.number, text);
                record.footnotes.push(note);
            },
            category => {
                if !text.is_empty() {
                    if let Some(bucket) = record.bucket_mut(category) {
                        notes.note_text_line(&text);
                        bucket.push(text);
                    }
                }
            },
        }

        notes.finish_line(&line.text);
    }

    record
}

/// Whole-document text: each line stripped of codes, blank lines dropped.
pub fn document_text(lines: &[RawLine]) -> String {
    lines
        .iter()
        .map(|line| markup::clean_text(&line.text))
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
