//! Batch orchestration.
//!
//! A batch is extracted in two phases:
//!
//! 1. **Parallel**: every file is read, decoded and classified on the worker
//!    pool. Workers only return values; they never see each other's results.
//! 2. **Sequential**: results are reconciled in file order. Duplicate flags
//!    are computed against the true predecessor (which may belong to the
//!    previous batch), the overlap policy is applied with the neighbours'
//!    unstitched windows, and finished documents are appended to the run.
//!
//! Stitching inputs inside a batch always come from phase 1, so a document
//! never sees context its neighbour borrowed from it.

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::extractors::{DocumentExtractor, ExtractOptions, Extraction, FinishedDocument};
use crate::pipeline::duplicates::{first_in_book, is_duplicate, DuplicateFlags};
use crate::pipeline::overlap::{OverlapWindow, StitchContext};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::PathBuf;

/// A file excluded from the run.
#[derive(Debug)]
pub struct FileFailure {
    /// Offending file
    pub path: PathBuf,
    /// Why it was skipped
    pub error: Error,
}

/// The last reconciled document, carried to the next position.
#[derive(Debug, Clone)]
struct Predecessor {
    /// Index into the run's documents
    index: usize,
    /// Duplicate comparison key
    key: String,
    /// Tail window after stitching
    tail: OverlapWindow,
    /// Duplicate status of the document before it (None = no such document)
    predecessor_duplicate: Option<bool>,
}

/// Everything reconciled so far in a run.
#[derive(Debug, Default)]
pub struct RunState {
    documents: Vec<FinishedDocument>,
    failures: Vec<FileFailure>,
    previous: Option<Predecessor>,
}

impl RunState {
    /// Empty state for a new run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished documents in file order.
    pub fn documents(&self) -> &[FinishedDocument] {
        &self.documents
    }

    /// Files skipped so far.
    pub fn failures(&self) -> &[FileFailure] {
        &self.failures
    }

    /// Consume the state.
    pub fn into_parts(self) -> (Vec<FinishedDocument>, Vec<FileFailure>) {
        (self.documents, self.failures)
    }

    /// Record a skipped file; it leaves a gap in the neighbour chain.
    fn skip(&mut self, path: PathBuf, error: Error) {
        log::warn!("Skipping {}: {}", path.display(), error);
        self.failures.push(FileFailure { path, error });
        self.previous = None;
    }
}

/// Runs batches of files through extraction and reconciliation.
pub struct BatchOrchestrator {
    extractor: DocumentExtractor,
    pool: ThreadPool,
    keep_text: bool,
}

impl BatchOrchestrator {
    /// Build an orchestrator with a worker pool sized by the configuration.
    pub fn new(config: &ExtractionConfig, options: ExtractOptions) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers.unwrap_or(0))
            .thread_name(|i| format!("rtf-extract-{}", i))
            .build()?;
        log::debug!("Worker pool ready with {} thread(s)", pool.current_num_threads());

        Ok(Self {
            extractor: DocumentExtractor::new(options),
            pool,
            keep_text: config.include_stitched_text,
        })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Extract one batch and reconcile it into `state`.
    pub fn run_batch(&self, files: &[PathBuf], state: &mut RunState) {
        let results: Vec<Result<Extraction>> = self.pool.install(|| {
            files
                .par_iter()
                .map(|path| self.extractor.extract_file(path))
                .collect()
        });

        let mut slots: Vec<Option<Extraction>> = Vec::with_capacity(results.len());
        let mut errors: Vec<Option<Error>> = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(extraction) => {
                    slots.push(Some(extraction));
                    errors.push(None);
                },
                Err(error) => {
                    slots.push(None);
                    errors.push(Some(error));
                },
            }
        }

        self.reconcile(files, slots, errors, state);
    }

    fn reconcile(
        &self,
        files: &[PathBuf],
        mut slots: Vec<Option<Extraction>>,
        mut errors: Vec<Option<Error>>,
        state: &mut RunState,
    ) {
        // Unstitched tail of the previous position in this batch
        let mut sibling_tail: Option<OverlapWindow> = None;

        for i in 0..slots.len() {
            let Some(extraction) = slots[i].take() else {
                if let Some(error) = errors[i].take() {
                    state.skip(files[i].clone(), error);
                }
                sibling_tail = None;
                continue;
            };
            let next = slots.get(i + 1).and_then(Option::as_ref);

            let duplicate_with_previous = state
                .previous
                .as_ref()
                .is_some_and(|p| is_duplicate(&p.key, &extraction.comparison_key));
            let duplicate_with_next =
                next.is_some_and(|n| is_duplicate(&extraction.comparison_key, &n.comparison_key));

            if duplicate_with_previous {
                if let Some(p) = &state.previous {
                    let entry = &mut state.documents[p.index].entry;
                    if !entry.is_duplicate {
                        log::debug!("{} flagged duplicate by its successor", entry.source_file);
                        entry.is_duplicate = true;
                        entry.first_in_book = first_in_book(true, p.predecessor_duplicate);
                    }
                }
            }

            let predecessor_duplicate = state
                .previous
                .as_ref()
                .map(|p| state.documents[p.index].entry.is_duplicate);
            let flags = DuplicateFlags::new(
                duplicate_with_previous || duplicate_with_next,
                predecessor_duplicate,
            );

            let previous_tail = if i == 0 {
                state.previous.as_ref().map(|p| p.tail.clone())
            } else {
                sibling_tail.take()
            }
            .unwrap_or_default();
            let next_head = next.map(|n| n.head.clone()).unwrap_or_default();

            let ctx = StitchContext {
                previous_tail: previous_tail.as_str(),
                next_head: next_head.as_str(),
                first_in_book: flags.first_in_book,
                is_duplicate: flags.is_duplicate,
            };

            let key = extraction.comparison_key.clone();
            sibling_tail = Some(extraction.tail.clone());
            let finished = extraction.finish(&ctx, flags, self.keep_text);

            state.previous = Some(Predecessor {
                index: state.documents.len(),
                key,
                tail: finished.tail.clone(),
                predecessor_duplicate,
            });
            state.documents.push(finished);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::overlap::StitchDecision;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, format!("{{\\rtf1\\ansi {}}}", body)).unwrap();
        path
    }

    fn orchestrator(dir: &TempDir) -> BatchOrchestrator {
        let config = ExtractionConfig::new(dir.path())
            .with_workers(2)
            .with_stitched_text(true);
        let options = ExtractOptions {
            source_label: None,
            uploaded_date: "2024-01-01".to_string(),
        };
        BatchOrchestrator::new(&config, options).unwrap()
    }

    #[test]
    fn test_pool_uses_configured_workers() {
        let dir = TempDir::new().unwrap();
        assert_eq!(orchestrator(&dir).workers(), 2);
    }

    #[test]
    fn test_neighbours_stitch_from_unstitched_windows() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            write(&dir, "a.rtf", r"\fs16 alpha\par"),
            write(&dir, "b.rtf", r"\fs16 beta\par"),
            write(&dir, "c.rtf", r"\fs16 gamma\par"),
        ];
        let mut state = RunState::new();
        orchestrator(&dir).run_batch(&files, &mut state);

        let texts: Vec<&str> = state
            .documents()
            .iter()
            .map(|d| d.entry.stitched_text.as_deref().unwrap())
            .collect();
        assert_eq!(texts, vec!["alpha\nbeta", "alpha\nbeta\ngamma", "beta\ngamma"]);
        assert!(state.documents().iter().all(|d| d.decision == StitchDecision::Both));
    }

    #[test]
    fn test_previous_batch_tail_is_carried() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.rtf", r"\fs16 alpha\par");
        let b = write(&dir, "b.rtf", r"\fs16 beta\par");
        let orchestrator = orchestrator(&dir);
        let mut state = RunState::new();
        orchestrator.run_batch(&[a], &mut state);
        orchestrator.run_batch(&[b], &mut state);

        let docs = state.documents();
        assert_eq!(docs[0].entry.stitched_text.as_deref(), Some("alpha"));
        assert_eq!(docs[1].entry.stitched_text.as_deref(), Some("alpha\nbeta"));
    }

    #[test]
    fn test_failed_file_leaves_gap() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.rtf", r"\fs16 alpha\par");
        let missing = dir.path().join("b.rtf");
        let c = write(&dir, "c.rtf", r"\fs16 gamma\par");
        let mut state = RunState::new();
        orchestrator(&dir).run_batch(&[a, missing, c], &mut state);

        assert_eq!(state.documents().len(), 2);
        assert_eq!(state.failures().len(), 1);
        assert!(matches!(state.failures()[0].error, Error::SourceRead { .. }));
        assert_eq!(state.documents()[0].entry.stitched_text.as_deref(), Some("alpha"));
        assert_eq!(state.documents()[1].entry.stitched_text.as_deref(), Some("gamma"));
    }

    #[test]
    fn test_duplicate_across_batches_is_retro_flagged() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.rtf", r"\fs16 same\par");
        let b = write(&dir, "b.rtf", r"\fs16 same\par");
        let orchestrator = orchestrator(&dir);
        let mut state = RunState::new();
        orchestrator.run_batch(&[a], &mut state);
        assert!(!state.documents()[0].entry.is_duplicate);
        orchestrator.run_batch(&[b], &mut state);

        let docs = state.documents();
        assert!(docs[0].entry.is_duplicate);
        assert!(docs[0].entry.first_in_book);
        assert!(docs[1].entry.is_duplicate);
        assert!(!docs[1].entry.first_in_book);
    }
}
