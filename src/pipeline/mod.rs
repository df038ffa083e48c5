//! Batched extraction pipeline with cross-document reconciliation.
//!
//! ```text
//! input directory
//!     ↓
//! [DirectoryDriver] (list, sort, split into batches)
//!     ↓
//! [BatchOrchestrator] phase 1, parallel: decode → classify → segment
//!     ↓
//! [BatchOrchestrator] phase 2, in file order: duplicates → overlap stitching
//!     ↓
//! documents_output.json + footnotes_output.json
//! ```
//!
//! # Key Design Principles
//!
//! 1. **Workers own nothing shared**: a worker returns one immutable
//!    extraction per file; the sequential reconciler owns all run state.
//!
//! 2. **Position-dependent decisions are sequential**: duplicate flags,
//!    first-in-book flags and overlap windows are computed in file order
//!    whatever order the workers finish in.
//!
//! 3. **Per-file failures are gaps**: a skipped file contributes no record
//!    and empty windows to its neighbours.

pub mod batch;
pub mod driver;
pub mod duplicates;
pub mod overlap;

pub use batch::{BatchOrchestrator, FileFailure, RunState};
pub use driver::{discover_files, write_json, DirectoryDriver, RunReport};
pub use duplicates::{is_duplicate, DuplicateFlags};
pub use overlap::{
    join_text, stitch, OverlapSignals, OverlapWindow, StitchContext, StitchDecision,
    OVERLAP_WINDOW_CHARS,
};
