//! Structured extraction from decoded markup documents.
//!
//! Provides footnote and breadcrumb extraction and the per-document extractor
//! that composes classification, segmentation and the overlap predicates.

pub mod document;
pub mod footnotes;

pub use document::{
    build_record, document_text, DocumentExtractor, ExtractOptions, Extraction, FinishedDocument,
};
pub use footnotes::{breadcrumbs, FootnoteExtractor};
