//! Layout analysis of decoded markup lines.
//!
//! This module assigns structure to a document's line stream:
//! - Line classification by font-size and colour cues
//! - Heading / body segmentation

pub mod body_segmenter;
pub mod line_classifier;

// Re-export main types
pub use body_segmenter::{segment_body, BodySegmenter, BodyText, SegmentState};
pub use line_classifier::{category_for_size, classify_line, ClassifiedLine, LineCategory};
