//! Structured records produced for each source document.
//!
//! Key names follow the established JSON layout consumed downstream
//! (`"Main titles"`, `"Reference/Remarks"`, ...), so every field carries an
//! explicit rename.

use crate::error::Result;
use crate::layout::LineCategory;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Provenance of a document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Source label (configured label or the file name)
    pub source: String,
    /// Extraction date, `YYYY-MM-DD`
    #[serde(rename = "uploadedDate")]
    pub uploaded_date: String,
}

impl Metadata {
    /// Metadata stamped with today's local date.
    pub fn today(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            uploaded_date: Self::current_date(),
        }
    }

    /// Today's local date as `YYYY-MM-DD`.
    pub fn current_date() -> String {
        chrono::Local::now().format("%Y-%m-%d").to_string()
    }
}

/// Where a footnote anchor sits in its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 1-based page, advanced by hard page breaks
    #[serde(rename = "Page")]
    pub page: usize,
    /// 1-based decoded line number
    #[serde(rename = "Paragraph")]
    pub paragraph: usize,
}

/// One footnote, identified locally within its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteRecord {
    /// `F<n>`, sequential from 1 within the document
    #[serde(rename = "FootnoteID")]
    pub footnote_id: String,
    /// Nesting level
    #[serde(rename = "FootnoteLevel")]
    pub footnote_level: u32,
    /// Footnote kind
    #[serde(rename = "FootnoteType")]
    pub footnote_type: String,
    /// `T<k>`: the text line the footnote follows (`T0` when none)
    #[serde(rename = "ReferencedTextID")]
    pub referenced_text_id: String,
    /// Leading characters of the referenced line
    #[serde(rename = "ReferencedTextSnippet")]
    pub referenced_text_snippet: String,
    /// Footnote text with formatting codes removed
    #[serde(rename = "FootnoteContent")]
    pub footnote_content: String,
    /// Location of the anchor
    #[serde(rename = "PositionInDocument")]
    pub position: Position,
    /// Free-form tags
    #[serde(rename = "ContextualTags")]
    pub contextual_tags: Vec<String>,
}

/// The structured extraction of one source document.
///
/// Category vectors keep source order. Breadcrumbs are stored twice on the
/// wire (as an array and as `"Breadcrumb i"` keys) but only set through
/// [`DocumentRecord::set_breadcrumbs`], which keeps both views in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Provenance
    #[serde(rename = "Metadata")]
    pub metadata: Metadata,

    /// Ordered breadcrumb trail
    #[serde(rename = "Breadcrumbs")]
    breadcrumbs: Vec<String>,

    /// `"Breadcrumb 1"`, `"Breadcrumb 2"`, ... in trail order
    #[serde(flatten)]
    breadcrumb_index: IndexMap<String, String>,

    /// Top-level titles
    #[serde(rename = "Main titles")]
    pub main_titles: Vec<String>,

    /// Second-level titles
    #[serde(rename = "Second titles")]
    pub second_titles: Vec<String>,

    /// Lower-level titles
    #[serde(rename = "More titles")]
    pub more_titles: Vec<String>,

    /// Emphasised passages
    #[serde(rename = "Emphasis")]
    pub emphasis: Vec<String>,

    /// Body text
    #[serde(rename = "Normal Text")]
    pub normal_text: Vec<String>,

    /// Underlined body text (search hits)
    #[serde(rename = "The Searched Words")]
    pub searched_words: Vec<String>,

    /// Reference and remark lines
    #[serde(rename = "Reference/Remarks")]
    pub reference_remarks: Vec<String>,

    /// Extract-window topics
    #[serde(rename = "Topics of Extracts Window")]
    pub topics_of_extracts: Vec<String>,

    /// Extract-window numbers
    #[serde(rename = "Numbers of Extracts Window")]
    pub numbers_of_extracts: Vec<String>,

    /// Footnotes in anchor order
    #[serde(rename = "FootnoteReferences")]
    pub footnotes: Vec<FootnoteRecord>,

    /// Green-background reference runs
    #[serde(rename = "Green Background Text")]
    pub green_background_text: Vec<String>,
}

impl DocumentRecord {
    /// Empty record for a document.
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            breadcrumbs: Vec::new(),
            breadcrumb_index: IndexMap::new(),
            main_titles: Vec::new(),
            second_titles: Vec::new(),
            more_titles: Vec::new(),
            emphasis: Vec::new(),
            normal_text: Vec::new(),
            searched_words: Vec::new(),
            reference_remarks: Vec::new(),
            topics_of_extracts: Vec::new(),
            numbers_of_extracts: Vec::new(),
            footnotes: Vec::new(),
            green_background_text: Vec::new(),
        }
    }

    /// Replace the breadcrumb trail (a later trail line wins over an earlier one).
    pub fn set_breadcrumbs(&mut self, crumbs: Vec<String>) {
        self.breadcrumb_index = crumbs
            .iter()
            .enumerate()
            .map(|(i, crumb)| (format!("Breadcrumb {}", i + 1), crumb.clone()))
            .collect();
        self.breadcrumbs = crumbs;
    }

    /// Ordered breadcrumb trail.
    pub fn breadcrumbs(&self) -> &[String] {
        &self.breadcrumbs
    }

    /// Breadcrumb by its 1-based `"Breadcrumb i"` index.
    pub fn breadcrumb(&self, index: usize) -> Option<&str> {
        self.breadcrumb_index
            .get(&format!("Breadcrumb {}", index))
            .map(String::as_str)
    }

    /// Text bucket that lines of `category` are collected into.
    ///
    /// Breadcrumb, footnote and green-background lines have dedicated
    /// structures; unclassified lines are dropped.
    pub fn bucket_mut(&mut self, category: LineCategory) -> Option<&mut Vec<String>> {
        match category {
            LineCategory::MainTitle => Some(&mut self.main_titles),
            LineCategory::SecondTitle => Some(&mut self.second_titles),
            LineCategory::MoreTitle => Some(&mut self.more_titles),
            LineCategory::Emphasis => Some(&mut self.emphasis),
            LineCategory::NormalText => Some(&mut self.normal_text),
            LineCategory::SearchedWords => Some(&mut self.searched_words),
            LineCategory::Reference => Some(&mut self.reference_remarks),
            LineCategory::TopicOfExtract => Some(&mut self.topics_of_extracts),
            LineCategory::NumberOfExtract => Some(&mut self.numbers_of_extracts),
            LineCategory::Breadcrumb
            | LineCategory::Footnote
            | LineCategory::GreenBackground
            | LineCategory::Unclassified => None,
        }
    }

    /// Total number of text lines across all size-derived categories.
    pub fn text_line_count(&self) -> usize {
        self.main_titles.len()
            + self.second_titles.len()
            + self.more_titles.len()
            + self.emphasis.len()
            + self.normal_text.len()
            + self.searched_words.len()
            + self.reference_remarks.len()
            + self.topics_of_extracts.len()
            + self.numbers_of_extracts.len()
    }

    /// Canonical comparison unit for duplicate detection.
    ///
    /// The serialized content with metadata removed, trimmed.
    pub fn comparison_key(&self) -> Result<String> {
        let mut value = serde_json::to_value(self)?;
        if let Some(object) = value.as_object_mut() {
            object.remove("Metadata");
        }
        Ok(value.to_string().trim().to_string())
    }
}

/// One document in the documents artifact: the record plus run annotations.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    /// Extracted content
    #[serde(flatten)]
    pub record: DocumentRecord,

    /// File name the record came from
    #[serde(rename = "SourceFile")]
    pub source_file: String,

    /// Exact duplicate of an adjacent document
    #[serde(rename = "IsDuplicate")]
    pub is_duplicate: bool,

    /// Starts a run of duplicates
    #[serde(rename = "FirstInBook")]
    pub first_in_book: bool,

    /// Text after neighbour stitching (only when requested)
    #[serde(rename = "StitchedText", skip_serializing_if = "Option::is_none")]
    pub stitched_text: Option<String>,
}

/// Top-level shape of the documents artifact.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentsArtifact<'a> {
    /// Documents in processing order
    #[serde(rename = "Documents")]
    pub documents: &'a [DocumentEntry],
}

/// Top-level shape of the footnotes artifact.
#[derive(Debug, Clone, Serialize)]
pub struct FootnotesArtifact<'a> {
    /// Footnotes of all documents, flattened in document order
    #[serde(rename = "Footnotes")]
    pub footnotes: Vec<&'a FootnoteRecord>,
}
