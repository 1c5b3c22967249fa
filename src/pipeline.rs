/*!
 * Extraction pipeline tying the extractor and the placeholder codec together.
 *
 * A document goes in; two parallel addressed text streams (untouched and
 * protected dialogue) and the token mapping come out.
 */

use std::collections::HashMap;

use crate::document::{DialogueKind, DialogueRecord, Document, format_addressed};
use crate::extractor::{DialogueExtractor, MatchRules};
use crate::placeholder::{PlaceholderCodec, TokenMapping};

/// Everything produced by extracting one document
#[derive(Debug, Clone, Default)]
pub struct ExtractionArtifacts {
    pub records: Vec<DialogueRecord>,
    /// `<line>|||<text>` lines with the original dialogue text
    pub untouched: String,
    /// `<line>|||<text>` lines with placeholders replaced by keys
    pub protected: String,
    /// Run-wide key -> token mapping
    pub mapping: TokenMapping,
}

impl ExtractionArtifacts {
    /// Number of records per dialogue kind
    pub fn kind_counts(&self) -> HashMap<DialogueKind, usize> {
        let mut counts = HashMap::new();
        for record in &self.records {
            *counts.entry(record.kind).or_insert(0) += 1;
        }
        counts
    }
}

/// Extract dialogue from `document` and protect its placeholders.
///
/// A fresh codec is used, so key numbering always starts at `@@1@@`.
pub fn extract_and_protect(document: &Document, rules: &MatchRules) -> ExtractionArtifacts {
    let records = DialogueExtractor::new(rules.clone()).extract(document);
    let mut codec = PlaceholderCodec::new();
    let mut untouched = String::new();
    let mut protected = String::new();

    for record in &records {
        untouched.push_str(&record.to_addressed());
        untouched.push('\n');

        let (protected_text, _) = codec.protect(&record.text);
        protected.push_str(&format_addressed(record.line_number, &protected_text));
        protected.push('\n');
    }

    ExtractionArtifacts {
        records,
        untouched,
        protected,
        mapping: codec.into_mapping(),
    }
}
