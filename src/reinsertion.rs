/*!
 * Reinsertion of translated text into the original script.
 *
 * Translations are addressed by line number. For each addressed line the
 * dialogue matchers locate the quoted payload, which is swapped for the
 * translation. Everything else on the line, and every unaddressed line,
 * is copied through unchanged.
 */

use log::debug;
use std::collections::BTreeMap;

use crate::document::{Document, TranslatedRecord};
use crate::extractor::{MatchRules, match_dialogue};

/// Outcome of applying translations to a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReinsertionReport {
    /// Distinct line numbers that had a translation entry
    pub requested: usize,
    /// Lines whose payload was replaced
    pub applied: usize,
    /// Line numbers outside the document
    pub out_of_range: Vec<usize>,
    /// Line numbers whose content matched no dialogue form
    pub unmatched: Vec<usize>,
}

/// Collapse records into a line -> text map; a later duplicate overwrites an earlier one
pub fn collect_translations(records: &[TranslatedRecord]) -> BTreeMap<usize, &str> {
    records
        .iter()
        .map(|record| (record.line_number, record.translated_text.as_str()))
        .collect()
}

/// Writes translated payloads back into a script document
#[derive(Debug, Clone, Default)]
pub struct ReinsertionEngine {
    rules: MatchRules,
}

impl ReinsertionEngine {
    pub fn new(rules: MatchRules) -> Self {
        Self { rules }
    }

    /// Produce a new document with translations applied.
    ///
    /// The result always has the same number of lines as `original`.
    pub fn apply(
        &self,
        records: &[TranslatedRecord],
        original: &Document,
    ) -> (Document, ReinsertionReport) {
        let translations = collect_translations(records);
        let mut document = original.clone();
        let mut report = ReinsertionReport {
            requested: translations.len(),
            ..ReinsertionReport::default()
        };

        for (line_number, translation) in translations {
            let Some(line) = original.line(line_number) else {
                debug!("Skipping line {}: outside document ({} lines)", line_number, original.len());
                report.out_of_range.push(line_number);
                continue;
            };

            match match_dialogue(line, &self.rules) {
                Some(found) => {
                    document.replace_line(line_number, found.splice(line, translation));
                    report.applied += 1;
                }
                None => {
                    debug!("Skipping line {}: no dialogue found", line_number);
                    report.unmatched.push(line_number);
                }
            }
        }

        (document, report)
    }
}
