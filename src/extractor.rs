/*!
 * Dialogue extraction from script lines.
 *
 * Each line is tested against a fixed, ordered list of structural patterns
 * (character speech, narration, menu choice). The first pattern that matches
 * decides the dialogue kind and the byte span of the quoted payload. The same
 * matchers are reused by the reinsertion engine to locate the span to rewrite.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use crate::app_config::Config;
use crate::document::{DialogueKind, DialogueRecord, Document};

/// `name "text"` at the start of a line
static CHARACTER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*[a-zA-Z_][a-zA-Z0-9_]*\s+"(.+?)""#).expect("Invalid character dialogue regex")
});

/// `"text"` at the start of a line
static NARRATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*"(.+?)""#).expect("Invalid narrator dialogue regex")
});

/// `"text":` anywhere on a line
static MENU_CHOICE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(.+?)":"#).expect("Invalid menu choice regex")
});

/// Rules that tune line classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRules {
    /// Lines whose trimmed form starts with this marker are comments
    pub comment_marker: String,

    /// Minimum leading whitespace for an unquoted-start line to count as a menu choice
    pub menu_indent_threshold: usize,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            comment_marker: "#".to_string(),
            menu_indent_threshold: 4,
        }
    }
}

impl From<&Config> for MatchRules {
    fn from(config: &Config) -> Self {
        Self {
            comment_marker: config.comment_marker.clone(),
            menu_indent_threshold: config.menu_indent_threshold,
        }
    }
}

/// Location of a quoted payload on a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadMatch {
    pub kind: DialogueKind,
    /// Byte range of the text between the quotes
    pub span: Range<usize>,
}

impl PayloadMatch {
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.span.clone()]
    }

    /// Rebuild the line with the payload replaced, leaving everything else verbatim
    pub fn splice(&self, line: &str, replacement: &str) -> String {
        let mut output = String::with_capacity(line.len() + replacement.len());
        output.push_str(&line[..self.span.start]);
        output.push_str(replacement);
        output.push_str(&line[self.span.end..]);
        output
    }
}

/// Count leading whitespace characters
fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn capture_span(regex: &Regex, line: &str) -> Option<Range<usize>> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.range())
}

impl DialogueKind {
    /// Try this kind's pattern on a single line
    pub fn match_line(self, line: &str, rules: &MatchRules) -> Option<Range<usize>> {
        match self {
            Self::Character => capture_span(&CHARACTER_REGEX, line),
            Self::Narrator => capture_span(&NARRATOR_REGEX, line),
            Self::MenuChoice => {
                if !line.contains('"') || !line.contains(':') {
                    return None;
                }
                let span = capture_span(&MENU_CHOICE_REGEX, line)?;
                let quote_led = line.trim().starts_with('"');
                if quote_led || indentation(line) >= rules.menu_indent_threshold {
                    Some(span)
                } else {
                    None
                }
            }
        }
    }
}

/// Find the dialogue payload on a line, trying each kind in priority order
pub fn match_dialogue(line: &str, rules: &MatchRules) -> Option<PayloadMatch> {
    DialogueKind::PRIORITY.iter().find_map(|&kind| {
        kind.match_line(line, rules)
            .map(|span| PayloadMatch { kind, span })
    })
}

/// Extracts dialogue records from a script document
#[derive(Debug, Clone, Default)]
pub struct DialogueExtractor {
    rules: MatchRules,
}

impl DialogueExtractor {
    pub fn new(rules: MatchRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// Whether a line is blank or a comment and must never yield a record
    fn is_skipped(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with(self.rules.comment_marker.as_str())
    }

    /// Extract all dialogue records in document order
    pub fn extract(&self, document: &Document) -> Vec<DialogueRecord> {
        let mut records = Vec::new();

        for (line_number, line) in document.numbered_lines() {
            if self.is_skipped(line) {
                continue;
            }

            if let Some(found) = match_dialogue(line, &self.rules) {
                debug!("Line {}: {} dialogue", line_number, found.kind);
                records.push(DialogueRecord::new(
                    line_number,
                    found.text(line).to_string(),
                    line.to_string(),
                    found.kind,
                ));
            }
        }

        records
    }
}
