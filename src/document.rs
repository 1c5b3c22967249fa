/*!
 * Script documents and line-addressed text records.
 *
 * A script is handled as an ordered list of lines addressed by their 1-based
 * position. Every stage of the pipeline refers to dialogue by that number,
 * and the addressed text format (`<line>|||<text>`) carries it between runs.
 */

use std::fmt;

/// Delimiter between the line number and the text in addressed files
pub const ADDRESS_DELIMITER: &str = "|||";

/// Byte-order mark character as it appears after UTF-8 decoding
const BOM: char = '\u{feff}';

// @struct: Script document split into lines
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    // @field: Lines without their '\n' terminator ('\r' is kept)
    lines: Vec<String>,

    // @field: Whether the source started with a byte-order mark
    has_bom: bool,
}

impl Document {
    /// Parse decoded text, stripping and remembering a leading byte-order mark
    pub fn parse(content: &str) -> Self {
        match content.strip_prefix(BOM) {
            Some(rest) => Self::from_text(rest, true),
            None => Self::from_text(content, false),
        }
    }

    /// Build a document from text whose BOM (if any) was already removed
    pub fn from_text(content: &str, has_bom: bool) -> Self {
        Self {
            lines: content.split('\n').map(str::to_string).collect(),
            has_bom,
        }
    }

    /// Build a document from already split lines
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            has_bom: false,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Get a line by its 1-based number
    pub fn line(&self, line_number: usize) -> Option<&str> {
        line_number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    /// Iterate over `(line_number, line)` pairs
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index + 1, line.as_str()))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_bom(&self) -> bool {
        self.has_bom
    }

    /// Replace the content of a 1-based line, returning false when out of range
    pub(crate) fn replace_line(&mut self, line_number: usize, content: String) -> bool {
        match line_number
            .checked_sub(1)
            .and_then(|index| self.lines.get_mut(index))
        {
            Some(line) => {
                *line = content;
                true
            }
            None => false,
        }
    }

    /// Render the document back to text, re-emitting the byte-order mark if present
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        if self.has_bom {
            output.push(BOM);
        }
        output.push_str(&self.lines.join("\n"));
        output
    }
}

/// Structural form of a dialogue line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueKind {
    /// `name "text"`
    Character,
    /// `"text"`
    Narrator,
    /// `"text":` inside a menu block
    MenuChoice,
}

impl DialogueKind {
    /// Matching order; the first kind that matches a line wins
    pub const PRIORITY: [DialogueKind; 3] = [
        DialogueKind::Character,
        DialogueKind::Narrator,
        DialogueKind::MenuChoice,
    ];

    pub fn display_name(&self) -> &str {
        match self {
            Self::Character => "character",
            Self::Narrator => "narrator",
            Self::MenuChoice => "menu choice",
        }
    }
}

impl fmt::Display for DialogueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// @struct: Dialogue found on a script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueRecord {
    // @field: 1-based line number in the source document
    pub line_number: usize,

    // @field: Quoted payload
    pub text: String,

    // @field: Untouched source line
    pub raw_line: String,

    // @field: Which structural form matched
    pub kind: DialogueKind,
}

impl DialogueRecord {
    pub fn new(line_number: usize, text: String, raw_line: String, kind: DialogueKind) -> Self {
        Self {
            line_number,
            text,
            raw_line,
            kind,
        }
    }

    /// Format as an addressed line with the record's own text
    pub fn to_addressed(&self) -> String {
        format_addressed(self.line_number, &self.text)
    }
}

// @struct: Translated text for one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedRecord {
    pub line_number: usize,
    pub translated_text: String,
}

impl TranslatedRecord {
    pub fn new(line_number: usize, translated_text: String) -> Self {
        Self {
            line_number,
            translated_text,
        }
    }

    /// Parse one physical line of an addressed file.
    ///
    /// The line is trimmed before splitting on the first delimiter. Lines without
    /// a delimiter or with a non-numeric line number yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let (number, text) = line.trim().split_once(ADDRESS_DELIMITER)?;
        let line_number = number.trim().parse::<usize>().ok()?;
        Some(Self::new(line_number, text.to_string()))
    }
}

/// Format a single addressed line (without terminator)
pub fn format_addressed(line_number: usize, text: &str) -> String {
    format!("{}{}{}", line_number, ADDRESS_DELIMITER, text)
}

/// Parse a whole addressed file, skipping malformed lines
pub fn parse_translated(content: &str) -> Vec<TranslatedRecord> {
    content
        .strip_prefix(BOM)
        .unwrap_or(content)
        .lines()
        .filter_map(TranslatedRecord::parse)
        .collect()
}
