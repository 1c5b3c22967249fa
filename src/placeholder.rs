/*!
 * Placeholder protection for dialogue text.
 *
 * Formatting tags, escape sequences and interpolation markers must reach the
 * translated script unchanged. Before translation each one is swapped for an
 * opaque `@@N@@` key; after translation the keys are swapped back using the
 * mapping recorded during protection.
 *
 * Keys are numbered from 1 in order of first appearance. A token that occurs
 * again anywhere in the same run reuses its key, so the mapping holds every
 * distinct token exactly once.
 */

use indexmap::IndexMap;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::MappingError;

/// Recognised placeholder grammar, tried in alternation order at each position
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"\[.*?\]|\{.*?\}|\\[nt"\\%']|%\([^)]+\)|%[sdif]|\\u[0-9a-fA-F]{4}|"#,
        r"\{color[^}]*\}|\{/color\}|\{size[^}]*\}|\{/size\}|\{b\}|\{/b\}|\{i\}|\{/i\}|",
        r"\{font[^}]*\}|\{/font\}|\{a[^}]*\}|\{/a\}|\{img[^}]*\}|\{space[^}]*\}|",
        r"\{w[^}]*\}|\{p[^}]*\}|\{nw\}|\{fast\}|\{slow\}|\{done\}|\{clear\}|",
        r"\{\{|\}\}|\[lb\]|\[rb\]",
    ))
    .expect("Invalid placeholder regex")
});

/// Synthetic key grammar, anchored at the scan position
static KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^@@(\d+)@@").expect("Invalid placeholder key regex")
});

/// Build the key for a given index
pub fn make_key(index: usize) -> String {
    format!("@@{}@@", index)
}

/// Parse the index out of a complete key, e.g. `@@12@@` -> 12
pub fn parse_key(key: &str) -> Option<usize> {
    key.strip_prefix("@@")?
        .strip_suffix("@@")?
        .parse()
        .ok()
}

// @struct: Ordered key -> token mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, String>",
    into = "IndexMap<String, String>"
)]
pub struct TokenMapping {
    entries: IndexMap<String, String>,
}

impl TokenMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the token behind a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate `(key, token)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn insert(&mut self, key: String, token: String) {
        self.entries.insert(key, token);
    }

    /// Highest key index present, or 0 for an empty mapping
    pub fn highest_index(&self) -> usize {
        self.entries
            .keys()
            .filter_map(|key| parse_key(key))
            .max()
            .unwrap_or(0)
    }

    /// Replace every known key in `text` with its token.
    ///
    /// Keys are recognised structurally in a single pass, so a restored token is
    /// never rescanned. Keys missing from the mapping are left as they are.
    pub fn restore_all(&self, text: &str) -> String {
        let mut restored = String::with_capacity(text.len());
        let mut last = 0;

        for hit in scan_keys(text, self).iter().filter(|hit| hit.known) {
            restored.push_str(&text[last..hit.start]);
            restored.push_str(self.get(hit.key).unwrap_or(hit.key));
            last = hit.end;
        }
        restored.push_str(&text[last..]);

        restored
    }

    /// Serialize as a pretty-printed JSON object in insertion order
    pub fn to_json_pretty(&self) -> Result<String, MappingError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, MappingError> {
        let entries: IndexMap<String, String> = serde_json::from_str(content)?;
        Self::try_from(entries)
    }
}

impl TryFrom<IndexMap<String, String>> for TokenMapping {
    type Error = MappingError;

    fn try_from(entries: IndexMap<String, String>) -> Result<Self, Self::Error> {
        if let Some(bad) = entries.keys().find(|key| parse_key(key).is_none()) {
            return Err(MappingError::InvalidKey(bad.clone()));
        }
        Ok(Self { entries })
    }
}

impl From<TokenMapping> for IndexMap<String, String> {
    fn from(mapping: TokenMapping) -> Self {
        mapping.entries
    }
}

/// A key candidate found while scanning text
#[derive(Debug, Clone, Copy)]
struct KeyHit<'t> {
    start: usize,
    end: usize,
    key: &'t str,
    known: bool,
}

/// Find the key candidates in `text`.
///
/// A known key is consumed whole. An unknown candidate only advances the scan
/// by one character, so a known key overlapping its tail is still found; such
/// an unknown candidate does not survive restoration and is dropped.
fn scan_keys<'t>(text: &'t str, mapping: &TokenMapping) -> Vec<KeyHit<'t>> {
    let mut hits = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find("@@") {
        let start = pos + offset;
        pos = start + 1;

        if let Some(found) = KEY_REGEX.find(&text[start..]) {
            let key = found.as_str();
            let known = mapping.contains_key(key);
            let end = start + found.end();
            hits.push(KeyHit { start, end, key, known });
            if known {
                pos = end;
            }
        }
    }

    let known_starts: Vec<usize> = hits.iter().filter(|hit| hit.known).map(|hit| hit.start).collect();
    hits.retain(|hit| {
        hit.known || !known_starts.iter().any(|&start| start > hit.start && start < hit.end)
    });
    hits
}

/// Result of checking a text's keys against a mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyAudit {
    /// Total key occurrences found in the text
    pub occurrences: usize,
    /// Keys in the text that the mapping does not know, in order of first appearance
    pub unknown_keys: Vec<String>,
    /// Mapping keys that never occur in the text
    pub unused_keys: Vec<String>,
}

impl KeyAudit {
    /// True when every key in the text can be restored
    pub fn is_clean(&self) -> bool {
        self.unknown_keys.is_empty()
    }
}

/// Check which keys in `text` can be restored with `mapping`
pub fn audit(text: &str, mapping: &TokenMapping) -> KeyAudit {
    let mut result = KeyAudit::default();
    let mut seen = std::collections::HashSet::new();

    for hit in scan_keys(text, mapping) {
        result.occurrences += 1;
        if seen.insert(hit.key) && !hit.known {
            result.unknown_keys.push(hit.key.to_string());
        }
    }

    result.unused_keys = mapping
        .iter()
        .map(|(key, _)| key)
        .filter(|key| !seen.contains(key))
        .map(str::to_string)
        .collect();

    result
}

/// Restore `text` with `mapping`, warning about keys that cannot be restored
pub fn restore_all(text: &str, mapping: &TokenMapping) -> String {
    let report = audit(text, mapping);
    if !report.is_clean() {
        warn!(
            "{} placeholder key(s) have no mapping entry and were left as-is: {}",
            report.unknown_keys.len(),
            report.unknown_keys.join(", ")
        );
    }
    mapping.restore_all(text)
}

/// Run-scoped placeholder protector.
///
/// One codec covers one document: create a fresh codec (or call [`reset`])
/// before protecting an unrelated document, otherwise keys continue from the
/// previous run.
///
/// [`reset`]: PlaceholderCodec::reset
#[derive(Debug, Clone, Default)]
pub struct PlaceholderCodec {
    mapping: TokenMapping,
    keys_by_token: HashMap<String, String>,
    counter: usize,
}

impl PlaceholderCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a run from a previously saved mapping.
    /// Known tokens keep their keys; new keys start after the highest existing one.
    pub fn with_mapping(mapping: TokenMapping) -> Self {
        let keys_by_token = mapping
            .iter()
            .map(|(key, token)| (token.to_string(), key.to_string()))
            .collect();
        let counter = mapping.highest_index();

        Self {
            mapping,
            keys_by_token,
            counter,
        }
    }

    /// Clear the mapping and restart numbering at 1
    pub fn reset(&mut self) {
        self.mapping = TokenMapping::new();
        self.keys_by_token.clear();
        self.counter = 0;
    }

    /// Number of keys minted so far in this run
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Run-wide mapping accumulated so far
    pub fn mapping(&self) -> &TokenMapping {
        &self.mapping
    }

    pub fn into_mapping(self) -> TokenMapping {
        self.mapping
    }

    /// Key for a token, minting a new one if the token has not been seen in this run.
    /// Returns the key and whether it was newly minted.
    fn key_for(&mut self, token: &str) -> (String, bool) {
        if let Some(key) = self.keys_by_token.get(token) {
            return (key.clone(), false);
        }

        self.counter += 1;
        let key = make_key(self.counter);
        self.keys_by_token.insert(token.to_string(), key.clone());
        self.mapping.insert(key.clone(), token.to_string());
        (key, true)
    }

    /// Replace every placeholder in `text` with its key.
    ///
    /// Returns the protected text and the entries minted by this call only.
    pub fn protect(&mut self, text: &str) -> (String, TokenMapping) {
        let mut protected = String::with_capacity(text.len());
        let mut local = TokenMapping::new();
        let mut last = 0;

        for found in PLACEHOLDER_REGEX.find_iter(text) {
            protected.push_str(&text[last..found.start()]);
            let (key, minted) = self.key_for(found.as_str());
            if minted {
                local.insert(key.clone(), found.as_str().to_string());
            }
            protected.push_str(&key);
            last = found.end();
        }
        protected.push_str(&text[last..]);

        (protected, local)
    }
}
