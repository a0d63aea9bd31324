#![doc = include_str!("../README.md")]

use std::{fmt::Write as _, fs, path::Path};

use anyhow::{Context, Result};
use foldhash::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Single run of text in a headword, with its reading if the run needs one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Text of this run, e.g. `食` or `べる`.
    pub ruby: String,
    /// Reading of [`Segment::ruby`], or [`None`] for a kana run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rt: Option<String>,
}

impl Segment {
    /// Creates a kanji run with a reading.
    #[must_use]
    pub fn ruby(ruby: impl Into<String>, rt: impl Into<String>) -> Self {
        Self {
            ruby: ruby.into(),
            rt: Some(rt.into()),
        }
    }

    /// Creates a run which has no reading.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            ruby: text.into(),
            rt: None,
        }
    }

    /// Gets the reading of this run, treating an empty reading as none.
    #[must_use]
    pub fn reading(&self) -> Option<&str> {
        self.rt.as_deref().filter(|rt| !rt.is_empty())
    }
}

/// Map of exact headword text to its furigana segments.
#[derive(Debug, Clone, Default)]
pub struct FuriganaTable {
    entries: HashMap<String, Box<[Segment]>>,
}

impl FuriganaTable {
    /// Builds a table from `(text, segments)` pairs.
    ///
    /// If a text appears more than once, the first pair wins.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<Segment>)>) -> Self {
        let mut table = HashMap::<String, Box<[Segment]>>::default();
        let mut duplicates = 0usize;
        for (text, segments) in entries {
            if table.contains_key(&text) {
                duplicates += 1;
                continue;
            }
            table.insert(text, segments.into_boxed_slice());
        }
        if duplicates > 0 {
            debug!("Skipped {duplicates} furigana records for texts already in the table");
        }
        Self { entries: table }
    }

    /// Parses a table from the JSON array form of the JmdictFurigana file.
    ///
    /// A leading byte order mark is ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let json = json.strip_prefix('\u{feff}').unwrap_or(json);
        let entries = serde_json::from_str::<Vec<schema::Entry>>(json)
            .context("failed to parse furigana table as JSON")?;
        Ok(Self::from_entries(
            entries
                .into_iter()
                .map(|entry| (entry.text, entry.furigana)),
        ))
    }

    /// Reads and parses a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {path:?}"))?;
        Self::from_json(&json).with_context(|| format!("failed to load {path:?}"))
    }

    /// Gets the segments of an exact headword text.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<&[Segment]> {
        self.entries.get(text).map(|segments| &**segments)
    }

    /// Gets the ruby markup of an exact headword text.
    ///
    /// Returns an empty string if the text is not in the table.
    #[must_use]
    pub fn markup(&self, text: &str) -> String {
        self.get(text).map(format).unwrap_or_default()
    }

    /// Number of distinct texts in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serializes segments into inline ruby markup.
///
/// A segment with a reading becomes `text[reading]`, and a segment without
/// one is written as-is. A ruby segment which directly follows a plain
/// segment is preceded by a single space, so that the ruby base does not
/// swallow the plain text before it.
///
/// # Examples
///
/// ```
/// # use jmdict_furigana::{Segment, format};
/// assert_eq!(
///     format(&[Segment::ruby("食", "た"), Segment::plain("べる")]),
///     "食[た]べる"
/// );
/// assert_eq!(
///     format(&[Segment::plain("お"), Segment::ruby("茶", "ちゃ")]),
///     "お 茶[ちゃ]"
/// );
/// ```
#[must_use]
pub fn format(segments: &[Segment]) -> String {
    let mut result = String::new();
    let mut after_plain = false;
    for segment in segments {
        if let Some(reading) = segment.reading() {
            if after_plain {
                result.push(' ');
            }
            _ = write!(&mut result, "{}[{reading}]", segment.ruby);
            after_plain = false;
        } else {
            result.push_str(&segment.ruby);
            after_plain = true;
        }
    }
    result
}

mod schema {
    use serde::Deserialize;

    use super::Segment;

    #[derive(Debug, Deserialize)]
    pub struct Entry {
        pub text: String,
        pub furigana: Vec<Segment>,
    }
}
