//! Rendering of dictionary and corpus data into note field text.

use {
    html_escape::encode_text,
    itertools::Itertools,
    kanjibase_api::{LexiconEntry, SenseFormat, SentenceRecord},
    maud::html,
};

/// Separator between items of a line-broken list.
pub const LINE_BREAK: &str = "<br>";

/// Formats the senses of `entry` with an index of at most `limit`.
///
/// Returns an empty string if no sense falls within `limit`, including when
/// `limit` is 0.
///
/// In [`SenseFormat::LineBreak`] mode, senses are joined with `<br>` and each
/// is prefixed with `{index}: ` if `numbered` is set. In
/// [`SenseFormat::OrderedList`] mode, senses become the items of an `<ol>`.
#[must_use]
pub fn format_senses(
    entry: &LexiconEntry,
    limit: usize,
    format: SenseFormat,
    numbered: bool,
) -> String {
    let mut senses = entry.senses_up_to(limit).peekable();
    if senses.peek().is_none() {
        return String::new();
    }

    match format {
        SenseFormat::LineBreak => senses
            .map(|(index, gloss)| {
                let gloss = encode_text(gloss);
                if numbered {
                    format!("{index}: {gloss}")
                } else {
                    gloss.into_owned()
                }
            })
            .join(LINE_BREAK),
        SenseFormat::OrderedList => html! {
            ol {
                @for (_, gloss) in senses {
                    li { (gloss) }
                }
            }
        }
        .into_string(),
    }
}

/// Short category label for a family of part-of-speech tags.
///
/// Variants are declared in probe order, which is also the order that labels
/// appear in [`format_parts_of_speech`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosCategory {
    Noun,
    Godan,
    Ichidan,
    Suru,
    Transitive,
    Intransitive,
    IAdjective,
    NaAdjective,
}

impl PosCategory {
    pub const ALL: &[Self] = &[
        Self::Noun,
        Self::Godan,
        Self::Ichidan,
        Self::Suru,
        Self::Transitive,
        Self::Intransitive,
        Self::IAdjective,
        Self::NaAdjective,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Noun => "名詞",
            Self::Godan => "五段",
            Self::Ichidan => "一段",
            Self::Suru => "する",
            Self::Transitive => "他動詞",
            Self::Intransitive => "自動詞",
            Self::IAdjective => "いー形容詞",
            Self::NaAdjective => "なー形容詞",
        }
    }

    /// Checks if this category matches some already lowercased tag text.
    #[must_use]
    pub fn matches(self, tags: &str) -> bool {
        match self {
            Self::Noun => tags.contains("noun"),
            Self::Godan => tags.contains("godan"),
            Self::Ichidan => tags.contains("ichidan"),
            Self::Suru => tags.contains("suru"),
            // "intransitive verb" also contains "transitive verb"
            Self::Transitive => {
                tags.starts_with("transitive verb") || tags.contains(" transitive verb")
            }
            Self::Intransitive => tags.contains("intransitive verb"),
            Self::IAdjective => tags.contains("adjective (keiyoushi)"),
            Self::NaAdjective => tags.contains("adjectival nouns"),
        }
    }
}

/// Maps free-text part-of-speech tags to short category labels joined with
/// `、`, in [`PosCategory::ALL`] order.
///
/// Matching is case-insensitive and each category is probed independently
/// against all tags, so one tag may yield several labels.
///
/// # Examples
///
/// ```
/// # use kanjibase_engine::format::format_parts_of_speech;
/// assert_eq!(
///     format_parts_of_speech(["transitive verb, suru verb - special class"]),
///     "する、他動詞"
/// );
/// ```
#[must_use]
pub fn format_parts_of_speech<'a>(tags: impl IntoIterator<Item = &'a str>) -> String {
    let tags = tags.into_iter().map(str::to_lowercase).collect::<Vec<_>>();
    PosCategory::ALL
        .iter()
        .filter(|category| tags.iter().any(|tag| category.matches(tag)))
        .map(|category| category.label())
        .join("、")
}

/// Joins the text of each sentence with `<br>`.
#[must_use]
pub fn format_sentences<'a>(sentences: impl IntoIterator<Item = &'a SentenceRecord>) -> String {
    sentences
        .into_iter()
        .map(|sentence| encode_text(&sentence.text))
        .join(LINE_BREAK)
}
