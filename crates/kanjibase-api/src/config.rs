use serde::{Deserialize, Serialize};

/// How a sense list is joined into a single string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenseFormat {
    /// Senses separated by `<br>`, optionally prefixed with their index.
    #[default]
    LineBreak,
    /// Senses as items of an `<ol>` list.
    OrderedList,
}

/// Criterion used to pick which example sentences are shown first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceOrder {
    /// Earliest added first.
    #[default]
    Oldest,
    /// Most recently added first.
    Newest,
    /// Highest positive rating percentage first, then earliest added.
    BestRated,
}

/// Parameters controlling how a lookup's results are shaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Maximum number of senses to include.
    #[serde(alias = "number_of_defs")]
    pub max_senses: usize,
    /// Maximum number of example sentences to include.
    #[serde(alias = "number_of_sentences")]
    pub max_sentences: usize,
    /// How senses are joined.
    pub sense_format: SenseFormat,
    /// Whether senses are prefixed with their index in
    /// [`SenseFormat::LineBreak`] mode.
    pub number_senses: bool,
    /// Which example sentences come first.
    pub sentence_order: SentenceOrder,
    /// Whether to derive furigana from the dictionary reading when the
    /// furigana table has no record for the text.
    pub derive_furigana: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            max_senses: 5,
            max_sentences: 10,
            sense_format: SenseFormat::default(),
            number_senses: true,
            sentence_order: SentenceOrder::default(),
            derive_furigana: false,
        }
    }
}
