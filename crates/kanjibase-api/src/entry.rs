use {
    crate::IndexSet,
    serde::{Deserialize, Serialize},
    std::collections::BTreeMap,
};

/// Dictionary data for one lexical entry.
///
/// A source entry may be written in several ways (e.g. `下手` and `下`),
/// and every one of those [written forms][LexiconEntry::written_forms] maps
/// to the same entry data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    /// Surface strings that this entry is indexed under.
    ///
    /// For entries with kanji forms, these are the kanji forms. Entries which
    /// are only ever written in kana use their readings instead.
    pub written_forms: IndexSet<String>,
    /// Canonical kana reading, trimmed of whitespace.
    ///
    /// Empty if the source entry had no reading.
    pub reading: String,
    /// Part-of-speech tags across all senses, with entity references
    /// expanded where possible.
    ///
    /// Order is not meaningful, but is kept stable in insertion order so that
    /// formatted output is deterministic.
    pub parts_of_speech: IndexSet<String>,
    /// Sense index (1-based, in source order) to the sense's gloss text.
    ///
    /// Gloss text is every translation of that sense joined with `"; "`.
    /// Indices may have gaps if a source sense had no usable glosses.
    pub senses: BTreeMap<u32, String>,
}

impl LexiconEntry {
    /// Iterates over senses with an index of at most `limit`, in ascending
    /// index order.
    ///
    /// Indices which have no sense are skipped, not padded.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kanjibase_api::LexiconEntry;
    /// let mut entry = LexiconEntry::default();
    /// entry.senses.insert(1, "to eat".into());
    /// entry.senses.insert(3, "to live on".into());
    ///
    /// let senses = entry.senses_up_to(2).collect::<Vec<_>>();
    /// assert_eq!(senses, [(1, "to eat")]);
    /// assert_eq!(entry.senses_up_to(0).count(), 0);
    /// ```
    pub fn senses_up_to(&self, limit: usize) -> impl Iterator<Item = (u32, &str)> {
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);
        // indices start at 1, so this never yields an index 0
        self.senses
            .range(..=limit)
            .map(|(index, gloss)| (*index, gloss.as_str()))
    }
}
