use kanjibase_api::SentenceRecord;

/// Caller-owned position within a list of example sentences, for paging
/// through them one at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceCursor {
    sentences: Vec<SentenceRecord>,
    position: usize,
}

impl SentenceCursor {
    #[must_use]
    pub fn new(sentences: Vec<SentenceRecord>) -> Self {
        Self {
            sentences,
            position: 0,
        }
    }

    /// Gets the sentence at the current position, or [`None`] if there are
    /// no sentences.
    #[must_use]
    pub fn current(&self) -> Option<&SentenceRecord> {
        self.sentences.get(self.position)
    }

    /// Moves to the next sentence.
    ///
    /// Returns `false` without moving if already at the last sentence.
    pub fn advance(&mut self) -> bool {
        if self.position + 1 >= self.sentences.len() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Moves to the previous sentence.
    ///
    /// Returns `false` without moving if already at the first sentence.
    pub fn retreat(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    #[must_use]
    pub fn sentences(&self) -> &[SentenceRecord] {
        &self.sentences
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::corpus};

    #[test]
    fn clamps_at_ends() {
        let corpus = corpus::tests::corpus();
        let sentences = corpus
            .find_by_word("食べ", 3)
            .into_iter()
            .cloned()
            .collect();
        let mut cursor = SentenceCursor::new(sentences);
        assert_eq!(cursor.len(), 3);
        assert_eq!(cursor.current().unwrap().id, 4707);

        assert!(!cursor.retreat());
        assert_eq!(cursor.position(), 0);

        assert!(cursor.advance());
        assert_eq!(cursor.current().unwrap().id, 4706);
        assert!(cursor.advance());
        assert_eq!(cursor.current().unwrap().id, 4705);
        assert!(!cursor.advance());
        assert_eq!(cursor.position(), 2);

        assert!(cursor.retreat());
        assert_eq!(cursor.current().unwrap().id, 4706);
    }

    #[test]
    fn empty() {
        let mut cursor = SentenceCursor::default();
        assert!(cursor.is_empty());
        assert!(cursor.current().is_none());
        assert!(!cursor.advance());
        assert!(!cursor.retreat());
    }
}
