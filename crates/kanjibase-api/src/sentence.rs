use {
    chrono::{NaiveDate, NaiveDateTime},
    serde::{Deserialize, Serialize},
};

/// Single example sentence from a sentence corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Unique ID of this sentence in the corpus.
    pub id: u64,
    /// Language code of the sentence, e.g. `jpn`.
    pub lang: String,
    /// Sentence text.
    pub text: String,
    /// Username of whoever contributed the sentence.
    pub contributor: String,
    /// When this sentence was added to the corpus.
    pub date_added: NaiveDateTime,
    /// When this sentence was last modified.
    pub date_modified: NaiveDateTime,
    /// Crowd-sourced ratings for this sentence.
    pub rating: Rating,
}

/// Timestamp given to sentences which have neither an added nor modified
/// date: 2008-01-26 18:04:24.
#[must_use]
pub fn default_sentence_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2008, 1, 26)
        .and_then(|date| date.and_hms_opt(18, 4, 24))
        .unwrap_or_default()
}

/// Accumulated rating counts for a [`SentenceRecord`].
///
/// The undecided count is not stored; it is implied by
/// `total - positive - negative`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// Number of positive ratings.
    pub positive: u32,
    /// Number of negative ratings.
    pub negative: u32,
    /// Number of ratings of any kind.
    pub total: u32,
}

/// Single rating given to a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingValue {
    /// `1` in a ratings file.
    Positive,
    /// `0` in a ratings file.
    Undecided,
    /// `-1` in a ratings file.
    Negative,
}

impl RatingValue {
    /// Parses the rating column of a ratings file.
    ///
    /// Returns [`None`] for anything other than `1`, `0` or `-1`.
    #[must_use]
    pub fn from_field(field: &str) -> Option<Self> {
        match field.trim() {
            "1" => Some(Self::Positive),
            "0" => Some(Self::Undecided),
            "-1" => Some(Self::Negative),
            _ => None,
        }
    }
}

impl Rating {
    /// Counts one more rating.
    pub fn add(&mut self, value: RatingValue) {
        match value {
            RatingValue::Positive => self.positive += 1,
            RatingValue::Negative => self.negative += 1,
            RatingValue::Undecided => {}
        }
        self.total += 1;
    }

    /// Number of ratings which were neither positive nor negative.
    #[must_use]
    pub const fn undecided(&self) -> u32 {
        self.total
            .saturating_sub(self.positive)
            .saturating_sub(self.negative)
    }

    /// Percentage of ratings which were positive, in `0.0..=100.0`.
    ///
    /// A sentence nobody has rated yet is treated as fully trusted, and
    /// returns `100.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use kanjibase_api::{Rating, RatingValue};
    /// let mut rating = Rating::default();
    /// assert_eq!(rating.percentage(), 100.0);
    ///
    /// rating.add(RatingValue::Positive);
    /// rating.add(RatingValue::Negative);
    /// rating.add(RatingValue::Undecided);
    /// rating.add(RatingValue::Positive);
    /// assert_eq!(rating.percentage(), 50.0);
    /// assert_eq!(rating.undecided(), 1);
    /// ```
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        f64::from(self.positive) / f64::from(self.total) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_invariant() {
        let mut rating = Rating::default();
        for value in [
            RatingValue::Undecided,
            RatingValue::Negative,
            RatingValue::Positive,
            RatingValue::Undecided,
        ] {
            rating.add(value);
            assert_eq!(
                rating.total,
                rating.positive + rating.negative + rating.undecided()
            );
        }
        assert_eq!(rating.undecided(), 2);
        assert_eq!(rating.percentage(), 25.0);
    }

    #[test]
    fn rating_values() {
        assert_eq!(RatingValue::from_field("1"), Some(RatingValue::Positive));
        assert_eq!(RatingValue::from_field("0"), Some(RatingValue::Undecided));
        assert_eq!(RatingValue::from_field("-1"), Some(RatingValue::Negative));
        assert_eq!(RatingValue::from_field("2"), None);
        assert_eq!(RatingValue::from_field(""), None);
    }

    #[test]
    fn default_date() {
        assert_eq!(
            default_sentence_date().to_string(),
            "2008-01-26 18:04:24"
        );
    }
}
