//! Example sentence corpus in the [Tatoeba] export format.
//!
//! The corpus is loaded from two tab-separated files:
//!
//! - sentences, with rows of `id, lang, text, contributor, date added, date
//!   modified`
//! - user ratings, with rows of `user, sentence id, rating, ...` where the
//!   rating is one of `1`, `0` or `-1`
//!
//! [Tatoeba]: https://tatoeba.org/en/downloads

use {
    crate::format::format_sentences,
    anyhow::{Context, Result},
    chrono::NaiveDateTime,
    foldhash::HashMap,
    kanjibase_api::{Rating, RatingValue, SentenceOrder, SentenceRecord, default_sentence_date},
    serde::{Deserialize, Serialize},
    std::{cmp::Ordering, fs::File, io::Read, path::Path},
    tracing::debug,
};

/// Sentences keyed by ID.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceCorpus {
    sentences: HashMap<u64, SentenceRecord>,
}

/// Counts of what happened to each row of a ratings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingStats {
    /// Ratings added to a sentence.
    pub merged: usize,
    /// Rows referencing a sentence which is not in the corpus.
    pub unknown: usize,
    /// Rows which could not be parsed.
    pub skipped: usize,
}

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

fn parse_date(field: &str) -> Option<NaiveDateTime> {
    match field.trim() {
        "" | "\\N" | "0000-00-00 00:00:00" => None,
        field => NaiveDateTime::parse_from_str(field, DATE_FORMAT).ok(),
    }
}

fn parse_record(row: &csv::StringRecord) -> Option<SentenceRecord> {
    if row.len() < 6 {
        return None;
    }
    let id = row[0].trim().parse::<u64>().ok()?;
    let (date_added, date_modified) = match (parse_date(&row[4]), parse_date(&row[5])) {
        (Some(added), Some(modified)) => (added, modified),
        (Some(date), None) | (None, Some(date)) => (date, date),
        (None, None) => (default_sentence_date(), default_sentence_date()),
    };
    Some(SentenceRecord {
        id,
        lang: row[1].to_owned(),
        text: row[2].to_owned(),
        contributor: row[3].to_owned(),
        date_added,
        date_modified,
        rating: Rating::default(),
    })
}

impl SentenceCorpus {
    /// Creates a corpus from already parsed records.
    ///
    /// If two records share an ID, the later one wins.
    pub fn from_records(records: impl IntoIterator<Item = SentenceRecord>) -> Self {
        Self {
            sentences: records
                .into_iter()
                .map(|record| (record.id, record))
                .collect(),
        }
    }

    /// Reads sentence rows from tab-separated data.
    ///
    /// Rows with fewer than six fields or a non-numeric ID are skipped. If
    /// two rows share an ID, the later one wins.
    pub fn read_sentences(reader: impl Read) -> Result<Self> {
        let mut corpus = Self::default();
        let mut skipped = 0usize;
        for row in tsv_reader(reader).records() {
            let row = match row {
                Ok(row) => row,
                Err(err) if err.is_io_error() => {
                    return Err(err).context("failed to read sentence row");
                }
                Err(_) => {
                    skipped += 1;
                    continue;
                }
            };
            let Some(record) = parse_record(&row) else {
                skipped += 1;
                continue;
            };
            corpus.sentences.insert(record.id, record);
        }
        if skipped > 0 {
            debug!("Skipped {skipped} malformed sentence rows");
        }
        Ok(corpus)
    }

    /// Reads sentence rows from a file.
    pub fn load_sentences(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {path:?}"))?;
        Self::read_sentences(file).with_context(|| format!("failed to read {path:?}"))
    }

    /// Merges rows of a tab-separated ratings file into this corpus.
    ///
    /// Rows referencing an unknown sentence ID, or with a rating other than
    /// `1`, `0` or `-1`, are ignored.
    pub fn merge_ratings(&mut self, reader: impl Read) -> Result<RatingStats> {
        let mut stats = RatingStats::default();
        for row in tsv_reader(reader).records() {
            let row = match row {
                Ok(row) => row,
                Err(err) if err.is_io_error() => {
                    return Err(err).context("failed to read rating row");
                }
                Err(_) => {
                    stats.skipped += 1;
                    continue;
                }
            };
            let (Some(id), Some(value)) = (
                row.get(1).and_then(|id| id.trim().parse::<u64>().ok()),
                row.get(2).and_then(RatingValue::from_field),
            ) else {
                stats.skipped += 1;
                continue;
            };
            let Some(sentence) = self.sentences.get_mut(&id) else {
                stats.unknown += 1;
                continue;
            };
            sentence.rating.add(value);
            stats.merged += 1;
        }
        if stats.unknown > 0 || stats.skipped > 0 {
            debug!(
                "Ignored {} ratings for unknown sentences and {} malformed rating rows",
                stats.unknown, stats.skipped
            );
        }
        Ok(stats)
    }

    /// Merges a ratings file into this corpus.
    pub fn load_ratings(&mut self, path: impl AsRef<Path>) -> Result<RatingStats> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {path:?}"))?;
        self.merge_ratings(file)
            .with_context(|| format!("failed to read {path:?}"))
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&SentenceRecord> {
        self.sentences.get(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Number of sentences which have at least one rating.
    #[must_use]
    pub fn rated_count(&self) -> usize {
        self.sentences
            .values()
            .filter(|sentence| sentence.rating.total > 0)
            .count()
    }

    /// Finds up to `limit` sentences containing `word`, oldest first.
    #[must_use]
    pub fn find_by_word(&self, word: &str, limit: usize) -> Vec<&SentenceRecord> {
        self.find_by_word_ordered(word, limit, SentenceOrder::Oldest)
    }

    /// Finds up to `limit` sentences containing `word` in the given order.
    ///
    /// Ties are broken by ascending ID. An empty `word` matches nothing.
    #[must_use]
    pub fn find_by_word_ordered(
        &self,
        word: &str,
        limit: usize,
        order: SentenceOrder,
    ) -> Vec<&SentenceRecord> {
        if word.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut matches = self
            .sentences
            .values()
            .filter(|sentence| sentence.text.contains(word))
            .collect::<Vec<_>>();
        matches.sort_unstable_by(|a, b| compare(order, a, b));
        matches.truncate(limit);
        matches
    }

    /// Finds up to `limit` sentences containing `word`, and joins their text
    /// with `<br>`.
    #[must_use]
    pub fn find_by_word_formatted(&self, word: &str, limit: usize) -> String {
        format_sentences(self.find_by_word(word, limit))
    }
}

fn compare(order: SentenceOrder, a: &SentenceRecord, b: &SentenceRecord) -> Ordering {
    match order {
        SentenceOrder::Oldest => a.date_added.cmp(&b.date_added),
        SentenceOrder::Newest => b.date_added.cmp(&a.date_added),
        SentenceOrder::BestRated => b
            .rating
            .percentage()
            .total_cmp(&a.rating.percentage())
            .then_with(|| a.date_added.cmp(&b.date_added)),
    }
    .then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
pub(crate) mod tests {
    use {super::*, std::io::Write as _};

    pub const SENTENCES: &str = "\
4705\tjpn\t私はパンを食べる。\talice\t2009-03-01 10:00:00\t2010-01-01 00:00:00
4706\tjpn\t猫が魚を食べた。\tbob\t\\N\t2008-05-05 12:00:00
4707\tjpn\t食べ物が好きです。\tcarol\t0000-00-00 00:00:00\t\\N
4708\tjpn\t勉強しましょう。\tdave\t2007-12-31 23:59:59\t\\N
4709\tjpn\t彼はご飯を食べている。\terin\t2009-03-01 10:00:00\tnot a date
bad\tjpn\tskipped row\tfrank\t\\N\t\\N
4710\tjpn\ttoo few fields
";

    pub const RATINGS: &str = "\
alice\t4705\t1\t2010-01-01 00:00:00\t2010-01-01 00:00:00
bob\t4705\t-1\t2010-01-01 00:00:00\t2010-01-01 00:00:00
carol\t4705\t1\t2010-01-01 00:00:00\t2010-01-01 00:00:00
dave\t4706\t0\t2010-01-01 00:00:00\t2010-01-01 00:00:00
erin\t9999\t1\t2010-01-01 00:00:00\t2010-01-01 00:00:00
frank\t4707\t2\t2010-01-01 00:00:00\t2010-01-01 00:00:00
grace\t4709
";

    pub fn corpus() -> SentenceCorpus {
        let mut corpus = SentenceCorpus::read_sentences(SENTENCES.as_bytes()).unwrap();
        corpus.merge_ratings(RATINGS.as_bytes()).unwrap();
        corpus
    }

    fn ids(sentences: &[&SentenceRecord]) -> Vec<u64> {
        sentences.iter().map(|sentence| sentence.id).collect()
    }

    #[test]
    fn rows() {
        let corpus = SentenceCorpus::read_sentences(SENTENCES.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 5);
        let sentence = corpus.get(4705).unwrap();
        assert_eq!(sentence.text, "私はパンを食べる。");
        assert_eq!(sentence.contributor, "alice");
        assert_eq!(sentence.date_added.to_string(), "2009-03-01 10:00:00");
        assert_eq!(sentence.date_modified.to_string(), "2010-01-01 00:00:00");
        assert!(corpus.get(4710).is_none());
    }

    #[test]
    fn missing_dates() {
        let corpus = corpus();
        let only_modified = corpus.get(4706).unwrap();
        assert_eq!(only_modified.date_added.to_string(), "2008-05-05 12:00:00");
        assert_eq!(only_modified.date_modified, only_modified.date_added);

        let neither = corpus.get(4707).unwrap();
        assert_eq!(neither.date_added, default_sentence_date());
        assert_eq!(neither.date_modified, default_sentence_date());

        let only_added = corpus.get(4708).unwrap();
        assert_eq!(only_added.date_modified.to_string(), "2007-12-31 23:59:59");

        let unparseable = corpus.get(4709).unwrap();
        assert_eq!(unparseable.date_modified, unparseable.date_added);
    }

    #[test]
    fn later_duplicate_wins() {
        let tsv = "1\tjpn\tfirst\ta\t\\N\t\\N\n1\tjpn\tsecond\tb\t\\N\t\\N\n";
        let corpus = SentenceCorpus::read_sentences(tsv.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(1).unwrap().text, "second");
    }

    #[test]
    fn ratings() {
        let mut corpus = SentenceCorpus::read_sentences(SENTENCES.as_bytes()).unwrap();
        let stats = corpus.merge_ratings(RATINGS.as_bytes()).unwrap();
        assert_eq!(
            stats,
            RatingStats {
                merged: 4,
                unknown: 1,
                skipped: 2,
            }
        );

        let rating = corpus.get(4705).unwrap().rating;
        assert_eq!((rating.positive, rating.negative, rating.total), (2, 1, 3));
        assert_eq!(corpus.get(4706).unwrap().rating.undecided(), 1);
        assert_eq!(corpus.get(4708).unwrap().rating.percentage(), 100.0);
        assert_eq!(corpus.rated_count(), 2);

        for sentence in corpus.sentences.values() {
            let rating = sentence.rating;
            assert_eq!(
                rating.total,
                rating.positive + rating.negative + rating.undecided()
            );
        }
    }

    #[test]
    fn find_oldest_first() {
        let corpus = corpus();
        // 4706 is dated 2008, 4707 has the default 2008-01-26 date, and
        // 4705 and 4709 share a date so break the tie by ID
        assert_eq!(
            ids(&corpus.find_by_word("食べ", 10)),
            [4707, 4706, 4705, 4709]
        );
        let found = corpus.find_by_word("食べ", 10);
        assert!(found.is_sorted_by_key(|sentence| sentence.date_added));
    }

    #[test]
    fn find_is_idempotent() {
        let corpus = corpus();
        assert_eq!(corpus.find_by_word("食べ", 3), corpus.find_by_word("食べ", 3));
    }

    #[test]
    fn find_cap() {
        let corpus = corpus();
        for limit in 0..6 {
            let found = corpus.find_by_word("食べ", limit);
            assert_eq!(found.len(), limit.min(4));
        }
        assert!(corpus.find_by_word("", 10).is_empty());
        assert!(corpus.find_by_word("飲む", 10).is_empty());
    }

    #[test]
    fn find_ordered() {
        let corpus = corpus();
        assert_eq!(
            ids(&corpus.find_by_word_ordered("食べ", 10, SentenceOrder::Newest)),
            [4705, 4709, 4706, 4707]
        );
        // 4706 has one undecided rating, 4705 is 2/3 positive, the rest are
        // unrated and count as fully trusted
        assert_eq!(
            ids(&corpus.find_by_word_ordered("食べ", 10, SentenceOrder::BestRated)),
            [4707, 4709, 4705, 4706]
        );
    }

    #[test]
    fn find_formatted() {
        let corpus = corpus();
        assert_eq!(
            corpus.find_by_word_formatted("食べ", 2),
            "食べ物が好きです。<br>猫が魚を食べた。"
        );
        assert_eq!(corpus.find_by_word_formatted("飲む", 2), "");
    }

    #[test]
    fn load_from_files() {
        let mut sentences = tempfile::NamedTempFile::new().unwrap();
        sentences.write_all(SENTENCES.as_bytes()).unwrap();
        let mut ratings = tempfile::NamedTempFile::new().unwrap();
        ratings.write_all(RATINGS.as_bytes()).unwrap();

        let mut corpus = SentenceCorpus::load_sentences(sentences.path()).unwrap();
        corpus.load_ratings(ratings.path()).unwrap();
        assert_eq!(corpus, self::corpus());

        assert!(SentenceCorpus::load_sentences("/nonexistent/sentences.csv").is_err());
        assert!(corpus.load_ratings("/nonexistent/ratings.csv").is_err());
    }
}
