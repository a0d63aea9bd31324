//! Loading of each source at startup, degrading to an empty store when a
//! source can't be loaded.

use {
    crate::{
        IndexMap,
        config::DataPaths,
        corpus::SentenceCorpus,
        jmdict::{Lexicon, LexiconOptions},
        kanjidic::KanjiIndex,
        snapshot::{self, Snapshot, SnapshotError},
    },
    anyhow::Result,
    derive_more::{Deref, Display, Error},
    jmdict_furigana::FuriganaTable,
    std::{
        io,
        path::{Path, PathBuf},
    },
    tracing::{debug, info, warn},
};

/// Input that the engine loads data from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    #[display("dictionary")]
    Lexicon,
    #[display("furigana table")]
    Furigana,
    #[display("sentence corpus")]
    Sentences,
    #[display("sentence ratings")]
    Ratings,
    #[display("kanji dictionary")]
    Kanji,
}

impl Source {
    pub const ALL: &[Self] = &[
        Self::Lexicon,
        Self::Furigana,
        Self::Sentences,
        Self::Ratings,
        Self::Kanji,
    ];

    fn rank(self) -> usize {
        Self::ALL
            .iter()
            .position(|source| *source == self)
            .unwrap_or(Self::ALL.len())
    }
}

/// Why a source could not be loaded.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum LoadDiagnostic {
    #[display("{path:?} does not exist")]
    SourceMissing { path: PathBuf },
    #[display("failed to load {path:?}: {reason}")]
    SourceMalformed { path: PathBuf, reason: String },
    #[display("requires the {dependency}, which is unavailable")]
    DependencyUnavailable { dependency: Source },
}

/// Outcome of loading a single [`Source`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Loaded {
        /// Number of entries that lookups can find in this source.
        entries: usize,
        from_snapshot: bool,
    },
    Unavailable(LoadDiagnostic),
}

impl SourceStatus {
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Outcome of loading every [`Source`], in [`Source::ALL`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct LoadReport(IndexMap<Source, SourceStatus>);

impl LoadReport {
    #[must_use]
    pub fn status(&self, source: Source) -> Option<&SourceStatus> {
        self.0.get(&source)
    }

    #[must_use]
    pub fn is_loaded(&self, source: Source) -> bool {
        self.status(source).is_some_and(SourceStatus::is_loaded)
    }

    /// Returns `true` if at least one source loaded.
    #[must_use]
    pub fn any_loaded(&self) -> bool {
        self.0.values().any(SourceStatus::is_loaded)
    }

    pub fn unavailable(&self) -> impl Iterator<Item = (Source, &LoadDiagnostic)> {
        self.0.iter().filter_map(|(source, status)| match status {
            SourceStatus::Loaded { .. } => None,
            SourceStatus::Unavailable(diagnostic) => Some((*source, diagnostic)),
        })
    }

    pub(crate) fn from_statuses(statuses: impl IntoIterator<Item = (Source, SourceStatus)>) -> Self {
        let mut report = statuses.into_iter().collect::<IndexMap<_, _>>();
        report.sort_by(|a, _, b, _| a.rank().cmp(&b.rank()));
        Self(report)
    }
}

fn diagnose(path: &Path, err: &anyhow::Error) -> LoadDiagnostic {
    let not_found = err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|err| err.kind() == io::ErrorKind::NotFound)
    });
    if not_found {
        LoadDiagnostic::SourceMissing {
            path: path.to_path_buf(),
        }
    } else {
        LoadDiagnostic::SourceMalformed {
            path: path.to_path_buf(),
            reason: format!("{err:#}"),
        }
    }
}

fn from_source<T>(
    source: Source,
    path: &Path,
    load: impl FnOnce(&Path) -> Result<T>,
) -> Result<T, LoadDiagnostic> {
    load(path).map_err(|err| {
        let diagnostic = diagnose(path, &err);
        warn!("Failed to load {source}: {diagnostic}");
        diagnostic
    })
}

fn loaded(source: Source, entries: usize, from_snapshot: bool) -> SourceStatus {
    if from_snapshot {
        info!("Loaded {source} with {entries} entries from snapshot");
    } else {
        info!("Loaded {source} with {entries} entries");
    }
    SourceStatus::Loaded {
        entries,
        from_snapshot,
    }
}

fn restore<T: Snapshot>(source: Source, path: &Path, options: &T::Options) -> Option<T> {
    match snapshot::load::<T>(path, options) {
        Ok(value) => Some(value),
        Err(SnapshotError::Missing) => {
            debug!("No {source} snapshot at {path:?}");
            None
        }
        Err(err) => {
            warn!("Failed to restore {source} snapshot, rebuilding from sources: {err}");
            None
        }
    }
}

fn store<T: Snapshot>(source: Source, path: &Path, options: &T::Options, value: &T) {
    match snapshot::save(path, options, value) {
        Ok(()) => debug!("Saved {source} snapshot to {path:?}"),
        Err(err) => warn!("Failed to save {source} snapshot: {err:?}"),
    }
}

pub(crate) fn load_lexicon(paths: &DataPaths, options: &LexiconOptions) -> (Lexicon, SourceStatus) {
    if let Some(lexicon) = restore::<Lexicon>(Source::Lexicon, &paths.lexicon_snapshot, options)
    {
        let status = loaded(Source::Lexicon, lexicon.len(), true);
        return (lexicon, status);
    }

    match from_source(Source::Lexicon, &paths.lexicon, |path| {
        Lexicon::load(path, options)
    }) {
        Ok(lexicon) => {
            store(Source::Lexicon, &paths.lexicon_snapshot, options, &lexicon);
            let status = loaded(Source::Lexicon, lexicon.len(), false);
            (lexicon, status)
        }
        Err(diagnostic) => (Lexicon::default(), SourceStatus::Unavailable(diagnostic)),
    }
}

pub(crate) fn load_furigana(paths: &DataPaths) -> (FuriganaTable, SourceStatus) {
    match from_source(Source::Furigana, &paths.furigana, |path| {
        FuriganaTable::load(path)
    }) {
        Ok(table) => {
            let status = loaded(Source::Furigana, table.len(), false);
            (table, status)
        }
        Err(diagnostic) => (FuriganaTable::default(), SourceStatus::Unavailable(diagnostic)),
    }
}

/// Loads the sentence corpus with its ratings merged in.
///
/// A snapshot is only saved when both files loaded, so that a missing ratings
/// file doesn't get baked into the snapshot.
pub(crate) fn load_corpus(paths: &DataPaths) -> (SentenceCorpus, [(Source, SourceStatus); 2]) {
    if let Some(corpus) =
        restore::<SentenceCorpus>(Source::Sentences, &paths.sentences_snapshot, &())
    {
        let sentences = loaded(Source::Sentences, corpus.len(), true);
        let ratings = SourceStatus::Loaded {
            entries: corpus.rated_count(),
            from_snapshot: true,
        };
        return (
            corpus,
            [(Source::Sentences, sentences), (Source::Ratings, ratings)],
        );
    }

    let mut corpus = match from_source(Source::Sentences, &paths.sentences, |path| {
        SentenceCorpus::load_sentences(path)
    }) {
        Ok(corpus) => corpus,
        Err(diagnostic) => {
            let ratings = LoadDiagnostic::DependencyUnavailable {
                dependency: Source::Sentences,
            };
            return (
                SentenceCorpus::default(),
                [
                    (Source::Sentences, SourceStatus::Unavailable(diagnostic)),
                    (Source::Ratings, SourceStatus::Unavailable(ratings)),
                ],
            );
        }
    };
    let sentences = loaded(Source::Sentences, corpus.len(), false);

    let ratings = match from_source(Source::Ratings, &paths.ratings, |path| {
        corpus.load_ratings(path)
    }) {
        Ok(stats) => {
            store(Source::Sentences, &paths.sentences_snapshot, &(), &corpus);
            loaded(Source::Ratings, stats.merged, false)
        }
        Err(diagnostic) => SourceStatus::Unavailable(diagnostic),
    };
    (
        corpus,
        [(Source::Sentences, sentences), (Source::Ratings, ratings)],
    )
}

pub(crate) fn load_kanji(paths: &DataPaths) -> (KanjiIndex, SourceStatus) {
    match from_source(Source::Kanji, &paths.kanji, |path| KanjiIndex::load(path)) {
        Ok(index) => {
            let status = loaded(Source::Kanji, index.len(), false);
            (index, status)
        }
        Err(diagnostic) => (KanjiIndex::default(), SourceStatus::Unavailable(diagnostic)),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::corpus, std::fs};

    #[test]
    fn missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path());

        let (lexicon, status) = load_lexicon(&paths, &LexiconOptions::default());
        assert!(lexicon.is_empty());
        assert_eq!(
            status,
            SourceStatus::Unavailable(LoadDiagnostic::SourceMissing {
                path: paths.lexicon.clone()
            })
        );

        let (corpus, [(_, sentences), (_, ratings)]) = load_corpus(&paths);
        assert!(corpus.is_empty());
        assert!(!sentences.is_loaded());
        assert_eq!(
            ratings,
            SourceStatus::Unavailable(LoadDiagnostic::DependencyUnavailable {
                dependency: Source::Sentences
            })
        );
        assert!(!paths.lexicon_snapshot.exists());
        assert!(!paths.sentences_snapshot.exists());
    }

    #[test]
    fn malformed_source() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path());
        fs::write(&paths.furigana, "not json").unwrap();

        let (table, status) = load_furigana(&paths);
        assert!(table.is_empty());
        assert!(matches!(
            status,
            SourceStatus::Unavailable(LoadDiagnostic::SourceMalformed { .. })
        ));
    }

    #[test]
    fn corpus_snapshot_needs_ratings() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path());
        fs::write(&paths.sentences, corpus::tests::SENTENCES).unwrap();

        let (corpus, [(_, sentences), (_, ratings)]) = load_corpus(&paths);
        assert_eq!(corpus.len(), 5);
        assert_eq!(
            sentences,
            SourceStatus::Loaded {
                entries: 5,
                from_snapshot: false
            }
        );
        assert!(matches!(
            ratings,
            SourceStatus::Unavailable(LoadDiagnostic::SourceMissing { .. })
        ));
        assert!(!paths.sentences_snapshot.exists());

        fs::write(&paths.ratings, corpus::tests::RATINGS).unwrap();
        let (built, [_, (_, ratings)]) = load_corpus(&paths);
        assert_eq!(
            ratings,
            SourceStatus::Loaded {
                entries: 4,
                from_snapshot: false
            }
        );
        assert!(paths.sentences_snapshot.exists());

        let (restored, [(_, sentences), (_, ratings)]) = load_corpus(&paths);
        assert_eq!(restored, built);
        assert_eq!(
            sentences,
            SourceStatus::Loaded {
                entries: 5,
                from_snapshot: true
            }
        );
        assert_eq!(
            ratings,
            SourceStatus::Loaded {
                entries: 2,
                from_snapshot: true
            }
        );
    }

    #[test]
    fn corrupt_snapshot_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::in_dir(dir.path());
        fs::write(&paths.sentences, corpus::tests::SENTENCES).unwrap();
        fs::write(&paths.ratings, corpus::tests::RATINGS).unwrap();
        fs::write(&paths.sentences_snapshot, "garbage").unwrap();

        let (corpus, [(_, sentences), _]) = load_corpus(&paths);
        assert_eq!(corpus, corpus::tests::corpus());
        assert_eq!(
            sentences,
            SourceStatus::Loaded {
                entries: 5,
                from_snapshot: false
            }
        );
        // the rebuilt corpus replaced the corrupt snapshot
        assert!(snapshot::load::<SentenceCorpus>(&paths.sentences_snapshot, &()).is_ok());
    }

    #[test]
    fn report_order() {
        let report = LoadReport::from_statuses([
            (
                Source::Kanji,
                SourceStatus::Loaded {
                    entries: 1,
                    from_snapshot: false,
                },
            ),
            (
                Source::Lexicon,
                SourceStatus::Unavailable(LoadDiagnostic::SourceMissing {
                    path: PathBuf::from("JMdict_e.xml"),
                }),
            ),
        ]);
        assert_eq!(
            report.keys().copied().collect::<Vec<_>>(),
            [Source::Lexicon, Source::Kanji]
        );
        assert!(report.any_loaded());
        assert!(report.is_loaded(Source::Kanji));
        assert!(!report.is_loaded(Source::Furigana));
        assert_eq!(
            report.unavailable().map(|(source, _)| source).collect::<Vec<_>>(),
            [Source::Lexicon]
        );
        assert!(!LoadReport::default().any_loaded());
    }
}
