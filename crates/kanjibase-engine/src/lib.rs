#![doc = include_str!("../README.md")]
#![allow(missing_docs, clippy::missing_errors_doc)]

pub mod config;
pub mod corpus;
pub mod cursor;
pub mod entity;
pub mod format;
pub mod jmdict;
pub mod kanjidic;
pub mod lang;
pub mod load;
mod lookup;
pub mod note;
pub mod snapshot;

pub use {
    jmdict_furigana, kanjibase_api,
    kanjibase_api::{IndexMap, IndexSet},
    load::{LoadDiagnostic, LoadReport, Source, SourceStatus},
};
use {
    anyhow::{Context, Result},
    config::DataPaths,
    corpus::SentenceCorpus,
    derive_more::Deref,
    directories::ProjectDirs,
    jmdict::{Lexicon, LexiconOptions},
    jmdict_furigana::FuriganaTable,
    kanjidic::KanjiIndex,
    std::{path::PathBuf, sync::Arc},
    tracing::{error, info},
};

/// Handle to every loaded store.
///
/// Stores are immutable once loaded, so lookups never block each other. This
/// type is cheap to clone and can be shared between threads.
#[derive(Debug, Clone, Deref)]
pub struct LexiconService(Arc<Inner>);

#[derive(Debug)]
pub struct Inner {
    lexicon: Lexicon,
    furigana: FuriganaTable,
    corpus: SentenceCorpus,
    kanji: KanjiIndex,
    report: LoadReport,
}

impl LexiconService {
    /// Loads every source in `paths` in parallel, restoring from snapshots
    /// where possible.
    ///
    /// Never fails. A source which can't be loaded is left empty, and the
    /// reason is recorded in [`LexiconService::report`].
    #[must_use]
    pub fn new(paths: &DataPaths, options: &LexiconOptions) -> Self {
        let ((lexicon, furigana), (corpus, kanji)) = rayon::join(
            || {
                rayon::join(
                    || load::load_lexicon(paths, options),
                    || load::load_furigana(paths),
                )
            },
            || rayon::join(|| load::load_corpus(paths), || load::load_kanji(paths)),
        );
        let (lexicon, lexicon_status) = lexicon;
        let (furigana, furigana_status) = furigana;
        let (corpus, [sentences_status, ratings_status]) = corpus;
        let (kanji, kanji_status) = kanji;

        let report = LoadReport::from_statuses([
            (Source::Lexicon, lexicon_status),
            (Source::Furigana, furigana_status),
            sentences_status,
            ratings_status,
            (Source::Kanji, kanji_status),
        ]);
        if report.any_loaded() {
            let loaded = report.values().filter(|status| status.is_loaded()).count();
            info!("Loaded {loaded}/{} sources", report.len());
        } else {
            error!("No source could be loaded, so every lookup will come back empty");
        }

        Self(Arc::new(Inner {
            lexicon,
            furigana,
            corpus,
            kanji,
            report,
        }))
    }

    /// Creates a service from stores which are already loaded.
    ///
    /// [`Source::Ratings`] is only reported if `corpus` has rated sentences.
    #[must_use]
    pub fn from_parts(
        lexicon: Lexicon,
        furigana: FuriganaTable,
        corpus: SentenceCorpus,
        kanji: KanjiIndex,
    ) -> Self {
        let loaded = |entries| SourceStatus::Loaded {
            entries,
            from_snapshot: false,
        };
        let rated = corpus.rated_count();
        let report = LoadReport::from_statuses(
            [
                (Source::Lexicon, loaded(lexicon.len())),
                (Source::Furigana, loaded(furigana.len())),
                (Source::Sentences, loaded(corpus.len())),
                (Source::Kanji, loaded(kanji.len())),
            ]
            .into_iter()
            .chain((rated > 0).then(|| (Source::Ratings, loaded(rated)))),
        );
        Self(Arc::new(Inner {
            lexicon,
            furigana,
            corpus,
            kanji,
            report,
        }))
    }

    #[must_use]
    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    #[must_use]
    pub fn furigana(&self) -> &FuriganaTable {
        &self.furigana
    }

    #[must_use]
    pub fn corpus(&self) -> &SentenceCorpus {
        &self.corpus
    }

    #[must_use]
    pub fn kanji(&self) -> &KanjiIndex {
        &self.kanji
    }

    /// Gets which sources loaded, and why the others didn't.
    #[must_use]
    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

/// Gets the default directory that source files and snapshots are kept in.
pub fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("io.github", "aecsocket", "Kanjibase")
        .context("failed to get default app directories")?;
    Ok(dirs.data_dir().to_path_buf())
}
