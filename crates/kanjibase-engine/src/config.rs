use {
    crate::jmdict::LexiconOptions,
    anyhow::{Context, Result},
    kanjibase_api::{FieldMapping, LookupConfig},
    serde::{Deserialize, Serialize},
    std::{
        fs,
        path::{Path, PathBuf},
    },
};

/// User configuration, stored as a single flat JSON object.
///
/// Every key is optional. Field names use the same keys as the editor add-on,
/// so an existing add-on configuration file can be loaded as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(flatten)]
    pub lookup: LookupConfig,
    #[serde(flatten)]
    pub fields: FieldMapping,
    #[serde(flatten)]
    pub lexicon: LexiconOptions,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse config")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).with_context(|| format!("failed to read {path:?}"))?;
        Self::from_json(&json).with_context(|| format!("failed to load {path:?}"))
    }
}

/// Locations of every source file and snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    /// JMdict XML document.
    pub lexicon: PathBuf,
    /// JmdictFurigana JSON table.
    pub furigana: PathBuf,
    /// Tatoeba sentences TSV.
    pub sentences: PathBuf,
    /// Tatoeba user ratings TSV.
    pub ratings: PathBuf,
    /// KANJIDIC2 XML document.
    pub kanji: PathBuf,
    /// Snapshot of the built [`Lexicon`](crate::jmdict::Lexicon).
    pub lexicon_snapshot: PathBuf,
    /// Snapshot of the built [`SentenceCorpus`](crate::corpus::SentenceCorpus).
    pub sentences_snapshot: PathBuf,
}

impl DataPaths {
    /// Uses the conventional file names of each source inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            lexicon: dir.join("JMdict_e.xml"),
            furigana: dir.join("JmdictFurigana.json"),
            sentences: dir.join("sentences.csv"),
            ratings: dir.join("users_sentences.csv"),
            kanji: dir.join("kanjidic2.xml"),
            lexicon_snapshot: dir.join("jmdict.snapshot"),
            sentences_snapshot: dir.join("sentences.snapshot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, kanjibase_api::{Annotation, SenseFormat}};

    #[test]
    fn addon_config() {
        let config = Config::from_json(
            r#"{
                "kanji_field": "Kanji",
                "furigana_field": "Furigana",
                "kana_field": "Reading",
                "type_field": "not_set",
                "definition_field": "Meaning",
                "rtk_src": "Heisig",
                "rtk_dest": "Kanji",
                "max_senses": 3,
                "sense_format": "ordered_list",
                "gloss_lang": "ger"
            }"#,
        )
        .unwrap();
        assert_eq!(config.lookup.max_senses, 3);
        assert_eq!(config.lookup.max_sentences, 10);
        assert_eq!(config.lookup.sense_format, SenseFormat::OrderedList);
        assert_eq!(config.fields.source(), Some("Kanji"));
        assert_eq!(config.fields.destination(Annotation::Senses), Some("Meaning"));
        assert_eq!(config.fields.destination(Annotation::PartsOfSpeech), None);
        assert_eq!(config.fields.heisig_source(), Some("Heisig"));
        assert_eq!(config.lexicon.gloss_lang, "ger");
    }

    #[test]
    fn empty_config() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
        assert!(Config::from_json("[]").is_err());
        assert!(Config::from_file("/nonexistent/config.json").is_err());
    }

    #[test]
    fn conventional_names() {
        let paths = DataPaths::in_dir("/data");
        assert_eq!(paths.lexicon, Path::new("/data/JMdict_e.xml"));
        assert_eq!(paths.ratings, Path::new("/data/users_sentences.csv"));
        assert_eq!(paths.sentences_snapshot, Path::new("/data/sentences.snapshot"));
    }
}
