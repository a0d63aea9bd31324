use {
    crate::{
        LexiconService,
        cursor::SentenceCursor,
        format::{format_parts_of_speech, format_senses, format_sentences},
        lang::jpn::derive_segments,
    },
    kanjibase_api::{AnnotationBundle, LexiconEntry, LookupConfig, NormString},
    tracing::debug,
};

impl LexiconService {
    /// Looks up every annotation for a surface string.
    ///
    /// Each annotation is looked up independently: a miss in one source, or a
    /// source which failed to load, only leaves that annotation absent.
    /// Blank text yields an empty bundle.
    #[must_use]
    pub fn lookup(&self, text: &str, config: &LookupConfig) -> AnnotationBundle {
        let Some(text) = NormString::new(text) else {
            return AnnotationBundle::default();
        };
        let text = text.as_str();
        let entry = self.lexicon().get(text);

        let bundle = AnnotationBundle {
            furigana: self.furigana_markup(text, entry, config),
            reading: entry
                .map(|entry| entry.reading.clone())
                .and_then(non_empty),
            parts_of_speech: entry
                .map(|entry| {
                    format_parts_of_speech(entry.parts_of_speech.iter().map(String::as_str))
                })
                .and_then(non_empty),
            senses: entry
                .map(|entry| {
                    format_senses(
                        entry,
                        config.max_senses,
                        config.sense_format,
                        config.number_senses,
                    )
                })
                .and_then(non_empty),
            sentences: non_empty(format_sentences(self.corpus().find_by_word_ordered(
                text,
                config.max_sentences,
                config.sentence_order,
            ))),
        };
        debug!(
            "Looked up {text:?}: {} annotations",
            bundle.iter().count()
        );
        bundle
    }

    fn furigana_markup(
        &self,
        text: &str,
        entry: Option<&LexiconEntry>,
        config: &LookupConfig,
    ) -> Option<String> {
        if let Some(markup) = non_empty(self.furigana().markup(text)) {
            return Some(markup);
        }
        if !config.derive_furigana {
            return None;
        }
        let reading = entry.map(|entry| entry.reading.as_str())?;
        if reading.is_empty() {
            return None;
        }
        non_empty(jmdict_furigana::format(&derive_segments(text, reading)))
    }

    /// Looks up the kanji with a Heisig (6th edition) keyword number, written
    /// as text.
    #[must_use]
    pub fn lookup_heisig(&self, number: &str) -> Option<&str> {
        self.kanji().lookup(number)
    }

    /// Finds the example sentences for `word` which a lookup would show, as
    /// a cursor for paging through them.
    #[must_use]
    pub fn sentence_cursor(&self, word: &str, config: &LookupConfig) -> SentenceCursor {
        let sentences = self
            .corpus()
            .find_by_word_ordered(word.trim(), config.max_sentences, config.sentence_order)
            .into_iter()
            .cloned()
            .collect();
        SentenceCursor::new(sentences)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::tests::service,
        kanjibase_api::{Annotation, SenseFormat, SentenceOrder},
    };

    #[test]
    fn full_bundle() {
        let service = service();
        let bundle = service.lookup("食べる", &LookupConfig::default());
        assert_eq!(
            bundle,
            AnnotationBundle {
                furigana: Some("食[た]べる".into()),
                reading: Some("たべる".into()),
                parts_of_speech: Some("一段、他動詞".into()),
                senses: Some(
                    "1: to eat<br>2: to live on (e.g. a salary); to live off; to subsist on"
                        .into()
                ),
                sentences: Some("私はパンを食べる。".into()),
            }
        );
    }

    #[test]
    fn sources_are_independent() {
        let service = service();
        let config = LookupConfig::default();

        // in the dictionary, but not the furigana table or any sentence
        let bundle = service.lookup("勉強", &config);
        assert_eq!(bundle.furigana, None);
        assert_eq!(bundle.reading.as_deref(), Some("べんきょう"));
        assert_eq!(bundle.parts_of_speech.as_deref(), Some("名詞、する"));
        assert_eq!(bundle.sentences.as_deref(), Some("勉強しましょう。"));

        // only in sentences
        let bundle = service.lookup("猫", &config);
        assert_eq!(
            bundle.iter().map(|(annotation, _)| annotation).collect::<Vec<_>>(),
            [Annotation::Sentences]
        );
    }

    #[test]
    fn misses() {
        let service = service();
        let config = LookupConfig::default();
        assert!(service.lookup("飲む", &config).is_empty());
        assert!(service.lookup("", &config).is_empty());
        assert!(service.lookup("  \t", &config).is_empty());
        assert!(service.lookup("食べ", &config).senses.is_none());
    }

    #[test]
    fn trims_input() {
        let service = service();
        let config = LookupConfig::default();
        assert_eq!(
            service.lookup(" 食べる\n", &config),
            service.lookup("食べる", &config)
        );
    }

    #[test]
    fn idempotent() {
        let service = service();
        let config = LookupConfig::default();
        assert_eq!(
            service.lookup("食べる", &config),
            service.lookup("食べる", &config)
        );
    }

    #[test]
    fn config_shapes_output() {
        let service = service();
        let config = LookupConfig {
            max_senses: 1,
            max_sentences: 1,
            sense_format: SenseFormat::OrderedList,
            sentence_order: SentenceOrder::Newest,
            ..Default::default()
        };
        let bundle = service.lookup("食べる", &config);
        assert_eq!(bundle.senses.as_deref(), Some("<ol><li>to eat</li></ol>"));
        assert_eq!(bundle.sentences.as_deref(), Some("私はパンを食べる。"));

        let config = LookupConfig {
            max_senses: 0,
            max_sentences: 0,
            ..Default::default()
        };
        let bundle = service.lookup("食べる", &config);
        assert_eq!(bundle.senses, None);
        assert_eq!(bundle.sentences, None);
    }

    #[test]
    fn derived_furigana() {
        let service = service();
        let config = LookupConfig {
            derive_furigana: true,
            ..Default::default()
        };
        assert_eq!(
            service.lookup("勉強", &config).furigana.as_deref(),
            Some("勉強[べんきょう]")
        );
        // the table still wins when it has a record
        assert_eq!(
            service.lookup("食べる", &config).furigana.as_deref(),
            Some("食[た]べる")
        );
        assert_eq!(service.lookup("飲む", &config).furigana, None);
    }

    #[test]
    fn heisig() {
        let service = service();
        assert_eq!(service.lookup_heisig("1526"), Some("食"));
        assert_eq!(service.lookup_heisig("0"), None);
    }

    #[test]
    fn cursor() {
        let service = service();
        let config = LookupConfig {
            max_sentences: 2,
            ..Default::default()
        };
        let mut cursor = service.sentence_cursor("食べ", &config);
        assert_eq!(cursor.len(), 2);
        assert_eq!(cursor.current().unwrap().id, 4707);
        assert!(cursor.advance());
        assert_eq!(cursor.current().unwrap().id, 4706);
        assert!(!cursor.advance());
    }
}
