//! Indexing of a [JMdict] XML document by written form.
//!
//! [JMdict]: https://www.edrdg.org/jmdict/j_jmdict.html

use {
    crate::entity::EntityTable,
    anyhow::{Context, Result},
    foldhash::HashMap,
    kanjibase_api::{IndexSet, LexiconEntry},
    quick_xml::{Reader, events::Event},
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        fs::File,
        io::{BufRead, BufReader},
        mem,
        path::Path,
    },
    tracing::debug,
};

/// Options for building a [`Lexicon`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconOptions {
    /// ISO 639-2 code of the gloss language to keep.
    ///
    /// Glosses without an `xml:lang` attribute are English (`eng`).
    pub gloss_lang: String,
}

impl Default for LexiconOptions {
    fn default() -> Self {
        Self {
            gloss_lang: DEFAULT_GLOSS_LANG.into(),
        }
    }
}

const DEFAULT_GLOSS_LANG: &str = "eng";

/// Dictionary entries keyed by written form.
///
/// Entries are stored once and shared by all of their written forms. If two
/// source entries share a written form, the one which appears first in the
/// document owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    index: HashMap<String, usize>,
}

impl Lexicon {
    /// Reads and indexes a JMdict document.
    pub fn build(reader: impl BufRead, options: &LexiconOptions) -> Result<Self> {
        let mut parser = Parser::new(reader, options);
        let mut lexicon = Self::default();
        let mut shadowed = 0usize;
        while let Some(entry) = parser.next_entry()? {
            if !lexicon.insert(entry) {
                shadowed += 1;
            }
        }
        if shadowed > 0 {
            debug!("{shadowed} entries had every written form taken by an earlier entry");
        }
        Ok(lexicon)
    }

    /// Indexes a JMdict document held in memory.
    pub fn from_xml(xml: &str, options: &LexiconOptions) -> Result<Self> {
        Self::build(xml.as_bytes(), options)
    }

    /// Reads and indexes a JMdict document from a file.
    pub fn load(path: impl AsRef<Path>, options: &LexiconOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {path:?}"))?;
        Self::build(BufReader::new(file), options)
            .with_context(|| format!("failed to index {path:?}"))
    }

    /// Adds an entry under each of its written forms which is not taken yet.
    ///
    /// Returns `false` if every written form was already taken, in which case
    /// the entry is dropped.
    pub fn insert(&mut self, entry: LexiconEntry) -> bool {
        let position = self.entries.len();
        let mut claimed = false;
        for form in &entry.written_forms {
            if !self.index.contains_key(form) {
                self.index.insert(form.clone(), position);
                claimed = true;
            }
        }
        if claimed {
            self.entries.push(entry);
        }
        claimed
    }

    /// Gets the entry for an exact written form.
    #[must_use]
    pub fn get(&self, written_form: &str) -> Option<&LexiconEntry> {
        self.index
            .get(written_form)
            .and_then(|&position| self.entries.get(position))
    }

    /// Number of written forms that can be looked up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Number of distinct entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing can be looked up.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Elem {
    Other,
    Keb,
    Reb,
    Pos,
    Gloss,
}

#[derive(Debug, Default)]
struct EntryBuilder {
    kanji: IndexSet<String>,
    readings: IndexSet<String>,
    parts_of_speech: IndexSet<String>,
    senses: BTreeMap<u32, String>,
    sense_index: u32,
    glosses: Vec<String>,
}

impl EntryBuilder {
    fn finish_sense(&mut self) {
        if self.glosses.is_empty() {
            return;
        }
        let gloss = self.glosses.join("; ");
        self.glosses.clear();
        self.senses.insert(self.sense_index, gloss);
    }

    fn finish(self) -> LexiconEntry {
        let reading = self
            .readings
            .first()
            .map(|reading| reading.trim().to_owned())
            .unwrap_or_default();
        // kana-only words are looked up by their readings
        let written_forms = if self.kanji.is_empty() {
            self.readings
        } else {
            self.kanji
        };
        LexiconEntry {
            written_forms,
            reading,
            parts_of_speech: self.parts_of_speech,
            senses: self.senses,
        }
    }
}

struct Parser<'o, R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    options: &'o LexiconOptions,
    entities: EntityTable,
    elem: Elem,
    entry: EntryBuilder,
}

impl<'o, R: BufRead> Parser<'o, R> {
    fn new(reader: R, options: &'o LexiconOptions) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
            options,
            entities: EntityTable::default(),
            elem: Elem::Other,
            entry: EntryBuilder::default(),
        }
    }

    fn next_entry(&mut self) -> Result<Option<LexiconEntry>> {
        loop {
            self.buf.clear();
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .with_context(|| {
                    format!(
                        "failed to read XML at position {}",
                        self.reader.buffer_position()
                    )
                })?;

            match event {
                Event::DocType(doctype) => {
                    let doctype = std::str::from_utf8(&doctype)
                        .context("DOCTYPE is not valid UTF-8")?;
                    self.entities = EntityTable::from_doctype(doctype);
                    debug!("Read {} entity declarations", self.entities.len());
                }
                Event::Start(start) => match start.name().as_ref() {
                    b"entry" => self.entry = EntryBuilder::default(),
                    b"keb" => self.elem = Elem::Keb,
                    b"reb" => self.elem = Elem::Reb,
                    b"pos" => self.elem = Elem::Pos,
                    b"sense" => {
                        self.entry.sense_index += 1;
                        self.entry.glosses.clear();
                    }
                    b"gloss" => {
                        let lang = start
                            .try_get_attribute("xml:lang")
                            .context("invalid gloss attribute")?;
                        let lang = lang.as_ref().map_or(DEFAULT_GLOSS_LANG.as_bytes(), |attr| {
                            attr.value.as_ref()
                        });
                        self.elem = if lang == self.options.gloss_lang.as_bytes() {
                            Elem::Gloss
                        } else {
                            Elem::Other
                        };
                    }
                    _ => {}
                },
                Event::Text(text) => {
                    let text = std::str::from_utf8(&text).context("text is not valid UTF-8")?;
                    on_text(&self.entities, self.elem, &mut self.entry, text);
                }
                Event::CData(text) => {
                    let text = std::str::from_utf8(&text).context("CDATA is not valid UTF-8")?;
                    on_text(&self.entities, self.elem, &mut self.entry, text);
                }
                Event::End(end) => match end.name().as_ref() {
                    b"keb" | b"reb" | b"pos" | b"gloss" => self.elem = Elem::Other,
                    b"sense" => self.entry.finish_sense(),
                    b"entry" => {
                        let entry = mem::take(&mut self.entry);
                        return Ok(Some(entry.finish()));
                    }
                    _ => {}
                },
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

fn on_text(entities: &EntityTable, elem: Elem, entry: &mut EntryBuilder, raw: &str) {
    match elem {
        Elem::Keb => {
            entry.kanji.insert(entities.expand(raw).into_owned());
        }
        Elem::Reb => {
            entry.readings.insert(entities.expand(raw).into_owned());
        }
        Elem::Pos => {
            entry.parts_of_speech.insert(entities.resolve(raw).into_owned());
        }
        Elem::Gloss => entry.glosses.push(entities.expand(raw).into_owned()),
        Elem::Other => {}
    }
}
