//! Index of [KANJIDIC2] characters by their keyword number in *Remembering
//! the Kanji* (6th edition).
//!
//! [KANJIDIC2]: https://www.edrdg.org/wiki/index.php/KANJIDIC_Project

use {
    anyhow::{Context, Result},
    foldhash::HashMap,
    quick_xml::{Reader, events::Event},
    std::{
        fs::File,
        io::{BufRead, BufReader},
        path::Path,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KanjiIndex {
    heisig6: HashMap<u32, String>,
}

const HEISIG6: &[u8] = b"heisig6";

impl KanjiIndex {
    pub fn build(reader: impl BufRead) -> Result<Self> {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(true);

        let mut index = Self::default();
        let mut buf = Vec::new();
        let mut literal = None::<String>;
        let mut heisig6 = None::<u32>;
        let mut in_literal = false;
        let mut in_heisig6 = false;
        loop {
            buf.clear();
            match reader
                .read_event_into(&mut buf)
                .with_context(|| format!("failed to read XML at {}", reader.buffer_position()))?
            {
                Event::Start(start) => match start.name().as_ref() {
                    b"character" => {
                        literal = None;
                        heisig6 = None;
                    }
                    b"literal" => in_literal = true,
                    b"dic_ref" => {
                        let dr_type = start
                            .try_get_attribute("dr_type")
                            .context("invalid dic_ref attribute")?;
                        in_heisig6 = dr_type.is_some_and(|attr| attr.value.as_ref() == HEISIG6);
                    }
                    _ => {}
                },
                Event::Text(text) => {
                    let text = std::str::from_utf8(&text).context("text is not valid UTF-8")?;
                    if in_literal {
                        literal = Some(text.to_owned());
                    } else if in_heisig6 {
                        heisig6 = text.trim().parse().ok();
                    }
                }
                Event::End(end) => match end.name().as_ref() {
                    b"literal" => in_literal = false,
                    b"dic_ref" => in_heisig6 = false,
                    b"character" => {
                        if let (Some(literal), Some(number)) = (literal.take(), heisig6.take()) {
                            index.heisig6.entry(number).or_insert(literal);
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(index)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("failed to open {path:?}"))?;
        Self::build(BufReader::new(file)).with_context(|| format!("failed to index {path:?}"))
    }

    #[must_use]
    pub fn get(&self, heisig6: u32) -> Option<&str> {
        self.heisig6.get(&heisig6).map(String::as_str)
    }

    /// Looks up a keyword number written as text, e.g. the contents of a
    /// note field.
    #[must_use]
    pub fn lookup(&self, heisig6: &str) -> Option<&str> {
        self.get(heisig6.trim().parse().ok()?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heisig6.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heisig6.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const KANJIDIC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<kanjidic2>
<header><file_version>4</file_version></header>
<character>
<literal>一</literal>
<dic_number>
<dic_ref dr_type="heisig">1</dic_ref>
<dic_ref dr_type="heisig6">1</dic_ref>
</dic_number>
</character>
<character>
<literal>食</literal>
<dic_number>
<dic_ref dr_type="nelson_c">5154</dic_ref>
<dic_ref dr_type="heisig6">1526</dic_ref>
</dic_number>
</character>
<character>
<literal>亜</literal>
<dic_number>
<dic_ref dr_type="heisig">1809</dic_ref>
</dic_number>
</character>
</kanjidic2>
"#;

    #[test]
    fn heisig6_numbers() {
        let index = KanjiIndex::build(KANJIDIC.as_bytes()).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get(1), Some("一"));
        assert_eq!(index.lookup(" 1526 "), Some("食"));
        // only the 6th edition numbering is indexed
        assert_eq!(index.get(1809), None);
        assert_eq!(index.lookup("5154"), None);
        assert_eq!(index.lookup("one"), None);
        assert_eq!(index.lookup(""), None);
    }

    #[test]
    fn malformed() {
        assert!(KanjiIndex::build("<kanjidic2><character></kanjidic2>".as_bytes()).is_err());
        assert!(KanjiIndex::load("/nonexistent/kanjidic2.xml").is_err());
    }
}
