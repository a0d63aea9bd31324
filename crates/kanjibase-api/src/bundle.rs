use serde::{Deserialize, Serialize};

/// Every annotation produced by a single lookup.
///
/// Each field is populated independently; a field is [`None`] when its
/// source had no match for the looked up text, or when that source is not
/// loaded at all. A present field is never an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationBundle {
    /// Inline ruby markup, e.g. `食[た]べる`.
    pub furigana: Option<String>,
    /// Kana reading of the dictionary entry.
    pub reading: Option<String>,
    /// Short part-of-speech labels, joined with `、`.
    pub parts_of_speech: Option<String>,
    /// Formatted sense list.
    pub senses: Option<String>,
    /// Example sentences joined with `<br>`.
    pub sentences: Option<String>,
}

/// Kind of value stored in an [`AnnotationBundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "self-explanatory")]
pub enum Annotation {
    Furigana,
    Reading,
    PartsOfSpeech,
    Senses,
    Sentences,
}

impl Annotation {
    /// All variants of this enum.
    pub const ALL: &[Self] = &[
        Self::Furigana,
        Self::Reading,
        Self::PartsOfSpeech,
        Self::Senses,
        Self::Sentences,
    ];
}

impl AnnotationBundle {
    /// Gets the value of a single annotation, if present.
    #[must_use]
    pub fn get(&self, annotation: Annotation) -> Option<&str> {
        match annotation {
            Annotation::Furigana => self.furigana.as_deref(),
            Annotation::Reading => self.reading.as_deref(),
            Annotation::PartsOfSpeech => self.parts_of_speech.as_deref(),
            Annotation::Senses => self.senses.as_deref(),
            Annotation::Sentences => self.sentences.as_deref(),
        }
    }

    /// Iterates over all present annotations.
    pub fn iter(&self) -> impl Iterator<Item = (Annotation, &str)> {
        Annotation::ALL
            .iter()
            .filter_map(|&annotation| Some((annotation, self.get(annotation)?)))
    }

    /// Returns `true` if no annotation is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Pairs each present annotation with its destination field name in
    /// `fields`, skipping annotations which have no destination.
    pub fn routed<'a>(
        &'a self,
        fields: &'a FieldMapping,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.iter().filter_map(|(annotation, value)| {
            Some((fields.destination(annotation)?, value))
        })
    }
}

/// Names of the note fields which annotations are read from and written to.
///
/// Field names are opaque to the engine. Keys use the same names as the
/// editor add-on's configuration file, and a name which is empty or
/// `not_set` is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    /// Field containing the text to look up.
    #[serde(rename = "kanji_field")]
    pub source: Option<String>,
    /// Destination for [`AnnotationBundle::furigana`].
    #[serde(rename = "furigana_field")]
    pub furigana: Option<String>,
    /// Destination for [`AnnotationBundle::reading`].
    #[serde(rename = "kana_field")]
    pub reading: Option<String>,
    /// Destination for [`AnnotationBundle::parts_of_speech`].
    #[serde(rename = "type_field")]
    pub parts_of_speech: Option<String>,
    /// Destination for [`AnnotationBundle::senses`].
    #[serde(rename = "definition_field")]
    pub senses: Option<String>,
    /// Destination for [`AnnotationBundle::sentences`].
    #[serde(rename = "sentence_field")]
    pub sentences: Option<String>,
    /// Field containing a Heisig (6th edition) keyword number.
    #[serde(rename = "rtk_src")]
    pub heisig_source: Option<String>,
    /// Destination for the kanji matching [`FieldMapping::heisig_source`].
    #[serde(rename = "rtk_dest")]
    pub heisig_destination: Option<String>,
}

const UNSET: &str = "not_set";

fn field_name(name: Option<&String>) -> Option<&str> {
    name.map(|name| name.trim())
        .filter(|name| !name.is_empty() && *name != UNSET)
}

impl FieldMapping {
    /// Gets the name of the field that text is looked up from.
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        field_name(self.source.as_ref())
    }

    /// Gets the destination field name of an annotation.
    #[must_use]
    pub fn destination(&self, annotation: Annotation) -> Option<&str> {
        field_name(match annotation {
            Annotation::Furigana => self.furigana.as_ref(),
            Annotation::Reading => self.reading.as_ref(),
            Annotation::PartsOfSpeech => self.parts_of_speech.as_ref(),
            Annotation::Senses => self.senses.as_ref(),
            Annotation::Sentences => self.sentences.as_ref(),
        })
    }

    /// Gets the name of the field that Heisig numbers are read from.
    #[must_use]
    pub fn heisig_source(&self) -> Option<&str> {
        field_name(self.heisig_source.as_ref())
    }

    /// Gets the name of the field that Heisig kanji are written to.
    #[must_use]
    pub fn heisig_destination(&self) -> Option<&str> {
        field_name(self.heisig_destination.as_ref())
    }

    /// Iterates over every configured destination field name.
    pub fn destinations(&self) -> impl Iterator<Item = &str> {
        Annotation::ALL
            .iter()
            .filter_map(|&annotation| self.destination(annotation))
    }
}
