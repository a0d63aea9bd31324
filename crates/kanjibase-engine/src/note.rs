//! Filling flashcard note fields from lookup results.

use {
    crate::{IndexMap, LexiconService},
    kanjibase_api::{AnnotationBundle, FieldMapping, LookupConfig, NormString},
    tracing::debug,
};

/// Named text fields of a flashcard note in the host editor.
pub trait NoteFields {
    /// Gets the contents of a field, or [`None`] if the note has no field
    /// with this name.
    fn field(&self, name: &str) -> Option<&str>;

    /// Replaces the contents of an existing field.
    ///
    /// Returns `false` if the note has no field with this name.
    fn set_field(&mut self, name: &str, value: &str) -> bool;
}

impl NoteFields for IndexMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn set_field(&mut self, name: &str, value: &str) -> bool {
        let Some(field) = self.get_mut(name) else {
            return false;
        };
        value.clone_into(field);
        true
    }
}

/// Writes `value` into the field `name` if the note has that field and it is
/// empty.
///
/// Returns `true` if the field was written.
pub fn insert_if_empty(note: &mut impl NoteFields, name: &str, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    match note.field(name) {
        Some(current) if current.trim().is_empty() => note.set_field(name, value),
        _ => false,
    }
}

/// Writes each annotation in `bundle` to its destination field in `fields`.
///
/// Fields which already have content are left untouched. Returns `true` if
/// any field was written.
pub fn fill_note(
    note: &mut impl NoteFields,
    bundle: &AnnotationBundle,
    fields: &FieldMapping,
) -> bool {
    let mut changed = false;
    for (name, value) in bundle.routed(fields) {
        changed |= insert_if_empty(note, name, value);
    }
    changed
}

/// Empties the source field and every annotation destination field.
///
/// Returns `true` if any field had content.
pub fn clear_note(note: &mut impl NoteFields, fields: &FieldMapping) -> bool {
    let mut changed = false;
    for name in fields.source().into_iter().chain(fields.destinations()) {
        if note.field(name).is_some_and(|current| !current.is_empty()) {
            changed |= note.set_field(name, "");
        }
    }
    changed
}

/// Remembers the last input that was looked up, so that an unchanged field
/// isn't looked up again.
#[derive(Debug, Clone, Default)]
pub struct InputGuard {
    last: Option<NormString>,
}

impl InputGuard {
    /// Checks if `input` should be looked up, and remembers it if so.
    ///
    /// Returns `false` if `input` is blank, or the same as the last input
    /// this returned `true` for.
    pub fn check(&mut self, input: &str) -> bool {
        let Some(input) = NormString::new(input) else {
            return false;
        };
        if self.last.as_ref() == Some(&input) {
            return false;
        }
        self.last = Some(input);
        true
    }

    /// Forgets the last input.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl LexiconService {
    /// Annotates a note after its field `changed_field` was edited.
    ///
    /// If `changed_field` is the configured source field, its text is looked
    /// up and the results fill the destination fields. If it is the Heisig
    /// source field, the matching kanji fills the Heisig destination field.
    /// Returns `true` if any field was written.
    pub fn annotate_note(
        &self,
        note: &mut impl NoteFields,
        changed_field: &str,
        fields: &FieldMapping,
        config: &LookupConfig,
    ) -> bool {
        let mut changed = false;
        if fields.source() == Some(changed_field) {
            if let Some(text) = note.field(changed_field).map(str::to_owned) {
                let bundle = self.lookup(&text, config);
                changed |= fill_note(note, &bundle, fields);
            }
        }

        if fields.heisig_source() == Some(changed_field) {
            let number = note.field(changed_field).map(str::to_owned);
            if let (Some(number), Some(destination)) = (number, fields.heisig_destination()) {
                match self.lookup_heisig(&number) {
                    Some(kanji) => changed |= insert_if_empty(note, destination, kanji),
                    None => debug!("No kanji with Heisig number {number:?}"),
                }
            }
        }
        changed
    }
}
