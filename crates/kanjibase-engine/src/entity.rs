//! Expansion of XML entity references using a document's internal DTD.
//!
//! JMdict and kanjidic abbreviate tags through entities declared in their
//! `DOCTYPE`, e.g. `<!ENTITY v5r "Godan verb with 'ru' ending">` lets a
//! `<pos>` element contain just `&v5r;`. The XML reader hands us those
//! references unexpanded, so we keep our own table of declarations.

use {
    foldhash::HashMap,
    regex::Regex,
    std::{borrow::Cow, sync::LazyLock},
};

/// Entity declarations of a single document.
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    entities: HashMap<String, String>,
}

static ENTITY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!ENTITY\s+([^\s%"']+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#)
        .expect("should be valid regex")
});

impl EntityTable {
    /// Collects the general entity declarations in the contents of a
    /// `DOCTYPE` declaration.
    ///
    /// Parameter entities and external entities are ignored. If a name is
    /// declared twice, the first declaration wins, as in XML.
    #[must_use]
    pub fn from_doctype(doctype: &str) -> Self {
        let mut table = Self::default();
        for captures in ENTITY_DECL.captures_iter(doctype) {
            let (Some(name), Some(value)) = (
                captures.get(1),
                captures.get(2).or_else(|| captures.get(3)),
            ) else {
                continue;
            };
            table
                .entities
                .entry(name.as_str().to_owned())
                .or_insert_with(|| value.as_str().to_owned());
        }
        table
    }

    /// Declares an entity, replacing any previous declaration.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entities.insert(name.into(), value.into());
    }

    /// Gets the value of a declared entity.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entities.get(name).map(String::as_str)
    }

    /// Number of declared entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entities are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Resolves a tag token, which may be a single entity reference like
    /// `&v5r;`, to its full value.
    ///
    /// Never fails: if the reference can't be resolved, the token is returned
    /// unchanged.
    #[must_use]
    pub fn resolve<'a>(&self, token: &'a str) -> Cow<'a, str> {
        self.expand(token.trim())
    }

    /// Expands every entity and character reference in raw XML text.
    ///
    /// Handles declared entities, the predefined XML entities, and numeric
    /// character references. Anything else is kept verbatim.
    #[must_use]
    pub fn expand<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains('&') {
            return Cow::Borrowed(text);
        }

        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find('&') {
            result.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let Some(end) = after.find(';') else {
                result.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let name = &after[..end];
            match self.resolve_name(name) {
                Some(value) => result.push_str(&value),
                None => {
                    result.push('&');
                    result.push_str(name);
                    result.push(';');
                }
            }
            rest = &after[end + 1..];
        }
        result.push_str(rest);
        Cow::Owned(result)
    }

    fn resolve_name(&self, name: &str) -> Option<Cow<'_, str>> {
        if let Some(value) = self.get(name) {
            return Some(Cow::Borrowed(value));
        }
        if let Some(code) = name.strip_prefix('#') {
            let code = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => code.parse::<u32>(),
            }
            .ok()?;
            return char::from_u32(code).map(|c| Cow::Owned(c.to_string()));
        }
        let predefined = match name {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "apos" => "'",
            _ => return None,
        };
        Some(Cow::Borrowed(predefined))
    }
}
