use std::str::FromStr;

use derive_more::{Debug, Deref, Display, Error};
use serde::{Deserialize, Serialize};

/// Normalized string buffer.
///
/// This type is guaranteed to be a non-empty string with no trailing or leading
/// whitespace. Lookups take their surface text through this type, so that an
/// editor field containing only whitespace never reaches a store.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Deref, Serialize)]
#[debug("{_0:?}")]
pub struct NormString(String);

impl NormString {
    /// Attempts to create a new value from an existing string.
    ///
    /// If the string is empty after trimming, returns [`None`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use kanjibase_api::NormString;
    /// assert_eq!(NormString::new("  食べる ").unwrap().as_str(), "食べる");
    /// assert!(NormString::new(" \t").is_none());
    /// ```
    #[must_use]
    pub fn new(string: impl Into<String>) -> Option<Self> {
        let string: String = string.into();
        let trimmed = string.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed == &*string {
            Some(Self(string))
        } else {
            Some(Self(String::from(trimmed)))
        }
    }

    /// Gets the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Takes the underlying string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<NormString> for String {
    fn from(value: NormString) -> Self {
        value.0
    }
}

impl AsRef<str> for NormString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<NormString> for &str {
    fn eq(&self, other: &NormString) -> bool {
        *self == other.0
    }
}

/// Attempted to turn a string into a [`NormString`], but the string was empty.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Error)]
#[display("string empty")]
pub struct StringEmpty;

impl TryFrom<&str> for NormString {
    type Error = StringEmpty;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(StringEmpty)
    }
}

impl TryFrom<String> for NormString {
    type Error = StringEmpty;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(StringEmpty)
    }
}

impl FromStr for NormString {
    type Err = StringEmpty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl<'de> Deserialize<'de> for NormString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        Self::new(string).ok_or_else(|| serde::de::Error::custom(StringEmpty))
    }
}
