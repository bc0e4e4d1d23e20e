//! Multi-language text values.
//!
//! The API encodes these as `{ "en": "...", "ja-ro": "..." }`. An empty value
//! is sometimes sent as `[]` or `null`; both decode to an empty string set.

use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Language key for English content.
pub const ENGLISH: &str = "en";

/// Text translated into several languages, in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedString {
    entries: Vec<(String, String)>,
}

impl LocalizedString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a value from `(language, text)` pairs. Later duplicates win.
    pub fn from_pairs<L, T>(pairs: impl IntoIterator<Item = (L, T)>) -> Self
    where
        L: Into<String>,
        T: Into<String>,
    {
        let mut value = Self::new();
        for (language, text) in pairs {
            value.insert(language, text);
        }
        value
    }

    pub fn insert(&mut self, language: impl Into<String>, text: impl Into<String>) {
        let language = language.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(key, _)| *key == language) {
            Some(entry) => entry.1 = text,
            None => self.entries.push((language, text)),
        }
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == language)
            .map(|(_, text)| text.as_str())
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.get(language).is_some()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text of the first entry, or an empty string.
    pub fn default_text(&self) -> &str {
        self.entries
            .first()
            .map(|(_, text)| text.as_str())
            .unwrap_or("")
    }

    /// Language of the first entry.
    pub fn default_language(&self) -> Option<&str> {
        self.entries.first().map(|(key, _)| key.as_str())
    }

    pub fn english(&self) -> Option<&str> {
        self.get(ENGLISH)
    }

    pub fn english_or_default(&self) -> &str {
        self.english().unwrap_or_else(|| self.default_text())
    }
}

impl Display for LocalizedString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.english_or_default())
    }
}

impl Serialize for LocalizedString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (language, text) in &self.entries {
            map.serialize_entry(language, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LocalizedString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LocalizedStringVisitor)
    }
}

struct LocalizedStringVisitor;

impl<'de> Visitor<'de> for LocalizedStringVisitor {
    type Value = LocalizedString;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a language map, an empty array or null")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut value = LocalizedString::new();
        while let Some((language, text)) = access.next_entry::<String, Option<String>>()? {
            // Null translations carry no text; keep the key set honest.
            if let Some(text) = text {
                value.insert(language, text);
            }
        }
        Ok(value)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        if access.next_element::<serde::de::IgnoredAny>()?.is_some() {
            return Err(serde::de::Error::custom(
                "localized string arrays must be empty",
            ));
        }
        Ok(LocalizedString::new())
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(LocalizedString::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(LocalizedString::new())
    }
}
