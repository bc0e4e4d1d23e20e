//! Resource kinds and identity keys.
//!
//! # Invariants
//! - The kind set is closed; every kind has a relation table and a factory.
//! - A `ResourceKey` is the only identity of a domain object.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Closed set of resource types the pool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Manga,
    Chapter,
    Author,
    Tag,
    User,
    CoverArt,
    ScanlationGroup,
    CustomList,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Manga,
        ResourceKind::Chapter,
        ResourceKind::Author,
        ResourceKind::Tag,
        ResourceKind::User,
        ResourceKind::CoverArt,
        ResourceKind::ScanlationGroup,
        ResourceKind::CustomList,
    ];

    /// Canonical wire `type` tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manga => "manga",
            Self::Chapter => "chapter",
            Self::Author => "author",
            Self::Tag => "tag",
            Self::User => "user",
            Self::CoverArt => "cover_art",
            Self::ScanlationGroup => "scanlation_group",
            Self::CustomList => "custom_list",
        }
    }

    /// Tags a primary fragment of this kind may carry.
    ///
    /// Authors are served under both `author` and `artist`.
    pub fn accepted_tags(self) -> &'static [&'static str] {
        match self {
            Self::Manga => &["manga"],
            Self::Chapter => &["chapter"],
            Self::Author => &["author", "artist"],
            Self::Tag => &["tag"],
            Self::User => &["user"],
            Self::CoverArt => &["cover_art"],
            Self::ScanlationGroup => &["scanlation_group"],
            Self::CustomList => &["custom_list"],
        }
    }

    pub fn accepts_tag(self, tag: &str) -> bool {
        self.accepted_tags()
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(tag.trim()))
    }

    /// Parses a canonical tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(normalized))
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one canonical domain object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub id: Uuid,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl Display for ResourceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{ResourceKey, ResourceKind};
    use uuid::Uuid;

    #[test]
    fn tags_roundtrip_for_every_kind() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_tag(kind.as_str()), Some(kind));
            assert!(kind.accepts_tag(kind.as_str()));
        }
    }

    #[test]
    fn author_accepts_artist_tag_but_artist_is_not_a_kind() {
        assert!(ResourceKind::Author.accepts_tag("ARTIST"));
        assert_eq!(ResourceKind::from_tag("artist"), None);
    }

    #[test]
    fn key_display_names_kind_and_id() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").expect("valid uuid");
        let key = ResourceKey::new(ResourceKind::CoverArt, id);
        assert_eq!(
            key.to_string(),
            "cover_art(11111111-2222-4333-8444-555555555555)"
        );
    }
}
