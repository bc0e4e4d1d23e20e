//! Author/artist domain object.

use super::kind::ResourceKind;
use super::localized::LocalizedString;
use super::resource::{impl_domain_resource, ResourceCore};
use super::Timestamp;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use uuid::Uuid;

/// A person credited as author and/or artist.
///
/// The API serves the same person under the `author` and `artist` tags; both
/// resolve to one object.
#[derive(Debug)]
pub struct Author {
    pub(crate) core: ResourceCore,
    pub(crate) name: String,
    pub(crate) biography: LocalizedString,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
    pub(crate) data: RwLock<AuthorData>,
}

/// Social and shop links of an author. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorLinks {
    pub image_url: Option<String>,
    pub twitter: Option<String>,
    pub pixiv: Option<String>,
    pub melon_book: Option<String>,
    pub fan_box: Option<String>,
    pub booth: Option<String>,
    pub nico_video: Option<String>,
    pub skeb: Option<String>,
    pub fantia: Option<String>,
    pub tumblr: Option<String>,
    pub youtube: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct AuthorData {
    pub(crate) links: AuthorLinks,
    pub(crate) is_artist: bool,
    pub(crate) manga_ids: BTreeSet<Uuid>,
}

impl_domain_resource!(Author, ResourceKind::Author);

impl Author {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn biography(&self) -> &LocalizedString {
        &self.biography
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn links(&self) -> AuthorLinks {
        self.data.read().links.clone()
    }

    /// Seen at least once under the `artist` tag.
    pub fn is_artist(&self) -> bool {
        self.data.read().is_artist
    }

    pub fn manga_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().manga_ids.clone()
    }
}
