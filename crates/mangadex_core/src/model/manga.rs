//! Manga domain object.

use super::enums::{ContentRating, MangaRelation, MangaState, MangaStatus, PublicationDemographic};
use super::kind::ResourceKind;
use super::localized::LocalizedString;
use super::resource::{impl_domain_resource, ResourceCore};
use super::Timestamp;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// A manga title with its creators, cover and related titles.
#[derive(Debug)]
pub struct Manga {
    pub(crate) core: ResourceCore,
    pub(crate) title: LocalizedString,
    pub(crate) alt_titles: Vec<LocalizedString>,
    pub(crate) description: LocalizedString,
    pub(crate) links: LocalizedString,
    pub(crate) is_locked: bool,
    pub(crate) original_language: String,
    pub(crate) content_rating: ContentRating,
    pub(crate) state: Option<MangaState>,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
    pub(crate) data: RwLock<MangaData>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MangaData {
    pub(crate) status: Option<MangaStatus>,
    pub(crate) year: Option<i32>,
    pub(crate) last_volume: Option<String>,
    pub(crate) last_chapter: Option<String>,
    pub(crate) publication_demographic: Option<PublicationDemographic>,
    pub(crate) author_ids: BTreeSet<Uuid>,
    pub(crate) artist_ids: BTreeSet<Uuid>,
    pub(crate) tag_ids: BTreeSet<Uuid>,
    pub(crate) user_ids: BTreeSet<Uuid>,
    pub(crate) related_manga: BTreeMap<Uuid, Option<MangaRelation>>,
    pub(crate) main_cover_id: Option<Uuid>,
    pub(crate) creator_id: Option<Uuid>,
}

impl_domain_resource!(Manga, ResourceKind::Manga);

impl Manga {
    pub fn title(&self) -> &LocalizedString {
        &self.title
    }

    pub fn alt_titles(&self) -> &[LocalizedString] {
        &self.alt_titles
    }

    pub fn description(&self) -> &LocalizedString {
        &self.description
    }

    /// External site links keyed by site code (`al`, `mu`, `raw`, ...).
    pub fn links(&self) -> &LocalizedString {
        &self.links
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn original_language(&self) -> &str {
        &self.original_language
    }

    pub fn content_rating(&self) -> ContentRating {
        self.content_rating
    }

    pub fn state(&self) -> Option<MangaState> {
        self.state
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn status(&self) -> Option<MangaStatus> {
        self.data.read().status
    }

    pub fn year(&self) -> Option<i32> {
        self.data.read().year
    }

    pub fn last_volume(&self) -> Option<String> {
        self.data.read().last_volume.clone()
    }

    pub fn last_chapter(&self) -> Option<String> {
        self.data.read().last_chapter.clone()
    }

    pub fn publication_demographic(&self) -> Option<PublicationDemographic> {
        self.data.read().publication_demographic
    }

    pub fn author_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().author_ids.clone()
    }

    pub fn artist_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().artist_ids.clone()
    }

    pub fn tag_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().tag_ids.clone()
    }

    pub fn user_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().user_ids.clone()
    }

    /// Related titles and, when the API sent it, how they relate.
    pub fn related_manga(&self) -> BTreeMap<Uuid, Option<MangaRelation>> {
        self.data.read().related_manga.clone()
    }

    pub fn main_cover_id(&self) -> Option<Uuid> {
        self.data.read().main_cover_id
    }

    pub fn creator_id(&self) -> Option<Uuid> {
        self.data.read().creator_id
    }
}
