//! Chapter domain object.

use super::kind::ResourceKind;
use super::resource::{impl_domain_resource, ResourceCore};
use super::Timestamp;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use uuid::Uuid;

/// One translated chapter of a manga.
#[derive(Debug)]
pub struct Chapter {
    pub(crate) core: ResourceCore,
    pub(crate) title: Option<String>,
    pub(crate) translated_language: String,
    pub(crate) pages: u32,
    pub(crate) publish_at: Timestamp,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
    pub(crate) data: RwLock<ChapterData>,
}

/// Fields that later fragments may fill in.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChapterData {
    pub(crate) volume: Option<String>,
    pub(crate) chapter: Option<String>,
    pub(crate) external_url: Option<String>,
    pub(crate) manga_id: Option<Uuid>,
    pub(crate) group_ids: BTreeSet<Uuid>,
    pub(crate) uploader_id: Option<Uuid>,
}

impl_domain_resource!(Chapter, ResourceKind::Chapter);

impl Chapter {
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn translated_language(&self) -> &str {
        &self.translated_language
    }

    /// Count of readable images.
    pub fn pages(&self) -> u32 {
        self.pages
    }

    pub fn publish_at(&self) -> Timestamp {
        self.publish_at
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn volume(&self) -> Option<String> {
        self.data.read().volume.clone()
    }

    /// Chapter number as published, e.g. `"10.5"`.
    pub fn chapter_number(&self) -> Option<String> {
        self.data.read().chapter.clone()
    }

    pub fn external_url(&self) -> Option<String> {
        self.data.read().external_url.clone()
    }

    /// Chapter is hosted elsewhere and has no readable pages here.
    pub fn is_external(&self) -> bool {
        self.data.read().external_url.is_some()
    }

    pub fn manga_id(&self) -> Option<Uuid> {
        self.data.read().manga_id
    }

    pub fn group_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().group_ids.clone()
    }

    pub fn uploader_id(&self) -> Option<Uuid> {
        self.data.read().uploader_id
    }
}
