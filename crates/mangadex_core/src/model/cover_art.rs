//! Cover art domain object.

use super::kind::ResourceKind;
use super::resource::{impl_domain_resource, ResourceCore};
use super::Timestamp;
use parking_lot::RwLock;
use uuid::Uuid;

/// Base URL of uploaded cover files.
pub const COVER_BASE_URL: &str = "https://uploads.mangadex.org/covers";

#[derive(Debug)]
pub struct CoverArt {
    pub(crate) core: ResourceCore,
    pub(crate) file_name: String,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
    pub(crate) data: RwLock<CoverArtData>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CoverArtData {
    pub(crate) description: Option<String>,
    pub(crate) volume: Option<String>,
    pub(crate) locale: Option<String>,
    pub(crate) manga_id: Option<Uuid>,
    pub(crate) uploader_id: Option<Uuid>,
}

impl_domain_resource!(CoverArt, ResourceKind::CoverArt);

impl CoverArt {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn description(&self) -> Option<String> {
        self.data.read().description.clone()
    }

    pub fn volume(&self) -> Option<String> {
        self.data.read().volume.clone()
    }

    pub fn locale(&self) -> Option<String> {
        self.data.read().locale.clone()
    }

    pub fn manga_id(&self) -> Option<Uuid> {
        self.data.read().manga_id
    }

    pub fn uploader_id(&self) -> Option<Uuid> {
        self.data.read().uploader_id
    }

    /// Full-size image URL. Requires the owning manga to be known.
    pub fn source_url(&self) -> Option<String> {
        self.url_with_suffix("")
    }

    pub fn thumbnail_256(&self) -> Option<String> {
        self.url_with_suffix(".256.jpg")
    }

    pub fn thumbnail_512(&self) -> Option<String> {
        self.url_with_suffix(".512.jpg")
    }

    fn url_with_suffix(&self, suffix: &str) -> Option<String> {
        let manga_id = self.manga_id()?;
        Some(format!(
            "{COVER_BASE_URL}/{manga_id}/{}{suffix}",
            self.file_name
        ))
    }
}
