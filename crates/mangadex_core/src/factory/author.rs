//! Author factory.
//!
//! `author` and `artist` fragments build the same object; an `artist` tag
//! marks it as an artist for good.

use super::{
    apply_version, expect_record, expect_resource, fill, missing_attributes, stub_ids,
    FactoryResult, ResourceFactory,
};
use crate::decode::{AttributeBlock, AuthorAttributes, TransferRecord};
use crate::factory::ArgumentError;
use crate::model::author::{Author, AuthorData, AuthorLinks};
use crate::model::kind::ResourceKind;
use crate::model::resource::{Resource, ResourceCore};
use parking_lot::RwLock;
use std::sync::Arc;

const ARTIST_TAG: &str = "artist";
const MANGA_ROLE: &str = "manga";

pub struct AuthorFactory;

impl AuthorFactory {
    fn attributes(record: &TransferRecord) -> FactoryResult<Option<&AuthorAttributes>> {
        match &record.attributes {
            None => Ok(None),
            Some(AttributeBlock::Author(attributes)) => Ok(Some(&**attributes)),
            Some(other) => Err(ArgumentError::AttributeKindMismatch {
                expected: ResourceKind::Author,
                found: other.kind(),
            }),
        }
    }

    fn fill_links(links: &mut AuthorLinks, attributes: &AuthorAttributes) {
        fill(&mut links.image_url, attributes.image_url.as_ref());
        fill(&mut links.twitter, attributes.twitter.as_ref());
        fill(&mut links.pixiv, attributes.pixiv.as_ref());
        fill(&mut links.melon_book, attributes.melon_book.as_ref());
        fill(&mut links.fan_box, attributes.fan_box.as_ref());
        fill(&mut links.booth, attributes.booth.as_ref());
        fill(&mut links.nico_video, attributes.nico_video.as_ref());
        fill(&mut links.skeb, attributes.skeb.as_ref());
        fill(&mut links.fantia, attributes.fantia.as_ref());
        fill(&mut links.tumblr, attributes.tumblr.as_ref());
        fill(&mut links.youtube, attributes.youtube.as_ref());
        fill(&mut links.website, attributes.website.as_ref());
    }

    fn absorb(
        data: &mut AuthorData,
        record: &TransferRecord,
        attributes: Option<&AuthorAttributes>,
    ) {
        if let Some(attributes) = attributes {
            Self::fill_links(&mut data.links, attributes);
        }
        if record.is_tagged(ARTIST_TAG) {
            data.is_artist = true;
        }
        data.manga_ids.extend(stub_ids(record, MANGA_ROLE));
    }
}

impl ResourceFactory for AuthorFactory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Author
    }

    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource> {
        expect_record(ResourceKind::Author, record)?;
        let attributes = Self::attributes(record)?.ok_or_else(|| missing_attributes(record))?;

        let mut data = AuthorData::default();
        Self::absorb(&mut data, record, Some(attributes));

        let author = Author {
            core: ResourceCore::new(record.id, attributes.version),
            name: attributes.name.clone(),
            biography: attributes.biography.clone(),
            created_at: attributes.created_at,
            updated_at: attributes.updated_at,
            data: RwLock::new(data),
        };
        Ok(Arc::new(author).into())
    }

    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()> {
        expect_record(ResourceKind::Author, record)?;
        let author = expect_resource::<Author>(resource)?;
        let attributes = Self::attributes(record)?;
        Self::absorb(&mut author.data.write(), record, attributes);
        apply_version(resource, record);
        Ok(())
    }
}
