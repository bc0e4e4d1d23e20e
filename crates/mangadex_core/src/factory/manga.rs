//! Manga factory.

use super::{
    apply_version, expect_record, expect_resource, fill, first_stub_id, missing_attributes,
    stub_ids, FactoryResult, ResourceFactory,
};
use crate::decode::{AttributeBlock, MangaAttributes, TransferRecord};
use crate::factory::ArgumentError;
use crate::model::kind::ResourceKind;
use crate::model::manga::{Manga, MangaData};
use crate::model::resource::{Resource, ResourceCore};
use parking_lot::RwLock;
use std::sync::Arc;

const AUTHOR_ROLE: &str = "author";
const ARTIST_ROLE: &str = "artist";
const COVER_ROLE: &str = "cover_art";
const RELATED_MANGA_ROLE: &str = "manga";
const CREATOR_ROLE: &str = "creator";
const USER_ROLE: &str = "user";

pub struct MangaFactory;

impl MangaFactory {
    fn attributes(record: &TransferRecord) -> FactoryResult<Option<&MangaAttributes>> {
        match &record.attributes {
            None => Ok(None),
            Some(AttributeBlock::Manga(attributes)) => Ok(Some(&**attributes)),
            Some(other) => Err(ArgumentError::AttributeKindMismatch {
                expected: ResourceKind::Manga,
                found: other.kind(),
            }),
        }
    }

    fn absorb(
        data: &mut MangaData,
        record: &TransferRecord,
        attributes: Option<&MangaAttributes>,
    ) {
        if let Some(attributes) = attributes {
            fill(&mut data.status, attributes.status.as_ref());
            fill(&mut data.year, attributes.year.as_ref());
            fill(&mut data.last_volume, attributes.last_volume.as_ref());
            fill(&mut data.last_chapter, attributes.last_chapter.as_ref());
            fill(
                &mut data.publication_demographic,
                attributes.publication_demographic.as_ref(),
            );
        }

        data.author_ids.extend(stub_ids(record, AUTHOR_ROLE));
        data.artist_ids.extend(stub_ids(record, ARTIST_ROLE));
        data.user_ids.extend(stub_ids(record, USER_ROLE));
        data.tag_ids.extend(
            record
                .embedded
                .iter()
                .filter(|fragment| fragment.kind == ResourceKind::Tag)
                .map(|fragment| fragment.id),
        );
        fill(&mut data.main_cover_id, first_stub_id(record, COVER_ROLE).as_ref());
        fill(&mut data.creator_id, first_stub_id(record, CREATOR_ROLE).as_ref());

        for stub in record
            .relations
            .iter()
            .filter(|stub| stub.is_tagged(RELATED_MANGA_ROLE))
        {
            // First-seen relation kind wins.
            let slot = data.related_manga.entry(stub.id).or_insert(None);
            if slot.is_none() {
                *slot = stub.related;
            }
        }
    }
}

impl ResourceFactory for MangaFactory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Manga
    }

    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource> {
        expect_record(ResourceKind::Manga, record)?;
        let attributes = Self::attributes(record)?.ok_or_else(|| missing_attributes(record))?;

        let mut data = MangaData::default();
        Self::absorb(&mut data, record, Some(attributes));

        let manga = Manga {
            core: ResourceCore::new(record.id, attributes.version),
            title: attributes.title.clone(),
            alt_titles: attributes.alt_titles.clone(),
            description: attributes.description.clone(),
            links: attributes.links.clone(),
            is_locked: attributes.is_locked,
            original_language: attributes.original_language.clone(),
            content_rating: attributes.content_rating,
            state: attributes.state,
            created_at: attributes.created_at,
            updated_at: attributes.updated_at,
            data: RwLock::new(data),
        };
        Ok(Arc::new(manga).into())
    }

    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()> {
        expect_record(ResourceKind::Manga, record)?;
        let manga = expect_resource::<Manga>(resource)?;
        let attributes = Self::attributes(record)?;
        Self::absorb(&mut manga.data.write(), record, attributes);
        apply_version(resource, record);
        Ok(())
    }
}
