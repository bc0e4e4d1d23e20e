//! Chapter factory.

use super::{
    apply_version, expect_record, expect_resource, fill, first_stub_id, missing_attributes,
    stub_ids, FactoryResult, ResourceFactory,
};
use crate::decode::{AttributeBlock, ChapterAttributes, TransferRecord};
use crate::factory::ArgumentError;
use crate::model::chapter::{Chapter, ChapterData};
use crate::model::kind::ResourceKind;
use crate::model::resource::{Resource, ResourceCore};
use parking_lot::RwLock;
use std::sync::Arc;

const MANGA_ROLE: &str = "manga";
const GROUP_ROLE: &str = "scanlation_group";
const UPLOADER_ROLE: &str = "user";

pub struct ChapterFactory;

impl ChapterFactory {
    fn attributes(record: &TransferRecord) -> FactoryResult<Option<&ChapterAttributes>> {
        match &record.attributes {
            None => Ok(None),
            Some(AttributeBlock::Chapter(attributes)) => Ok(Some(&**attributes)),
            Some(other) => Err(ArgumentError::AttributeKindMismatch {
                expected: ResourceKind::Chapter,
                found: other.kind(),
            }),
        }
    }

    fn absorb(
        data: &mut ChapterData,
        record: &TransferRecord,
        attributes: Option<&ChapterAttributes>,
    ) {
        if let Some(attributes) = attributes {
            fill(&mut data.volume, attributes.volume.as_ref());
            fill(&mut data.chapter, attributes.chapter.as_ref());
            fill(&mut data.external_url, attributes.external_url.as_ref());
        }
        fill(&mut data.manga_id, first_stub_id(record, MANGA_ROLE).as_ref());
        fill(&mut data.uploader_id, first_stub_id(record, UPLOADER_ROLE).as_ref());
        data.group_ids.extend(stub_ids(record, GROUP_ROLE));
    }
}

impl ResourceFactory for ChapterFactory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Chapter
    }

    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource> {
        expect_record(ResourceKind::Chapter, record)?;
        let attributes = Self::attributes(record)?.ok_or_else(|| missing_attributes(record))?;

        let mut data = ChapterData::default();
        Self::absorb(&mut data, record, Some(attributes));

        let chapter = Chapter {
            core: ResourceCore::new(record.id, attributes.version),
            title: attributes.title.clone(),
            translated_language: attributes.translated_language.clone(),
            pages: attributes.pages,
            publish_at: attributes.publish_at,
            created_at: attributes.created_at,
            updated_at: attributes.updated_at,
            data: RwLock::new(data),
        };
        Ok(Arc::new(chapter).into())
    }

    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()> {
        expect_record(ResourceKind::Chapter, record)?;
        let chapter = expect_resource::<Chapter>(resource)?;
        let attributes = Self::attributes(record)?;
        Self::absorb(&mut chapter.data.write(), record, attributes);
        apply_version(resource, record);
        Ok(())
    }
}
