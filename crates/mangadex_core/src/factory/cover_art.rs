//! Cover art factory.

use super::{
    apply_version, expect_record, expect_resource, fill, first_stub_id, missing_attributes,
    FactoryResult, ResourceFactory,
};
use crate::decode::{AttributeBlock, CoverArtAttributes, TransferRecord};
use crate::factory::ArgumentError;
use crate::model::cover_art::{CoverArt, CoverArtData};
use crate::model::kind::ResourceKind;
use crate::model::resource::{Resource, ResourceCore};
use parking_lot::RwLock;
use std::sync::Arc;

const MANGA_ROLE: &str = "manga";
const UPLOADER_ROLE: &str = "user";

pub struct CoverArtFactory;

impl CoverArtFactory {
    fn attributes(record: &TransferRecord) -> FactoryResult<Option<&CoverArtAttributes>> {
        match &record.attributes {
            None => Ok(None),
            Some(AttributeBlock::CoverArt(attributes)) => Ok(Some(attributes)),
            Some(other) => Err(ArgumentError::AttributeKindMismatch {
                expected: ResourceKind::CoverArt,
                found: other.kind(),
            }),
        }
    }

    fn absorb(
        data: &mut CoverArtData,
        record: &TransferRecord,
        attributes: Option<&CoverArtAttributes>,
    ) {
        if let Some(attributes) = attributes {
            fill(&mut data.description, attributes.description.as_ref());
            fill(&mut data.volume, attributes.volume.as_ref());
            fill(&mut data.locale, attributes.locale.as_ref());
        }
        fill(&mut data.manga_id, first_stub_id(record, MANGA_ROLE).as_ref());
        fill(&mut data.uploader_id, first_stub_id(record, UPLOADER_ROLE).as_ref());
    }
}

impl ResourceFactory for CoverArtFactory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::CoverArt
    }

    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource> {
        expect_record(ResourceKind::CoverArt, record)?;
        let attributes = Self::attributes(record)?.ok_or_else(|| missing_attributes(record))?;

        let mut data = CoverArtData::default();
        Self::absorb(&mut data, record, Some(attributes));

        let cover = CoverArt {
            core: ResourceCore::new(record.id, attributes.version),
            file_name: attributes.file_name.clone(),
            created_at: attributes.created_at,
            updated_at: attributes.updated_at,
            data: RwLock::new(data),
        };
        Ok(Arc::new(cover).into())
    }

    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()> {
        expect_record(ResourceKind::CoverArt, record)?;
        let cover = expect_resource::<CoverArt>(resource)?;
        let attributes = Self::attributes(record)?;
        Self::absorb(&mut cover.data.write(), record, attributes);
        apply_version(resource, record);
        Ok(())
    }
}
