//! Tag factory. Tags carry no relations and no fillable fields.

use super::{
    apply_version, expect_record, expect_resource, missing_attributes, FactoryResult,
    ResourceFactory,
};
use crate::decode::{AttributeBlock, TransferRecord};
use crate::factory::ArgumentError;
use crate::model::kind::ResourceKind;
use crate::model::resource::{Resource, ResourceCore};
use crate::model::tag::Tag;
use std::sync::Arc;

pub struct TagFactory;

impl ResourceFactory for TagFactory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::Tag
    }

    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource> {
        expect_record(ResourceKind::Tag, record)?;
        let attributes = match &record.attributes {
            Some(AttributeBlock::Tag(attributes)) => attributes,
            Some(other) => {
                return Err(ArgumentError::AttributeKindMismatch {
                    expected: ResourceKind::Tag,
                    found: other.kind(),
                })
            }
            None => return Err(missing_attributes(record)),
        };

        let tag = Tag {
            core: ResourceCore::new(record.id, attributes.version),
            name: attributes.name.clone(),
            description: attributes.description.clone(),
            group: attributes.group,
        };
        Ok(Arc::new(tag).into())
    }

    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()> {
        expect_record(ResourceKind::Tag, record)?;
        expect_resource::<Tag>(resource)?;
        apply_version(resource, record);
        Ok(())
    }
}
