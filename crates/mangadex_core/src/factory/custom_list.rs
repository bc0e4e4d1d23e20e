//! Custom list factory.

use super::{
    apply_version, expect_record, expect_resource, fill, first_stub_id, missing_attributes,
    stub_ids, FactoryResult, ResourceFactory,
};
use crate::decode::{AttributeBlock, TransferRecord};
use crate::factory::ArgumentError;
use crate::model::custom_list::{CustomList, CustomListData};
use crate::model::kind::ResourceKind;
use crate::model::resource::{Resource, ResourceCore};
use parking_lot::RwLock;
use std::sync::Arc;

const MANGA_ROLE: &str = "manga";
const OWNER_ROLE: &str = "user";

pub struct CustomListFactory;

impl CustomListFactory {
    fn absorb(data: &mut CustomListData, record: &TransferRecord) {
        fill(&mut data.owner_id, first_stub_id(record, OWNER_ROLE).as_ref());
        data.manga_ids.extend(stub_ids(record, MANGA_ROLE));
    }
}

impl ResourceFactory for CustomListFactory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::CustomList
    }

    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource> {
        expect_record(ResourceKind::CustomList, record)?;
        let attributes = match &record.attributes {
            Some(AttributeBlock::CustomList(attributes)) => attributes,
            Some(other) => {
                return Err(ArgumentError::AttributeKindMismatch {
                    expected: ResourceKind::CustomList,
                    found: other.kind(),
                })
            }
            None => return Err(missing_attributes(record)),
        };

        let mut data = CustomListData::default();
        Self::absorb(&mut data, record);

        let list = CustomList {
            core: ResourceCore::new(record.id, attributes.version),
            name: attributes.name.clone(),
            visibility: attributes.visibility,
            data: RwLock::new(data),
        };
        Ok(Arc::new(list).into())
    }

    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()> {
        expect_record(ResourceKind::CustomList, record)?;
        let list = expect_resource::<CustomList>(resource)?;
        Self::absorb(&mut list.data.write(), record);
        apply_version(resource, record);
        Ok(())
    }
}
