//! User factory.

use super::{
    apply_version, expect_record, expect_resource, missing_attributes, stub_ids, FactoryResult,
    ResourceFactory,
};
use crate::decode::{AttributeBlock, TransferRecord};
use crate::factory::ArgumentError;
use crate::model::kind::ResourceKind;
use crate::model::resource::{Resource, ResourceCore};
use crate::model::user::{User, UserData};
use parking_lot::RwLock;
use std::sync::Arc;

const GROUP_ROLE: &str = "scanlation_group";

pub struct UserFactory;

impl ResourceFactory for UserFactory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::User
    }

    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource> {
        expect_record(ResourceKind::User, record)?;
        let attributes = match &record.attributes {
            Some(AttributeBlock::User(attributes)) => attributes,
            Some(other) => {
                return Err(ArgumentError::AttributeKindMismatch {
                    expected: ResourceKind::User,
                    found: other.kind(),
                })
            }
            None => return Err(missing_attributes(record)),
        };

        let data = UserData {
            group_ids: stub_ids(record, GROUP_ROLE).collect(),
        };
        let user = User {
            core: ResourceCore::new(record.id, attributes.version),
            username: attributes.username.clone(),
            roles: attributes.roles.clone(),
            data: RwLock::new(data),
        };
        Ok(Arc::new(user).into())
    }

    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()> {
        expect_record(ResourceKind::User, record)?;
        let user = expect_resource::<User>(resource)?;
        user.data
            .write()
            .group_ids
            .extend(stub_ids(record, GROUP_ROLE));
        apply_version(resource, record);
        Ok(())
    }
}
