//! Scanlation group factory.

use super::{
    apply_version, expect_record, expect_resource, fill, first_stub_id, missing_attributes,
    stub_ids, FactoryResult, ResourceFactory,
};
use crate::decode::{AttributeBlock, ScanlationGroupAttributes, TransferRecord};
use crate::factory::ArgumentError;
use crate::model::kind::ResourceKind;
use crate::model::resource::{Resource, ResourceCore};
use crate::model::scanlation_group::{ScanlationGroup, ScanlationGroupData};
use parking_lot::RwLock;
use std::sync::Arc;

const LEADER_ROLE: &str = "leader";
const MEMBER_ROLE: &str = "member";

pub struct ScanlationGroupFactory;

impl ScanlationGroupFactory {
    fn attributes(record: &TransferRecord) -> FactoryResult<Option<&ScanlationGroupAttributes>> {
        match &record.attributes {
            None => Ok(None),
            Some(AttributeBlock::ScanlationGroup(attributes)) => Ok(Some(&**attributes)),
            Some(other) => Err(ArgumentError::AttributeKindMismatch {
                expected: ResourceKind::ScanlationGroup,
                found: other.kind(),
            }),
        }
    }

    fn absorb(
        data: &mut ScanlationGroupData,
        record: &TransferRecord,
        attributes: Option<&ScanlationGroupAttributes>,
    ) {
        if let Some(attributes) = attributes {
            fill(&mut data.website, attributes.website.as_ref());
            fill(&mut data.irc_server, attributes.irc_server.as_ref());
            fill(&mut data.irc_channel, attributes.irc_channel.as_ref());
            fill(&mut data.discord_code, attributes.discord.as_ref());
            fill(&mut data.contact_email, attributes.contact_email.as_ref());
            fill(&mut data.description, attributes.description.as_ref());
            fill(&mut data.focused_languages, attributes.focused_languages.as_ref());
        }
        fill(&mut data.leader_id, first_stub_id(record, LEADER_ROLE).as_ref());
        data.member_ids.extend(stub_ids(record, MEMBER_ROLE));
    }
}

impl ResourceFactory for ScanlationGroupFactory {
    fn kind(&self) -> ResourceKind {
        ResourceKind::ScanlationGroup
    }

    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource> {
        expect_record(ResourceKind::ScanlationGroup, record)?;
        let attributes = Self::attributes(record)?.ok_or_else(|| missing_attributes(record))?;

        let mut data = ScanlationGroupData::default();
        Self::absorb(&mut data, record, Some(attributes));

        let group = ScanlationGroup {
            core: ResourceCore::new(record.id, attributes.version),
            name: attributes.name.clone(),
            alt_names: attributes.alt_names.clone(),
            locked: attributes.locked,
            official: attributes.official,
            created_at: attributes.created_at,
            updated_at: attributes.updated_at,
            data: RwLock::new(data),
        };
        Ok(Arc::new(group).into())
    }

    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()> {
        expect_record(ResourceKind::ScanlationGroup, record)?;
        let group = expect_resource::<ScanlationGroup>(resource)?;
        let attributes = Self::attributes(record)?;
        Self::absorb(&mut group.data.write(), record, attributes);
        apply_version(resource, record);
        Ok(())
    }
}
