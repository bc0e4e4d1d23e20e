//! Tag domain object.

use super::enums::TagGroup;
use super::kind::ResourceKind;
use super::localized::LocalizedString;
use super::resource::{impl_domain_resource, ResourceCore};

#[derive(Debug)]
pub struct Tag {
    pub(crate) core: ResourceCore,
    pub(crate) name: LocalizedString,
    pub(crate) description: LocalizedString,
    pub(crate) group: TagGroup,
}

impl_domain_resource!(Tag, ResourceKind::Tag);

impl Tag {
    pub fn name(&self) -> &LocalizedString {
        &self.name
    }

    pub fn description(&self) -> &LocalizedString {
        &self.description
    }

    pub fn group(&self) -> TagGroup {
        self.group
    }
}
