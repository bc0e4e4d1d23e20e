//! Custom (user-curated) manga list.

use super::enums::CustomListVisibility;
use super::kind::ResourceKind;
use super::resource::{impl_domain_resource, ResourceCore};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug)]
pub struct CustomList {
    pub(crate) core: ResourceCore,
    pub(crate) name: String,
    pub(crate) visibility: CustomListVisibility,
    pub(crate) data: RwLock<CustomListData>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CustomListData {
    pub(crate) owner_id: Option<Uuid>,
    pub(crate) manga_ids: BTreeSet<Uuid>,
}

impl_domain_resource!(CustomList, ResourceKind::CustomList);

impl CustomList {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> CustomListVisibility {
        self.visibility
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        self.data.read().owner_id
    }

    pub fn manga_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().manga_ids.clone()
    }
}
