//! User domain object.

use super::kind::ResourceKind;
use super::resource::{impl_domain_resource, ResourceCore};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use uuid::Uuid;

#[derive(Debug)]
pub struct User {
    pub(crate) core: ResourceCore,
    pub(crate) username: String,
    pub(crate) roles: Vec<String>,
    pub(crate) data: RwLock<UserData>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UserData {
    pub(crate) group_ids: BTreeSet<Uuid>,
}

impl_domain_resource!(User, ResourceKind::User);

impl User {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn group_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().group_ids.clone()
    }

    pub fn is_member_of_any_group(&self) -> bool {
        !self.data.read().group_ids.is_empty()
    }
}
