//! Scanlation group domain object.

use super::kind::ResourceKind;
use super::localized::LocalizedString;
use super::resource::{impl_domain_resource, ResourceCore};
use super::Timestamp;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use uuid::Uuid;

const DISCORD_INVITE_BASE: &str = "https://discord.gg";

#[derive(Debug)]
pub struct ScanlationGroup {
    pub(crate) core: ResourceCore,
    pub(crate) name: String,
    pub(crate) alt_names: Vec<LocalizedString>,
    pub(crate) locked: bool,
    pub(crate) official: bool,
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
    pub(crate) data: RwLock<ScanlationGroupData>,
}

/// Contact details and membership, filled as fragments reveal them.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScanlationGroupData {
    pub(crate) website: Option<String>,
    pub(crate) irc_server: Option<String>,
    pub(crate) irc_channel: Option<String>,
    pub(crate) discord_code: Option<String>,
    pub(crate) contact_email: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) focused_languages: Option<Vec<String>>,
    pub(crate) leader_id: Option<Uuid>,
    pub(crate) member_ids: BTreeSet<Uuid>,
}

impl_domain_resource!(ScanlationGroup, ResourceKind::ScanlationGroup);

impl ScanlationGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alt_names(&self) -> &[LocalizedString] {
        &self.alt_names
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn official(&self) -> bool {
        self.official
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn website(&self) -> Option<String> {
        self.data.read().website.clone()
    }

    pub fn irc_server(&self) -> Option<String> {
        self.data.read().irc_server.clone()
    }

    pub fn irc_channel(&self) -> Option<String> {
        self.data.read().irc_channel.clone()
    }

    pub fn contact_email(&self) -> Option<String> {
        self.data.read().contact_email.clone()
    }

    pub fn description(&self) -> Option<String> {
        self.data.read().description.clone()
    }

    pub fn focused_languages(&self) -> Option<Vec<String>> {
        self.data.read().focused_languages.clone()
    }

    /// Invite URL built from the stored discord code.
    pub fn discord_url(&self) -> Option<String> {
        self.data
            .read()
            .discord_code
            .as_ref()
            .map(|code| format!("{DISCORD_INVITE_BASE}/{code}"))
    }

    pub fn leader_id(&self) -> Option<Uuid> {
        self.data.read().leader_id
    }

    pub fn member_ids(&self) -> BTreeSet<Uuid> {
        self.data.read().member_ids.clone()
    }
}
