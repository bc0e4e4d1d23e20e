//! Type factory registry.
//!
//! # Responsibility
//! - Build a domain object from a record that carries attributes.
//! - Fold later records into an existing object.
//!
//! # Invariants
//! - `merge` only fills unset optionals and unions relation-id sets.
//! - The version counter is the only field overwritten on merge.
//! - A factory never touches the pool; it cannot re-enter it.
//!
//! # See also
//! - `crate::pool` for when create and merge run.

pub mod author;
pub mod chapter;
pub mod cover_art;
pub mod custom_list;
pub mod manga;
pub mod scanlation_group;
pub mod tag;
pub mod user;

use crate::decode::TransferRecord;
use crate::model::kind::{ResourceKey, ResourceKind};
use crate::model::resource::{DomainResource, Resource};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

pub use author::AuthorFactory;
pub use chapter::ChapterFactory;
pub use cover_art::CoverArtFactory;
pub use custom_list::CustomListFactory;
pub use manga::MangaFactory;
pub use scanlation_group::ScanlationGroupFactory;
pub use tag::TagFactory;
pub use user::UserFactory;

/// Factory was handed a record or object of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    RecordKindMismatch {
        expected: ResourceKind,
        found: ResourceKind,
    },
    ResourceKindMismatch {
        expected: ResourceKind,
        found: ResourceKind,
    },
    AttributeKindMismatch {
        expected: ResourceKind,
        found: ResourceKind,
    },
    MissingAttributes(ResourceKey),
}

impl Display for ArgumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordKindMismatch { expected, found } => {
                write!(f, "invalid record kind {found}; {expected} expected")
            }
            Self::ResourceKindMismatch { expected, found } => {
                write!(f, "invalid resource kind {found}; {expected} expected")
            }
            Self::AttributeKindMismatch { expected, found } => {
                write!(f, "invalid attribute block {found}; {expected} expected")
            }
            Self::MissingAttributes(key) => {
                write!(f, "cannot create {key} from a record without attributes")
            }
        }
    }
}

impl Error for ArgumentError {}

pub type FactoryResult<T> = Result<T, ArgumentError>;

/// Create/merge operations of one resource kind.
pub trait ResourceFactory: Send + Sync {
    fn kind(&self) -> ResourceKind;

    /// Builds a new object. The record must carry attributes.
    fn create(&self, record: &TransferRecord) -> FactoryResult<Resource>;

    /// Folds `record` into `resource` in place.
    fn merge(&self, resource: &Resource, record: &TransferRecord) -> FactoryResult<()>;
}

/// Compile-time map from kind to factory.
pub struct FactoryRegistry;

impl FactoryRegistry {
    pub fn get(kind: ResourceKind) -> &'static dyn ResourceFactory {
        match kind {
            ResourceKind::Manga => &MangaFactory,
            ResourceKind::Chapter => &ChapterFactory,
            ResourceKind::Author => &AuthorFactory,
            ResourceKind::Tag => &TagFactory,
            ResourceKind::User => &UserFactory,
            ResourceKind::CoverArt => &CoverArtFactory,
            ResourceKind::ScanlationGroup => &ScanlationGroupFactory,
            ResourceKind::CustomList => &CustomListFactory,
        }
    }
}

pub(crate) fn expect_record(expected: ResourceKind, record: &TransferRecord) -> FactoryResult<()> {
    if record.kind != expected {
        return Err(ArgumentError::RecordKindMismatch {
            expected,
            found: record.kind,
        });
    }
    Ok(())
}

pub(crate) fn expect_resource<T: DomainResource>(resource: &Resource) -> FactoryResult<Arc<T>> {
    T::from_resource(resource).ok_or(ArgumentError::ResourceKindMismatch {
        expected: T::KIND,
        found: resource.kind(),
    })
}

pub(crate) fn missing_attributes(record: &TransferRecord) -> ArgumentError {
    ArgumentError::MissingAttributes(record.key())
}

/// Overwrite-on-merge: the latest record with attributes wins.
pub(crate) fn apply_version(resource: &Resource, record: &TransferRecord) {
    if let Some(version) = record.version() {
        resource.core().set_version(version);
    }
}

/// Ids of relation stubs tagged `role`, in wire order.
pub(crate) fn stub_ids<'a>(
    record: &'a TransferRecord,
    role: &'a str,
) -> impl Iterator<Item = Uuid> + 'a {
    record
        .relations
        .iter()
        .filter(move |stub| stub.is_tagged(role))
        .map(|stub| stub.id)
}

pub(crate) fn first_stub_id(record: &TransferRecord, role: &str) -> Option<Uuid> {
    stub_ids(record, role).next()
}

/// Sets `slot` only while it is unset.
pub(crate) fn fill<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
    if slot.is_none() {
        *slot = value.cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::{fill, first_stub_id, stub_ids, FactoryRegistry};
    use crate::decode::TransferRecord;
    use crate::model::kind::ResourceKind;
    use uuid::Uuid;

    fn stub(kind: ResourceKind, tag: &str) -> TransferRecord {
        TransferRecord {
            kind,
            type_tag: tag.to_string(),
            id: Uuid::new_v4(),
            attributes: None,
            relations: Vec::new(),
            embedded: Vec::new(),
            related: None,
        }
    }

    #[test]
    fn registry_covers_every_kind() {
        for kind in ResourceKind::ALL {
            assert_eq!(FactoryRegistry::get(kind).kind(), kind);
        }
    }

    #[test]
    fn stub_ids_filter_by_role_case_insensitively() {
        let mut record = stub(ResourceKind::Manga, "manga");
        let author = stub(ResourceKind::Author, "AUTHOR");
        let artist = stub(ResourceKind::Author, "artist");
        let author_id = author.id;
        record.relations = vec![author, artist];

        assert_eq!(stub_ids(&record, "author").collect::<Vec<_>>(), vec![author_id]);
        assert_eq!(first_stub_id(&record, "cover_art"), None);
    }

    #[test]
    fn fill_keeps_first_value() {
        let mut slot = None;
        fill(&mut slot, Some(&"first".to_string()));
        fill(&mut slot, Some(&"second".to_string()));
        fill(&mut slot, None);
        assert_eq!(slot.as_deref(), Some("first"));
    }
}
