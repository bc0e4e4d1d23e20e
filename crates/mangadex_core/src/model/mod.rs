//! Typed domain objects for MangaDex resources.
//!
//! # Responsibility
//! - Define the eight canonical resource types and their closed union.
//! - Keep identity (`ResourceKey`) separate from attribute snapshots.
//!
//! # Invariants
//! - Every domain object is identified by `(ResourceKind, Uuid)`.
//! - Required attributes are fixed at creation; later fragments only fill
//!   unset optionals and grow relation-id sets.
//!
//! # See also
//! - `crate::factory` for the create/merge rules.

pub mod author;
pub mod chapter;
pub mod cover_art;
pub mod custom_list;
pub mod enums;
pub mod graph;
pub mod kind;
pub mod localized;
pub mod manga;
pub mod resource;
pub mod scanlation_group;
pub mod tag;
pub mod user;

/// Wire timestamps keep the offset the API sent.
pub type Timestamp = chrono::DateTime<chrono::FixedOffset>;

pub use author::{Author, AuthorLinks};
pub use chapter::Chapter;
pub use cover_art::CoverArt;
pub use custom_list::CustomList;
pub use enums::{
    ContentRating, CustomListVisibility, MangaRelation, MangaState, MangaStatus,
    PublicationDemographic, TagGroup,
};
pub use graph::RelationGraph;
pub use kind::{ResourceKey, ResourceKind};
pub use localized::LocalizedString;
pub use manga::Manga;
pub use resource::{DomainResource, Resource, ResourceCore, WeakResource};
pub use scanlation_group::ScanlationGroup;
pub use tag::Tag;
pub use user::User;
