//! Shared identity core and the closed resource union.
//!
//! # Responsibility
//! - Give every domain object a stable id, a version counter and an edge set.
//! - Provide `Resource`, the tagged union the pool and factories work with.
//!
//! # Invariants
//! - Equality and hashing use `(kind, id)` only, never attribute snapshots.
//! - `WeakResource` never keeps an object alive.

use super::graph::RelationGraph;
use super::kind::{ResourceKey, ResourceKind};
use super::{Author, Chapter, CoverArt, CustomList, Manga, ScanlationGroup, Tag, User};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Identity state embedded in every domain object.
#[derive(Debug)]
pub struct ResourceCore {
    id: Uuid,
    version: AtomicI32,
    relations: RelationGraph,
}

impl ResourceCore {
    pub(crate) fn new(id: Uuid, version: i32) -> Self {
        Self {
            id,
            version: AtomicI32::new(version),
            relations: RelationGraph::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Latest observed version, used for optimistic concurrency on writes.
    pub fn version(&self) -> i32 {
        self.version.load(Ordering::Acquire)
    }

    /// Overwrite-on-merge: the latest decoded version always wins.
    pub(crate) fn set_version(&self, version: i32) {
        self.version.store(version, Ordering::Release);
    }

    pub fn relations(&self) -> &RelationGraph {
        &self.relations
    }
}

/// Behaviour shared by the concrete domain types.
pub trait DomainResource: Send + Sync + Sized + 'static {
    const KIND: ResourceKind;

    fn core(&self) -> &ResourceCore;

    /// Wraps a shared handle into the resource union.
    fn into_resource(this: Arc<Self>) -> Resource;

    /// Extracts a typed handle when `resource` is of this kind.
    fn from_resource(resource: &Resource) -> Option<Arc<Self>>;

    fn id(&self) -> Uuid {
        self.core().id()
    }

    fn version(&self) -> i32 {
        self.core().version()
    }

    fn key(&self) -> ResourceKey {
        ResourceKey::new(Self::KIND, self.id())
    }

    fn relations(&self) -> &RelationGraph {
        self.core().relations()
    }
}

macro_rules! resource_union {
    ($($variant:ident),+ $(,)?) => {
        /// Shared handle to one canonical domain object.
        #[derive(Debug, Clone)]
        pub enum Resource {
            $($variant(Arc<$variant>),)+
        }

        /// Non-owning handle used by the live table and relation edges.
        #[derive(Debug, Clone)]
        pub enum WeakResource {
            $($variant(Weak<$variant>),)+
        }

        impl Resource {
            pub fn kind(&self) -> ResourceKind {
                match self {
                    $(Self::$variant(_) => <$variant as DomainResource>::KIND,)+
                }
            }

            pub fn core(&self) -> &ResourceCore {
                match self {
                    $(Self::$variant(inner) => inner.core(),)+
                }
            }

            pub fn downgrade(&self) -> WeakResource {
                match self {
                    $(Self::$variant(inner) => WeakResource::$variant(Arc::downgrade(inner)),)+
                }
            }

            /// Whether both handles point at the same allocation.
            pub fn ptr_eq(&self, other: &Resource) -> bool {
                match (self, other) {
                    $((Self::$variant(left), Self::$variant(right)) => Arc::ptr_eq(left, right),)+
                    _ => false,
                }
            }
        }

        impl WeakResource {
            pub fn upgrade(&self) -> Option<Resource> {
                match self {
                    $(Self::$variant(inner) => inner.upgrade().map(Resource::$variant),)+
                }
            }

            pub fn is_alive(&self) -> bool {
                match self {
                    $(Self::$variant(inner) => inner.strong_count() > 0,)+
                }
            }
        }

        $(
            impl From<Arc<$variant>> for Resource {
                fn from(value: Arc<$variant>) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

resource_union!(
    Manga,
    Chapter,
    Author,
    Tag,
    User,
    CoverArt,
    ScanlationGroup,
    CustomList,
);

impl Resource {
    pub fn id(&self) -> Uuid {
        self.core().id()
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.kind(), self.id())
    }

    pub fn version(&self) -> i32 {
        self.core().version()
    }

    pub fn relations(&self) -> &RelationGraph {
        self.core().relations()
    }

    pub fn downcast<T: DomainResource>(&self) -> Option<Arc<T>> {
        T::from_resource(self)
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (Id: {})", self.kind(), self.id())
    }
}

/// Implements `DomainResource` for a struct holding `core: ResourceCore`.
macro_rules! impl_domain_resource {
    ($ty:ident, $kind:expr) => {
        impl $crate::model::resource::DomainResource for $ty {
            const KIND: $crate::model::kind::ResourceKind = $kind;

            fn core(&self) -> &$crate::model::resource::ResourceCore {
                &self.core
            }

            fn into_resource(this: std::sync::Arc<Self>) -> $crate::model::resource::Resource {
                $crate::model::resource::Resource::$ty(this)
            }

            fn from_resource(
                resource: &$crate::model::resource::Resource,
            ) -> Option<std::sync::Arc<Self>> {
                match resource {
                    $crate::model::resource::Resource::$ty(inner) => Some(inner.clone()),
                    _ => None,
                }
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.core.id() == other.core.id()
            }
        }

        impl Eq for $ty {}
    };
}

pub(crate) use impl_domain_resource;
