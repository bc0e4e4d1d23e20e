//! Per-object relation edges.
//!
//! # Responsibility
//! - Remember which related objects were already seen next to this one.
//! - Unify "already in this response" and "still cached" lookups.
//!
//! # Invariants
//! - Edges are non-owning; an edge never keeps its target alive.
//! - Registration is idempotent and order-independent.

use super::kind::ResourceKey;
use super::resource::{DomainResource, Resource, WeakResource};
use crate::pool::ResourcePool;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Lazily populated edge set of one domain object.
#[derive(Debug, Default)]
pub struct RelationGraph {
    edges: RwLock<HashMap<ResourceKey, WeakResource>>,
}

impl RelationGraph {
    /// Records an edge to `related`. Replaces a dead edge with the same key.
    pub fn register(&self, related: &Resource) {
        let key = related.key();
        let mut edges = self.edges.write();
        match edges.get(&key) {
            Some(existing) if existing.is_alive() => {}
            _ => {
                edges.insert(key, related.downgrade());
            }
        }
    }

    /// Returns the live edge target for `key`, if any.
    pub fn get(&self, key: &ResourceKey) -> Option<Resource> {
        self.edges.read().get(key).and_then(WeakResource::upgrade)
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.get(key).is_some()
    }

    /// Number of edges whose target is still alive.
    pub fn len(&self) -> usize {
        self.edges
            .read()
            .values()
            .filter(|edge| edge.is_alive())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live edge targets of kind `T`, in no particular order.
    pub fn related<T: DomainResource>(&self) -> Vec<Arc<T>> {
        self.edges
            .read()
            .iter()
            .filter(|(key, _)| key.kind == T::KIND)
            .filter_map(|(_, edge)| edge.upgrade())
            .filter_map(|resource| T::from_resource(&resource))
            .collect()
    }

    /// Looks up one related object of kind `T`.
    ///
    /// Checks local edges first, then the pool's warm tiers. A pool hit is
    /// registered as an edge before returning. `None` means the caller has to
    /// fetch the object.
    pub fn try_get_relation<T: DomainResource>(
        &self,
        pool: &ResourcePool,
        id: Uuid,
    ) -> Option<Arc<T>> {
        let key = ResourceKey::new(T::KIND, id);
        if let Some(local) = self.get(&key).and_then(|resource| T::from_resource(&resource)) {
            return Some(local);
        }

        let cached = pool.lookup_resource(&key)?;
        self.register(&cached);
        T::from_resource(&cached)
    }

    /// Bulk variant of [`RelationGraph::try_get_relation`].
    ///
    /// Returns the objects that were found, in `ids` order, and whether every
    /// id was resolved. Duplicated ids are looked up once.
    pub fn try_get_relation_collection<T: DomainResource>(
        &self,
        pool: &ResourcePool,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> (Vec<Arc<T>>, bool) {
        let mut found = Vec::new();
        let mut complete = true;
        let mut seen = std::collections::HashSet::new();
        for id in ids {
            if !seen.insert(id) {
                continue;
            }
            match self.try_get_relation::<T>(pool, id) {
                Some(resource) => found.push(resource),
                None => complete = false,
            }
        }
        (found, complete)
    }
}
