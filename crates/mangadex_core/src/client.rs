//! Fetch-on-miss client over the resource pool.
//!
//! # Responsibility
//! - Serve objects from the pool when warm.
//! - Ask the transport collaborator for what is missing and feed the
//!   response back through decode and resolve.
//! - Register fetched objects as relation edges of their owner.
//!
//! # Invariants
//! - The transport is never called for ids that are already warm.
//! - Fetched documents take the same decode/resolve path as any other.

use crate::model::kind::{ResourceKey, ResourceKind};
use crate::model::resource::{DomainResource, Resource};
use crate::model::{Author, Chapter, CoverArt, Manga, ScanlationGroup};
use crate::pool::{PoolError, ResourcePool};
use log::{debug, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

/// "Need fetch by id(s) of kind T" signal for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub kind: ResourceKind,
    pub ids: Vec<Uuid>,
}

impl FetchRequest {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Transport failures reported by a `ResourceSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    Unsupported(ResourceKind),
    Transport(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsupported(kind) => write!(f, "source cannot fetch {kind}"),
            Self::Transport(message) => write!(f, "transport failed: {message}"),
        }
    }
}

impl Error for SourceError {}

pub type SourceResult<T> = Result<T, SourceError>;

/// Endpoint layer that turns fetch requests into raw response bodies.
pub trait ResourceSource {
    /// Fetches one resource; returns an entity envelope body.
    fn fetch_by_id(&self, kind: ResourceKind, id: Uuid) -> SourceResult<Vec<u8>>;

    /// Fetches several resources of one kind; returns a collection body.
    fn fetch_collection(&self, request: &FetchRequest) -> SourceResult<Vec<u8>>;
}

/// Client-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    Source(SourceError),
    Pool(PoolError),
    /// The response did not contain the requested object.
    NotReturned(ResourceKey),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
            Self::Pool(err) => write!(f, "{err}"),
            Self::NotReturned(key) => write!(f, "response did not contain {key}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Pool(err) => Some(err),
            Self::NotReturned(_) => None,
        }
    }
}

impl From<SourceError> for ClientError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<PoolError> for ClientError {
    fn from(value: PoolError) -> Self {
        Self::Pool(value)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Pool-backed client generic over the transport.
pub struct ResourceClient<S: ResourceSource> {
    pool: Arc<ResourcePool>,
    source: S,
}

impl<S: ResourceSource> ResourceClient<S> {
    pub fn new(pool: Arc<ResourcePool>, source: S) -> Self {
        Self { pool, source }
    }

    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the object for `id`, fetching it when it is not warm.
    pub fn get<T: DomainResource>(&self, id: Uuid) -> ClientResult<Arc<T>> {
        if let Some(cached) = self.pool.lookup::<T>(id) {
            return Ok(cached);
        }

        let key = ResourceKey::new(T::KIND, id);
        debug!(
            "event=relation_fetch module=client status=start kind={} count=1",
            T::KIND
        );
        let bytes = self.source.fetch_by_id(T::KIND, id).map_err(|err| {
            warn!(
                "event=relation_fetch module=client status=error kind={} error={}",
                T::KIND,
                err
            );
            err
        })?;
        let resource = self.pool.ingest_document(&bytes, T::KIND)?;
        T::from_resource(&resource)
            .filter(|fetched| fetched.id() == id)
            .ok_or(ClientError::NotReturned(key))
    }

    /// Returns one related object of `owner`, fetching it when needed.
    ///
    /// The returned object is registered as an edge of `owner` either way.
    pub fn related<T: DomainResource>(
        &self,
        owner: &Resource,
        id: Uuid,
    ) -> ClientResult<Arc<T>> {
        if let Some(found) = owner.relations().try_get_relation::<T>(&self.pool, id) {
            return Ok(found);
        }
        let fetched = self.get::<T>(id)?;
        self.pool.link(owner, &T::into_resource(fetched.clone()));
        Ok(fetched)
    }

    /// Bulk variant of [`ResourceClient::related`].
    ///
    /// Only the ids not found on the edges or in the pool are fetched, in
    /// one collection request. Objects the response omits are left out of
    /// the result. Order follows `ids`, duplicates removed.
    pub fn related_collection<T: DomainResource>(
        &self,
        owner: &Resource,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> ClientResult<Vec<Arc<T>>> {
        let ids = unique(ids);
        let (found, complete) = owner
            .relations()
            .try_get_relation_collection::<T>(&self.pool, ids.iter().copied());
        if complete {
            return Ok(found);
        }

        let known = found.iter().map(|item| item.id()).collect::<HashSet<_>>();
        let request = FetchRequest {
            kind: T::KIND,
            ids: ids
                .iter()
                .copied()
                .filter(|id| !known.contains(id))
                .collect(),
        };
        debug!(
            "event=relation_fetch module=client status=start kind={} count={}",
            request.kind,
            request.ids.len()
        );
        let bytes = self.source.fetch_collection(&request)?;
        let outcome = self.pool.ingest_collection(&bytes, T::KIND)?;
        if !outcome.is_complete() {
            warn!(
                "event=relation_fetch module=client status=partial kind={} failed={}",
                request.kind,
                outcome.failures.len()
            );
        }
        for resource in &outcome.resources {
            self.pool.link(owner, resource);
        }

        Ok(ids
            .into_iter()
            .filter_map(|id| owner.relations().try_get_relation::<T>(&self.pool, id))
            .collect())
    }

    /// Ids of kind `T` that are not warm, as a fetch request.
    ///
    /// Returns `None` when every id is already cached.
    pub fn pending_fetch<T: DomainResource>(
        &self,
        ids: impl IntoIterator<Item = Uuid>,
    ) -> Option<FetchRequest> {
        let missing = unique(ids)
            .into_iter()
            .filter(|id| !self.pool.contains(&ResourceKey::new(T::KIND, *id)))
            .collect::<Vec<_>>();
        if missing.is_empty() {
            return None;
        }
        Some(FetchRequest {
            kind: T::KIND,
            ids: missing,
        })
    }

    /// Manga a chapter belongs to. `None` when the chapter names none.
    pub fn chapter_manga(&self, chapter: &Arc<Chapter>) -> ClientResult<Option<Arc<Manga>>> {
        let Some(manga_id) = chapter.manga_id() else {
            return Ok(None);
        };
        self.related::<Manga>(&Resource::from(chapter.clone()), manga_id)
            .map(Some)
    }

    pub fn chapter_groups(
        &self,
        chapter: &Arc<Chapter>,
    ) -> ClientResult<Vec<Arc<ScanlationGroup>>> {
        self.related_collection::<ScanlationGroup>(
            &Resource::from(chapter.clone()),
            chapter.group_ids(),
        )
    }

    pub fn manga_authors(&self, manga: &Arc<Manga>) -> ClientResult<Vec<Arc<Author>>> {
        self.related_collection::<Author>(&Resource::from(manga.clone()), manga.author_ids())
    }

    /// Main cover of a manga, fetched on demand.
    pub fn manga_cover(&self, manga: &Arc<Manga>) -> ClientResult<Option<Arc<CoverArt>>> {
        let Some(cover_id) = manga.main_cover_id() else {
            return Ok(None);
        };
        self.related::<CoverArt>(&Resource::from(manga.clone()), cover_id)
            .map(Some)
    }
}

fn unique(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
