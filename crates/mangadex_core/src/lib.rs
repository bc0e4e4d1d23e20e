//! Typed object model and identity cache for MangaDex API documents.
//!
//! Raw response bodies are decoded into transfer records, resolved to one
//! canonical object per `(kind, id)` and linked to the objects they were
//! served with.

pub mod client;
pub mod clock;
pub mod config;
pub mod decode;
pub mod factory;
pub mod logging;
pub mod model;
pub mod pool;
pub mod registry;

pub use client::{
    ClientError, ClientResult, FetchRequest, ResourceClient, ResourceSource, SourceError,
    SourceResult,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ConfigError, PoolConfig, DEFAULT_CACHE_LIFETIME_MS, DISABLED_CACHE_FLOOR_MS,
    DISABLED_EXPIRATION_SCAN_INTERVAL_MS, EXPIRATION_SCAN_INTERVAL_MS,
};
pub use decode::{
    decode_fragment, decode_slice, open_envelope, ApiError, ApiErrorKind, CollectionPage,
    DecodeError, DecodeResult, DocumentError, Envelope, TransferRecord,
};
pub use factory::{ArgumentError, FactoryRegistry, ResourceFactory};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{
    Author, AuthorLinks, Chapter, ContentRating, CoverArt, CustomList, CustomListVisibility,
    DomainResource, LocalizedString, Manga, MangaRelation, MangaState, MangaStatus,
    PublicationDemographic, RelationGraph, Resource, ResourceKey, ResourceKind, ScanlationGroup,
    Tag, TagGroup, User,
};
pub use pool::{
    CollectionOutcome, FragmentFailure, PoolError, PoolResult, PoolStats, ResourcePool,
};
pub use registry::{describe, validate_registry, Cardinality, RegistrationError, RelationRole};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
