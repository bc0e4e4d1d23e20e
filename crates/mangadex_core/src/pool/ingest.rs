//! Document-level entry points: decode, then resolve.

use super::{PoolError, PoolResult, ResourcePool};
use crate::decode::{decode_fragment, open_envelope, CollectionPage, DecodeError, Envelope};
use crate::model::kind::ResourceKind;
use crate::model::resource::Resource;
use log::{info, warn};
use serde_json::Value;
use std::time::Instant;

/// One fragment of a collection that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFailure {
    /// Position in the response `data` array.
    pub index: usize,
    pub error: PoolError,
}

/// Result of ingesting a collection document.
///
/// Fragments fail independently; resolved siblings stay valid and cached.
#[derive(Debug, Clone, Default)]
pub struct CollectionOutcome {
    pub resources: Vec<Resource>,
    pub failures: Vec<FragmentFailure>,
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
}

impl CollectionOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl ResourcePool {
    /// Decodes one fragment of `kind` and resolves it.
    pub fn ingest_fragment(&self, fragment: &Value, kind: ResourceKind) -> PoolResult<Resource> {
        let record = decode_fragment(fragment, kind)?;
        self.resolve(&record)
    }

    /// Ingests a single-entity response body.
    ///
    /// # Errors
    /// - `Api` for error responses.
    /// - `Decode` when the body is not an entity envelope or the fragment is
    ///   malformed.
    pub fn ingest_document(&self, bytes: &[u8], kind: ResourceKind) -> PoolResult<Resource> {
        let started_at = Instant::now();
        let result = open_envelope(bytes)
            .map_err(PoolError::from)
            .and_then(|envelope| match envelope {
                Envelope::Entity(data) => self.ingest_fragment(&data, kind),
                Envelope::Collection(_) => Err(DecodeError::UnexpectedEnvelope(
                    "expected an entity response".to_string(),
                )
                .into()),
            });

        match &result {
            Ok(_) => info!(
                "event=document_ingest module=pool status=ok shape=entity kind={} duration_ms={}",
                kind,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=document_ingest module=pool status=error shape=entity kind={} duration_ms={} error={}",
                kind,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Ingests a collection response body.
    ///
    /// A malformed fragment only fails its own entry. An entity envelope is
    /// accepted as a one-element page.
    ///
    /// # Errors
    /// - `Api` for error responses.
    /// - `Decode` when the body itself cannot be opened.
    pub fn ingest_collection(
        &self,
        bytes: &[u8],
        kind: ResourceKind,
    ) -> PoolResult<CollectionOutcome> {
        let started_at = Instant::now();
        let page = match open_envelope(bytes) {
            Ok(Envelope::Collection(page)) => page,
            Ok(Envelope::Entity(data)) => CollectionPage {
                data: vec![data],
                limit: 1,
                offset: 0,
                total: 1,
            },
            Err(err) => {
                warn!(
                    "event=document_ingest module=pool status=error shape=collection kind={} error={}",
                    kind, err
                );
                return Err(err.into());
            }
        };

        let outcome = self.ingest_page(&page, kind);
        let status = if outcome.is_complete() { "ok" } else { "partial" };
        info!(
            "event=document_ingest module=pool status={} shape=collection kind={} resolved={} failed={} duration_ms={}",
            status,
            kind,
            outcome.resources.len(),
            outcome.failures.len(),
            started_at.elapsed().as_millis()
        );
        Ok(outcome)
    }

    /// Resolves every fragment of an already opened collection page.
    pub fn ingest_page(&self, page: &CollectionPage, kind: ResourceKind) -> CollectionOutcome {
        let mut outcome = CollectionOutcome {
            limit: page.limit,
            offset: page.offset,
            total: page.total,
            ..CollectionOutcome::default()
        };
        for (index, fragment) in page.data.iter().enumerate() {
            match self.ingest_fragment(fragment, kind) {
                Ok(resource) => outcome.resources.push(resource),
                Err(error) => outcome.failures.push(FragmentFailure { index, error }),
            }
        }
        outcome
    }
}
