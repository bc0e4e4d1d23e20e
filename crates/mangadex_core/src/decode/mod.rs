//! Wire decoder for MangaDex compound documents.
//!
//! # Responsibility
//! - Turn one raw fragment into a `TransferRecord` for a known kind.
//! - Unwrap response envelopes and classify API error payloads.
//!
//! # Invariants
//! - Decoding is pure: no pool access, no shared state beyond the read-only
//!   relation registry.
//! - Attribute shape depends on the kind only, never on the endpoint.
//! - Relation roles unknown to the owner's registry table are hard errors.
//!
//! # See also
//! - `crate::registry::relations` for the role tables.

pub mod attributes;
pub mod envelope;
pub mod fragment;

use crate::model::enums::MangaRelation;
use crate::model::kind::{ResourceKey, ResourceKind};
use crate::registry::RegistrationError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub use attributes::{
    AttributeBlock, AuthorAttributes, ChapterAttributes, CoverArtAttributes,
    CustomListAttributes, MangaAttributes, ScanlationGroupAttributes, TagAttributes,
    UserAttributes,
};
pub use envelope::{
    open_envelope, ApiError, ApiErrorDetail, ApiErrorKind, CollectionPage, DocumentError,
    DocumentResult, Envelope,
};
pub use fragment::{decode_fragment, decode_slice, MAX_RELATION_DEPTH};

/// Decoded form of one wire fragment. Discarded after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    /// Concrete kind the fragment resolves to.
    pub kind: ResourceKind,
    /// Wire `type` value. For relation stubs this is the role name.
    pub type_tag: String,
    pub id: Uuid,
    /// `None` for bare relation stubs.
    pub attributes: Option<AttributeBlock>,
    /// Relation stubs in wire order.
    pub relations: Vec<TransferRecord>,
    /// Full fragments nested inside the attribute block (manga tags).
    pub embedded: Vec<TransferRecord>,
    /// Manga-to-manga relation kind carried by `manga` stubs.
    pub related: Option<MangaRelation>,
}

impl TransferRecord {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.kind, self.id)
    }

    pub fn has_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    /// Whether the wire tag equals `tag`, ignoring ASCII case.
    pub fn is_tagged(&self, tag: &str) -> bool {
        self.type_tag.eq_ignore_ascii_case(tag)
    }

    /// Declared version, when the record carries attributes.
    pub fn version(&self) -> Option<i32> {
        self.attributes.as_ref().map(AttributeBlock::version)
    }
}

/// Fragment decoding errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    NotAnObject {
        context: String,
    },
    MissingField {
        kind: ResourceKind,
        field: &'static str,
    },
    InvalidId {
        kind: ResourceKind,
        value: String,
    },
    TypeMismatch {
        expected: ResourceKind,
        found: String,
    },
    UnknownProperty {
        kind: ResourceKind,
        property: String,
    },
    AttributeShape {
        kind: ResourceKind,
        message: String,
    },
    RelationshipsNotArray {
        kind: ResourceKind,
    },
    UnknownRole {
        owner: ResourceKind,
        role: String,
    },
    NestingTooDeep {
        kind: ResourceKind,
        depth: usize,
    },
    InvalidRelated {
        value: String,
    },
    Json(String),
    UnexpectedEnvelope(String),
    Registration(RegistrationError),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject { context } => write!(f, "expected a JSON object for {context}"),
            Self::MissingField { kind, field } => {
                write!(f, "{kind} fragment is missing `{field}`")
            }
            Self::InvalidId { kind, value } => {
                write!(f, "{kind} fragment has an invalid id: {value}")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected a {expected} fragment, found type `{found}`")
            }
            Self::UnknownProperty { kind, property } => {
                write!(f, "{kind} fragment has unknown property `{property}`")
            }
            Self::AttributeShape { kind, message } => {
                write!(f, "{kind} attributes do not match the expected shape: {message}")
            }
            Self::RelationshipsNotArray { kind } => {
                write!(f, "{kind} fragment relationships must be an array")
            }
            Self::UnknownRole { owner, role } => {
                write!(f, "relation role `{role}` is not registered for {owner}")
            }
            Self::NestingTooDeep { kind, depth } => {
                write!(f, "{kind} relation nested too deep (depth {depth})")
            }
            Self::InvalidRelated { value } => write!(f, "unknown manga relation `{value}`"),
            Self::Json(message) => write!(f, "invalid JSON document: {message}"),
            Self::UnexpectedEnvelope(message) => {
                write!(f, "unexpected response envelope: {message}")
            }
            Self::Registration(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Registration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistrationError> for DecodeError {
    fn from(value: RegistrationError) -> Self {
        Self::Registration(value)
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value.to_string())
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;
