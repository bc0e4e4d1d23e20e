//! Static per-kind registration tables.
//!
//! # Responsibility
//! - Describe which relation roles each resource kind carries.
//! - Fail fast when the declarations are inconsistent.
//!
//! # See also
//! - `crate::factory` for the create/merge registry.

pub mod relations;

pub use relations::{
    describe, find_role, validate_registry, Cardinality, RegistrationError, RelationRole,
    RelationTable,
};
