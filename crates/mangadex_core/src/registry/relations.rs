//! Relation stub registry.
//!
//! # Responsibility
//! - Map `(owner kind, wire role)` to the target kind and cardinality.
//! - Memoize each kind's table on first use for the process lifetime.
//!
//! # Invariants
//! - Role lookup is case-insensitive.
//! - Tables are read-only after they are built.
//! - Role names match `^[a-z][a-z_]*$` and are unique per owner.

use crate::model::kind::ResourceKind;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ROLE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z_]*$").expect("valid role name regex"));

/// Whether one role holds a single related id or a set of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Singular,
    Collection,
}

/// One declared relation property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationRole {
    pub role: &'static str,
    pub target: ResourceKind,
    pub cardinality: Cardinality,
}

const fn singular(role: &'static str, target: ResourceKind) -> RelationRole {
    RelationRole {
        role,
        target,
        cardinality: Cardinality::Singular,
    }
}

const fn collection(role: &'static str, target: ResourceKind) -> RelationRole {
    RelationRole {
        role,
        target,
        cardinality: Cardinality::Collection,
    }
}

const MANGA_ROLES: &[RelationRole] = &[
    collection("author", ResourceKind::Author),
    collection("artist", ResourceKind::Author),
    singular("cover_art", ResourceKind::CoverArt),
    collection("manga", ResourceKind::Manga),
    singular("creator", ResourceKind::User),
    collection("user", ResourceKind::User),
];

const CHAPTER_ROLES: &[RelationRole] = &[
    singular("manga", ResourceKind::Manga),
    collection("scanlation_group", ResourceKind::ScanlationGroup),
    singular("user", ResourceKind::User),
];

const AUTHOR_ROLES: &[RelationRole] = &[collection("manga", ResourceKind::Manga)];

const COVER_ART_ROLES: &[RelationRole] = &[
    singular("manga", ResourceKind::Manga),
    singular("user", ResourceKind::User),
];

const CUSTOM_LIST_ROLES: &[RelationRole] = &[
    collection("manga", ResourceKind::Manga),
    singular("user", ResourceKind::User),
];

const SCANLATION_GROUP_ROLES: &[RelationRole] = &[
    singular("leader", ResourceKind::User),
    collection("member", ResourceKind::User),
];

const USER_ROLES: &[RelationRole] =
    &[collection("scanlation_group", ResourceKind::ScanlationGroup)];

const DECLARATIONS: &[(ResourceKind, &[RelationRole])] = &[
    (ResourceKind::Manga, MANGA_ROLES),
    (ResourceKind::Chapter, CHAPTER_ROLES),
    (ResourceKind::Author, AUTHOR_ROLES),
    (ResourceKind::Tag, &[]),
    (ResourceKind::User, USER_ROLES),
    (ResourceKind::CoverArt, COVER_ART_ROLES),
    (ResourceKind::ScanlationGroup, SCANLATION_GROUP_ROLES),
    (ResourceKind::CustomList, CUSTOM_LIST_ROLES),
];

static TABLES: Lazy<BTreeMap<ResourceKind, OnceCell<RelationTable>>> = Lazy::new(|| {
    DECLARATIONS
        .iter()
        .map(|(kind, _)| (*kind, OnceCell::new()))
        .collect()
});

/// Registration errors. All of them are programming mistakes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    UnregisteredType(ResourceKind),
    InvalidRole {
        owner: ResourceKind,
        role: String,
    },
    DuplicateRole {
        owner: ResourceKind,
        role: String,
    },
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnregisteredType(kind) => write!(f, "resource type is not registered: {kind}"),
            Self::InvalidRole { owner, role } => {
                write!(f, "relation role `{role}` on {owner} is not a valid name")
            }
            Self::DuplicateRole { owner, role } => {
                write!(f, "relation role `{role}` declared twice on {owner}")
            }
        }
    }
}

impl Error for RegistrationError {}

/// Ordered relation declarations of one owner kind.
#[derive(Debug, Clone)]
pub struct RelationTable {
    owner: ResourceKind,
    roles: Vec<RelationRole>,
}

impl RelationTable {
    fn build(owner: ResourceKind, declared: &[RelationRole]) -> Self {
        Self {
            owner,
            roles: declared.to_vec(),
        }
    }

    pub fn owner(&self) -> ResourceKind {
        self.owner
    }

    /// Declarations in registration order.
    pub fn roles(&self) -> &[RelationRole] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Case-insensitive role lookup.
    pub fn find(&self, role: &str) -> Option<&RelationRole> {
        let normalized = role.trim();
        self.roles
            .iter()
            .find(|declared| declared.role.eq_ignore_ascii_case(normalized))
    }
}

/// Returns the memoized relation table of `kind`.
pub fn describe(kind: ResourceKind) -> Result<&'static RelationTable, RegistrationError> {
    let cell = TABLES
        .get(&kind)
        .ok_or(RegistrationError::UnregisteredType(kind))?;
    cell.get_or_try_init(|| {
        DECLARATIONS
            .iter()
            .find(|(owner, _)| *owner == kind)
            .map(|(owner, declared)| RelationTable::build(*owner, declared))
            .ok_or(RegistrationError::UnregisteredType(kind))
    })
}

/// Looks up one role of `kind`. `Ok(None)` means the role is not declared.
pub fn find_role(
    kind: ResourceKind,
    role: &str,
) -> Result<Option<&'static RelationRole>, RegistrationError> {
    Ok(describe(kind)?.find(role))
}

/// Checks every declared table once. Called when a pool is built.
pub fn validate_registry() -> Result<(), RegistrationError> {
    for kind in ResourceKind::ALL {
        let table = describe(kind)?;
        let mut seen: Vec<&str> = Vec::with_capacity(table.len());
        for declared in table.roles() {
            if !ROLE_NAME_RE.is_match(declared.role) {
                return Err(RegistrationError::InvalidRole {
                    owner: kind,
                    role: declared.role.to_string(),
                });
            }
            if seen
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(declared.role))
            {
                return Err(RegistrationError::DuplicateRole {
                    owner: kind,
                    role: declared.role.to_string(),
                });
            }
            seen.push(declared.role);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{describe, find_role, validate_registry, Cardinality};
    use crate::model::kind::ResourceKind;

    #[test]
    fn declared_tables_are_valid() {
        validate_registry().expect("declarations should validate");
    }

    #[test]
    fn describe_is_memoized_per_kind() {
        let first = describe(ResourceKind::Chapter).expect("chapter is registered");
        let second = describe(ResourceKind::Chapter).expect("chapter is registered");
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.owner(), ResourceKind::Chapter);
    }

    #[test]
    fn role_lookup_ignores_case() {
        let role = find_role(ResourceKind::Chapter, "Scanlation_Group")
            .expect("chapter is registered")
            .expect("role should be declared");
        assert_eq!(role.target, ResourceKind::ScanlationGroup);
        assert_eq!(role.cardinality, Cardinality::Collection);
    }

    #[test]
    fn manga_keeps_declaration_order() {
        let roles = describe(ResourceKind::Manga)
            .expect("manga is registered")
            .roles()
            .iter()
            .map(|declared| declared.role)
            .collect::<Vec<_>>();
        assert_eq!(
            roles,
            vec!["author", "artist", "cover_art", "manga", "creator", "user"]
        );
    }

    #[test]
    fn tags_declare_no_relations() {
        let table = describe(ResourceKind::Tag).expect("tag is registered");
        assert!(table.is_empty());
        assert!(find_role(ResourceKind::Tag, "manga")
            .expect("tag is registered")
            .is_none());
    }
}
