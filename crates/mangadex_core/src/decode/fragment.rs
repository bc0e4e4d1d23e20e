//! Fragment-level decoding.
//!
//! # Responsibility
//! - Validate the `{id, type, attributes, relationships}` frame.
//! - Resolve each relation stub's target kind through the role registry.
//!
//! # Invariants
//! - Only `id`, `type`, `attributes`, `relationships` are accepted, plus
//!   `related` on manga relation stubs.
//! - Relation stubs nest at most `MAX_RELATION_DEPTH` levels below the
//!   primary fragment.

use super::attributes::{decode_attributes, AttributeBlock};
use super::{DecodeError, DecodeResult, TransferRecord};
use crate::model::enums::MangaRelation;
use crate::model::kind::ResourceKind;
use crate::registry::find_role;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Instant;
use uuid::Uuid;

/// Deepest accepted stub level: primary (0) -> stub (1) -> nested stub (2).
pub const MAX_RELATION_DEPTH: usize = 2;

const FRAME_PROPERTIES: [&str; 4] = ["id", "type", "attributes", "relationships"];
const RELATED_PROPERTY: &str = "related";

/// Decodes one primary fragment expected to be of `kind`.
///
/// # Errors
/// - `NotAnObject` when `value` or a relation entry is not an object.
/// - `TypeMismatch` when the `type` tag is not accepted by `kind`.
/// - `InvalidId`, `AttributeShape`, `UnknownRole`, `UnknownProperty` and
///   `NestingTooDeep` for malformed content.
pub fn decode_fragment(value: &Value, kind: ResourceKind) -> DecodeResult<TransferRecord> {
    let started_at = Instant::now();
    match decode_primary(value, kind) {
        Ok(record) => {
            debug!(
                "event=decode_fragment module=decode status=ok kind={} relations={} embedded={} duration_us={}",
                kind,
                record.relations.len(),
                record.embedded.len(),
                started_at.elapsed().as_micros()
            );
            Ok(record)
        }
        Err(err) => {
            warn!(
                "event=decode_fragment module=decode status=error kind={} error={}",
                kind, err
            );
            Err(err)
        }
    }
}

/// Parses `bytes` as JSON and decodes it as one `kind` fragment.
pub fn decode_slice(bytes: &[u8], kind: ResourceKind) -> DecodeResult<TransferRecord> {
    let value: Value = serde_json::from_slice(bytes)?;
    decode_fragment(&value, kind)
}

fn decode_primary(value: &Value, kind: ResourceKind) -> DecodeResult<TransferRecord> {
    let object = as_object(value, kind.as_str())?;
    let type_tag = read_type(object, kind)?;
    if !kind.accepts_tag(&type_tag) {
        return Err(DecodeError::TypeMismatch {
            expected: kind,
            found: type_tag,
        });
    }
    decode_object(object, kind, type_tag, 0)
}

fn decode_stub(value: &Value, owner: ResourceKind, depth: usize) -> DecodeResult<TransferRecord> {
    let object = as_object(value, "relationship entry")?;
    let type_tag = read_type(object, owner)?;
    let declared = find_role(owner, &type_tag)?.ok_or_else(|| DecodeError::UnknownRole {
        owner,
        role: type_tag.clone(),
    })?;
    decode_object(object, declared.target, type_tag, depth)
}

fn decode_embedded(
    value: &Value,
    kind: ResourceKind,
    depth: usize,
) -> DecodeResult<TransferRecord> {
    let object = as_object(value, kind.as_str())?;
    let type_tag = read_type(object, kind)?;
    if !kind.accepts_tag(&type_tag) {
        return Err(DecodeError::TypeMismatch {
            expected: kind,
            found: type_tag,
        });
    }
    decode_object(object, kind, type_tag, depth)
}

fn decode_object(
    object: &Map<String, Value>,
    kind: ResourceKind,
    type_tag: String,
    depth: usize,
) -> DecodeResult<TransferRecord> {
    if depth > MAX_RELATION_DEPTH {
        return Err(DecodeError::NestingTooDeep { kind, depth });
    }

    let allows_related = kind == ResourceKind::Manga && depth > 0;
    let is_known = |key: &str| {
        FRAME_PROPERTIES.contains(&key) || (allows_related && key == RELATED_PROPERTY)
    };
    if let Some(property) = object.keys().find(|key| !is_known(key.as_str())) {
        return Err(DecodeError::UnknownProperty {
            kind,
            property: property.clone(),
        });
    }

    let id = read_id(object, kind)?;

    let mut embedded = Vec::new();
    let attributes = match object.get("attributes") {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let mut block = decode_attributes(kind, raw)?;
            if let AttributeBlock::Manga(manga) = &mut block {
                for tag in std::mem::take(&mut manga.tags) {
                    embedded.push(decode_embedded(&tag, ResourceKind::Tag, depth + 1)?);
                }
            }
            Some(block)
        }
    };

    let relations = match object.get("relationships") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| decode_stub(entry, kind, depth + 1))
            .collect::<DecodeResult<Vec<_>>>()?,
        Some(_) => return Err(DecodeError::RelationshipsNotArray { kind }),
    };

    let related = match object.get(RELATED_PROPERTY) {
        None | Some(Value::Null) => None,
        Some(raw) => Some(MangaRelation::deserialize(raw).map_err(|_| {
            DecodeError::InvalidRelated {
                value: raw.to_string(),
            }
        })?),
    };

    Ok(TransferRecord {
        kind,
        type_tag,
        id,
        attributes,
        relations,
        embedded,
        related,
    })
}

fn as_object<'a>(value: &'a Value, context: &str) -> DecodeResult<&'a Map<String, Value>> {
    value.as_object().ok_or_else(|| DecodeError::NotAnObject {
        context: context.to_string(),
    })
}

fn read_type(object: &Map<String, Value>, kind: ResourceKind) -> DecodeResult<String> {
    object
        .get("type")
        .and_then(Value::as_str)
        .map(|tag| tag.trim().to_string())
        .ok_or(DecodeError::MissingField {
            kind,
            field: "type",
        })
}

fn read_id(object: &Map<String, Value>, kind: ResourceKind) -> DecodeResult<Uuid> {
    match object.get("id") {
        None | Some(Value::Null) => Err(DecodeError::MissingField { kind, field: "id" }),
        Some(Value::String(raw)) => Uuid::parse_str(raw).map_err(|_| DecodeError::InvalidId {
            kind,
            value: raw.clone(),
        }),
        Some(other) => Err(DecodeError::InvalidId {
            kind,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_fragment, decode_slice, MAX_RELATION_DEPTH};
    use crate::decode::DecodeError;
    use crate::model::enums::MangaRelation;
    use crate::model::kind::ResourceKind;
    use serde_json::{json, Value};

    const USER_ID: &str = "5d8bc3a4-0d2c-4f43-bc8b-3e0e0e6c2a11";
    const GROUP_ID: &str = "8f3ae8f2-7f4b-4a6b-9d6e-2ac1a6e9b0c2";
    const MANGA_ID: &str = "a1c7c817-4e59-43b7-9365-09675a149a6f";

    fn user_fragment(relationships: Value) -> Value {
        json!({
            "id": USER_ID,
            "type": "user",
            "attributes": {"username": "reader", "roles": ["ROLE_MEMBER"], "version": 2},
            "relationships": relationships,
        })
    }

    #[test]
    fn decodes_primary_with_stubs() {
        let record = decode_fragment(
            &user_fragment(json!([{"id": GROUP_ID, "type": "scanlation_group"}])),
            ResourceKind::User,
        )
        .expect("user fragment should decode");
        assert_eq!(record.kind, ResourceKind::User);
        assert_eq!(record.version(), Some(2));
        assert_eq!(record.relations.len(), 1);
        let stub = &record.relations[0];
        assert_eq!(stub.kind, ResourceKind::ScanlationGroup);
        assert!(!stub.has_attributes());
        assert_eq!(stub.id.to_string(), GROUP_ID);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = decode_fragment(
            &user_fragment(json!([{"id": MANGA_ID, "type": "manga"}])),
            ResourceKind::User,
        )
        .expect_err("users do not relate to manga");
        assert_eq!(
            err,
            DecodeError::UnknownRole {
                owner: ResourceKind::User,
                role: "manga".to_string()
            }
        );
    }

    #[test]
    fn rejects_invalid_id_and_type_mismatch() {
        let mut bad_id = user_fragment(json!([]));
        bad_id["id"] = json!("not-a-uuid");
        assert!(matches!(
            decode_fragment(&bad_id, ResourceKind::User),
            Err(DecodeError::InvalidId { .. })
        ));

        assert!(matches!(
            decode_fragment(&user_fragment(json!([])), ResourceKind::Tag),
            Err(DecodeError::TypeMismatch {
                expected: ResourceKind::Tag,
                ..
            })
        ));
    }

    #[test]
    fn rejects_unknown_frame_property_and_non_objects() {
        let mut fragment = user_fragment(json!([]));
        fragment["links"] = json!({});
        assert!(matches!(
            decode_fragment(&fragment, ResourceKind::User),
            Err(DecodeError::UnknownProperty { .. })
        ));
        assert!(matches!(
            decode_fragment(&json!("user"), ResourceKind::User),
            Err(DecodeError::NotAnObject { .. })
        ));
        assert!(matches!(
            decode_fragment(&user_fragment(json!({})), ResourceKind::User),
            Err(DecodeError::RelationshipsNotArray { .. })
        ));
    }

    #[test]
    fn related_is_accepted_only_on_manga_stubs() {
        let fragment = json!({
            "id": MANGA_ID,
            "type": "manga",
            "relationships": [{"id": USER_ID, "type": "manga", "related": "sequel"}],
        });
        let record = decode_fragment(&fragment, ResourceKind::Manga).expect("should decode");
        assert!(record.attributes.is_none());
        assert_eq!(record.relations[0].related, Some(MangaRelation::Sequel));

        let mut on_primary = fragment.clone();
        on_primary["related"] = json!("sequel");
        assert!(matches!(
            decode_fragment(&on_primary, ResourceKind::Manga),
            Err(DecodeError::UnknownProperty { .. })
        ));

        let bad_relation = json!({
            "id": MANGA_ID,
            "type": "manga",
            "relationships": [{"id": USER_ID, "type": "manga", "related": "cousin"}],
        });
        assert!(matches!(
            decode_fragment(&bad_relation, ResourceKind::Manga),
            Err(DecodeError::InvalidRelated { .. })
        ));
    }

    #[test]
    fn nesting_deeper_than_cap_is_rejected() {
        let fragment = json!({
            "id": MANGA_ID,
            "type": "manga",
            "relationships": [{
                "id": MANGA_ID,
                "type": "manga",
                "relationships": [{
                    "id": MANGA_ID,
                    "type": "manga",
                    "relationships": [{"id": MANGA_ID, "type": "manga"}],
                }],
            }],
        });
        let err = decode_fragment(&fragment, ResourceKind::Manga).expect_err("too deep");
        assert_eq!(
            err,
            DecodeError::NestingTooDeep {
                kind: ResourceKind::Manga,
                depth: MAX_RELATION_DEPTH + 1
            }
        );
    }

    #[test]
    fn decode_slice_reports_invalid_json() {
        assert!(matches!(
            decode_slice(b"{not json", ResourceKind::User),
            Err(DecodeError::Json(_))
        ));
    }
}
