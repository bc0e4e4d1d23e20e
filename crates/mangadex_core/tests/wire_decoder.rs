mod common;

use common::{author_attributes, chapter, cover_attributes, id, manga_attributes, stub, tag};
use mangadex_core::decode::AttributeBlock;
use mangadex_core::{
    decode_fragment, decode_slice, ContentRating, DecodeError, MangaRelation, MangaStatus,
    ResourceKind,
};
use serde_json::json;

#[test]
fn manga_fragment_decodes_stubs_tags_and_expanded_relations() {
    let fragment = json!({
        "id": id(1).to_string(),
        "type": "manga",
        "attributes": manga_attributes(5, json!([tag(50, "Drama"), tag(51, "Slice of Life")])),
        "relationships": [
            {"id": id(10).to_string(), "type": "author", "attributes": author_attributes("A")},
            stub("artist", 10),
            {
                "id": id(20).to_string(),
                "type": "cover_art",
                "attributes": cover_attributes("c.jpg")
            },
            {"id": id(2).to_string(), "type": "manga", "related": "sequel"},
        ],
    });

    let record = decode_fragment(&fragment, ResourceKind::Manga).expect("manga should decode");
    assert_eq!(record.kind, ResourceKind::Manga);
    assert_eq!(record.id, id(1));
    assert_eq!(record.version(), Some(5));

    match record.attributes.as_ref().expect("attributes present") {
        AttributeBlock::Manga(manga) => {
            assert_eq!(manga.title.english(), Some("Blue Period"));
            assert!(manga.description.is_empty());
            assert_eq!(manga.status, Some(MangaStatus::Ongoing));
            assert_eq!(manga.content_rating, ContentRating::Safe);
        }
        other => panic!("unexpected attribute block {other:?}"),
    }

    let embedded = record
        .embedded
        .iter()
        .map(|fragment| (fragment.kind, fragment.id))
        .collect::<Vec<_>>();
    assert_eq!(
        embedded,
        vec![(ResourceKind::Tag, id(50)), (ResourceKind::Tag, id(51))]
    );

    let kinds = record
        .relations
        .iter()
        .map(|stub| (stub.type_tag.as_str(), stub.kind, stub.has_attributes()))
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            ("author", ResourceKind::Author, true),
            ("artist", ResourceKind::Author, false),
            ("cover_art", ResourceKind::CoverArt, true),
            ("manga", ResourceKind::Manga, false),
        ]
    );
    assert_eq!(record.relations[3].related, Some(MangaRelation::Sequel));
}

#[test]
fn artist_tagged_primary_decodes_as_author() {
    let fragment = json!({
        "id": id(10).to_string(),
        "type": "artist",
        "attributes": author_attributes("B"),
        "relationships": [stub("manga", 1)],
    });
    let record = decode_fragment(&fragment, ResourceKind::Author).expect("artist is an author");
    assert_eq!(record.kind, ResourceKind::Author);
    assert!(record.is_tagged("artist"));
}

#[test]
fn role_lookup_is_case_insensitive() {
    let record = decode_fragment(
        &chapter(1, json!([{"id": id(2).to_string(), "type": "Manga"}])),
        ResourceKind::Chapter,
    )
    .expect("role lookup ignores case");
    assert_eq!(record.relations[0].kind, ResourceKind::Manga);
}

#[test]
fn unknown_role_is_a_hard_error() {
    let err = decode_fragment(&chapter(1, json!([stub("leader", 2)])), ResourceKind::Chapter)
        .expect_err("chapters have no leader");
    assert_eq!(
        err,
        DecodeError::UnknownRole {
            owner: ResourceKind::Chapter,
            role: "leader".to_string()
        }
    );
}

#[test]
fn attribute_shape_is_fixed_per_kind() {
    let mut fragment = chapter(1, json!([]));
    fragment["attributes"]["pages"] = json!("eighteen");
    let err = decode_fragment(&fragment, ResourceKind::Chapter).expect_err("pages is numeric");
    assert!(matches!(
        err,
        DecodeError::AttributeShape {
            kind: ResourceKind::Chapter,
            ..
        }
    ));

    let mut missing_stamp = chapter(1, json!([]));
    missing_stamp["attributes"]
        .as_object_mut()
        .expect("attributes object")
        .remove("publishAt");
    assert!(matches!(
        decode_fragment(&missing_stamp, ResourceKind::Chapter),
        Err(DecodeError::AttributeShape { .. })
    ));
}

#[test]
fn stub_attributes_are_checked_against_the_target_kind() {
    let fragment = chapter(
        1,
        json!([{"id": id(2).to_string(), "type": "manga", "attributes": {"name": "x"}}]),
    );
    let err = decode_fragment(&fragment, ResourceKind::Chapter)
        .expect_err("manga stub attributes must match the manga shape");
    assert!(matches!(
        err,
        DecodeError::AttributeShape {
            kind: ResourceKind::Manga,
            ..
        }
    ));
}

#[test]
fn missing_id_and_type_are_reported() {
    let err = decode_fragment(&json!({"type": "chapter"}), ResourceKind::Chapter)
        .expect_err("id is required");
    assert_eq!(
        err,
        DecodeError::MissingField {
            kind: ResourceKind::Chapter,
            field: "id"
        }
    );

    let err = decode_fragment(&json!({"id": id(1).to_string()}), ResourceKind::Chapter)
        .expect_err("type is required");
    assert!(matches!(err, DecodeError::MissingField { field: "type", .. }));
}

#[test]
fn decode_slice_reads_raw_bytes() {
    let bytes = serde_json::to_vec(&chapter(7, json!([stub("scanlation_group", 8)])))
        .expect("fixture should serialize");
    let record = decode_slice(&bytes, ResourceKind::Chapter).expect("bytes should decode");
    assert_eq!(record.id, id(7));
    assert_eq!(record.relations[0].id, id(8));
}
