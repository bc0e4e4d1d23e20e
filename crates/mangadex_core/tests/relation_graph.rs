mod common;

use common::{chapter, group, group_attributes, id, manga, manual_pool, stub};
use mangadex_core::{
    Chapter, DomainResource, Manga, ResourceKey, ResourceKind, ScanlationGroup,
};
use serde_json::{json, Value};
use std::time::Duration;

fn expanded_group(n: u128) -> Value {
    json!({
        "id": id(n).to_string(),
        "type": "scanlation_group",
        "attributes": group_attributes("Night Owls"),
    })
}

#[test]
fn local_edges_answer_without_touching_the_pool() {
    let (pool, _clock) = manual_pool();
    let _manga = pool
        .ingest_fragment(&manga(100, json!([])), ResourceKind::Manga)
        .expect("manga");
    let chapter = pool
        .ingest_fragment(&chapter(1, json!([stub("manga", 100)])), ResourceKind::Chapter)
        .expect("chapter")
        .downcast::<Chapter>()
        .expect("chapter");

    let before = pool.stats();
    let found = chapter
        .relations()
        .try_get_relation::<Manga>(&pool, id(100))
        .expect("edge should be registered");
    assert_eq!(found.id(), id(100));
    assert_eq!(pool.stats(), before);
}

#[test]
fn pool_hits_are_registered_as_edges() {
    let (pool, _clock) = manual_pool();
    let chapter = pool
        .ingest_fragment(&chapter(1, json!([stub("manga", 100)])), ResourceKind::Chapter)
        .expect("chapter")
        .downcast::<Chapter>()
        .expect("chapter");
    assert!(chapter.relations().is_empty());

    let _manga = pool
        .ingest_fragment(&manga(100, json!([])), ResourceKind::Manga)
        .expect("manga");
    let key = ResourceKey::new(ResourceKind::Manga, id(100));
    assert!(!chapter.relations().contains(&key));

    let found = chapter
        .relations()
        .try_get_relation::<Manga>(&pool, id(100));
    assert!(found.is_some());
    assert!(chapter.relations().contains(&key));
}

#[test]
fn unknown_relations_ask_the_caller_to_fetch() {
    let (pool, _clock) = manual_pool();
    let chapter = pool
        .ingest_fragment(&chapter(1, json!([stub("manga", 100)])), ResourceKind::Chapter)
        .expect("chapter")
        .downcast::<Chapter>()
        .expect("chapter");

    assert!(chapter
        .relations()
        .try_get_relation::<Manga>(&pool, id(100))
        .is_none());
    // Wrong kind for a cached id is a miss too.
    assert!(chapter
        .relations()
        .try_get_relation::<ScanlationGroup>(&pool, id(1))
        .is_none());
}

#[test]
fn collection_lookup_reports_completeness() {
    let (pool, _clock) = manual_pool();
    let chapter = pool
        .ingest_fragment(
            &chapter(1, json!([expanded_group(10), stub("scanlation_group", 11)])),
            ResourceKind::Chapter,
        )
        .expect("chapter")
        .downcast::<Chapter>()
        .expect("chapter");

    let (found, complete) = chapter
        .relations()
        .try_get_relation_collection::<ScanlationGroup>(&pool, [id(10), id(11), id(10)]);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), id(10));
    assert!(!complete);

    let _late = pool
        .ingest_fragment(&group(11, json!([])), ResourceKind::ScanlationGroup)
        .expect("group");
    let (found, complete) = chapter
        .relations()
        .try_get_relation_collection::<ScanlationGroup>(&pool, chapter.group_ids());
    assert_eq!(
        found.iter().map(|group| group.id()).collect::<Vec<_>>(),
        vec![id(10), id(11)]
    );
    assert!(complete);
}

#[test]
fn edges_do_not_keep_targets_alive() {
    let (pool, clock) = manual_pool();
    let chapter = pool
        .ingest_fragment(&chapter(1, json!([expanded_group(10)])), ResourceKind::Chapter)
        .expect("chapter")
        .downcast::<Chapter>()
        .expect("chapter");
    let key = ResourceKey::new(ResourceKind::ScanlationGroup, id(10));
    assert!(chapter.relations().contains(&key));

    clock.advance(Duration::from_millis(pool.ttl_ms()));
    assert_eq!(pool.purge_expired(), 2);

    assert!(chapter.relations().get(&key).is_none());
    assert!(chapter.relations().is_empty());
    assert!(pool.lookup::<ScanlationGroup>(id(10)).is_none());
}

#[test]
fn dead_edges_are_replaced_on_the_next_link() {
    let (pool, clock) = manual_pool();
    let fragment = chapter(1, json!([expanded_group(10)]));
    let chapter = pool
        .ingest_fragment(&fragment, ResourceKind::Chapter)
        .expect("chapter");
    clock.advance(Duration::from_millis(pool.ttl_ms()));
    pool.purge_expired();

    let again = pool
        .ingest_fragment(&fragment, ResourceKind::Chapter)
        .expect("chapter again");
    assert!(again.ptr_eq(&chapter));

    let key = ResourceKey::new(ResourceKind::ScanlationGroup, id(10));
    let edge = chapter.relations().get(&key).expect("edge should be restored");
    let cached = pool
        .lookup::<ScanlationGroup>(id(10))
        .expect("group rebuilt");
    assert!(edge.ptr_eq(&cached.into()));
    assert_eq!(pool.stats().created, 3);
}

#[test]
fn typed_edge_listing_filters_by_kind() {
    let (pool, _clock) = manual_pool();
    let _manga = pool
        .ingest_fragment(&manga(100, json!([])), ResourceKind::Manga)
        .expect("manga");
    let chapter = pool
        .ingest_fragment(
            &chapter(
                1,
                json!([stub("manga", 100), expanded_group(10), expanded_group(11)]),
            ),
            ResourceKind::Chapter,
        )
        .expect("chapter");

    assert_eq!(chapter.relations().len(), 3);
    assert_eq!(chapter.relations().related::<ScanlationGroup>().len(), 2);
    assert_eq!(chapter.relations().related::<Manga>().len(), 1);
}
