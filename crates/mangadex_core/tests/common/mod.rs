#![allow(dead_code)]

use mangadex_core::{ManualClock, PoolConfig, ResourcePool};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

pub const STAMP: &str = "2021-04-19T21:45:59+00:00";

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn stub(kind: &str, n: u128) -> Value {
    json!({"id": id(n).to_string(), "type": kind})
}

pub fn chapter(n: u128, relationships: Value) -> Value {
    json!({
        "id": id(n).to_string(),
        "type": "chapter",
        "attributes": {
            "title": "Arrival",
            "volume": "1",
            "chapter": "1",
            "pages": 18,
            "translatedLanguage": "en",
            "externalUrl": null,
            "publishAt": STAMP,
            "createdAt": STAMP,
            "updatedAt": STAMP,
            "version": 1
        },
        "relationships": relationships,
    })
}

pub fn manga_attributes(version: i32, tags: Value) -> Value {
    json!({
        "title": {"en": "Blue Period"},
        "altTitles": [{"ja": "ブルーピリオド"}],
        "description": [],
        "isLocked": false,
        "links": {"al": "100982"},
        "originalLanguage": "ja",
        "lastVolume": null,
        "lastChapter": null,
        "publicationDemographic": "seinen",
        "status": "ongoing",
        "year": 2017,
        "contentRating": "safe",
        "state": "published",
        "tags": tags,
        "createdAt": STAMP,
        "updatedAt": STAMP,
        "version": version
    })
}

pub fn manga(n: u128, relationships: Value) -> Value {
    json!({
        "id": id(n).to_string(),
        "type": "manga",
        "attributes": manga_attributes(1, json!([])),
        "relationships": relationships,
    })
}

pub fn tag(n: u128, name: &str) -> Value {
    json!({
        "id": id(n).to_string(),
        "type": "tag",
        "attributes": {"name": {"en": name}, "description": {}, "group": "genre", "version": 1},
        "relationships": [],
    })
}

pub fn author_attributes(name: &str) -> Value {
    json!({
        "name": name,
        "biography": {"en": "Mangaka."},
        "twitter": "https://twitter.com/example",
        "createdAt": STAMP,
        "updatedAt": STAMP,
        "version": 1
    })
}

pub fn author(n: u128, type_tag: &str, relationships: Value) -> Value {
    json!({
        "id": id(n).to_string(),
        "type": type_tag,
        "attributes": author_attributes("Yamaguchi Tsubasa"),
        "relationships": relationships,
    })
}

pub fn group_attributes(name: &str) -> Value {
    json!({
        "name": name,
        "altNames": [],
        "locked": false,
        "official": false,
        "website": "https://example.org",
        "discord": "abc123",
        "focusedLanguages": ["en"],
        "createdAt": STAMP,
        "updatedAt": STAMP,
        "version": 3
    })
}

pub fn group(n: u128, relationships: Value) -> Value {
    json!({
        "id": id(n).to_string(),
        "type": "scanlation_group",
        "attributes": group_attributes("Night Owls"),
        "relationships": relationships,
    })
}

pub fn cover_attributes(file_name: &str) -> Value {
    json!({
        "fileName": file_name,
        "description": "",
        "volume": "1",
        "locale": "ja",
        "createdAt": STAMP,
        "updatedAt": STAMP,
        "version": 1
    })
}

pub fn entity(data: Value) -> Vec<u8> {
    serde_json::to_vec(&json!({"result": "ok", "response": "entity", "data": data}))
        .expect("fixture should serialize")
}

pub fn collection(data: Vec<Value>) -> Vec<u8> {
    let total = data.len();
    serde_json::to_vec(&json!({
        "result": "ok",
        "response": "collection",
        "data": data,
        "limit": 10,
        "offset": 0,
        "total": total
    }))
    .expect("fixture should serialize")
}

pub fn not_found() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "result": "error",
        "errors": [{
            "id": id(9_999).to_string(),
            "status": 404,
            "title": "Not found",
            "detail": "Resource could not be found"
        }]
    }))
    .expect("fixture should serialize")
}

pub fn manual_pool() -> (ResourcePool, Arc<ManualClock>) {
    manual_pool_with(PoolConfig::default())
}

pub fn manual_pool_with(config: PoolConfig) -> (ResourcePool, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let pool = ResourcePool::with_clock(config, clock.clone()).expect("registry should validate");
    (pool, clock)
}
