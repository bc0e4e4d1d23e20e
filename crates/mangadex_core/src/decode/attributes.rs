//! Per-kind attribute shapes.
//!
//! Each kind has one fixed shape. Declared fields are checked strictly,
//! undeclared keys are ignored so new API fields do not break decoding.

use super::{DecodeError, DecodeResult};
use crate::model::enums::{
    ContentRating, CustomListVisibility, MangaState, MangaStatus, PublicationDemographic,
    TagGroup,
};
use crate::model::kind::ResourceKind;
use crate::model::localized::LocalizedString;
use crate::model::Timestamp;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn first_version() -> i32 {
    1
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaAttributes {
    pub title: LocalizedString,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alt_titles: Vec<LocalizedString>,
    #[serde(default)]
    pub description: LocalizedString,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub links: LocalizedString,
    pub original_language: String,
    #[serde(default)]
    pub last_volume: Option<String>,
    #[serde(default)]
    pub last_chapter: Option<String>,
    #[serde(default)]
    pub publication_demographic: Option<PublicationDemographic>,
    #[serde(default)]
    pub status: Option<MangaStatus>,
    #[serde(default)]
    pub year: Option<i32>,
    pub content_rating: ContentRating,
    #[serde(default)]
    pub state: Option<MangaState>,
    /// Full tag fragments; moved into `TransferRecord::embedded` after decode.
    #[serde(default, deserialize_with = "null_as_default")]
    pub(crate) tags: Vec<Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default = "first_version")]
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterAttributes {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub pages: u32,
    pub translated_language: String,
    #[serde(default)]
    pub external_url: Option<String>,
    pub publish_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default = "first_version")]
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttributes {
    pub name: String,
    #[serde(default)]
    pub biography: LocalizedString,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub pixiv: Option<String>,
    #[serde(default)]
    pub melon_book: Option<String>,
    #[serde(default)]
    pub fan_box: Option<String>,
    #[serde(default)]
    pub booth: Option<String>,
    #[serde(default)]
    pub nico_video: Option<String>,
    #[serde(default)]
    pub skeb: Option<String>,
    #[serde(default)]
    pub fantia: Option<String>,
    #[serde(default)]
    pub tumblr: Option<String>,
    #[serde(default)]
    pub youtube: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default = "first_version")]
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAttributes {
    pub name: LocalizedString,
    #[serde(default)]
    pub description: LocalizedString,
    pub group: TagGroup,
    #[serde(default = "first_version")]
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAttributes {
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    #[serde(default = "first_version")]
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverArtAttributes {
    pub file_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default = "first_version")]
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanlationGroupAttributes {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alt_names: Vec<LocalizedString>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub official: bool,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub irc_server: Option<String>,
    #[serde(default)]
    pub irc_channel: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub focused_languages: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default = "first_version")]
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomListAttributes {
    pub name: String,
    pub visibility: CustomListVisibility,
    #[serde(default = "first_version")]
    pub version: i32,
}

/// Closed union of attribute shapes, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeBlock {
    Manga(Box<MangaAttributes>),
    Chapter(Box<ChapterAttributes>),
    Author(Box<AuthorAttributes>),
    Tag(TagAttributes),
    User(UserAttributes),
    CoverArt(CoverArtAttributes),
    ScanlationGroup(Box<ScanlationGroupAttributes>),
    CustomList(CustomListAttributes),
}

impl AttributeBlock {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Manga(_) => ResourceKind::Manga,
            Self::Chapter(_) => ResourceKind::Chapter,
            Self::Author(_) => ResourceKind::Author,
            Self::Tag(_) => ResourceKind::Tag,
            Self::User(_) => ResourceKind::User,
            Self::CoverArt(_) => ResourceKind::CoverArt,
            Self::ScanlationGroup(_) => ResourceKind::ScanlationGroup,
            Self::CustomList(_) => ResourceKind::CustomList,
        }
    }

    pub fn version(&self) -> i32 {
        match self {
            Self::Manga(attributes) => attributes.version,
            Self::Chapter(attributes) => attributes.version,
            Self::Author(attributes) => attributes.version,
            Self::Tag(attributes) => attributes.version,
            Self::User(attributes) => attributes.version,
            Self::CoverArt(attributes) => attributes.version,
            Self::ScanlationGroup(attributes) => attributes.version,
            Self::CustomList(attributes) => attributes.version,
        }
    }
}

fn shape<T>(kind: ResourceKind, value: &Value) -> DecodeResult<T>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(value).map_err(|err| DecodeError::AttributeShape {
        kind,
        message: err.to_string(),
    })
}

/// Decodes the attribute block of a `kind` fragment.
pub fn decode_attributes(kind: ResourceKind, value: &Value) -> DecodeResult<AttributeBlock> {
    if !value.is_object() {
        return Err(DecodeError::AttributeShape {
            kind,
            message: "attributes must be an object".to_string(),
        });
    }

    let block = match kind {
        ResourceKind::Manga => AttributeBlock::Manga(Box::new(shape(kind, value)?)),
        ResourceKind::Chapter => AttributeBlock::Chapter(Box::new(shape(kind, value)?)),
        ResourceKind::Author => AttributeBlock::Author(Box::new(shape(kind, value)?)),
        ResourceKind::Tag => AttributeBlock::Tag(shape(kind, value)?),
        ResourceKind::User => AttributeBlock::User(shape(kind, value)?),
        ResourceKind::CoverArt => AttributeBlock::CoverArt(shape(kind, value)?),
        ResourceKind::ScanlationGroup => {
            AttributeBlock::ScanlationGroup(Box::new(shape(kind, value)?))
        }
        ResourceKind::CustomList => AttributeBlock::CustomList(shape(kind, value)?),
    };
    Ok(block)
}
