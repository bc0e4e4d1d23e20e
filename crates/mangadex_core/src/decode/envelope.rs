//! Response envelopes and API error payloads.
//!
//! Successful responses wrap data as
//! `{result: "ok", response: "entity"|"collection", data, ...}`. Failed ones
//! carry `{result: "error", errors: [...]}`.

use super::DecodeError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const RESULT_OK: &str = "ok";
const RESULT_ERROR: &str = "error";

/// Unwrapped payload of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Entity(Value),
    Collection(CollectionPage),
}

/// Page of fragments from a collection response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionPage {
    pub data: Vec<Value>,
    pub limit: u32,
    pub offset: u32,
    pub total: u32,
}

/// Error class derived from the first error's HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Other(u16),
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            other => Self::Other(other),
        }
    }
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    pub id: Uuid,
    pub status: u16,
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

/// Error response returned by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub errors: Vec<ApiErrorDetail>,
}

impl ApiError {
    pub fn first(&self) -> Option<&ApiErrorDetail> {
        self.errors.first()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.first() {
            Some(detail) => write!(
                f,
                "api error {:?} ({}): {}",
                self.kind, detail.status, detail.title
            ),
            None => write!(f, "api error {:?}", self.kind),
        }
    }
}

impl Error for ApiError {}

/// Failure to turn a response document into fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    Decode(DecodeError),
    Api(ApiError),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "{err}"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Api(err) => Some(err),
        }
    }
}

impl From<DecodeError> for DocumentError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<ApiError> for DocumentError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.into())
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Parses a raw response body and unwraps its envelope.
///
/// # Errors
/// - `Api` when the body is an error response.
/// - `Decode` when the body is not JSON or the envelope shape is unknown.
pub fn open_envelope(bytes: &[u8]) -> DocumentResult<Envelope> {
    let value: Value = serde_json::from_slice(bytes)?;
    let object = value
        .as_object()
        .ok_or_else(|| DecodeError::UnexpectedEnvelope("body is not an object".to_string()))?;

    match object.get("result").and_then(Value::as_str) {
        Some(RESULT_OK) => open_ok(object),
        Some(RESULT_ERROR) => Err(api_error(object)?.into()),
        Some(other) => Err(DecodeError::UnexpectedEnvelope(format!("result `{other}`")).into()),
        None => Err(DecodeError::UnexpectedEnvelope("missing `result`".to_string()).into()),
    }
}

fn open_ok(object: &Map<String, Value>) -> DocumentResult<Envelope> {
    let data = object
        .get("data")
        .ok_or_else(|| DecodeError::UnexpectedEnvelope("missing `data`".to_string()))?;

    let response = object.get("response").and_then(Value::as_str);
    match (response, data) {
        (Some("entity") | None, Value::Object(_)) => Ok(Envelope::Entity(data.clone())),
        (Some("collection") | None, Value::Array(items)) => {
            Ok(Envelope::Collection(CollectionPage {
                data: items.clone(),
                limit: read_count(object, "limit"),
                offset: read_count(object, "offset"),
                total: read_count(object, "total"),
            }))
        }
        (Some(kind), _) => Err(DecodeError::UnexpectedEnvelope(format!(
            "response `{kind}` does not match the data shape"
        ))
        .into()),
        (None, _) => {
            Err(DecodeError::UnexpectedEnvelope("data is neither object nor array".to_string())
                .into())
        }
    }
}

fn read_count(object: &Map<String, Value>, field: &str) -> u32 {
    object
        .get(field)
        .and_then(Value::as_u64)
        .and_then(|count| u32::try_from(count).ok())
        .unwrap_or(0)
}

fn api_error(object: &Map<String, Value>) -> DocumentResult<ApiError> {
    let errors: Vec<ApiErrorDetail> = match object.get("errors") {
        Some(raw) => Vec::deserialize(raw)?,
        None => Vec::new(),
    };
    let kind = errors
        .first()
        .map(|detail| ApiErrorKind::from_status(detail.status))
        .unwrap_or(ApiErrorKind::Other(0));
    Ok(ApiError { kind, errors })
}

#[cfg(test)]
mod tests {
    use super::{open_envelope, ApiErrorKind, DocumentError, Envelope};
    use crate::decode::DecodeError;
    use serde_json::json;

    fn bytes(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).expect("fixture should serialize")
    }

    #[test]
    fn opens_entity_and_collection() {
        let entity = open_envelope(&bytes(json!({
            "result": "ok", "response": "entity", "data": {"id": "x"}
        })))
        .expect("entity should open");
        assert!(matches!(entity, Envelope::Entity(_)));

        let collection = open_envelope(&bytes(json!({
            "result": "ok", "response": "collection",
            "data": [{"id": "a"}, {"id": "b"}], "limit": 10, "offset": 20, "total": 42
        })))
        .expect("collection should open");
        match collection {
            Envelope::Collection(page) => {
                assert_eq!(page.data.len(), 2);
                assert_eq!((page.limit, page.offset, page.total), (10, 20, 42));
            }
            other => panic!("unexpected envelope {other:?}"),
        }
    }

    #[test]
    fn error_response_maps_status() {
        let err = open_envelope(&bytes(json!({
            "result": "error",
            "errors": [{
                "id": "0b8c3f0e-2f3c-4b8a-9a3e-6f6f1b2c3d4e",
                "status": 404,
                "title": "Not found",
                "detail": "Manga could not be found"
            }]
        })))
        .expect_err("error responses must fail");
        match err {
            DocumentError::Api(api) => {
                assert_eq!(api.kind, ApiErrorKind::NotFound);
                assert!(api.is_not_found());
                assert_eq!(
                    api.first().and_then(|detail| detail.detail.as_deref()),
                    Some("Manga could not be found")
                );
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn mismatched_response_shape_is_rejected() {
        let err = open_envelope(&bytes(json!({
            "result": "ok", "response": "entity", "data": []
        })))
        .expect_err("entity data must be an object");
        assert!(matches!(
            err,
            DocumentError::Decode(DecodeError::UnexpectedEnvelope(_))
        ));
    }

    #[test]
    fn status_classes() {
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(ApiErrorKind::from_status(403), ApiErrorKind::Forbidden);
        assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::Other(503));
    }
}
