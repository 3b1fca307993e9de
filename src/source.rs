//! Image sources and the loader that turns them into encoded bytes.
//!
//! Classification happens exactly once, when an [`ImageSource`] is built.
//! Everything downstream matches on the closed set of variants.
//!
//! | Input | Variant |
//! |---|---|
//! | `&str` / `String` that is valid base64 | [`ImageSource::Base64`] |
//! | any other `&str` / `String` | [`ImageSource::Path`] |
//! | `Path` / `PathBuf` | [`ImageSource::Path`] (no sniffing) |
//! | `Url`, `{"uri": ".."}` | [`ImageSource::Uri`] |
//! | `Vec<u8>`, `&[u8]`, `Bytes`, `{"type":"Buffer","data":[..]}` | [`ImageSource::Buffer`] |
//! | any `AsyncRead`, `tokio::fs::File` | [`ImageSource::Stream`] |

use crate::error::ThumbError;
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use bytes::Bytes;
use reqwest::Url;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::debug;

/// Standard alphabet, tolerant of non-zero trailing bits.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// One of the five forms an input image can arrive in.
pub enum ImageSource {
    Base64(String),
    Uri(Url),
    Path(PathBuf),
    Buffer(Vec<u8>),
    Stream(Box<dyn AsyncRead + Send + Unpin>),
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(text) => f.debug_tuple("Base64").field(&text.len()).finish(),
            Self::Uri(uri) => f.debug_tuple("Uri").field(&uri.as_str()).finish(),
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl ImageSource {
    /// Classify caller text: base64 when it validates as base64, a path otherwise.
    pub fn classify(text: impl Into<String>) -> Self {
        let text = text.into();
        if is_base64(&text) {
            Self::Base64(text)
        } else {
            Self::Path(PathBuf::from(text))
        }
    }

    pub fn uri(uri: &str) -> Result<Self, ThumbError> {
        Url::parse(uri)
            .map(Self::Uri)
            .map_err(|e| ThumbError::UnsupportedSource(format!("invalid uri {uri:?}: {e}")))
    }

    pub fn stream<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::Stream(Box::new(reader))
    }

    /// Build a source from a loosely typed value.
    ///
    /// Strings are classified like [`classify`](Self::classify). Objects are
    /// a serialized buffer (`{"type": "Buffer", "data": [..]}`) or a URI
    /// descriptor (`{"uri": ".."}`); arrays of byte values are buffers.
    /// Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self, ThumbError> {
        match value {
            Value::String(text) => Ok(Self::classify(text)),
            Value::Array(items) => bytes_from_array(&items).map(Self::Buffer),
            Value::Object(map) => {
                if map.get("type").and_then(Value::as_str) == Some("Buffer") {
                    if let Some(Value::Array(items)) = map.get("data") {
                        return bytes_from_array(items).map(Self::Buffer);
                    }
                }
                match map.get("uri") {
                    Some(Value::String(uri)) => Self::uri(uri),
                    Some(other) => Err(ThumbError::UnsupportedSource(format!(
                        "uri must be a string, got {}",
                        value_type(other)
                    ))),
                    None => Err(ThumbError::UnsupportedSource(
                        "object without a uri field".into(),
                    )),
                }
            }
            other => Err(ThumbError::UnsupportedSource(value_type(&other).into())),
        }
    }

    /// Short variant name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Base64(_) => "base64",
            Self::Uri(_) => "uri",
            Self::Path(_) => "path",
            Self::Buffer(_) => "buffer",
            Self::Stream(_) => "stream",
        }
    }
}

impl From<String> for ImageSource {
    fn from(text: String) -> Self {
        Self::classify(text)
    }
}

impl From<&str> for ImageSource {
    fn from(text: &str) -> Self {
        Self::classify(text)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Url> for ImageSource {
    fn from(uri: Url) -> Self {
        Self::Uri(uri)
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Buffer(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Buffer(bytes.to_vec())
    }
}

impl From<Bytes> for ImageSource {
    fn from(bytes: Bytes) -> Self {
        Self::Buffer(bytes.to_vec())
    }
}

impl From<tokio::fs::File> for ImageSource {
    fn from(file: tokio::fs::File) -> Self {
        Self::stream(file)
    }
}

/// Whether `text` is well-formed base64.
///
/// Non-empty, a multiple of four long, only `A-Z a-z 0-9 + / =`, and `=`
/// only as one or two trailing padding characters.
pub fn is_base64(text: &str) -> bool {
    let len = text.len();
    if len == 0 || len % 4 != 0 {
        return false;
    }
    if !text
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
    {
        return false;
    }
    match text.find('=') {
        None => true,
        Some(first) if first == len - 1 => true,
        Some(first) => first == len - 2 && text.ends_with('='),
    }
}

fn bytes_from_array(items: &[Value]) -> Result<Vec<u8>, ThumbError> {
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| {
                    ThumbError::UnsupportedSource(format!("buffer element {item} is not a byte"))
                })
        })
        .collect()
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Encoded image bytes plus the file they came from, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub bytes: Vec<u8>,
    pub path: Option<PathBuf>,
}

impl LoadedImage {
    fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, path: None }
    }
}

/// Produce the encoded bytes for `source`.
pub async fn load(source: ImageSource, client: &reqwest::Client) -> Result<LoadedImage, ThumbError> {
    let loaded = match source {
        ImageSource::Base64(text) => BASE64
            .decode(text.as_bytes())
            .map(LoadedImage::from_bytes)
            .map_err(|e| ThumbError::UnsupportedSource(format!("invalid base64: {e}")))?,
        ImageSource::Uri(uri) => LoadedImage::from_bytes(fetch(client, &uri).await?),
        ImageSource::Path(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| ThumbError::Filesystem {
                    path: path.clone(),
                    source,
                })?;
            LoadedImage {
                bytes,
                path: Some(path),
            }
        }
        ImageSource::Buffer(bytes) => LoadedImage::from_bytes(bytes),
        ImageSource::Stream(mut reader) => {
            let mut bytes = Vec::new();
            reader
                .read_to_end(&mut bytes)
                .await
                .map_err(ThumbError::Stream)?;
            LoadedImage::from_bytes(bytes)
        }
    };
    debug!(bytes = loaded.bytes.len(), "source loaded");
    Ok(loaded)
}

/// Single GET; any transport failure or non-2xx status is a fetch error.
async fn fetch(client: &reqwest::Client, uri: &Url) -> Result<Vec<u8>, ThumbError> {
    let fetch_error = |source| ThumbError::Fetch {
        uri: uri.to_string(),
        source,
    };
    let response = client
        .get(uri.clone())
        .send()
        .await
        .map_err(fetch_error)?
        .error_for_status()
        .map_err(fetch_error)?;
    let body = response.bytes().await.map_err(fetch_error)?;
    Ok(body.to_vec())
}
