//! Decoders turn response bytes into typed values.

use crate::error::{DecodeError, NetworkError};
use crate::http::ResponseMetadata;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

pub trait Decoder<T>: Send + Sync {
    fn decode(&self, body: &Bytes, response: &ResponseMetadata) -> Result<T, DecodeError>;
}

/// Passes the body through untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesDecoder;

impl Decoder<Bytes> for BytesDecoder {
    fn decode(&self, body: &Bytes, _response: &ResponseMetadata) -> Result<Bytes, DecodeError> {
        Ok(body.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder;

impl Decoder<String> for Utf8Decoder {
    fn decode(&self, body: &Bytes, _response: &ResponseMetadata) -> Result<String, DecodeError> {
        String::from_utf8(body.to_vec()).map_err(|e| DecodeError::new("String", e.to_string()))
    }
}

pub struct JsonDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for JsonDecoder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonDecoder")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> Decoder<T> for JsonDecoder<T> {
    fn decode(&self, body: &Bytes, _response: &ResponseMetadata) -> Result<T, DecodeError> {
        serde_json::from_slice(body)
            .map_err(|e| DecodeError::new(std::any::type_name::<T>(), e.to_string()))
    }
}

/// Secondary decoder consulted only on failure paths
pub trait ErrorBodyDecoder: Send + Sync {
    /// Wrap `original` with whatever the body says; return it unchanged if the body is
    /// not understood
    fn decode_error(
        &self,
        body: &Bytes,
        response: Option<&ResponseMetadata>,
        original: NetworkError,
    ) -> NetworkError;
}

/// Reads `message` or `error` (string or `{ "message": .. }`) from a JSON error body
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonErrorBodyDecoder;

impl JsonErrorBodyDecoder {
    fn extract(value: &serde_json::Value) -> Option<String> {
        ["message", "error", "detail"].iter().find_map(|field| {
            match value.get(field)? {
                serde_json::Value::String(message) => Some(message.clone()),
                nested @ serde_json::Value::Object(_) => Self::extract(nested),
                _ => None,
            }
        })
    }
}

impl ErrorBodyDecoder for JsonErrorBodyDecoder {
    fn decode_error(
        &self,
        body: &Bytes,
        _response: Option<&ResponseMetadata>,
        original: NetworkError,
    ) -> NetworkError {
        let message = serde_json::from_slice::<serde_json::Value>(body)
            .ok()
            .as_ref()
            .and_then(Self::extract);
        match message {
            Some(message) => NetworkError::ErrorBody {
                message,
                cause: Box::new(original),
            },
            None => original,
        }
    }
}
