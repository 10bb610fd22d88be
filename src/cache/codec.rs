//! Codec Module
//!
//! Type-directed conversion between values and the opaque bytes a store holds.

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};

// == Codec ==
/// Encodes values into store payloads and decodes them back.
///
/// The target type of `decode` selects the decoder, so one codec instance
/// serves every dataset type.
pub trait Codec: Send + Sync + 'static {
    /// Error reported when a value or payload cannot be converted.
    type Error: fmt::Display;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, Self::Error>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error>;
}

// == JSON Codec ==
/// Codec storing values as JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Error = serde_json::Error;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, Self::Error> {
        serde_json::to_vec(value)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Self::Error> {
        serde_json::from_slice(bytes)
    }
}
