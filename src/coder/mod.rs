// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Pluggable byte codecs for keys and values.
//!
//! The store manipulates encoded byte forms exclusively; byte-lexicographic
//! order over the encoded keys defines all range semantics. Applications
//! inject a codec per type at store construction.

use bytes::Bytes;

/// Errors that can occur while encoding or decoding application types.
#[derive(Debug, thiserror::Error)]
pub enum CoderError {
    #[error("invalid utf8 sequence: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// A byte codec for an application type.
///
/// `encode` must be total; `decode` fails on malformed input. Range semantics
/// follow byte-lexicographic order of the encoded form, so key codecs should
/// be order-preserving if callers rely on typed range bounds.
pub trait Coder<T>: Send + Sync {
    /// Encodes a value into its byte form.
    fn encode(&self, value: &T) -> Bytes;

    /// Decodes a value from its byte form.
    fn decode(&self, bytes: &[u8]) -> Result<T, CoderError>;
}

/// Codec for UTF-8 strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringUtf8Coder;

impl StringUtf8Coder {
    /// Creates a new UTF-8 string codec.
    pub fn new() -> Self {
        Self
    }
}

impl Coder<String> for StringUtf8Coder {
    fn encode(&self, value: &String) -> Bytes {
        Bytes::copy_from_slice(value.as_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> Result<String, CoderError> {
        Ok(std::str::from_utf8(bytes)?.to_string())
    }
}

/// Identity codec for raw byte values.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCoder;

impl BytesCoder {
    /// Creates a new identity byte codec.
    pub fn new() -> Self {
        Self
    }
}

impl Coder<Bytes> for BytesCoder {
    fn encode(&self, value: &Bytes) -> Bytes {
        value.clone()
    }

    fn decode(&self, bytes: &[u8]) -> Result<Bytes, CoderError> {
        Ok(Bytes::copy_from_slice(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_roundtrip() {
        let coder = StringUtf8Coder::new();
        let encoded = coder.encode(&"hello".to_string());
        assert_eq!(encoded.as_ref(), b"hello");
        assert_eq!(coder.decode(&encoded).unwrap(), "hello");
    }

    #[test]
    fn test_string_invalid_utf8() {
        let coder = StringUtf8Coder::new();
        assert!(matches!(
            coder.decode(&[0xff, 0xfe]),
            Err(CoderError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let coder = BytesCoder::new();
        let value = Bytes::from_static(&[0, 1, 2, 0xff]);
        let encoded = coder.encode(&value);
        assert_eq!(encoded, value);
        assert_eq!(coder.decode(&encoded).unwrap(), value);
    }
}
