// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Per-key MVCC record and its codec.
//!
//! Each live key stores exactly one record carrying its version metadata and
//! current value. The serialized form is a fixed big-endian header followed
//! by the value bytes:
//!
//! `[create_rev:i64][mod_rev:i64][version:i64][value_len:i32][value bytes]`
//!
//! Big-endian keeps the format portable across implementations.

use std::cmp::Ordering;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::coder::Coder;

use super::error::StoreError;
use super::result::KvRecord;

/// Size of the fixed record header in bytes.
pub(crate) const RECORD_HEADER_LEN: usize = 8 + 8 + 8 + 4;

/// The version metadata and current value stored for a live key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MvccRecord {
    /// Revision at which the current incarnation of the key was created.
    pub(crate) create_rev: i64,
    /// Revision of the most recent modification.
    pub(crate) mod_rev: i64,
    /// Number of modifications since creation; 0 on creation.
    pub(crate) version: i64,
    /// Encoded value bytes.
    pub(crate) value: Bytes,
}

impl MvccRecord {
    /// Creates a record for a key first written at `revision`.
    pub fn created_at(revision: i64, value: Bytes) -> Self {
        Self {
            create_rev: revision,
            mod_rev: revision,
            version: 0,
            value,
        }
    }

    /// Returns the creation revision.
    #[inline]
    pub fn create_rev(&self) -> i64 {
        self.create_rev
    }

    /// Returns the last-modification revision.
    #[inline]
    pub fn mod_rev(&self) -> i64 {
        self.mod_rev
    }

    /// Returns the number of modifications since creation.
    #[inline]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Returns the encoded value bytes.
    #[inline]
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Compares the record's mod revision against a caller revision.
    #[inline]
    pub fn compare_mod_rev(&self, revision: i64) -> Ordering {
        self.mod_rev.cmp(&revision)
    }

    /// Compares the record's create revision against a caller revision.
    #[inline]
    pub fn compare_create_rev(&self, revision: i64) -> Ordering {
        self.create_rev.cmp(&revision)
    }

    /// Compares the record's version counter against a caller value.
    #[inline]
    pub fn compare_version(&self, version: i64) -> Ordering {
        self.version.cmp(&version)
    }

    /// Serializes the record into its storage form.
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(RECORD_HEADER_LEN + self.value.len());
        buf.put_i64(self.create_rev);
        buf.put_i64(self.mod_rev);
        buf.put_i64(self.version);
        buf.put_i32(self.value.len() as i32);
        buf.extend_from_slice(&self.value);
        buf.freeze()
    }

    /// Deserializes a record from its storage form.
    ///
    /// A malformed payload indicates corruption of the underlying store.
    pub fn decode(mut bytes: &[u8]) -> Result<Self, StoreError> {
        if bytes.remaining() < RECORD_HEADER_LEN {
            return Err(StoreError::Corruption(format!(
                "record too short: {} bytes, header needs {}",
                bytes.remaining(),
                RECORD_HEADER_LEN
            )));
        }
        let create_rev = bytes.get_i64();
        let mod_rev = bytes.get_i64();
        let version = bytes.get_i64();
        let value_len = bytes.get_i32();
        if value_len < 0 {
            return Err(StoreError::Corruption(format!(
                "negative value length {value_len}"
            )));
        }
        if value_len as usize > bytes.remaining() {
            return Err(StoreError::Corruption(format!(
                "value length {} exceeds remaining {} bytes",
                value_len,
                bytes.remaining()
            )));
        }
        let value = Bytes::copy_from_slice(&bytes[..value_len as usize]);
        Ok(Self {
            create_rev,
            mod_rev,
            version,
            value,
        })
    }

    /// Converts this record into a caller-facing [`KvRecord`], decoding the
    /// value with the supplied codec.
    pub fn into_kv_record<K, V>(
        self,
        key: K,
        val_coder: &dyn Coder<V>,
    ) -> Result<KvRecord<K, V>, StoreError> {
        let value = val_coder.decode(&self.value)?;
        Ok(KvRecord::new(
            key,
            value,
            self.create_rev,
            self.mod_rev,
            self.version,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let record = MvccRecord {
            create_rev: 1,
            mod_rev: 7,
            version: 6,
            value: Bytes::from_static(b"value"),
        };
        let encoded = record.encode();
        assert_eq!(encoded.len(), RECORD_HEADER_LEN + 5);
        let decoded = MvccRecord::decode(&encoded).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_encode_decode_empty_value() {
        let record = MvccRecord::created_at(42, Bytes::new());
        let decoded = MvccRecord::decode(&record.encode()).unwrap();
        assert_eq!(decoded.create_rev(), 42);
        assert_eq!(decoded.mod_rev(), 42);
        assert_eq!(decoded.version(), 0);
        assert!(decoded.value().is_empty());
    }

    #[test]
    fn test_created_at() {
        let record = MvccRecord::created_at(9, Bytes::from_static(b"v"));
        assert_eq!(record.create_rev(), 9);
        assert_eq!(record.mod_rev(), 9);
        assert_eq!(record.version(), 0);
    }

    #[test]
    fn test_compare_revisions() {
        let record = MvccRecord {
            create_rev: 3,
            mod_rev: 8,
            version: 2,
            value: Bytes::new(),
        };
        assert_eq!(record.compare_mod_rev(9), Ordering::Less);
        assert_eq!(record.compare_mod_rev(8), Ordering::Equal);
        assert_eq!(record.compare_create_rev(1), Ordering::Greater);
        assert_eq!(record.compare_version(2), Ordering::Equal);
    }

    #[test]
    fn test_decode_too_short() {
        let result = MvccRecord::decode(&[0u8; RECORD_HEADER_LEN - 1]);
        assert!(matches!(result, Err(StoreError::Corruption(_))));
    }

    #[test]
    fn test_decode_truncated_value() {
        let record = MvccRecord::created_at(1, Bytes::from_static(b"value"));
        let encoded = record.encode();
        // Drop the last byte of the value.
        let result = MvccRecord::decode(&encoded[..encoded.len() - 1]);
        assert!(matches!(result, Err(StoreError::Corruption(_))));
    }

    #[test]
    fn test_decode_negative_value_len() {
        let mut buf = BytesMut::new();
        buf.put_i64(1);
        buf.put_i64(1);
        buf.put_i64(0);
        buf.put_i32(-1);
        let result = MvccRecord::decode(&buf);
        assert!(matches!(result, Err(StoreError::Corruption(_))));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn record_roundtrip(
            create_rev in 0i64..i64::MAX / 2,
            rev_gap in 0i64..1_000_000,
            version in 0i64..1_000_000,
            value_bytes in prop::collection::vec(any::<u8>(), 0..256),
        ) {
            let record = MvccRecord {
                create_rev,
                mod_rev: create_rev + rev_gap,
                version,
                value: Bytes::from(value_bytes),
            };
            let decoded = MvccRecord::decode(&record.encode()).unwrap();
            prop_assert_eq!(decoded, record);
        }

        #[test]
        fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = MvccRecord::decode(&bytes);
        }
    }
}
