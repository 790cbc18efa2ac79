// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Results returned to callers.
//!
//! Every result carries a status [`Code`] and the revision of the operation
//! that produced it. Results own their decoded payloads; `recycle()` consumes
//! the result and returns its buffers, so a recycled result cannot be touched
//! again. Dropping a result has the same effect.

use std::marker::PhantomData;

use super::error::Code;

/// A key-value record snapshot with its version metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvRecord<K, V> {
    key: K,
    value: V,
    create_rev: i64,
    mod_rev: i64,
    version: i64,
}

impl<K, V> KvRecord<K, V> {
    pub(crate) fn new(key: K, value: V, create_rev: i64, mod_rev: i64, version: i64) -> Self {
        Self {
            key,
            value,
            create_rev,
            mod_rev,
            version,
        }
    }

    /// Returns the key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the revision at which the key was created.
    #[inline]
    pub fn create_revision(&self) -> i64 {
        self.create_rev
    }

    /// Returns the revision of the last modification.
    #[inline]
    pub fn modified_revision(&self) -> i64 {
        self.mod_rev
    }

    /// Returns the number of modifications since creation.
    #[inline]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Splits the record into its key and value, dropping the metadata.
    pub fn into_key_value(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// A plain key-value pair, as emitted by the paged range iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kv<K, V> {
    key: K,
    value: V,
}

impl<K, V> Kv<K, V> {
    pub(crate) fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    /// Returns the key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Splits the pair into its parts.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

/// Result of a put operation.
#[derive(Debug)]
pub struct PutResult<K, V> {
    revision: i64,
    code: Code,
    prev_kv: Option<KvRecord<K, V>>,
}

impl<K, V> PutResult<K, V> {
    /// Returns the status code.
    #[inline]
    pub fn code(&self) -> Code {
        self.code
    }

    /// Returns the operation revision.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns the prior record, present iff the op requested it and the key
    /// previously existed.
    #[inline]
    pub fn prev_kv(&self) -> Option<&KvRecord<K, V>> {
        self.prev_kv.as_ref()
    }

    pub(crate) fn set_code(&mut self, code: Code) {
        self.code = code;
    }

    pub(crate) fn set_prev_kv(&mut self, prev_kv: KvRecord<K, V>) {
        self.prev_kv = Some(prev_kv);
    }

    /// Returns the result's buffers.
    pub fn recycle(self) {}
}

/// Result of a delete operation.
#[derive(Debug)]
pub struct DeleteResult<K, V> {
    revision: i64,
    code: Code,
    prev_kvs: Vec<KvRecord<K, V>>,
    num_deleted: i64,
}

impl<K, V> DeleteResult<K, V> {
    /// Returns the status code.
    #[inline]
    pub fn code(&self) -> Code {
        self.code
    }

    /// Returns the operation revision.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns the deleted records; empty unless the op requested them.
    #[inline]
    pub fn prev_kvs(&self) -> &[KvRecord<K, V>] {
        &self.prev_kvs
    }

    /// Returns the number of deleted records; 0 on the blind path.
    #[inline]
    pub fn num_deleted(&self) -> i64 {
        self.num_deleted
    }

    pub(crate) fn set_prev_kvs(&mut self, prev_kvs: Vec<KvRecord<K, V>>) {
        self.prev_kvs = prev_kvs;
    }

    pub(crate) fn set_num_deleted(&mut self, num_deleted: i64) {
        self.num_deleted = num_deleted;
    }

    /// Returns the result's buffers.
    pub fn recycle(self) {}
}

/// Result of a range operation.
#[derive(Debug)]
pub struct RangeResult<K, V> {
    revision: i64,
    code: Code,
    kvs: Vec<KvRecord<K, V>>,
    has_more: bool,
}

impl<K, V> RangeResult<K, V> {
    /// Returns the status code.
    #[inline]
    pub fn code(&self) -> Code {
        self.code
    }

    /// Returns the operation revision.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns the matched records, ascending by byte-lexicographic key.
    #[inline]
    pub fn kvs(&self) -> &[KvRecord<K, V>] {
        &self.kvs
    }

    /// Returns the number of matched records.
    #[inline]
    pub fn count(&self) -> usize {
        self.kvs.len()
    }

    /// Returns whether further in-range keys remained when the limit was hit.
    #[inline]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub(crate) fn set_kvs(&mut self, kvs: Vec<KvRecord<K, V>>) {
        self.kvs = kvs;
    }

    pub(crate) fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    pub(crate) fn take_kvs(&mut self) -> Vec<KvRecord<K, V>> {
        std::mem::take(&mut self.kvs)
    }

    /// Returns the result's buffers.
    pub fn recycle(self) {}
}

/// Result of one op executed inside a transaction branch.
#[derive(Debug)]
pub enum OpResult<K, V> {
    Put(PutResult<K, V>),
    Delete(DeleteResult<K, V>),
    Range(RangeResult<K, V>),
}

impl<K, V> OpResult<K, V> {
    /// Returns the status code of the inner result.
    pub fn code(&self) -> Code {
        match self {
            OpResult::Put(r) => r.code(),
            OpResult::Delete(r) => r.code(),
            OpResult::Range(r) => r.code(),
        }
    }

    /// Returns the result's buffers.
    pub fn recycle(self) {}
}

/// Result of a transaction.
#[derive(Debug)]
pub struct TxnResult<K, V> {
    revision: i64,
    code: Code,
    success: bool,
    results: Vec<OpResult<K, V>>,
}

impl<K, V> TxnResult<K, V> {
    /// Returns the status code.
    #[inline]
    pub fn code(&self) -> Code {
        self.code
    }

    /// Returns the transaction revision.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns whether the success branch ran.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the executed branch's results, positionally.
    #[inline]
    pub fn results(&self) -> &[OpResult<K, V>] {
        &self.results
    }

    pub(crate) fn set_code(&mut self, code: Code) {
        self.code = code;
    }

    pub(crate) fn set_success(&mut self, success: bool) {
        self.success = success;
    }

    pub(crate) fn set_results(&mut self, results: Vec<OpResult<K, V>>) {
        self.results = results;
    }

    /// Returns the result's buffers.
    pub fn recycle(self) {}
}

/// Factory producing result objects for the engine.
///
/// Results start with `code = OK` and empty payloads; the engine fills them
/// in before handing them to the caller.
#[derive(Debug)]
pub(crate) struct ResultFactory<K, V> {
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Default for ResultFactory<K, V> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<K, V> ResultFactory<K, V> {
    pub(crate) fn new_put_result(&self, revision: i64) -> PutResult<K, V> {
        PutResult {
            revision,
            code: Code::Ok,
            prev_kv: None,
        }
    }

    pub(crate) fn new_delete_result(&self, revision: i64) -> DeleteResult<K, V> {
        DeleteResult {
            revision,
            code: Code::Ok,
            prev_kvs: Vec::new(),
            num_deleted: 0,
        }
    }

    pub(crate) fn new_range_result(&self, revision: i64) -> RangeResult<K, V> {
        RangeResult {
            revision,
            code: Code::Ok,
            kvs: Vec::new(),
            has_more: false,
        }
    }

    pub(crate) fn new_txn_result(&self, revision: i64) -> TxnResult<K, V> {
        TxnResult {
            revision,
            code: Code::Ok,
            success: false,
            results: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_result_count_tracks_kvs() {
        let factory = ResultFactory::<String, String>::default();
        let mut result = factory.new_range_result(7);
        assert_eq!(result.count(), 0);
        result.set_kvs(vec![
            KvRecord::new("a".to_string(), "1".to_string(), 1, 1, 0),
            KvRecord::new("b".to_string(), "2".to_string(), 1, 2, 1),
        ]);
        assert_eq!(result.count(), 2);
        assert_eq!(result.revision(), 7);
        assert!(!result.has_more());
        result.recycle();
    }

    #[test]
    fn test_results_start_ok_and_empty() {
        let factory = ResultFactory::<String, String>::default();
        let put = factory.new_put_result(1);
        assert_eq!(put.code(), Code::Ok);
        assert!(put.prev_kv().is_none());

        let delete = factory.new_delete_result(1);
        assert_eq!(delete.num_deleted(), 0);
        assert!(delete.prev_kvs().is_empty());

        let txn = factory.new_txn_result(1);
        assert!(!txn.is_success());
        assert!(txn.results().is_empty());
    }
}
