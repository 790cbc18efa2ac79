// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Operation descriptors and the factory that builds them.
//!
//! Operations are immutable value objects once built. Builders enforce
//! required fields at `build()` time; the engine dispatches on the [`Op`]
//! sum type.

use std::marker::PhantomData;

use super::error::StoreError;
use super::record::MvccRecord;

/// Revision carried by an op that did not set one explicitly.
///
/// Sub-ops inside a transaction execute at the transaction revision, so they
/// normally leave their own revision unset.
pub const UNSET_REVISION: i64 = -1;

/// No-limit sentinel for range scans.
pub const NO_LIMIT: i64 = -1;

/// The record field a compare predicate inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareTarget {
    /// The key's last-modification revision.
    Mod,
    /// The key's creation revision.
    Create,
    /// The key's version counter.
    Version,
    /// The key's value bytes (byte-lexicographic comparison).
    Value,
}

/// The relation a compare predicate requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareResult {
    Less,
    Equal,
    Greater,
    NotEqual,
}

/// A single compare predicate inside a transaction.
#[derive(Debug, Clone)]
pub struct CompareOp<K, V> {
    target: CompareTarget,
    result: CompareResult,
    key: K,
    revision: i64,
    value: Option<V>,
}

impl<K, V> CompareOp<K, V> {
    /// Returns the inspected record field.
    #[inline]
    pub fn target(&self) -> CompareTarget {
        self.target
    }

    /// Returns the required relation.
    #[inline]
    pub fn result(&self) -> CompareResult {
        self.result
    }

    /// Returns the compared key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the revision (or version) operand.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns the value operand for [`CompareTarget::Value`] predicates.
    #[inline]
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }
}

/// A put of `value` at `key`, tagged with the caller's revision.
#[derive(Debug, Clone)]
pub struct PutOp<K, V> {
    key: K,
    value: V,
    revision: i64,
    prev_kv: bool,
}

impl<K, V> PutOp<K, V> {
    /// Returns the target key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the value to store.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the caller-supplied revision.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns whether the prior record should be returned.
    #[inline]
    pub fn prev_kv(&self) -> bool {
        self.prev_kv
    }
}

/// Builder for [`PutOp`]. `key` and `value` are required.
pub struct PutOpBuilder<K, V> {
    key: Option<K>,
    value: Option<V>,
    revision: i64,
    prev_kv: bool,
}

impl<K, V> PutOpBuilder<K, V> {
    /// Sets the target key.
    pub fn key(mut self, key: K) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the value to store.
    pub fn value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the caller revision.
    pub fn revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    /// Requests the prior record in the result.
    pub fn prev_kv(mut self, prev_kv: bool) -> Self {
        self.prev_kv = prev_kv;
        self
    }

    /// Builds the op, failing if a required field is unset.
    pub fn build(self) -> Result<PutOp<K, V>, StoreError> {
        let key = self
            .key
            .ok_or_else(|| StoreError::IllegalOp("put op requires a key".into()))?;
        let value = self
            .value
            .ok_or_else(|| StoreError::IllegalOp("put op requires a value".into()))?;
        Ok(PutOp {
            key,
            value,
            revision: self.revision,
            prev_kv: self.prev_kv,
        })
    }
}

/// A delete of a single key or an inclusive key range.
#[derive(Debug, Clone)]
pub struct DeleteOp<K> {
    key: Option<K>,
    end_key: Option<K>,
    is_range: bool,
    revision: i64,
    prev_kv: bool,
}

impl<K> DeleteOp<K> {
    /// Returns the start key; `None` means the first live key.
    #[inline]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Returns the inclusive end key; `None` on a range op means the last
    /// live key.
    #[inline]
    pub fn end_key(&self) -> Option<&K> {
        self.end_key.as_ref()
    }

    /// Returns whether this deletes a range rather than a single key.
    #[inline]
    pub fn is_range(&self) -> bool {
        self.is_range || self.end_key.is_some()
    }

    /// Returns the caller-supplied revision.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns whether the deleted records should be returned.
    #[inline]
    pub fn prev_kv(&self) -> bool {
        self.prev_kv
    }
}

/// Builder for [`DeleteOp`]. A single-key delete requires a key; a range
/// delete accepts open-ended bounds.
pub struct DeleteOpBuilder<K> {
    key: Option<K>,
    end_key: Option<K>,
    is_range: bool,
    revision: i64,
    prev_kv: bool,
}

impl<K> DeleteOpBuilder<K> {
    /// Sets the start key.
    pub fn key(mut self, key: K) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the start key from an option; `None` means the first live key.
    pub fn nullable_key(mut self, key: Option<K>) -> Self {
        self.key = key;
        self
    }

    /// Sets the inclusive end key and marks the op ranged.
    pub fn end_key(mut self, end_key: K) -> Self {
        self.end_key = Some(end_key);
        self.is_range = true;
        self
    }

    /// Sets the end key from an option; `None` on a range op means the last
    /// live key.
    pub fn nullable_end_key(mut self, end_key: Option<K>) -> Self {
        self.end_key = end_key;
        self
    }

    /// Marks the op as a range delete.
    pub fn is_range(mut self, is_range: bool) -> Self {
        self.is_range = is_range;
        self
    }

    /// Sets the caller revision.
    pub fn revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    /// Requests the deleted records in the result.
    pub fn prev_kv(mut self, prev_kv: bool) -> Self {
        self.prev_kv = prev_kv;
        self
    }

    /// Builds the op, failing if a single-key delete has no key.
    pub fn build(self) -> Result<DeleteOp<K>, StoreError> {
        if !self.is_range && self.end_key.is_none() && self.key.is_none() {
            return Err(StoreError::IllegalOp(
                "single-key delete op requires a key".into(),
            ));
        }
        Ok(DeleteOp {
            key: self.key,
            end_key: self.end_key,
            is_range: self.is_range,
            revision: self.revision,
            prev_kv: self.prev_kv,
        })
    }
}

/// A point lookup or an inclusive range scan with record-level filters.
#[derive(Debug, Clone)]
pub struct RangeOp<K> {
    key: Option<K>,
    end_key: Option<K>,
    is_range: bool,
    limit: i64,
    revision: i64,
    min_mod_rev: i64,
    max_mod_rev: i64,
    min_create_rev: i64,
    max_create_rev: i64,
}

impl<K> RangeOp<K> {
    /// Returns the start key; `None` means the first live key.
    #[inline]
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Returns the inclusive end key; `None` on a range op means the last
    /// live key.
    #[inline]
    pub fn end_key(&self) -> Option<&K> {
        self.end_key.as_ref()
    }

    /// Returns whether this scans a range rather than a single key.
    #[inline]
    pub fn is_range(&self) -> bool {
        self.is_range || self.end_key.is_some()
    }

    /// Returns the scan limit; non-positive means unlimited.
    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Returns the caller-supplied revision.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns the minimum mod-revision filter bound.
    #[inline]
    pub fn min_mod_rev(&self) -> i64 {
        self.min_mod_rev
    }

    /// Returns the maximum mod-revision filter bound.
    #[inline]
    pub fn max_mod_rev(&self) -> i64 {
        self.max_mod_rev
    }

    /// Returns the minimum create-revision filter bound.
    #[inline]
    pub fn min_create_rev(&self) -> i64 {
        self.min_create_rev
    }

    /// Returns the maximum create-revision filter bound.
    #[inline]
    pub fn max_create_rev(&self) -> i64 {
        self.max_create_rev
    }

    /// Record-level filter predicate applied on both lookup paths.
    pub(crate) fn filter_matches(&self, record: &MvccRecord) -> bool {
        record.mod_rev() >= self.min_mod_rev
            && record.mod_rev() <= self.max_mod_rev
            && record.create_rev() >= self.min_create_rev
            && record.create_rev() <= self.max_create_rev
    }
}

/// Builder for [`RangeOp`]. A point lookup requires a key; a range scan
/// accepts open-ended bounds. Filter bounds default to no-constraint.
pub struct RangeOpBuilder<K> {
    key: Option<K>,
    end_key: Option<K>,
    is_range: bool,
    limit: i64,
    revision: i64,
    min_mod_rev: i64,
    max_mod_rev: i64,
    min_create_rev: i64,
    max_create_rev: i64,
}

impl<K> RangeOpBuilder<K> {
    /// Sets the start key.
    pub fn key(mut self, key: K) -> Self {
        self.key = Some(key);
        self
    }

    /// Sets the start key from an option; `None` means the first live key.
    pub fn nullable_key(mut self, key: Option<K>) -> Self {
        self.key = key;
        self
    }

    /// Sets the inclusive end key and marks the op ranged.
    pub fn end_key(mut self, end_key: K) -> Self {
        self.end_key = Some(end_key);
        self.is_range = true;
        self
    }

    /// Sets the end key from an option; `None` on a range op means the last
    /// live key.
    pub fn nullable_end_key(mut self, end_key: Option<K>) -> Self {
        self.end_key = end_key;
        self
    }

    /// Marks the op as a range scan.
    pub fn is_range(mut self, is_range: bool) -> Self {
        self.is_range = is_range;
        self
    }

    /// Sets the scan limit; non-positive means unlimited.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the caller revision.
    pub fn revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    /// Keeps only records with `mod_rev >= min`.
    pub fn min_mod_rev(mut self, min: i64) -> Self {
        self.min_mod_rev = min;
        self
    }

    /// Keeps only records with `mod_rev <= max`.
    pub fn max_mod_rev(mut self, max: i64) -> Self {
        self.max_mod_rev = max;
        self
    }

    /// Keeps only records with `create_rev >= min`.
    pub fn min_create_rev(mut self, min: i64) -> Self {
        self.min_create_rev = min;
        self
    }

    /// Keeps only records with `create_rev <= max`.
    pub fn max_create_rev(mut self, max: i64) -> Self {
        self.max_create_rev = max;
        self
    }

    /// Builds the op, failing if a point lookup has no key.
    pub fn build(self) -> Result<RangeOp<K>, StoreError> {
        if !self.is_range && self.end_key.is_none() && self.key.is_none() {
            return Err(StoreError::IllegalOp(
                "point lookup range op requires a key".into(),
            ));
        }
        Ok(RangeOp {
            key: self.key,
            end_key: self.end_key,
            is_range: self.is_range,
            limit: self.limit,
            revision: self.revision,
            min_mod_rev: self.min_mod_rev,
            max_mod_rev: self.max_mod_rev,
            min_create_rev: self.min_create_rev,
            max_create_rev: self.max_create_rev,
        })
    }
}

/// An atomic compare-then-act batch.
#[derive(Debug, Clone)]
pub struct TxnOp<K, V> {
    revision: i64,
    compare_ops: Vec<CompareOp<K, V>>,
    success_ops: Vec<Op<K, V>>,
    failure_ops: Vec<Op<K, V>>,
}

impl<K, V> TxnOp<K, V> {
    /// Returns the transaction revision.
    #[inline]
    pub fn revision(&self) -> i64 {
        self.revision
    }

    /// Returns the compare predicates, evaluated in order.
    #[inline]
    pub fn compare_ops(&self) -> &[CompareOp<K, V>] {
        &self.compare_ops
    }

    /// Returns the ops executed when every compare passes.
    #[inline]
    pub fn success_ops(&self) -> &[Op<K, V>] {
        &self.success_ops
    }

    /// Returns the ops executed when a compare fails.
    #[inline]
    pub fn failure_ops(&self) -> &[Op<K, V>] {
        &self.failure_ops
    }
}

/// Builder for [`TxnOp`].
pub struct TxnOpBuilder<K, V> {
    revision: i64,
    compare_ops: Vec<CompareOp<K, V>>,
    success_ops: Vec<Op<K, V>>,
    failure_ops: Vec<Op<K, V>>,
}

impl<K, V> TxnOpBuilder<K, V> {
    /// Sets the transaction revision.
    pub fn revision(mut self, revision: i64) -> Self {
        self.revision = revision;
        self
    }

    /// Appends a compare predicate.
    pub fn add_compare_op(mut self, op: CompareOp<K, V>) -> Self {
        self.compare_ops.push(op);
        self
    }

    /// Appends an op to the success branch.
    pub fn add_success_op(mut self, op: impl Into<Op<K, V>>) -> Self {
        self.success_ops.push(op.into());
        self
    }

    /// Appends an op to the failure branch.
    pub fn add_failure_op(mut self, op: impl Into<Op<K, V>>) -> Self {
        self.failure_ops.push(op.into());
        self
    }

    /// Builds the op.
    pub fn build(self) -> Result<TxnOp<K, V>, StoreError> {
        Ok(TxnOp {
            revision: self.revision,
            compare_ops: self.compare_ops,
            success_ops: self.success_ops,
            failure_ops: self.failure_ops,
        })
    }
}

/// An operation submitted to the store.
#[derive(Debug, Clone)]
pub enum Op<K, V> {
    Put(PutOp<K, V>),
    Delete(DeleteOp<K>),
    Range(RangeOp<K>),
    Txn(TxnOp<K, V>),
    Compare(CompareOp<K, V>),
}

impl<K, V> From<PutOp<K, V>> for Op<K, V> {
    fn from(op: PutOp<K, V>) -> Self {
        Op::Put(op)
    }
}

impl<K, V> From<DeleteOp<K>> for Op<K, V> {
    fn from(op: DeleteOp<K>) -> Self {
        Op::Delete(op)
    }
}

impl<K, V> From<RangeOp<K>> for Op<K, V> {
    fn from(op: RangeOp<K>) -> Self {
        Op::Range(op)
    }
}

impl<K, V> From<TxnOp<K, V>> for Op<K, V> {
    fn from(op: TxnOp<K, V>) -> Self {
        Op::Txn(op)
    }
}

impl<K, V> From<CompareOp<K, V>> for Op<K, V> {
    fn from(op: CompareOp<K, V>) -> Self {
        Op::Compare(op)
    }
}

/// Factory for operation builders and compare predicates.
#[derive(Debug)]
pub struct OpFactory<K, V> {
    _marker: PhantomData<fn() -> (K, V)>,
}

impl<K, V> Clone for OpFactory<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for OpFactory<K, V> {}

impl<K, V> Default for OpFactory<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OpFactory<K, V> {
    /// Creates a new op factory.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Starts building a put op.
    pub fn build_put_op(&self) -> PutOpBuilder<K, V> {
        PutOpBuilder {
            key: None,
            value: None,
            revision: UNSET_REVISION,
            prev_kv: false,
        }
    }

    /// Starts building a delete op.
    pub fn build_delete_op(&self) -> DeleteOpBuilder<K> {
        DeleteOpBuilder {
            key: None,
            end_key: None,
            is_range: false,
            revision: UNSET_REVISION,
            prev_kv: false,
        }
    }

    /// Starts building a range op.
    pub fn build_range_op(&self) -> RangeOpBuilder<K> {
        RangeOpBuilder {
            key: None,
            end_key: None,
            is_range: false,
            limit: NO_LIMIT,
            revision: UNSET_REVISION,
            min_mod_rev: 0,
            max_mod_rev: i64::MAX,
            min_create_rev: 0,
            max_create_rev: i64::MAX,
        }
    }

    /// Starts building a transaction op.
    pub fn build_txn_op(&self) -> TxnOpBuilder<K, V> {
        TxnOpBuilder {
            revision: UNSET_REVISION,
            compare_ops: Vec::new(),
            success_ops: Vec::new(),
            failure_ops: Vec::new(),
        }
    }

    /// Builds a compare predicate over a key's mod revision.
    pub fn compare_mod_revision(
        &self,
        result: CompareResult,
        key: K,
        revision: i64,
    ) -> CompareOp<K, V> {
        CompareOp {
            target: CompareTarget::Mod,
            result,
            key,
            revision,
            value: None,
        }
    }

    /// Builds a compare predicate over a key's create revision.
    pub fn compare_create_revision(
        &self,
        result: CompareResult,
        key: K,
        revision: i64,
    ) -> CompareOp<K, V> {
        CompareOp {
            target: CompareTarget::Create,
            result,
            key,
            revision,
            value: None,
        }
    }

    /// Builds a compare predicate over a key's version counter.
    pub fn compare_version(&self, result: CompareResult, key: K, version: i64) -> CompareOp<K, V> {
        CompareOp {
            target: CompareTarget::Version,
            result,
            key,
            revision: version,
            value: None,
        }
    }

    /// Builds a compare predicate over a key's value bytes.
    pub fn compare_value(&self, result: CompareResult, key: K, value: V) -> CompareOp<K, V> {
        CompareOp {
            target: CompareTarget::Value,
            result,
            key,
            revision: 0,
            value: Some(value),
        }
    }
}
