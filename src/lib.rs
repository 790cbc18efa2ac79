// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! RubidiumKV: an etcd-style MVCC key-value state store with strict
//! monotonic-revision semantics, built on RocksDB.
//!
//! This crate provides a synchronous, single-store MVCC engine: point gets,
//! ranged reads, conditional puts, ranged deletes, and compare-and-swap
//! transactions, each committed through a single atomic write batch.

pub mod coder;
pub mod store;

pub use coder::{BytesCoder, Coder, CoderError, StringUtf8Coder};
pub use store::{
    Code, CompareOp, CompareResult, CompareTarget, DeleteOp, DeleteResult, Kv, KvMulti, KvRecord,
    KvStore, MvccRecord, MvccStore, Op, OpFactory, OpResult, PutOp, PutResult, RangeIter, RangeOp,
    RangeResult, StoreError, StoreSpec, TxnOp, TxnResult,
};
