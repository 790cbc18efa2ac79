// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Etcd-style MVCC key-value store with strict monotonic-revision semantics.
//!
//! The store keeps one [`MvccRecord`] per live key — creation revision,
//! last-modification revision, version counter, and the current value — atop
//! an ordered RocksDB column family. Callers build operations through the
//! store's [`OpFactory`] and submit them synchronously; each call runs to
//! completion under the store-wide lock and commits at most one atomic write
//! batch.
//!
//! # Key Concepts
//!
//! - **Revisions** are caller-supplied, monotonically increasing `i64`s. A
//!   put must carry a revision strictly larger than the key's current mod
//!   revision, otherwise it is rejected with `SMALLER_REVISION`.
//! - **Ranges** are inclusive `[start, end]` at the API boundary, with `None`
//!   bounds meaning the first/last live key; the engine converts them to the
//!   half-open form RocksDB consumes.
//! - **Transactions** evaluate compare predicates, then run one of two op
//!   branches atomically.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rubidiumkv::coder::StringUtf8Coder;
//! use rubidiumkv::store::{MvccStore, StoreSpec};
//!
//! # fn example() -> Result<(), rubidiumkv::store::StoreError> {
//! let store: Arc<MvccStore<String, String>> = Arc::new(MvccStore::new());
//! let spec = StoreSpec::builder()
//!     .name("orders")
//!     .key_coder(StringUtf8Coder::new())
//!     .val_coder(StringUtf8Coder::new())
//!     .local_state_store_dir("/tmp/orders/db")
//!     .stream("orders-stream")
//!     .build()?;
//! store.init(spec)?;
//!
//! store.put_at("key".to_string(), "value".to_string(), 1)?;
//! assert_eq!(store.get("key".to_string())?.as_deref(), Some("value"));
//!
//! let mut iter = store.range_iter(None, None)?;
//! while let Some(kv) = iter.next()? {
//!     println!("{} = {}", kv.key(), kv.value());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod iter;
mod op;
mod range;
mod record;
mod result;
mod rocks;
mod spec;

pub use error::{Code, StoreError};
pub use iter::RangeIter;
pub use op::{
    CompareOp, CompareResult, CompareTarget, DeleteOp, DeleteOpBuilder, Op, OpFactory, PutOp,
    PutOpBuilder, RangeOp, RangeOpBuilder, TxnOp, TxnOpBuilder, NO_LIMIT, UNSET_REVISION,
};
pub use record::MvccRecord;
pub use result::{DeleteResult, Kv, KvRecord, OpResult, PutResult, RangeResult, TxnResult};
pub use rocks::MvccStore;
pub use spec::{StoreSpec, StoreSpecBuilder};

use std::marker::PhantomData;

/// Handle for a multi-operation batch on the plain key-value interface.
///
/// The MVCC store never hands these out; transactions replace them.
pub struct KvMulti<K, V> {
    _marker: PhantomData<fn() -> (K, V)>,
}

/// The plain key-value interface inherited from the base store.
///
/// On an MVCC store only `get` works; the unversioned mutators fail with
/// `UNSUPPORTED_OP` because every mutation must carry a revision.
pub trait KvStore<K, V> {
    /// Returns the current value for a key.
    fn get(&self, key: K) -> Result<Option<V>, StoreError>;

    /// Puts a value without a revision.
    fn put(&self, key: K, value: V) -> Result<(), StoreError>;

    /// Deletes a key without a revision, returning the prior value.
    fn delete(&self, key: K) -> Result<Option<V>, StoreError>;

    /// Starts a multi-operation batch.
    fn multi(&self) -> Result<KvMulti<K, V>, StoreError>;
}
