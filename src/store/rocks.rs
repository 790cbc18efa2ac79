// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! RocksDB-backed MVCC store engine.
//!
//! Every public operation acquires the store-wide lock, runs to completion
//! against the data column family, and commits at most one atomic write
//! batch. Revisions are caller-supplied; writes to a key must carry a
//! revision strictly larger than the key's current mod revision.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rocksdb::{
    BlockBasedOptions, BoundColumnFamily, ColumnFamilyDescriptor, DBCompactionStyle,
    DBCompressionType, DBWithThreadMode, MultiThreaded, Options, WriteBatch, WriteOptions,
};
use tracing::{debug, error, info};

use crate::coder::Coder;

use super::error::{Code, StoreError};
use super::iter::RangeIter;
use super::op::{CompareOp, CompareResult, CompareTarget, DeleteOp, Op, OpFactory, PutOp, RangeOp, TxnOp};
use super::range::exclusive_upper_bound;
use super::record::MvccRecord;
use super::result::{DeleteResult, KvRecord, OpResult, PutResult, RangeResult, ResultFactory, TxnResult};
use super::spec::StoreSpec;

type Db = DBWithThreadMode<MultiThreaded>;

const DATA_CF_NAME: &str = "default";
const WRITE_BUFFER_SIZE: usize = 64 * 1024 * 1024;
const MAX_WRITE_BUFFERS: i32 = 4;
const BLOCK_SIZE: usize = 4 * 1024;

/// The MVCC state store.
///
/// Lifecycle: `UNINITIALIZED → OPEN → CLOSED`. [`MvccStore::init`] opens the
/// underlying database at the configured directory; [`MvccStore::close`]
/// invalidates outstanding iterators and releases the database. Any public
/// operation issued while not open fails with an `INVALID_STATE` error.
pub struct MvccStore<K, V> {
    state: Mutex<StoreState<K, V>>,
    op_factory: OpFactory<K, V>,
}

enum StoreState<K, V> {
    Uninitialized,
    Open(OpenStore<K, V>),
    Closed,
}

struct OpenStore<K, V> {
    name: String,
    db: Db,
    key_coder: Arc<dyn Coder<K>>,
    val_coder: Arc<dyn Coder<V>>,
    write_opts: WriteOptions,
    result_factory: ResultFactory<K, V>,
    live_iters: HashSet<u64>,
    next_iter_id: u64,
}

impl<K, V> Default for MvccStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MvccStore<K, V> {
    /// Creates an uninitialized store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::Uninitialized),
            op_factory: OpFactory::new(),
        }
    }

    /// Returns the factory used to build operations for this store.
    pub fn op_factory(&self) -> OpFactory<K, V> {
        self.op_factory
    }

    pub(crate) fn iter_is_live(&self, id: u64) -> bool {
        match &*self.state.lock() {
            StoreState::Open(open) => open.live_iters.contains(&id),
            _ => false,
        }
    }

    pub(crate) fn remove_iter(&self, id: u64) {
        if let StoreState::Open(open) = &mut *self.state.lock() {
            open.live_iters.remove(&id);
        }
    }
}

impl<K, V> MvccStore<K, V>
where
    K: Clone + Eq + fmt::Debug,
{
    /// Opens the store at the directory configured in `spec`.
    ///
    /// The directory's parent is created if absent.
    pub fn init(&self, spec: StoreSpec<K, V>) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        match &*state {
            StoreState::Uninitialized => {}
            StoreState::Open(open) => {
                return Err(StoreError::InvalidState(format!(
                    "state store {} is already open",
                    open.name
                )));
            }
            StoreState::Closed => {
                return Err(StoreError::InvalidState(
                    "state store is already closed".into(),
                ));
            }
        }

        if let Some(parent) = spec.local_state_store_dir.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                error!(
                    dir = %parent.display(),
                    error = %e,
                    "failed to create parent directory for state store",
                );
                StoreError::from(e)
            })?;
        }

        let db = open_local_db(&spec.local_state_store_dir)?;
        info!(
            store = %spec.name,
            dir = %spec.local_state_store_dir.display(),
            stream = spec.stream.as_deref().unwrap_or(""),
            "opened mvcc state store",
        );

        *state = StoreState::Open(OpenStore {
            name: spec.name,
            db,
            key_coder: spec.key_coder,
            val_coder: spec.val_coder,
            write_opts: WriteOptions::default(),
            result_factory: ResultFactory::default(),
            live_iters: HashSet::new(),
            next_iter_id: 0,
        });
        Ok(())
    }

    /// Closes the store, invalidating outstanding iterators and releasing
    /// the database handle. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if let StoreState::Open(open) = &*state {
            info!(store = %open.name, live_iters = open.live_iters.len(), "closing mvcc state store");
        }
        *state = StoreState::Closed;
    }

    fn with_open<R>(
        &self,
        f: impl FnOnce(&mut OpenStore<K, V>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut state = self.state.lock();
        match &mut *state {
            StoreState::Open(open) => f(open),
            StoreState::Uninitialized => Err(StoreError::InvalidState(
                "state store is not initialized".into(),
            )),
            StoreState::Closed => Err(StoreError::InvalidState(
                "state store is already closed".into(),
            )),
        }
    }

    /// Executes a put operation.
    ///
    /// Returns `SMALLER_REVISION` on the result when the key's current mod
    /// revision is not smaller than the op revision; no mutation happens in
    /// that case.
    pub fn put(&self, op: &PutOp<K, V>) -> Result<PutResult<K, V>, StoreError> {
        self.with_open(|store| {
            let mut batch = WriteBatch::default();
            let result = store.stage_put(op.revision(), &mut batch, op)?;
            store.commit(batch)?;
            Ok(result)
        })
    }

    /// Executes a delete operation over a single key or a range.
    pub fn delete(&self, op: &DeleteOp<K>) -> Result<DeleteResult<K, V>, StoreError> {
        self.with_open(|store| {
            let mut batch = WriteBatch::default();
            let result = store.stage_delete(op.revision(), &mut batch, op)?;
            store.commit(batch)?;
            Ok(result)
        })
    }

    /// Executes a point lookup or a range scan.
    pub fn range(&self, op: &RangeOp<K>) -> Result<RangeResult<K, V>, StoreError> {
        self.with_open(|store| store.range(op))
    }

    /// Executes a compare-then-act transaction.
    ///
    /// Compares run first; if any references an absent key, the result
    /// carries `KEY_NOT_FOUND` and neither branch runs. Otherwise the chosen
    /// branch executes in order into a single write batch, committed
    /// atomically.
    pub fn txn(&self, op: &TxnOp<K, V>) -> Result<TxnResult<K, V>, StoreError> {
        self.with_open(|store| store.txn(op))
    }

    /// Puts `value` at `key` tagged with `revision`, raising when the store
    /// rejects the op (e.g. a stale revision).
    pub fn put_at(&self, key: K, value: V, revision: i64) -> Result<(), StoreError> {
        let op = self
            .op_factory
            .build_put_op()
            .key(key)
            .value(value)
            .prev_kv(false)
            .revision(revision)
            .build()?;
        let result = self.put(&op)?;
        let code = result.code();
        result.recycle();
        if code != Code::Ok {
            return Err(StoreError::OpFailed {
                code,
                msg: format!(
                    "failed to put key {:?} at revision {}",
                    op.key(),
                    revision
                ),
            });
        }
        Ok(())
    }

    /// Deletes `key` at `revision`, raising when the store rejects the op.
    pub fn delete_at(&self, key: K, revision: i64) -> Result<(), StoreError> {
        let op = self
            .op_factory
            .build_delete_op()
            .key(key)
            .prev_kv(false)
            .revision(revision)
            .build()?;
        let result = self.delete(&op)?;
        let code = result.code();
        result.recycle();
        if code != Code::Ok {
            return Err(StoreError::OpFailed {
                code,
                msg: format!("failed to delete key {:?}", op.key()),
            });
        }
        Ok(())
    }

    /// Deletes the inclusive range `[start, end]` at `revision`; `None`
    /// bounds are open-ended.
    pub fn delete_range_at(
        &self,
        start: Option<K>,
        end: Option<K>,
        revision: i64,
    ) -> Result<(), StoreError> {
        let op = self
            .op_factory
            .build_delete_op()
            .nullable_key(start)
            .nullable_end_key(end)
            .is_range(true)
            .prev_kv(false)
            .revision(revision)
            .build()?;
        let result = self.delete(&op)?;
        let code = result.code();
        result.recycle();
        if code != Code::Ok {
            return Err(StoreError::OpFailed {
                code,
                msg: format!(
                    "failed to delete range [{:?}, {:?}]",
                    op.key(),
                    op.end_key()
                ),
            });
        }
        Ok(())
    }

    /// Returns the current value for `key`, if any.
    pub fn get(&self, key: K) -> Result<Option<V>, StoreError> {
        let op = self.op_factory.build_range_op().key(key).limit(1).build()?;
        let mut result = self.range(&op)?;
        let code = result.code();
        if code != Code::Ok {
            result.recycle();
            return Err(StoreError::OpFailed {
                code,
                msg: format!("failed to retrieve key {:?}", op.key()),
            });
        }
        let mut kvs = result.take_kvs();
        result.recycle();
        Ok(kvs.pop().map(|kv| kv.into_key_value().1))
    }

    /// Returns a paged iterator over the inclusive range `[from, to]`;
    /// `None` bounds are open-ended.
    pub fn range_iter(
        self: &Arc<Self>,
        from: Option<K>,
        to: Option<K>,
    ) -> Result<RangeIter<K, V>, StoreError> {
        let id = self.with_open(|store| {
            let id = store.next_iter_id;
            store.next_iter_id += 1;
            store.live_iters.insert(id);
            Ok(id)
        })?;
        Ok(RangeIter::new(Arc::clone(self), id, from, to))
    }
}

impl<K, V> OpenStore<K, V>
where
    K: Clone + Eq + fmt::Debug,
{
    fn data_cf(&self) -> Result<Arc<BoundColumnFamily<'_>>, StoreError> {
        self.db.cf_handle(DATA_CF_NAME).ok_or_else(|| {
            StoreError::Internal(format!(
                "data column family is missing from state store {}",
                self.name
            ))
        })
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.db.write_opt(batch, &self.write_opts).map_err(|e| {
            error!(store = %self.name, error = %e, "failed to commit write batch");
            StoreError::from(e)
        })
    }

    fn get_record(&self, raw_key: &[u8]) -> Result<Option<MvccRecord>, StoreError> {
        let cf = self.data_cf()?;
        match self.db.get_cf(&cf, raw_key)? {
            Some(bytes) => Ok(Some(MvccRecord::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn stage_put(
        &self,
        revision: i64,
        batch: &mut WriteBatch,
        op: &PutOp<K, V>,
    ) -> Result<PutResult<K, V>, StoreError> {
        let raw_key = self.key_coder.encode(op.key());
        let raw_val = self.val_coder.encode(op.value());

        let mut result = self.result_factory.new_put_result(revision);
        let record = match self.get_record(&raw_key)? {
            Some(prev) => {
                // Validate the revision before applying the update.
                if prev.compare_mod_rev(revision) != Ordering::Less {
                    debug!(
                        store = %self.name,
                        revision,
                        mod_rev = prev.mod_rev(),
                        "rejected put carrying a stale revision",
                    );
                    result.set_code(Code::SmallerRevision);
                    return Ok(result);
                }
                if op.prev_kv() {
                    let prev_kv = prev
                        .clone()
                        .into_kv_record(op.key().clone(), self.val_coder.as_ref())?;
                    result.set_prev_kv(prev_kv);
                }
                MvccRecord {
                    create_rev: prev.create_rev(),
                    mod_rev: revision,
                    version: prev.version() + 1,
                    value: raw_val,
                }
            }
            None => MvccRecord::created_at(revision, raw_val),
        };

        let cf = self.data_cf()?;
        batch.put_cf(&cf, &raw_key, record.encode());
        Ok(result)
    }

    fn stage_delete(
        &self,
        revision: i64,
        batch: &mut WriteBatch,
        op: &DeleteOp<K>,
    ) -> Result<DeleteResult<K, V>, StoreError> {
        let blind = !op.prev_kv();
        let mut result = self.result_factory.new_delete_result(revision);

        if !op.is_range() {
            let key = op.key().ok_or_else(|| {
                StoreError::IllegalOp("single-key delete op requires a key".into())
            })?;
            let raw_key = self.key_coder.encode(key);
            let cf = self.data_cf()?;
            if blind {
                batch.delete_cf(&cf, &raw_key);
            } else if let Some(record) = self.get_record(&raw_key)? {
                batch.delete_cf(&cf, &raw_key);
                let prev_kv = record.into_kv_record(key.clone(), self.val_coder.as_ref())?;
                result.set_prev_kvs(vec![prev_kv]);
                result.set_num_deleted(1);
            }
            return Ok(result);
        }

        let Some((start, end)) = self.resolve_range(op.key(), op.end_key())? else {
            // Nothing live in the requested range.
            return Ok(result);
        };
        let cf = self.data_cf()?;
        if blind {
            batch.delete_range_cf(&cf, &start, &end);
            return Ok(result);
        }

        // Enumerate exactly the resolved bounds, then stage one delete_range
        // over those same bounds so the batch covers the enumerated set.
        let mut collected = Vec::new();
        self.collect_records(&start, &end, -1, None, &mut collected)?;
        result.set_num_deleted(collected.len() as i64);
        result.set_prev_kvs(self.to_kv_records(collected)?);
        batch.delete_range_cf(&cf, &start, &end);
        Ok(result)
    }

    fn range(&self, op: &RangeOp<K>) -> Result<RangeResult<K, V>, StoreError> {
        let mut result = self.result_factory.new_range_result(op.revision());

        if !op.is_range() {
            // Point lookup.
            let key = op.key().ok_or_else(|| {
                StoreError::IllegalOp("point lookup range op requires a key".into())
            })?;
            let raw_key = self.key_coder.encode(key);
            if let Some(record) = self.get_record(&raw_key)? {
                if op.filter_matches(&record) {
                    let kv = record.into_kv_record(key.clone(), self.val_coder.as_ref())?;
                    result.set_kvs(vec![kv]);
                }
            }
            return Ok(result);
        }

        let Some((start, end)) = self.resolve_range(op.key(), op.end_key())? else {
            return Ok(result);
        };
        let mut collected = Vec::new();
        let has_more = self.collect_records(&start, &end, op.limit(), Some(op), &mut collected)?;
        result.set_kvs(self.to_kv_records(collected)?);
        result.set_has_more(has_more);
        Ok(result)
    }

    fn txn(&self, op: &TxnOp<K, V>) -> Result<TxnResult<K, V>, StoreError> {
        let revision = op.revision();
        let mut result = self.result_factory.new_txn_result(revision);

        let success = match self.process_compares(op)? {
            CompareOutcome::MissingKey => {
                debug!(store = %self.name, revision, "txn compared an absent key");
                result.set_code(Code::KeyNotFound);
                return Ok(result);
            }
            CompareOutcome::Success => true,
            CompareOutcome::Failure => false,
        };

        let operations = if success {
            op.success_ops()
        } else {
            op.failure_ops()
        };

        let mut batch = WriteBatch::default();
        let mut results = Vec::with_capacity(operations.len());
        for sub_op in operations {
            results.push(self.execute_op(revision, &mut batch, sub_op)?);
        }
        self.commit(batch)?;

        result.set_success(success);
        result.set_results(results);
        Ok(result)
    }

    fn execute_op(
        &self,
        revision: i64,
        batch: &mut WriteBatch,
        op: &Op<K, V>,
    ) -> Result<OpResult<K, V>, StoreError> {
        match op {
            Op::Put(put) => Ok(OpResult::Put(self.stage_put(revision, batch, put)?)),
            Op::Delete(delete) => Ok(OpResult::Delete(self.stage_delete(revision, batch, delete)?)),
            Op::Range(range) => Ok(OpResult::Range(self.range(range)?)),
            Op::Txn(_) | Op::Compare(_) => Err(StoreError::IllegalOp(
                "only put, delete and range ops can run inside a transaction branch".into(),
            )),
        }
    }

    fn process_compares(&self, op: &TxnOp<K, V>) -> Result<CompareOutcome, StoreError> {
        for compare in op.compare_ops() {
            let raw_key = self.key_coder.encode(compare.key());
            let record = match self.get_record(&raw_key)? {
                Some(record) => record,
                None => return Ok(CompareOutcome::MissingKey),
            };
            if !self.compare_matches(&record, compare) {
                return Ok(CompareOutcome::Failure);
            }
        }
        Ok(CompareOutcome::Success)
    }

    fn compare_matches(&self, record: &MvccRecord, op: &CompareOp<K, V>) -> bool {
        let cmp = match op.target() {
            CompareTarget::Mod => record.compare_mod_rev(op.revision()),
            CompareTarget::Create => record.compare_create_rev(op.revision()),
            CompareTarget::Version => record.compare_version(op.revision()),
            CompareTarget::Value => match op.value() {
                Some(value) => {
                    let raw_value = self.val_coder.encode(value);
                    record.value().as_ref().cmp(raw_value.as_ref())
                }
                None => return false,
            },
        };
        match op.result() {
            CompareResult::Less => cmp == Ordering::Less,
            CompareResult::Equal => cmp == Ordering::Equal,
            CompareResult::Greater => cmp == Ordering::Greater,
            CompareResult::NotEqual => cmp != Ordering::Equal,
        }
    }

    /// Resolves nullable inclusive bounds into the concrete half-open byte
    /// range `[start, end')` fed to the engine. Returns `None` when an
    /// open-ended bound finds no live key.
    fn resolve_range(
        &self,
        start_key: Option<&K>,
        end_key: Option<&K>,
    ) -> Result<Option<(Vec<u8>, Vec<u8>)>, StoreError> {
        let cf = self.data_cf()?;
        let start = match start_key {
            Some(key) => self.key_coder.encode(key).to_vec(),
            None => {
                let mut iter = self.db.raw_iterator_cf(&cf);
                iter.seek_to_first();
                if !iter.valid() {
                    iter.status()?;
                    return Ok(None);
                }
                iter.key()
                    .ok_or_else(|| StoreError::Internal("iterator lost its key".into()))?
                    .to_vec()
            }
        };
        let end_inclusive = match end_key {
            Some(key) => self.key_coder.encode(key).to_vec(),
            None => {
                let mut iter = self.db.raw_iterator_cf(&cf);
                iter.seek_to_last();
                if !iter.valid() {
                    iter.status()?;
                    return Ok(None);
                }
                iter.key()
                    .ok_or_else(|| StoreError::Internal("iterator lost its key".into()))?
                    .to_vec()
            }
        };
        Ok(Some((start, exclusive_upper_bound(&end_inclusive))))
    }

    /// Scans `[start, end')` in ascending byte order, collecting records that
    /// pass the optional filter, stopping at `limit` when positive.
    ///
    /// Returns true iff the scan stopped at the limit with a further in-range
    /// key still available.
    fn collect_records(
        &self,
        raw_start: &[u8],
        raw_end_exclusive: &[u8],
        limit: i64,
        filter: Option<&RangeOp<K>>,
        out: &mut Vec<(Vec<u8>, MvccRecord)>,
    ) -> Result<bool, StoreError> {
        let cf = self.data_cf()?;
        let mut iter = self.db.raw_iterator_cf(&cf);
        iter.seek(raw_start);
        loop {
            if limit > 0 && out.len() as i64 >= limit {
                let in_range = iter.valid() && iter.key().is_some_and(|k| k < raw_end_exclusive);
                return Ok(in_range);
            }
            if !iter.valid() {
                iter.status()?;
                return Ok(false);
            }
            let key = iter
                .key()
                .ok_or_else(|| StoreError::Internal("iterator lost its key".into()))?;
            if key >= raw_end_exclusive {
                return Ok(false);
            }
            let value = iter
                .value()
                .ok_or_else(|| StoreError::Internal("iterator lost its value".into()))?;
            let record = MvccRecord::decode(value)?;
            if filter.map_or(true, |f| f.filter_matches(&record)) {
                out.push((key.to_vec(), record));
            }
            iter.next();
        }
    }

    fn to_kv_records(
        &self,
        collected: Vec<(Vec<u8>, MvccRecord)>,
    ) -> Result<Vec<KvRecord<K, V>>, StoreError> {
        collected
            .into_iter()
            .map(|(raw_key, record)| {
                let key = self.key_coder.decode(&raw_key)?;
                record.into_kv_record(key, self.val_coder.as_ref())
            })
            .collect()
    }
}

impl<K, V> super::KvStore<K, V> for MvccStore<K, V>
where
    K: Clone + Eq + fmt::Debug,
{
    fn get(&self, key: K) -> Result<Option<V>, StoreError> {
        MvccStore::get(self, key)
    }

    fn put(&self, _key: K, _value: V) -> Result<(), StoreError> {
        Err(StoreError::UnsupportedOp(
            "use MvccStore::put with a PutOp instead".into(),
        ))
    }

    fn delete(&self, _key: K) -> Result<Option<V>, StoreError> {
        Err(StoreError::UnsupportedOp(
            "use MvccStore::delete with a DeleteOp instead".into(),
        ))
    }

    fn multi(&self) -> Result<super::KvMulti<K, V>, StoreError> {
        Err(StoreError::UnsupportedOp(
            "use MvccStore::txn with a TxnOp instead".into(),
        ))
    }
}

enum CompareOutcome {
    Success,
    Failure,
    MissingKey,
}

fn open_local_db(dir: &Path) -> Result<Db, StoreError> {
    let mut db_opts = Options::default();
    db_opts.create_if_missing(true);
    db_opts.create_missing_column_families(true);
    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get() as i32)
        .unwrap_or(2);
    db_opts.increase_parallelism(parallelism);

    let mut cf_opts = Options::default();
    cf_opts.set_write_buffer_size(WRITE_BUFFER_SIZE);
    cf_opts.set_max_write_buffer_number(MAX_WRITE_BUFFERS);
    cf_opts.set_compression_type(DBCompressionType::Lz4);
    cf_opts.set_compaction_style(DBCompactionStyle::Level);

    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_size(BLOCK_SIZE);
    block_opts.set_bloom_filter(10.0, false);
    cf_opts.set_block_based_table_factory(&block_opts);

    let cf_desc = ColumnFamilyDescriptor::new(DATA_CF_NAME, cf_opts);
    Db::open_cf_descriptors(&db_opts, dir, vec![cf_desc]).map_err(|e| {
        error!(dir = %dir.display(), error = %e, "failed to open rocksdb");
        StoreError::from(e)
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::coder::StringUtf8Coder;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn create_test_store() -> (Arc<MvccStore<String, String>>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MvccStore::new());
        let spec = StoreSpec::builder()
            .name("prop-store")
            .key_coder(StringUtf8Coder::new())
            .val_coder(StringUtf8Coder::new())
            .local_state_store_dir(dir.path().join("db"))
            .build()
            .unwrap();
        store.init(spec).unwrap();
        (store, dir)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn put_then_get_returns_value(
            key in "[a-z0-9]{1,24}",
            value in "[ -~]{0,64}",
            revision in 1i64..1_000_000,
        ) {
            let (store, _dir) = create_test_store();
            store.put_at(key.clone(), value.clone(), revision).unwrap();
            prop_assert_eq!(store.get(key).unwrap(), Some(value));
        }

        #[test]
        fn stale_revision_never_modifies(
            key in "[a-z0-9]{1,24}",
            revision in 2i64..1_000_000,
            stale_gap in 0i64..1_000,
        ) {
            let (store, _dir) = create_test_store();
            store.put_at(key.clone(), "current".to_string(), revision).unwrap();

            let stale = revision - 1 - stale_gap.min(revision - 1);
            let err = store.put_at(key.clone(), "stale".to_string(), stale.max(0)).unwrap_err();
            prop_assert_eq!(err.code(), Code::SmallerRevision);
            prop_assert_eq!(store.get(key).unwrap().as_deref(), Some("current"));
        }

        #[test]
        fn version_counts_puts_since_creation(num_puts in 1usize..12) {
            let (store, _dir) = create_test_store();
            for i in 0..num_puts {
                store.put_at("key".to_string(), format!("v{i}"), (i + 1) as i64).unwrap();
            }
            let op = store
                .op_factory()
                .build_range_op()
                .key("key".to_string())
                .build()
                .unwrap();
            let result = store.range(&op).unwrap();
            let record = &result.kvs()[0];
            prop_assert_eq!(record.create_revision(), 1);
            prop_assert_eq!(record.modified_revision(), num_puts as i64);
            prop_assert_eq!(record.version(), (num_puts - 1) as i64);
            result.recycle();
        }
    }
}
