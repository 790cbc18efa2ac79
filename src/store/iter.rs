// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Paged, cursor-resumable iteration over a key range.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use super::error::{Code, StoreError};
use super::result::{Kv, KvRecord};
use super::rocks::MvccStore;

/// Records fetched per batch.
const BATCH_LIMIT: i64 = 32;

/// A forward iterator over the inclusive key range `[from, to]`, fetching
/// batches of records through limit-bounded range ops.
///
/// The iterator re-fetches from the last returned key whenever a batch is
/// exhausted with more in-range keys available, skipping the seam record so
/// no key is emitted twice. It terminates once a batch comes back empty with
/// nothing further, or once the supplied end key has been emitted.
///
/// Iterators are invalidated by [`RangeIter::close`] and by closing the
/// store; `next` fails with an `INVALID_STATE` error afterwards.
pub struct RangeIter<K, V> {
    store: Arc<MvccStore<K, V>>,
    id: u64,
    to: Option<K>,
    /// Last returned key, primed with the start bound before the first fetch.
    cursor: Option<K>,
    pending: VecDeque<KvRecord<K, V>>,
    fetched: bool,
    has_more: bool,
    eor: bool,
    closed: bool,
}

impl<K, V> RangeIter<K, V>
where
    K: Clone + Eq + fmt::Debug,
{
    pub(crate) fn new(store: Arc<MvccStore<K, V>>, id: u64, from: Option<K>, to: Option<K>) -> Self {
        Self {
            store,
            id,
            to,
            cursor: from,
            pending: VecDeque::new(),
            fetched: false,
            has_more: false,
            eor: false,
            closed: false,
        }
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed || !self.store.iter_is_live(self.id) {
            return Err(StoreError::InvalidState(
                "range iterator is already closed".into(),
            ));
        }
        Ok(())
    }

    /// Returns the next record in the range, or `None` once exhausted.
    pub fn next(&mut self) -> Result<Option<Kv<K, V>>, StoreError> {
        self.ensure_open()?;
        if self.eor {
            return Ok(None);
        }
        if !self.fetched {
            self.fetch_batch()?;
            self.fetched = true;
        }
        loop {
            if let Some(record) = self.pending.pop_front() {
                let (key, value) = record.into_key_value();
                self.cursor = Some(key.clone());
                if self.to.as_ref() == Some(&key) {
                    self.eor = true;
                }
                return Ok(Some(Kv::new(key, value)));
            }
            if self.has_more {
                self.fetch_batch()?;
                self.skip_cursor_key();
            } else {
                self.eor = true;
                return Ok(None);
            }
        }
    }

    /// Detaches the iterator from the store and releases its buffers.
    pub fn close(&mut self) {
        if !self.closed {
            self.store.remove_iter(self.id);
            self.pending.clear();
            self.closed = true;
        }
    }

    fn fetch_batch(&mut self) -> Result<(), StoreError> {
        let op = self
            .store
            .op_factory()
            .build_range_op()
            .nullable_key(self.cursor.clone())
            .nullable_end_key(self.to.clone())
            .is_range(true)
            .limit(BATCH_LIMIT)
            .build()?;
        let mut result = self.store.range(&op)?;
        let code = result.code();
        if code != Code::Ok {
            result.recycle();
            return Err(StoreError::OpFailed {
                code,
                msg: format!(
                    "failed to fetch range batch at [{:?}, {:?}]",
                    op.key(),
                    op.end_key()
                ),
            });
        }
        self.pending = result.take_kvs().into();
        self.has_more = result.has_more();
        result.recycle();
        Ok(())
    }

    /// Drops re-fetched records for the key the previous batch ended on.
    fn skip_cursor_key(&mut self) {
        while let (Some(front), Some(cursor)) = (self.pending.front(), self.cursor.as_ref()) {
            if front.key() != cursor {
                break;
            }
            self.pending.pop_front();
        }
    }
}

impl<K, V> Drop for RangeIter<K, V> {
    fn drop(&mut self) {
        if !self.closed {
            self.store.remove_iter(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coder::StringUtf8Coder;
    use crate::store::StoreSpec;
    use tempfile::TempDir;

    fn create_test_store() -> (Arc<MvccStore<String, String>>, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MvccStore::new());
        let spec = StoreSpec::builder()
            .name("iter-store")
            .key_coder(StringUtf8Coder::new())
            .val_coder(StringUtf8Coder::new())
            .local_state_store_dir(dir.path().join("db"))
            .build()
            .unwrap();
        store.init(spec).unwrap();
        (store, dir)
    }

    fn key(i: usize) -> String {
        format!("key-{i:05}")
    }

    fn value(i: usize) -> String {
        format!("value-{i:05}")
    }

    fn write_kvs(store: &MvccStore<String, String>, num_pairs: usize, revision: i64) {
        for i in 0..num_pairs {
            store.put_at(key(i), value(i), revision).unwrap();
        }
    }

    #[test]
    fn test_iterates_all_keys_across_batches() {
        let (store, _dir) = create_test_store();
        // 100 keys forces several 32-record batches and seam skips.
        write_kvs(&store, 100, 1);
        let mut iter = store.range_iter(Some(key(0)), Some(key(100))).unwrap();
        let mut idx = 0;
        while let Some(kv) = iter.next().unwrap() {
            assert_eq!(kv.key(), &key(idx));
            assert_eq!(kv.value(), &value(idx));
            idx += 1;
        }
        assert_eq!(idx, 100);
        iter.close();
    }

    #[test]
    fn test_open_ended_iteration() {
        let (store, _dir) = create_test_store();
        write_kvs(&store, 100, 1);
        let mut iter = store.range_iter(None, None).unwrap();
        let mut idx = 0;
        while let Some(kv) = iter.next().unwrap() {
            assert_eq!(kv.key(), &key(idx));
            idx += 1;
        }
        assert_eq!(idx, 100);
        iter.close();
    }

    #[test]
    fn test_stops_at_end_key() {
        let (store, _dir) = create_test_store();
        write_kvs(&store, 100, 1);
        let mut iter = store.range_iter(Some(key(20)), Some(key(79))).unwrap();
        let mut idx = 20;
        while let Some(kv) = iter.next().unwrap() {
            assert_eq!(kv.key(), &key(idx));
            assert_eq!(kv.value(), &value(idx));
            idx += 1;
        }
        assert_eq!(idx, 80);
        iter.close();
    }

    #[test]
    fn test_empty_store_yields_nothing() {
        let (store, _dir) = create_test_store();
        let mut iter = store.range_iter(None, None).unwrap();
        assert!(iter.next().unwrap().is_none());
        // Exhausted iterators keep returning None until closed.
        assert!(iter.next().unwrap().is_none());
        iter.close();
    }

    #[test]
    fn test_next_after_close_fails() {
        let (store, _dir) = create_test_store();
        write_kvs(&store, 5, 1);
        let mut iter = store.range_iter(None, None).unwrap();
        assert!(iter.next().unwrap().is_some());
        iter.close();
        let err = iter.next().unwrap_err();
        assert_eq!(err.code(), Code::InvalidState);
    }

    #[test]
    fn test_store_close_invalidates_iterators() {
        let (store, _dir) = create_test_store();
        write_kvs(&store, 5, 1);
        let mut iter = store.range_iter(None, None).unwrap();
        assert!(iter.next().unwrap().is_some());
        store.close();
        let err = iter.next().unwrap_err();
        assert_eq!(err.code(), Code::InvalidState);
    }

    #[test]
    fn test_single_batch_range() {
        let (store, _dir) = create_test_store();
        write_kvs(&store, 10, 1);
        let mut iter = store.range_iter(Some(key(2)), Some(key(6))).unwrap();
        let mut collected = Vec::new();
        while let Some(kv) = iter.next().unwrap() {
            collected.push(kv.into_parts().0);
        }
        assert_eq!(collected, (2..=6).map(key).collect::<Vec<_>>());
        iter.close();
    }
}
