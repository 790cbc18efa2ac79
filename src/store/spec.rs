// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Store configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::coder::Coder;

use super::error::StoreError;

/// Configuration for opening an MVCC store.
///
/// Built via [`StoreSpec::builder`]; `name`, both coders, and the local
/// store directory are required.
#[derive(Clone)]
pub struct StoreSpec<K, V> {
    /// Store name, used in log and error messages.
    pub name: String,
    /// Codec for keys.
    pub key_coder: Arc<dyn Coder<K>>,
    /// Codec for values.
    pub val_coder: Arc<dyn Coder<V>>,
    /// Directory holding the local database. Its parent is created if absent.
    pub local_state_store_dir: PathBuf,
    /// Logical stream name this store materializes, if any.
    pub stream: Option<String>,
}

impl<K, V> StoreSpec<K, V> {
    /// Starts building a store spec.
    pub fn builder() -> StoreSpecBuilder<K, V> {
        StoreSpecBuilder {
            name: None,
            key_coder: None,
            val_coder: None,
            local_state_store_dir: None,
            stream: None,
        }
    }
}

/// Builder for [`StoreSpec`].
pub struct StoreSpecBuilder<K, V> {
    name: Option<String>,
    key_coder: Option<Arc<dyn Coder<K>>>,
    val_coder: Option<Arc<dyn Coder<V>>>,
    local_state_store_dir: Option<PathBuf>,
    stream: Option<String>,
}

impl<K, V> StoreSpecBuilder<K, V> {
    /// Sets the store name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the key codec.
    pub fn key_coder(mut self, coder: impl Coder<K> + 'static) -> Self {
        self.key_coder = Some(Arc::new(coder));
        self
    }

    /// Sets the value codec.
    pub fn val_coder(mut self, coder: impl Coder<V> + 'static) -> Self {
        self.val_coder = Some(Arc::new(coder));
        self
    }

    /// Sets the local database directory.
    pub fn local_state_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_state_store_dir = Some(dir.into());
        self
    }

    /// Sets the logical stream name.
    pub fn stream(mut self, stream: impl Into<String>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    /// Builds the spec, failing if a required field is unset.
    pub fn build(self) -> Result<StoreSpec<K, V>, StoreError> {
        let name = self
            .name
            .ok_or_else(|| StoreError::IllegalOp("store spec requires a name".into()))?;
        let key_coder = self
            .key_coder
            .ok_or_else(|| StoreError::IllegalOp("store spec requires a key coder".into()))?;
        let val_coder = self
            .val_coder
            .ok_or_else(|| StoreError::IllegalOp("store spec requires a value coder".into()))?;
        let local_state_store_dir = self.local_state_store_dir.ok_or_else(|| {
            StoreError::IllegalOp("store spec requires a local store directory".into())
        })?;
        Ok(StoreSpec {
            name,
            key_coder,
            val_coder,
            local_state_store_dir,
            stream: self.stream,
        })
    }
}
