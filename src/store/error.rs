// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Store error types and the wire-visible code enumeration.

use crate::coder::CoderError;

/// Wire-visible status codes carried on operation results.
///
/// Non-OK codes other than `InternalError` reflect the caller's request
/// rather than a store malfunction and are caller-recoverable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    /// The operation succeeded.
    Ok,
    /// A put carried a revision not larger than the key's current mod revision.
    SmallerRevision,
    /// A compare referenced a key that does not exist.
    KeyNotFound,
    /// The operation is malformed (e.g. a nested transaction).
    IllegalOp,
    /// The store is not open.
    InvalidState,
    /// The store malfunctioned.
    InternalError,
    /// The operation is not supported on this store.
    UnsupportedOp,
}

/// Errors raised by store operations.
///
/// Raised errors are fatal to the call: the current write batch is discarded
/// and no mutation is observable. Codes that reflect the caller's request
/// (`SmallerRevision`, `KeyNotFound`, ...) travel on results instead, except
/// where a convenience wrapper converts them via [`StoreError::OpFailed`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("state store is not open: {0}")]
    InvalidState(String),

    #[error("illegal operation: {0}")]
    IllegalOp(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOp(String),

    #[error("operation failed with code {code:?}: {msg}")]
    OpFailed { code: Code, msg: String },

    #[error("stored record is corrupted: {0}")]
    Corruption(String),

    #[error("internal store error: {0}")]
    Internal(String),

    #[error("coder error: {0}")]
    Coder(#[from] CoderError),

    #[error("rocksdb error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Maps this error onto the wire-visible code enumeration.
    pub fn code(&self) -> Code {
        match self {
            StoreError::InvalidState(_) => Code::InvalidState,
            StoreError::IllegalOp(_) => Code::IllegalOp,
            StoreError::UnsupportedOp(_) => Code::UnsupportedOp,
            StoreError::OpFailed { code, .. } => *code,
            StoreError::Corruption(_)
            | StoreError::Internal(_)
            | StoreError::Coder(_)
            | StoreError::RocksDb(_)
            | StoreError::Io(_) => Code::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_mapping() {
        assert_eq!(
            StoreError::InvalidState("closed".into()).code(),
            Code::InvalidState
        );
        assert_eq!(StoreError::IllegalOp("bad".into()).code(), Code::IllegalOp);
        assert_eq!(
            StoreError::OpFailed {
                code: Code::SmallerRevision,
                msg: "stale".into()
            }
            .code(),
            Code::SmallerRevision
        );
        assert_eq!(
            StoreError::Corruption("truncated".into()).code(),
            Code::InternalError
        );
    }
}
