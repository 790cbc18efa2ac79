// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Byte-range helpers for inclusive-end key ranges.
//!
//! The public API treats key ranges as inclusive `[start, end]`; the
//! underlying engine consumes half-open `[start, end')`. The conversion bumps
//! the final byte of the inclusive end key.

/// Converts an inclusive end key into the exclusive upper bound fed to the
/// underlying engine.
///
/// The final byte is incremented without carry, which is a sufficient
/// successor in byte-lexicographic order for keys that do not end in `0xFF`.
/// A `0xFF` final byte wraps to `0x00`, silently inverting the range; callers
/// do not use `0xFF` terminators in practice.
pub(crate) fn exclusive_upper_bound(end_key: &[u8]) -> Vec<u8> {
    let mut bound = end_key.to_vec();
    if let Some(last) = bound.last_mut() {
        *last = last.wrapping_add(1);
    }
    bound
}
