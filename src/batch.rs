// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Grouping of a zone's resource records into update transactions.

use hickory_client::rr::Record as ResourceRecord;

/// Partition a zone's resource records into ordered update batches.
///
/// `record_sets` holds the output of [`crate::record::Record::records`] for
/// each record of one zone, in zone order.
///
/// - `batch_size == 0`: every non-empty record set is its own batch.
/// - `batch_size > 0`: all records are queued in order and cut into batches
///   of exactly `batch_size`; the last batch holds the remainder.
///
/// Every resource record ends up in exactly one batch and the relative order
/// is preserved. Empty record sets contribute nothing.
#[must_use]
pub fn plan_batches(
    record_sets: Vec<Vec<ResourceRecord>>,
    batch_size: usize,
) -> Vec<Vec<ResourceRecord>> {
    if batch_size == 0 {
        return record_sets
            .into_iter()
            .filter(|set| !set.is_empty())
            .collect();
    }

    let queue: Vec<ResourceRecord> = record_sets.into_iter().flatten().collect();
    queue.chunks(batch_size).map(<[ResourceRecord]>::to_vec).collect()
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod batch_tests;
