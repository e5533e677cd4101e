//! Union/merge step over extractor outputs

use crate::record::LineageRecord;
use std::collections::HashSet;

/// Concatenate record batches and drop exact duplicates, keeping the first
/// occurrence of each record in its original order.
pub fn merge_records<I>(batches: I) -> Vec<LineageRecord>
where
    I: IntoIterator<Item = Vec<LineageRecord>>,
{
    let mut seen: HashSet<LineageRecord> = HashSet::new();
    let mut merged = Vec::new();

    for batch in batches {
        for record in batch {
            if seen.insert(record.clone()) {
                merged.push(record);
            }
        }
    }

    merged
}
