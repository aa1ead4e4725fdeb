//! Result compaction: merge hypotheses with identical output, then bucket by
//! lethality.

use std::collections::{BTreeMap, HashMap};

use crate::inference::IvRangeSet;
use crate::stats::ModifierHypothesis;

use super::result::{CompactRange, OneShotResult, RangeResult};

/// Merges per-hypothesis result rows whose damage labels are identical.
///
/// The hypothesis lists are walked in parallel, row by row, so compact
/// ranges come out in first-seen order. Rows within one hypothesis are in
/// increasing hereditary-value order, so each per-hypothesis interval is a
/// running extension: first-seen lower bound, latest upper bound.
pub fn combine_hypotheses(results: &[(ModifierHypothesis, Vec<RangeResult>)]) -> Vec<CompactRange> {
    let mut compact: Vec<CompactRange> = Vec::new();
    let mut by_label: HashMap<String, usize> = HashMap::new();

    let depth = results.iter().map(|(_, rows)| rows.len()).max().unwrap_or(0);
    for index in 0..depth {
        for (hypothesis, rows) in results {
            let Some(row) = rows.get(index) else {
                continue;
            };
            let slot = *by_label.entry(row.label.clone()).or_insert_with(|| {
                compact.push(CompactRange::seed(row));
                compact.len() - 1
            });
            let entry = &mut compact[slot];
            let ivs = entry.ivs.get_mut(*hypothesis);
            if !row.ivs.is_empty() {
                ivs.extend_to(row.ivs.min as u32);
                ivs.extend_to(row.ivs.max as u32);
            }
        }
    }

    for entry in &mut compact {
        let ivs = entry.ivs;
        entry.ivs = IvRangeSet::provisional(ivs.reduced, ivs.neutral, ivs.boosted);
    }
    compact
}

/// Groups compact ranges by how many of their 16 rolls reach `threshold`.
pub fn bucket_by_lethality(ranges: &[CompactRange], threshold: u32) -> BTreeMap<u8, OneShotResult> {
    let mut buckets: BTreeMap<u8, OneShotResult> = BTreeMap::new();
    for range in ranges {
        let success_count = range.successes(threshold);
        let bucket = buckets.entry(success_count).or_insert_with(|| OneShotResult {
            success_count,
            ivs: IvRangeSet::EMPTY,
            children: Vec::new(),
        });
        bucket.ivs = bucket.ivs.union(&range.ivs);
        bucket.children.push(range.clone());
    }
    buckets
}
