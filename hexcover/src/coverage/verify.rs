//! Completeness verification.
//!
//! Checks that every land cell's ring-1 neighbors made it into the output.
//! This only reads what the pass already decided: nothing is re-classified
//! and gaps are reported, not filled.

use std::collections::HashMap;

use h3o::CellIndex;

use super::types::{CoverageGap, HexagonRecord};

/// Land coverage above which a neighbor must be present as land.
pub const GAP_TOLERANCE_PCT: f64 = 25.0;

/// Flag land records with missing or misclassified neighbors.
///
/// `processed` maps every cell the pass classified to its land coverage, so
/// neighbors that were examined and found to be mostly water are not
/// reported. Records without gaps get `verified = true` and
/// `last_verified = now`.
pub fn verify_completeness(
    records: &mut [HexagonRecord],
    processed: &HashMap<CellIndex, f64>,
    now: u64,
) -> Vec<CoverageGap> {
    // id -> (is_land, land_coverage_pct) for the retained set
    let present: HashMap<CellIndex, (bool, f64)> = records
        .iter()
        .map(|r| (r.id, (r.is_land, r.land_coverage_pct)))
        .collect();

    let mut gaps = Vec::new();
    for record in records.iter_mut().filter(|r| r.is_land) {
        let mut has_gaps = false;
        for &neighbor in &record.neighbors {
            let is_gap = match present.get(&neighbor) {
                Some(&(is_land, coverage)) => !is_land && coverage > GAP_TOLERANCE_PCT,
                None => processed
                    .get(&neighbor)
                    .map_or(true, |&coverage| coverage > GAP_TOLERANCE_PCT),
            };
            if is_gap {
                has_gaps = true;
                gaps.push(CoverageGap {
                    cell: record.id,
                    missing_neighbor: neighbor,
                });
            }
        }

        record.has_gaps = has_gaps;
        record.verified = !has_gaps;
        record.last_verified = (!has_gaps).then_some(now);
    }

    gaps
}
