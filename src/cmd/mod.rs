pub mod compare;
pub mod generate;
pub mod optimize;

use slotforge::affinity::{parse_group, AffinityMatrix};
use slotforge::consts::{DEFAULT_AFFINITY_PAIR_THRESHOLD, DEFAULT_GROUP_AFFINITY};
use slotforge::error::SfResult;
use slotforge::grid::Grid;
use tracing::{debug, info, warn};

/// Affinity matrix from `--affinity-group` lists, `None` when no group was
/// given.
pub fn build_affinity(
    grid: &Grid,
    groups: &[String],
    affinity_weight: f64,
) -> SfResult<Option<AffinityMatrix>> {
    if groups.is_empty() {
        return Ok(None);
    }

    let parsed = groups
        .iter()
        .map(|g| parse_group(g))
        .collect::<SfResult<Vec<_>>>()?;
    let matrix = AffinityMatrix::from_groups(grid.len(), &parsed, DEFAULT_GROUP_AFFINITY)?;

    let pairs = matrix.pairs_at_least(DEFAULT_AFFINITY_PAIR_THRESHOLD);
    info!("🔗 {} affinity pairs from {} groups", pairs.len(), parsed.len());
    for p in &pairs {
        debug!("   {:?} <-> {:?}: {:.2}", p.a, p.b, p.affinity);
    }
    if affinity_weight <= 0.0 {
        warn!("⚠️  Affinity groups given but --affinity-weight is 0; they will be ignored.");
    }
    Ok(Some(matrix))
}
