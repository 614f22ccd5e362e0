use std::collections::BTreeMap;

use tracing::info;

use crate::model::scores::{CompositeScore, round2};
use crate::model::sources::{SourceKind, Variant};

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RankingStatistics {
    pub count: usize,
    /// `None` for an empty population.
    pub mean: Option<f64>,
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub with_krds: usize,
    pub with_heuristic: usize,
    pub with_all_three: usize,
    /// Every variant is listed, including those no organization used.
    pub variant_counts: BTreeMap<Variant, usize>,
}

#[derive(Debug)]
pub struct Ranking {
    pub sorted: Vec<CompositeScore>,
    pub top_n: Vec<CompositeScore>,
    pub bottom_n: Vec<CompositeScore>,
    pub statistics: RankingStatistics,
}

/// Sorts by `final_score` descending. The sort is stable, so equal scores
/// keep their input order. With fewer than `2n` organizations the top and
/// bottom slices overlap.
pub fn rank(mut composites: Vec<CompositeScore>, n: usize) -> Ranking {
    composites.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

    let top_n = composites.iter().take(n).cloned().collect::<Vec<_>>();
    let bottom_start = composites.len().saturating_sub(n);
    let bottom_n = composites[bottom_start..].to_vec();
    let statistics = compute_statistics(&composites);

    info!(
        "ranked {} organizations; mean={:?}, max={:?}, min={:?}",
        statistics.count, statistics.mean, statistics.max, statistics.min
    );

    Ranking {
        sorted: composites,
        top_n,
        bottom_n,
        statistics,
    }
}

pub fn compute_statistics(composites: &[CompositeScore]) -> RankingStatistics {
    let mut variant_counts = Variant::ALL.iter().map(|&v| (v, 0usize)).collect::<BTreeMap<_, _>>();
    let mut sum = 0.0;
    let mut max: Option<f64> = None;
    let mut min: Option<f64> = None;
    let mut with_krds = 0;
    let mut with_heuristic = 0;
    let mut with_all_three = 0;

    for c in composites {
        let s = c.final_score;
        sum += s;
        max = Some(max.map_or(s, |m| m.max(s)));
        min = Some(min.map_or(s, |m| m.min(s)));
        if c.sources_used.contains(SourceKind::Krds) {
            with_krds += 1;
        }
        if c.sources_used.contains(SourceKind::Heuristic) {
            with_heuristic += 1;
        }
        if c.sources_used.len() == SourceKind::ALL.len() {
            with_all_three += 1;
        }
        *variant_counts.entry(c.variant).or_default() += 1;
    }

    let mean = if composites.is_empty() {
        None
    } else {
        Some(round2(sum / composites.len() as f64))
    };

    RankingStatistics {
        count: composites.len(),
        mean,
        max,
        min,
        with_krds,
        with_heuristic,
        with_all_three,
        variant_counts,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_rank.rs"]
mod tests;
