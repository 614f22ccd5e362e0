use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::model::cells::MissingCellPolicy;
use crate::model::principles::{PRINCIPLE_COUNT, PrincipleId};
use crate::model::scores::{CompositeScore, PrincipleScoreSet, round2};
use crate::model::sources::{SourceKind, SourceSet, Variant};
use crate::pipeline::stage1_resolve::ResolvedRecord;
use crate::pipeline::stage5_rank::Ranking;
use crate::report::mean;

/// Serializes principle scores as an `N1..N10` object in principle order.
pub struct PrincipleScores<'a>(pub &'a PrincipleScoreSet);

impl Serialize for PrincipleScores<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PRINCIPLE_COUNT))?;
        for principle in PrincipleId::all() {
            map.serialize_entry(&principle.key(), &self.0.get(principle))?;
        }
        map.end()
    }
}

pub struct PrincipleCounts<'a>(pub &'a PrincipleScoreSet);

impl Serialize for PrincipleCounts<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PRINCIPLE_COUNT))?;
        for principle in PrincipleId::all() {
            map.serialize_entry(&principle.key(), &self.0.contributing[principle.index()])?;
        }
        map.end()
    }
}

#[derive(Debug, Serialize)]
pub struct BreakdownRecord {
    pub citizen_nielsen: f64,
    pub krds_score: Option<f64>,
    pub heuristic_nielsen: Option<f64>,
}

#[derive(Serialize)]
pub struct CompositeRecord<'a> {
    pub site_name: &'a str,
    pub url: &'a str,
    pub final_nielsen_score: f64,
    pub data_sources: SourceSet,
    pub variant: Variant,
    pub breakdown: BreakdownRecord,
    pub nielsen_10_principles: PrincipleScores<'a>,
    pub has_krds: bool,
    pub has_heuristic: bool,
}

impl<'a> CompositeRecord<'a> {
    pub fn new(score: &'a CompositeScore) -> Self {
        Self {
            site_name: &score.organization.display_name,
            url: &score.organization.url,
            final_nielsen_score: score.final_score,
            data_sources: score.sources_used,
            variant: score.variant,
            breakdown: BreakdownRecord {
                citizen_nielsen: score.breakdown.citizen,
                krds_score: score.breakdown.krds,
                heuristic_nielsen: score.breakdown.heuristic,
            },
            nielsen_10_principles: PrincipleScores(&score.principles),
            has_krds: score.sources_used.contains(SourceKind::Krds),
            has_heuristic: score.sources_used.contains(SourceKind::Heuristic),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AggregateStatistics {
    pub total_agencies: usize,
    pub average_score: Option<f64>,
    pub highest_score: Option<f64>,
    pub lowest_score: Option<f64>,
    pub with_krds: usize,
    pub with_heuristic: usize,
    pub with_all_three: usize,
    pub variant_counts: BTreeMap<&'static str, usize>,
    /// Missing cells are zero-filled under `zero`, so a low score there may
    /// reflect absent data rather than a true rating.
    pub missing_cell_policy: &'static str,
}

#[derive(Serialize)]
pub struct AggregateDocument<'a> {
    pub statistics: AggregateStatistics,
    pub agencies: Vec<CompositeRecord<'a>>,
}

pub fn aggregate_document(ranking: &Ranking, policy: MissingCellPolicy) -> AggregateDocument<'_> {
    let stats = &ranking.statistics;
    AggregateDocument {
        statistics: AggregateStatistics {
            total_agencies: stats.count,
            average_score: stats.mean,
            highest_score: stats.max,
            lowest_score: stats.min,
            with_krds: stats.with_krds,
            with_heuristic: stats.with_heuristic,
            with_all_three: stats.with_all_three,
            variant_counts: stats
                .variant_counts
                .iter()
                .map(|(v, n)| (v.name(), *n))
                .collect(),
            missing_cell_policy: policy.name(),
        },
        agencies: ranking.sorted.iter().map(CompositeRecord::new).collect(),
    }
}

#[derive(Serialize)]
pub struct HeuristicPrincipleRecord<'a> {
    pub agency: &'a str,
    pub url: &'a str,
    pub canonical_key: Option<&'a str>,
    pub heuristic_average: Option<f64>,
    pub nielsen_scores: PrincipleScores<'a>,
    pub nielsen_overall: f64,
    pub contributing_items: PrincipleCounts<'a>,
}

#[derive(Debug, Serialize)]
pub struct HeuristicStatistics<'a> {
    pub average: Option<f64>,
    pub highest: Option<f64>,
    pub lowest: Option<f64>,
    pub highest_agency: Option<&'a str>,
    pub lowest_agency: Option<&'a str>,
}

#[derive(Serialize)]
pub struct HeuristicDocument<'a> {
    pub total_agencies: usize,
    pub statistics: HeuristicStatistics<'a>,
    pub agencies: Vec<HeuristicPrincipleRecord<'a>>,
}

/// `records` and `sets` are parallel, one entry per heuristic record.
pub fn heuristic_document<'a>(
    records: &'a [ResolvedRecord],
    sets: &'a [PrincipleScoreSet],
) -> HeuristicDocument<'a> {
    let agencies = records
        .iter()
        .zip(sets)
        .map(|(resolved, set)| HeuristicPrincipleRecord {
            agency: &resolved.record.raw_identifier,
            url: &resolved.record.url,
            canonical_key: resolved.resolution.canonical_key.as_deref(),
            heuristic_average: resolved.record.reported_average,
            nielsen_scores: PrincipleScores(set),
            nielsen_overall: set.overall,
            contributing_items: PrincipleCounts(set),
        })
        .collect::<Vec<_>>();

    // First agency wins ties on either end.
    let mut highest: Option<&HeuristicPrincipleRecord<'_>> = None;
    let mut lowest: Option<&HeuristicPrincipleRecord<'_>> = None;
    for a in &agencies {
        if highest.is_none_or(|h| a.nielsen_overall > h.nielsen_overall) {
            highest = Some(a);
        }
        if lowest.is_none_or(|l| a.nielsen_overall < l.nielsen_overall) {
            lowest = Some(a);
        }
    }
    let overalls = agencies.iter().map(|a| a.nielsen_overall).collect::<Vec<_>>();
    let statistics = HeuristicStatistics {
        average: mean(&overalls).map(round2),
        highest: highest.map(|a| a.nielsen_overall),
        lowest: lowest.map(|a| a.nielsen_overall),
        highest_agency: highest.map(|a| a.agency),
        lowest_agency: lowest.map(|a| a.agency),
    };

    HeuristicDocument {
        total_agencies: agencies.len(),
        statistics,
        agencies,
    }
}

pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
