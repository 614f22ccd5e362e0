use tracing::{info, warn};

use crate::model::scores::{Breakdown, CompositeScore, OrganizationScoreProfile, round2};
use crate::model::sources::{SourceKind, SourceSet, Variant};
use crate::model::weights::WeightTable;

#[derive(Debug)]
pub struct Stage4Output {
    pub composites: Vec<CompositeScore>,
    /// Canonical keys of organizations that had no citizen score.
    pub excluded: Vec<String>,
}

/// Weighted sum over the sources the profile actually has. Returns `None`
/// when the citizen score is absent, since every variant requires it.
pub fn combine(profile: &OrganizationScoreProfile, weights: &WeightTable) -> Option<CompositeScore> {
    let citizen = profile.citizen?;

    let mut sources = SourceSet::of(&[SourceKind::Citizen]);
    if profile.krds.is_some() {
        sources.insert(SourceKind::Krds);
    }
    if profile.heuristic.is_some() {
        sources.insert(SourceKind::Heuristic);
    }
    let variant = Variant::for_sources(sources)?;
    let row = weights.row(variant);

    let mut total = row.citizen * citizen;
    if let Some(krds) = profile.krds {
        total += row.krds * krds;
    }
    if let Some(heuristic) = profile.heuristic {
        total += row.heuristic * heuristic;
    }

    Some(CompositeScore {
        organization: profile.organization.clone(),
        final_score: round2(total),
        sources_used: sources,
        variant,
        breakdown: Breakdown {
            citizen: round2(citizen),
            krds: profile.krds.map(round2),
            heuristic: profile.heuristic.map(round2),
        },
        principles: profile.citizen_principles.clone(),
    })
}

pub fn run_stage4(profiles: &[OrganizationScoreProfile], weights: &WeightTable) -> Stage4Output {
    let mut composites = Vec::with_capacity(profiles.len());
    let mut excluded = Vec::new();
    for profile in profiles {
        match combine(profile, weights) {
            Some(score) => composites.push(score),
            None => {
                warn!(
                    "organization has no citizen score and is left out of the ranking: key={}",
                    profile.organization.canonical_key
                );
                excluded.push(profile.organization.canonical_key.clone());
            }
        }
    }
    info!(
        "combined {} organizations ({} without citizen data)",
        composites.len(),
        excluded.len()
    );
    Stage4Output {
        composites,
        excluded,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_combine.rs"]
mod tests;
