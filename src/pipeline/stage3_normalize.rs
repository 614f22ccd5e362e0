use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::input::Scale;
use crate::input::krds::KRDS_METRIC;
use crate::model::scores::{OrganizationScoreProfile, PrincipleScoreSet};
use crate::model::sources::SourceKind;
use crate::pipeline::stage1_resolve::{ResolvedRecord, Stage1Output};
use crate::pipeline::stage2_redistribute::Stage2Output;

pub const COMMON_SCALE_MAX: f64 = 5.0;

/// Maps a value on `scale` onto the common 0–5 scale.
pub fn normalize_score(value: f64, scale: Scale) -> f64 {
    value * COMMON_SCALE_MAX / scale.max()
}

pub fn run_stage3(stage1: &Stage1Output, stage2: &Stage2Output) -> Vec<OrganizationScoreProfile> {
    let krds = index_krds(&stage1.krds);
    let heuristic = index_heuristic(&stage1.heuristic, &stage2.heuristic);

    let mut profiles = Vec::with_capacity(stage1.organizations.len());
    for (entry, citizen_set) in stage1.organizations.iter().zip(&stage2.citizen) {
        let key = entry.organization.canonical_key.as_str();
        let citizen = if citizen_set.has_data() {
            Some(normalize_score(citizen_set.overall, entry.record.scale))
        } else {
            None
        };
        profiles.push(OrganizationScoreProfile {
            organization: entry.organization.clone(),
            citizen,
            krds: krds.get(key).copied(),
            heuristic: heuristic.get(key).map(|set| set.overall),
            citizen_principles: citizen_set.clone(),
        });
    }
    profiles
}

fn index_krds(records: &[ResolvedRecord]) -> BTreeMap<&str, f64> {
    let mut out = BTreeMap::new();
    for resolved in records {
        let Some(key) = resolved.resolution.canonical_key.as_deref() else {
            continue;
        };
        let Some(raw) = resolved.record.metric(KRDS_METRIC) else {
            debug!(
                "krds record has no usable score: name={}",
                resolved.record.raw_identifier
            );
            continue;
        };
        if out.contains_key(key) {
            warn!(
                "duplicate {} record for organization; keeping first: key={}, name={}",
                SourceKind::Krds,
                key,
                resolved.record.raw_identifier
            );
            continue;
        }
        out.insert(key, normalize_score(raw, resolved.record.scale));
    }
    out
}

fn index_heuristic<'a>(
    records: &'a [ResolvedRecord],
    sets: &'a [PrincipleScoreSet],
) -> BTreeMap<&'a str, &'a PrincipleScoreSet> {
    let mut out = BTreeMap::new();
    for (resolved, set) in records.iter().zip(sets) {
        let Some(key) = resolved.resolution.canonical_key.as_deref() else {
            continue;
        };
        if !set.has_data() {
            debug!(
                "heuristic record has no usable items: name={}",
                resolved.record.raw_identifier
            );
            continue;
        }
        if out.contains_key(key) {
            warn!(
                "duplicate {} record for organization; keeping first: key={}, name={}",
                SourceKind::Heuristic,
                key,
                resolved.record.raw_identifier
            );
            continue;
        }
        out.insert(key, set);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_normalize.rs"]
mod tests;
