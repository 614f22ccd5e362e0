use std::collections::{BTreeMap, BTreeSet};

use tracing::warn;

use crate::model::cells::MissingCellPolicy;
use crate::model::principles::PRINCIPLE_COUNT;
use crate::model::scores::{OverallRule, PrincipleScoreSet};
use crate::pipeline::stage1_resolve::Stage1Output;
use crate::tables::{CitizenMapping, HeuristicMapping};

#[derive(Debug)]
pub struct Stage2Output {
    /// Parallel to `Stage1Output::organizations`.
    pub citizen: Vec<PrincipleScoreSet>,
    /// Parallel to `Stage1Output::heuristic`.
    pub heuristic: Vec<PrincipleScoreSet>,
    pub unmapped_items: BTreeSet<String>,
}

pub fn run_stage2(
    stage1: &Stage1Output,
    citizen_mapping: &CitizenMapping,
    heuristic_mapping: &HeuristicMapping,
    policy: MissingCellPolicy,
) -> Stage2Output {
    let citizen = stage1
        .organizations
        .iter()
        .map(|entry| redistribute_citizen(&entry.record.metric_map, citizen_mapping, policy))
        .collect();

    let mut unmapped_items = BTreeSet::new();
    let mut heuristic = Vec::with_capacity(stage1.heuristic.len());
    for resolved in &stage1.heuristic {
        for item in resolved.record.metric_map.keys() {
            if heuristic_mapping.entry(item).is_none() {
                unmapped_items.insert(item.clone());
            }
        }
        heuristic.push(redistribute_heuristic(
            &resolved.record.metric_map,
            heuristic_mapping,
            policy,
        ));
    }
    if !unmapped_items.is_empty() {
        warn!(
            "heuristic items without a principle mapping were ignored: [{}]",
            unmapped_items.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    Stage2Output {
        citizen,
        heuristic,
        unmapped_items,
    }
}

/// Fans each mapped item out to its principles as `score * weight`; a
/// principle scores the mean of what it received. `overall` averages only
/// principles scoring above zero.
pub fn redistribute_heuristic(
    items: &BTreeMap<String, Option<f64>>,
    mapping: &HeuristicMapping,
    policy: MissingCellPolicy,
) -> PrincipleScoreSet {
    let mut collected: [Vec<f64>; PRINCIPLE_COUNT] = Default::default();
    let mut observed = 0usize;
    for entry in &mapping.entries {
        let cell = items.get(&entry.item).copied().flatten();
        if cell.is_some() {
            observed += 1;
        }
        let Some(score) = policy.apply(cell) else {
            continue;
        };
        for principle in &entry.principles {
            collected[principle.index()].push(score * entry.weight);
        }
    }
    PrincipleScoreSet::from_collected(&collected, OverallRule::PositiveOnly).with_observed(observed)
}

/// Each principle is the plain mean of its survey questions; `overall`
/// averages every principle that received at least one answer.
pub fn redistribute_citizen(
    questions: &BTreeMap<String, Option<f64>>,
    mapping: &CitizenMapping,
    policy: MissingCellPolicy,
) -> PrincipleScoreSet {
    let mut collected: [Vec<f64>; PRINCIPLE_COUNT] = Default::default();
    let mut observed = 0usize;
    for entry in &mapping.entries {
        for question in &entry.questions {
            let cell = questions.get(question).copied().flatten();
            if cell.is_some() {
                observed += 1;
            }
            if let Some(score) = policy.apply(cell) {
                collected[entry.principle.index()].push(score);
            }
        }
    }
    PrincipleScoreSet::from_collected(&collected, OverallRule::Contributing).with_observed(observed)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_redistribute.rs"]
mod tests;
