use crate::model::principles::{PRINCIPLE_COUNT, PrincipleId};
use crate::model::sources::{SourceSet, Variant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalOrganization {
    pub canonical_key: String,
    pub display_name: String,
    pub url: String,
}

/// Which principles enter the `overall` mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallRule {
    /// Principles with at least one contributing value.
    Contributing,
    /// Principles whose score is strictly positive. A genuine zero is
    /// indistinguishable from "no data" under this rule.
    PositiveOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrincipleScoreSet {
    pub scores: [f64; PRINCIPLE_COUNT],
    pub contributing: [usize; PRINCIPLE_COUNT],
    pub overall: f64,
    /// Mapped cells that held a value before the missing-cell policy ran.
    pub observed: usize,
}

impl PrincipleScoreSet {
    /// Builds the set from the values collected per principle. Each principle
    /// scores the mean of its values, or `0.0` when nothing contributed.
    ///
    /// `Contributing` averages the unrounded principle means and rounds once;
    /// `PositiveOnly` averages the rounded principle scores.
    pub fn from_collected(collected: &[Vec<f64>; PRINCIPLE_COUNT], rule: OverallRule) -> Self {
        let mut raw = [0.0; PRINCIPLE_COUNT];
        let mut scores = [0.0; PRINCIPLE_COUNT];
        let mut contributing = [0usize; PRINCIPLE_COUNT];
        for (idx, values) in collected.iter().enumerate() {
            contributing[idx] = values.len();
            if !values.is_empty() {
                raw[idx] = values.iter().sum::<f64>() / values.len() as f64;
                scores[idx] = round2(raw[idx]);
            }
        }

        let mut sum = 0.0;
        let mut n = 0usize;
        for idx in 0..PRINCIPLE_COUNT {
            let value = match rule {
                OverallRule::Contributing if contributing[idx] > 0 => raw[idx],
                OverallRule::PositiveOnly if scores[idx] > 0.0 => scores[idx],
                _ => continue,
            };
            sum += value;
            n += 1;
        }
        let overall = if n > 0 { round2(sum / n as f64) } else { 0.0 };

        Self {
            scores,
            contributing,
            overall,
            observed: contributing.iter().sum(),
        }
    }

    /// Overrides the observed-cell count with what the source actually held.
    pub fn with_observed(mut self, observed: usize) -> Self {
        self.observed = observed;
        self
    }

    pub fn get(&self, principle: PrincipleId) -> f64 {
        self.scores[principle.index()]
    }

    /// True when at least one mapped cell held a real value. Zero-filled
    /// missing cells do not count.
    pub fn has_data(&self) -> bool {
        self.observed > 0
    }
}

/// Normalized 0–5 scores for one organization; `None` means the source has
/// nothing for it.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationScoreProfile {
    pub organization: CanonicalOrganization,
    pub citizen: Option<f64>,
    pub krds: Option<f64>,
    pub heuristic: Option<f64>,
    pub citizen_principles: PrincipleScoreSet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakdown {
    pub citizen: f64,
    pub krds: Option<f64>,
    pub heuristic: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeScore {
    pub organization: CanonicalOrganization,
    pub final_score: f64,
    pub sources_used: SourceSet,
    pub variant: Variant,
    pub breakdown: Breakdown,
    pub principles: PrincipleScoreSet,
}

pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/scores.rs"]
mod tests;
