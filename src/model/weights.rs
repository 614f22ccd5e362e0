use serde::Deserialize;

use crate::model::sources::{SourceKind, Variant};

pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightRow {
    #[serde(default)]
    pub citizen: f64,
    #[serde(default)]
    pub krds: f64,
    #[serde(default)]
    pub heuristic: f64,
}

impl WeightRow {
    pub const fn new(citizen: f64, krds: f64, heuristic: f64) -> Self {
        Self {
            citizen,
            krds,
            heuristic,
        }
    }

    pub fn weight(&self, kind: SourceKind) -> f64 {
        match kind {
            SourceKind::Citizen => self.citizen,
            SourceKind::Krds => self.krds,
            SourceKind::Heuristic => self.heuristic,
        }
    }

    pub fn sum(&self) -> f64 {
        self.citizen + self.krds + self.heuristic
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightTable {
    pub citizen_only: WeightRow,
    pub citizen_krds: WeightRow,
    pub citizen_heuristic: WeightRow,
    pub all_sources: WeightRow,
}

impl WeightTable {
    pub fn default_v1() -> Self {
        Self {
            citizen_only: WeightRow::new(1.0, 0.0, 0.0),
            citizen_krds: WeightRow::new(0.6, 0.4, 0.0),
            citizen_heuristic: WeightRow::new(0.5, 0.0, 0.5),
            all_sources: WeightRow::new(0.4, 0.3, 0.3),
        }
    }

    pub fn row(&self, variant: Variant) -> &WeightRow {
        match variant {
            Variant::CitizenOnly => &self.citizen_only,
            Variant::CitizenKrds => &self.citizen_krds,
            Variant::CitizenHeuristic => &self.citizen_heuristic,
            Variant::AllSources => &self.all_sources,
        }
    }

    /// Every row must weight exactly its variant's sources and sum to 1.0.
    pub fn validate(&self) -> Result<(), String> {
        for variant in Variant::ALL {
            let row = self.row(variant);
            let sources = variant.sources();
            for kind in SourceKind::ALL {
                let w = row.weight(kind);
                if !w.is_finite() || w < 0.0 {
                    return Err(format!("{variant}: {kind} weight {w} is not a finite non-negative number"));
                }
                if sources.contains(kind) && w == 0.0 {
                    return Err(format!("{variant}: {kind} is part of the variant but weighted 0"));
                }
                if !sources.contains(kind) && w != 0.0 {
                    return Err(format!("{variant}: {kind} is not part of the variant but weighted {w}"));
                }
            }
            let sum = row.sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(format!("{variant}: weights sum to {sum}, expected 1.0"));
            }
        }
        Ok(())
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/weights.rs"]
mod tests;
