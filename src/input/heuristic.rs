use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::input::reader::read_json;
use crate::input::{InputError, RecordList, Scale, ScoreCell, SourceRecord, validated_cell};
use crate::model::scores::round2;
use crate::model::sources::SourceKind;

#[derive(Debug, Clone, Deserialize)]
pub struct HeuristicRecord {
    pub agency: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub scores: BTreeMap<String, ScoreCell>,
    #[serde(default)]
    pub overall_average: ScoreCell,
    #[serde(default)]
    pub total_items: Option<usize>,
    #[serde(default)]
    pub valid_items: Option<usize>,
}

impl HeuristicRecord {
    /// Recomputes the record's own summary (mean and count of items above
    /// zero) and logs any disagreement with what the file reports.
    fn check_summary(&self, metric_map: &BTreeMap<String, Option<f64>>) {
        let valid: Vec<f64> = metric_map
            .values()
            .filter_map(|v| *v)
            .filter(|&v| v > 0.0)
            .collect();
        let average = if valid.is_empty() {
            0.0
        } else {
            round2(valid.iter().sum::<f64>() / valid.len() as f64)
        };
        if let Some(reported) = self.overall_average.0 {
            if (reported - average).abs() > 0.01 {
                debug!(
                    "heuristic overall_average disagrees with items: agency={}, reported={}, recomputed={}",
                    self.agency, reported, average
                );
            }
        }
        if let Some(reported) = self.valid_items {
            if reported != valid.len() {
                debug!(
                    "heuristic valid_items disagrees with items: agency={}, reported={}, recomputed={}",
                    self.agency,
                    reported,
                    valid.len()
                );
            }
        }
        if let Some(total) = self.total_items {
            if total != metric_map.len() {
                debug!(
                    "heuristic total_items disagrees with items: agency={}, reported={}, present={}",
                    self.agency,
                    total,
                    metric_map.len()
                );
            }
        }
    }

    pub fn into_source_record(self) -> SourceRecord {
        let name = self.agency.trim().to_string();
        let metric_map: BTreeMap<String, Option<f64>> = self
            .scores
            .iter()
            .map(|(item, cell)| {
                let value =
                    validated_cell(SourceKind::Heuristic, &name, item, *cell, Scale::FivePoint);
                (item.clone(), value)
            })
            .collect();
        self.check_summary(&metric_map);
        SourceRecord {
            raw_identifier: name,
            url: self.url,
            metric_map,
            scale: Scale::FivePoint,
            reported_average: self.overall_average.0,
        }
    }
}

pub fn load_heuristic(path: &Path) -> Result<Vec<SourceRecord>, InputError> {
    let records: RecordList<HeuristicRecord> = read_json(path)?;
    Ok(records
        .into_vec()
        .into_iter()
        .map(HeuristicRecord::into_source_record)
        .collect())
}
