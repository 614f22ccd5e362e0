use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::input::reader::read_json;
use crate::input::{InputError, RecordList, Scale, ScoreCell, SourceRecord, validated_cell};
use crate::model::sources::SourceKind;

#[derive(Debug, Clone, Deserialize)]
pub struct CitizenRecord {
    #[serde(alias = "site_name")]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub scores: BTreeMap<String, ScoreCell>,
    #[serde(default)]
    pub convenience_avg: ScoreCell,
    #[serde(default)]
    pub design_avg: ScoreCell,
    #[serde(default)]
    pub total_avg: ScoreCell,
}

impl CitizenRecord {
    pub fn into_source_record(self) -> SourceRecord {
        let name = self.name.trim().to_string();
        let metric_map = self
            .scores
            .into_iter()
            .map(|(question, cell)| {
                let value = validated_cell(
                    SourceKind::Citizen,
                    &name,
                    &question,
                    cell,
                    Scale::FivePoint,
                );
                (question, value)
            })
            .collect();
        SourceRecord {
            raw_identifier: name,
            url: self.url,
            metric_map,
            scale: Scale::FivePoint,
            reported_average: self.total_avg.0,
        }
    }
}

pub fn load_citizen(path: &Path) -> Result<Vec<SourceRecord>, InputError> {
    let records: RecordList<CitizenRecord> = read_json(path)?;
    Ok(records
        .into_vec()
        .into_iter()
        .map(CitizenRecord::into_source_record)
        .collect())
}
