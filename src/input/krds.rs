use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::input::reader::read_json;
use crate::input::{InputError, RecordList, Scale, ScoreCell, SourceRecord, validated_cell};
use crate::model::sources::SourceKind;

pub const KRDS_METRIC: &str = "krds_convenience";

/// Convenience diagnostic record. `full_name` is "department - site".
#[derive(Debug, Clone, Deserialize)]
pub struct KrdsRecord {
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub krds_convenience: ScoreCell,
    #[serde(default)]
    pub source_file: String,
}

impl KrdsRecord {
    /// The identifier resolved against citizen names: `full_name`, or the
    /// department when the full name is blank.
    pub fn identifier(&self) -> &str {
        if self.full_name.trim().is_empty() {
            self.department.trim()
        } else {
            self.full_name.trim()
        }
    }

    pub fn into_source_record(self) -> SourceRecord {
        let name = self.identifier().to_string();
        let value = validated_cell(
            SourceKind::Krds,
            &name,
            KRDS_METRIC,
            self.krds_convenience,
            Scale::Hundred,
        );
        let mut metric_map = BTreeMap::new();
        metric_map.insert(KRDS_METRIC.to_string(), value);
        SourceRecord {
            raw_identifier: name,
            url: String::new(),
            metric_map,
            scale: Scale::Hundred,
            reported_average: value,
        }
    }
}

pub fn load_krds(path: &Path) -> Result<Vec<SourceRecord>, InputError> {
    let records: RecordList<KrdsRecord> = read_json(path)?;
    Ok(records
        .into_vec()
        .into_iter()
        .map(KrdsRecord::into_source_record)
        .collect())
}
