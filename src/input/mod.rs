use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use tracing::{info, warn};

pub mod citizen;
pub mod heuristic;
pub mod krds;
pub mod reader;

use crate::model::sources::SourceKind;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing input: {0}")]
    MissingInput(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Native scale of a source's scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    FivePoint,
    Hundred,
}

impl Scale {
    pub fn max(self) -> f64 {
        match self {
            Scale::FivePoint => 5.0,
            Scale::Hundred => 100.0,
        }
    }

    pub fn contains(self, value: f64) -> bool {
        value.is_finite() && (0.0..=self.max()).contains(&value)
    }
}

/// A score cell as it appears in a source file. Numbers and numeric strings
/// are read; `null`, blanks and anything else are missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreCell(pub Option<f64>);

impl<'de> Deserialize<'de> for ScoreCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let parsed = match value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(ScoreCell(parsed.filter(|v| v.is_finite())))
    }
}

/// One organization's scores from one source, before any resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub raw_identifier: String,
    pub url: String,
    pub metric_map: BTreeMap<String, Option<f64>>,
    pub scale: Scale,
    pub reported_average: Option<f64>,
}

impl SourceRecord {
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metric_map.get(name).copied().flatten()
    }
}

/// Reads a cell against its native scale; values outside it are malformed
/// and become missing.
pub fn validated_cell(
    source: SourceKind,
    record: &str,
    metric: &str,
    cell: ScoreCell,
    scale: Scale,
) -> Option<f64> {
    let value = cell.0?;
    if scale.contains(value) {
        Some(value)
    } else {
        warn!(
            "{source} score out of range; treating as missing: record={}, metric={}, value={}, max={}",
            record,
            metric,
            value,
            scale.max()
        );
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub citizen: PathBuf,
    pub krds: Option<PathBuf>,
    pub heuristic: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct SourceBundle {
    pub citizen: Vec<SourceRecord>,
    pub krds: Option<Vec<SourceRecord>>,
    pub heuristic: Option<Vec<SourceRecord>>,
}

/// Loads all three sources. The citizen file is the base layer and must
/// exist; an absent optional file leaves that source empty for every
/// organization.
pub fn load_sources(paths: &SourcePaths) -> Result<SourceBundle, InputError> {
    if !paths.citizen.exists() {
        return Err(InputError::MissingInput(format!(
            "citizen source {} does not exist",
            paths.citizen.display()
        )));
    }
    let citizen = citizen::load_citizen(&paths.citizen)?;
    if citizen.is_empty() {
        return Err(InputError::InvalidInput(format!(
            "citizen source {} contains no records",
            paths.citizen.display()
        )));
    }
    info!(
        "loaded citizen source: {} records from {}",
        citizen.len(),
        paths.citizen.display()
    );

    let krds = match optional_path(SourceKind::Krds, paths.krds.as_deref()) {
        Some(path) => Some(krds::load_krds(path)?),
        None => None,
    };
    let heuristic = match optional_path(SourceKind::Heuristic, paths.heuristic.as_deref()) {
        Some(path) => Some(heuristic::load_heuristic(path)?),
        None => None,
    };

    Ok(SourceBundle {
        citizen,
        krds,
        heuristic,
    })
}

fn optional_path(kind: SourceKind, path: Option<&Path>) -> Option<&Path> {
    let Some(path) = path else {
        info!("{kind} source not configured; treating as absent");
        return None;
    };
    if path.exists() {
        Some(path)
    } else {
        warn!(
            "{kind} source {} does not exist; treating as absent",
            path.display()
        );
        None
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordList<T> {
    Bare(Vec<T>),
    Wrapped { agencies: Vec<T> },
}

impl<T> RecordList<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            RecordList::Bare(v) => v,
            RecordList::Wrapped { agencies } => agencies,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
