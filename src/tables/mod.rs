use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub mod defs;
pub mod loader;

use crate::model::principles::PrincipleId;
use crate::model::weights::WeightTable;
use defs::{
    DEFAULT_DEPARTMENT_SEPARATOR, builtin_aliases, builtin_citizen_principles,
    builtin_heuristic_items,
};

pub const MAX_PRINCIPLES_PER_ITEM: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("failed to read tables file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tables file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid alias table: {0}")]
    Alias(String),
    #[error("invalid heuristic mapping: {0}")]
    HeuristicMapping(String),
    #[error("invalid citizen mapping: {0}")]
    CitizenMapping(String),
    #[error("invalid weight table: {0}")]
    Weights(String),
    #[error("invalid department separator: {0}")]
    Separator(String),
}

/// Exact post-normalization name to canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<String, String>,
}

impl AliasTable {
    /// Keys and targets are stored without whitespace. A target may not be
    /// another alias key, so one lookup always reaches a fixed point.
    pub fn new<I, K, V>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for (key, target) in entries {
            let key = strip_whitespace(key.as_ref());
            let target = strip_whitespace(target.as_ref());
            if key.is_empty() || target.is_empty() {
                return Err(TableError::Alias("empty alias key or target".to_string()));
            }
            if let Some(prev) = map.insert(key.clone(), target.clone()) {
                if prev != target {
                    return Err(TableError::Alias(format!(
                        "{key} maps to both {prev} and {target}"
                    )));
                }
            }
        }
        for (key, target) in &map {
            if key != target && map.contains_key(target) {
                return Err(TableError::Alias(format!(
                    "{key} -> {target} chains into another alias"
                )));
            }
        }
        Ok(Self { entries: map })
    }

    pub fn builtin() -> Self {
        let entries = builtin_aliases()
            .iter()
            .map(|(k, v)| (strip_whitespace(k), strip_whitespace(v)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicMappingEntry {
    pub item: String,
    pub principles: Vec<PrincipleId>,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicMapping {
    pub entries: Vec<HeuristicMappingEntry>,
}

impl HeuristicMapping {
    pub fn new(entries: Vec<HeuristicMappingEntry>) -> Result<Self, TableError> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if !seen.insert(entry.item.as_str()) {
                return Err(TableError::HeuristicMapping(format!(
                    "item {} is listed twice",
                    entry.item
                )));
            }
            if !(entry.weight > 0.0 && entry.weight <= 1.0) {
                return Err(TableError::HeuristicMapping(format!(
                    "item {} has weight {} outside (0, 1]",
                    entry.item, entry.weight
                )));
            }
            let n = entry.principles.len();
            if n == 0 || n > MAX_PRINCIPLES_PER_ITEM {
                return Err(TableError::HeuristicMapping(format!(
                    "item {} maps to {n} principles, expected 1..={MAX_PRINCIPLES_PER_ITEM}",
                    entry.item
                )));
            }
            let distinct: BTreeSet<_> = entry.principles.iter().collect();
            if distinct.len() != n {
                return Err(TableError::HeuristicMapping(format!(
                    "item {} repeats a principle",
                    entry.item
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> Self {
        let entries = builtin_heuristic_items()
            .iter()
            .map(|def| HeuristicMappingEntry {
                item: def.item.to_string(),
                principles: def
                    .principles
                    .iter()
                    .filter_map(|&p| PrincipleId::new(p))
                    .collect(),
                weight: def.weight,
            })
            .collect();
        Self { entries }
    }

    pub fn entry(&self, item: &str) -> Option<&HeuristicMappingEntry> {
        self.entries.iter().find(|e| e.item == item)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CitizenMappingEntry {
    pub principle: PrincipleId,
    pub questions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CitizenMapping {
    pub entries: Vec<CitizenMappingEntry>,
}

impl CitizenMapping {
    pub fn new(entries: Vec<CitizenMappingEntry>) -> Result<Self, TableError> {
        let mut seen = BTreeSet::new();
        for entry in &entries {
            if !seen.insert(entry.principle) {
                return Err(TableError::CitizenMapping(format!(
                    "principle {} is listed twice",
                    entry.principle
                )));
            }
            if entry.questions.is_empty() {
                return Err(TableError::CitizenMapping(format!(
                    "principle {} has no questions",
                    entry.principle
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> Self {
        let entries = builtin_citizen_principles()
            .iter()
            .filter_map(|def| {
                Some(CitizenMappingEntry {
                    principle: PrincipleId::new(def.principle)?,
                    questions: def.questions.iter().map(|q| q.to_string()).collect(),
                })
            })
            .collect();
        Self { entries }
    }
}

/// Every static table the pipeline consults, passed explicitly into the
/// stages that need it.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionTables {
    pub department_separator: String,
    pub aliases: AliasTable,
    pub heuristic: HeuristicMapping,
    pub citizen: CitizenMapping,
    pub weights: WeightTable,
}

impl FusionTables {
    pub fn builtin() -> Self {
        Self {
            department_separator: DEFAULT_DEPARTMENT_SEPARATOR.to_string(),
            aliases: AliasTable::builtin(),
            heuristic: HeuristicMapping::builtin(),
            citizen: CitizenMapping::builtin(),
            weights: WeightTable::default_v1(),
        }
    }
}

impl Default for FusionTables {
    fn default() -> Self {
        Self::builtin()
    }
}

pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/tables/tests.rs"]
mod tests;
