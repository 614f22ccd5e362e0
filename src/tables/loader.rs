use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::model::principles::PrincipleId;
use crate::model::weights::WeightTable;
use crate::pipeline::stage1_resolve::NameResolver;
use crate::tables::{
    AliasTable, CitizenMapping, CitizenMappingEntry, FusionTables, HeuristicMapping,
    HeuristicMappingEntry, TableError,
};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TablesFile {
    department_separator: Option<String>,
    aliases: Option<BTreeMap<String, String>>,
    heuristic_mapping: Option<Vec<HeuristicItemSpec>>,
    citizen_mapping: Option<Vec<CitizenPrincipleSpec>>,
    weights: Option<WeightTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HeuristicItemSpec {
    item: String,
    principles: Vec<PrincipleId>,
    weight: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CitizenPrincipleSpec {
    principle: PrincipleId,
    questions: Vec<String>,
}

/// Built-in tables, with any table present in `path` replacing its built-in
/// counterpart wholesale.
pub fn load_tables(path: Option<&Path>) -> Result<FusionTables, TableError> {
    let Some(path) = path else {
        let tables = FusionTables::builtin();
        validate_tables(&tables)?;
        return Ok(tables);
    };

    let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: TablesFile = serde_json::from_str(&text).map_err(|source| TableError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let tables = apply_overrides(FusionTables::builtin(), file)?;
    validate_tables(&tables)?;

    info!(
        "loaded tables from {}: {} aliases, {} heuristic items, {} citizen principles",
        path.display(),
        tables.aliases.len(),
        tables.heuristic.entries.len(),
        tables.citizen.entries.len()
    );
    Ok(tables)
}

fn apply_overrides(mut tables: FusionTables, file: TablesFile) -> Result<FusionTables, TableError> {
    if let Some(sep) = file.department_separator {
        tables.department_separator = sep;
    }
    if let Some(aliases) = file.aliases {
        tables.aliases = AliasTable::new(aliases)?;
    }
    if let Some(items) = file.heuristic_mapping {
        let entries = items
            .into_iter()
            .map(|def| HeuristicMappingEntry {
                item: def.item,
                principles: def.principles,
                weight: def.weight,
            })
            .collect();
        tables.heuristic = HeuristicMapping::new(entries)?;
    }
    if let Some(principles) = file.citizen_mapping {
        let entries = principles
            .into_iter()
            .map(|def| CitizenMappingEntry {
                principle: def.principle,
                questions: def.questions,
            })
            .collect();
        tables.citizen = CitizenMapping::new(entries)?;
    }
    if let Some(weights) = file.weights {
        tables.weights = weights;
    }
    Ok(tables)
}

/// Beyond per-table checks: the separator and alias targets must keep name
/// normalization idempotent.
fn validate_tables(tables: &FusionTables) -> Result<(), TableError> {
    let sep = tables.department_separator.as_str();
    if sep.trim().is_empty() {
        return Err(TableError::Separator(
            "separator must contain a non-whitespace character".to_string(),
        ));
    }
    // whitespace removal could otherwise splice a new separator together
    if sep.chars().count() > 1 && !sep.chars().any(char::is_whitespace) {
        return Err(TableError::Separator(format!(
            "multi-character separator {sep:?} must contain whitespace"
        )));
    }

    let resolver = NameResolver::from_tables(tables);
    for (key, target) in tables.aliases.iter() {
        if resolver.normalize_base(target) != target {
            return Err(TableError::Alias(format!(
                "target {target} of {key} is not in normalized form"
            )));
        }
    }

    tables.weights.validate().map_err(TableError::Weights)
}
