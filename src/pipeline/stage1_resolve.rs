use std::collections::BTreeSet;
use std::fmt;

use tracing::{info, warn};

use crate::input::{SourceBundle, SourceRecord};
use crate::model::scores::CanonicalOrganization;
use crate::model::sources::SourceKind;
use crate::tables::{AliasTable, FusionTables};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchConfidence {
    Exact,
    Alias,
    Substring,
    None,
}

impl MatchConfidence {
    pub fn name(self) -> &'static str {
        match self {
            MatchConfidence::Exact => "exact",
            MatchConfidence::Alias => "alias",
            MatchConfidence::Substring => "substring",
            MatchConfidence::None => "none",
        }
    }
}

impl fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub raw_name: String,
    pub normalized: String,
    pub canonical_key: Option<String>,
    pub confidence: MatchConfidence,
    /// Every key that qualified under substring containment, in key-set
    /// order. The first one is the key that was chosen.
    pub candidates: Vec<String>,
}

impl Resolution {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

/// Maps organization names from any source onto canonical keys.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    separator: &'a str,
    aliases: &'a AliasTable,
}

impl<'a> NameResolver<'a> {
    pub fn new(separator: &'a str, aliases: &'a AliasTable) -> Self {
        Self { separator, aliases }
    }

    pub fn from_tables(tables: &'a FusionTables) -> Self {
        Self::new(&tables.department_separator, &tables.aliases)
    }

    /// Trim, drop parenthesized qualifiers, keep the department segment,
    /// remove whitespace. No alias lookup.
    pub fn normalize_base(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        let unqualified = strip_parenthesized(trimmed);
        let department = match unqualified.find(self.separator) {
            Some(pos) => &unqualified[..pos],
            None => unqualified.as_str(),
        };
        department.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Full normalization: `normalize_base` followed by one alias lookup.
    /// Idempotent because alias targets are never alias keys.
    pub fn normalize(&self, raw: &str) -> String {
        let base = self.normalize_base(raw);
        match self.aliases.get(&base) {
            Some(target) => target.to_string(),
            None => base,
        }
    }

    pub fn resolve(&self, raw: &str, known_keys: &BTreeSet<String>) -> Resolution {
        let base = self.normalize_base(raw);
        let normalized = self.normalize(raw);
        let mut resolution = Resolution {
            raw_name: raw.to_string(),
            normalized: normalized.clone(),
            canonical_key: None,
            confidence: MatchConfidence::None,
            candidates: Vec::new(),
        };

        if normalized.is_empty() {
            return resolution;
        }
        if known_keys.contains(&base) {
            resolution.canonical_key = Some(base);
            resolution.confidence = MatchConfidence::Exact;
            return resolution;
        }
        if normalized != base && known_keys.contains(&normalized) {
            resolution.canonical_key = Some(normalized);
            resolution.confidence = MatchConfidence::Alias;
            return resolution;
        }

        let candidates: Vec<String> = known_keys
            .iter()
            .filter(|key| {
                !key.is_empty() && (key.contains(normalized.as_str()) || normalized.contains(key.as_str()))
            })
            .cloned()
            .collect();
        if let Some(first) = candidates.first() {
            resolution.canonical_key = Some(first.clone());
            resolution.confidence = MatchConfidence::Substring;
        }
        resolution.candidates = candidates;
        resolution
    }
}

/// Removes every `(...)` group; an unmatched `(` is kept as text.
fn strip_parenthesized(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close_rel) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close_rel + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone)]
pub struct CitizenEntry {
    pub organization: CanonicalOrganization,
    pub record: SourceRecord,
}

#[derive(Debug, Clone)]
pub struct ResolvedRecord {
    pub source: SourceKind,
    pub record: SourceRecord,
    pub resolution: Resolution,
}

#[derive(Debug)]
pub struct Stage1Output {
    pub organizations: Vec<CitizenEntry>,
    pub known_keys: BTreeSet<String>,
    pub krds: Vec<ResolvedRecord>,
    pub heuristic: Vec<ResolvedRecord>,
    pub krds_present: bool,
    pub heuristic_present: bool,
}

pub fn run_stage1(bundle: &SourceBundle, tables: &FusionTables) -> Stage1Output {
    let resolver = NameResolver::from_tables(tables);

    let mut organizations = Vec::with_capacity(bundle.citizen.len());
    let mut known_keys = BTreeSet::new();
    for record in &bundle.citizen {
        let canonical_key = resolver.normalize(&record.raw_identifier);
        if canonical_key.is_empty() {
            warn!(
                "citizen record normalizes to an empty key; it cannot be matched: name={:?}",
                record.raw_identifier
            );
        } else if !known_keys.insert(canonical_key.clone()) {
            warn!(
                "duplicate citizen canonical key; both records are kept and share matches: key={}, name={}",
                canonical_key, record.raw_identifier
            );
        }
        organizations.push(CitizenEntry {
            organization: CanonicalOrganization {
                canonical_key,
                display_name: record.raw_identifier.clone(),
                url: record.url.clone(),
            },
            record: record.clone(),
        });
    }

    let krds = resolve_source(SourceKind::Krds, bundle.krds.as_deref(), &resolver, &known_keys);
    let heuristic = resolve_source(
        SourceKind::Heuristic,
        bundle.heuristic.as_deref(),
        &resolver,
        &known_keys,
    );

    Stage1Output {
        organizations,
        known_keys,
        krds,
        heuristic,
        krds_present: bundle.krds.is_some(),
        heuristic_present: bundle.heuristic.is_some(),
    }
}

fn resolve_source(
    source: SourceKind,
    records: Option<&[SourceRecord]>,
    resolver: &NameResolver<'_>,
    known_keys: &BTreeSet<String>,
) -> Vec<ResolvedRecord> {
    let Some(records) = records else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(records.len());
    let mut unresolved = 0usize;
    for record in records {
        let resolution = resolver.resolve(&record.raw_identifier, known_keys);
        match resolution.confidence {
            MatchConfidence::None => {
                unresolved += 1;
                warn!(
                    "{source} name unresolved: name={}, normalized={}",
                    record.raw_identifier, resolution.normalized
                );
            }
            MatchConfidence::Substring if resolution.is_ambiguous() => {
                warn!(
                    "{source} name matched several organizations by containment; using the first: name={}, chosen={}, candidates=[{}]",
                    record.raw_identifier,
                    resolution.canonical_key.as_deref().unwrap_or_default(),
                    resolution.candidates.join(", ")
                );
            }
            _ => {}
        }
        out.push(ResolvedRecord {
            source,
            record: record.clone(),
            resolution,
        });
    }
    info!(
        "{source} resolution: {} records, {} resolved, {} unresolved",
        out.len(),
        out.len() - unresolved,
        unresolved
    );
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_resolve.rs"]
mod tests;
