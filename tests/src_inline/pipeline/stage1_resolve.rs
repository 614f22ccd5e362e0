use std::collections::{BTreeMap, BTreeSet};

use super::*;
use crate::input::Scale;

fn keys(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn record(name: &str) -> SourceRecord {
    SourceRecord {
        raw_identifier: name.to_string(),
        url: String::new(),
        metric_map: BTreeMap::new(),
        scale: Scale::FivePoint,
        reported_average: None,
    }
}

#[test]
fn test_normalization_steps() {
    let tables = FusionTables::builtin();
    let r = NameResolver::from_tables(&tables);
    assert_eq!(r.normalize("  Agency (portal) "), "Agency");
    assert_eq!(r.normalize("성평등가족부 - 대표누리집"), "여성가족부");
    assert_eq!(r.normalize("Big Agency - Sub Site - Extra"), "BigAgency");
    assert_eq!(r.normalize("농식품 ON"), "농림축산식품부");
    assert_eq!(r.normalize("Unclosed (paren"), "Unclosed(paren");
}

#[test]
fn test_normalize_is_idempotent() {
    let tables = FusionTables::builtin();
    let r = NameResolver::from_tables(&tables);
    let names = [
        "  Agency (portal) ",
        "성평등가족부 - 대표누리집",
        "행정안전부_대한민국전자관보",
        "대검찰청",
        "A (x) B (y) - C",
        "((nested)) name",
        "a)b(c",
        "Unclosed (paren",
        "",
        "   ",
        "Tab\tSeparated - Site",
    ];
    for name in names {
        let once = r.normalize(name);
        assert_eq!(r.normalize(&once), once, "not idempotent for {name:?}");
    }
}

#[test]
fn test_resolve_exact() {
    let tables = FusionTables::builtin();
    let r = NameResolver::from_tables(&tables);
    let res = r.resolve("법무부 - 대표누리집", &keys(&["법무부", "국세청"]));
    assert_eq!(res.canonical_key.as_deref(), Some("법무부"));
    assert_eq!(res.confidence, MatchConfidence::Exact);
    assert!(res.candidates.is_empty());
}

#[test]
fn test_resolve_alias() {
    let tables = FusionTables::builtin();
    let r = NameResolver::from_tables(&tables);
    let res = r.resolve("대검찰청", &keys(&["법무부"]));
    assert_eq!(res.canonical_key.as_deref(), Some("법무부"));
    assert_eq!(res.confidence, MatchConfidence::Alias);
}

#[test]
fn test_resolve_substring_both_directions() {
    let tables = FusionTables::builtin();
    let r = NameResolver::from_tables(&tables);

    let res = r.resolve("해양경찰", &keys(&["해양경찰청"]));
    assert_eq!(res.confidence, MatchConfidence::Substring);
    assert_eq!(res.canonical_key.as_deref(), Some("해양경찰청"));
    assert!(!res.is_ambiguous());

    let res = r.resolve("통계청누리집", &keys(&["통계청"]));
    assert_eq!(res.confidence, MatchConfidence::Substring);
    assert_eq!(res.canonical_key.as_deref(), Some("통계청"));
}

#[test]
fn test_resolve_substring_ambiguity_reports_all_candidates() {
    let tables = FusionTables::builtin();
    let r = NameResolver::from_tables(&tables);
    let known = keys(&["Tax", "TaxOffice", "Customs"]);
    let res = r.resolve("TaxOfficeOnline", &known);
    assert_eq!(res.confidence, MatchConfidence::Substring);
    assert!(res.is_ambiguous());
    assert_eq!(res.candidates, vec!["Tax".to_string(), "TaxOffice".to_string()]);
    // first in key-set order wins
    assert_eq!(res.canonical_key.as_deref(), Some("Tax"));
}

#[test]
fn test_resolve_none() {
    let tables = FusionTables::builtin();
    let r = NameResolver::from_tables(&tables);
    let res = r.resolve("Nowhere", &keys(&["Agency"]));
    assert_eq!(res.confidence, MatchConfidence::None);
    assert_eq!(res.canonical_key, None);

    let res = r.resolve("(only qualifier)", &keys(&["Agency"]));
    assert_eq!(res.normalized, "");
    assert_eq!(res.confidence, MatchConfidence::None);
}

#[test]
fn test_custom_alias_table_substitutes_builtin() {
    let aliases = AliasTable::new([("Old Name", "New Name")]).unwrap();
    let r = NameResolver::new(" - ", &aliases);
    let res = r.resolve("Old Name - Site", &keys(&["NewName"]));
    assert_eq!(res.confidence, MatchConfidence::Alias);
    assert_eq!(r.normalize("대검찰청"), "대검찰청");
}

#[test]
fn test_run_stage1_resolves_sources_against_citizen_keys() {
    let tables = FusionTables::builtin();
    let bundle = SourceBundle {
        citizen: vec![record("법무부"), record("국세청 (대표)"), record("Agency Z")],
        krds: Some(vec![record("법무부 - 대표누리집"), record("Unknown - Site")]),
        heuristic: None,
    };
    let out = run_stage1(&bundle, &tables);
    assert_eq!(out.organizations.len(), 3);
    assert_eq!(out.organizations[1].organization.canonical_key, "국세청");
    assert_eq!(out.organizations[1].organization.display_name, "국세청 (대표)");
    assert_eq!(out.known_keys.len(), 3);
    assert!(out.krds_present);
    assert!(!out.heuristic_present);
    assert_eq!(out.krds.len(), 2);
    assert_eq!(out.krds[0].resolution.confidence, MatchConfidence::Exact);
    assert_eq!(out.krds[1].resolution.confidence, MatchConfidence::None);
    assert!(out.heuristic.is_empty());
}

#[test]
fn test_run_stage1_keeps_duplicate_citizen_rows() {
    let tables = FusionTables::builtin();
    let bundle = SourceBundle {
        citizen: vec![record("법무부"), record("대검찰청")],
        krds: None,
        heuristic: None,
    };
    let out = run_stage1(&bundle, &tables);
    assert_eq!(out.organizations.len(), 2);
    assert_eq!(out.known_keys.len(), 1);
    assert_eq!(out.organizations[1].organization.canonical_key, "법무부");
}
