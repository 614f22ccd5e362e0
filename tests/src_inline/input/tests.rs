use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use super::krds::KRDS_METRIC;
use super::*;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("usability_fusion_input_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_file(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

const CITIZEN: &str = r#"[
  {"name": "Agency A", "url": "https://a.example", "scores": {"Q1": 4.0, "Q2": "3.5", "Q3": null, "Q4": "n/a", "Q5": 7.0},
   "convenience_avg": 3.9, "design_avg": 3.8, "total_avg": 3.85},
  {"site_name": "Agency B (portal)", "scores": {"Q1": 2}}
]"#;

#[test]
fn test_score_cell_coercion() {
    let dir = make_temp_dir();
    let path = dir.join("citizen.json");
    write_file(&path, CITIZEN);
    let records = citizen::load_citizen(&path).unwrap();
    assert_eq!(records.len(), 2);

    let a = &records[0];
    assert_eq!(a.raw_identifier, "Agency A");
    assert_eq!(a.scale, Scale::FivePoint);
    assert_eq!(a.metric("Q1"), Some(4.0));
    assert_eq!(a.metric("Q2"), Some(3.5));
    assert_eq!(a.metric("Q3"), None);
    assert_eq!(a.metric("Q4"), None);
    // out of the 0-5 range is malformed
    assert_eq!(a.metric("Q5"), None);
    assert_eq!(a.reported_average, Some(3.85));

    let b = &records[1];
    assert_eq!(b.raw_identifier, "Agency B (portal)");
    assert_eq!(b.url, "");
    assert_eq!(b.metric("Q1"), Some(2.0));
}

#[test]
fn test_krds_list_and_wrapped_forms() {
    let dir = make_temp_dir();
    let list = dir.join("krds_list.json");
    write_file(
        &list,
        r#"[{"department": "Dept", "site_name": "Main", "full_name": "Dept - Main", "krds_convenience": 80, "source_file": "x.docx"}]"#,
    );
    let wrapped = dir.join("krds_wrapped.json");
    write_file(
        &wrapped,
        r#"{"agencies": [{"department": "Dept", "full_name": "", "krds_convenience": 120}]}"#,
    );

    let a = krds::load_krds(&list).unwrap();
    assert_eq!(a[0].raw_identifier, "Dept - Main");
    assert_eq!(a[0].scale, Scale::Hundred);
    assert_eq!(a[0].metric(KRDS_METRIC), Some(80.0));

    let b = krds::load_krds(&wrapped).unwrap();
    assert_eq!(b[0].raw_identifier, "Dept");
    assert_eq!(b[0].metric(KRDS_METRIC), None);
}

#[test]
fn test_heuristic_wrapped_file_gz() {
    let dir = make_temp_dir();
    let path = dir.join("heuristic.json.gz");
    write_gz(
        &path,
        r#"{"total_agencies": 1, "agencies": [
            {"agency": "Agency A", "url": "https://a.example",
             "scores": {"item_a": 4.0, "item_b": 0, "item_c": ""},
             "overall_average": 4.0, "total_items": 3, "valid_items": 1}
        ], "statistics": {}}"#,
    );
    let records = heuristic::load_heuristic(&path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].metric("item_a"), Some(4.0));
    assert_eq!(records[0].metric("item_b"), Some(0.0));
    assert_eq!(records[0].metric("item_c"), None);
    assert_eq!(records[0].reported_average, Some(4.0));
}

#[test]
fn test_missing_citizen_is_fatal() {
    let dir = make_temp_dir();
    let paths = SourcePaths {
        citizen: dir.join("nope.json"),
        krds: None,
        heuristic: None,
    };
    assert!(matches!(
        load_sources(&paths).unwrap_err(),
        InputError::MissingInput(_)
    ));
}

#[test]
fn test_missing_optional_sources_are_absent() {
    let dir = make_temp_dir();
    let citizen = dir.join("citizen.json");
    write_file(&citizen, CITIZEN);
    let paths = SourcePaths {
        citizen,
        krds: Some(dir.join("missing_krds.json")),
        heuristic: None,
    };
    let bundle = load_sources(&paths).unwrap();
    assert_eq!(bundle.citizen.len(), 2);
    assert!(bundle.krds.is_none());
    assert!(bundle.heuristic.is_none());
}

#[test]
fn test_corrupt_optional_source_is_fatal() {
    let dir = make_temp_dir();
    let citizen = dir.join("citizen.json");
    write_file(&citizen, CITIZEN);
    let krds = dir.join("krds.json");
    write_file(&krds, "{not json");
    let paths = SourcePaths {
        citizen,
        krds: Some(krds),
        heuristic: None,
    };
    assert!(matches!(
        load_sources(&paths).unwrap_err(),
        InputError::Parse { .. }
    ));
}

#[test]
fn test_empty_citizen_is_invalid() {
    let dir = make_temp_dir();
    let citizen = dir.join("citizen.json");
    write_file(&citizen, "[]");
    let paths = SourcePaths {
        citizen,
        krds: None,
        heuristic: None,
    };
    assert!(matches!(
        load_sources(&paths).unwrap_err(),
        InputError::InvalidInput(_)
    ));
}
