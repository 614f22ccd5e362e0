use super::*;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("usability_fusion_main_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn args(extra: &[&str]) -> Vec<String> {
    let mut out = vec!["usability-fusion".to_string(), "run".to_string()];
    out.extend(extra.iter().map(|s| s.to_string()));
    out
}

#[test]
fn test_parse_args_defaults() {
    let parsed = parse_args(args(&["--citizen", "c.json", "--out", "out"])).unwrap();
    assert_eq!(parsed.sources.citizen, PathBuf::from("c.json"));
    assert_eq!(parsed.sources.krds, None);
    assert_eq!(parsed.sources.heuristic, None);
    assert_eq!(parsed.out_dir, PathBuf::from("out"));
    assert_eq!(parsed.top_n, DEFAULT_TOP_N);
    assert_eq!(parsed.policy, MissingCellPolicy::Zero);
}

#[test]
fn test_parse_args_all_options() {
    let parsed = parse_args(args(&[
        "--citizen",
        "c.json",
        "--krds",
        "k.json",
        "--heuristic",
        "h.json.gz",
        "--tables",
        "t.json",
        "--out",
        "out",
        "--top-n",
        "3",
        "--missing-cells",
        "exclude",
    ]))
    .unwrap();
    assert_eq!(parsed.sources.krds, Some(PathBuf::from("k.json")));
    assert_eq!(parsed.sources.heuristic, Some(PathBuf::from("h.json.gz")));
    assert_eq!(parsed.tables_path, Some(PathBuf::from("t.json")));
    assert_eq!(parsed.top_n, 3);
    assert_eq!(parsed.policy, MissingCellPolicy::Exclude);
}

#[test]
fn test_parse_args_rejects_unknown_policy() {
    let err = parse_args(args(&[
        "--citizen",
        "c.json",
        "--out",
        "out",
        "--missing-cells",
        "guess",
    ]));
    assert!(err.is_err());
}

#[test]
fn test_run_end_to_end() {
    let dir = make_temp_dir();
    let citizen = dir.join("citizen.json");
    fs::write(
        &citizen,
        r#"[
            {"name": "Alpha", "url": "https://alpha.example",
             "scores": {"Q1": 4, "Q2": 4, "Q3": 4, "Q4": 4, "Q5": 4,
                        "Q6": 4, "Q7": 4, "Q8": 4, "Q9": 4, "Q10": 4}},
            {"site_name": "Beta", "url": "https://beta.example",
             "scores": {"Q1": 2, "Q2": 2, "Q3": 2, "Q4": 2, "Q5": 2,
                        "Q6": 2, "Q7": 2, "Q8": 2, "Q9": 2, "Q10": 2}}
        ]"#,
    )
    .unwrap();
    let krds = dir.join("krds.json");
    fs::write(
        &krds,
        r#"{"agencies": [{"department": "Beta", "full_name": "Beta - Portal", "krds_convenience": 80}]}"#,
    )
    .unwrap();
    let out = dir.join("out");

    let config = parse_args(args(&[
        "--citizen",
        citizen.to_str().unwrap(),
        "--krds",
        krds.to_str().unwrap(),
        "--heuristic",
        dir.join("missing.json").to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
    ]))
    .unwrap();
    run(&config).unwrap();

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("final_integrated_scores.json")).unwrap())
            .unwrap();
    assert_eq!(doc["statistics"]["total_agencies"], 2);
    assert_eq!(doc["statistics"]["with_krds"], 1);
    assert_eq!(doc["agencies"][0]["site_name"], "Alpha");
    assert_eq!(doc["agencies"][1]["final_nielsen_score"], 2.8);
    assert!(out.join("report.txt").exists());
    assert!(!out.join("heuristic_principles.json").exists());
}

#[test]
fn test_run_missing_citizen_is_fatal() {
    let dir = make_temp_dir();
    let config = parse_args(args(&[
        "--citizen",
        dir.join("nope.json").to_str().unwrap(),
        "--out",
        dir.join("out").to_str().unwrap(),
    ]))
    .unwrap();
    let err = run(&config).unwrap_err();
    assert!(matches!(err, RunError::Input(InputError::MissingInput(_))));
}
