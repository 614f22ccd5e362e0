use super::*;
use crate::model::principles::PRINCIPLE_COUNT;
use crate::model::scores::{CanonicalOrganization, OverallRule, PrincipleScoreSet};

fn profile(citizen: Option<f64>, krds: Option<f64>, heuristic: Option<f64>) -> OrganizationScoreProfile {
    let collected: [Vec<f64>; PRINCIPLE_COUNT] = Default::default();
    OrganizationScoreProfile {
        organization: CanonicalOrganization {
            canonical_key: "Org".to_string(),
            display_name: "Org".to_string(),
            url: "https://org.example".to_string(),
        },
        citizen,
        krds,
        heuristic,
        citizen_principles: PrincipleScoreSet::from_collected(&collected, OverallRule::Contributing),
    }
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

#[test]
fn test_citizen_only() {
    let weights = WeightTable::default_v1();
    let score = combine(&profile(Some(4.0), None, None), &weights).unwrap();
    assert_eq!(score.variant, Variant::CitizenOnly);
    assert_close(score.final_score, 4.0);
    assert_eq!(score.breakdown.krds, None);
    assert_eq!(score.breakdown.heuristic, None);
}

#[test]
fn test_citizen_krds() {
    let weights = WeightTable::default_v1();
    // krds 80/100 arrives normalized as 4.0
    let score = combine(&profile(Some(4.0), Some(4.0), None), &weights).unwrap();
    assert_eq!(score.variant, Variant::CitizenKrds);
    assert_close(score.final_score, 4.0);
    assert_eq!(score.breakdown.krds, Some(4.0));
}

#[test]
fn test_citizen_heuristic() {
    let weights = WeightTable::default_v1();
    let score = combine(&profile(Some(3.0), None, Some(5.0)), &weights).unwrap();
    assert_eq!(score.variant, Variant::CitizenHeuristic);
    assert_close(score.final_score, 4.0);
}

#[test]
fn test_all_sources() {
    let weights = WeightTable::default_v1();
    // 0.4 * 2 + 0.3 * 5 + 0.3 * 4
    let score = combine(&profile(Some(2.0), Some(5.0), Some(4.0)), &weights).unwrap();
    assert_eq!(score.variant, Variant::AllSources);
    assert_close(score.final_score, 3.5);
}

#[test]
fn test_missing_citizen_is_excluded() {
    let weights = WeightTable::default_v1();
    assert!(combine(&profile(None, Some(4.0), Some(4.0)), &weights).is_none());

    let out = run_stage4(
        &[profile(None, Some(4.0), None), profile(Some(1.0), None, None)],
        &weights,
    );
    assert_eq!(out.composites.len(), 1);
    assert_eq!(out.excluded, vec!["Org".to_string()]);
}

#[test]
fn test_sources_used_match_variant() {
    let weights = WeightTable::default_v1();
    let cases = [
        profile(Some(1.0), None, None),
        profile(Some(1.0), Some(2.0), None),
        profile(Some(1.0), None, Some(2.0)),
        profile(Some(1.0), Some(2.0), Some(3.0)),
    ];
    for p in &cases {
        let score = combine(p, &weights).unwrap();
        assert_eq!(score.sources_used, score.variant.sources());
        let row = weights.row(score.variant);
        for kind in SourceKind::ALL {
            assert_eq!(score.sources_used.contains(kind), row.weight(kind) > 0.0);
        }
    }
}

#[test]
fn test_final_score_is_rounded() {
    let weights = WeightTable::default_v1();
    let score = combine(&profile(Some(3.333), Some(1.111), None), &weights).unwrap();
    // 0.6 * 3.333 + 0.4 * 1.111 = 2.4442
    assert_close(score.final_score, 2.44);
    assert_close(score.breakdown.citizen, 3.33);
}

#[test]
fn test_scores_stay_in_range() {
    let weights = WeightTable::default_v1();
    for p in [
        profile(Some(5.0), Some(5.0), Some(5.0)),
        profile(Some(0.0), Some(0.0), Some(0.0)),
    ] {
        let score = combine(&p, &weights).unwrap();
        assert!((0.0..=5.0 + 1e-9).contains(&score.final_score));
    }
}

#[test]
fn test_blank_heuristic_record_leaves_citizen_only() {
    use crate::input::{Scale, SourceBundle, SourceRecord};
    use crate::model::cells::MissingCellPolicy;
    use crate::pipeline::stage1_resolve::run_stage1;
    use crate::pipeline::stage2_redistribute::run_stage2;
    use crate::pipeline::stage3_normalize::run_stage3;
    use crate::tables::FusionTables;

    let tables = FusionTables::builtin();
    let citizen = SourceRecord {
        raw_identifier: "Alpha".to_string(),
        url: String::new(),
        metric_map: (1..=10).map(|i| (format!("Q{i}"), Some(4.0))).collect(),
        scale: Scale::FivePoint,
        reported_average: None,
    };
    let heuristic = SourceRecord {
        raw_identifier: "Alpha".to_string(),
        url: String::new(),
        metric_map: Default::default(),
        scale: Scale::FivePoint,
        reported_average: None,
    };
    let bundle = SourceBundle {
        citizen: vec![citizen],
        krds: None,
        heuristic: Some(vec![heuristic]),
    };
    let s1 = run_stage1(&bundle, &tables);
    let s2 = run_stage2(&s1, &tables.citizen, &tables.heuristic, MissingCellPolicy::Zero);
    let profiles = run_stage3(&s1, &s2);
    let out = run_stage4(&profiles, &tables.weights);
    assert_eq!(out.composites[0].variant, Variant::CitizenOnly);
    assert_close(out.composites[0].final_score, 4.0);
    assert_eq!(out.composites[0].breakdown.heuristic, None);
}
