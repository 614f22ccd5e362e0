use super::*;

#[test]
fn test_format_score() {
    assert_eq!(format_score(4.0), "4.00");
    assert_eq!(format_score(3.456), "3.46");
    assert_eq!(format_opt_score(None), "-");
    assert_eq!(format_opt_score(Some(2.5)), "2.50");
}

#[test]
fn test_mean() {
    assert_eq!(mean(&[]), None);
    assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
}

#[test]
fn test_tsv_field_strips_separators() {
    assert_eq!(tsv_field("a\tb\nc"), "a b c");
    assert_eq!(tsv_field("행정안전부"), "행정안전부");
}
