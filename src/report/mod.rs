pub mod json;
pub mod text;

/// Two-decimal rendering used by every human-readable output.
pub fn format_score(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn format_opt_score(v: Option<f64>) -> String {
    match v {
        Some(v) => format_score(v),
        None => "-".to_string(),
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Tabs and line breaks would corrupt a TSV row.
pub fn tsv_field(s: &str) -> String {
    s.chars()
        .map(|c| if matches!(c, '\t' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
