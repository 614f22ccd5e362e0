use std::collections::BTreeSet;

use crate::model::cells::MissingCellPolicy;
use crate::model::principles::PrincipleId;
use crate::model::scores::CompositeScore;
use crate::model::sources::{SourceKind, Variant};
use crate::pipeline::stage5_rank::Ranking;
use crate::report::{format_opt_score, format_score};

#[derive(Debug, Clone)]
pub struct NameIssue<'a> {
    pub source: SourceKind,
    pub raw_name: &'a str,
    pub candidates: &'a [String],
}

#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub ranking: &'a Ranking,
    pub top_n: usize,
    pub policy: MissingCellPolicy,
    pub citizen_records: usize,
    pub organization_keys: usize,
    pub krds_present: bool,
    pub heuristic_present: bool,
    pub excluded: &'a [String],
    pub unresolved: Vec<NameIssue<'a>>,
    pub ambiguous: Vec<NameIssue<'a>>,
    pub unmapped_items: &'a BTreeSet<String>,
}

pub fn render_report_text(ctx: &ReportContext<'_>) -> String {
    let stats = &ctx.ranking.statistics;
    let mut out = String::new();

    out.push_str("Integrated Usability Score Report\n");
    out.push_str("=================================\n\n");

    out.push_str("1. Overview\n");
    out.push_str(&format!("Organizations ranked: {}\n", stats.count));
    out.push_str(&format!("Citizen records: {}\n", ctx.citizen_records));
    out.push_str(&format!("Distinct organization keys: {}\n", ctx.organization_keys));
    out.push_str(&format!("Average score: {}\n", format_opt_score(stats.mean)));
    out.push_str(&format!("Highest score: {}\n", format_opt_score(stats.max)));
    out.push_str(&format!("Lowest score: {}\n", format_opt_score(stats.min)));
    out.push_str(&format!("Missing cell policy: {}\n", ctx.policy));
    if ctx.policy == MissingCellPolicy::Zero {
        out.push_str("Note: missing score cells count as 0.0 and lower the affected means.\n");
    }
    out.push('\n');

    out.push_str("2. Source coverage\n");
    out.push_str(&format!(
        "KRDS source: {}\n",
        source_state(ctx.krds_present)
    ));
    out.push_str(&format!(
        "Heuristic source: {}\n",
        source_state(ctx.heuristic_present)
    ));
    out.push_str(&format!("With KRDS: {}\n", stats.with_krds));
    out.push_str(&format!("With heuristic: {}\n", stats.with_heuristic));
    out.push_str(&format!("With all three: {}\n", stats.with_all_three));
    for variant in Variant::ALL {
        let n = stats.variant_counts.get(&variant).copied().unwrap_or(0);
        out.push_str(&format!("Variant {}: {}\n", variant, n));
    }
    out.push('\n');

    out.push_str(&format!("3. Top {}\n", ctx.top_n));
    push_table(&mut out, &ctx.ranking.top_n, 1);
    out.push('\n');

    out.push_str(&format!("4. Bottom {}\n", ctx.top_n));
    let first_rank = ctx.ranking.sorted.len() - ctx.ranking.bottom_n.len() + 1;
    push_table(&mut out, &ctx.ranking.bottom_n, first_rank);
    out.push('\n');

    out.push_str("5. Strongest principles (population mean)\n");
    for (principle, value) in principle_means(&ctx.ranking.sorted) {
        out.push_str(&format!(
            "{} {}: {}\n",
            principle.key(),
            principle.name(),
            format_score(value)
        ));
    }
    out.push('\n');

    out.push_str("6. Data quality\n");
    out.push_str(&format!(
        "Excluded without citizen data: {}\n",
        list_or_none(ctx.excluded.iter().map(String::as_str))
    ));
    out.push_str(&format!("Unresolved names: {}\n", ctx.unresolved.len()));
    for issue in &ctx.unresolved {
        out.push_str(&format!("  [{}] {}\n", issue.source, issue.raw_name));
    }
    out.push_str(&format!("Ambiguous names: {}\n", ctx.ambiguous.len()));
    for issue in &ctx.ambiguous {
        out.push_str(&format!(
            "  [{}] {} -> {}\n",
            issue.source,
            issue.raw_name,
            issue.candidates.join(", ")
        ));
    }
    out.push_str(&format!(
        "Unmapped heuristic items: {}\n",
        list_or_none(ctx.unmapped_items.iter().map(String::as_str))
    ));

    out
}

fn push_table(out: &mut String, rows: &[CompositeScore], first_rank: usize) {
    if rows.is_empty() {
        out.push_str("(none)\n");
        return;
    }
    out.push_str("rank\tscore\tcitizen\tkrds\theuristic\tvariant\tname\n");
    for (i, c) in rows.iter().enumerate() {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            first_rank + i,
            format_score(c.final_score),
            format_score(c.breakdown.citizen),
            format_opt_score(c.breakdown.krds),
            format_opt_score(c.breakdown.heuristic),
            c.variant,
            c.organization.display_name
        ));
    }
}

/// Citizen principle means across the population, highest first.
fn principle_means(composites: &[CompositeScore]) -> Vec<(PrincipleId, f64)> {
    if composites.is_empty() {
        return Vec::new();
    }
    let mut means = PrincipleId::all()
        .map(|p| {
            let sum = composites.iter().map(|c| c.principles.get(p)).sum::<f64>();
            (p, sum / composites.len() as f64)
        })
        .collect::<Vec<_>>();
    means.sort_by(|a, b| b.1.total_cmp(&a.1));
    means
}

fn source_state(present: bool) -> &'static str {
    if present { "loaded" } else { "absent" }
}

fn list_or_none<'a>(items: impl Iterator<Item = &'a str>) -> String {
    let items = items.collect::<Vec<_>>();
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
