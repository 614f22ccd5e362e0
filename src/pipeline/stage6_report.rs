use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::model::cells::MissingCellPolicy;
use crate::pipeline::stage1_resolve::{MatchConfidence, ResolvedRecord, Stage1Output};
use crate::pipeline::stage2_redistribute::Stage2Output;
use crate::pipeline::stage4_combine::Stage4Output;
use crate::pipeline::stage5_rank::Ranking;
use crate::report::json::{aggregate_document, heuristic_document, render_json};
use crate::report::text::{NameIssue, ReportContext, render_report_text};
use crate::report::tsv_field;

pub const AGGREGATE_FILE: &str = "final_integrated_scores.json";
pub const HEURISTIC_FILE: &str = "heuristic_principles.json";
pub const REPORT_FILE: &str = "report.txt";
pub const AUDIT_FILE: &str = "resolution_audit.tsv";

#[derive(Debug, Clone)]
pub struct Stage6Input<'a> {
    pub stage1: &'a Stage1Output,
    pub stage2: &'a Stage2Output,
    pub stage4: &'a Stage4Output,
    pub ranking: &'a Ranking,
    pub policy: MissingCellPolicy,
    pub top_n: usize,
}

/// Writes every output into `out_dir` and returns the paths written.
/// The heuristic principle document is only produced when that source was
/// loaded.
pub fn write_reports(input: &Stage6Input<'_>, out_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::new();

    let aggregate_path = out_dir.join(AGGREGATE_FILE);
    let doc = aggregate_document(input.ranking, input.policy);
    write_text(&aggregate_path, &render_json(&doc)?)?;
    written.push(aggregate_path);

    if input.stage1.heuristic_present {
        let heuristic_path = out_dir.join(HEURISTIC_FILE);
        let doc = heuristic_document(&input.stage1.heuristic, &input.stage2.heuristic);
        write_text(&heuristic_path, &render_json(&doc)?)?;
        written.push(heuristic_path);
    }

    let report_path = out_dir.join(REPORT_FILE);
    write_text(&report_path, &render_report_text(&build_report_context(input)))?;
    written.push(report_path);

    let audit_path = out_dir.join(AUDIT_FILE);
    write_resolution_audit(
        input.stage1.krds.iter().chain(&input.stage1.heuristic),
        &audit_path,
    )?;
    written.push(audit_path);

    info!("wrote {} output files to {}", written.len(), out_dir.display());
    Ok(written)
}

fn build_report_context<'a>(input: &Stage6Input<'a>) -> ReportContext<'a> {
    let resolved = input.stage1.krds.iter().chain(&input.stage1.heuristic);
    let mut unresolved = Vec::new();
    let mut ambiguous = Vec::new();
    for r in resolved {
        let issue = NameIssue {
            source: r.source,
            raw_name: &r.resolution.raw_name,
            candidates: &r.resolution.candidates,
        };
        if r.resolution.confidence == MatchConfidence::None {
            unresolved.push(issue);
        } else if r.resolution.is_ambiguous() {
            ambiguous.push(issue);
        }
    }

    ReportContext {
        ranking: input.ranking,
        top_n: input.top_n,
        policy: input.policy,
        citizen_records: input.stage1.organizations.len(),
        organization_keys: input.stage1.known_keys.len(),
        krds_present: input.stage1.krds_present,
        heuristic_present: input.stage1.heuristic_present,
        excluded: &input.stage4.excluded,
        unresolved,
        ambiguous,
        unmapped_items: &input.stage2.unmapped_items,
    }
}

fn write_resolution_audit<'a>(
    records: impl Iterator<Item = &'a ResolvedRecord>,
    path: &Path,
) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(w, "source\traw_name\tnormalized\tcanonical_key\tconfidence\tcandidates")?;
    for r in records {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            r.source,
            tsv_field(&r.resolution.raw_name),
            tsv_field(&r.resolution.normalized),
            tsv_field(r.resolution.canonical_key.as_deref().unwrap_or("")),
            r.resolution.confidence,
            tsv_field(&r.resolution.candidates.join(";"))
        )?;
    }
    w.flush()
}

fn write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    w.write_all(contents.as_bytes())?;
    w.flush()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_report.rs"]
mod tests;
