mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod tables;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::input::{InputError, SourcePaths, load_sources};
use crate::model::cells::MissingCellPolicy;
use crate::pipeline::stage1_resolve::run_stage1;
use crate::pipeline::stage2_redistribute::run_stage2;
use crate::pipeline::stage3_normalize::run_stage3;
use crate::pipeline::stage4_combine::run_stage4;
use crate::pipeline::stage5_rank::{DEFAULT_TOP_N, rank};
use crate::pipeline::stage6_report::{Stage6Input, write_reports};
use crate::tables::TableError;
use crate::tables::loader::load_tables;

#[derive(Debug, Parser)]
#[command(name = "usability-fusion", version, about = "Fuse per-source usability scores into one ranked score per organization")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full fusion pipeline and write all outputs.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Citizen survey records (JSON, optionally .gz).
    #[arg(long, env = "FUSION_CITIZEN", value_name = "PATH")]
    citizen: PathBuf,

    /// Convenience diagnostic records.
    #[arg(long, env = "FUSION_KRDS", value_name = "PATH")]
    krds: Option<PathBuf>,

    /// Heuristic audit records.
    #[arg(long, env = "FUSION_HEURISTIC", value_name = "PATH")]
    heuristic: Option<PathBuf>,

    /// Output directory.
    #[arg(long, env = "FUSION_OUT", value_name = "DIR")]
    out: PathBuf,

    /// JSON overrides for aliases, mappings and weights.
    #[arg(long, env = "FUSION_TABLES", value_name = "PATH")]
    tables: Option<PathBuf>,

    #[arg(long, env = "FUSION_TOP_N", default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    #[arg(long, env = "FUSION_MISSING_CELLS", value_enum, default_value_t = MissingCellsArg::Zero)]
    missing_cells: MissingCellsArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MissingCellsArg {
    Zero,
    Exclude,
}

impl From<MissingCellsArg> for MissingCellPolicy {
    fn from(arg: MissingCellsArg) -> Self {
        match arg {
            MissingCellsArg::Zero => MissingCellPolicy::Zero,
            MissingCellsArg::Exclude => MissingCellPolicy::Exclude,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RunConfig {
    sources: SourcePaths,
    out_dir: PathBuf,
    tables_path: Option<PathBuf>,
    top_n: usize,
    policy: MissingCellPolicy,
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Tables(#[from] TableError),
    #[error("failed to write outputs to {path}: {source}")]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn main() {
    logging::init_logging();
    let config = match parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(err) => err.exit(),
    };
    if let Err(err) = run(&config) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn parse_args<I, T>(args: I) -> Result<RunConfig, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    let Command::Run(args) = cli.command;
    Ok(RunConfig {
        sources: SourcePaths {
            citizen: args.citizen,
            krds: args.krds,
            heuristic: args.heuristic,
        },
        out_dir: args.out,
        tables_path: args.tables,
        top_n: args.top_n,
        policy: args.missing_cells.into(),
    })
}

fn run(config: &RunConfig) -> Result<(), RunError> {
    info!(
        "usability-fusion {}: missing_cells={}, top_n={}",
        env!("CARGO_PKG_VERSION"),
        config.policy,
        config.top_n
    );
    let tables = load_tables(config.tables_path.as_deref())?;
    let bundle = load_sources(&config.sources)?;

    let stage1 = run_stage1(&bundle, &tables);
    let stage2 = run_stage2(&stage1, &tables.citizen, &tables.heuristic, config.policy);
    let profiles = run_stage3(&stage1, &stage2);
    let stage4 = run_stage4(&profiles, &tables.weights);
    let ranking = rank(stage4.composites.clone(), config.top_n);

    let input = Stage6Input {
        stage1: &stage1,
        stage2: &stage2,
        stage4: &stage4,
        ranking: &ranking,
        policy: config.policy,
        top_n: config.top_n,
    };
    write_outputs(&input, &config.out_dir)
}

fn write_outputs(input: &Stage6Input<'_>, out_dir: &Path) -> Result<(), RunError> {
    let written = write_reports(input, out_dir).map_err(|source| RunError::Output {
        path: out_dir.to_path_buf(),
        source,
    })?;
    for path in &written {
        info!("wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
