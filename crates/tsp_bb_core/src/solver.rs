use std::{path::PathBuf, time::Instant};

use tsp_bb_derive::New;

use crate::graph::Graph;
use crate::input::CityRecord;
use crate::io::output::CsvSnapshotWriter;
use crate::options::SolverOptions;
use crate::search::SearchContext;
use crate::{Error, Result};

/// Outcome of one solver run.
#[derive(Clone, Debug, New)]
pub struct SolveReport {
    pub best_length: f64,
    pub improvements: u64,
    pub elapsed_seconds: f64,
    pub output_path: PathBuf,
}

/// Builds the graph, runs the branch-and-bound search with CSV snapshots on
/// every improvement, and rewrites the final best once the search is done.
pub fn solve(records: &[CityRecord], options: &SolverOptions) -> Result<SolveReport> {
    let start = Instant::now();

    let graph = Graph::build(records)?;
    log::info!(
        "graph: n={} edges={} anchor_id={}",
        graph.n(),
        graph.edge_count(),
        graph.city(graph.anchor()).id()
    );

    let mut writer = CsvSnapshotWriter::from_options(options)?;
    let mut ctx = SearchContext::new(&graph, options.breadth_limit)?;

    let best = ctx
        .run(&mut writer)
        .ok_or_else(|| Error::invalid_data("search finished without a complete cycle"))?;

    // Mid-run snapshots are best-effort; this one is not.
    writer.write_snapshot(&graph, &best)?;

    let elapsed = start.elapsed().as_secs_f64();
    log::info!(
        "solve: best_len={} improvements={} time={elapsed:.2}s",
        best.length,
        ctx.improvements()
    );

    Ok(SolveReport::new(
        best.length,
        ctx.improvements(),
        elapsed,
        writer.path().to_path_buf(),
    ))
}
