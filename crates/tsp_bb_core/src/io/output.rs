use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::graph::Graph;
use crate::solution::{Solution, SolutionSink};
use crate::{Result, options::SolverOptions};

const CSV_HEADER: &str = "X1,Y1,X2,Y2";

/// Writes the incumbent best cycle as a CSV snapshot, one included edge per
/// line. The file is rewritten in full on every improvement, so the latest
/// best survives even if the run is killed mid-search.
pub struct CsvSnapshotWriter {
    path: PathBuf,
}

impl CsvSnapshotWriter {
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        Self::new(
            &options.output_dir,
            &options.run_label,
            options.breadth_limit,
        )
    }

    pub fn new(output_dir: &Path, run_label: &str, breadth_limit: usize) -> Result<Self> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            path: output_dir.join(format!("{run_label}_{breadth_limit}.csv")),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_snapshot(&self, graph: &Graph, solution: &Solution) -> Result<()> {
        let mut file = BufWriter::new(File::create(&self.path)?);
        writeln!(file, "{CSV_HEADER}")?;
        for line in solution.export_lines(graph) {
            writeln!(file, "{line}")?;
        }
        file.flush()?;
        Ok(())
    }
}

impl SolutionSink for CsvSnapshotWriter {
    fn on_improvement(&mut self, graph: &Graph, solution: &Solution) {
        log::debug!(
            "output: snapshot len={} path={}",
            solution.length,
            self.path.display()
        );
        // A transient disk failure must not abort the search; the final
        // end-of-run write surfaces its error to the caller instead.
        if let Err(err) = self.write_snapshot(graph, solution) {
            log::warn!(
                "output: failed to write snapshot path={} err={err}",
                self.path.display()
            );
        }
    }
}
