//! Exact and breadth-limited branch-and-bound TSP solving over planar
//! points, with anytime CSV snapshots of the incumbent best cycle.

mod error;
mod graph;
mod io;
pub mod logging;
mod node;
mod search;
mod solution;
mod solver;

pub(crate) use io::{input, options};

pub use error::{Error, Result};
pub use graph::{City, Edge, EdgeId, Graph, MIN_CITIES};
pub use io::input::{CityRecord, read_cities};
pub use io::options::{LogFormat, LogLevel, SolverOptions};
pub use io::output::CsvSnapshotWriter;
pub use node::CityPoint;
pub use search::SearchContext;
pub use solution::{NullSink, Solution, SolutionSink};
pub use solver::{SolveReport, solve};
