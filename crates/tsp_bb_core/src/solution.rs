use tsp_bb_derive::New;

use crate::graph::{EdgeId, Graph};

/// Snapshot of the best cycle found so far: total length plus the included
/// edge ids in global edge-table order (closing edge included).
#[derive(Clone, Debug, New)]
pub struct Solution {
    pub length: f64,
    pub edges: Vec<EdgeId>,
}

impl Solution {
    /// One `x1,y1,x2,y2` line per included edge, in edge-table order.
    pub fn export_lines<'g>(&'g self, graph: &'g Graph) -> impl Iterator<Item = &'g str> {
        self.edges.iter().map(move |&e| graph.edge(e).export())
    }
}

/// Receives each strict improvement as it is found. The search keeps
/// running while the sink handles the snapshot, so implementations must not
/// block and must not fail the search.
pub trait SolutionSink {
    fn on_improvement(&mut self, graph: &Graph, solution: &Solution);
}

/// Discards improvement notifications.
pub struct NullSink;

impl SolutionSink for NullSink {
    fn on_improvement(&mut self, _graph: &Graph, _solution: &Solution) {}
}
