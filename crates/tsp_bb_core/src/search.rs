//! Depth-first branch-and-bound over the complete city graph.
//!
//! The walk builds a simple path edge by edge, shortest candidates first.
//! A branch is cut as soon as its accumulated length reaches the incumbent
//! best cycle, and once a frame has seen any completed solution below it,
//! the breadth limit caps how many of its remaining candidate edges are
//! tried. Every tentative edge inclusion is undone when the child frame
//! reports back, so after `run` returns all scratch state is back to its
//! initial values.

use crate::graph::{EdgeId, Graph};
use crate::solution::{Solution, SolutionSink};
use crate::{Error, Result};

/// One activation of the walk: the city being expanded, the cursor into its
/// length-sorted incident list, the path length accumulated on entry, and
/// whether any descendant has completed a solution. `pending` is the edge
/// tentatively included for the child currently below this frame.
#[derive(Debug)]
struct Frame {
    city: usize,
    cursor: usize,
    acc: f64,
    have_solution: bool,
    pending: Option<EdgeId>,
}

/// All mutable state of one solver run. The graph itself stays immutable;
/// inclusion flags, per-city degrees, visited flags and the incumbent best
/// live here so the engine is re-entrant and testable in isolation.
#[derive(Debug)]
pub struct SearchContext<'g> {
    graph: &'g Graph,
    breadth_limit: usize,
    included: Vec<bool>,
    degree: Vec<u8>,
    visited: Vec<bool>,
    active_edges: usize,
    target_edges: usize,
    best_length: f64,
    best_edges: Vec<EdgeId>,
    improvements: u64,
}

impl<'g> SearchContext<'g> {
    pub fn new(graph: &'g Graph, breadth_limit: usize) -> Result<Self> {
        if breadth_limit == 0 {
            return Err(Error::invalid_input("breadth_limit must be positive"));
        }
        Ok(Self {
            graph,
            breadth_limit,
            included: vec![false; graph.edge_count()],
            degree: vec![0; graph.n()],
            visited: vec![false; graph.n()],
            active_edges: 0,
            target_edges: graph.n(),
            best_length: f64::INFINITY,
            best_edges: Vec::new(),
            improvements: 0,
        })
    }

    pub fn best_length(&self) -> f64 {
        self.best_length
    }

    pub fn improvements(&self) -> u64 {
        self.improvements
    }

    /// Runs the search to exhaustion and returns the best cycle found, if
    /// any. Each strict improvement is pushed to `sink` as it happens.
    pub fn run(&mut self, sink: &mut dyn SolutionSink) -> Option<Solution> {
        self.reset_scratch();
        log::debug!(
            "search: n={} edges={} breadth_limit={}",
            self.graph.n(),
            self.graph.edge_count(),
            self.breadth_limit
        );

        let mut stack: Vec<Frame> = Vec::with_capacity(self.graph.n());
        let mut returned = self.enter(self.graph.anchor(), 0.0, &mut stack, sink);

        while let Some(top) = stack.len().checked_sub(1) {
            // A child frame (or an immediate verdict) came back: undo the
            // tentative inclusion and move to the next sibling edge.
            if let Some(found) = returned.take() {
                let frame = &mut stack[top];
                if let Some(edge_id) = frame.pending.take() {
                    self.exclude(edge_id);
                }
                frame.have_solution |= found;
                frame.cursor += 1;
            }

            let city = stack[top].city;
            let next = loop {
                let frame = &stack[top];
                // The breadth cutoff only applies once this frame has a
                // completed solution somewhere below it; a starved frame
                // keeps scanning all the way out.
                if frame.have_solution && frame.cursor >= self.breadth_limit {
                    break None;
                }
                let Some(&edge_id) = self.graph.city(city).incident().get(frame.cursor) else {
                    break None;
                };
                if self.included[edge_id] {
                    stack[top].cursor += 1;
                    continue;
                }
                let far = self.graph.edge(edge_id).other(city);
                if self.visited[far] {
                    stack[top].cursor += 1;
                    continue;
                }
                break Some((edge_id, far));
            };

            let Some((edge_id, far)) = next else {
                // Frame exhausted: leave the city and report upward.
                self.visited[city] = false;
                let Some(frame) = stack.pop() else { break };
                debug_assert!(frame.pending.is_none());
                returned = Some(frame.have_solution);
                continue;
            };

            let acc = stack[top].acc + self.graph.edge(edge_id).length();
            self.include(edge_id);
            stack[top].pending = Some(edge_id);
            returned = self.enter(far, acc, &mut stack, sink);
        }

        debug_assert!(self.scratch_is_clean());

        if self.best_edges.is_empty() {
            None
        } else {
            Some(Solution::new(self.best_length, self.best_edges.clone()))
        }
    }

    /// Either pushes a new frame for `city` or returns the immediate
    /// verdict: `Some(false)` when the branch is cut by the incumbent,
    /// `Some(true)` when the path is complete (improving or not).
    fn enter(
        &mut self,
        city: usize,
        acc: f64,
        stack: &mut Vec<Frame>,
        sink: &mut dyn SolutionSink,
    ) -> Option<bool> {
        // Re-read the incumbent on every entry; a deeper branch may have
        // lowered it since this subtree was started.
        if acc >= self.best_length {
            return Some(false);
        }
        if self.active_edges == self.target_edges - 1 {
            self.propose(acc, sink);
            return Some(true);
        }
        self.visited[city] = true;
        stack.push(Frame {
            city,
            cursor: 0,
            acc,
            have_solution: false,
            pending: None,
        });
        None
    }

    /// Completion event: the included edges form a simple path touching
    /// every city. Close the cycle through the anchor and record the result
    /// if it strictly improves the incumbent.
    fn propose(&mut self, acc: f64, sink: &mut dyn SolutionSink) {
        let Some(closing) = self.closing_edge() else {
            // Benign inconsistency (anchor already closed); skip recording.
            return;
        };
        let total = acc + self.graph.edge(closing).length();
        if total >= self.best_length {
            return;
        }

        // Snapshot with the closing edge temporarily included; the path
        // itself is still being unwound by the caller's backtracking.
        self.included[closing] = true;
        self.best_edges = self
            .included
            .iter()
            .enumerate()
            .filter_map(|(id, &included)| included.then_some(id))
            .collect();
        self.included[closing] = false;

        self.best_length = total;
        self.improvements += 1;
        log::info!(
            "search: improved len={total} improvements={}",
            self.improvements
        );

        let snapshot = Solution::new(total, self.best_edges.clone());
        sink.on_improvement(self.graph, &snapshot);
    }

    /// The one edge that turns the completed path into a cycle: a
    /// non-included anchor edge whose far endpoint is an open path end.
    fn closing_edge(&self) -> Option<EdgeId> {
        let anchor = self.graph.anchor();
        self.graph
            .city(anchor)
            .incident()
            .iter()
            .copied()
            .find(|&e| !self.included[e] && self.degree[self.graph.edge(e).other(anchor)] == 1)
    }

    fn include(&mut self, edge_id: EdgeId) {
        let (a, b) = self.graph.edge(edge_id).endpoints();
        self.included[edge_id] = true;
        self.degree[a] += 1;
        self.degree[b] += 1;
        self.active_edges += 1;
    }

    fn exclude(&mut self, edge_id: EdgeId) {
        let (a, b) = self.graph.edge(edge_id).endpoints();
        self.included[edge_id] = false;
        self.degree[a] -= 1;
        self.degree[b] -= 1;
        self.active_edges -= 1;
    }

    fn reset_scratch(&mut self) {
        self.included.fill(false);
        self.degree.fill(0);
        self.visited.fill(false);
        self.active_edges = 0;
    }

    fn scratch_is_clean(&self) -> bool {
        self.active_edges == 0
            && !self.included.iter().any(|&i| i)
            && !self.visited.iter().any(|&v| v)
            && self.degree.iter().all(|&d| d == 0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::SearchContext;
    use crate::CityPoint;
    use crate::graph::Graph;
    use crate::input::CityRecord;
    use crate::solution::{NullSink, Solution, SolutionSink};

    fn graph_of(points: &[(f64, f64)]) -> Graph {
        let records: Vec<CityRecord> = points
            .iter()
            .enumerate()
            .map(|(idx, &(x, y))| CityRecord::new(idx as u32 + 1, CityPoint::new(x, y)))
            .collect();
        Graph::build(&records).expect("build graph")
    }

    fn random_points(seed: u64, n: usize) -> Vec<(f64, f64)> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|_| (rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect()
    }

    fn dist(points: &[(f64, f64)], a: usize, b: usize) -> f64 {
        let dx = points[a].0 - points[b].0;
        let dy = points[a].1 - points[b].1;
        (dx * dx + dy * dy).sqrt()
    }

    fn for_each_permutation(items: &mut Vec<usize>, k: usize, visit: &mut impl FnMut(&[usize])) {
        if k == items.len() {
            visit(items);
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            for_each_permutation(items, k + 1, visit);
            items.swap(k, i);
        }
    }

    /// Exhaustive optimum with city 0 fixed as the cycle start.
    fn brute_force_optimum(points: &[(f64, f64)]) -> f64 {
        let mut rest: Vec<usize> = (1..points.len()).collect();
        let mut best = f64::INFINITY;
        for_each_permutation(&mut rest, 0, &mut |perm| {
            let mut len = 0.0;
            let mut prev = 0;
            for &city in perm {
                len += dist(points, prev, city);
                prev = city;
            }
            len += dist(points, prev, 0);
            if len < best {
                best = len;
            }
        });
        best
    }

    struct Recorder {
        lengths: Vec<f64>,
    }

    impl SolutionSink for Recorder {
        fn on_improvement(&mut self, _graph: &Graph, solution: &Solution) {
            self.lengths.push(solution.length);
        }
    }

    fn assert_single_hamiltonian_cycle(graph: &Graph, solution: &Solution) {
        assert_eq!(solution.edges.len(), graph.n());

        let mut adjacency: HashMap<usize, Vec<usize>> = HashMap::new();
        for &edge_id in &solution.edges {
            let (a, b) = graph.edge(edge_id).endpoints();
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
        for idx in 0..graph.n() {
            assert_eq!(adjacency[&idx].len(), 2, "city {idx} must have degree 2");
        }

        // Walking from the anchor must visit every city before closing.
        let mut seen = vec![false; graph.n()];
        let mut prev = usize::MAX;
        let mut current = 0;
        for _ in 0..graph.n() {
            assert!(!seen[current], "sub-cycle detected at city {current}");
            seen[current] = true;
            let next = adjacency[&current]
                .iter()
                .copied()
                .find(|&c| c != prev)
                .expect("cycle neighbor");
            prev = current;
            current = next;
        }
        assert_eq!(current, 0, "walk must close back at the anchor");
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn unit_square_best_is_the_perimeter() {
        let graph = graph_of(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        let mut ctx = SearchContext::new(&graph, 4).expect("context");
        let best = ctx.run(&mut NullSink).expect("solution");

        assert!((best.length - 4.0).abs() < 1e-12);
        for &edge_id in &best.edges {
            assert!((graph.edge(edge_id).length() - 1.0).abs() < 1e-12);
        }
        assert_single_hamiltonian_cycle(&graph, &best);
    }

    #[test]
    fn triangle_best_is_the_perimeter() {
        let graph = graph_of(&[(0.0, 0.0), (3.0, 0.0), (0.0, 4.0)]);
        let mut ctx = SearchContext::new(&graph, 3).expect("context");
        let best = ctx.run(&mut NullSink).expect("solution");
        assert!((best.length - 12.0).abs() < 1e-12);
    }

    #[test]
    fn full_breadth_matches_brute_force_on_random_instances() {
        for seed in [7, 21, 1999] {
            let points = random_points(seed, 7);
            let graph = graph_of(&points);
            let mut ctx = SearchContext::new(&graph, graph.n()).expect("context");
            let best = ctx.run(&mut NullSink).expect("solution");

            let optimum = brute_force_optimum(&points);
            assert!(
                (best.length - optimum).abs() < 1e-9,
                "seed {seed}: engine {} vs brute force {optimum}",
                best.length
            );
        }
    }

    #[test]
    fn narrow_breadth_still_finds_a_valid_cycle() {
        let points = random_points(11, 8);
        let graph = graph_of(&points);
        let optimum = brute_force_optimum(&points);

        for limit in [1, 2, 3] {
            let mut ctx = SearchContext::new(&graph, limit).expect("context");
            let best = ctx
                .run(&mut NullSink)
                .expect("a starved frame keeps scanning, so some cycle is always found");
            assert_single_hamiltonian_cycle(&graph, &best);
            assert!(
                best.length >= optimum - 1e-9,
                "limit {limit} must never beat the optimum"
            );
        }
    }

    #[test]
    fn widening_the_breadth_never_worsens_the_best_length() {
        let points = [
            (5.0, 5.0),
            (95.0, 10.0),
            (50.0, 50.0),
            (20.0, 80.0),
            (80.0, 85.0),
            (35.0, 20.0),
            (65.0, 35.0),
            (10.0, 45.0),
            (90.0, 60.0),
        ];
        let graph = graph_of(&points);

        let mut lengths = Vec::with_capacity(graph.n());
        for limit in 1..=graph.n() {
            let mut ctx = SearchContext::new(&graph, limit).expect("context");
            let best = ctx.run(&mut NullSink).expect("solution");
            assert_single_hamiltonian_cycle(&graph, &best);
            lengths.push(best.length);
        }

        for (i, pair) in lengths.windows(2).enumerate() {
            assert!(
                pair[1] <= pair[0],
                "limit {} found {} but the narrower limit {} found {}",
                i + 2,
                pair[1],
                i + 1,
                pair[0]
            );
        }
        // This instance improves through several limits before plateauing.
        assert!(lengths.windows(2).any(|pair| pair[1] < pair[0]));

        let optimum = brute_force_optimum(&points);
        assert!((lengths.last().expect("at least one") - optimum).abs() < 1e-9);
    }

    #[test]
    fn improvement_lengths_strictly_decrease() {
        let points = random_points(5, 9);
        let graph = graph_of(&points);
        let mut ctx = SearchContext::new(&graph, graph.n()).expect("context");
        let mut recorder = Recorder {
            lengths: Vec::new(),
        };
        let best = ctx.run(&mut recorder).expect("solution");

        assert!(!recorder.lengths.is_empty());
        for pair in recorder.lengths.windows(2) {
            assert!(pair[1] < pair[0], "improvements must strictly decrease");
        }
        assert_eq!(*recorder.lengths.last().expect("at least one"), best.length);
        assert_eq!(ctx.improvements() as usize, recorder.lengths.len());
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let points = random_points(42, 8);
        let graph = graph_of(&points);

        let mut first = SearchContext::new(&graph, 3).expect("context");
        let mut second = SearchContext::new(&graph, 3).expect("context");
        let a = first.run(&mut NullSink).expect("solution");
        let b = second.run(&mut NullSink).expect("solution");

        assert_eq!(a.length.to_bits(), b.length.to_bits());
        assert_eq!(a.edges, b.edges);
        let lines_a: Vec<&str> = a.export_lines(&graph).collect();
        let lines_b: Vec<&str> = b.export_lines(&graph).collect();
        assert_eq!(lines_a, lines_b);
    }

    #[test]
    fn scratch_state_is_restored_after_run() {
        let points = random_points(13, 7);
        let graph = graph_of(&points);
        let mut ctx = SearchContext::new(&graph, 2).expect("context");
        ctx.run(&mut NullSink).expect("solution");

        assert_eq!(ctx.active_edges, 0);
        assert!(ctx.included.iter().all(|&i| !i));
        assert!(ctx.visited.iter().all(|&v| !v));
        assert!(ctx.degree.iter().all(|&d| d == 0));
    }

    #[test]
    fn zero_breadth_limit_is_rejected() {
        let graph = graph_of(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
        let err = SearchContext::new(&graph, 0).expect_err("zero breadth");
        assert!(err.to_string().contains("breadth_limit"));
    }
}
