use crate::{CityPoint, Error, Result, input::CityRecord};

/// Index into the global edge table.
pub type EdgeId = usize;

/// A complete cycle needs at least a triangle; anything smaller is rejected
/// before the search starts.
pub const MIN_CITIES: usize = 3;

/// One input city: label, location, and its incident edges sorted ascending
/// by length. Fixed once the graph is built.
#[derive(Debug)]
pub struct City {
    id: u32,
    point: CityPoint,
    incident: Vec<EdgeId>,
}

impl City {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn point(&self) -> CityPoint {
        self.point
    }

    /// Incident edge ids, shortest first.
    pub fn incident(&self) -> &[EdgeId] {
        &self.incident
    }
}

/// An undirected connection between two cities. The export string is the
/// CSV cell `x1,y1,x2,y2`, precomputed so recording a solution never
/// re-formats coordinates.
#[derive(Debug)]
pub struct Edge {
    a: usize,
    b: usize,
    length: f64,
    export: String,
}

impl Edge {
    pub fn endpoints(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    /// Given one endpoint, returns the other.
    pub fn other(&self, city: usize) -> usize {
        if city == self.a { self.b } else { self.a }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn export(&self) -> &str {
        &self.export
    }
}

/// Complete graph over the input cities. Immutable after `build`; all
/// search-time bookkeeping lives in the search context.
#[derive(Debug)]
pub struct Graph {
    cities: Vec<City>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Creates all C(N,2) edges with Euclidean lengths and sorts every
    /// city's incident list ascending by length. The first record is the
    /// anchor city used for closing-edge detection.
    pub fn build(records: &[CityRecord]) -> Result<Self> {
        if records.len() < MIN_CITIES {
            return Err(Error::invalid_input(format!(
                "need at least {MIN_CITIES} cities, got {}",
                records.len()
            )));
        }

        let n = records.len();
        let mut cities: Vec<City> = records
            .iter()
            .map(|record| City {
                id: record.id,
                point: record.point,
                incident: Vec::with_capacity(n - 1),
            })
            .collect();

        let mut edges: Vec<Edge> = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in 0..i {
                let length = cities[j].point.dist(&cities[i].point);
                let export = format!("{},{}", cities[j].point, cities[i].point);
                let edge_id = edges.len();
                edges.push(Edge {
                    a: j,
                    b: i,
                    length,
                    export,
                });
                cities[i].incident.push(edge_id);
                cities[j].incident.push(edge_id);
            }
        }

        // Shortest-first exploration order; edge id breaks length ties so
        // repeated runs are bit-for-bit reproducible.
        for city in &mut cities {
            city.incident.sort_by(|&e1, &e2| {
                edges[e1]
                    .length
                    .total_cmp(&edges[e2].length)
                    .then(e1.cmp(&e2))
            });
        }

        Ok(Self { cities, edges })
    }

    pub fn n(&self) -> usize {
        self.cities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The fixed starting city (first input record).
    pub fn anchor(&self) -> usize {
        0
    }

    pub fn city(&self, idx: usize) -> &City {
        &self.cities[idx]
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }
}
