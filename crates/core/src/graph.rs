//! Undirected concept graph and seeded force-directed layout.

use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// An undirected graph of string-identified nodes.
///
/// Nodes keep first-insertion order and repeated identifiers collapse to a
/// single node. Edges are undirected: `(a, b)` and `(b, a)` are the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    nodes: IndexSet<String>,
    edges: IndexSet<(usize, usize)>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from canonical nodes and edges.
    ///
    /// Edge endpoints that are not in `nodes` are added as nodes.
    pub fn from_parts(
        nodes: impl IntoIterator<Item = String>,
        edges: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    /// Add a node, returning its index.
    pub fn add_node(&mut self, id: impl Into<String>) -> usize {
        self.nodes.insert_full(id.into()).0
    }

    /// Add an undirected edge, adding missing endpoints.
    pub fn add_edge(&mut self, source: impl Into<String>, target: impl Into<String>) {
        let a = self.add_node(source);
        let b = self.add_node(target);
        if !self.edges.contains(&(b, a)) {
            self.edges.insert((a, b));
        }
    }

    /// Node identifiers in insertion order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.nodes.iter().map(String::as_str)
    }

    /// Node identifier at `index`.
    pub fn node(&self, index: usize) -> Option<&str> {
        self.nodes.get_index(index).map(String::as_str)
    }

    /// Edges as node index pairs.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn adjacency(&self) -> Vec<Vec<bool>> {
        let n = self.nodes.len();
        let mut adjacency = vec![vec![false; n]; n];
        for &(a, b) in &self.edges {
            adjacency[a][b] = true;
            adjacency[b][a] = true;
        }
        adjacency
    }
}

/// Errors from computing a layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The graph has more nodes than the layout is configured to place.
    #[error("graph has {nodes} nodes, layout limit is {limit}")]
    TooLarge { nodes: usize, limit: usize },

    /// The simulation diverged.
    #[error("layout produced non-finite coordinates")]
    NonFinite,
}

/// Node positions produced by a layout, indexed like the graph's nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    positions: Vec<(f64, f64)>,
}

impl Layout {
    /// Position of the node at `index`.
    pub fn position(&self, index: usize) -> Option<(f64, f64)> {
        self.positions.get(index).copied()
    }

    /// All positions in node order.
    pub fn positions(&self) -> &[(f64, f64)] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Fruchterman-Reingold spring layout with a fixed random seed.
///
/// Identical graphs always produce identical coordinates. Positions are
/// centered on the origin and scaled so the largest coordinate is 1.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    /// Optimal distance between nodes.
    k: f64,
    /// Seed for the initial positions.
    seed: u64,
    /// Maximum number of simulation steps.
    iterations: usize,
    /// Mean per-node movement below which the simulation stops early.
    threshold: f64,
    /// Largest graph the layout will place.
    max_nodes: usize,
}

impl Default for SpringLayout {
    fn default() -> Self {
        Self {
            k: 0.8,
            seed: 42,
            iterations: 50,
            threshold: 1e-4,
            max_nodes: 500,
        }
    }
}

impl SpringLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the optimal node distance.
    pub fn with_k(mut self, k: f64) -> Self {
        self.k = k;
        self
    }

    /// Set the seed for initial positions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the largest graph the layout will place.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// Compute node positions for `graph`.
    pub fn compute(&self, graph: &Graph) -> Result<Layout, LayoutError> {
        let n = graph.node_count();
        if n > self.max_nodes {
            return Err(LayoutError::TooLarge {
                nodes: n,
                limit: self.max_nodes,
            });
        }
        match n {
            0 => return Ok(Layout::default()),
            1 => {
                return Ok(Layout {
                    positions: vec![(0.0, 0.0)],
                })
            }
            _ => {}
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut pos: Vec<[f64; 2]> = (0..n)
            .map(|_| [rng.random::<f64>(), rng.random::<f64>()])
            .collect();
        let adjacency = graph.adjacency();

        let extent = |axis: usize, pos: &[[f64; 2]]| {
            let (lo, hi) = pos.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
                (lo.min(p[axis]), hi.max(p[axis]))
            });
            hi - lo
        };
        let mut temperature = extent(0, &pos[..]).max(extent(1, &pos[..])) * 0.1;
        let cooling = temperature / (self.iterations as f64 + 1.0);
        let k2 = self.k * self.k;

        for _ in 0..self.iterations {
            let mut moves = vec![[0.0f64; 2]; n];
            for i in 0..n {
                let mut displacement = [0.0f64; 2];
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dx = pos[i][0] - pos[j][0];
                    let dy = pos[i][1] - pos[j][1];
                    let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                    let attraction = if adjacency[i][j] { distance / self.k } else { 0.0 };
                    let force = k2 / (distance * distance) - attraction;
                    displacement[0] += dx * force;
                    displacement[1] += dy * force;
                }
                let mut length = displacement[0].hypot(displacement[1]);
                if length < 0.01 {
                    length = 0.1;
                }
                moves[i] = [
                    displacement[0] * temperature / length,
                    displacement[1] * temperature / length,
                ];
            }

            let mut total = 0.0;
            for (p, m) in pos.iter_mut().zip(&moves) {
                p[0] += m[0];
                p[1] += m[1];
                total += m[0] * m[0] + m[1] * m[1];
            }
            temperature -= cooling;
            if total.sqrt() / (n as f64) < self.threshold {
                break;
            }
        }

        let positions = rescale(pos);
        if positions.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(LayoutError::NonFinite);
        }
        Ok(Layout { positions })
    }
}

/// Center on the mean and scale so the largest absolute coordinate is 1.
fn rescale(pos: Vec<[f64; 2]>) -> Vec<(f64, f64)> {
    let n = pos.len() as f64;
    let mean_x = pos.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = pos.iter().map(|p| p[1]).sum::<f64>() / n;

    let centered: Vec<(f64, f64)> = pos.iter().map(|p| (p[0] - mean_x, p[1] - mean_y)).collect();
    let limit = centered
        .iter()
        .fold(0.0f64, |acc, (x, y)| acc.max(x.abs()).max(y.abs()));

    if limit > 0.0 {
        centered.into_iter().map(|(x, y)| (x / limit, y / limit)).collect()
    } else {
        centered
    }
}
