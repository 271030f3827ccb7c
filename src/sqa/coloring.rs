//! Graph coloring for concurrent spin updates.
//!
//! Spins that share a color have no coupling between them, so their flip
//! decisions do not read each other and can be evaluated concurrently.
//! The partition depends only on the coupling graph and is computed once
//! per problem.
//!
//! The greedy heuristic is Welsh–Powell: visit spins in descending degree
//! (ties by ascending index) and give each the smallest color not used by
//! an already colored neighbor. It needs at most `max_degree + 1` colors.

use super::config::Algorithm;
use crate::graph::IsingGraph;
use crate::real::Real;
use tracing::debug;

/// Partition of spin indices into independent sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coloring {
    classes: Vec<Vec<usize>>,
    color_of: Vec<usize>,
}

impl Coloring {
    /// Greedy Welsh–Powell coloring of the coupling graph.
    pub fn greedy<T: Real, G: IsingGraph<T> + ?Sized>(graph: &G) -> Self {
        let n = graph.n_spins();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(graph.neighbors(i).len()));

        const UNCOLORED: usize = usize::MAX;
        let mut color_of = vec![UNCOLORED; n];
        // stamp[c] == v + 1 marks color c as taken by a neighbor of v
        let mut stamp: Vec<usize> = Vec::new();
        let mut n_colors = 0;

        for &v in &order {
            for &u in graph.neighbors(v) {
                let c = color_of[u];
                if c != UNCOLORED {
                    stamp[c] = v + 1;
                }
            }
            let color = (0..n_colors).find(|&c| stamp[c] != v + 1).unwrap_or_else(|| {
                stamp.push(0);
                n_colors += 1;
                n_colors - 1
            });
            color_of[v] = color;
        }

        let mut classes = vec![Vec::new(); n_colors];
        for (i, &c) in color_of.iter().enumerate() {
            classes[c].push(i);
        }
        Self { classes, color_of }
    }

    /// Uses the graph's structural partition when it has one, otherwise
    /// colors greedily.
    pub fn for_graph<T: Real, G: IsingGraph<T> + ?Sized>(graph: &G) -> Self {
        let coloring = match graph.natural_coloring() {
            Some(classes) => Self::from_classes(classes, graph.n_spins()),
            None => Self::greedy(graph),
        };
        debug!(
            n_spins = graph.n_spins(),
            n_colors = coloring.n_colors(),
            largest_class = coloring.largest_class(),
            "coloring computed"
        );
        coloring
    }

    fn from_classes(classes: Vec<Vec<usize>>, n: usize) -> Self {
        let mut color_of = vec![0; n];
        for (c, class) in classes.iter().enumerate() {
            for &i in class {
                color_of[i] = c;
            }
        }
        Self { classes, color_of }
    }

    /// Color classes, each sorted by spin index.
    pub fn classes(&self) -> &[Vec<usize>] {
        &self.classes
    }

    pub fn n_colors(&self) -> usize {
        self.classes.len()
    }

    /// Color assigned to spin `i`.
    pub fn color_of(&self, i: usize) -> usize {
        self.color_of[i]
    }

    /// Size of the biggest class (0 for an empty graph).
    pub fn largest_class(&self) -> usize {
        self.classes.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether every class holds at most one spin, i.e. coloring buys no
    /// concurrency.
    pub fn is_degenerate(&self) -> bool {
        self.largest_class() <= 1
    }

    /// Whether no two spins of one color are coupled.
    pub fn is_proper<T: Real, G: IsingGraph<T> + ?Sized>(&self, graph: &G) -> bool {
        (0..graph.n_spins()).all(|i| {
            graph
                .neighbors(i)
                .iter()
                .all(|&k| self.color_of[k] != self.color_of[i])
        })
    }
}

/// Resolves [`Algorithm::Default`] against a coloring.
///
/// Explicit requests are returned unchanged.
pub fn resolve_algorithm(requested: Algorithm, coloring: &Coloring) -> Algorithm {
    match requested {
        Algorithm::Default if coloring.is_degenerate() => Algorithm::Naive,
        Algorithm::Default => Algorithm::Coloring,
        explicit => explicit,
    }
}
