use log::debug;

use crate::grid::{Direction, Grid, Point};

/// Cost of moving between two connected cells.
pub const STEP_COST: usize = 1;

/// Read-only adjacency built from the walls of a [`Grid`].
///
/// One node per cell, one undirected unit-cost edge per carved boundary. It is a copy: carving
/// the grid afterwards does not change it, derive a new one instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphView {
    rows: usize,
    columns: usize,
    edges: Vec<Vec<Point>>,
}

/// Builds the [`GraphView`] of `grid`.
pub fn derive_graph(grid: &Grid) -> GraphView {
    GraphView::derive(grid)
}

impl GraphView {
    pub fn derive(grid: &Grid) -> Self {
        let mut edges = vec![Vec::with_capacity(4); grid.cell_count()];

        for point in grid.points() {
            // only look right and down, then add both directions
            for direction in [Direction::Right, Direction::Down] {
                if !grid.is_open(point, direction) {
                    continue;
                }
                if let Some(neighbor) = grid.neighbor(point, direction) {
                    edges[point.row * grid.columns() + point.col].push(neighbor);
                    edges[neighbor.row * grid.columns() + neighbor.col].push(point);
                }
            }
        }

        // keep neighbors in wall order so searches expand deterministically
        for (index, list) in edges.iter_mut().enumerate() {
            let point = grid.point_of(index);
            list.sort_by_key(|neighbor| {
                grid.direction_between(point, *neighbor)
                    .map(Direction::index)
                    .unwrap_or(usize::MAX)
            });
        }

        let graph = Self {
            rows: grid.rows(),
            columns: grid.columns(),
            edges,
        };
        debug!(
            "derived graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum::<usize>() / 2
    }

    pub fn contains(&self, node: Point) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    pub fn nodes(&self) -> impl Iterator<Item = Point> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| Point { row, col }))
    }

    /// Return an iterator over the neighbors of the provided node and the cost required to go there
    pub fn neighbors_of(&self, node: Point) -> impl Iterator<Item = (Point, usize)> + '_ {
        let list: &[Point] = if self.contains(node) {
            &self.edges[node.row * self.columns + node.col]
        } else {
            &[]
        };
        list.iter().map(|neighbor| (*neighbor, STEP_COST))
    }

    pub fn has_edge(&self, a: Point, b: Point) -> bool {
        self.neighbors_of(a).any(|(neighbor, _)| neighbor == b)
    }

    /// True when every node can reach every other node.
    pub fn is_connected(&self) -> bool {
        if self.node_count() == 0 {
            return true;
        }

        let mut seen = vec![false; self.node_count()];
        let mut stack = vec![Point::ORIGIN];
        seen[0] = true;
        let mut reached = 1;

        while let Some(node) = stack.pop() {
            for (neighbor, _) in self.neighbors_of(node) {
                let index = neighbor.row * self.columns + neighbor.col;
                if !seen[index] {
                    seen[index] = true;
                    reached += 1;
                    stack.push(neighbor);
                }
            }
        }

        reached == self.node_count()
    }

    /// A connected graph with exactly `nodes - 1` edges has no cycles.
    pub fn is_spanning_tree(&self) -> bool {
        self.node_count() > 0 && self.edge_count() == self.node_count() - 1 && self.is_connected()
    }
}
