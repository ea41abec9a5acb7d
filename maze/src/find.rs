use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::Display,
    str::FromStr,
};

use log::{debug, info, trace};

use crate::error::{MazeError, MazeResult};
use crate::graph::GraphView;
use crate::grid::{Grid, Point};
use crate::snapshot::{Snapshot, StepKind};

/// Estimated remaining cost from a node to the goal. Must never overestimate.
pub trait Heuristic {
    fn estimate(&self, node: Point, goal: Point) -> usize;
}

/// No estimate at all, which turns the search into Dijkstra's algorithm.
#[derive(Copy, Clone, Debug, Default)]
pub struct Uniform;

impl Heuristic for Uniform {
    fn estimate(&self, _node: Point, _goal: Point) -> usize {
        0
    }
}

/// Manhattan distance, exact lower bound on a grid without diagonal moves.
#[derive(Copy, Clone, Debug, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, node: Point, goal: Point) -> usize {
        node.manhattan(goal)
    }
}

/// The objects that we store in the priority queue
#[derive(Debug, Eq, PartialEq)]
struct ToVisit {
    priority: usize,
    cost: usize,
    // insertion counter, equal priorities pop first-in first-out
    order: u64,
    point: Point,
}

impl Ord for ToVisit {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap
        self.priority
            .cmp(&other.priority)
            .then(self.order.cmp(&other.order))
            .reverse()
    }
}

impl PartialOrd for ToVisit {
    fn partial_cmp(&self, other: &ToVisit) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Computing,
    NoPathFound,
    PathFound,
}

/// Outcome of a search, complete or partial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub reached: bool,
    /// Start to goal inclusive, empty unless `reached`.
    pub path: Vec<Point>,
    /// Every expanded cell in expansion order, for replay.
    pub visit_order: Vec<Point>,
    pub total_cost: Option<usize>,
}

impl SearchResult {
    /// The path, or [`MazeError::Unreachable`] when the goal was not reached.
    pub fn into_path(self, start: Point, goal: Point) -> MazeResult<Vec<Point>> {
        if self.reached {
            Ok(self.path)
        } else {
            Err(MazeError::Unreachable { start, goal })
        }
    }
}

/// A pathfinder over a [`GraphView`] that records its progress on a borrowed [`Grid`].
///
/// Each step expands one cell: marks it visited, moves the highlight onto it and yields a
/// [`Snapshot`]. Reaching the goal marks the path cells with `in_path`.
pub trait PathFinder: Iterator<Item = Snapshot> {
    /// Expands one cell without taking a snapshot. Returns `None` once the search has ended.
    fn advance(&mut self) -> Option<StepKind>;

    fn state(&self) -> SearchState;

    fn result(&self) -> SearchResult;

    fn grid(&self) -> &Grid;

    /// Runs the search to the end.
    fn finish(&mut self) -> SearchResult {
        while self.advance().is_some() {}
        self.result()
    }
}

/// Best-first search, generic over its [`Heuristic`].
pub struct Search<'a, H: Heuristic> {
    graph: &'a GraphView,
    grid: &'a mut Grid,
    heuristic: H,
    start: Point,
    goal: Point,
    cost: Vec<Option<usize>>,
    previous: Vec<Option<Point>>,
    closed: Vec<bool>,
    visit_list: BinaryHeap<ToVisit>,
    pushed: u64,
    visit_order: Vec<Point>,
    path: Vec<Point>,
    state: SearchState,
    highlighted: Option<Point>,
}

pub type Dijkstra<'a> = Search<'a, Uniform>;
pub type AStar<'a> = Search<'a, Manhattan>;

impl<'a> Search<'a, Uniform> {
    pub fn new(
        graph: &'a GraphView,
        grid: &'a mut Grid,
        start: Point,
        goal: Point,
    ) -> MazeResult<Self> {
        Self::with_heuristic(graph, grid, start, goal, Uniform)
    }
}

impl<'a> Search<'a, Manhattan> {
    pub fn new(
        graph: &'a GraphView,
        grid: &'a mut Grid,
        start: Point,
        goal: Point,
    ) -> MazeResult<Self> {
        Self::with_heuristic(graph, grid, start, goal, Manhattan)
    }
}

impl<'a, H: Heuristic> Search<'a, H> {
    /// Prepares a search from `start` to `goal`. The grid's search flags and maze membership
    /// are cleared first.
    pub fn with_heuristic(
        graph: &'a GraphView,
        grid: &'a mut Grid,
        start: Point,
        goal: Point,
        heuristic: H,
    ) -> MazeResult<Self> {
        if graph.rows() != grid.rows() || graph.columns() != grid.columns() {
            return Err(MazeError::DimensionMismatch {
                graph_rows: graph.rows(),
                graph_columns: graph.columns(),
                grid_rows: grid.rows(),
                grid_columns: grid.columns(),
            });
        }
        for point in [start, goal] {
            if !grid.contains(point) {
                return Err(MazeError::OutOfBounds { point });
            }
        }

        grid.reset_search_state();

        let nodes = graph.node_count();
        let mut cost = vec![None; nodes];
        cost[start.row * graph.columns() + start.col] = Some(0);

        let first = ToVisit {
            priority: heuristic.estimate(start, goal),
            cost: 0,
            order: 0,
            point: start,
        };

        Ok(Self {
            graph,
            grid,
            heuristic,
            start,
            goal,
            cost,
            previous: vec![None; nodes],
            closed: vec![false; nodes],
            visit_list: BinaryHeap::from([first]),
            pushed: 1,
            visit_order: Vec::new(),
            path: Vec::new(),
            state: SearchState::Computing,
            highlighted: None,
        })
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    /// Number of cells expanded so far.
    pub fn visited_count(&self) -> usize {
        self.visit_order.len()
    }

    fn index_of(&self, point: Point) -> usize {
        point.row * self.graph.columns() + point.col
    }

    fn backtrack(&self) -> Vec<Point> {
        let mut path = vec![self.goal];
        let mut current = self.goal;

        while let Some(from) = self.previous[self.index_of(current)] {
            path.push(from);
            current = from;
        }

        if current != self.start {
            panic!(
                "Backtracking from {} ended at {} instead of the start",
                self.goal, current
            );
        }

        path.reverse();
        path
    }

    fn relax(&mut self, point: Point, cost: usize) {
        let graph = self.graph;
        for (neighbor, move_cost) in graph.neighbors_of(point) {
            let index = self.index_of(neighbor);
            if self.closed[index] {
                continue;
            }

            let tentative = cost + move_cost;
            if self.cost[index].map_or(true, |known| tentative < known) {
                self.cost[index] = Some(tentative);
                self.previous[index] = Some(point);
                self.visit_list.push(ToVisit {
                    priority: tentative + self.heuristic.estimate(neighbor, self.goal),
                    cost: tentative,
                    order: self.pushed,
                    point: neighbor,
                });
                self.pushed += 1;
            }
        }
    }
}

impl<'a, H: Heuristic> PathFinder for Search<'a, H> {
    fn advance(&mut self) -> Option<StepKind> {
        if self.state != SearchState::Computing {
            return None;
        }

        loop {
            let Some(visit) = self.visit_list.pop() else {
                self.grid.move_highlight(self.highlighted.take(), None);
                self.state = SearchState::NoPathFound;
                info!(
                    "no path from {} to {} after {} visits",
                    self.start,
                    self.goal,
                    self.visit_order.len()
                );
                return None;
            };

            let index = self.index_of(visit.point);
            // entries superseded by a cheaper one are skipped
            if self.closed[index] || self.cost[index] != Some(visit.cost) {
                continue;
            }

            self.closed[index] = true;
            self.visit_order.push(visit.point);
            if let Some(cell) = self.grid.cell_at_mut(visit.point) {
                cell.visited = true;
            }
            self.grid.move_highlight(self.highlighted, Some(visit.point));
            self.highlighted = Some(visit.point);
            trace!(
                "visit {} at cost {} (priority {})",
                visit.point,
                visit.cost,
                visit.priority
            );

            if visit.point == self.goal {
                self.path = self.backtrack();
                for point in &self.path {
                    if let Some(cell) = self.grid.cell_at_mut(*point) {
                        cell.in_path = true;
                    }
                }
                self.state = SearchState::PathFound;
                info!(
                    "found path from {} to {}: cost={} visits={}",
                    self.start,
                    self.goal,
                    visit.cost,
                    self.visit_order.len()
                );
                return Some(StepKind::Solved);
            }

            self.relax(visit.point, visit.cost);
            return Some(StepKind::Visit);
        }
    }

    fn state(&self) -> SearchState {
        self.state
    }

    fn result(&self) -> SearchResult {
        let reached = self.state == SearchState::PathFound;
        SearchResult {
            reached,
            path: self.path.clone(),
            visit_order: self.visit_order.clone(),
            total_cost: if reached {
                self.cost[self.index_of(self.goal)]
            } else {
                None
            },
        }
    }

    fn grid(&self) -> &Grid {
        self.grid
    }
}

impl<'a, H: Heuristic> Iterator for Search<'a, H> {
    type Item = Snapshot;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.advance()?;
        Some(Snapshot::capture(
            self.visit_order.len() - 1,
            kind,
            self.highlighted,
            self.grid,
        ))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SolverKind {
    Dijkstra,
    AStar,
}

impl SolverKind {
    pub fn build<'a>(
        self,
        graph: &'a GraphView,
        grid: &'a mut Grid,
        start: Point,
        goal: Point,
    ) -> MazeResult<Box<dyn PathFinder + 'a>> {
        debug!("starting {} from {} to {}", self, start, goal);
        Ok(match self {
            SolverKind::Dijkstra => Box::new(Dijkstra::new(graph, grid, start, goal)?),
            SolverKind::AStar => Box::new(AStar::new(graph, grid, start, goal)?),
        })
    }
}

impl Display for SolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SolverKind::Dijkstra => "dijkstra",
                SolverKind::AStar => "astar",
            }
        )
    }
}

impl FromStr for SolverKind {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dijkstra" => Ok(SolverKind::Dijkstra),
            "astar" | "a-star" | "a*" => Ok(SolverKind::AStar),
            _ => Err(MazeError::Parse(format!("solver name {:?}", s))),
        }
    }
}
