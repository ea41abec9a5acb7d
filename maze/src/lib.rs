//! Grid mazes: randomized generation and shortest-path search, observable one step at a time.
//!
//! A run builds a [`Grid`], carves it with a [`Generator`], derives a [`GraphView`] and solves it
//! with a [`PathFinder`]. Generators and pathfinders are iterators of [`Snapshot`]s, so a caller
//! can replay every step or just drain them with `finish`.

pub mod cell;
pub mod config;
pub mod error;
pub mod find;
pub mod generators;
pub mod graph;
pub mod grid;
pub mod persist;
pub mod snapshot;

pub use cell::Cell;
pub use config::MazeConfig;
pub use error::{MazeError, MazeResult};
pub use find::{
    AStar, Dijkstra, Heuristic, Manhattan, PathFinder, Search, SearchResult, SearchState,
    SolverKind, Uniform,
};
pub use generators::{DepthFirst, Generator, GeneratorKind, GeneratorState, Prim, WallCandidate};
pub use graph::{derive_graph, GraphView};
pub use grid::{Direction, Grid, Point};
pub use snapshot::{Snapshot, StepKind};
