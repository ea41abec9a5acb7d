use thiserror::Error;

use crate::grid::Point;

#[derive(Error, Debug)]
pub enum MazeError {
    #[error("point {point} lies outside the grid")]
    OutOfBounds { point: Point },

    /// Carving between two cells that do not share a wall.
    #[error("cannot carve between {a} and {b}: cells are not adjacent")]
    NotAdjacent { a: Point, b: Point },

    #[error("no path from {start} to {goal}")]
    Unreachable { start: Point, goal: Point },

    #[error("cannot parse {0}")]
    Parse(String),

    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error("graph is {graph_rows}x{graph_columns} but grid is {grid_rows}x{grid_columns}")]
    DimensionMismatch {
        graph_rows: usize,
        graph_columns: usize,
        grid_rows: usize,
        grid_columns: usize,
    },

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MazeResult<T> = Result<T, MazeError>;
