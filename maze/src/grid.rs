use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{MazeError, MazeResult};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const ORIGIN: Point = Point { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(&self, other: Point) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four cardinal directions, in wall order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Index into [`Cell::walls`].
    pub fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Right => "right",
                Direction::Down => "down",
                Direction::Left => "left",
            }
        )
    }
}

impl FromStr for Direction {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "right" => Ok(Direction::Right),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            _ => Err(MazeError::Parse(format!("direction {:?}", s))),
        }
    }
}

/// A rectangular grid of cells stored row-major in a single vec.
///
/// Walls are only ever changed through [`Grid::carve`] and [`Grid::wall_off`], which update both
/// sides of a shared boundary at once, so the two cells facing each other always agree.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "crate::persist::GridRecord")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid with every wall standing and every flag cleared.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::default(); rows * columns],
        }
    }

    /// Assembles a grid from raw parts without any validation.
    pub(crate) fn from_parts(rows: usize, columns: usize, cells: Vec<Cell>) -> Self {
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    pub(crate) fn index_of(&self, point: Point) -> Option<usize> {
        self.contains(point).then(|| point.row * self.columns + point.col)
    }

    pub(crate) fn point_of(&self, index: usize) -> Point {
        Point {
            row: index / self.columns,
            col: index % self.columns,
        }
    }

    /// Returns the cell at `point`, or `None` outside the grid.
    pub fn cell_at(&self, point: Point) -> Option<&Cell> {
        self.index_of(point).map(|index| &self.cells[index])
    }

    pub(crate) fn cell_at_mut(&mut self, point: Point) -> Option<&mut Cell> {
        self.index_of(point).map(|index| &mut self.cells[index])
    }

    /// All coordinates in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |col| Point { row, col }))
    }

    /// The coordinate across the `direction` boundary of `point`, `None` at the grid edge.
    pub fn neighbor(&self, point: Point, direction: Direction) -> Option<Point> {
        if !self.contains(point) {
            return None;
        }

        let next = match direction {
            Direction::Up => Point {
                row: point.row.checked_sub(1)?,
                col: point.col,
            },
            Direction::Right => Point {
                row: point.row,
                col: point.col + 1,
            },
            Direction::Down => Point {
                row: point.row + 1,
                col: point.col,
            },
            Direction::Left => Point {
                row: point.row,
                col: point.col.checked_sub(1)?,
            },
        };

        self.contains(next).then_some(next)
    }

    /// In-bounds neighbors of `point` together with the direction leading to them.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = (Direction, Point)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| Some((direction, self.neighbor(point, direction)?)))
    }

    /// The direction to go from `from` to reach `to`, if the two cells are adjacent.
    pub fn direction_between(&self, from: Point, to: Point) -> Option<Direction> {
        self.neighbors(from)
            .find(|(_, point)| *point == to)
            .map(|(direction, _)| direction)
    }

    /// True when the boundary of `point` in `direction` is open. Grid edges are never open.
    pub fn is_open(&self, point: Point, direction: Direction) -> bool {
        self.neighbor(point, direction).is_some()
            && self
                .cell_at(point)
                .is_some_and(|cell| !cell.has_wall(direction))
    }

    /// Removes the wall pair shared by `a` and `b`.
    pub fn carve(&mut self, a: Point, b: Point) -> MazeResult<()> {
        let direction = self
            .direction_between(a, b)
            .ok_or(MazeError::NotAdjacent { a, b })?;

        // both lookups succeed, adjacency implies both are in bounds
        if let Some(cell) = self.cell_at_mut(a) {
            cell.remove_wall(direction);
        }
        if let Some(cell) = self.cell_at_mut(b) {
            cell.remove_wall(direction.opposite());
        }

        Ok(())
    }

    /// Puts back every wall around `point`, on both sides of each boundary.
    pub fn wall_off(&mut self, point: Point) -> MazeResult<()> {
        let index = self
            .index_of(point)
            .ok_or(MazeError::OutOfBounds { point })?;
        self.cells[index].walls = [true; 4];

        let neighbors: Vec<_> = self.neighbors(point).collect();
        for (direction, neighbor) in neighbors {
            if let Some(cell) = self.cell_at_mut(neighbor) {
                cell.walls[direction.opposite().index()] = true;
            }
        }

        Ok(())
    }

    /// Clears `visited`, `in_path`, `highlighted` and `in_maze` on every cell.
    pub fn reset_search_state(&mut self) {
        for cell in &mut self.cells {
            cell.clear_search_flags();
            cell.in_maze = false;
        }
    }

    /// Clears only the per-search flags, leaving maze membership alone.
    pub fn clear_search_flags(&mut self) {
        for cell in &mut self.cells {
            cell.clear_search_flags();
        }
    }

    /// Moves the single highlight marker from `from` to `to`.
    pub(crate) fn move_highlight(&mut self, from: Option<Point>, to: Option<Point>) {
        if let Some(cell) = from.and_then(|point| self.cell_at_mut(point)) {
            cell.highlighted = false;
        }
        if let Some(cell) = to.and_then(|point| self.cell_at_mut(point)) {
            cell.highlighted = true;
        }
    }

    /// Number of open boundaries between cells (each counted once).
    pub fn passage_count(&self) -> usize {
        self.points()
            .map(|point| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|direction| self.is_open(point, *direction))
                    .count()
            })
            .sum()
    }

    /// True when both grids have the same dimensions and the same standing walls.
    pub fn same_walls(&self, other: &Grid) -> bool {
        self.rows == other.rows
            && self.columns == other.columns
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(a, b)| a.walls == b.walls)
    }

    /// Checks the stored walls against the pairing and boundary rules.
    pub fn check_walls(&self) -> MazeResult<()> {
        // an empty grid has both dimensions zero, never just one
        if (self.rows == 0) != (self.columns == 0) {
            return Err(MazeError::MalformedGrid(format!(
                "a {}x{} grid has no cells",
                self.rows, self.columns
            )));
        }

        let expected = self.rows.checked_mul(self.columns).ok_or_else(|| {
            MazeError::MalformedGrid(format!("{}x{} grid is too large", self.rows, self.columns))
        })?;
        if self.cells.len() != expected {
            return Err(MazeError::MalformedGrid(format!(
                "expected {} cells for a {}x{} grid, found {}",
                expected,
                self.rows,
                self.columns,
                self.cells.len()
            )));
        }

        for point in self.points() {
            let cell = &self.cells[point.row * self.columns + point.col];
            for direction in Direction::ALL {
                match self.neighbor(point, direction) {
                    None if !cell.has_wall(direction) => {
                        return Err(MazeError::MalformedGrid(format!(
                            "cell {} has no {} wall on the grid edge",
                            point, direction
                        )));
                    }
                    Some(neighbor) => {
                        let other = &self.cells[neighbor.row * self.columns + neighbor.col];
                        if cell.has_wall(direction) != other.has_wall(direction.opposite()) {
                            return Err(MazeError::MalformedGrid(format!(
                                "walls between {} and {} disagree",
                                point, neighbor
                            )));
                        }
                    }
                    None => {}
                }
            }
        }

        Ok(())
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.columns {
                let up = self.cells[row * self.columns + col].has_wall(Direction::Up);
                write!(f, "+{}", if up { "---" } else { "   " })?;
            }
            writeln!(f, "+")?;

            for col in 0..self.columns {
                let cell = &self.cells[row * self.columns + col];
                if col == 0 {
                    write!(f, "{}", if cell.has_wall(Direction::Left) { "|" } else { " " })?;
                }
                write!(f, " {} ", cell)?;
                write!(f, "{}", if cell.has_wall(Direction::Right) { "|" } else { " " })?;
            }
            writeln!(f)?;
        }

        if self.rows > 0 {
            for col in 0..self.columns {
                let down =
                    self.cells[(self.rows - 1) * self.columns + col].has_wall(Direction::Down);
                write!(f, "+{}", if down { "---" } else { "   " })?;
            }
            writeln!(f, "+")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_grid_is_walled() {
        let grid = Grid::new(3, 4);

        assert_eq!(grid.cell_count(), 12);
        assert!(grid.cells().iter().all(|cell| cell.walls == [true; 4]));
        assert_eq!(grid.passage_count(), 0);
        assert!(grid.check_walls().is_ok());
    }

    #[test]
    fn lookup_outside_is_absent() {
        let grid = Grid::new(2, 3);

        assert!(grid.cell_at(Point::new(1, 2)).is_some());
        assert!(grid.cell_at(Point::new(2, 0)).is_none());
        assert!(grid.cell_at(Point::new(0, 3)).is_none());
    }

    #[test]
    fn neighbors_stop_at_edges() {
        let grid = Grid::new(3, 3);

        assert_eq!(grid.neighbor(Point::ORIGIN, Direction::Up), None);
        assert_eq!(grid.neighbor(Point::ORIGIN, Direction::Left), None);
        assert_eq!(
            grid.neighbor(Point::ORIGIN, Direction::Down),
            Some(Point::new(1, 0))
        );
        assert_eq!(grid.neighbor(Point::new(2, 2), Direction::Right), None);
        assert_eq!(grid.neighbors(Point::new(1, 1)).count(), 4);
        assert_eq!(grid.neighbors(Point::new(0, 1)).count(), 3);
    }

    #[test]
    fn carve_removes_both_sides() {
        let mut grid = Grid::new(2, 2);

        grid.carve(Point::new(0, 0), Point::new(0, 1)).unwrap();
        grid.carve(Point::new(1, 1), Point::new(0, 1)).unwrap();

        assert!(!grid.cell_at(Point::new(0, 0)).unwrap().has_wall(Direction::Right));
        assert!(!grid.cell_at(Point::new(0, 1)).unwrap().has_wall(Direction::Left));
        assert!(!grid.cell_at(Point::new(0, 1)).unwrap().has_wall(Direction::Down));
        assert!(!grid.cell_at(Point::new(1, 1)).unwrap().has_wall(Direction::Up));
        assert_eq!(grid.passage_count(), 2);
        assert!(grid.check_walls().is_ok());
    }

    #[test]
    fn carve_rejects_non_adjacent() {
        let mut grid = Grid::new(3, 3);

        assert!(matches!(
            grid.carve(Point::new(0, 0), Point::new(1, 1)),
            Err(MazeError::NotAdjacent { .. })
        ));
        assert!(matches!(
            grid.carve(Point::new(0, 0), Point::new(0, 0)),
            Err(MazeError::NotAdjacent { .. })
        ));
        assert!(matches!(
            grid.carve(Point::new(2, 2), Point::new(2, 3)),
            Err(MazeError::NotAdjacent { .. })
        ));
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn wall_off_restores_neighbors() {
        let mut grid = Grid::new(3, 3);
        let center = Point::new(1, 1);
        for (_, neighbor) in grid.neighbors(center).collect::<Vec<_>>() {
            grid.carve(center, neighbor).unwrap();
        }
        assert_eq!(grid.passage_count(), 4);

        grid.wall_off(center).unwrap();

        assert_eq!(grid.passage_count(), 0);
        assert!(grid.check_walls().is_ok());
    }

    #[test]
    fn reset_clears_all_flags() {
        let mut grid = Grid::new(2, 2);
        for point in grid.points().collect::<Vec<_>>() {
            let cell = grid.cell_at_mut(point).unwrap();
            cell.in_maze = true;
            cell.visited = true;
            cell.in_path = true;
            cell.highlighted = true;
        }
        grid.carve(Point::ORIGIN, Point::new(1, 0)).unwrap();

        grid.reset_search_state();

        assert!(grid
            .cells()
            .iter()
            .all(|c| !c.in_maze && !c.visited && !c.in_path && !c.highlighted));
        assert_eq!(grid.passage_count(), 1);
    }

    #[test]
    fn check_walls_catches_one_sided_wall() {
        let mut grid = Grid::new(1, 2);
        grid.cell_at_mut(Point::ORIGIN)
            .unwrap()
            .remove_wall(Direction::Right);

        assert!(matches!(grid.check_walls(), Err(MazeError::MalformedGrid(_))));
    }

    #[test]
    fn display_draws_walls() {
        let mut grid = Grid::new(1, 2);
        grid.carve(Point::new(0, 0), Point::new(0, 1)).unwrap();

        assert_eq!(grid.to_string(), "+---+---+\n|       |\n+---+---+\n");
    }

    #[test]
    fn direction_round_trips_through_strings() {
        for direction in Direction::ALL {
            assert_eq!(direction.to_string().parse::<Direction>().unwrap(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
        assert!("north".parse::<Direction>().is_err());
    }
}
