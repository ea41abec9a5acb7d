//! JSON persistence of a carved grid.
//!
//! Only the dimensions, the walls and `in_maze` are written. Loading validates the wall layout
//! and fails with [`MazeError::MalformedGrid`] instead of repairing it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::cell::Cell;
use crate::error::{MazeError, MazeResult};
use crate::grid::Grid;

/// The unchecked on-disk form of a [`Grid`].
#[derive(Debug, Deserialize)]
pub(crate) struct GridRecord {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridRecord> for Grid {
    type Error = MazeError;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        let grid = Grid::from_parts(record.rows, record.columns, record.cells);
        grid.check_walls()?;
        Ok(grid)
    }
}

pub fn to_writer<W: Write>(grid: &Grid, writer: W) -> MazeResult<()> {
    serde_json::to_writer(writer, grid)?;
    Ok(())
}

pub fn from_reader<R: Read>(reader: R) -> MazeResult<Grid> {
    let record: GridRecord = serde_json::from_reader(reader)?;
    Grid::try_from(record)
}

pub fn to_string(grid: &Grid) -> MazeResult<String> {
    Ok(serde_json::to_string(grid)?)
}

pub fn from_str(s: &str) -> MazeResult<Grid> {
    let record: GridRecord = serde_json::from_str(s)?;
    Grid::try_from(record)
}

pub fn save<P: AsRef<Path>>(grid: &Grid, path: P) -> MazeResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    to_writer(grid, &mut writer)?;
    writer.flush()?;
    debug!(
        "saved {}x{} grid to {}",
        grid.rows(),
        grid.columns(),
        path.display()
    );
    Ok(())
}

pub fn load<P: AsRef<Path>>(path: P) -> MazeResult<Grid> {
    let path = path.as_ref();
    let grid = from_reader(BufReader::new(File::open(path)?))?;
    debug!(
        "loaded {}x{} grid from {}",
        grid.rows(),
        grid.columns(),
        path.display()
    );
    Ok(grid)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::Point;

    fn sample() -> Grid {
        let mut grid = Grid::new(2, 3);
        grid.carve(Point::new(0, 0), Point::new(0, 1)).unwrap();
        grid.carve(Point::new(0, 1), Point::new(1, 1)).unwrap();
        grid.carve(Point::new(1, 1), Point::new(1, 2)).unwrap();
        grid
    }

    #[test]
    fn test_round_trip_keeps_walls() {
        let grid = sample();

        let loaded = from_str(&to_string(&grid).unwrap()).unwrap();

        assert!(loaded.same_walls(&grid));
        assert_eq!(loaded.rows(), 2);
        assert_eq!(loaded.columns(), 3);
    }

    #[test]
    fn test_transient_flags_come_back_cleared() {
        let mut grid = sample();
        grid.move_highlight(None, Some(Point::new(1, 1)));
        for point in grid.points().collect::<Vec<_>>() {
            let cell = grid.cell_at_mut(point).unwrap();
            cell.visited = true;
            cell.in_path = true;
            cell.in_maze = true;
        }

        let loaded = from_str(&to_string(&grid).unwrap()).unwrap();

        assert!(loaded
            .cells()
            .iter()
            .all(|c| c.in_maze && !c.visited && !c.in_path && !c.highlighted));
    }

    #[test]
    fn test_format() {
        let json = to_string(&Grid::new(1, 1)).unwrap();

        assert_eq!(
            json,
            r#"{"rows":1,"columns":1,"cells":[{"walls":[true,true,true,true],"in_maze":false}]}"#
        );
    }

    #[test]
    fn test_wrong_cell_count() {
        let json = r#"{"rows":2,"columns":2,"cells":[{"walls":[true,true,true,true],"in_maze":false}]}"#;

        assert!(matches!(from_str(json), Err(MazeError::MalformedGrid(_))));
    }

    #[test]
    fn test_overflowing_dimensions() {
        let json = r#"{"rows":9223372036854775808,"columns":2,"cells":[]}"#;

        assert!(matches!(from_str(json), Err(MazeError::MalformedGrid(_))));
    }

    #[test]
    fn test_zero_columns() {
        for json in [
            r#"{"rows":3,"columns":0,"cells":[]}"#,
            r#"{"rows":18446744073709551615,"columns":0,"cells":[]}"#,
            r#"{"rows":0,"columns":4,"cells":[]}"#,
        ] {
            assert!(matches!(from_str(json), Err(MazeError::MalformedGrid(_))));
        }
    }

    #[test]
    fn test_empty_grid_round_trip() {
        let loaded = from_str(&to_string(&Grid::new(0, 0)).unwrap()).unwrap();

        assert_eq!(loaded.cell_count(), 0);
    }

    #[test]
    fn test_one_sided_wall() {
        let json = r#"{"rows":1,"columns":2,"cells":[
            {"walls":[true,false,true,true],"in_maze":true},
            {"walls":[true,true,true,true],"in_maze":true}
        ]}"#;

        assert!(matches!(from_str(json), Err(MazeError::MalformedGrid(_))));
    }

    #[test]
    fn test_open_edge() {
        let json = r#"{"rows":1,"columns":1,"cells":[{"walls":[false,true,true,true],"in_maze":true}]}"#;

        assert!(matches!(from_str(json), Err(MazeError::MalformedGrid(_))));
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(from_str("maze"), Err(MazeError::Json(_))));
    }

    #[test]
    fn test_serde_deserialize_validates() {
        let json = r#"{"rows":1,"columns":1,"cells":[{"walls":[false,true,true,true],"in_maze":true}]}"#;

        assert!(serde_json::from_str::<Grid>(json).is_err());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.json");
        let grid = sample();

        save(&grid, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert!(loaded.same_walls(&grid));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            load(dir.path().join("missing.json")),
            Err(MazeError::Io(_))
        ));
    }
}
