//! Rasterizes grids into PNG frames.

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{Rgb, RgbImage};
use log::debug;
use maze::{Cell, Direction, Grid, Point, Snapshot};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const LIGHT_BLUE: Rgb<u8> = Rgb([173, 216, 230]);

/// Pixel geometry of a rendered grid.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FrameStyle {
    pub cell_width: u32,
    /// Wall thickness.
    pub outline: u32,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self::with_cell_width(5)
    }
}

impl FrameStyle {
    pub fn with_cell_width(cell_width: u32) -> Self {
        let cell_width = cell_width.max(2);
        Self {
            cell_width,
            outline: (cell_width / 5).max(1),
        }
    }

    /// Width and height of the image for `grid`.
    pub fn dimensions(&self, grid: &Grid) -> (u32, u32) {
        (
            grid.columns() as u32 * self.cell_width + self.outline,
            grid.rows() as u32 * self.cell_width + self.outline,
        )
    }
}

fn fill_color(cell: &Cell) -> Rgb<u8> {
    if cell.highlighted || cell.in_path {
        RED
    } else if cell.visited || cell.in_maze {
        LIGHT_BLUE
    } else {
        WHITE
    }
}

fn fill_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
    let x_end = (x + width).min(img.width());
    let y_end = (y + height).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, color);
        }
    }
}

/// Draws every cell of `grid`, then the standing walls on top.
pub fn rasterize(grid: &Grid, style: &FrameStyle) -> RgbImage {
    let (width, height) = style.dimensions(grid);
    let mut img = RgbImage::from_pixel(width, height, WHITE);
    let w = style.cell_width;
    let o = style.outline;

    for point in grid.points() {
        let Some(cell) = grid.cell_at(point) else {
            continue;
        };
        let x = point.col as u32 * w;
        let y = point.row as u32 * w;
        fill_rect(&mut img, x, y, w, w, fill_color(cell));
    }

    for point in grid.points() {
        let Some(cell) = grid.cell_at(point) else {
            continue;
        };
        let x = point.col as u32 * w;
        let y = point.row as u32 * w;

        for direction in Direction::ALL {
            if !cell.has_wall(direction) {
                continue;
            }
            match direction {
                Direction::Up => fill_rect(&mut img, x, y, w + o, o, BLACK),
                Direction::Right => fill_rect(&mut img, x + w, y, o, w + o, BLACK),
                Direction::Down => fill_rect(&mut img, x, y + w, w + o, o, BLACK),
                Direction::Left => fill_rect(&mut img, x, y, o, w + o, BLACK),
            }
        }
    }

    img
}

/// Draws a red line through the centers of consecutive `route` cells.
pub fn draw_route(img: &mut RgbImage, route: &[Point], style: &FrameStyle) {
    let thickness = (style.cell_width * 3 / 5).max(1);
    let center = |p: &Point| {
        let offset = (style.cell_width + style.outline) / 2 - thickness / 2;
        (
            p.col as u32 * style.cell_width + offset,
            p.row as u32 * style.cell_width + offset,
        )
    };

    if let [single] = route {
        let (x, y) = center(single);
        fill_rect(img, x, y, thickness, thickness, RED);
    }
    for pair in route.windows(2) {
        let (ax, ay) = center(&pair[0]);
        let (bx, by) = center(&pair[1]);
        let (x, y) = (ax.min(bx), ay.min(by));
        fill_rect(
            img,
            x,
            y,
            ax.abs_diff(bx) + thickness,
            ay.abs_diff(by) + thickness,
            RED,
        );
    }
}

fn save(img: &RgbImage, path: &Path) -> anyhow::Result<()> {
    img.save(path)
        .with_context(|| format!("failed to write image {}", path.display()))
}

pub fn save_image<P: AsRef<Path>>(grid: &Grid, style: &FrameStyle, path: P) -> anyhow::Result<()> {
    save(&rasterize(grid, style), path.as_ref())
}

/// Writes snapshots as numbered frames, `<prefix>_00000.png`, `<prefix>_00001.png`, ...
pub struct FrameWriter {
    dir: PathBuf,
    prefix: String,
    style: FrameStyle,
    count: usize,
}

impl FrameWriter {
    /// Creates `dir` if needed.
    pub fn create<P: Into<PathBuf>>(
        dir: P,
        prefix: &str,
        style: FrameStyle,
    ) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create frame directory {}", dir.display()))?;
        Ok(Self {
            dir,
            prefix: prefix.to_owned(),
            style,
            count: 0,
        })
    }

    pub fn write(&mut self, snapshot: &Snapshot) -> anyhow::Result<PathBuf> {
        let path = self.dir.join(format!("{}_{:05}.png", self.prefix, self.count));
        save_image(&snapshot.grid, &self.style, &path)?;
        self.count += 1;
        Ok(path)
    }

    pub fn frames_written(&self) -> usize {
        self.count
    }

    /// Writes the last image of a run next to the frames.
    pub fn write_final(&self, grid: &Grid, name: &str) -> anyhow::Result<PathBuf> {
        let path = self.dir.join(name);
        save_image(grid, &self.style, &path)?;
        debug!("wrote {} frames and {}", self.count, path.display());
        Ok(path)
    }

    /// Like [`FrameWriter::write_final`], with `route` drawn over the grid.
    pub fn write_solution(
        &self,
        grid: &Grid,
        route: &[Point],
        name: &str,
    ) -> anyhow::Result<PathBuf> {
        let path = self.dir.join(name);
        let mut img = rasterize(grid, &self.style);
        draw_route(&mut img, route, &self.style);
        save(&img, &path)?;
        debug!(
            "wrote {} frames and {} with a {} cell route",
            self.count,
            path.display(),
            route.len()
        );
        Ok(path)
    }
}
