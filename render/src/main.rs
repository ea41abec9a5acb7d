//! Command line driver: carves mazes, solves them and dumps every step as a PNG frame.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use maze::{
    derive_graph, persist, Generator, GeneratorKind, MazeConfig, MazeError, PathFinder, SolverKind,
};

use crate::frame::{FrameStyle, FrameWriter};

mod frame;

/// Grid maze generator and solver
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with rows, columns, start, goal and seed
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Width of one cell in the rendered frames, in pixels
    #[arg(long, global = true, default_value_t = 5)]
    cell_width: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Carve a new maze and save it as JSON
    Generate {
        /// Number of rows, overrides the config file
        #[arg(long)]
        rows: Option<usize>,

        /// Number of columns, overrides the config file
        #[arg(long)]
        columns: Option<usize>,

        /// Random seed, overrides the config file
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = GeneratorKind::Prim)]
        algorithm: GeneratorKind,

        /// Where to write the maze
        #[arg(long, default_value = "maze.json")]
        out: PathBuf,

        /// Directory for one PNG per step
        #[arg(long)]
        frames: Option<PathBuf>,
    },
    /// Find the shortest path through a saved maze
    Solve {
        /// Maze written by `generate`
        #[arg(long, default_value = "maze.json")]
        maze: PathBuf,

        #[arg(long, default_value_t = SolverKind::AStar)]
        algorithm: SolverKind,

        /// Directory for one PNG per step
        #[arg(long)]
        frames: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MazeConfig> {
    match path {
        Some(path) => MazeConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display())),
        None => Ok(MazeConfig::default()),
    }
}

fn generate(
    config: MazeConfig,
    algorithm: GeneratorKind,
    out: &Path,
    frames: Option<&Path>,
    style: FrameStyle,
) -> anyhow::Result<()> {
    config.validate()?;

    let started = Instant::now();
    let mut grid = config.grid();
    let mut writer = match frames {
        Some(dir) => Some(FrameWriter::create(dir, "frame", style)?),
        None => None,
    };

    let steps = {
        let mut generator = algorithm.build(&mut grid, config.rng());
        match writer.as_mut() {
            Some(writer) => {
                for snapshot in &mut generator {
                    writer.write(&snapshot)?;
                }
                writer.frames_written()
            }
            None => generator.finish(),
        }
    };

    if let Some(writer) = &writer {
        writer.write_final(&grid, &format!("maze_{}.png", algorithm))?;
    }
    persist::save(&grid, out).with_context(|| format!("failed to save maze to {}", out.display()))?;
    info!(
        "{} carved a {}x{} maze in {} steps, took {:?}",
        algorithm,
        config.rows,
        config.columns,
        steps,
        started.elapsed()
    );

    println!("{}", grid);
    Ok(())
}

fn solve(
    config: MazeConfig,
    maze: &Path,
    algorithm: SolverKind,
    frames: Option<&Path>,
    style: FrameStyle,
) -> anyhow::Result<()> {
    let mut grid = persist::load(maze)
        .with_context(|| format!("failed to load maze from {}", maze.display()))?;

    // the loaded maze decides the size, the config only contributes start, goal and seed
    let config = MazeConfig {
        rows: grid.rows(),
        columns: grid.columns(),
        ..config
    };
    config.validate()?;
    let (start, goal) = (config.start(), config.goal());

    let started = Instant::now();
    let graph = derive_graph(&grid);
    let mut writer = match frames {
        Some(dir) => Some(FrameWriter::create(dir, &format!("path_{}", algorithm), style)?),
        None => None,
    };

    let result = {
        let mut finder = algorithm.build(&graph, &mut grid, start, goal)?;
        match writer.as_mut() {
            Some(writer) => {
                for snapshot in &mut finder {
                    writer.write(&snapshot)?;
                }
                finder.result()
            }
            None => finder.finish(),
        }
    };

    if let Some(writer) = &writer {
        writer.write_solution(&grid, &result.path, &format!("{}_solution.png", algorithm))?;
    }
    info!(
        "{} visited {} cells, took {:?}",
        algorithm,
        result.visit_order.len(),
        started.elapsed()
    );

    println!("{}", grid);
    match result.into_path(start, goal) {
        Ok(path) => println!("path from {} to {}: {} cells", start, goal, path.len()),
        Err(MazeError::Unreachable { .. }) => println!("no path from {} to {}", start, goal),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let style = FrameStyle::with_cell_width(args.cell_width);

    match args.command {
        Command::Generate {
            rows,
            columns,
            seed,
            algorithm,
            out,
            frames,
        } => {
            let config = MazeConfig {
                rows: rows.unwrap_or(config.rows),
                columns: columns.unwrap_or(config.columns),
                seed: seed.unwrap_or(config.seed),
                ..config
            };
            generate(config, algorithm, &out, frames.as_deref(), style)
        }
        Command::Solve {
            maze,
            algorithm,
            frames,
        } => solve(config, &maze, algorithm, frames.as_deref(), style),
    }
}
