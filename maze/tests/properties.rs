use maze::{
    derive_graph, persist, AStar, DepthFirst, Dijkstra, Generator, GeneratorKind, Grid,
    MazeConfig, MazeError, PathFinder, Point, Prim, SolverKind, StepKind,
};

const KINDS: [GeneratorKind; 2] = [GeneratorKind::Prim, GeneratorKind::Dfs];

fn generate(kind: GeneratorKind, rows: usize, columns: usize, seed: u64) -> Grid {
    let config = MazeConfig::new(rows, columns, seed);
    let mut grid = config.grid();
    kind.build(&mut grid, config.rng()).finish();
    grid
}

fn walls_agree(grid: &Grid) -> bool {
    grid.check_walls().is_ok()
}

#[test]
fn generated_mazes_are_spanning_trees() {
    for kind in KINDS {
        for (rows, columns) in [(1, 1), (1, 9), (9, 1), (2, 2), (8, 13), (20, 20)] {
            for seed in 0..5 {
                let grid = generate(kind, rows, columns, seed);
                let graph = derive_graph(&grid);

                assert!(grid.cells().iter().all(|cell| cell.in_maze), "{kind} {rows}x{columns}");
                assert_eq!(graph.edge_count(), rows * columns - 1);
                assert!(graph.is_connected());
            }
        }
    }
}

#[test]
fn walls_agree_after_every_step() {
    for kind in KINDS {
        let config = MazeConfig::new(7, 9, 17);
        let mut grid = config.grid();

        for snapshot in kind.build(&mut grid, config.rng()) {
            assert!(walls_agree(&snapshot.grid), "{kind} step {}", snapshot.step);
        }
    }
}

#[test]
fn same_seed_same_layout() {
    for kind in KINDS {
        for seed in [0, 1, 2021, u64::MAX] {
            let a = generate(kind, 15, 11, seed);
            let b = generate(kind, 15, 11, seed);

            assert!(a.same_walls(&b));
        }
    }
}

#[test]
fn different_seeds_usually_differ() {
    let reference = generate(GeneratorKind::Prim, 12, 12, 0);
    let distinct = (1..6)
        .filter(|seed| !reference.same_walls(&generate(GeneratorKind::Prim, 12, 12, *seed)))
        .count();

    assert!(distinct > 0);
}

#[test]
fn dfs_corridors_are_longer_than_prim() {
    // depth-first mazes have far fewer dead ends than Prim's on the same grid
    let dead_ends = |grid: &Grid| {
        grid.cells()
            .iter()
            .filter(|cell| cell.openings().count() == 1)
            .count()
    };

    let mut prim = 0;
    let mut dfs = 0;
    for seed in 0..5 {
        prim += dead_ends(&generate(GeneratorKind::Prim, 20, 20, seed));
        dfs += dead_ends(&generate(GeneratorKind::Dfs, 20, 20, seed));
    }

    assert!(dfs < prim, "dfs {dfs} prim {prim}");
}

#[test]
fn dijkstra_and_a_star_agree() {
    for kind in KINDS {
        for seed in 0..8 {
            let mut grid = generate(kind, 15, 15, seed);
            let graph = derive_graph(&grid);
            let goal = Point::new(14, 14);

            let dijkstra = Dijkstra::new(&graph, &mut grid, Point::ORIGIN, goal)
                .unwrap()
                .finish();
            let a_star = AStar::new(&graph, &mut grid, Point::ORIGIN, goal)
                .unwrap()
                .finish();

            assert!(dijkstra.reached && a_star.reached);
            assert_eq!(dijkstra.path.len(), a_star.path.len());
            assert_eq!(dijkstra.total_cost, a_star.total_cost);
            assert!(a_star.visit_order.len() <= dijkstra.visit_order.len());

            // a perfect maze has exactly one path
            assert_eq!(dijkstra.path, a_star.path);
            for pair in a_star.path.windows(2) {
                assert!(graph.has_edge(pair[0], pair[1]));
            }
        }
    }
}

#[test]
fn persisted_maze_solves_the_same() {
    let config = MazeConfig::new(10, 10, 5);
    let mut grid = config.grid();
    Prim::new(&mut grid, config.rng()).finish();
    let expected = {
        let graph = derive_graph(&grid);
        let result = Dijkstra::new(&graph, &mut grid, config.start(), config.goal())
            .unwrap()
            .finish();
        result
    };

    let mut loaded = persist::from_str(&persist::to_string(&grid).unwrap()).unwrap();
    assert!(loaded.same_walls(&grid));
    assert!(loaded
        .cells()
        .iter()
        .all(|c| !c.visited && !c.in_path && !c.highlighted));

    let graph = derive_graph(&loaded);
    let result = Dijkstra::new(&graph, &mut loaded, config.start(), config.goal())
        .unwrap()
        .finish();

    assert_eq!(result, expected);
}

#[test]
fn two_by_two_scenario() {
    for seed in 0..20 {
        let mut grid = Grid::new(2, 2);
        let carves = Prim::new(&mut grid, MazeConfig::new(2, 2, seed).rng())
            .filter(|snapshot| snapshot.kind == StepKind::Carve)
            .count();
        assert_eq!(carves, 3);
        assert_eq!(grid.passage_count(), 3);

        let graph = derive_graph(&grid);
        let result = AStar::new(&graph, &mut grid, Point::ORIGIN, Point::new(1, 1))
            .unwrap()
            .finish();

        // whichever of the four boundaries stays walled, one corner route survives
        assert_eq!(result.path.len(), 3);
        assert_eq!(result.total_cost, Some(2));
        assert!(result.visit_order.len() <= 4);
    }
}

#[test]
fn isolated_goal_is_unreachable() {
    for solver in [SolverKind::Dijkstra, SolverKind::AStar] {
        let mut grid = generate(GeneratorKind::Dfs, 6, 6, 3);
        let goal = Point::new(5, 5);
        grid.wall_off(goal).unwrap();
        let graph = derive_graph(&grid);

        let result = solver
            .build(&graph, &mut grid, Point::ORIGIN, goal)
            .unwrap()
            .finish();

        assert!(!result.reached);
        assert!(!result.visit_order.contains(&goal));
        assert!(matches!(
            result.into_path(Point::ORIGIN, goal),
            Err(MazeError::Unreachable { .. })
        ));
    }
}

#[test]
fn dfs_generator_reports_state() {
    let mut grid = Grid::new(3, 3);
    let mut dfs = DepthFirst::new(&mut grid, MazeConfig::new(3, 3, 0).rng());

    assert!(!dfs.is_done());
    let steps = dfs.finish();

    // one carve and one backtrack per admitted cell
    assert_eq!(steps, 2 * 8);
    assert!(dfs.is_done());
    assert!(walls_agree(dfs.grid()));
}
