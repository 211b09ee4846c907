//! A pool of N workers doing M lock-guarded advances must land on the same
//! grid as M sequential steps.

use life_core::{step, Coord, Generation, GridBounds, InitialConditions, SparseGrid};
use life_sim::run_bounded;
use proptest::prelude::*;

fn sequential(initial: &Generation, bounds: &GridBounds, advances: u64) -> SparseGrid {
    let mut grid = initial.grid.clone();
    for _ in 0..advances {
        grid = step(&grid, bounds);
    }
    grid
}

fn seeded(bounds: GridBounds, density: f64, seed: u64) -> Generation {
    let seeder = InitialConditions::new(bounds, density).unwrap();
    Generation::initial(seeder.generate(seed))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_sixteen_workers_match_sequential_steps() {
    let bounds = GridBounds::new(40).unwrap();
    let initial = seeded(bounds, 0.3, 2024);
    let expected = sequential(&initial, &bounds, 60);

    let report = run_bounded(initial, bounds, 16, 60).await.unwrap();

    assert_eq!(report.last.index, 60);
    assert_eq!(report.last.grid, expected);
    assert_eq!(report.total_advances(), 60);
    assert_eq!(report.workers.len(), 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_glider_travels_through_pool() {
    let bounds = GridBounds::new(20).unwrap();
    let glider = Generation::initial(SparseGrid::from_cells([
        (1, 0),
        (2, 1),
        (0, 2),
        (1, 2),
        (2, 2),
    ]));

    let report = run_bounded(glider.clone(), bounds, 8, 8).await.unwrap();

    // Two full periods: same shape, shifted by (2, 2)
    let shifted: SparseGrid = glider
        .grid
        .iter()
        .map(|c| Coord::new(c.x + 2, c.y + 2))
        .collect();
    assert_eq!(report.last.grid, shifted);
}

#[tokio::test]
async fn test_zero_advances_returns_initial() {
    let bounds = GridBounds::new(16).unwrap();
    let initial = seeded(bounds, 0.5, 9);

    let report = run_bounded(initial.clone(), bounds, 4, 0).await.unwrap();

    assert_eq!(*report.last, initial);
    assert_eq!(report.total_advances(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_pool_matches_sequential(
        seed in 1u64..10_000,
        workers in 1usize..9,
        advances in 0u64..25,
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(3)
            .enable_all()
            .build()
            .unwrap();

        let bounds = GridBounds::new(24).unwrap();
        let initial = seeded(bounds, 0.35, seed);
        let expected = sequential(&initial, &bounds, advances);

        let report = runtime
            .block_on(run_bounded(initial, bounds, workers, advances))
            .unwrap();

        prop_assert_eq!(report.last.index, advances);
        prop_assert_eq!(report.total_advances(), advances);
        prop_assert_eq!(&report.last.grid, &expected);
    }
}
