//! Cellular-automaton smoothing
//!
//! Each pass reads a frozen copy of the grid and writes into a second buffer;
//! the buffers are swapped between passes so no cell ever sees a neighbour
//! value written earlier in the same sweep.

use crate::tilemap::{Tile, TileGrid};

/// Default wall count (of 8 neighbours) at which a cell keeps its state.
pub const DEFAULT_WALL_THRESHOLD: u8 = 4;

/// Default number of smoothing passes.
pub const DEFAULT_ITERATIONS: usize = 5;

/// Next state of one interior cell: more walls than the threshold makes a wall,
/// fewer makes floor, a tie keeps the current tile. Off-grid neighbours count
/// as wall.
fn next_tile(grid: &TileGrid, x: usize, y: usize, threshold: u8) -> Tile {
    let walls = grid.wall_neighbor_count(x, y);
    if walls > threshold {
        Tile::Wall
    } else if walls < threshold {
        Tile::Floor
    } else {
        *grid.get(x, y)
    }
}

/// Run one pass from `src` into `dst`. Returns the number of changed cells.
///
/// The outer ring is copied unchanged; only interior cells are smoothed.
fn smooth_pass(src: &TileGrid, dst: &mut TileGrid, threshold: u8) -> usize {
    let mut changed = 0;
    for y in 0..src.width {
        for x in 0..src.length {
            let tile = if src.is_edge(x, y) {
                *src.get(x, y)
            } else {
                next_tile(src, x, y, threshold)
            };
            if tile != *src.get(x, y) {
                changed += 1;
            }
            dst.set(x, y, tile);
        }
    }
    changed
}

/// Smooth the grid for up to `iterations` passes, stopping early once a pass
/// changes nothing.
pub fn smooth(grid: TileGrid, iterations: usize, threshold: u8) -> TileGrid {
    let mut current = grid;
    let mut next = current.clone();

    for pass in 0..iterations {
        let changed = smooth_pass(&current, &mut next, threshold);
        std::mem::swap(&mut current, &mut next);
        log::debug!("smoothing pass {}: {} cells changed", pass + 1, changed);
        if changed == 0 {
            break;
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caves::noise::random_fill;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_isolated_wall_is_removed() {
        let grid = TileGrid::from_rows(&[
            "#######",
            "#.....#",
            "#.....#",
            "#..#..#",
            "#.....#",
            "#.....#",
            "#######",
        ]);
        let smoothed = smooth(grid, 1, DEFAULT_WALL_THRESHOLD);
        assert!(!smoothed.is_wall(3, 3));
    }

    #[test]
    fn test_isolated_floor_is_filled() {
        let grid = TileGrid::from_rows(&[
            "#####",
            "#####",
            "##.##",
            "#####",
            "#####",
        ]);
        let smoothed = smooth(grid, 1, DEFAULT_WALL_THRESHOLD);
        assert_eq!(smoothed.count(Tile::Floor), 0);
    }

    #[test]
    fn test_tie_keeps_current_tile() {
        // Centre cell sees exactly 4 walls (the left column plus bottom middle).
        let grid = TileGrid::from_rows(&[
            "#...",
            "#...",
            "##..",
        ]);
        assert_eq!(grid.wall_neighbor_count(1, 1), 4);
        let smoothed = smooth(grid, 1, DEFAULT_WALL_THRESHOLD);
        assert!(!smoothed.is_wall(1, 1));
    }

    #[test]
    fn test_pass_reads_frozen_grid() {
        // A diagonal staircase: an in-place sweep would cascade the first
        // update along the row, a double-buffered pass must not.
        let grid = TileGrid::from_rows(&[
            "#########",
            "#.#.#.#.#",
            "#########",
            "#.#.#.#.#",
            "#########",
        ]);
        let mut dst = grid.clone();
        smooth_pass(&grid, &mut dst, DEFAULT_WALL_THRESHOLD);
        let expected: Vec<Tile> = grid
            .iter()
            .map(|(x, y, &t)| {
                if grid.is_edge(x, y) {
                    t
                } else {
                    next_tile(&grid, x, y, DEFAULT_WALL_THRESHOLD)
                }
            })
            .collect();
        assert_eq!(dst.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_ring_stays_wall() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let grid = random_fill(30, 20, 0.3, &mut rng);
        let smoothed = smooth(grid, DEFAULT_ITERATIONS, DEFAULT_WALL_THRESHOLD);
        for (x, y) in smoothed.edge_positions() {
            assert!(smoothed.is_wall(x, y));
        }
    }

    #[test]
    fn test_ring_survives_high_threshold() {
        // A ring cell sees at most five walls, so thresholds above that would
        // open it if the ring were smoothed.
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = random_fill(30, 20, 0.45, &mut rng);
        for threshold in 5..=8 {
            let smoothed = smooth(grid.clone(), DEFAULT_ITERATIONS, threshold);
            for (x, y) in smoothed.edge_positions() {
                assert!(smoothed.is_wall(x, y), "threshold {} opened ({}, {})", threshold, x, y);
            }
        }
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let grid = random_fill(20, 20, 0.5, &mut rng);
        assert_eq!(smooth(grid.clone(), 0, DEFAULT_WALL_THRESHOLD), grid);
    }
}
