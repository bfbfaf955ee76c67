//! Random initial fill

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::tilemap::{Tile, TileGrid};

/// Seed a fresh grid with random walls.
///
/// The outermost ring is always wall; every interior cell becomes wall with
/// probability `density`. Cells are visited row by row so a given RNG state
/// always produces the same grid.
pub fn random_fill(length: usize, width: usize, density: f64, rng: &mut ChaCha8Rng) -> TileGrid {
    let mut grid = TileGrid::new_with(length, width, Tile::Floor);
    let density = density.clamp(0.0, 1.0);

    for y in 0..width {
        for x in 0..length {
            let tile = if grid.is_edge(x, y) || rng.gen_bool(density) {
                Tile::Wall
            } else {
                Tile::Floor
            };
            grid.set(x, y, tile);
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_zero_density_only_walls_the_ring() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let grid = random_fill(10, 10, 0.0, &mut rng);
        for (x, y, &tile) in grid.iter() {
            assert_eq!(tile.is_wall(), grid.is_edge(x, y), "tile ({}, {})", x, y);
        }
    }

    #[test]
    fn test_full_density_is_solid() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let grid = random_fill(12, 8, 1.0, &mut rng);
        assert_eq!(grid.count(Tile::Floor), 0);
    }

    #[test]
    fn test_density_roughly_respected() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = random_fill(200, 200, 0.45, &mut rng);
        let interior = 198 * 198;
        let interior_walls = grid.count(Tile::Wall) - (200 * 4 - 4);
        let ratio = interior_walls as f64 / interior as f64;
        assert!((ratio - 0.45).abs() < 0.02, "wall ratio {}", ratio);
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = random_fill(40, 30, 0.5, &mut ChaCha8Rng::seed_from_u64(99));
        let b = random_fill(40, 30, 0.5, &mut ChaCha8Rng::seed_from_u64(99));
        let c = random_fill(40, 30, 0.5, &mut ChaCha8Rng::seed_from_u64(100));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
