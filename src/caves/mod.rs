//! Cave map generation
//!
//! Pipeline: random fill -> smoothing -> region pruning (walls, then floors)
//! -> room connection search -> minimum spanning tree -> tunnel carving ->
//! border. Every stage takes and returns owned grids; nothing is shared
//! between concurrent generation runs.

pub mod border;
pub mod connections;
pub mod mst;
pub mod noise;
pub mod regions;
pub mod rooms;
pub mod smoothing;
pub mod tunnels;

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::MapConfig;
use crate::error::Result;
use crate::tilemap::{CaveMap, Tile, TileGrid};

/// Summary of one generation run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapStats {
    /// Floor regions that survived pruning, before any tunnel was carved
    pub rooms_before_connect: usize,
    /// Accepted spanning-tree edges, one tunnel each
    pub tunnels: usize,
    pub pruned_wall_regions: usize,
    pub pruned_floor_regions: usize,
    /// Floor tiles in the finished map
    pub floor_tiles: usize,
}

/// A map generation strategy.
pub trait MapGenerator {
    fn generate(&self, config: &MapConfig, seed: u64) -> Result<CaveMap>;

    fn name(&self) -> &str;
}

/// Random fill followed by cellular-automaton smoothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellularAutomaton;

impl MapGenerator for CellularAutomaton {
    fn generate(&self, config: &MapConfig, seed: u64) -> Result<CaveMap> {
        generate(config, seed)
    }

    fn name(&self) -> &str {
        "cellular_automaton"
    }
}

/// Generate a connected cave map.
pub fn generate(config: &MapConfig, seed: u64) -> Result<CaveMap> {
    generate_with_stats(config, seed).map(|(map, _)| map)
}

/// Generate a connected cave map and report what each stage did.
pub fn generate_with_stats(config: &MapConfig, seed: u64) -> Result<(CaveMap, MapStats)> {
    config.validate()?;
    let start = Instant::now();

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let grid = noise::random_fill(config.length, config.width, config.initial_density, &mut rng);
    let grid = smoothing::smooth(grid, config.smoothing_iterations, config.wall_threshold);
    log::debug!(
        "filled and smoothed {}x{} grid in {:.1}ms",
        config.length,
        config.width,
        start.elapsed().as_secs_f64() * 1000.0
    );

    let (map, stats) = finalize_grid(grid, config, seed);

    log::info!(
        "Generated {}x{} cave (seed {}): {} rooms, {} tunnels, {} floor tiles in {:.1}ms",
        map.length(),
        map.width(),
        seed,
        stats.rooms_before_connect,
        stats.tunnels,
        stats.floor_tiles,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok((map, stats))
}

/// Prune, connect and border an already-shaped grid.
///
/// Custom generators can produce their own raw grid and hand it here to get
/// the same connectivity guarantees as the built-in pipeline.
pub fn finalize_grid(grid: TileGrid, config: &MapConfig, seed: u64) -> (CaveMap, MapStats) {
    let mut grid = grid;
    let mut stats = MapStats::default();

    let walls = regions::prune_small_regions(&mut grid, Tile::Wall, config.min_wall_region);
    stats.pruned_wall_regions = walls.removed;
    let floors = regions::prune_small_regions(&mut grid, Tile::Floor, config.min_floor_region);
    stats.pruned_floor_regions = floors.removed;
    log::debug!(
        "pruned {} wall and {} floor regions",
        walls.removed,
        floors.removed
    );

    let rooms = rooms::build_rooms(floors.kept, &grid);
    stats.rooms_before_connect = rooms.len();

    if rooms.len() > 1 {
        let search = Instant::now();
        let candidates = connections::compute_connections(&rooms);
        let tree = mst::minimum_spanning_tree(rooms.len(), &candidates);
        let carved = tunnels::carve_connections(&mut grid, &tree, config.tunnel_radius);
        stats.tunnels = tree.len();
        log::debug!(
            "connected {} rooms with {} tunnels ({} tiles carved) in {:.1}ms",
            rooms.len(),
            tree.len(),
            carved,
            search.elapsed().as_secs_f64() * 1000.0
        );
    }

    let grid = border::apply_border(&grid, config.border_size);
    stats.floor_tiles = grid.count(Tile::Floor);

    (CaveMap::new(grid, seed, config.border_size), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::{floor_is_connected, ring_is_sealed};

    fn two_rooms_grid() -> TileGrid {
        let mut grid = TileGrid::new_with(40, 40, Tile::Wall);
        for (ox, oy) in [(4, 5), (30, 31)] {
            for y in oy..oy + 3 {
                for x in ox..ox + 3 {
                    grid.set(x, y, Tile::Floor);
                }
            }
        }
        grid
    }

    #[test]
    fn test_zero_density_keeps_ring_and_open_interior() {
        let config = MapConfig {
            length: 10,
            width: 10,
            initial_density: 0.0,
            border_size: 0,
            ..Default::default()
        };
        let (map, stats) = generate_with_stats(&config, 7).unwrap();
        assert_eq!((map.length(), map.width()), (10, 10));
        assert!(ring_is_sealed(&map));
        // Smoothing closes the four inner corners, which touch five ring walls.
        assert_eq!(map.floor_count(), 60);
        assert_eq!(stats.rooms_before_connect, 1);
        assert_eq!(stats.tunnels, 0);
    }

    #[test]
    fn test_two_far_rooms_get_one_tunnel() {
        let config = MapConfig {
            length: 40,
            width: 40,
            border_size: 0,
            min_floor_region: 5,
            min_wall_region: 5,
            ..Default::default()
        };
        let (map, stats) = finalize_grid(two_rooms_grid(), &config, 0);
        assert_eq!(stats.rooms_before_connect, 2);
        assert_eq!(stats.tunnels, 1);
        assert!(map.floor_count() > 18);
        assert!(floor_is_connected(&map));
        assert!(ring_is_sealed(&map));
    }

    #[test]
    fn test_single_tile_room_is_pruned() {
        let mut grid = TileGrid::new_with(12, 12, Tile::Wall);
        grid.set(6, 6, Tile::Floor);
        let config = MapConfig {
            length: 12,
            width: 12,
            min_floor_region: 2,
            ..Default::default()
        };
        let (map, stats) = finalize_grid(grid, &config, 0);
        assert_eq!(stats.pruned_floor_regions, 1);
        assert_eq!(stats.rooms_before_connect, 0);
        assert_eq!(map.floor_count(), 0);
    }

    #[test]
    fn test_same_seed_same_map() {
        let config = MapConfig::small();
        let a = generate(&config, 42).unwrap();
        let b = generate(&config, 42).unwrap();
        assert_eq!(a.grid().to_bytes(), b.grid().to_bytes());
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn test_generated_maps_are_connected() {
        for seed in 0..8 {
            let map = generate(&MapConfig::small(), seed).unwrap();
            assert!(floor_is_connected(&map), "seed {} left disconnected floor", seed);
        }
    }

    #[test]
    fn test_ring_is_wall_for_every_border_size() {
        for border_size in 0..4 {
            let config = MapConfig { border_size, ..MapConfig::small() };
            let map = generate(&config, 3).unwrap();
            assert_eq!((map.length(), map.width()), config.bordered_size());
            assert!(ring_is_sealed(&map), "border {}", border_size);
            for y in 0..border_size {
                for x in 0..map.length() {
                    assert!(map.is_wall(x, y));
                }
            }
        }
    }

    #[test]
    fn test_ring_is_wall_for_every_threshold() {
        for wall_threshold in 0..=8 {
            let config = MapConfig {
                length: 30,
                width: 20,
                border_size: 0,
                initial_density: 0.45,
                wall_threshold,
                ..MapConfig::small()
            };
            let map = generate(&config, 3).unwrap();
            assert!(ring_is_sealed(&map), "threshold {}", wall_threshold);
        }
    }

    #[test]
    fn test_invalid_config_rejected_before_work() {
        let config = MapConfig { initial_density: 1.5, ..Default::default() };
        assert!(generate(&config, 1).is_err());

        let config = MapConfig { tunnel_radius: 100_000, ..MapConfig::small() };
        assert!(generate(&config, 1).is_err());
    }

    struct Stripes;

    impl MapGenerator for Stripes {
        fn generate(&self, config: &MapConfig, seed: u64) -> Result<CaveMap> {
            config.validate()?;
            let mut grid = TileGrid::new_with(config.length, config.width, Tile::Wall);
            for y in (2..config.width - 2).step_by(4) {
                for x in 1..config.length - 1 {
                    grid.set(x, y, Tile::Floor);
                }
            }
            Ok(finalize_grid(grid, config, seed).0)
        }

        fn name(&self) -> &str {
            "stripes"
        }
    }

    #[test]
    fn test_custom_generator_is_connected() {
        let config = MapConfig {
            length: 30,
            width: 20,
            min_floor_region: 3,
            min_wall_region: 0,
            ..Default::default()
        };
        let generators: Vec<Box<dyn MapGenerator>> = vec![Box::new(CellularAutomaton), Box::new(Stripes)];
        for generator in &generators {
            let map = generator.generate(&config, 5).unwrap();
            assert!(floor_is_connected(&map), "{} produced disconnected floor", generator.name());
        }
    }
}
