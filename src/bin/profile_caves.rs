//! Profiling tool to identify performance bottlenecks

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cave_generator::caves::{border, connections, mst, noise, regions, rooms, smoothing, tunnels};
use cave_generator::config::{MapConfig, MeshConfig};
use cave_generator::{logging, mesh};
use cave_generator::tilemap::{CaveMap, Tile};

fn percent(part: Duration, total: Duration) -> f64 {
    100.0 * part.as_secs_f64() / total.as_secs_f64().max(f64::EPSILON)
}

fn profile(config: &MapConfig, seed: u64) {
    println!("=== {}x{} ({} cells) ===", config.length, config.width, config.length * config.width);

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let start = Instant::now();
    let grid = noise::random_fill(config.length, config.width, config.initial_density, &mut rng);
    let grid = smoothing::smooth(grid, config.smoothing_iterations, config.wall_threshold);
    let smooth_time = start.elapsed();
    println!("Fill + smoothing:     {:?}", smooth_time);

    let start = Instant::now();
    let mut grid = grid;
    let walls = regions::prune_small_regions(&mut grid, Tile::Wall, config.min_wall_region);
    let floors = regions::prune_small_regions(&mut grid, Tile::Floor, config.min_floor_region);
    let room_list = rooms::build_rooms(floors.kept, &grid);
    let region_time = start.elapsed();
    println!(
        "Regions + rooms:      {:?} ({} walls and {} floors pruned, {} rooms)",
        region_time,
        walls.removed,
        floors.removed,
        room_list.len()
    );

    let start = Instant::now();
    let candidates = connections::compute_connections(&room_list);
    let search_time = start.elapsed();
    println!("Connection search:    {:?} ({} pairs)", search_time, candidates.len());

    let start = Instant::now();
    let tree = mst::minimum_spanning_tree(room_list.len(), &candidates);
    tunnels::carve_connections(&mut grid, &tree, config.tunnel_radius);
    let grid = border::apply_border(&grid, config.border_size);
    let carve_time = start.elapsed();
    println!("MST + carve + border: {:?} ({} tunnels)", carve_time, tree.len());

    let map = CaveMap::new(grid, seed, config.border_size);
    let start = Instant::now();
    let mesh_time = match mesh::triangulate(&map, &MeshConfig::default()) {
        Ok(cave_mesh) => {
            let elapsed = start.elapsed();
            println!(
                "Triangulation:        {:?} ({} chunks, {} triangles)",
                elapsed,
                cave_mesh.chunks.len(),
                cave_mesh.triangle_count()
            );
            elapsed
        }
        Err(e) => {
            println!("Triangulation failed: {}", e);
            start.elapsed()
        }
    };

    let total = smooth_time + region_time + search_time + carve_time + mesh_time;
    println!("--- Summary ---");
    println!("Smoothing:     {:>8.2}%", percent(smooth_time, total));
    println!("Regions:       {:>8.2}%", percent(region_time, total));
    println!("Connections:   {:>8.2}%", percent(search_time, total));
    println!("MST + carving: {:>8.2}%", percent(carve_time, total));
    println!("Triangulation: {:>8.2}%", percent(mesh_time, total));
    println!("Total:         {:?}", total);
    println!();
}

fn main() {
    logging::init();
    let seed = 1337u64;
    println!("=== Cave Generation Profiling (seed {}) ===", seed);
    println!();

    for config in [MapConfig::small(), MapConfig::default(), MapConfig::large()] {
        profile(&config, seed);
    }
}
