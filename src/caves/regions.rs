//! Connected region detection and small-region pruning
//!
//! Regions are maximal 4-connected groups of one tile type. Wall mass that is
//! connected to the outer ring is marked visited before the scan starts, so it
//! is never reported as a region and never pruned.

use std::collections::VecDeque;

use crate::tilemap::{Coord, Tile, TileGrid, Tilemap};

/// One maximal 4-connected component of a single tile type.
///
/// Tiles are stored in flood-fill discovery order and cannot be modified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRegion {
    tile: Tile,
    tiles: Vec<Coord>,
}

impl TileRegion {
    pub fn tile_type(&self) -> Tile {
        self.tile
    }

    pub fn tiles(&self) -> &[Coord] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Flood-fill from all wall tiles on the outer ring and mark them visited.
fn mark_edge_connected_walls(grid: &TileGrid, visited: &mut Tilemap<bool>) {
    let mut queue = VecDeque::new();

    for (x, y) in grid.edge_positions() {
        if grid.is_wall(x, y) && !*visited.get(x, y) {
            visited.set(x, y, true);
            queue.push_back((x, y));
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for (nx, ny) in grid.neighbors(x, y) {
            if !*visited.get(nx, ny) && grid.is_wall(nx, ny) {
                visited.set(nx, ny, true);
                queue.push_back((nx, ny));
            }
        }
    }
}

/// BFS over same-type tiles starting at (x, y).
fn flood_region(
    grid: &TileGrid,
    x: usize,
    y: usize,
    visited: &mut Tilemap<bool>,
) -> TileRegion {
    let tile = *grid.get(x, y);
    let mut tiles = Vec::new();
    let mut queue = VecDeque::new();

    visited.set(x, y, true);
    queue.push_back((x, y));

    while let Some((cx, cy)) = queue.pop_front() {
        tiles.push(Coord::new(cx, cy));
        for (nx, ny) in grid.neighbors(cx, cy) {
            if !*visited.get(nx, ny) && *grid.get(nx, ny) == tile {
                visited.set(nx, ny, true);
                queue.push_back((nx, ny));
            }
        }
    }

    TileRegion { tile, tiles }
}

/// Partition all tiles of type `tile` into disjoint regions.
///
/// For walls, the mass connected to the outer ring is excluded.
pub fn scan_regions(grid: &TileGrid, tile: Tile) -> Vec<TileRegion> {
    let mut visited = Tilemap::new_with(grid.length, grid.width, false);
    if tile == Tile::Wall {
        mark_edge_connected_walls(grid, &mut visited);
    }

    let mut regions = Vec::new();
    for y in 0..grid.width {
        for x in 0..grid.length {
            if !*visited.get(x, y) && *grid.get(x, y) == tile {
                regions.push(flood_region(grid, x, y, &mut visited));
            }
        }
    }

    regions
}

/// Regions that survived pruning, plus how many were removed.
#[derive(Clone, Debug, Default)]
pub struct Pruned {
    pub kept: Vec<TileRegion>,
    pub removed: usize,
}

/// Fill every region smaller than `min_size` with the opposite tile type.
///
/// The decision is by size only; regions at or above the threshold are
/// returned untouched.
pub fn prune_regions(grid: &mut TileGrid, regions: Vec<TileRegion>, min_size: usize) -> Pruned {
    let mut pruned = Pruned::default();

    for region in regions {
        if region.len() < min_size {
            let fill = region.tile.opposite();
            for coord in &region.tiles {
                grid.set(coord.ux(), coord.uy(), fill);
            }
            pruned.removed += 1;
        } else {
            pruned.kept.push(region);
        }
    }

    pruned
}

/// Scan for regions of `tile` and prune those below `min_size`.
pub fn prune_small_regions(grid: &mut TileGrid, tile: Tile, min_size: usize) -> Pruned {
    let regions = scan_regions(grid, tile);
    prune_regions(grid, regions, min_size)
}
