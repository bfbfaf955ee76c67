//! Rooms: floor regions with an ordered perimeter
//!
//! The edge tiles of a room are the floor tiles touching at least one wall.
//! They are ordered by walking from tile to touching tile, which approximates
//! a continuous trip around the perimeter. The walk jumps to the nearest
//! remaining tile whenever it runs out of touching neighbours (inner holes,
//! one-tile spurs), so the order is an approximation, not a simple polygon.

use std::collections::HashSet;

use crate::caves::regions::TileRegion;
use crate::tilemap::{Coord, Tile, TileGrid};

/// Neighbour offsets in clockwise order, starting east.
const WALK_ORDER: [(i32, i32); 8] = [
    (1, 0), (1, 1), (0, 1), (-1, 1),
    (-1, 0), (-1, -1), (0, -1), (1, -1),
];

/// A floor region together with its ordered edge tiles.
#[derive(Clone, Debug)]
pub struct Room {
    region: TileRegion,
    edge_tiles: Vec<Coord>,
}

impl Room {
    pub fn new(region: TileRegion, grid: &TileGrid) -> Self {
        debug_assert_eq!(region.tile_type(), Tile::Floor);
        let edges: Vec<Coord> = region
            .tiles()
            .iter()
            .copied()
            .filter(|&c| touches_wall(grid, c))
            .collect();
        Self {
            region,
            edge_tiles: order_perimeter(edges),
        }
    }

    pub fn tiles(&self) -> &[Coord] {
        self.region.tiles()
    }

    pub fn size(&self) -> usize {
        self.region.len()
    }

    /// Perimeter tiles in walk order.
    pub fn edge_tiles(&self) -> &[Coord] {
        &self.edge_tiles
    }
}

/// Build rooms from surviving floor regions, keeping their order.
pub fn build_rooms(regions: Vec<TileRegion>, grid: &TileGrid) -> Vec<Room> {
    regions.into_iter().map(|region| Room::new(region, grid)).collect()
}

fn touches_wall(grid: &TileGrid, c: Coord) -> bool {
    let (x, y) = (c.x as i32, c.y as i32);
    [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .into_iter()
        .any(|(dx, dy)| grid.try_get(x + dx, y + dy).map_or(true, |t| t.is_wall()))
}

/// Order tiles into an approximate perimeter walk.
fn order_perimeter(tiles: Vec<Coord>) -> Vec<Coord> {
    let Some(&start) = tiles.iter().min_by_key(|c| (c.y, c.x)) else {
        return tiles;
    };

    let mut remaining: HashSet<Coord> = tiles.iter().copied().collect();
    let mut ordered = Vec::with_capacity(tiles.len());
    let mut current = start;
    remaining.remove(&current);
    ordered.push(current);

    while !remaining.is_empty() {
        let step = WALK_ORDER.iter().find_map(|&(dx, dy)| {
            let nx = current.x as i32 + dx;
            let ny = current.y as i32 + dy;
            if nx < 0 || ny < 0 {
                return None;
            }
            let next = Coord::new(nx as usize, ny as usize);
            remaining.contains(&next).then_some(next)
        });

        // Stuck: jump to the closest remaining tile, ties broken by position.
        let next = match step {
            Some(next) => next,
            None => match remaining
                .iter()
                .copied()
                .min_by_key(|c| (current.chebyshev(*c), c.y, c.x))
            {
                Some(next) => next,
                None => break,
            },
        };

        remaining.remove(&next);
        ordered.push(next);
        current = next;
    }

    ordered
}
