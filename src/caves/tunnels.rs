//! Tunnel carving along accepted connections

use crate::caves::connections::RoomConnection;
use crate::tilemap::{Coord, Tile, TileGrid};

/// Discretized line from `from` to `to`, inclusive at both ends.
///
/// Uses max(|dx|, |dy|) uniformly interpolated steps.
pub fn tunnel_line(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = to.x as i32 - from.x as i32;
    let dy = to.y as i32 - from.y as i32;
    let steps = dx.abs().max(dy.abs());

    if steps == 0 {
        return vec![from];
    }

    (0..=steps)
        .map(|k| {
            let t = k as f64 / steps as f64;
            let x = from.x as i32 + (dx as f64 * t).round() as i32;
            let y = from.y as i32 + (dy as f64 * t).round() as i32;
            Coord::new(x as usize, y as usize)
        })
        .collect()
}

/// Floor every non-ring cell within `radius` (Euclidean) of `center`.
fn stamp(grid: &mut TileGrid, center: Coord, radius: i64) -> usize {
    let mut carved = 0;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let x = center.x as i64 + dx;
            let y = center.y as i64 + dy;
            if !grid.in_bounds(x as i32, y as i32) {
                continue;
            }
            let (x, y) = (x as usize, y as usize);
            if grid.is_edge(x, y) || !grid.is_wall(x, y) {
                continue;
            }
            grid.set(x, y, Tile::Floor);
            carved += 1;
        }
    }
    carved
}

/// Carve a passage between two tiles. Returns the number of walls removed.
///
/// Diagonal steps also carve their orthogonal elbow so the passage stays
/// 4-connected at radius 0. Radii beyond the grid extent carve no more than
/// the extent itself and are clamped to it.
pub fn carve_tunnel(grid: &mut TileGrid, from: Coord, to: Coord, radius: usize) -> usize {
    let radius = radius.min(grid.length.max(grid.width)) as i64;
    let mut carved = 0;
    let mut previous: Option<Coord> = None;

    for point in tunnel_line(from, to) {
        carved += stamp(grid, point, radius);
        if let Some(prev) = previous {
            if prev.x != point.x && prev.y != point.y {
                carved += stamp(grid, Coord { x: point.x, y: prev.y }, radius);
            }
        }
        previous = Some(point);
    }

    carved
}

/// Carve every accepted connection in order.
pub fn carve_connections(grid: &mut TileGrid, connections: &[RoomConnection], radius: usize) -> usize {
    connections
        .iter()
        .map(|conn| carve_tunnel(grid, conn.tile_a, conn.tile_b, radius))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caves::regions::scan_regions;

    #[test]
    fn test_line_endpoints_and_length() {
        let line = tunnel_line(Coord::new(2, 3), Coord::new(9, 5));
        assert_eq!(line.len(), 8);
        assert_eq!(line.first(), Some(&Coord::new(2, 3)));
        assert_eq!(line.last(), Some(&Coord::new(9, 5)));
        for pair in line.windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1);
        }
    }

    #[test]
    fn test_degenerate_line() {
        assert_eq!(tunnel_line(Coord::new(4, 4), Coord::new(4, 4)), vec![Coord::new(4, 4)]);
    }

    #[test]
    fn test_radius_zero_diagonal_stays_connected() {
        let mut grid = TileGrid::new_with(12, 12, Tile::Wall);
        grid.set(2, 2, Tile::Floor);
        grid.set(9, 8, Tile::Floor);
        carve_tunnel(&mut grid, Coord::new(2, 2), Coord::new(9, 8), 0);
        assert_eq!(scan_regions(&grid, Tile::Floor).len(), 1);
    }

    #[test]
    fn test_radius_carves_disk() {
        let mut grid = TileGrid::new_with(11, 11, Tile::Wall);
        let carved = carve_tunnel(&mut grid, Coord::new(5, 5), Coord::new(5, 5), 2);
        // Lattice points with dx^2 + dy^2 <= 4.
        assert_eq!(carved, 13);
        assert!(!grid.is_wall(5, 3));
        assert!(grid.is_wall(4, 3));
    }

    #[test]
    fn test_oversized_radius_is_clamped() {
        let mut grid = TileGrid::new_with(7, 5, Tile::Wall);
        let carved = carve_tunnel(&mut grid, Coord::new(2, 2), Coord::new(4, 2), 100_000);
        assert_eq!(carved, 5 * 3);
        for (x, y) in grid.edge_positions() {
            assert!(grid.is_wall(x, y));
        }
    }

    #[test]
    fn test_outer_ring_is_never_carved() {
        let mut grid = TileGrid::new_with(8, 8, Tile::Wall);
        carve_tunnel(&mut grid, Coord::new(1, 1), Coord::new(6, 1), 3);
        for (x, y) in grid.edge_positions() {
            assert!(grid.is_wall(x, y), "ring tile ({}, {}) carved", x, y);
        }
        assert!(!grid.is_wall(3, 1));
    }
}
