//! Wall border around the finished map

use crate::tilemap::{Tile, TileGrid};

/// Return a copy of `grid` padded by `border_size` wall tiles on every side.
pub fn apply_border(grid: &TileGrid, border_size: usize) -> TileGrid {
    if border_size == 0 {
        return grid.clone();
    }

    let mut bordered = TileGrid::new_with(
        grid.length + 2 * border_size,
        grid.width + 2 * border_size,
        Tile::Wall,
    );
    for (x, y, &tile) in grid.iter() {
        bordered.set(x + border_size, y + border_size, tile);
    }
    bordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_border_grows_and_copies() {
        let grid = TileGrid::from_rows(&["#..#", "...."]);
        let bordered = apply_border(&grid, 2);
        assert_eq!((bordered.length, bordered.width), (8, 6));
        for (x, y, &tile) in grid.iter() {
            assert_eq!(*bordered.get(x + 2, y + 2), tile);
        }
        for y in 0..6 {
            for x in 0..8 {
                let inside = (2..6).contains(&x) && (2..4).contains(&y);
                if !inside {
                    assert!(bordered.is_wall(x, y));
                }
            }
        }
    }

    #[test]
    fn test_zero_border_is_identity() {
        let grid = TileGrid::from_rows(&["#.#", "..."]);
        assert_eq!(apply_border(&grid, 0), grid);
    }
}
