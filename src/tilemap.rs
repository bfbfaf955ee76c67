//! Dense 2D grids and the tile data model.
//!
//! `Tilemap<T>` is a row-major grid with bounds-checked access. The x axis runs
//! along the map `length`, the y axis along its `width`. Nothing wraps:
//! out-of-range neighbours simply do not exist.

use serde::{Deserialize, Serialize};

/// Largest extent of a grid axis; keeps every coordinate inside a `Coord`.
pub const MAX_DIMENSION: usize = i16::MAX as usize;

/// State of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    Floor = 0,
    #[default]
    Wall = 1,
}

impl Tile {
    /// The other tile type.
    pub fn opposite(self) -> Tile {
        match self {
            Tile::Floor => Tile::Wall,
            Tile::Wall => Tile::Floor,
        }
    }

    pub fn is_wall(self) -> bool {
        self == Tile::Wall
    }

    pub fn is_floor(self) -> bool {
        self == Tile::Floor
    }

    pub fn display_char(self) -> char {
        match self {
            Tile::Floor => '.',
            Tile::Wall => '#',
        }
    }
}

/// Grid position. Equality and hashing use the exact (x, y) pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: u16,
    pub y: u16,
}

impl Coord {
    /// Build a coordinate from grid indices. Grids never exceed `MAX_DIMENSION`,
    /// so the narrowing is lossless for any in-bounds position.
    pub fn new(x: usize, y: usize) -> Self {
        debug_assert!(x <= MAX_DIMENSION && y <= MAX_DIMENSION);
        Self { x: x as u16, y: y as u16 }
    }

    pub fn ux(self) -> usize {
        self.x as usize
    }

    pub fn uy(self) -> usize {
        self.y as usize
    }

    /// Supremum-norm distance: max(|dx|, |dy|).
    pub fn chebyshev(self, other: Coord) -> u32 {
        let dx = (self.x as i32 - other.x as i32).unsigned_abs();
        let dy = (self.y as i32 - other.y as i32).unsigned_abs();
        dx.max(dy)
    }
}

/// A 2D grid with bounds-checked indexing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tilemap<T> {
    pub length: usize,
    pub width: usize,
    data: Vec<T>,
}

impl<T: Clone + Default> Tilemap<T> {
    pub fn new(length: usize, width: usize) -> Self {
        Self {
            length,
            width,
            data: vec![T::default(); length * width],
        }
    }
}

impl<T: Clone> Tilemap<T> {
    pub fn new_with(length: usize, width: usize, value: T) -> Self {
        Self {
            length,
            width,
            data: vec![value; length * width],
        }
    }

    /// Get the index into the data array.
    ///
    /// Panics on out-of-range positions; callers that may step outside the
    /// grid use `try_get`.
    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.length && y < self.width,
            "tile ({}, {}) outside {}x{} grid",
            x, y, self.length, self.width
        );
        y * self.length + x
    }

    pub fn get(&self, x: usize, y: usize) -> &T {
        &self.data[self.index(x, y)]
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        let idx = self.index(x, y);
        &mut self.data[idx]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.index(x, y);
        self.data[idx] = value;
    }

    /// Signed lookup; `None` outside the grid.
    pub fn try_get(&self, x: i32, y: i32) -> Option<&T> {
        if self.in_bounds(x, y) {
            Some(&self.data[y as usize * self.length + x as usize])
        } else {
            None
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.length && (y as usize) < self.width
    }

    /// True for cells on the outermost ring.
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.length || y + 1 == self.width
    }

    /// Fill the entire map with a value.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// 4-connected neighbours that lie inside the grid.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        [(-1i32, 0i32), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .map(move |(dx, dy)| (x as i32 + dx, y as i32 + dy))
            .filter(move |&(nx, ny)| self.in_bounds(nx, ny))
            .map(|(nx, ny)| (nx as usize, ny as usize))
    }

    /// Positions on the outermost ring, each exactly once.
    pub fn edge_positions(&self) -> Vec<(usize, usize)> {
        let mut result = Vec::new();
        if self.length == 0 || self.width == 0 {
            return result;
        }
        for x in 0..self.length {
            result.push((x, 0));
            if self.width > 1 {
                result.push((x, self.width - 1));
            }
        }
        for y in 1..self.width.saturating_sub(1) {
            result.push((0, y));
            if self.length > 1 {
                result.push((self.length - 1, y));
            }
        }
        result
    }

    /// Iterate over all cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let length = self.length;
        self.data.iter().enumerate().map(move |(idx, val)| {
            (idx % length, idx / length, val)
        })
    }

    /// Iterate mutably over all cells with their coordinates.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, usize, &mut T)> {
        let length = self.length;
        self.data.iter_mut().enumerate().map(move |(idx, val)| {
            (idx % length, idx / length, val)
        })
    }

    /// Raw row-major cell storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

/// The Floor/Wall grid the cave pipeline mutates.
pub type TileGrid = Tilemap<Tile>;

impl Tilemap<Tile> {
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_wall()
    }

    /// Walls among the 8 surrounding cells; positions off the grid count as wall.
    pub fn wall_neighbor_count(&self, x: usize, y: usize) -> u8 {
        let mut count = 0;
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                match self.try_get(x as i32 + dx, y as i32 + dy) {
                    Some(tile) if tile.is_floor() => {}
                    _ => count += 1,
                }
            }
        }
        count
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.data.iter().filter(|&&t| t == tile).count()
    }

    /// One byte per cell (Floor = 0, Wall = 1), row-major.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().map(|&t| t as u8).collect()
    }

    /// Parse a grid from rows of `#` (wall) and `.` (floor); the first row is y = 0.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.len();
        let length = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut grid = Tilemap::new_with(length, width, Tile::Wall);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate().take(length) {
                if c != '#' {
                    grid.set(x, y, Tile::Floor);
                }
            }
        }
        grid
    }
}

/// A finished cave: read-only tiles plus the parameters needed to reproduce it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaveMap {
    grid: TileGrid,
    seed: u64,
    border_size: usize,
}

impl CaveMap {
    pub fn new(grid: TileGrid, seed: u64, border_size: usize) -> Self {
        Self { grid, seed, border_size }
    }

    pub fn tile(&self, x: usize, y: usize) -> Tile {
        *self.grid.get(x, y)
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.grid.is_wall(x, y)
    }

    pub fn length(&self) -> usize {
        self.grid.length
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    /// Seed the map was generated from (already resolved if it was random).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn border_size(&self) -> usize {
        self.border_size
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.grid.iter().map(|(x, y, &t)| (x, y, t))
    }

    pub fn floor_count(&self) -> usize {
        self.grid.count(Tile::Floor)
    }

    pub fn wall_count(&self) -> usize {
        self.grid.count(Tile::Wall)
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn into_grid(self) -> TileGrid {
        self.grid
    }
}
