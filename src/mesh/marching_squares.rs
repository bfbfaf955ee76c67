//! Marching-squares triangulation of a tile grid
//!
//! Each cell spans four neighbouring tile centres. Its candidate points live on
//! a half-tile lattice: corners at even coordinates, edge midpoints with one
//! odd coordinate. Lattice keys are global, so a point shared by two cells (or
//! two chunks) always maps to the same key and the same world position.
//!
//! All polygons in the table wind clockwise in the (x, z) plane, which gives
//! the emitted triangles a +Y facing normal.

use std::collections::HashMap;

use crate::mesh::chunks::Chunk;
use crate::tilemap::TileGrid;

/// Candidate points of a cell as half-lattice offsets from its lower-left
/// tile, clockwise from top-left: 0 TL, 1 top, 2 TR, 3 right, 4 BR, 5 bottom,
/// 6 BL, 7 left.
pub const CELL_POINTS: [(i32, i32); 8] = [
    (0, 2), (1, 2), (2, 2), (2, 1),
    (2, 0), (1, 0), (0, 0), (0, 1),
];

/// Polygon (as indices into `CELL_POINTS`) covering the wall side of a cell
/// for each corner configuration.
pub const CONFIGURATIONS: [&[usize]; 16] = [
    &[],
    &[7, 5, 6],
    &[4, 5, 3],
    &[3, 4, 6, 7],
    &[2, 3, 1],
    &[1, 2, 3, 5, 6, 7],
    &[1, 2, 4, 5],
    &[1, 2, 4, 6, 7],
    &[0, 1, 7],
    &[0, 1, 5, 6],
    &[0, 1, 3, 4, 5, 7],
    &[0, 1, 3, 4, 6],
    &[0, 2, 3, 7],
    &[0, 2, 3, 5, 6],
    &[0, 2, 4, 5, 7],
    &[0, 2, 4, 6],
];

/// Corner configuration, weighting walls top-left 8, top-right 4,
/// bottom-right 2, bottom-left 1.
pub fn configuration(top_left: bool, top_right: bool, bottom_right: bool, bottom_left: bool) -> usize {
    (top_left as usize) << 3 | (top_right as usize) << 2 | (bottom_right as usize) << 1 | bottom_left as usize
}

/// Polygons covering the floor side of a cell.
///
/// The wall polygons join the two wall corners of a saddle, so the floor side
/// gets two separate corner triangles there instead of the complement entry.
fn floor_polygons(config: usize) -> [&'static [usize]; 2] {
    match config {
        5 => [CONFIGURATIONS[8], CONFIGURATIONS[2]],
        10 => [CONFIGURATIONS[4], CONFIGURATIONS[1]],
        c => [CONFIGURATIONS[15 - c], &[]],
    }
}

/// Which side of the wall/floor transition to mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    /// Top of the wall mass
    Ceiling,
    /// Walkable ground
    Floor,
}

/// Placement of the whole map in world space: centred on the origin,
/// grid x along world X, grid y along world Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub map_length: usize,
    pub map_width: usize,
    pub tile_size: f32,
}

impl Frame {
    pub fn world_x(&self, hx: i32) -> f32 {
        (hx as f32 * 0.5 - (self.map_length as f32 - 1.0) * 0.5) * self.tile_size
    }

    pub fn world_z(&self, hy: i32) -> f32 {
        (hy as f32 * 0.5 - (self.map_width as f32 - 1.0) * 0.5) * self.tile_size
    }

    pub fn position(&self, key: (i32, i32), height: f32) -> [f32; 3] {
        [self.world_x(key.0), height, self.world_z(key.1)]
    }

    /// Extent of the map along world X and Z.
    pub fn extent(&self) -> (f32, f32) {
        (
            self.map_length as f32 * self.tile_size,
            self.map_width as f32 * self.tile_size,
        )
    }
}

/// Triangles of one surface of one chunk, with vertices deduplicated by
/// lattice position.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triangulation {
    pub vertices: Vec<[f32; 3]>,
    /// Half-lattice key of every vertex
    pub lattice: Vec<(i32, i32)>,
    /// Three indices per triangle
    pub triangles: Vec<u32>,
}

impl Triangulation {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Vertices of triangle `t`.
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        [self.triangles[3 * t], self.triangles[3 * t + 1], self.triangles[3 * t + 2]]
    }
}

struct Builder<'a> {
    out: Triangulation,
    index: HashMap<(i32, i32), u32>,
    frame: &'a Frame,
    height: f32,
}

impl Builder<'_> {
    fn vertex(&mut self, key: (i32, i32)) -> u32 {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.out.vertices.len() as u32;
        self.out.vertices.push(self.frame.position(key, self.height));
        self.out.lattice.push(key);
        self.index.insert(key, idx);
        idx
    }

    /// Emit a triangle fan from the first point of `polygon`.
    fn polygon(&mut self, cell: (usize, usize), polygon: &[usize]) {
        if polygon.len() < 3 {
            return;
        }
        let base = (2 * cell.0 as i32, 2 * cell.1 as i32);
        let ids: Vec<u32> = polygon
            .iter()
            .map(|&p| {
                let (ox, oy) = CELL_POINTS[p];
                self.vertex((base.0 + ox, base.1 + oy))
            })
            .collect();
        for k in 1..ids.len() - 1 {
            self.out.triangles.extend_from_slice(&[ids[0], ids[k], ids[k + 1]]);
        }
    }
}

/// Triangulate one surface of a chunk at world height `height`.
pub fn triangulate_chunk(
    grid: &TileGrid,
    chunk: &Chunk,
    surface: Surface,
    frame: &Frame,
    height: f32,
) -> Triangulation {
    let mut builder = Builder {
        out: Triangulation::default(),
        index: HashMap::new(),
        frame,
        height,
    };

    for (x, y) in chunk.cells() {
        let config = configuration(
            grid.is_wall(x, y + 1),
            grid.is_wall(x + 1, y + 1),
            grid.is_wall(x + 1, y),
            grid.is_wall(x, y),
        );
        match surface {
            Surface::Ceiling => builder.polygon((x, y), CONFIGURATIONS[config]),
            Surface::Floor => {
                for polygon in floor_polygons(config) {
                    builder.polygon((x, y), polygon);
                }
            }
        }
    }

    builder.out
}

/// Twice the signed area of triangle (a, b, c) in the lattice plane;
/// negative when c lies to the right of a -> b.
pub fn lattice_cross(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> i64 {
    let (abx, aby) = ((b.0 - a.0) as i64, (b.1 - a.1) as i64);
    let (acx, acy) = ((c.0 - a.0) as i64, (c.1 - a.1) as i64);
    abx * acy - aby * acx
}
