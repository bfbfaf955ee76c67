//! Mesh generation from a finished cave map
//!
//! The map is split into overlapping chunks which are meshed in parallel.
//! Each chunk gets a ceiling surface (top of the wall mass), the wall strips
//! hanging from its outlines, and optionally a floor surface one wall height
//! below. World space is Y up with the map centred on the origin.

pub mod chunks;
pub mod marching_squares;
pub mod outline;
pub mod walls;

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::MeshConfig;
use crate::error::Result;
use crate::tilemap::{CaveMap, TileGrid};

use chunks::{split_into_chunks, Chunk};
use marching_squares::{triangulate_chunk, Frame, Surface, Triangulation};
use outline::{trace_outlines, Outline};

/// Flat render buffers for one surface.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    /// Three indices per triangle
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
}

impl MeshData {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(indices),
            uvs: Vec::with_capacity(vertices),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Vertex positions as raw bytes, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Triangle indices as raw bytes, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }
}

/// Meshes for one chunk of the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkMesh {
    pub chunk: Chunk,
    pub ceiling: MeshData,
    pub walls: MeshData,
    pub floor: Option<MeshData>,
    /// Outlines index into `ceiling.vertices`
    pub outlines: Vec<Outline>,
}

/// Meshes for a whole map, one entry per chunk in row order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CaveMesh {
    pub chunks: Vec<ChunkMesh>,
}

impl CaveMesh {
    pub fn outline_count(&self) -> usize {
        self.chunks.iter().map(|c| c.outlines.len()).sum()
    }

    pub fn outlines(&self) -> impl Iterator<Item = &Outline> {
        self.chunks.iter().flat_map(|c| c.outlines.iter())
    }

    /// Vertices across ceiling, walls and floor of every chunk.
    pub fn vertex_count(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| {
                c.ceiling.vertices.len()
                    + c.walls.vertices.len()
                    + c.floor.as_ref().map_or(0, |f| f.vertices.len())
            })
            .sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.chunks
            .iter()
            .map(|c| {
                c.ceiling.triangle_count()
                    + c.walls.triangle_count()
                    + c.floor.as_ref().map_or(0, MeshData::triangle_count)
            })
            .sum()
    }
}

/// Planar texture coordinates spanning the whole map `repeat` times.
fn planar_uvs(vertices: &[[f32; 3]], frame: &Frame, repeat: f32) -> Vec<[f32; 2]> {
    let (extent_x, extent_z) = frame.extent();
    vertices
        .iter()
        .map(|v| {
            [
                (v[0] / extent_x + 0.5) * repeat,
                (v[2] / extent_z + 0.5) * repeat,
            ]
        })
        .collect()
}

fn surface_data(tri: Triangulation, frame: &Frame, repeat: f32) -> MeshData {
    let uvs = planar_uvs(&tri.vertices, frame, repeat);
    MeshData {
        vertices: tri.vertices,
        triangles: tri.triangles,
        uvs,
    }
}

/// Mesh a single chunk.
pub fn mesh_chunk(grid: &TileGrid, chunk: &Chunk, frame: &Frame, config: &MeshConfig) -> Result<ChunkMesh> {
    let ceiling = triangulate_chunk(grid, chunk, Surface::Ceiling, frame, 0.0);
    let outlines = trace_outlines(&ceiling)?;
    let walls = walls::extrude_walls(
        &ceiling.vertices,
        &outlines,
        config.wall_height,
        config.walls_per_texture_tile,
    );
    let floor = config.generate_floor.then(|| {
        let tri = triangulate_chunk(grid, chunk, Surface::Floor, frame, -config.wall_height);
        surface_data(tri, frame, config.ceiling_texture_repeat)
    });

    Ok(ChunkMesh {
        chunk: *chunk,
        ceiling: surface_data(ceiling, frame, config.ceiling_texture_repeat),
        walls,
        floor,
        outlines,
    })
}

/// Triangulate a finished map into per-chunk ceiling, wall and floor meshes.
pub fn triangulate(map: &CaveMap, config: &MeshConfig) -> Result<CaveMesh> {
    config.validate()?;
    let start = Instant::now();

    let grid = map.grid();
    let frame = Frame {
        map_length: grid.length,
        map_width: grid.width,
        tile_size: config.tile_size,
    };
    let chunks = split_into_chunks(grid.length, grid.width, config.chunk_size);

    let meshes = chunks
        .par_iter()
        .map(|chunk| mesh_chunk(grid, chunk, &frame, config))
        .collect::<Result<Vec<_>>>()?;
    let mesh = CaveMesh { chunks: meshes };

    log::info!(
        "Triangulated {}x{} map into {} chunks: {} outlines, {} triangles in {:.1}ms",
        grid.length,
        grid.width,
        mesh.chunks.len(),
        mesh.outline_count(),
        mesh.triangle_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(mesh)
}
