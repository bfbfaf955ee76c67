//! Cave generation library
//!
//! Builds connected cave maps and triangulates them into ceiling, wall and
//! floor meshes. Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod caves;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod mesh;
pub mod tilemap;
pub mod verify;

pub use caves::{generate, generate_with_stats, CellularAutomaton, MapGenerator, MapStats};
pub use config::{CaveConfig, MapConfig, MeshConfig, SeedSource};
pub use error::{ConfigError, Error, Result};
pub use mesh::{triangulate, CaveMesh, ChunkMesh, MeshData};
pub use tilemap::{CaveMap, Coord, Tile, TileGrid};
