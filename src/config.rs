//! Generation and meshing parameters
//!
//! Plain value types with explicit bounds checks. Every pipeline entry point
//! validates its configuration before doing any work.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::tilemap::MAX_DIMENSION;

/// Smallest accepted map side, in tiles.
pub const MIN_DIMENSION: usize = 5;

/// Largest chunk side used during triangulation, in tiles.
pub const MAX_CHUNK_SIZE: usize = 150;

/// Where the generation seed comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSource {
    /// Reproducible run
    Fixed(u64),
    /// Draw a fresh seed once at startup
    #[default]
    Random,
}

impl SeedSource {
    /// Resolve to a concrete seed. Only `Random` touches the thread RNG.
    pub fn resolve(self) -> u64 {
        match self {
            SeedSource::Fixed(seed) => seed,
            SeedSource::Random => rand::random(),
        }
    }
}

impl From<Option<u64>> for SeedSource {
    fn from(seed: Option<u64>) -> Self {
        seed.map(SeedSource::Fixed).unwrap_or(SeedSource::Random)
    }
}

/// Map pipeline parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tiles along the x axis (before the border is added)
    pub length: usize,
    /// Tiles along the y axis (before the border is added)
    pub width: usize,
    /// Probability that an interior tile starts as wall (0.0-1.0)
    pub initial_density: f64,
    pub seed: SeedSource,
    /// Wall ring added around the finished map
    pub border_size: usize,
    /// Wall regions smaller than this become floor
    pub min_wall_region: usize,
    /// Floor regions smaller than this become wall
    pub min_floor_region: usize,
    /// Tunnel half-width; cells within this Euclidean distance of the tunnel line are carved
    pub tunnel_radius: usize,
    pub smoothing_iterations: usize,
    /// Wall neighbours (of 8) at which a cell keeps its state
    pub wall_threshold: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            length: 128,
            width: 72,
            initial_density: 0.5,
            seed: SeedSource::Random,
            border_size: 1,
            min_wall_region: 50,
            min_floor_region: 50,
            tunnel_radius: 1,
            smoothing_iterations: 5,
            wall_threshold: 4,
        }
    }
}

impl MapConfig {
    /// Small map for quick iteration and tests
    pub fn small() -> Self {
        Self {
            length: 48,
            width: 32,
            min_wall_region: 10,
            min_floor_region: 10,
            ..Default::default()
        }
    }

    /// Large map; exercises the parallel connection search
    pub fn large() -> Self {
        Self {
            length: 400,
            width: 300,
            min_wall_region: 80,
            min_floor_region: 80,
            tunnel_radius: 2,
            ..Default::default()
        }
    }

    /// Wide open caverns
    pub fn open() -> Self {
        Self {
            initial_density: 0.42,
            ..Default::default()
        }
    }

    /// Many small chambers joined by tunnels
    pub fn dense() -> Self {
        Self {
            initial_density: 0.53,
            min_floor_region: 20,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = SeedSource::Fixed(seed);
        self
    }

    /// Final grid extent including the border.
    pub fn bordered_size(&self) -> (usize, usize) {
        (
            self.length + 2 * self.border_size,
            self.width + 2 * self.border_size,
        )
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (field, value) in [("length", self.length), ("width", self.width)] {
            if value < MIN_DIMENSION {
                return Err(ConfigError::DimensionTooSmall { field, value, min: MIN_DIMENSION });
            }
            let bordered = value.saturating_add(self.border_size.saturating_mul(2));
            if bordered > MAX_DIMENSION {
                return Err(ConfigError::DimensionTooLarge { field, value: bordered, max: MAX_DIMENSION });
            }
        }
        if !(0.0..=1.0).contains(&self.initial_density) {
            return Err(ConfigError::DensityOutOfRange(self.initial_density));
        }
        if self.wall_threshold > 8 {
            return Err(ConfigError::ThresholdOutOfRange(self.wall_threshold));
        }
        let max_radius = self.length.max(self.width);
        if self.tunnel_radius > max_radius {
            return Err(ConfigError::TunnelRadiusTooLarge { value: self.tunnel_radius, max: max_radius });
        }
        Ok(())
    }
}

/// Mesh pipeline parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    /// World units per tile
    pub tile_size: f32,
    pub wall_height: f32,
    /// Wall segments covered by one horizontal repeat of the wall texture
    pub walls_per_texture_tile: f32,
    /// Texture repeats across the whole ceiling/floor surface
    pub ceiling_texture_repeat: f32,
    /// Tiles per chunk side (neighbouring chunks share one tile row/column)
    pub chunk_size: usize,
    pub generate_floor: bool,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            tile_size: 1.0,
            wall_height: 5.0,
            walls_per_texture_tile: 5.0,
            ceiling_texture_repeat: 10.0,
            chunk_size: MAX_CHUNK_SIZE,
            generate_floor: true,
        }
    }
}

impl MeshConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (field, value) in [
            ("tile_size", self.tile_size),
            ("wall_height", self.wall_height),
            ("walls_per_texture_tile", self.walls_per_texture_tile),
            ("ceiling_texture_repeat", self.ceiling_texture_repeat),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(2..=MAX_CHUNK_SIZE).contains(&self.chunk_size) {
            return Err(ConfigError::ChunkSizeOutOfRange {
                value: self.chunk_size,
                min: 2,
                max: MAX_CHUNK_SIZE,
            });
        }
        Ok(())
    }
}

/// Complete configuration, loadable from a (partial) JSON document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    pub map: MapConfig,
    pub mesh: MeshConfig,
}

impl CaveConfig {
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.map.validate()?;
        self.mesh.validate()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: CaveConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
