//! Independent post-checks for finished maps and meshes.
//!
//! These checks deliberately avoid the region scanner and the triangulator
//! internals so they can catch bugs in either.

use std::fmt;

use crate::mesh::{CaveMesh, MeshData};
use crate::tilemap::{CaveMap, Tile};

/// Category of verification check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VerifyCategory {
    /// Every floor tile reaches every other floor tile
    Connectivity,
    /// The outermost ring is solid wall
    SealedBorder,
    /// Buffers are well formed (index ranges, uv counts)
    MeshBuffers,
    /// Closed outlines start and end on the same vertex
    OutlineClosure,
}

impl fmt::Display for VerifyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyCategory::Connectivity => write!(f, "Connectivity"),
            VerifyCategory::SealedBorder => write!(f, "Sealed Border"),
            VerifyCategory::MeshBuffers => write!(f, "Mesh Buffers"),
            VerifyCategory::OutlineClosure => write!(f, "Outline Closure"),
        }
    }
}

/// Result of a single verification check
#[derive(Clone, Debug)]
pub struct VerifyResult {
    pub passed: bool,
    pub category: VerifyCategory,
    pub message: String,
    /// Offending tile, when there is one
    pub location: Option<(usize, usize)>,
}

impl VerifyResult {
    pub fn pass(category: VerifyCategory, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            category,
            message: message.into(),
            location: None,
        }
    }

    pub fn fail(category: VerifyCategory, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            category,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(mut self, x: usize, y: usize) -> Self {
        self.location = Some((x, y));
        self
    }
}

/// Collected results for one map (and optionally its mesh)
#[derive(Clone, Debug)]
pub struct VerificationReport {
    pub seed: u64,
    pub map_size: (usize, usize),
    pub results: Vec<VerifyResult>,
}

impl VerificationReport {
    pub fn new(seed: u64, map_size: (usize, usize)) -> Self {
        Self {
            seed,
            map_size,
            results: Vec::new(),
        }
    }

    pub fn add_result(&mut self, result: VerifyResult) {
        self.results.push(result);
    }

    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &VerifyResult> {
        self.results.iter().filter(|r| !r.passed)
    }

    pub fn format(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Verification for seed {} ({}x{}): {}\n",
            self.seed,
            self.map_size.0,
            self.map_size.1,
            if self.passed() { "PASSED" } else { "FAILED" }
        ));
        for result in &self.results {
            let mark = if result.passed { "ok  " } else { "FAIL" };
            out.push_str(&format!("  [{}] {}: {}", mark, result.category, result.message));
            if let Some((x, y)) = result.location {
                out.push_str(&format!(" at ({}, {})", x, y));
            }
            out.push('\n');
        }
        out
    }
}

/// Depth-first fill from the first floor tile; true when it reaches all floor.
pub fn floor_is_connected(map: &CaveMap) -> bool {
    first_unreached_floor(map).is_none()
}

/// A floor tile the fill from the first floor tile never reached.
fn first_unreached_floor(map: &CaveMap) -> Option<(usize, usize)> {
    let (length, width) = (map.length(), map.width());
    let (sx, sy, _) = map.iter().find(|&(_, _, t)| t == Tile::Floor)?;

    let mut seen = vec![false; length * width];
    let mut stack = vec![(sx, sy)];
    seen[sy * length + sx] = true;

    while let Some((x, y)) = stack.pop() {
        let mut visit = |nx: usize, ny: usize| {
            let idx = ny * length + nx;
            if !seen[idx] && !map.is_wall(nx, ny) {
                seen[idx] = true;
                stack.push((nx, ny));
            }
        };
        if x > 0 {
            visit(x - 1, y);
        }
        if x + 1 < length {
            visit(x + 1, y);
        }
        if y > 0 {
            visit(x, y - 1);
        }
        if y + 1 < width {
            visit(x, y + 1);
        }
    }

    map.iter()
        .find(|&(x, y, t)| t == Tile::Floor && !seen[y * length + x])
        .map(|(x, y, _)| (x, y))
}

fn first_open_ring_tile(map: &CaveMap) -> Option<(usize, usize)> {
    let (length, width) = (map.length(), map.width());
    map.iter()
        .find(|&(x, y, t)| {
            (x == 0 || y == 0 || x + 1 == length || y + 1 == width) && t == Tile::Floor
        })
        .map(|(x, y, _)| (x, y))
}

/// True when every tile on the outermost ring is wall.
pub fn ring_is_sealed(map: &CaveMap) -> bool {
    first_open_ring_tile(map).is_none()
}

/// Run the map checks.
pub fn verify_map(map: &CaveMap) -> VerificationReport {
    let mut report = VerificationReport::new(map.seed(), (map.length(), map.width()));

    report.add_result(match first_unreached_floor(map) {
        None => VerifyResult::pass(
            VerifyCategory::Connectivity,
            format!("{} floor tiles form one region", map.floor_count()),
        ),
        Some((x, y)) => VerifyResult::fail(
            VerifyCategory::Connectivity,
            "floor tile unreachable from the first floor tile",
        )
        .at(x, y),
    });

    report.add_result(match first_open_ring_tile(map) {
        None => VerifyResult::pass(VerifyCategory::SealedBorder, "outer ring is solid wall"),
        Some((x, y)) => {
            VerifyResult::fail(VerifyCategory::SealedBorder, "floor on the outer ring").at(x, y)
        }
    });

    report
}

fn check_buffers(name: &str, data: &MeshData) -> Option<String> {
    if data.triangles.len() % 3 != 0 {
        return Some(format!("{}: index count {} is not a multiple of 3", name, data.triangles.len()));
    }
    if data.uvs.len() != data.vertices.len() {
        return Some(format!(
            "{}: {} uvs for {} vertices",
            name,
            data.uvs.len(),
            data.vertices.len()
        ));
    }
    if let Some(&bad) = data.triangles.iter().find(|&&i| i as usize >= data.vertices.len()) {
        return Some(format!("{}: index {} out of range", name, bad));
    }
    None
}

/// Run the map checks plus buffer and outline checks on its mesh.
pub fn verify_all(map: &CaveMap, mesh: &CaveMesh) -> VerificationReport {
    let mut report = verify_map(map);

    let mut buffer_problem = None;
    let mut open_closed = 0;
    for (idx, chunk) in mesh.chunks.iter().enumerate() {
        let floor = chunk.floor.as_ref().map(|f| ("floor", f));
        for (name, data) in [("ceiling", &chunk.ceiling), ("walls", &chunk.walls)]
            .into_iter()
            .chain(floor)
        {
            if buffer_problem.is_none() {
                buffer_problem = check_buffers(name, data).map(|msg| format!("chunk {} {}", idx, msg));
            }
        }
        open_closed += chunk
            .outlines
            .iter()
            .filter(|o| o.closed && o.vertices.first() != o.vertices.last())
            .count();
    }

    report.add_result(match buffer_problem {
        None => VerifyResult::pass(
            VerifyCategory::MeshBuffers,
            format!("{} chunks well formed", mesh.chunks.len()),
        ),
        Some(msg) => VerifyResult::fail(VerifyCategory::MeshBuffers, msg),
    });

    report.add_result(if open_closed == 0 {
        VerifyResult::pass(
            VerifyCategory::OutlineClosure,
            format!("{} outlines", mesh.outline_count()),
        )
    } else {
        VerifyResult::fail(
            VerifyCategory::OutlineClosure,
            format!("{} closed outlines do not return to their start", open_closed),
        )
    });

    report
}
