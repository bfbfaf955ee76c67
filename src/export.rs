//! Image, OBJ and JSON export for maps and meshes

use std::fs::File;
use std::io::{self, BufWriter, Write};

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::ascii::{render_ascii_map, AsciiMode};
use crate::error::Result;
use crate::mesh::{CaveMesh, MeshData};
use crate::tilemap::CaveMap;

const FLOOR_COLOR: [u8; 3] = [214, 200, 170];
const WALL_COLOR: [u8; 3] = [40, 36, 44];
/// Walls touching floor, so the cave outline reads at a glance
const WALL_EDGE_COLOR: [u8; 3] = [96, 84, 88];

fn touches_floor(map: &CaveMap, x: usize, y: usize) -> bool {
    let (x, y) = (x as i32, y as i32);
    [(-1, 0), (1, 0), (0, -1), (0, 1)]
        .into_iter()
        .any(|(dx, dy)| map.grid().try_get(x + dx, y + dy).is_some_and(|t| t.is_floor()))
}

/// Export the map as a PNG, `scale` pixels per tile. Row y = 0 is the top.
pub fn export_map_png(map: &CaveMap, path: &str, scale: u32) -> std::result::Result<(), image::ImageError> {
    let scale = scale.max(1);
    let mut img: RgbImage =
        ImageBuffer::new(map.length() as u32 * scale, map.width() as u32 * scale);

    for (x, y, tile) in map.iter() {
        let color = if tile.is_floor() {
            FLOOR_COLOR
        } else if touches_floor(map, x, y) {
            WALL_EDGE_COLOR
        } else {
            WALL_COLOR
        };
        for py in 0..scale {
            for px in 0..scale {
                img.put_pixel(x as u32 * scale + px, y as u32 * scale + py, Rgb(color));
            }
        }
    }

    img.save(path)
}

fn write_obj_object<W: Write>(
    out: &mut W,
    name: &str,
    data: &MeshData,
    vertex_base: &mut usize,
) -> io::Result<()> {
    if data.is_empty() {
        return Ok(());
    }
    writeln!(out, "o {}", name)?;
    for v in &data.vertices {
        writeln!(out, "v {} {} {}", v[0], v[1], v[2])?;
    }
    for uv in &data.uvs {
        writeln!(out, "vt {} {}", uv[0], uv[1])?;
    }
    for tri in data.triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize + *vertex_base + 1);
        writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}")?;
    }
    *vertex_base += data.vertices.len();
    Ok(())
}

/// Write the mesh as Wavefront OBJ: one object per chunk surface.
///
/// Vertex and texture indices coincide because every surface carries one uv
/// per vertex.
pub fn write_obj<W: Write>(mesh: &CaveMesh, out: &mut W) -> io::Result<()> {
    writeln!(out, "# cave_generator mesh: {} chunks", mesh.chunks.len())?;
    let mut vertex_base = 0;
    for (idx, chunk) in mesh.chunks.iter().enumerate() {
        write_obj_object(out, &format!("ceiling_{}", idx), &chunk.ceiling, &mut vertex_base)?;
        write_obj_object(out, &format!("walls_{}", idx), &chunk.walls, &mut vertex_base)?;
        if let Some(floor) = &chunk.floor {
            write_obj_object(out, &format!("floor_{}", idx), floor, &mut vertex_base)?;
        }
    }
    Ok(())
}

pub fn export_mesh_obj(mesh: &CaveMesh, path: &str) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_obj(mesh, &mut out)?;
    out.flush()
}

/// Serializable view of a finished map
#[derive(Serialize)]
struct MapDocument<'a> {
    seed: u64,
    length: usize,
    width: usize,
    border_size: usize,
    /// `#` wall, `.` floor; first row is y = 0
    rows: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<&'a CaveMesh>,
}

/// Export the map, and optionally its mesh, as pretty-printed JSON.
pub fn export_json(map: &CaveMap, mesh: Option<&CaveMesh>, path: &str) -> Result<()> {
    let document = MapDocument {
        seed: map.seed(),
        length: map.length(),
        width: map.width(),
        border_size: map.border_size(),
        rows: render_ascii_map(map, AsciiMode::Tiles)
            .lines()
            .map(str::to_string)
            .collect(),
        mesh,
    };
    let out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(out, &document)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeshConfig;
    use crate::mesh::triangulate;
    use crate::tilemap::TileGrid;

    fn room_map() -> CaveMap {
        CaveMap::new(
            TileGrid::from_rows(&["#######", "##...##", "##...##", "#######"]),
            5,
            0,
        )
    }

    #[test]
    fn test_obj_counts_match_mesh() {
        let mesh = triangulate(&room_map(), &MeshConfig::default()).unwrap();
        let mut out = Vec::new();
        write_obj(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let v = text.lines().filter(|l| l.starts_with("v ")).count();
        let f = text.lines().filter(|l| l.starts_with("f ")).count();
        assert_eq!(v, mesh.vertex_count());
        assert_eq!(f, mesh.triangle_count());
        assert!(text.contains("o walls_0"));
        assert!(text.contains("o floor_0"));
    }

    #[test]
    fn test_obj_indices_are_one_based_and_in_range() {
        let mesh = triangulate(&room_map(), &MeshConfig::default()).unwrap();
        let mut out = Vec::new();
        write_obj(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let total = mesh.vertex_count();
        for line in text.lines().filter(|l| l.starts_with("f ")) {
            for corner in line[2..].split_whitespace() {
                let idx: usize = corner.split('/').next().unwrap().parse().unwrap();
                assert!(idx >= 1 && idx <= total, "{}", line);
            }
        }
    }

    #[test]
    fn test_json_contains_rows() {
        let path = std::env::temp_dir().join("cave_generator_json_export_test.json");
        let path = path.to_string_lossy().to_string();
        export_json(&room_map(), None, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["seed"], 5);
        assert_eq!(value["rows"][1], "##...##");
        assert!(value.get("mesh").is_none());
        let _ = std::fs::remove_file(&path);
    }
}
