//! ASCII rendering and export for cave maps
//!
//! Rows are printed top to bottom with y = 0 first, matching `TileGrid::from_rows`.

use std::fs::File;
use std::io::{self, Write};

use chrono::Local;

use crate::caves::regions::scan_regions;
use crate::caves::MapStats;
use crate::tilemap::{CaveMap, Tile, Tilemap};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// `#` for wall, `.` for floor
    Tiles,
    /// Each floor region gets its own letter
    Regions,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Tiles => "Tiles",
            AsciiMode::Regions => "Regions",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Tiles, AsciiMode::Regions]
    }
}

fn region_char(region: usize) -> char {
    const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    LETTERS[region % LETTERS.len()] as char
}

/// Render a map to an ASCII string
pub fn render_ascii_map(map: &CaveMap, mode: AsciiMode) -> String {
    let (length, width) = (map.length(), map.width());
    let mut result = String::with_capacity((length + 1) * width);

    let labels = match mode {
        AsciiMode::Tiles => None,
        AsciiMode::Regions => {
            let mut labels: Tilemap<Option<usize>> = Tilemap::new(length, width);
            for (idx, region) in scan_regions(map.grid(), Tile::Floor).iter().enumerate() {
                for c in region.tiles() {
                    labels.set(c.ux(), c.uy(), Some(idx));
                }
            }
            Some(labels)
        }
    };

    for y in 0..width {
        for x in 0..length {
            let ch = match labels.as_ref().and_then(|l| *l.get(x, y)) {
                Some(region) => region_char(region),
                None => map.tile(x, y).display_char(),
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Export a map with a header and statistics to a text file
pub fn export_map_file(map: &CaveMap, stats: Option<&MapStats>, path: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    let total = map.length() * map.width();
    let floor = map.floor_count();

    writeln!(file, "=== CAVE GENERATOR MAP FILE ===")?;
    writeln!(file, "Seed: {}", map.seed())?;
    writeln!(file, "Size: {}x{} (border {})", map.length(), map.width(), map.border_size())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_ascii_map(map, AsciiMode::Tiles))?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total tiles: {}", total)?;
    writeln!(file, "Floor: {} ({:.1}%)", floor, 100.0 * floor as f64 / total.max(1) as f64)?;
    writeln!(file, "Wall: {}", map.wall_count())?;
    if let Some(stats) = stats {
        writeln!(file, "Rooms before connecting: {}", stats.rooms_before_connect)?;
        writeln!(file, "Tunnels: {}", stats.tunnels)?;
        writeln!(file, "Pruned wall regions: {}", stats.pruned_wall_regions)?;
        writeln!(file, "Pruned floor regions: {}", stats.pruned_floor_regions)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::TileGrid;

    #[test]
    fn test_tiles_render_round_trips_rows() {
        let rows = ["#####", "#..##", "#####"];
        let map = CaveMap::new(TileGrid::from_rows(&rows), 1, 0);
        assert_eq!(render_ascii_map(&map, AsciiMode::Tiles), "#####\n#..##\n#####\n");
    }

    #[test]
    fn test_regions_get_distinct_letters() {
        let map = CaveMap::new(TileGrid::from_rows(&["#####", "#.#.#", "#####"]), 1, 0);
        assert_eq!(render_ascii_map(&map, AsciiMode::Regions), "#####\n#a#b#\n#####\n");
    }

    #[test]
    fn test_export_writes_header() {
        let map = CaveMap::new(TileGrid::from_rows(&["#####", "#...#", "#####"]), 77, 0);
        let path = std::env::temp_dir().join("cave_generator_ascii_export_test.txt");
        let path = path.to_string_lossy().to_string();
        export_map_file(&map, None, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Seed: 77"));
        assert!(text.contains("#...#"));
        let _ = std::fs::remove_file(&path);
    }
}
