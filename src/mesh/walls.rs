//! Vertical wall strips along outlines

use crate::mesh::outline::Outline;
use crate::mesh::MeshData;

/// Build one quad per outline segment, hanging `wall_height` below the
/// ceiling vertices. Faces point to the left of the outline, toward the floor.
///
/// The horizontal texture coordinate advances by `1 / walls_per_texture_tile`
/// per segment so the wall texture repeats instead of stretching.
pub fn extrude_walls(
    ceiling: &[[f32; 3]],
    outlines: &[Outline],
    wall_height: f32,
    walls_per_texture_tile: f32,
) -> MeshData {
    let segments: usize = outlines.iter().map(Outline::segment_count).sum();
    let mut walls = MeshData::with_capacity(4 * segments, 6 * segments);

    for outline in outlines {
        for (i, pair) in outline.vertices.windows(2).enumerate() {
            let top_left = ceiling[pair[0] as usize];
            let top_right = ceiling[pair[1] as usize];
            let bottom_left = [top_left[0], top_left[1] - wall_height, top_left[2]];
            let bottom_right = [top_right[0], top_right[1] - wall_height, top_right[2]];

            let start = walls.vertices.len() as u32;
            walls.vertices.extend_from_slice(&[top_left, top_right, bottom_left, bottom_right]);

            let u0 = i as f32 / walls_per_texture_tile;
            let u1 = (i + 1) as f32 / walls_per_texture_tile;
            walls.uvs.extend_from_slice(&[[u0, 1.0], [u1, 1.0], [u0, 0.0], [u1, 0.0]]);

            let (tl, tr, bl, br) = (start, start + 1, start + 2, start + 3);
            walls.triangles.extend_from_slice(&[tl, bl, br, tl, br, tr]);
        }
    }

    walls
}
