//! Splitting a map into independently meshed chunks
//!
//! Neighbouring chunks share one row or column of tiles, so every
//! marching-squares cell belongs to exactly one chunk and the seams line up.

use serde::{Deserialize, Serialize};

/// A rectangular block of tiles meshed as one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Lowest tile (x, y) covered
    pub origin: (usize, usize),
    /// Tiles covered along (x, y)
    pub size: (usize, usize),
}

impl Chunk {
    /// Marching-squares cells inside this chunk.
    pub fn cell_count(&self) -> usize {
        self.size.0.saturating_sub(1) * self.size.1.saturating_sub(1)
    }

    /// Cell origins (lower-left tile of each cell), row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (x0, y0) = self.origin;
        let cols = self.size.0.saturating_sub(1);
        let rows = self.size.1.saturating_sub(1);
        (y0..y0 + rows).flat_map(move |y| (x0..x0 + cols).map(move |x| (x, y)))
    }
}

/// (start, len) spans along one axis; consecutive spans overlap by one tile.
fn spans(extent: usize, chunk_size: usize) -> Vec<(usize, usize)> {
    let mut result = Vec::new();
    if extent == 0 {
        return result;
    }
    let chunk_size = chunk_size.max(2);
    let mut start = 0;
    loop {
        let end = (start + chunk_size).min(extent);
        result.push((start, end - start));
        if end == extent {
            break;
        }
        start = end - 1;
    }
    result
}

/// Cover a `length` x `width` grid with chunks of at most `chunk_size` tiles
/// per side, ordered row by row.
pub fn split_into_chunks(length: usize, width: usize, chunk_size: usize) -> Vec<Chunk> {
    let xs = spans(length, chunk_size);
    let ys = spans(width, chunk_size);
    ys.iter()
        .flat_map(|&(y, h)| {
            xs.iter().map(move |&(x, l)| Chunk {
                origin: (x, y),
                size: (l, h),
            })
        })
        .collect()
}
