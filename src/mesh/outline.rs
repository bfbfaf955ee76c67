//! Boundary outlines of a ceiling triangulation
//!
//! A boundary edge belongs to exactly one triangle. Outlines follow boundary
//! edges in the direction that keeps the owning triangle on the right, so
//! every outline has the wall mass on its right and open floor on its left.
//!
//! Lattice corners (tile centres) never lie on a wall/floor transition, so
//! they are excluded; this also keeps the chunk perimeter out of the result.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mesh::marching_squares::{lattice_cross, Triangulation};

/// Vertices seen by at most this many triangles are tried as starting points
/// first.
const CANDIDATE_MAX_TRIANGLES: usize = 3;

/// An ordered chain of vertex indices along a wall/floor transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Vertex indices; a closed outline repeats its first index at the end
    pub vertices: Vec<u32>,
    /// False when the outline was cut by a chunk seam
    pub closed: bool,
}

impl Outline {
    /// Number of wall segments along this outline.
    pub fn segment_count(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

fn is_lattice_corner(key: (i32, i32)) -> bool {
    key.0 % 2 == 0 && key.1 % 2 == 0
}

struct Tracer<'a> {
    mesh: &'a Triangulation,
    /// Triangles containing each vertex
    vertex_triangles: Vec<Vec<u32>>,
    visited: Vec<bool>,
}

impl<'a> Tracer<'a> {
    fn new(mesh: &'a Triangulation) -> Self {
        let mut vertex_triangles = vec![Vec::new(); mesh.vertex_count()];
        for t in 0..mesh.triangle_count() {
            for v in mesh.triangle(t) {
                vertex_triangles[v as usize].push(t as u32);
            }
        }
        Self {
            mesh,
            visited: vec![false; mesh.vertex_count()],
            vertex_triangles,
        }
    }

    fn key(&self, v: u32) -> (i32, i32) {
        self.mesh.lattice[v as usize]
    }

    /// The only triangle containing edge (a, b), if it is a boundary edge.
    fn boundary_triangle(&self, a: u32, b: u32) -> Option<u32> {
        let mut shared = self.vertex_triangles[a as usize]
            .iter()
            .copied()
            .filter(|&t| self.mesh.triangle(t as usize).contains(&b));
        match (shared.next(), shared.next()) {
            (Some(t), None) => Some(t),
            _ => None,
        }
    }

    /// Outline-eligible neighbours of `v` across boundary edges, in triangle order.
    fn boundary_neighbours(&self, v: u32) -> Vec<u32> {
        let mut result = Vec::new();
        for &t in &self.vertex_triangles[v as usize] {
            for w in self.mesh.triangle(t as usize) {
                if w == v || result.contains(&w) || is_lattice_corner(self.key(w)) {
                    continue;
                }
                if self.boundary_triangle(v, w).is_some() {
                    result.push(w);
                }
            }
        }
        result
    }

    /// True when walking a -> b keeps the boundary triangle on the right.
    fn is_forward(&self, a: u32, b: u32) -> bool {
        let Some(t) = self.boundary_triangle(a, b) else {
            return false;
        };
        let Some(c) = self
            .mesh
            .triangle(t as usize)
            .into_iter()
            .find(|&c| c != a && c != b)
        else {
            return false;
        };
        lattice_cross(self.key(a), self.key(b), self.key(c)) < 0
    }

    fn next(&self, v: u32) -> Option<u32> {
        self.boundary_neighbours(v).into_iter().find(|&w| self.is_forward(v, w))
    }

    fn previous(&self, v: u32) -> Option<u32> {
        self.boundary_neighbours(v).into_iter().find(|&w| self.is_forward(w, v))
    }

    fn is_candidate(&self, v: u32, strict: bool) -> bool {
        !self.visited[v as usize]
            && !is_lattice_corner(self.key(v))
            && (!strict || self.vertex_triangles[v as usize].len() <= CANDIDATE_MAX_TRIANGLES)
    }

    /// Trace the outline through `start`, or nothing if `start` has no
    /// outgoing boundary edge.
    fn trace_from(&mut self, start: u32) -> Result<Option<Outline>> {
        let neighbours = self.boundary_neighbours(start);
        if neighbours.is_empty() {
            return Ok(None);
        }
        let Some(first) = neighbours.iter().copied().find(|&w| self.is_forward(start, w)) else {
            if neighbours.len() >= 2 {
                return Err(Error::Mesh(format!(
                    "vertex {} at {:?} has {} boundary edges but none leaves it",
                    start,
                    self.key(start),
                    neighbours.len()
                )));
            }
            // Tail of a chain cut by a seam; traced from its other end.
            return Ok(None);
        };

        self.visited[start as usize] = true;
        let mut vertices = vec![start];
        let mut current = first;
        let closed = loop {
            if current == start {
                vertices.push(start);
                break true;
            }
            if self.visited[current as usize] {
                return Err(Error::Mesh(format!(
                    "outline from vertex {} runs into traced vertex {}",
                    start, current
                )));
            }
            self.visited[current as usize] = true;
            vertices.push(current);
            match self.next(current) {
                Some(next) => current = next,
                None => break false,
            }
        };

        if !closed {
            let mut head = Vec::new();
            let mut current = start;
            while let Some(prev) = self.previous(current) {
                if self.visited[prev as usize] {
                    break;
                }
                self.visited[prev as usize] = true;
                head.push(prev);
                current = prev;
            }
            head.reverse();
            head.extend(vertices);
            vertices = head;
        }

        Ok(Some(Outline { vertices, closed }))
    }
}

/// Extract every wall/floor boundary of a ceiling triangulation.
///
/// Fails when the triangulation is inconsistent: a vertex with boundary edges
/// but no outgoing one, or a walk that merges into another outline.
pub fn trace_outlines(mesh: &Triangulation) -> Result<Vec<Outline>> {
    let mut tracer = Tracer::new(mesh);
    let mut outlines = Vec::new();

    for strict in [true, false] {
        for v in 0..mesh.vertex_count() as u32 {
            if !tracer.is_candidate(v, strict) {
                continue;
            }
            if let Some(outline) = tracer.trace_from(v)? {
                outlines.push(outline);
            }
        }
    }

    Ok(outlines)
}
