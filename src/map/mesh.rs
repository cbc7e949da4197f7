use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Triangle list ready for upload: three indices per triangle.
/// Either fully empty or every index is in range.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Push a vertex and return its index
    #[inline(always)]
    pub fn push_vertex(&mut self, p: DVec3) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(p.as_vec3().to_array());
        idx
    }

    #[inline(always)]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append another mesh, rebasing its indices
    pub fn append(&mut self, other: Mesh) {
        if self.is_empty() {
            *self = other;
            return;
        }
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Check the triangle-list invariants
    pub fn is_consistent(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        let n = self.vertices.len();
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}
