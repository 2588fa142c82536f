//! Triangle meshes produced by the surface generator

use crate::bounds::Aabb;
use glam::{Vec2, Vec3};

/// A vertex with position, normal, UV and an alpha-bearing color
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
            color,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Alpha channel of the vertex color
    pub fn alpha(&self) -> f32 {
        self.color[3]
    }
}

/// A triangle mesh
///
/// Indices are stored as `u32`; surfaces generated for a 16-bit backend keep
/// every index below 65536 so they can be narrowed losslessly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over vertex positions
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(Vertex::position)
    }

    /// Bounding box of all vertices
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions())
    }

    /// Indices narrowed to 16 bits, if every index fits
    pub fn indices_u16(&self) -> Option<Vec<u16>> {
        self.indices
            .iter()
            .map(|&i| u16::try_from(i).ok())
            .collect()
    }

    /// Calculate face normals and smooth them
    pub fn recalculate_normals(&mut self) {
        // Reset normals
        for v in &mut self.vertices {
            v.normal = [0.0, 0.0, 0.0];
        }

        // Accumulate area-weighted face normals
        for tri in self.indices.chunks_exact(3) {
            let i0 = tri[0] as usize;
            let i1 = tri[1] as usize;
            let i2 = tri[2] as usize;

            let p0 = self.vertices[i0].position();
            let p1 = self.vertices[i1].position();
            let p2 = self.vertices[i2].position();

            let face_normal = (p1 - p0).cross(p2 - p0);

            for &i in &[i0, i1, i2] {
                let n = Vec3::from_array(self.vertices[i].normal) + face_normal;
                self.vertices[i].normal = n.to_array();
            }
        }

        // Normalize
        for v in &mut self.vertices {
            v.normal = Vec3::from_array(v.normal).normalize_or_zero().to_array();
        }
    }
}
