//! Height-field surfaces `y = f(x, z)`
//!
//! A surface is sampled on a uniform `(res + 1) x (res + 1)` grid spanning
//! `[-range, range]` in x and z. Heights are clamped into the same interval
//! and vertices fade to transparent over the outer tenth of the domain.

use crate::color::Rgba;
use crate::mesh::{Mesh, Vertex};
use glam::{Vec2, Vec3};

/// Fraction of the range where the edge fade begins
pub const FADE_START: f32 = 0.9;

/// Anything that can report a height for a point in the xz-plane
pub trait HeightField {
    /// Height at `(x, z)`.
    ///
    /// Implementations should substitute 0 for samples they cannot compute;
    /// non-finite returns are also treated as 0 by the generator.
    fn height(&self, x: f32, z: f32) -> f32;
}

impl<F: Fn(f32, f32) -> f32> HeightField for F {
    fn height(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}

/// Parameters for one surface generation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    /// Grid cells per side
    pub resolution: u32,
    /// Half-extent of the domain
    pub range: f32,
}

impl SurfaceParams {
    /// Coordinate of grid line `i` along x or z
    ///
    /// Written so that `i = 0` and `i = resolution` land exactly on the
    /// domain edges.
    pub fn grid_coordinate(&self, i: u32) -> f32 {
        -self.range + (i as f32 / self.resolution as f32) * 2.0 * self.range
    }

    /// Vertices along one side of the grid
    pub fn verts_per_side(&self) -> usize {
        self.resolution as usize + 1
    }
}

/// Alpha for a vertex given its Chebyshev distance from the origin
///
/// Fully opaque up to `0.9 * range`, then linear down to 0 at `range`.
/// A degenerate range has no fade band: the origin is opaque and
/// everything else transparent.
pub fn edge_fade_alpha(distance: f32, range: f32) -> f32 {
    if range.is_nan() || range <= 0.0 {
        return if distance <= 0.0 { 1.0 } else { 0.0 };
    }

    let fade_start = range * FADE_START;
    if distance <= fade_start {
        return 1.0;
    }
    1.0 - ((distance - fade_start) / (range - fade_start)).clamp(0.0, 1.0)
}

/// Sample `field` over the grid and triangulate it
///
/// Every cell becomes two triangles `(a, b, c)` and `(c, b, d)` where `a` is
/// the cell's low corner, `b` is one step along z and `c` one step along x.
/// The winding makes upward normals for rising z-then-x order. Normals come
/// from the finished triangles.
pub fn generate_surface<H: HeightField + ?Sized>(field: &H, params: &SurfaceParams) -> Mesh {
    let res = params.resolution.max(1);
    // Negative or non-finite ranges collapse to a point
    let range = if params.range.is_finite() {
        params.range.max(0.0)
    } else {
        0.0
    };
    let params = SurfaceParams {
        resolution: res,
        range,
    };
    let side = params.verts_per_side();

    let mut mesh = Mesh::new();
    mesh.vertices.reserve(side * side);
    mesh.indices.reserve(res as usize * res as usize * 6);

    let mut degraded = 0usize;
    for iz in 0..=res {
        let z = params.grid_coordinate(iz);
        for ix in 0..=res {
            let x = params.grid_coordinate(ix);

            let raw = field.height(x, z);
            let y = if raw.is_finite() {
                raw.clamp(-range, range)
            } else {
                degraded += 1;
                0.0
            };

            let distance = x.abs().max(y.abs()).max(z.abs());
            let alpha = edge_fade_alpha(distance, range);
            let uv = Vec2::new(ix as f32 / res as f32, iz as f32 / res as f32);

            mesh.vertices.push(Vertex::new(
                Vec3::new(x, y, z),
                Vec3::ZERO,
                uv,
                Rgba::WHITE.with_alpha(alpha).to_array(),
            ));
        }
    }

    let side = side as u32;
    for iz in 0..res {
        for ix in 0..res {
            let a = ix + iz * side;
            let b = a + side;
            let c = a + 1;
            let d = a + side + 1;
            mesh.indices.extend_from_slice(&[a, b, c, c, b, d]);
        }
    }

    mesh.recalculate_normals();

    tracing::debug!(
        "Generated surface: {} vertices, {} triangles, {} non-finite samples",
        mesh.vertex_count(),
        mesh.triangle_count(),
        degraded
    );

    mesh
}
