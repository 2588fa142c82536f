//! # Equaplot Core
//!
//! Geometry generation for user-authored formulas.
//!
//! Two kinds of plots are supported:
//!
//! - **Surfaces**: height fields `y = f(x, z)` sampled on a square grid and
//!   triangulated into a [`Mesh`](mesh::Mesh) whose vertices fade out near
//!   the edge of the plotting domain.
//! - **Curves**: parametric paths `(x(t), y(t), z(t))` sampled over a
//!   parameter range, clipped exactly against the plotting cube, and reduced
//!   to a single [`Polyline`](curve::Polyline).
//!
//! This crate knows nothing about formula text. Generators sample through the
//! [`HeightField`](surface::HeightField) and
//! [`ParametricPath`](curve::ParametricPath) traits, which `equaplot-script`
//! implements for compiled formulas.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use equaplot_core::prelude::*;
//!
//! let config = RenderConfig::default();
//! let saddle = |x: f32, z: f32| (x / 2.0).powi(2) - (z / 2.0).powi(2);
//! let mesh = generate_surface(&saddle, &config.surface_params(IndexWidth::U32));
//! mesh.export_obj("saddle.obj")?;
//! ```
//!
//! ## Conventions
//!
//! - **Coordinate system**: Right-handed, Y-up. Surfaces are `y = f(x, z)`.
//! - **Precision**: Geometry is `f32`; evaluation may use wider types.
//! - **Domain**: Every axis spans `[-range, range]`.

pub mod bounds;
pub mod color;
pub mod config;
pub mod curve;
pub mod export;
pub mod mesh;
pub mod surface;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bounds::Aabb;
    pub use crate::color::Rgba;
    pub use crate::config::{AnimationClock, Clamped, IndexWidth, RenderConfig};
    pub use crate::curve::{CurveParams, ParametricPath, Polyline, generate_curve};
    pub use crate::export::MeshExport;
    pub use crate::mesh::{Mesh, Vertex};
    pub use crate::surface::{HeightField, SurfaceParams, generate_surface};

    // Math (re-export glam)
    pub use glam::{Vec2, Vec3};

    // Error handling
    pub use crate::{Error, Result};
}
