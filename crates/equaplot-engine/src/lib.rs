//! Equaplot Engine - definitions in, geometry out, once per tick
//!
//! The [`Registry`] owns every plotted definition together with the global
//! render knobs and the animation clock. Editing layers call its setters at
//! any time; nothing is evaluated until [`Registry::tick`], which decides
//! per definition whether to regenerate, recolor, or leave it alone.
//!
//! ## Example
//!
//! ```ignore
//! use equaplot_engine::{Registry, Geometry};
//!
//! let mut registry = Registry::with_default_definitions();
//! let id = registry.add("sin(x)*cos(z)");
//!
//! registry.tick(1.0 / 60.0);
//!
//! if let Some(Geometry::Surface(mesh)) = registry.object(id).map(|o| &o.geometry) {
//!     println!("{} triangles", mesh.triangle_count());
//! }
//! ```

pub mod definition;
mod error;
pub mod registry;
pub mod settings;
pub mod sync;

pub use definition::{Definition, DefinitionId, Geometry, GeometryObject, Material, RenderMode};
pub use error::{RegistryError, Result};
pub use registry::{DEFAULT_DEFINITIONS, RefreshOutcome, Registry, TickReport};
pub use settings::Settings;
pub use sync::{DefinitionRecord, SyncSummary};

// Re-export commonly used types from dependencies
pub use equaplot_core::prelude::{
    AnimationClock, IndexWidth, Mesh, Polyline, RenderConfig, Rgba, Vec3,
};
pub use equaplot_script::{FormulaEngine, FormulaShape, ScriptError};
