//! Plotted definitions and the geometry objects they own

use equaplot_core::color::Rgba;
use equaplot_core::curve::Polyline;
use equaplot_core::mesh::Mesh;
use equaplot_script::{CompiledShape, ScriptError};
use std::fmt;

/// Stable identity of a definition, unaffected by reordering or removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(pub(crate) u64);

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the presentation layer should draw a geometry object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Surface,
    Line,
}

/// Color and draw mode bound to a geometry object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgba,
    pub mode: RenderMode,
}

/// Generated geometry
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Geometry {
    /// Nothing generated yet, or the formula never classified
    #[default]
    Empty,
    Surface(Mesh),
    Curve(Polyline),
}

impl Geometry {
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Self::Surface(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_polyline(&self) -> Option<&Polyline> {
        match self {
            Self::Curve(polyline) => Some(polyline),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Surface(mesh) => mesh.is_empty(),
            Self::Curve(polyline) => polyline.is_empty(),
        }
    }
}

/// The renderable handle a definition owns once it has been ticked
///
/// It is created on the first tick and then mutated in place. `revision`
/// and `material_revision` increase whenever the geometry or the material
/// binding is refreshed, so a presentation layer can upload only what
/// changed.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryObject {
    pub geometry: Geometry,
    pub material: Material,
    pub shown: bool,
    pub revision: u64,
    pub material_revision: u64,
}

impl GeometryObject {
    pub(crate) fn new(color: Rgba, shown: bool) -> Self {
        Self {
            geometry: Geometry::Empty,
            material: Material {
                color,
                mode: RenderMode::Surface,
            },
            shown,
            revision: 0,
            material_revision: 0,
        }
    }
}

/// One user formula with its color, visibility and generated geometry
#[derive(Debug, Clone)]
pub struct Definition {
    pub(crate) id: DefinitionId,
    pub(crate) index: usize,
    pub(crate) formula: String,
    pub(crate) color: Rgba,
    pub(crate) visible: bool,

    // Bumped on every external write
    pub(crate) formula_version: u64,
    pub(crate) color_version: u64,

    // What the last tick consumed
    pub(crate) applied_formula_version: Option<u64>,
    pub(crate) applied_color_version: Option<u64>,
    pub(crate) applied_config_version: Option<u64>,

    pub(crate) shape: Option<std::result::Result<CompiledShape, ScriptError>>,
    pub(crate) object: Option<GeometryObject>,
}

impl Definition {
    pub(crate) fn new(id: DefinitionId, index: usize, formula: String, color: Rgba) -> Self {
        Self {
            id,
            index,
            formula,
            color: color.clamped(),
            visible: true,
            formula_version: 0,
            color_version: 0,
            applied_formula_version: None,
            applied_color_version: None,
            applied_config_version: None,
            shape: None,
            object: None,
        }
    }

    pub fn id(&self) -> DefinitionId {
        self.id
    }

    /// Position in the registry, contiguous from 0
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Geometry object, present once the definition has been ticked
    pub fn object(&self) -> Option<&GeometryObject> {
        self.object.as_ref()
    }

    /// Classification of the formula as of the last tick
    pub fn shape(&self) -> Option<&std::result::Result<CompiledShape, ScriptError>> {
        self.shape.as_ref()
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self.shape, Some(Ok(CompiledShape::Parametric(_))))
    }

    pub(crate) fn formula_changed(&self) -> bool {
        self.applied_formula_version != Some(self.formula_version)
    }

    pub(crate) fn color_changed(&self) -> bool {
        self.applied_color_version != Some(self.color_version)
    }
}
