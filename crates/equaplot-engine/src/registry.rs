//! Owned definition registry and per-tick regeneration
//!
//! External edits only write plain fields and bump version counters. All
//! classification and generation happens in [`Registry::tick`], which
//! compares those counters against what the previous tick consumed:
//!
//! - a definition without a geometry object gets one and is generated
//! - a formula change reclassifies and regenerates
//! - a config change, or animation being on, regenerates every visible
//!   definition; hidden ones catch up when shown again
//! - a color change alone only rebinds the material
//! - a visibility change only flips `shown`
//!
//! A formula that does not classify keeps its previous geometry.

use crate::definition::{Definition, DefinitionId, Geometry, GeometryObject, Material, RenderMode};
use crate::error::{RegistryError, Result};
use crate::settings::Settings;
use equaplot_core::color::Rgba;
use equaplot_core::config::{AnimationClock, IndexWidth, RenderConfig};
use equaplot_core::curve::generate_curve;
use equaplot_core::surface::generate_surface;
use equaplot_script::{CompiledShape, FormulaEngine, FormulaShape, ScriptError};

/// The scene a fresh session starts with
pub const DEFAULT_DEFINITIONS: [(&str, Rgba); 2] = [
    ("(x/2)^2-(z/2)^2", Rgba::new(0.0, 0.8, 1.0, 0.8)),
    ("t*sin(t*5);t;t*cos(t*5)", Rgba::new(1.0, 0.5, 0.0, 1.0)),
];

/// What a tick did to one definition
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Nothing to do
    Unchanged,
    /// Geometry rebuilt and material rebound
    Regenerated,
    /// Only the material color was rebound
    Recolored,
    /// The formula did not classify; previous geometry kept
    Invalid(ScriptError),
}

/// Summary of one [`Registry::tick`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Animation clock reading used for this tick
    pub elapsed: f32,
    /// One entry per definition, in registry order
    pub outcomes: Vec<(DefinitionId, RefreshOutcome)>,
    /// Definitions whose `shown` flag flipped
    pub visibility_changes: usize,
}

impl TickReport {
    pub fn outcome(&self, id: DefinitionId) -> Option<&RefreshOutcome> {
        self.outcomes
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, outcome)| outcome)
    }

    pub fn regenerated(&self) -> usize {
        self.count(|o| matches!(o, RefreshOutcome::Regenerated))
    }

    pub fn recolored(&self) -> usize {
        self.count(|o| matches!(o, RefreshOutcome::Recolored))
    }

    pub fn invalid(&self) -> usize {
        self.count(|o| matches!(o, RefreshOutcome::Invalid(_)))
    }

    fn count(&self, predicate: impl Fn(&RefreshOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| predicate(o)).count()
    }
}

/// Owns every definition, the global render config and the animation clock
pub struct Registry {
    formulas: FormulaEngine,
    config: RenderConfig,
    config_version: u64,
    index_width: IndexWidth,
    clock: AnimationClock,
    definitions: Vec<Definition>,
    next_id: u64,
}

impl Registry {
    /// Create an empty registry with default settings
    pub fn new() -> Self {
        Self::from_settings(&Settings::default())
    }

    /// Create an empty registry from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            formulas: FormulaEngine::new(),
            config: settings.render.sanitized(),
            config_version: 0,
            index_width: settings.index_width,
            clock: AnimationClock::new(),
            definitions: Vec::new(),
            next_id: 0,
        }
    }

    /// Create a registry seeded with the default scene
    pub fn with_default_definitions() -> Self {
        let mut registry = Self::new();
        for (formula, color) in DEFAULT_DEFINITIONS {
            registry.add_with_color(formula, color);
        }
        registry
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn index_width(&self) -> IndexWidth {
        self.index_width
    }

    /// Definitions in registry order
    pub fn definitions(&self) -> &[Definition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, id: DefinitionId) -> Option<&Definition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Geometry object of a definition, once it has been ticked
    pub fn object(&self, id: DefinitionId) -> Option<&GeometryObject> {
        self.get(id).and_then(Definition::object)
    }

    fn definition_mut(&mut self, id: DefinitionId) -> Result<&mut Definition> {
        self.definitions
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(RegistryError::UnknownDefinition(id))
    }

    // ========================================================================
    // Definition edits
    // ========================================================================

    /// Append a definition with the default color
    pub fn add(&mut self, formula: impl Into<String>) -> DefinitionId {
        self.add_with_color(formula, Rgba::DEFINITION_DEFAULT)
    }

    /// Append a definition; it is generated on the next tick
    pub fn add_with_color(&mut self, formula: impl Into<String>, color: Rgba) -> DefinitionId {
        let id = DefinitionId(self.next_id);
        self.next_id += 1;

        let index = self.definitions.len();
        self.definitions
            .push(Definition::new(id, index, formula.into(), color));

        tracing::debug!("Added definition {} at index {}", id, index);
        id
    }

    pub fn set_formula(&mut self, id: DefinitionId, formula: impl Into<String>) -> Result<()> {
        let definition = self.definition_mut(id)?;
        definition.formula = formula.into();
        definition.formula_version += 1;
        Ok(())
    }

    pub fn set_color(&mut self, id: DefinitionId, color: Rgba) -> Result<()> {
        let definition = self.definition_mut(id)?;
        definition.color = color.clamped();
        definition.color_version += 1;
        Ok(())
    }

    pub fn set_visible(&mut self, id: DefinitionId, visible: bool) -> Result<()> {
        self.definition_mut(id)?.visible = visible;
        Ok(())
    }

    /// Remove a definition, releasing its geometry object
    ///
    /// Remaining definitions are re-indexed contiguously.
    pub fn remove(&mut self, id: DefinitionId) -> Result<Option<GeometryObject>> {
        let position = self
            .definitions
            .iter()
            .position(|d| d.id == id)
            .ok_or(RegistryError::UnknownDefinition(id))?;

        let removed = self.definitions.remove(position);
        for (index, definition) in self.definitions.iter_mut().enumerate().skip(position) {
            definition.index = index;
        }

        tracing::debug!("Removed definition {}", id);
        Ok(removed.object)
    }

    // ========================================================================
    // Global knobs
    // ========================================================================

    pub fn set_resolution(&mut self, resolution: u32) {
        self.config.resolution = resolution;
        self.config_changed();
    }

    pub fn set_range(&mut self, range: f32) {
        self.config.range = range;
        self.config_changed();
    }

    pub fn set_line_width(&mut self, line_width: f32) {
        self.config.line_width = line_width;
        self.config_changed();
    }

    /// Replace every knob at once
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
        self.config_changed();
    }

    /// Change the index format surfaces must fit
    pub fn set_index_width(&mut self, index_width: IndexWidth) {
        self.index_width = index_width;
        self.config_changed();
    }

    // Animation is checked every tick, no version bump needed
    pub fn set_animate(&mut self, animate: bool) {
        self.config.animate = animate;
    }

    pub fn set_animation_speed(&mut self, speed: f32) {
        self.config.animation_speed = speed;
        self.config = self.config.sanitized();
    }

    fn config_changed(&mut self) {
        self.config = self.config.sanitized();
        self.config_version += 1;
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the clock by `dt` seconds and bring every definition up to date
    pub fn tick(&mut self, dt: f32) -> TickReport {
        self.clock.advance(dt, &self.config);

        let pass = Pass {
            formulas: &self.formulas,
            config: &self.config,
            config_version: self.config_version,
            index_width: self.index_width,
            clock: &self.clock,
        };

        let mut report = TickReport {
            elapsed: self.clock.elapsed(),
            ..TickReport::default()
        };

        for definition in &mut self.definitions {
            let (outcome, toggled) = pass.refresh(definition);
            if toggled {
                report.visibility_changes += 1;
            }
            report.outcomes.push((definition.id, outcome));
        }

        tracing::debug!(
            "Tick at t={:.3}: {} regenerated, {} recolored, {} invalid",
            report.elapsed,
            report.regenerated(),
            report.recolored(),
            report.invalid()
        );

        report
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared by every definition during one tick
struct Pass<'a> {
    formulas: &'a FormulaEngine,
    config: &'a RenderConfig,
    config_version: u64,
    index_width: IndexWidth,
    clock: &'a AnimationClock,
}

impl Pass<'_> {
    fn refresh(&self, definition: &mut Definition) -> (RefreshOutcome, bool) {
        let created = definition.object.is_none();
        let formula_changed = definition.formula_changed();
        let color_changed = definition.color_changed();

        if formula_changed || definition.shape.is_none() {
            definition.shape = Some(self.classify(definition));
        }

        let global_dirty =
            self.config.animate || definition.applied_config_version != Some(self.config_version);
        // A definition hidden since creation is generated when first shown
        let regenerate = if created {
            definition.visible
        } else {
            formula_changed || (definition.visible && global_dirty)
        };
        // A fresh object already carries the current color
        let color_changed = color_changed && !created;

        let generated = match (&definition.shape, regenerate) {
            (Some(Ok(shape)), true) => Some(self.generate(definition.id, shape)),
            _ => None,
        };
        let invalid = match &definition.shape {
            Some(Err(e)) => Some(e.clone()),
            _ => None,
        };

        let color = definition.color;
        let visible = definition.visible;
        let object = definition
            .object
            .get_or_insert_with(|| GeometryObject::new(color, visible));

        let toggled = object.shown != visible;
        object.shown = visible;

        let outcome = if let Some((geometry, mode)) = generated {
            object.geometry = geometry;
            object.revision += 1;
            object.material = Material { color, mode };
            object.material_revision += 1;
            definition.applied_config_version = Some(self.config_version);
            RefreshOutcome::Regenerated
        } else {
            if color_changed {
                object.material.color = color;
                object.material_revision += 1;
            }
            match invalid {
                Some(e) if regenerate => {
                    definition.applied_config_version = Some(self.config_version);
                    RefreshOutcome::Invalid(e)
                }
                _ if color_changed => RefreshOutcome::Recolored,
                _ => RefreshOutcome::Unchanged,
            }
        };

        definition.applied_formula_version = Some(definition.formula_version);
        definition.applied_color_version = Some(definition.color_version);

        (outcome, toggled)
    }

    fn classify(&self, definition: &Definition) -> std::result::Result<CompiledShape, ScriptError> {
        match FormulaShape::classify(&definition.formula) {
            Ok(shape) => {
                for warning in shape.warnings() {
                    tracing::warn!("Definition {}: {}", definition.id, warning);
                }
                Ok(self.formulas.compile_shape(&shape))
            }
            Err(e) => {
                tracing::warn!("Definition {} keeps its previous geometry: {}", definition.id, e);
                Err(e)
            }
        }
    }

    fn generate(&self, id: DefinitionId, shape: &CompiledShape) -> (Geometry, RenderMode) {
        match shape {
            CompiledShape::Surface(formula) => {
                let field = self.formulas.surface(formula, self.clock.elapsed());
                let mesh = generate_surface(&field, &self.config.surface_params(self.index_width));
                tracing::debug!(
                    "Definition {}: surface with {} vertices, {} samples fell back to 0",
                    id,
                    mesh.vertex_count(),
                    field.failures()
                );
                (Geometry::Surface(mesh), RenderMode::Surface)
            }
            CompiledShape::Parametric(components) => {
                let path = self.formulas.parametric(components);
                let polyline = generate_curve(&path, &self.config.curve_params(self.clock));
                tracing::debug!(
                    "Definition {}: curve with {} points, {} samples fell back to 0",
                    id,
                    polyline.len(),
                    path.failures()
                );
                (Geometry::Curve(polyline), RenderMode::Line)
            }
        }
    }
}
