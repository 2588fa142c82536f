//! Equaplot Script - formula text to numbers
//!
//! Turns what a user types into something the geometry generators can
//! sample:
//!
//! 1. [`preprocess`] normalizes the text: lowercase, no whitespace, `^`
//!    rewritten to `pow(a,b)`, implicit multiplication made explicit.
//! 2. [`FormulaEngine`] compiles the canonical text with Rhai and evaluates
//!    it per sample. A sample that fails to parse, errors at runtime, or
//!    produces a non-finite value evaluates to 0 instead of failing.
//! 3. [`FormulaShape::classify`] decides whether a formula is a surface
//!    `y = f(x, z)` or a parametric curve `x(t); y(t); z(t)`.
//!
//! ## Example
//!
//! ```ignore
//! use equaplot_core::prelude::*;
//! use equaplot_script::{CompiledShape, FormulaEngine, FormulaShape};
//!
//! let engine = FormulaEngine::new();
//! let shape = FormulaShape::classify("(x/2)^2 - (z/2)^2")?;
//! let CompiledShape::Surface(formula) = engine.compile_shape(&shape) else {
//!     unreachable!()
//! };
//! let surface = engine.surface(&formula, 0.0);
//! let mesh = generate_surface(&surface, &RenderConfig::default().surface_params(IndexWidth::U32));
//! ```
//!
//! ## Variables
//!
//! Surfaces see `x`, `z`, `t` and `time` (the animation clock). Curve
//! components see `t` and `time` (the swept parameter). `pi` and `e` are
//! always bound.

pub mod error;
pub mod evaluator;
pub mod formula;
pub mod math_api;
pub mod preprocess;

pub use error::{EvaluationFailure, PreprocessWarning, Result, ScriptError};
pub use evaluator::{
    Bindings, CompiledFormula, CompiledShape, FALLBACK_VALUE, FormulaEngine, ParametricFormula,
    SurfaceFormula,
};
pub use formula::{COMPONENT_SEPARATOR, FormulaShape};
pub use math_api::register_math_api;
pub use preprocess::{Preprocessed, preprocess};
