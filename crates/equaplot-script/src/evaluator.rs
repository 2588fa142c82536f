//! Rhai-backed formula evaluation with per-sample failure isolation
//!
//! A formula is compiled once and then evaluated many thousands of times per
//! generation pass. Any sample that cannot produce a finite number evaluates
//! to exactly 0, so one singular point or one typo never aborts a pass; the
//! worst case is flat or degenerate geometry.

use crate::error::{EvaluationFailure, PreprocessWarning};
use crate::formula::FormulaShape;
use crate::math_api::register_math_api;
use crate::preprocess::{Preprocessed, preprocess};
use equaplot_core::curve::ParametricPath;
use equaplot_core::surface::HeightField;
use glam::Vec3;
use rhai::{AST, Dynamic, Engine, FLOAT, Scope};
use std::cell::Cell;

/// Value substituted for any sample that fails
pub const FALLBACK_VALUE: f64 = 0.0;

/// Variable values for one sample
///
/// Surfaces bind `x`, `z` and `t`; curve components bind only `t`. `time`
/// always mirrors `t`, and `pi` and `e` are always present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bindings {
    pub x: Option<f64>,
    pub z: Option<f64>,
    pub t: f64,
}

impl Bindings {
    pub fn surface(x: f64, z: f64, t: f64) -> Self {
        Self {
            x: Some(x),
            z: Some(z),
            t,
        }
    }

    pub fn curve(t: f64) -> Self {
        Self { x: None, z: None, t }
    }

    fn to_scope(self) -> Scope<'static> {
        let mut scope = Scope::new();
        scope.push_constant("pi", std::f64::consts::PI as FLOAT);
        scope.push_constant("e", std::f64::consts::E as FLOAT);
        if let Some(x) = self.x {
            scope.push("x", x as FLOAT);
        }
        if let Some(z) = self.z {
            scope.push("z", z as FLOAT);
        }
        scope.push("t", self.t as FLOAT);
        scope.push("time", self.t as FLOAT);
        scope
    }
}

/// Canonical formula text and its compiled form
///
/// Compilation failures are kept rather than returned so that the formula
/// still evaluates, to the fallback value, at every sample.
#[derive(Debug, Clone)]
pub struct CompiledFormula {
    canonical: String,
    warnings: Vec<PreprocessWarning>,
    ast: std::result::Result<AST, EvaluationFailure>,
}

impl CompiledFormula {
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    pub fn warnings(&self) -> &[PreprocessWarning] {
        &self.warnings
    }

    /// The parse error, if the canonical text did not compile
    pub fn parse_error(&self) -> Option<&EvaluationFailure> {
        self.ast.as_ref().err()
    }
}

/// A classified formula ready for sampling
#[derive(Debug, Clone)]
pub enum CompiledShape {
    Surface(CompiledFormula),
    Parametric([CompiledFormula; 3]),
}

/// Formula evaluator
pub struct FormulaEngine {
    engine: Engine,
}

impl FormulaEngine {
    /// Create an engine with the formula math library registered
    pub fn new() -> Self {
        let mut engine = Engine::new();

        register_math_api(&mut engine);

        // Formulas are single expressions, keep nesting bounded
        engine.set_max_expr_depths(64, 64);

        Self { engine }
    }

    /// Preprocess and compile raw formula text
    pub fn compile(&self, raw: &str) -> CompiledFormula {
        self.compile_preprocessed(&preprocess(raw))
    }

    /// Compile text that has already been preprocessed
    pub fn compile_preprocessed(&self, preprocessed: &Preprocessed) -> CompiledFormula {
        let source = promote_integer_literals(&preprocessed.canonical);
        let ast = self
            .engine
            .compile_expression(&source)
            .map_err(|e| EvaluationFailure::Parse(e.to_string()));

        if let Err(e) = &ast {
            tracing::debug!("Formula '{}' did not compile: {}", preprocessed.canonical, e);
        }

        CompiledFormula {
            canonical: preprocessed.canonical.clone(),
            warnings: preprocessed.warnings.clone(),
            ast,
        }
    }

    /// Compile every component of a classified formula
    pub fn compile_shape(&self, shape: &FormulaShape) -> CompiledShape {
        match shape {
            FormulaShape::Surface { expr } => CompiledShape::Surface(self.compile_preprocessed(expr)),
            FormulaShape::Parametric { x, y, z } => CompiledShape::Parametric([
                self.compile_preprocessed(x),
                self.compile_preprocessed(y),
                self.compile_preprocessed(z),
            ]),
        }
    }

    /// Evaluate one sample, reporting why it failed
    pub fn try_evaluate(
        &self,
        formula: &CompiledFormula,
        bindings: Bindings,
    ) -> std::result::Result<f64, EvaluationFailure> {
        let ast = formula.ast.as_ref().map_err(Clone::clone)?;
        let mut scope = bindings.to_scope();

        let result: Dynamic = self
            .engine
            .eval_ast_with_scope(&mut scope, ast)
            .map_err(|e| EvaluationFailure::Runtime(e.to_string()))?;

        let value = if let Ok(v) = result.as_float() {
            v
        } else if let Ok(i) = result.as_int() {
            i as f64
        } else {
            return Err(EvaluationFailure::NotNumeric(result.type_name().to_string()));
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvaluationFailure::NonFinite(value))
        }
    }

    /// Evaluate one sample, substituting 0 for any failure
    pub fn evaluate(&self, formula: &CompiledFormula, bindings: Bindings) -> f64 {
        self.try_evaluate(formula, bindings)
            .unwrap_or(FALLBACK_VALUE)
    }

    /// View a compiled formula as a height field at animation time `time`
    pub fn surface<'a>(&'a self, formula: &'a CompiledFormula, time: f32) -> SurfaceFormula<'a> {
        SurfaceFormula {
            engine: self,
            formula,
            time: f64::from(time),
            failures: Cell::new(0),
        }
    }

    /// View three compiled components as a parametric path
    pub fn parametric<'a>(&'a self, components: &'a [CompiledFormula; 3]) -> ParametricFormula<'a> {
        ParametricFormula {
            engine: self,
            components,
            failures: Cell::new(0),
        }
    }
}

impl Default for FormulaEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// A compiled surface formula bound to an engine and a clock reading
pub struct SurfaceFormula<'a> {
    engine: &'a FormulaEngine,
    formula: &'a CompiledFormula,
    time: f64,
    failures: Cell<usize>,
}

impl SurfaceFormula<'_> {
    /// Samples that fell back to 0 so far
    pub fn failures(&self) -> usize {
        self.failures.get()
    }
}

impl HeightField for SurfaceFormula<'_> {
    fn height(&self, x: f32, z: f32) -> f32 {
        let bindings = Bindings::surface(f64::from(x), f64::from(z), self.time);
        match self.engine.try_evaluate(self.formula, bindings) {
            Ok(y) => y as f32,
            Err(_) => {
                self.failures.set(self.failures.get() + 1);
                FALLBACK_VALUE as f32
            }
        }
    }
}

/// Three compiled components bound to an engine
pub struct ParametricFormula<'a> {
    engine: &'a FormulaEngine,
    components: &'a [CompiledFormula; 3],
    failures: Cell<usize>,
}

impl ParametricFormula<'_> {
    /// Component evaluations that fell back to 0 so far
    pub fn failures(&self) -> usize {
        self.failures.get()
    }

    fn component(&self, index: usize, t: f64) -> f32 {
        match self
            .engine
            .try_evaluate(&self.components[index], Bindings::curve(t))
        {
            Ok(v) => v as f32,
            Err(_) => {
                self.failures.set(self.failures.get() + 1);
                FALLBACK_VALUE as f32
            }
        }
    }
}

impl ParametricPath for ParametricFormula<'_> {
    fn point(&self, t: f32) -> Vec3 {
        let t = f64::from(t);
        Vec3::new(
            self.component(0, t),
            self.component(1, t),
            self.component(2, t),
        )
    }
}

/// Rewrite integer literals as float literals
///
/// Formulas follow calculator arithmetic, where `1/2` is `0.5`. Digits that
/// belong to an identifier such as `x2` are left alone.
fn promote_integer_literals(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let in_identifier = i > 0 && (chars[i - 1].is_ascii_alphanumeric() || chars[i - 1] == '_');
        let leading_dot = c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());

        if in_identifier || !(c.is_ascii_digit() || leading_dot) {
            out.push(c);
            i += 1;
            continue;
        }

        let start = i;
        let mut is_float = false;
        if leading_dot {
            is_float = true;
            i += 1;
        }
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if !is_float
            && chars.get(i) == Some(&'.')
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit())
        {
            is_float = true;
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
        }

        if leading_dot {
            out.push('0');
        }
        out.extend(&chars[start..i]);
        if !is_float {
            out.push_str(".0");
        }
    }

    out
}
