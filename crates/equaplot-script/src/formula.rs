//! Formula classification
//!
//! A formula without a separator is a surface `y = f(x, z)`. A formula with
//! separators is a parametric curve and must have exactly three components,
//! `x(t); y(t); z(t)`. Each component is normalized on its own.

use crate::error::{Result, ScriptError};
use crate::preprocess::{Preprocessed, preprocess};

/// Separates the components of a parametric formula
pub const COMPONENT_SEPARATOR: char = ';';

/// A formula sorted into the generator that will sample it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaShape {
    /// Height over the xz plane
    Surface { expr: Preprocessed },
    /// Curve swept by `t`
    Parametric {
        x: Preprocessed,
        y: Preprocessed,
        z: Preprocessed,
    },
}

impl FormulaShape {
    /// Classify and normalize raw formula text
    ///
    /// Returns [`ScriptError::InvalidDefinition`] when a separator is present
    /// but the formula does not split into three components.
    pub fn classify(raw: &str) -> Result<Self> {
        if !raw.contains(COMPONENT_SEPARATOR) {
            return Ok(Self::Surface {
                expr: preprocess(raw),
            });
        }

        let parts: Vec<&str> = raw.split(COMPONENT_SEPARATOR).collect();
        match parts.as_slice() {
            [x, y, z] => Ok(Self::Parametric {
                x: preprocess(x),
                y: preprocess(y),
                z: preprocess(z),
            }),
            _ => Err(ScriptError::InvalidDefinition {
                components: parts.len(),
            }),
        }
    }

    pub fn is_surface(&self) -> bool {
        matches!(self, Self::Surface { .. })
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, Self::Parametric { .. })
    }

    /// Canonical text, with components joined by the separator
    pub fn canonical(&self) -> String {
        match self {
            Self::Surface { expr } => expr.canonical.clone(),
            Self::Parametric { x, y, z } => {
                format!("{};{};{}", x.canonical, y.canonical, z.canonical)
            }
        }
    }

    /// Warnings from every component
    pub fn warnings(&self) -> Vec<crate::error::PreprocessWarning> {
        match self {
            Self::Surface { expr } => expr.warnings.clone(),
            Self::Parametric { x, y, z } => [x, y, z]
                .into_iter()
                .flat_map(|p| p.warnings.iter().cloned())
                .collect(),
        }
    }
}
