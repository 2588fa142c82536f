//! Plain record view of the definition list
//!
//! A remote mirror or an editing layer exchanges the list as ordered
//! records. Framing and transport are the caller's concern.

use crate::definition::GeometryObject;
use crate::error::Result;
use crate::registry::Registry;
use equaplot_core::color::Rgba;
use serde::{Deserialize, Serialize};

/// One definition as exchanged with an editing layer or a remote mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionRecord {
    pub index: usize,
    /// Visibility
    pub active: bool,
    pub formula: String,
    pub color: Rgba,
}

/// What [`Registry::apply_records`] changed
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    /// Geometry objects of definitions the incoming list dropped
    pub released: Vec<GeometryObject>,
}

impl Registry {
    /// Snapshot the definition list in registry order
    pub fn records(&self) -> Vec<DefinitionRecord> {
        self.definitions()
            .iter()
            .map(|d| DefinitionRecord {
                index: d.index(),
                active: d.is_visible(),
                formula: d.formula().to_string(),
                color: d.color(),
            })
            .collect()
    }

    /// Reconcile the registry with an incoming list
    ///
    /// Records are matched to definitions by position after sorting on
    /// `index`. Only fields that differ are written, so an unchanged record
    /// does not trigger regeneration. Extra records are appended and
    /// definitions past the end of the list are removed.
    pub fn apply_records(&mut self, records: &[DefinitionRecord]) -> Result<SyncSummary> {
        let mut ordered: Vec<&DefinitionRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.index);

        let existing: Vec<_> = self.definitions().iter().map(|d| d.id()).collect();
        let mut summary = SyncSummary::default();

        for (position, record) in ordered.iter().enumerate() {
            let Some(&id) = existing.get(position) else {
                let id = self.add_with_color(record.formula.clone(), record.color);
                self.set_visible(id, record.active)?;
                summary.added += 1;
                continue;
            };

            let Some(current) = self.get(id) else {
                continue;
            };
            let formula_differs = current.formula() != record.formula;
            let color_differs = current.color() != record.color.clamped();
            let visibility_differs = current.is_visible() != record.active;

            if formula_differs {
                self.set_formula(id, record.formula.clone())?;
            }
            if color_differs {
                self.set_color(id, record.color)?;
            }
            if visibility_differs {
                self.set_visible(id, record.active)?;
            }
            if formula_differs || color_differs || visibility_differs {
                summary.updated += 1;
            }
        }

        for &id in existing.iter().skip(ordered.len()) {
            if let Some(object) = self.remove(id)? {
                summary.released.push(object);
            }
        }

        tracing::debug!(
            "Applied {} records: {} added, {} updated, {} released",
            records.len(),
            summary.added,
            summary.updated,
            summary.released.len()
        );

        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::registry::RefreshOutcome;

    fn record(index: usize, formula: &str) -> DefinitionRecord {
        DefinitionRecord {
            index,
            active: true,
            formula: formula.to_string(),
            color: Rgba::DEFINITION_DEFAULT,
        }
    }

    #[test]
    fn test_records_follow_registry_order() {
        let registry = Registry::with_default_definitions();
        let records = registry.records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index, 0);
        assert_eq!(records[0].formula, "(x/2)^2-(z/2)^2");
        assert_eq!(records[1].index, 1);
        assert!(records[1].active);
    }

    #[test]
    fn test_apply_adds_updates_and_removes() {
        let mut registry = Registry::new();
        let a = registry.add("x");
        registry.add("z");
        registry.add("x+z");
        registry.set_resolution(10);
        registry.tick(0.016);

        let incoming = vec![record(1, "t;0;0"), record(0, "x")];
        let summary = registry.apply_records(&incoming).unwrap();

        assert_eq!(summary.added, 0);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.released.len(), 1);
        assert_eq!(registry.len(), 2);

        let report = registry.tick(0.016);
        assert_eq!(report.outcome(a), Some(&RefreshOutcome::Unchanged));
        assert!(registry.definitions()[1].is_parametric());
    }

    #[test]
    fn test_apply_appends_new_records() {
        let mut registry = Registry::new();
        let mut hidden = record(0, "sin(x)");
        hidden.active = false;

        let summary = registry.apply_records(&[hidden.clone()]).unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(registry.records(), vec![hidden]);
    }

    #[test]
    fn test_records_round_trip_through_json() {
        let registry = Registry::with_default_definitions();
        let json = serde_json::to_string(&registry.records()).unwrap();
        let decoded: Vec<DefinitionRecord> = serde_json::from_str(&json).unwrap();

        let mut mirror = Registry::new();
        mirror.apply_records(&decoded).unwrap();
        assert_eq!(mirror.records(), registry.records());
    }
}
