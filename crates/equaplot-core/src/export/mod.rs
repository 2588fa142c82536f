//! Export functionality for generated geometry

mod obj;

use crate::Result;
use crate::curve::Polyline;
use crate::mesh::Mesh;
use std::path::Path;

pub use obj::{export_obj, export_polyline_obj, write_mesh_obj, write_polyline_obj};

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Obj,
}

impl ExportFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "obj" => Some(Self::Obj),
            _ => None,
        }
    }
}

/// Extension trait for exporting generated geometry
pub trait MeshExport {
    /// Export to file, auto-detecting format from extension
    fn export<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match ExportFormat::from_extension(path) {
            Some(ExportFormat::Obj) => self.export_obj(path),
            None => Err(crate::Error::Export(format!(
                "Unknown file extension: {}",
                path.display()
            ))),
        }
    }

    /// Export to OBJ format
    fn export_obj<P: AsRef<Path>>(&self, path: P) -> Result<()>;
}

impl MeshExport for Mesh {
    fn export_obj<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        export_obj(self, path.as_ref())
    }
}

impl MeshExport for Polyline {
    fn export_obj<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        export_polyline_obj(self, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ExportFormat::from_extension(Path::new("plot.obj")),
            Some(ExportFormat::Obj)
        );
        assert!(ExportFormat::from_extension(Path::new("plot.stl")).is_none());
    }

    #[test]
    fn test_unknown_extension_is_an_error() {
        let result = Mesh::new().export("plot.xyz");
        assert!(matches!(result, Err(crate::Error::Export(_))));
    }
}
