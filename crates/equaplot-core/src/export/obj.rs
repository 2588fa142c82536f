//! OBJ file export

use crate::Result;
use crate::curve::Polyline;
use crate::mesh::Mesh;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a mesh in OBJ format
///
/// Vertex colors use the common `v x y z r g b` extension; alpha is dropped
/// since OBJ has no slot for it.
pub fn write_mesh_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    // Header
    writeln!(writer, "# Equaplot OBJ Export")?;
    writeln!(writer, "# Vertices: {}", mesh.vertex_count())?;
    writeln!(writer, "# Triangles: {}", mesh.triangle_count())?;
    writeln!(writer)?;

    for v in &mesh.vertices {
        let [x, y, z] = v.position;
        let [r, g, b, _] = v.color;
        writeln!(writer, "v {x} {y} {z} {r} {g} {b}")?;
    }
    writeln!(writer)?;

    for v in &mesh.vertices {
        writeln!(writer, "vt {} {}", v.uv[0], v.uv[1])?;
    }
    writeln!(writer)?;

    for v in &mesh.vertices {
        writeln!(writer, "vn {} {} {}", v.normal[0], v.normal[1], v.normal[2])?;
    }
    writeln!(writer)?;

    // Faces (OBJ uses 1-based indexing)
    for tri in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        writeln!(writer, "f {i0}/{i0}/{i0} {i1}/{i1}/{i1} {i2}/{i2}/{i2}")?;
    }

    Ok(())
}

/// Write a polyline as a single OBJ line element
pub fn write_polyline_obj<W: Write>(polyline: &Polyline, writer: &mut W) -> Result<()> {
    writeln!(writer, "# Equaplot OBJ Export")?;
    writeln!(writer, "# Points: {}", polyline.len())?;
    writeln!(writer, "# Width: {}", polyline.width)?;
    writeln!(writer)?;

    for p in &polyline.points {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    if polyline.len() >= 2 {
        write!(writer, "l")?;
        for i in 1..=polyline.len() {
            write!(writer, " {i}")?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// Export a mesh to an OBJ file
pub fn export_obj(mesh: &Mesh, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_mesh_obj(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Export a polyline to an OBJ file
pub fn export_polyline_obj(polyline: &Polyline, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_polyline_obj(polyline, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::surface::{SurfaceParams, generate_surface};
    use glam::Vec3;

    #[test]
    fn test_mesh_obj_counts() {
        let params = SurfaceParams {
            resolution: 10,
            range: 1.0,
        };
        let mesh = generate_surface(&|x: f32, z: f32| x * z, &params);
        let mut out = Vec::new();
        write_mesh_obj(&mesh, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 121);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 200);
        assert!(text.contains("f 1/1/1 12/12/12 2/2/2"));
    }

    #[test]
    fn test_polyline_obj() {
        let polyline = Polyline::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], 0.5);
        let mut out = Vec::new();
        write_polyline_obj(&polyline, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 3);
        assert!(text.lines().any(|l| l == "l 1 2 3"));
    }

    #[test]
    fn test_empty_polyline_has_no_line_element() {
        let mut out = Vec::new();
        write_polyline_obj(&Polyline::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.lines().any(|l| l.starts_with('l')));
    }
}
