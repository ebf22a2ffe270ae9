//! glTF format support.
//!
//! Loads every triangle primitive of every mesh in a glTF or GLB file into a
//! single [`UvMesh`], reading texture coordinate set 0. Saving is not
//! supported.

use std::path::Path;

use nalgebra::{Point2, Point3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, UvMesh};

/// Load a mesh from a glTF or GLB file.
///
/// Primitives without texture coordinates get the UV `(0, 0)` for every
/// vertex. Point and line primitives are skipped.
///
/// # Example
///
/// ```no_run
/// use uvmorph::io::gltf;
///
/// let mesh = gltf::load("model.glb").unwrap();
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<UvMesh> {
    let path = path.as_ref();

    let (document, buffers, _images) = ::gltf::import(path).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut uvs: Vec<Point2<f64>> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for mesh in document.meshes() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let offset = positions.len();

            let Some(read_positions) = reader.read_positions() else {
                continue;
            };
            positions.extend(read_positions.map(|p| Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)));
            let count = positions.len() - offset;

            match reader.read_tex_coords(0) {
                Some(tex) => uvs.extend(tex.into_f32().map(|t| Point2::new(t[0] as f64, t[1] as f64))),
                None => log::warn!(
                    "primitive {} of mesh {} has no texture coordinates",
                    primitive.index(),
                    mesh.index()
                ),
            }
            uvs.resize(positions.len(), Point2::origin());

            let indices: Vec<usize> = match reader.read_indices() {
                Some(indices) => indices.into_u32().map(|i| i as usize + offset).collect(),
                None => (offset..offset + count).collect(),
            };

            triangulate(primitive.mode(), &indices, &mut faces);
        }
    }

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "glTF file contains no triangle meshes".to_string(),
        });
    }

    let mesh = build_from_triangles(&positions, &uvs, &faces)?;
    log::info!(
        "loaded {} ({} vertices, {} faces)",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

fn triangulate(mode: ::gltf::mesh::Mode, indices: &[usize], faces: &mut Vec<[usize; 3]>) {
    use ::gltf::mesh::Mode;

    match mode {
        Mode::Triangles => {
            faces.extend(indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]));
        }
        Mode::TriangleStrip => {
            for i in 0..indices.len().saturating_sub(2) {
                // Odd triangles are reversed to keep a consistent winding
                if i % 2 == 0 {
                    faces.push([indices[i], indices[i + 1], indices[i + 2]]);
                } else {
                    faces.push([indices[i], indices[i + 2], indices[i + 1]]);
                }
            }
        }
        Mode::TriangleFan => {
            for i in 1..indices.len().saturating_sub(1) {
                faces.push([indices[0], indices[i], indices[i + 1]]);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::gltf::mesh::Mode;

    #[test]
    fn test_triangle_list() {
        let mut faces = Vec::new();
        triangulate(Mode::Triangles, &[0, 1, 2, 2, 3, 0, 9], &mut faces);
        assert_eq!(faces, vec![[0, 1, 2], [2, 3, 0]]);
    }

    #[test]
    fn test_strip_alternates_winding() {
        let mut faces = Vec::new();
        triangulate(Mode::TriangleStrip, &[0, 1, 2, 3, 4], &mut faces);
        assert_eq!(faces, vec![[0, 1, 2], [1, 3, 2], [2, 3, 4]]);
    }

    #[test]
    fn test_fan() {
        let mut faces = Vec::new();
        triangulate(Mode::TriangleFan, &[5, 6, 7, 8], &mut faces);
        assert_eq!(faces, vec![[5, 6, 7], [5, 7, 8]]);
    }

    #[test]
    fn test_lines_are_skipped() {
        let mut faces = Vec::new();
        triangulate(Mode::Lines, &[0, 1, 2, 3], &mut faces);
        assert!(faces.is_empty());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load("/nonexistent/model.gltf"),
            Err(MeshError::LoadError { .. })
        ));
    }
}
