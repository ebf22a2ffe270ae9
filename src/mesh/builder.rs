//! Mesh construction utilities.
//!
//! This module builds [`UvMesh`] values from the face-vertex lists produced by
//! importers: parallel position and UV arrays plus index lists. It is the
//! boundary where importer contracts are checked, so everything downstream can
//! assume 0-based, in-range indices.

use nalgebra::{Point2, Point3};

use super::uv_mesh::{Face, UvMesh, Vertex};
use crate::error::{MeshError, Result};

/// Numbering convention of incoming face indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexBase {
    /// Indices start at 0.
    #[default]
    ZeroBased,
    /// Indices start at 1 (as in OBJ files); converted to 0-based on build.
    OneBased,
}

impl IndexBase {
    fn normalize(self, face: usize, index: usize) -> Result<usize> {
        match self {
            IndexBase::ZeroBased => Ok(index),
            IndexBase::OneBased => index
                .checked_sub(1)
                .ok_or(MeshError::InvalidVertexIndex { face, vertex: index }),
        }
    }
}

/// Build a mesh from positions, UVs and 0-based triangle faces.
///
/// # Arguments
/// * `positions` - Vertex positions
/// * `uvs` - UV coordinates, one per position
/// * `faces` - Triangles, each as `[v0, v1, v2]` indices
///
/// # Errors
/// Returns an error if the position and UV arrays differ in length or a face
/// references a vertex that does not exist. An empty face list is accepted;
/// the alignment treats it as an empty mesh.
///
/// # Example
/// ```
/// use uvmorph::mesh::build_from_triangles;
/// use nalgebra::{Point2, Point3};
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let uvs = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.5, 1.0),
/// ];
///
/// let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2]]).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles(
    positions: &[Point3<f64>],
    uvs: &[Point2<f64>],
    faces: &[[usize; 3]],
) -> Result<UvMesh> {
    let mut mesh = start_mesh(positions, uvs, faces.len())?;

    for (fi, face) in faces.iter().enumerate() {
        let face = checked_face(fi, face, positions.len())?;
        mesh.faces.push(face);
    }

    Ok(mesh)
}

/// Build a mesh from arbitrary polygons, fan-triangulating anything larger
/// than a triangle.
///
/// Polygon `[a, b, c, d]` becomes triangles `[a, b, c]` and `[a, c, d]`.
/// Polygons with fewer than three corners are rejected.
///
/// # Example
/// ```
/// use uvmorph::mesh::{build_from_polygons, IndexBase};
/// use nalgebra::{Point2, Point3};
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let uvs: Vec<_> = positions.iter().map(|p| Point2::new(p.x, p.y)).collect();
///
/// // One-based quad, as it would appear in an OBJ file
/// let mesh = build_from_polygons(&positions, &uvs, &[vec![1, 2, 3, 4]], IndexBase::OneBased)
///     .unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// ```
pub fn build_from_polygons(
    positions: &[Point3<f64>],
    uvs: &[Point2<f64>],
    polygons: &[Vec<usize>],
    base: IndexBase,
) -> Result<UvMesh> {
    let triangle_count = polygons.iter().map(|p| p.len().saturating_sub(2)).sum();
    let mut mesh = start_mesh(positions, uvs, triangle_count)?;

    for (pi, polygon) in polygons.iter().enumerate() {
        if polygon.len() < 3 {
            return Err(MeshError::NonTriangularFace {
                face: pi,
                corners: polygon.len(),
            });
        }

        let corners = polygon
            .iter()
            .map(|&i| base.normalize(pi, i))
            .collect::<Result<Vec<_>>>()?;

        for k in 1..corners.len() - 1 {
            let tri = [corners[0], corners[k], corners[k + 1]];
            let face = checked_face(pi, &tri, positions.len())?;
            mesh.faces.push(face);
        }
    }

    if polygons.len() != mesh.num_faces() {
        log::debug!(
            "triangulated {} polygons into {} triangles",
            polygons.len(),
            mesh.num_faces()
        );
    }

    Ok(mesh)
}

fn start_mesh(positions: &[Point3<f64>], uvs: &[Point2<f64>], num_faces: usize) -> Result<UvMesh> {
    if positions.len() != uvs.len() {
        return Err(MeshError::LengthMismatch {
            positions: positions.len(),
            uvs: uvs.len(),
        });
    }

    let mut mesh = UvMesh::with_capacity(positions.len(), num_faces);
    mesh.vertices.extend(
        positions
            .iter()
            .zip(uvs)
            .map(|(&position, &uv)| Vertex::new(position, uv)),
    );
    Ok(mesh)
}

fn checked_face(fi: usize, face: &[usize; 3], num_vertices: usize) -> Result<Face> {
    for &vi in face {
        if vi >= num_vertices || vi > u32::MAX as usize {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
    }
    Ok(Face::new(face[0] as u32, face[1] as u32, face[2] as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> (Vec<Point3<f64>>, Vec<Point2<f64>>) {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let uvs = positions.iter().map(|p| Point2::new(p.x, p.y)).collect();
        (positions, uvs)
    }

    #[test]
    fn test_build_triangles() {
        let (positions, uvs) = square();
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2], [0, 2, 3]]).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.faces()[1].indices, [0, 2, 3]);
    }

    #[test]
    fn test_empty_faces_allowed() {
        let (positions, uvs) = square();
        let mesh = build_from_triangles(&positions, &uvs, &[]).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.num_vertices(), 4);
    }

    #[test]
    fn test_invalid_index() {
        let (positions, uvs) = square();
        let err = build_from_triangles(&positions, &uvs, &[[0, 1, 4]]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::InvalidVertexIndex { face: 0, vertex: 4 }
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let (positions, mut uvs) = square();
        uvs.pop();
        let err = build_from_triangles(&positions, &uvs, &[[0, 1, 2]]).unwrap_err();
        assert!(matches!(
            err,
            MeshError::LengthMismatch {
                positions: 4,
                uvs: 3
            }
        ));
    }

    #[test]
    fn test_fan_triangulation() {
        let (positions, uvs) = square();
        let mesh =
            build_from_polygons(&positions, &uvs, &[vec![0, 1, 2, 3]], IndexBase::ZeroBased)
                .unwrap();
        assert_eq!(mesh.index_buffer(), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_one_based_indices_are_normalized() {
        let (positions, uvs) = square();
        let mesh =
            build_from_polygons(&positions, &uvs, &[vec![1, 2, 3]], IndexBase::OneBased).unwrap();
        assert_eq!(mesh.faces()[0].indices, [0, 1, 2]);
    }

    #[test]
    fn test_one_based_zero_index_rejected() {
        let (positions, uvs) = square();
        let err = build_from_polygons(&positions, &uvs, &[vec![0, 1, 2]], IndexBase::OneBased)
            .unwrap_err();
        assert!(matches!(err, MeshError::InvalidVertexIndex { face: 0, vertex: 0 }));
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let (positions, uvs) = square();
        let err = build_from_polygons(&positions, &uvs, &[vec![0, 1]], IndexBase::ZeroBased)
            .unwrap_err();
        assert!(matches!(
            err,
            MeshError::NonTriangularFace { face: 0, corners: 2 }
        ));
    }
}
