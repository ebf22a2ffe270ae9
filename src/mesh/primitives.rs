//! Procedural meshes with UV layouts.
//!
//! These are handy as morph subjects that need no file: a cylinder whose UV
//! layout unrolls the side wall, a ground plane, and a regular grid.
//! All of them use 0-based indices over a single vertex array.

use std::f64::consts::TAU;

use nalgebra::{Point2, Point3};

use super::uv_mesh::{Face, UvMesh, Vertex};
use crate::error::{MeshError, Result};

/// Build the side wall of a cylinder around the Y axis.
///
/// The wall has `segments` quads, each split into two triangles. Column `i`
/// sits at angle `i / segments * 2π` and has `u = i / segments`; the top ring
/// has `v = 1` and the bottom ring `v = 0`. The seam column is duplicated so
/// the last column has `u = 1` rather than wrapping back to `u = 0`.
/// Triangles wind counter-clockwise seen from outside.
///
/// # Errors
/// Returns an error if `segments < 3` or `radius`/`height` are not positive.
///
/// # Example
/// ```
/// use uvmorph::mesh::primitives::cylinder;
///
/// let mesh = cylinder(10, 1.0, 2.0).unwrap();
/// assert_eq!(mesh.num_vertices(), 22);
/// assert_eq!(mesh.num_faces(), 20);
/// ```
pub fn cylinder(segments: usize, radius: f64, height: f64) -> Result<UvMesh> {
    if segments < 3 {
        return Err(MeshError::invalid_param("segments", segments, "must be at least 3"));
    }
    if !(radius > 0.0) {
        return Err(MeshError::invalid_param("radius", radius, "must be positive"));
    }
    if !(height > 0.0) {
        return Err(MeshError::invalid_param("height", height, "must be positive"));
    }

    let half = height / 2.0;
    let mut mesh = UvMesh::with_capacity(2 * (segments + 1), 2 * segments);

    for i in 0..=segments {
        let u = i as f64 / segments as f64;
        let angle = u * TAU;
        let (x, z) = (radius * angle.cos(), radius * angle.sin());

        mesh.vertices
            .push(Vertex::new(Point3::new(x, half, z), Point2::new(u, 1.0)));
        mesh.vertices
            .push(Vertex::new(Point3::new(x, -half, z), Point2::new(u, 0.0)));
    }

    for i in 0..segments as u32 {
        let top = 2 * i;
        let bottom = top + 1;
        let next_top = top + 2;
        let next_bottom = top + 3;

        mesh.faces.push(Face::new(top, next_top, bottom));
        mesh.faces.push(Face::new(bottom, next_top, next_bottom));
    }

    Ok(mesh)
}

/// Build a square ground plane at height `y`, facing +Y.
///
/// The plane spans `[-half_extent, half_extent]` in X and Z and maps onto the
/// whole unit UV square.
///
/// # Errors
/// Returns an error if `half_extent` is not positive.
pub fn plane(half_extent: f64, y: f64) -> Result<UvMesh> {
    if !(half_extent > 0.0) {
        return Err(MeshError::invalid_param("half_extent", half_extent, "must be positive"));
    }

    let e = half_extent;
    let vertices = vec![
        Vertex::new(Point3::new(-e, y, -e), Point2::new(0.0, 1.0)),
        Vertex::new(Point3::new(-e, y, e), Point2::new(0.0, 0.0)),
        Vertex::new(Point3::new(e, y, e), Point2::new(1.0, 0.0)),
        Vertex::new(Point3::new(e, y, -e), Point2::new(1.0, 1.0)),
    ];
    let faces = vec![Face::new(0, 1, 2), Face::new(2, 3, 0)];

    Ok(UvMesh { vertices, faces })
}

/// Build an `n x n` grid of unit cells in the XY plane with UVs equal to the
/// positions divided by `n`.
///
/// # Errors
/// Returns an error if `n` is zero.
pub fn grid(n: usize) -> Result<UvMesh> {
    if n == 0 {
        return Err(MeshError::invalid_param("n", n, "must be at least 1"));
    }

    let side = n + 1;
    let mut mesh = UvMesh::with_capacity(side * side, 2 * n * n);

    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f64, j as f64);
            mesh.vertices.push(Vertex::new(
                Point3::new(x, y, 0.0),
                Point2::new(x / n as f64, y / n as f64),
            ));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = (j * side + i) as u32;
            let v10 = v00 + 1;
            let v01 = v00 + side as u32;
            let v11 = v01 + 1;

            mesh.faces.push(Face::new(v00, v10, v11));
            mesh.faces.push(Face::new(v00, v11, v01));
        }
    }

    Ok(mesh)
}
