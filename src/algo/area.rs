//! Triangle areas and area-weighted centroids.
//!
//! Every quantity here is computed the same way in both embeddings of the
//! mesh: once over the 3D positions and once over the UV coordinates lifted
//! onto the `z = 0` plane.

use nalgebra::{Point3, Vector3};

use crate::mesh::{FaceId, UvMesh};

/// Which embedding of the mesh a computation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// The 3D vertex positions.
    Model,
    /// The UV coordinates, lifted to `(u, v, 0)`.
    Uv,
}

/// Unsigned area of triangle `abc`.
#[inline]
pub fn triangle_area(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    0.5 * (b - a).cross(&(c - a)).norm()
}

/// Mean of the three corners of triangle `abc`.
#[inline]
pub fn triangle_centroid(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords + c.coords) / 3.0)
}

/// The three corners of face `f` in the requested space.
#[inline]
pub fn face_corners(mesh: &UvMesh, f: FaceId, space: Space) -> [Point3<f64>; 3] {
    match space {
        Space::Model => mesh.face_positions(f),
        Space::Uv => mesh.face_uvs(f),
    }
}

/// Total triangle area of the mesh in the requested space.
pub fn total_area(mesh: &UvMesh, space: Space) -> f64 {
    mesh.face_ids()
        .map(|f| {
            let [a, b, c] = face_corners(mesh, f, space);
            triangle_area(&a, &b, &c)
        })
        .sum()
}

/// Total area of the 3D surface.
pub fn surface_area(mesh: &UvMesh) -> f64 {
    total_area(mesh, Space::Model)
}

/// Total area covered by the UV layout, counting overlaps twice.
pub fn uv_area(mesh: &UvMesh) -> f64 {
    total_area(mesh, Space::Uv)
}

/// Area-weighted centroid of the mesh in the requested space.
///
/// Each triangle contributes its own centroid weighted by its unsigned area.
/// Returns `None` when the total area is zero or not above `degenerate_area`
/// (an empty mesh, or one whose faces all collapse), since the centroid is
/// then undefined.
///
/// # Example
/// ```
/// use uvmorph::algo::area::{area_weighted_centroid, Space};
/// use uvmorph::mesh::primitives::grid;
///
/// let mesh = grid(4).unwrap();
/// let c = area_weighted_centroid(&mesh, Space::Model, 0.0).unwrap();
/// assert!((c.x - 2.0).abs() < 1e-12 && (c.y - 2.0).abs() < 1e-12);
/// ```
pub fn area_weighted_centroid(mesh: &UvMesh, space: Space, degenerate_area: f64) -> Option<Point3<f64>> {
    let mut weighted = Vector3::zeros();
    let mut total = 0.0;

    for f in mesh.face_ids() {
        let [a, b, c] = face_corners(mesh, f, space);
        let area = triangle_area(&a, &b, &c);
        weighted += triangle_centroid(&a, &b, &c).coords * area;
        total += area;
    }

    if total > 0.0 && total > degenerate_area && total.is_finite() {
        Some(Point3::from(weighted / total))
    } else {
        None
    }
}

/// Per-face geometry in both embeddings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMetrics {
    /// Area of the 3D triangle.
    pub area_3d: f64,
    /// Area of the UV triangle.
    pub area_uv: f64,
    /// Corner mean of the 3D triangle.
    pub centroid_3d: Point3<f64>,
    /// Corner mean of the lifted UV triangle.
    pub centroid_uv: Point3<f64>,
    /// `sqrt(area_3d / area_uv)`, or `None` for a degenerate UV triangle.
    pub uv_scaling: Option<f64>,
}

impl FaceMetrics {
    /// Measure face `f` of `mesh`.
    ///
    /// UV triangles with area not above `degenerate_area` get no scaling.
    pub fn compute(mesh: &UvMesh, f: FaceId, degenerate_area: f64) -> Self {
        let [a, b, c] = mesh.face_positions(f);
        let [ua, ub, uc] = mesh.face_uvs(f);

        let area_3d = triangle_area(&a, &b, &c);
        let area_uv = triangle_area(&ua, &ub, &uc);
        let uv_scaling = (area_uv > degenerate_area).then(|| (area_3d / area_uv).sqrt());

        Self {
            area_3d,
            area_uv,
            centroid_3d: triangle_centroid(&a, &b, &c),
            centroid_uv: triangle_centroid(&ua, &ub, &uc),
            uv_scaling,
        }
    }
}

/// Measure every face of the mesh, in face order.
pub fn face_metrics(mesh: &UvMesh, degenerate_area: f64) -> Vec<FaceMetrics> {
    mesh.face_ids()
        .map(|f| FaceMetrics::compute(mesh, f, degenerate_area))
        .collect()
}
