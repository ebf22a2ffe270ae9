//! Best-fit rotation between the 3D shape and its UV layout.
//!
//! This is an orthogonal Procrustes problem: find the rotation `R` that
//! minimizes `Σ |R vᵢ - wᵢ|²`, where `vᵢ` are the 3D positions centered on
//! the 3D centroid and `wᵢ` the lifted UV coordinates centered on the UV
//! centroid. The solution is the orthogonal factor of the cross-covariance
//! matrix `H = Σ wᵢ vᵢᵀ`, obtained from its singular value decomposition
//! `H = U Σ Vᵀ` as `R = U Vᵀ`.
//!
//! With `H` accumulated as `w vᵀ`, `R` maps the 3D frame onto the UV frame,
//! so the morph applies it directly as `R * p`.
//!
//! # References
//!
//! - Schönemann, P. H. (1966). "A generalized solution of the orthogonal
//!   Procrustes problem." Psychometrika.
//! - Kabsch, W. (1976). "A solution for the best rotation to relate two sets
//!   of vectors." Acta Crystallographica.

use nalgebra::{Matrix3, Point3};

use crate::mesh::UvMesh;

/// How to turn an improper orthogonal factor (`det = -1`) into a rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflectionGuard {
    /// Negate the left singular vector of the smallest singular value and
    /// recompute `U Vᵀ` (Kabsch correction). This keeps the two dominant
    /// directions aligned, which matters because the UV layout is planar and
    /// the third singular vector is only determined up to sign.
    #[default]
    FlipWeakestAxis,
    /// Negate the whole matrix, the literal `R ↦ -R` correction. On planar
    /// layouts this can turn an already aligned mesh upside down.
    Negate,
}

/// Accumulate the normalized cross-covariance `H = (1/n) Σ wᵢ vᵢᵀ`.
///
/// The sum runs over every face-vertex occurrence (`n = 3 * num_faces`), so a
/// vertex shared by several faces contributes once per face. Returns the zero
/// matrix for a mesh without faces.
pub fn cross_covariance(
    mesh: &UvMesh,
    centroid_3d: &Point3<f64>,
    centroid_uv: &Point3<f64>,
) -> Matrix3<f64> {
    let mut h = Matrix3::zeros();
    let mut count = 0usize;

    for vertex in mesh.corner_vertices() {
        let v = vertex.position - *centroid_3d;
        let w = vertex.lifted_uv() - *centroid_uv;
        h += w * v.transpose();
        count += 1;
    }

    if count > 0 {
        h /= count as f64;
    }
    h
}

/// The proper rotation closest to `h` in the Frobenius norm.
///
/// Returns `None` when the rotation is not determined by `h`: the matrix is
/// non-finite, zero, or has fewer than two singular values above
/// `rank_tolerance` times the largest one (all points coincident or
/// collinear). The result always has determinant `+1`.
///
/// # Example
/// ```
/// use nalgebra::Matrix3;
/// use uvmorph::algo::rotation::{closest_rotation, ReflectionGuard};
///
/// // Orthogonal factor is diag(1, 1, -1), a mirror
/// let h = Matrix3::from_diagonal(&nalgebra::Vector3::new(3.0, 2.0, -1.0));
/// let r = closest_rotation(&h, 1e-9, ReflectionGuard::FlipWeakestAxis).unwrap();
/// assert!((r.determinant() - 1.0).abs() < 1e-9);
/// assert!((r - Matrix3::identity()).norm() < 1e-9);
/// ```
pub fn closest_rotation(
    h: &Matrix3<f64>,
    rank_tolerance: f64,
    guard: ReflectionGuard,
) -> Option<Matrix3<f64>> {
    if !h.iter().all(|x| x.is_finite()) {
        return None;
    }

    let svd = h.svd(true, true);
    let sigma = svd.singular_values;
    let largest = sigma.max();
    if !(largest > 0.0) {
        return None;
    }

    let significant = sigma.iter().filter(|&&s| s > rank_tolerance * largest).count();
    if significant < 2 {
        return None;
    }

    let u = svd.u?;
    let v_t = svd.v_t?;
    let mut r = u * v_t;

    if r.determinant() < 0.0 {
        r = match guard {
            ReflectionGuard::FlipWeakestAxis => {
                let weakest = sigma.imin();
                let mut u_fixed = u;
                u_fixed.column_mut(weakest).neg_mut();
                u_fixed * v_t
            }
            ReflectionGuard::Negate => -r,
        };
    }

    Some(r)
}

/// Solve for the rotation aligning the mesh's 3D shape onto its UV layout.
///
/// Returns `None` in the degenerate cases described on [`closest_rotation`],
/// and for meshes without faces.
pub fn best_rotation(
    mesh: &UvMesh,
    centroid_3d: &Point3<f64>,
    centroid_uv: &Point3<f64>,
    rank_tolerance: f64,
    guard: ReflectionGuard,
) -> Option<Matrix3<f64>> {
    if mesh.is_empty() {
        return None;
    }
    let h = cross_covariance(mesh, centroid_3d, centroid_uv);
    closest_rotation(&h, rank_tolerance, guard)
}

/// True when `m` is orthogonal with determinant `+1`, within `tolerance`.
pub fn is_proper_rotation(m: &Matrix3<f64>, tolerance: f64) -> bool {
    (m.transpose() * m - Matrix3::identity()).norm() < tolerance
        && (m.determinant() - 1.0).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::area::{area_weighted_centroid, Space};
    use crate::mesh::{build_from_triangles, primitives};
    use nalgebra::{Point2, Rotation3, Vector3};

    const TOL: f64 = 1e-9;

    fn solve(mesh: &UvMesh) -> Option<Matrix3<f64>> {
        let c3 = area_weighted_centroid(mesh, Space::Model, 0.0).unwrap_or_else(Point3::origin);
        let cuv = area_weighted_centroid(mesh, Space::Uv, 0.0).unwrap_or_else(Point3::origin);
        best_rotation(mesh, &c3, &cuv, 1e-9, ReflectionGuard::default())
    }

    fn transformed_grid(q: &Matrix3<f64>, offset: Vector3<f64>) -> UvMesh {
        let flat = primitives::grid(4).unwrap();
        let positions: Vec<_> = flat
            .vertices()
            .iter()
            .map(|v| Point3::from(q * v.position.coords + offset))
            .collect();
        let uvs: Vec<_> = flat.vertices().iter().map(|v| v.uv).collect();
        let faces: Vec<_> = flat.faces().iter().map(|f| f.corners()).collect();
        build_from_triangles(&positions, &uvs, &faces).unwrap()
    }

    #[test]
    fn test_identity_for_flat_mesh() {
        let mesh = primitives::grid(3).unwrap();
        let r = solve(&mesh).unwrap();
        assert!((r - Matrix3::identity()).norm() < TOL, "R = {}", r);
    }

    #[test]
    fn test_recovers_known_rotation() {
        let q = Rotation3::from_euler_angles(0.4, -1.1, 2.3).into_inner();
        let mesh = transformed_grid(&q, Vector3::new(5.0, -2.0, 7.0));
        let r = solve(&mesh).unwrap();

        assert!(is_proper_rotation(&r, TOL));
        assert!((r - q.transpose()).norm() < 1e-8, "R = {}, Qᵀ = {}", r, q.transpose());

        // Rotated positions land on a plane parallel to the UV plane
        let z0 = (r * mesh.vertices()[0].position.coords).z;
        for v in mesh.vertices() {
            assert!(((r * v.position.coords).z - z0).abs() < 1e-8);
        }
    }

    #[test]
    fn test_rotation_is_orthogonal_for_curved_mesh() {
        let mesh = primitives::cylinder(16, 1.0, 3.0).unwrap();
        let r = solve(&mesh).unwrap();
        assert!(is_proper_rotation(&r, TOL), "R = {}", r);
    }

    #[test]
    fn test_covariance_counts_each_occurrence() {
        let mesh = primitives::grid(1).unwrap();
        let c = Point3::new(0.5, 0.5, 0.0);
        let cuv = Point3::new(0.5, 0.5, 0.0);
        let h = cross_covariance(&mesh, &c, &cuv);

        // Corners (0,0) and (1,1) appear twice, the others once: 6 occurrences
        let expected_xx = (2.0 * 0.25 + 0.25 + 2.0 * 0.25 + 0.25) / 6.0;
        assert!((h[(0, 0)] - expected_xx).abs() < 1e-12);
        assert!((h[(0, 1)] - (2.0 * 0.25 - 0.25 + 2.0 * 0.25 - 0.25) / 6.0).abs() < 1e-12);
        assert_eq!(h[(2, 2)], 0.0);
    }

    #[test]
    fn test_reflection_is_corrected() {
        let h = Matrix3::from_diagonal(&Vector3::new(3.0, 2.0, -1.0));
        let naive = {
            let svd = h.svd(true, true);
            svd.u.unwrap() * svd.v_t.unwrap()
        };
        assert!(naive.determinant() < 0.0);

        let flipped = closest_rotation(&h, TOL, ReflectionGuard::FlipWeakestAxis).unwrap();
        assert!(is_proper_rotation(&flipped, TOL));
        assert!((flipped - Matrix3::identity()).norm() < TOL);

        let negated = closest_rotation(&h, TOL, ReflectionGuard::Negate).unwrap();
        assert!(is_proper_rotation(&negated, TOL));
        assert!((negated + naive).norm() < TOL);
    }

    #[test]
    fn test_mirrored_uv_layout_still_yields_rotation() {
        // UVs are the mirror image of the positions
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let uvs: Vec<_> = positions.iter().map(|p| Point2::new(-p.x, p.y)).collect();
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2], [1, 3, 2]]).unwrap();

        let r = solve(&mesh).unwrap();
        assert!(is_proper_rotation(&r, TOL), "R = {}", r);
    }

    #[test]
    fn test_degenerate_inputs_fall_back() {
        assert!(closest_rotation(&Matrix3::zeros(), TOL, ReflectionGuard::default()).is_none());

        let mut nan = Matrix3::identity();
        nan[(1, 2)] = f64::NAN;
        assert!(closest_rotation(&nan, TOL, ReflectionGuard::default()).is_none());

        // Rank one: collinear points
        let rank_one = Vector3::new(1.0, 2.0, 0.0) * Vector3::new(0.5, 0.0, 1.0).transpose();
        assert!(closest_rotation(&rank_one, TOL, ReflectionGuard::default()).is_none());

        assert!(solve(&UvMesh::new()).is_none());
    }

    #[test]
    fn test_coincident_uvs_fall_back() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let uvs = vec![Point2::new(0.5, 0.5); 3];
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2]]).unwrap();
        let c3 = area_weighted_centroid(&mesh, Space::Model, 0.0).unwrap();
        let cuv = Point3::new(0.5, 0.5, 0.0);
        assert!(best_rotation(&mesh, &c3, &cuv, TOL, ReflectionGuard::default()).is_none());
    }
}
