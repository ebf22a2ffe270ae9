//! Dual-space alignment of a mesh with its UV layout.
//!
//! [`Alignment::compute`] runs the per-mesh analyses once, in a fixed order:
//!
//! 1. area-weighted centroids in 3D and in UV space,
//! 2. cross-covariance and best-fit rotation,
//! 3. mean UV scaling,
//! 4. bounding sphere.
//!
//! Each result lands in its own field and is never rewritten afterwards.
//! Degenerate input never fails: the affected quantity falls back to a safe
//! default and the fallback is recorded in [`Alignment::degeneracies`].

use std::fmt;

use nalgebra::{Matrix3, Point3};

use crate::error::{MeshError, Result};
use crate::mesh::UvMesh;

use super::area::{area_weighted_centroid, Space};
use super::bounds::BoundingSphere;
use super::rotation::{best_rotation, ReflectionGuard};
use super::scale::average_uv_scaling;

/// Options for the alignment analysis.
#[derive(Debug, Clone)]
pub struct AlignOptions {
    /// Triangles with area at or below this value count as degenerate.
    /// The default of `0.0` only rejects exactly collapsed triangles.
    pub degenerate_area: f64,

    /// Singular values at or below `rank_tolerance` times the largest one are
    /// treated as zero when deciding whether the rotation is determined.
    pub rank_tolerance: f64,

    /// How an improper SVD factor is turned into a rotation.
    pub reflection_guard: ReflectionGuard,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            degenerate_area: 0.0,
            rank_tolerance: 1e-9,
            reflection_guard: ReflectionGuard::FlipWeakestAxis,
        }
    }
}

impl AlignOptions {
    /// Set the degenerate-area threshold.
    pub fn with_degenerate_area(mut self, degenerate_area: f64) -> Self {
        self.degenerate_area = degenerate_area;
        self
    }

    /// Set the relative rank tolerance.
    pub fn with_rank_tolerance(mut self, rank_tolerance: f64) -> Self {
        self.rank_tolerance = rank_tolerance;
        self
    }

    /// Set the reflection guard.
    pub fn with_reflection_guard(mut self, guard: ReflectionGuard) -> Self {
        self.reflection_guard = guard;
        self
    }

    /// Check that thresholds are finite and in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.degenerate_area >= 0.0) || !self.degenerate_area.is_finite() {
            return Err(MeshError::invalid_param(
                "degenerate_area",
                self.degenerate_area,
                "must be finite and non-negative",
            ));
        }
        if !(0.0..1.0).contains(&self.rank_tolerance) {
            return Err(MeshError::invalid_param(
                "rank_tolerance",
                self.rank_tolerance,
                "must be in [0, 1)",
            ));
        }
        Ok(())
    }
}

/// A degenerate-geometry fallback taken during alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// The mesh has no faces; every quantity is at its default.
    EmptyMesh,
    /// The 3D triangles have zero total area; the 3D centroid is the origin.
    ZeroArea3d,
    /// The UV triangles have zero total area; the UV centroid is the origin.
    ZeroAreaUv,
    /// The cross-covariance does not determine a rotation; identity is used.
    RotationUndetermined,
    /// No face has a usable UV triangle; the scaling is `1.0`.
    AllUvFacesDegenerate,
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Degeneracy::EmptyMesh => "mesh has no faces",
            Degeneracy::ZeroArea3d => "3D surface has zero area, centroid set to origin",
            Degeneracy::ZeroAreaUv => "UV layout has zero area, centroid set to origin",
            Degeneracy::RotationUndetermined => "rotation undetermined, using identity",
            Degeneracy::AllUvFacesDegenerate => "all UV triangles degenerate, scaling set to 1",
        };
        f.write_str(text)
    }
}

/// Derived per-mesh quantities relating the 3D shape to its UV layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Area-weighted centroid of the 3D surface.
    pub centroid_3d: Point3<f64>,
    /// Area-weighted centroid of the UV layout, on the `z = 0` plane.
    pub centroid_uv: Point3<f64>,
    /// Proper rotation taking the 3D frame onto the UV frame.
    pub best_rotation: Matrix3<f64>,
    /// Mean per-face `sqrt(area_3d / area_uv)`.
    pub average_scaling: f64,
    /// Sphere enclosing every referenced vertex.
    pub bounding_sphere: BoundingSphere,
    /// Faces left out of the scaling mean for a degenerate UV triangle.
    pub degenerate_uv_faces: usize,
    /// Fallbacks taken while computing the fields above.
    pub degeneracies: Vec<Degeneracy>,
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            centroid_3d: Point3::origin(),
            centroid_uv: Point3::origin(),
            best_rotation: Matrix3::identity(),
            average_scaling: 1.0,
            bounding_sphere: BoundingSphere::default(),
            degenerate_uv_faces: 0,
            degeneracies: Vec::new(),
        }
    }
}

impl Alignment {
    /// Analyze a mesh with default options.
    ///
    /// # Example
    /// ```
    /// use uvmorph::algo::Alignment;
    /// use uvmorph::mesh::primitives::grid;
    ///
    /// let alignment = Alignment::compute(&grid(1).unwrap());
    /// assert!((alignment.average_scaling - 1.0).abs() < 1e-12);
    /// assert!(alignment.is_clean());
    /// ```
    pub fn compute(mesh: &UvMesh) -> Self {
        Self::compute_with(mesh, &AlignOptions::default())
    }

    /// Analyze a mesh.
    ///
    /// A negative or NaN `degenerate_area` is treated as `0.0`; use
    /// [`AlignOptions::validate`] to reject it up front instead.
    pub fn compute_with(mesh: &UvMesh, options: &AlignOptions) -> Self {
        let mut alignment = Alignment::default();
        let degenerate_area = options.degenerate_area.max(0.0);

        if mesh.is_empty() {
            alignment.record(Degeneracy::EmptyMesh);
            return alignment;
        }

        match area_weighted_centroid(mesh, Space::Model, degenerate_area) {
            Some(c) => alignment.centroid_3d = c,
            None => alignment.record(Degeneracy::ZeroArea3d),
        }
        match area_weighted_centroid(mesh, Space::Uv, degenerate_area) {
            Some(c) => alignment.centroid_uv = c,
            None => alignment.record(Degeneracy::ZeroAreaUv),
        }

        match best_rotation(
            mesh,
            &alignment.centroid_3d,
            &alignment.centroid_uv,
            options.rank_tolerance,
            options.reflection_guard,
        ) {
            Some(r) => alignment.best_rotation = r,
            None => alignment.record(Degeneracy::RotationUndetermined),
        }

        let scale = average_uv_scaling(mesh, degenerate_area);
        alignment.average_scaling = scale.average;
        alignment.degenerate_uv_faces = scale.degenerate_faces;
        if scale.is_fallback() {
            alignment.record(Degeneracy::AllUvFacesDegenerate);
        } else if scale.degenerate_faces > 0 {
            log::debug!(
                "{} of {} faces have degenerate UVs and were left out of the scaling",
                scale.degenerate_faces,
                mesh.num_faces()
            );
        }

        alignment.bounding_sphere = BoundingSphere::compute(mesh);

        log::debug!(
            "aligned {} faces: centroid_3d={:?} centroid_uv={:?} scaling={:.6} radius={:.6}",
            mesh.num_faces(),
            alignment.centroid_3d,
            alignment.centroid_uv,
            alignment.average_scaling,
            alignment.bounding_sphere.radius
        );

        alignment
    }

    /// True when no fallback was needed.
    pub fn is_clean(&self) -> bool {
        self.degeneracies.is_empty()
    }

    /// True if the given fallback was taken.
    pub fn has(&self, degeneracy: Degeneracy) -> bool {
        self.degeneracies.contains(&degeneracy)
    }

    fn record(&mut self, degeneracy: Degeneracy) {
        log::warn!("degenerate geometry: {}", degeneracy);
        self.degeneracies.push(degeneracy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::rotation::is_proper_rotation;
    use crate::mesh::{build_from_triangles, primitives};
    use nalgebra::Point2;

    fn unit_square() -> UvMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let uvs: Vec<_> = positions.iter().map(|p| Point2::new(p.x, p.y)).collect();
        build_from_triangles(&positions, &uvs, &[[0, 1, 2], [0, 2, 3]]).unwrap()
    }

    #[test]
    fn test_unit_square_scenario() {
        let a = Alignment::compute(&unit_square());
        let half = Point3::new(0.5, 0.5, 0.0);

        assert!((a.centroid_3d - half).norm() < 1e-12);
        assert!((a.centroid_uv - half).norm() < 1e-12);
        assert!((a.best_rotation - Matrix3::identity()).norm() < 1e-9);
        assert!((a.average_scaling - 1.0).abs() < 1e-12);
        assert!((a.bounding_sphere.center - half).norm() < 1e-12);
        assert!((a.bounding_sphere.radius - 0.5f64.sqrt()).abs() < 1e-12);
        assert!(a.is_clean());
    }

    #[test]
    fn test_empty_mesh_defaults() {
        let a = Alignment::compute(&UvMesh::new());
        assert_eq!(a.centroid_3d, Point3::origin());
        assert_eq!(a.centroid_uv, Point3::origin());
        assert_eq!(a.best_rotation, Matrix3::identity());
        assert_eq!(a.average_scaling, 1.0);
        assert_eq!(a.bounding_sphere.radius, 0.0);
        assert_eq!(a.degeneracies, vec![Degeneracy::EmptyMesh]);
    }

    #[test]
    fn test_collapsed_uvs_fall_back_without_nan() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let uvs = vec![Point2::new(0.5, 0.5); 3];
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2]]).unwrap();

        let a = Alignment::compute(&mesh);
        assert!(a.has(Degeneracy::ZeroAreaUv));
        assert!(a.has(Degeneracy::RotationUndetermined));
        assert!(a.has(Degeneracy::AllUvFacesDegenerate));
        assert!(!a.has(Degeneracy::ZeroArea3d));
        assert_eq!(a.centroid_uv, Point3::origin());
        assert_eq!(a.best_rotation, Matrix3::identity());
        assert_eq!(a.average_scaling, 1.0);
        assert!(a.bounding_sphere.radius.is_finite());
    }

    #[test]
    fn test_zero_area_3d() {
        let positions = vec![Point3::new(1.0, 2.0, 3.0); 3];
        let uvs = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2]]).unwrap();

        let a = Alignment::compute(&mesh);
        assert!(a.has(Degeneracy::ZeroArea3d));
        assert!(!a.has(Degeneracy::AllUvFacesDegenerate));
        assert_eq!(a.centroid_3d, Point3::origin());
        // Zero 3D area over a valid UV triangle is a ratio of zero, not a skip
        assert_eq!(a.average_scaling, 0.0);
        assert_eq!(a.degenerate_uv_faces, 0);
        assert!(a.best_rotation.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_scaled_layout() {
        let mesh = primitives::grid(5).unwrap();
        let a = Alignment::compute(&mesh);
        assert!((a.average_scaling - 5.0).abs() < 1e-12);
        assert!(is_proper_rotation(&a.best_rotation, 1e-9));
    }

    #[test]
    fn test_partially_degenerate_uvs_counted() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let uvs = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2], [1, 3, 2]]).unwrap();

        let a = Alignment::compute(&mesh);
        assert_eq!(a.degenerate_uv_faces, 1);
        assert!(!a.has(Degeneracy::AllUvFacesDegenerate));
        assert!((a.average_scaling - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collapsed_3d_face_lowers_scaling() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let uvs = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
        ];
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2], [0, 1, 3]]).unwrap();

        let a = Alignment::compute(&mesh);
        assert!((a.average_scaling - 0.5).abs() < 1e-12, "got {}", a.average_scaling);
        assert_eq!(a.degenerate_uv_faces, 0);
        assert!(!a.has(Degeneracy::AllUvFacesDegenerate));
    }

    #[test]
    fn test_negative_threshold_does_not_leak_nan() {
        let positions = vec![Point3::new(1.0, 1.0, 1.0); 3];
        let uvs = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2]]).unwrap();

        let options = AlignOptions::default().with_degenerate_area(-1.0);
        for a in [
            Alignment::compute_with(&mesh, &options),
            Alignment::compute_with(&mesh, &AlignOptions::default().with_degenerate_area(f64::NAN)),
        ] {
            assert!(a.has(Degeneracy::ZeroArea3d), "{:?}", a.degeneracies);
            assert_eq!(a.centroid_3d, Point3::origin());
            assert!(a.centroid_uv.iter().all(|x| x.is_finite()));
            assert!(a.average_scaling.is_finite());
        }
    }

    #[test]
    fn test_options_validation() {
        assert!(AlignOptions::default().validate().is_ok());
        assert!(AlignOptions::default()
            .with_degenerate_area(-1.0)
            .validate()
            .is_err());
        assert!(AlignOptions::default()
            .with_rank_tolerance(1.5)
            .validate()
            .is_err());
    }
}
