//! Enclosing sphere used to normalize display scale.
//!
//! The sphere is centered on the axis-aligned bounding box of the referenced
//! vertices, with the radius reaching the farthest of them. It always
//! contains the mesh but is not the minimal enclosing sphere.

use nalgebra::Point3;

use crate::mesh::UvMesh;

/// A sphere enclosing every vertex referenced by a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center.
    pub center: Point3<f64>,
    /// Sphere radius, never negative.
    pub radius: f64,
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self {
            center: Point3::origin(),
            radius: 0.0,
        }
    }
}

impl BoundingSphere {
    /// Compute the sphere for a mesh.
    ///
    /// Only vertices referenced by at least one face are considered. A mesh
    /// without faces yields a zero-radius sphere at the origin.
    ///
    /// # Example
    /// ```
    /// use uvmorph::algo::bounds::BoundingSphere;
    /// use uvmorph::mesh::primitives::grid;
    ///
    /// let sphere = BoundingSphere::compute(&grid(2).unwrap());
    /// assert!((sphere.radius - 2f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn compute(mesh: &UvMesh) -> Self {
        let mut corners = mesh.corner_vertices().map(|v| v.position);
        let Some(first) = corners.next() else {
            return Self::default();
        };

        let (min, max) = corners.fold((first, first), |(mut min, mut max), p| {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
            (min, max)
        });
        let center = nalgebra::center(&min, &max);

        let radius_squared = mesh
            .corner_vertices()
            .map(|v| (v.position - center).norm_squared())
            .fold(0.0, f64::max);

        Self {
            center,
            radius: radius_squared.sqrt(),
        }
    }

    /// True if `p` lies inside the sphere, allowing `epsilon` of slack.
    pub fn contains(&self, p: &Point3<f64>, epsilon: f64) -> bool {
        (*p - self.center).norm() <= self.radius + epsilon
    }

    /// Uniform scale that makes the sphere's radius equal `target_radius`.
    ///
    /// A zero-radius sphere cannot be normalized and gets `1.0`.
    pub fn normalization_scale(&self, target_radius: f64) -> f64 {
        if self.radius > 0.0 {
            target_radius / self.radius
        } else {
            1.0
        }
    }
}
