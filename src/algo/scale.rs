//! Uniform scale between UV space and model space.
//!
//! A face whose 3D triangle has area `A` and whose UV triangle has area `a`
//! is stretched by a linear factor of `sqrt(A / a)` when its UV layout is
//! scaled to physical size. The mesh-wide factor is the plain mean of the
//! per-face factors.

use crate::mesh::UvMesh;

use super::area::FaceMetrics;

/// Result of the UV scale estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleEstimate {
    /// Mean per-face scaling, or `1.0` when no face contributed.
    pub average: f64,
    /// Number of faces that contributed to the mean.
    pub contributing_faces: usize,
    /// Number of faces skipped for a degenerate UV triangle.
    pub degenerate_faces: usize,
}

impl ScaleEstimate {
    /// True when no face could contribute, so `average` is the `1.0` default.
    pub fn is_fallback(&self) -> bool {
        self.contributing_faces == 0
    }
}

/// Estimate the mean UV-to-model scaling of a mesh.
///
/// Faces whose UV area is not above `degenerate_area` are skipped. A face
/// that collapses in 3D over a valid UV triangle contributes a ratio of `0`.
/// If nothing is left (including the empty mesh) the average defaults to
/// `1.0`.
///
/// # Example
/// ```
/// use uvmorph::algo::scale::average_uv_scaling;
/// use uvmorph::mesh::primitives::grid;
///
/// // A 4x4 grid of unit cells mapped onto the unit UV square
/// let estimate = average_uv_scaling(&grid(4).unwrap(), 0.0);
/// assert!((estimate.average - 4.0).abs() < 1e-12);
/// ```
pub fn average_uv_scaling(mesh: &UvMesh, degenerate_area: f64) -> ScaleEstimate {
    let mut sum = 0.0;
    let mut contributing_faces = 0;
    let mut degenerate_faces = 0;

    for f in mesh.face_ids() {
        match FaceMetrics::compute(mesh, f, degenerate_area).uv_scaling {
            Some(ratio) if ratio.is_finite() => {
                sum += ratio;
                contributing_faces += 1;
            }
            _ => degenerate_faces += 1,
        }
    }

    let average = if contributing_faces > 0 {
        sum / contributing_faces as f64
    } else {
        1.0
    };

    ScaleEstimate {
        average,
        contributing_faces,
        degenerate_faces,
    }
}
