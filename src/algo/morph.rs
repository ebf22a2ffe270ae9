//! Interpolation between the 3D shape and its flattened UV pose.
//!
//! For every vertex two endpoint poses are derived from the mesh and its
//! [`Alignment`]:
//!
//! - the *3D pose* `R * p`, the position rotated into the UV frame,
//! - the *UV pose* `(u, v, 0) * s`, the UV coordinate lifted onto the `z = 0`
//!   plane and scaled to physical size by the mean UV scaling `s`.
//!
//! A frame at parameter `t` is the per-vertex linear blend of the two. `t` is
//! not clamped, so values outside `[0, 1]` extrapolate. Faces and UVs are
//! passed through untouched, so every frame shares the input's topology.
//!
//! # Example
//!
//! ```
//! use uvmorph::algo::morph::Morpher;
//! use uvmorph::mesh::primitives::cylinder;
//!
//! let morpher = Morpher::new(cylinder(24, 1.0, 2.0).unwrap());
//! let halfway = morpher.interpolate(0.5);
//! assert_eq!(halfway.num_vertices(), morpher.mesh().num_vertices());
//! assert_eq!(halfway.faces(), morpher.mesh().faces());
//! ```

use nalgebra::{Point2, Point3};
use rayon::prelude::*;

use crate::mesh::{lift_uv, UvMesh, Vertex};

use super::align::{AlignOptions, Alignment};

/// Vertex count below which the parallel path is not worth its overhead.
const PARALLEL_THRESHOLD: usize = 4096;

/// Where the rotated 3D pose is placed relative to the UV pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Rotate about the model origin: `R * p`.
    #[default]
    Origin,
    /// Rotate about the 3D centroid and move it onto the scaled UV centroid:
    /// `R * (p - c3d) + cuv * s`.
    Centroid,
}

/// Options for the morph.
#[derive(Debug, Clone)]
pub struct MorphOptions {
    /// Placement of the 3D pose.
    pub anchor: Anchor,

    /// Mirror the flat pose horizontally (`u ↦ 1 - u`) before scaling.
    /// The UVs carried to the output are never modified.
    pub flip_u: bool,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for MorphOptions {
    fn default() -> Self {
        Self {
            anchor: Anchor::Origin,
            flip_u: false,
            parallel: true,
        }
    }
}

impl MorphOptions {
    /// Set the anchor of the 3D pose.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set whether the flat pose is mirrored in `u`.
    pub fn with_flip_u(mut self, flip_u: bool) -> Self {
        self.flip_u = flip_u;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    fn use_parallel(&self, num_vertices: usize) -> bool {
        self.parallel && num_vertices >= PARALLEL_THRESHOLD
    }
}

/// Per-frame constants shared by every vertex.
struct Poser<'a> {
    alignment: &'a Alignment,
    options: &'a MorphOptions,
}

impl Poser<'_> {
    #[inline]
    fn pose_3d(&self, position: &Point3<f64>) -> Point3<f64> {
        let a = self.alignment;
        match self.options.anchor {
            Anchor::Origin => Point3::from(a.best_rotation * position.coords),
            Anchor::Centroid => Point3::from(
                a.best_rotation * (*position - a.centroid_3d)
                    + a.centroid_uv.coords * a.average_scaling,
            ),
        }
    }

    #[inline]
    fn pose_uv(&self, uv: &Point2<f64>) -> Point3<f64> {
        let uv = if self.options.flip_u {
            Point2::new(1.0 - uv.x, uv.y)
        } else {
            *uv
        };
        Point3::from(lift_uv(&uv).coords * self.alignment.average_scaling)
    }

    #[inline]
    fn blend(&self, vertex: &Vertex, t: f64) -> Point3<f64> {
        let from = self.pose_3d(&vertex.position);
        let to = self.pose_uv(&vertex.uv);
        from + (to - from) * t
    }
}

/// Write the frame positions at parameter `t` into `out`.
///
/// `out` is cleared and refilled with one position per vertex, so a buffer
/// reused across frames stops allocating once it has grown to the vertex
/// count.
pub fn interpolate_positions_into(
    mesh: &UvMesh,
    alignment: &Alignment,
    t: f64,
    options: &MorphOptions,
    out: &mut Vec<Point3<f64>>,
) {
    let poser = Poser { alignment, options };
    let vertices = mesh.vertices();

    out.clear();
    out.resize(vertices.len(), Point3::origin());

    if options.use_parallel(vertices.len()) {
        out.par_iter_mut()
            .zip(vertices.par_iter())
            .for_each(|(slot, vertex)| *slot = poser.blend(vertex, t));
    } else {
        for (slot, vertex) in out.iter_mut().zip(vertices) {
            *slot = poser.blend(vertex, t);
        }
    }
}

/// Build the mesh for the frame at parameter `t`.
///
/// The result has the same vertex count, UVs, and faces as `mesh`; only the
/// positions change.
pub fn interpolate(mesh: &UvMesh, alignment: &Alignment, t: f64, options: &MorphOptions) -> UvMesh {
    let mut positions = Vec::with_capacity(mesh.num_vertices());
    interpolate_positions_into(mesh, alignment, t, options, &mut positions);

    let vertices = positions
        .into_iter()
        .zip(mesh.vertices())
        .map(|(position, v)| Vertex::new(position, v.uv))
        .collect();

    UvMesh {
        vertices,
        faces: mesh.faces().to_vec(),
    }
}

/// The `t = 0` endpoint: every position in its 3D pose.
pub fn pose_3d(mesh: &UvMesh, alignment: &Alignment, options: &MorphOptions) -> Vec<Point3<f64>> {
    let poser = Poser { alignment, options };
    mesh.vertices().iter().map(|v| poser.pose_3d(&v.position)).collect()
}

/// The `t = 1` endpoint: every position in its flat UV pose.
pub fn pose_uv(mesh: &UvMesh, alignment: &Alignment, options: &MorphOptions) -> Vec<Point3<f64>> {
    let poser = Poser { alignment, options };
    mesh.vertices().iter().map(|v| poser.pose_uv(&v.uv)).collect()
}

/// A mesh bundled with its alignment, ready to produce frames.
///
/// The alignment is computed once on construction and never changes, so a
/// `Morpher` can be shared between threads rendering different frames.
#[derive(Debug, Clone)]
pub struct Morpher {
    mesh: UvMesh,
    alignment: Alignment,
    options: MorphOptions,
}

impl Morpher {
    /// Analyze `mesh` with default options.
    pub fn new(mesh: UvMesh) -> Self {
        Self::with_options(mesh, &AlignOptions::default(), MorphOptions::default())
    }

    /// Analyze `mesh` with the given alignment and morph options.
    pub fn with_options(mesh: UvMesh, align: &AlignOptions, options: MorphOptions) -> Self {
        let alignment = Alignment::compute_with(&mesh, align);
        Self {
            mesh,
            alignment,
            options,
        }
    }

    /// The source mesh.
    pub fn mesh(&self) -> &UvMesh {
        &self.mesh
    }

    /// The derived alignment.
    pub fn alignment(&self) -> &Alignment {
        &self.alignment
    }

    /// The morph options.
    pub fn options(&self) -> &MorphOptions {
        &self.options
    }

    /// Replace the morph options. The alignment is unaffected.
    pub fn set_options(&mut self, options: MorphOptions) {
        self.options = options;
    }

    /// The frame at parameter `t` as a new mesh.
    pub fn interpolate(&self, t: f64) -> UvMesh {
        interpolate(&self.mesh, &self.alignment, t, &self.options)
    }

    /// The frame positions at parameter `t`, written into `out`.
    pub fn interpolate_positions_into(&self, t: f64, out: &mut Vec<Point3<f64>>) {
        interpolate_positions_into(&self.mesh, &self.alignment, t, &self.options, out);
    }

    /// Positions of the `t = 0` endpoint.
    pub fn pose_3d(&self) -> Vec<Point3<f64>> {
        pose_3d(&self.mesh, &self.alignment, &self.options)
    }

    /// Positions of the `t = 1` endpoint.
    pub fn pose_uv(&self) -> Vec<Point3<f64>> {
        pose_uv(&self.mesh, &self.alignment, &self.options)
    }

    /// Consume the morpher and return its mesh.
    pub fn into_mesh(self) -> UvMesh {
        self.mesh
    }
}
