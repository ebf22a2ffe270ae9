//! # uvmorph
//!
//! Morph a textured triangle mesh between its 3D shape and a flat pose
//! built from its UV layout.
//!
//! The crate analyzes a mesh once, relating its two embeddings:
//!
//! - area-weighted centroids of the 3D surface and of the UV layout,
//! - the best-fit rotation taking the 3D shape onto the UV plane,
//! - the mean scale between UV space and model space,
//! - an enclosing sphere for display normalization.
//!
//! It then produces frames for any parameter `t`, blending each vertex from
//! its rotated 3D position (`t = 0`) to its scaled UV position (`t = 1`).
//! Topology and UVs never change, so every frame can reuse the same index
//! buffer.
//!
//! ## Quick Start
//!
//! ```
//! use uvmorph::prelude::*;
//! use nalgebra::{Point2, Point3};
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//!     Point3::new(2.0, 0.0, 2.0),
//!     Point3::new(0.0, 0.0, 2.0),
//! ];
//! let uvs = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ];
//! let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//!
//! let morpher = Morpher::new(mesh);
//! assert!((morpher.alignment().average_scaling - 2.0).abs() < 1e-12);
//!
//! let flat = morpher.interpolate(1.0);
//! assert!(flat.vertices().iter().all(|v| v.position.z.abs() < 1e-12));
//! ```
//!
//! ## Degenerate input
//!
//! Analysis and morphing never fail. Collapsed triangles, coincident UVs and
//! empty meshes fall back to identity rotation, unit scale and origin
//! centroids; the fallbacks taken are listed in
//! [`Alignment::degeneracies`](algo::Alignment::degeneracies) and logged
//! through the `log` facade.

#![warn(missing_docs)]

pub mod algo;
pub mod error;
pub mod gpu;
pub mod io;
pub mod mesh;

pub use nalgebra;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::algo::{
        AlignOptions, Alignment, Anchor, BoundingSphere, Degeneracy, MorphOptions, Morpher,
        ReflectionGuard,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, FaceId, IndexBase, UvMesh, Vertex, VertexId,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::algo::rotation::is_proper_rotation;
    use crate::{gpu, io, mesh::primitives};
    use nalgebra::{Matrix3, Point2, Point3};

    #[test]
    fn test_unit_square_pipeline() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let uvs: Vec<_> = positions.iter().map(|p| Point2::new(p.x, p.y)).collect();
        let mesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2], [0, 2, 3]]).unwrap();

        let morpher = Morpher::new(mesh);
        let a = morpher.alignment();
        assert!((a.centroid_3d - Point3::new(0.5, 0.5, 0.0)).norm() < 1e-12);
        assert!((a.best_rotation - Matrix3::identity()).norm() < 1e-9);
        assert!((a.average_scaling - 1.0).abs() < 1e-12);
        assert!((a.bounding_sphere.radius - 0.5f64.sqrt()).abs() < 1e-12);

        let frame = morpher.interpolate(0.5);
        for (out, src) in frame.vertices().iter().zip(&positions) {
            assert!((out.position - *src).norm() < 1e-9);
        }
    }

    #[test]
    fn test_obj_to_frames() {
        let mut text = Vec::new();
        io::obj::write(&primitives::cylinder(10, 1.0, 3.0).unwrap(), &mut text).unwrap();
        let mesh = io::obj::read(text.as_slice()).unwrap();

        let morpher = Morpher::new(mesh);
        assert!(morpher.alignment().is_clean());
        assert!(is_proper_rotation(&morpher.alignment().best_rotation, 1e-9));

        let mut positions = Vec::new();
        let mut packed = Vec::new();
        for i in 0..=4 {
            morpher.interpolate_positions_into(i as f64 / 4.0, &mut positions);
            gpu::pack_frame_into(morpher.mesh(), &positions, &mut packed);
            assert_eq!(packed.len(), morpher.mesh().num_vertices());
        }
    }
}
