//! Core mesh data structures.
//!
//! This module provides [`UvMesh`], an indexed triangle mesh whose vertices
//! carry both a 3D position and a UV coordinate, together with the builder
//! functions importers use to create it and a few procedural primitives.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`FaceId`] - Identifies a face
//!
//! Face corner indices are stored as plain `u32` values so the face array can
//! be handed to a GPU index buffer unchanged.
//!
//! # Construction
//!
//! ```
//! use uvmorph::mesh::{build_from_triangles, UvMesh};
//! use nalgebra::{Point2, Point3};
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let uvs = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(0.5, 1.0),
//! ];
//!
//! let mesh: UvMesh = build_from_triangles(&positions, &uvs, &[[0, 1, 2]]).unwrap();
//! ```

mod builder;
mod index;
pub mod primitives;
mod uv_mesh;

pub use builder::{build_from_polygons, build_from_triangles, IndexBase};
pub use index::{FaceId, VertexId};
pub use uv_mesh::{lift_uv, Face, UvMesh, Vertex};
