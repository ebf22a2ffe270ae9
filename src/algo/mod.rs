//! Alignment and morph algorithms.
//!
//! - [`area`]: triangle areas, area-weighted centroids, per-face metrics
//! - [`rotation`]: cross-covariance and best-fit rotation (orthogonal Procrustes)
//! - [`scale`]: mean UV-to-model scaling
//! - [`bounds`]: enclosing sphere for display normalization
//! - [`align`]: runs the analyses above once per mesh
//! - [`morph`]: per-frame interpolation between the 3D and UV poses

pub mod align;
pub mod area;
pub mod bounds;
pub mod morph;
pub mod rotation;
pub mod scale;

pub use align::{AlignOptions, Alignment, Degeneracy};
pub use bounds::BoundingSphere;
pub use morph::{Anchor, MorphOptions, Morpher};
pub use rotation::ReflectionGuard;
