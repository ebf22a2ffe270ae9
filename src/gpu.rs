//! Packing meshes and morph frames into GPU-ready buffers.
//!
//! No graphics API is linked. The functions here produce plain `#[repr(C)]`
//! arrays that a renderer can upload byte-for-byte with [`as_bytes`].
//! Positions are narrowed to `f32` on the way out.

use bytemuck::{Pod, Zeroable};
use nalgebra::Point3;

use crate::algo::BoundingSphere;
use crate::mesh::UvMesh;

/// Interleaved vertex: position followed by UV, 20 bytes, no padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    /// Position.
    pub position: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl GpuVertex {
    /// Byte stride between consecutive vertices.
    pub const STRIDE: usize = std::mem::size_of::<GpuVertex>();
    /// Byte offset of `uv` within a vertex.
    pub const UV_OFFSET: usize = std::mem::size_of::<[f32; 3]>();
}

#[inline]
fn to_f32(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

/// Pack every vertex of `mesh` with its own position and UV.
pub fn pack_vertices(mesh: &UvMesh) -> Vec<GpuVertex> {
    mesh.vertices()
        .iter()
        .map(|v| GpuVertex {
            position: to_f32(&v.position),
            uv: [v.uv.x as f32, v.uv.y as f32],
        })
        .collect()
}

/// Pack a morph frame: positions from `positions`, UVs from `mesh`.
///
/// `out` is cleared and refilled, so it can be reused across frames.
/// `positions` is expected to hold one entry per mesh vertex, as written by
/// [`crate::algo::morph::interpolate_positions_into`]; extra entries on
/// either side are ignored.
pub fn pack_frame_into(mesh: &UvMesh, positions: &[Point3<f64>], out: &mut Vec<GpuVertex>) {
    out.clear();
    out.extend(
        positions
            .iter()
            .zip(mesh.vertices())
            .map(|(p, v)| GpuVertex {
                position: to_f32(p),
                uv: [v.uv.x as f32, v.uv.y as f32],
            }),
    );
}

/// Flat `u32` index buffer, three entries per face.
pub fn pack_indices(mesh: &UvMesh) -> Vec<u32> {
    mesh.index_buffer()
}

/// Reinterpret a slice of plain data as bytes for upload.
pub fn as_bytes<T: Pod>(data: &[T]) -> &[u8] {
    bytemuck::cast_slice(data)
}

/// Camera framing derived from a bounding sphere, in `f32` for shaders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Point the camera looks at.
    pub center: [f32; 3],
    /// Radius of the framed region.
    pub radius: f32,
    /// Uniform scale bringing the radius to the requested target.
    pub scale: f32,
}

impl Framing {
    /// Frame `sphere` so that it has radius `target_radius` once scaled.
    pub fn from_sphere(sphere: &BoundingSphere, target_radius: f64) -> Self {
        Self {
            center: to_f32(&sphere.center),
            radius: sphere.radius as f32,
            scale: sphere.normalization_scale(target_radius) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::morph::Morpher;
    use crate::mesh::primitives;

    #[test]
    fn test_layout() {
        assert_eq!(GpuVertex::STRIDE, 20);
        assert_eq!(GpuVertex::UV_OFFSET, 12);
    }

    #[test]
    fn test_pack_vertices() {
        let mesh = primitives::grid(2).unwrap();
        let packed = pack_vertices(&mesh);
        assert_eq!(packed.len(), mesh.num_vertices());
        for (g, v) in packed.iter().zip(mesh.vertices()) {
            assert_eq!(g.position[0], v.position.x as f32);
            assert_eq!(g.uv[1], v.uv.y as f32);
        }
        assert_eq!(as_bytes(&packed).len(), packed.len() * GpuVertex::STRIDE);
    }

    #[test]
    fn test_pack_frame_into_reuses_buffer() {
        let morpher = Morpher::new(primitives::cylinder(8, 1.0, 1.0).unwrap());
        let mut positions = Vec::new();
        let mut packed = Vec::new();

        morpher.interpolate_positions_into(1.0, &mut positions);
        pack_frame_into(morpher.mesh(), &positions, &mut packed);
        assert_eq!(packed.len(), morpher.mesh().num_vertices());
        assert!(packed.iter().all(|g| g.position[2].abs() < 1e-6));

        let capacity = packed.capacity();
        morpher.interpolate_positions_into(0.0, &mut positions);
        pack_frame_into(morpher.mesh(), &positions, &mut packed);
        assert_eq!(packed.capacity(), capacity);
    }

    #[test]
    fn test_indices() {
        let mesh = primitives::plane(1.0, 0.0).unwrap();
        assert_eq!(pack_indices(&mesh), vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(as_bytes(&pack_indices(&mesh)).len(), 24);
    }

    #[test]
    fn test_framing() {
        let sphere = BoundingSphere {
            center: Point3::new(1.0, 2.0, 3.0),
            radius: 2.0,
        };
        let framing = Framing::from_sphere(&sphere, 1.0);
        assert_eq!(framing.center, [1.0, 2.0, 3.0]);
        assert_eq!(framing.scale, 0.5);
    }
}
