//! Indexed triangle mesh with per-vertex UV coordinates.
//!
//! [`UvMesh`] is a plain face-vertex list: an ordered vertex array (each
//! vertex carrying a 3D position and a UV coordinate) and an ordered array of
//! index triples. Vertex order is meaningful because faces refer to it;
//! face order only matters for rendering consistency.

use nalgebra::{Point2, Point3};

use super::index::{FaceId, VertexId};
use crate::error::{MeshError, Result};

/// A mesh vertex: a 3D position plus its UV coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space.
    pub position: Point3<f64>,
    /// Texture-space coordinate.
    pub uv: Point2<f64>,
}

impl Vertex {
    /// Create a vertex from a position and UV coordinate.
    pub fn new(position: Point3<f64>, uv: Point2<f64>) -> Self {
        Self { position, uv }
    }

    /// The UV coordinate embedded in 3-space with a zero third component.
    #[inline]
    pub fn lifted_uv(&self) -> Point3<f64> {
        lift_uv(&self.uv)
    }
}

/// Embed a UV coordinate in 3-space on the `z = 0` plane.
#[inline]
pub fn lift_uv(uv: &Point2<f64>) -> Point3<f64> {
    Point3::new(uv.x, uv.y, 0.0)
}

/// A triangle, as three 0-based indices into the vertex array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    /// Corner vertex indices, in winding order.
    pub indices: [u32; 3],
}

impl Face {
    /// Create a face from three vertex indices.
    #[inline]
    pub const fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self {
            indices: [v0, v1, v2],
        }
    }

    /// The corner indices widened to `usize` for slice access.
    #[inline]
    pub fn corners(&self) -> [usize; 3] {
        [
            self.indices[0] as usize,
            self.indices[1] as usize,
            self.indices[2] as usize,
        ]
    }

    /// The corners as typed vertex IDs.
    #[inline]
    pub fn vertex_ids(&self) -> [VertexId; 3] {
        self.indices.map(VertexId::from)
    }
}

impl From<[u32; 3]> for Face {
    #[inline]
    fn from(indices: [u32; 3]) -> Self {
        Self { indices }
    }
}

/// A triangle mesh whose vertices carry both a 3D position and a UV coordinate.
///
/// Meshes are usually created by [`build_from_triangles`](super::build_from_triangles),
/// by one of the [`io`](crate::io) loaders, or by [`primitives`](super::primitives).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UvMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
}

impl UvMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            faces: Vec::with_capacity(num_faces),
        }
    }

    /// Assemble a mesh from parts, checking every face index.
    pub fn from_parts(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// True when the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertices[v.index()].position
    }

    /// Get the UV coordinate of a vertex.
    #[inline]
    pub fn uv(&self, v: VertexId) -> &Point2<f64> {
        &self.vertices[v.index()].uv
    }

    /// All vertices, in index order.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All faces, in index order.
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    /// The 3D corner positions of a face.
    pub fn face_positions(&self, f: FaceId) -> [Point3<f64>; 3] {
        self.faces[f.index()]
            .corners()
            .map(|i| self.vertices[i].position)
    }

    /// The UV corners of a face, lifted onto the `z = 0` plane.
    pub fn face_uvs(&self, f: FaceId) -> [Point3<f64>; 3] {
        self.faces[f.index()]
            .corners()
            .map(|i| self.vertices[i].lifted_uv())
    }

    /// Iterate over every face-vertex occurrence.
    ///
    /// A vertex shared by several faces is yielded once per face, which is
    /// the triangle-soup weighting the alignment accumulates over.
    pub fn corner_vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.faces
            .iter()
            .flat_map(move |face| face.corners().into_iter().map(move |i| &self.vertices[i]))
    }

    /// Flattened `u32` index list (three entries per face).
    pub fn index_buffer(&self) -> Vec<u32> {
        self.faces.iter().flat_map(|f| f.indices).collect()
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point3<f64>, uv: Point2<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position, uv));
        id
    }

    /// Add a triangle over existing vertices and return its ID.
    pub fn add_face(&mut self, v0: VertexId, v1: VertexId, v2: VertexId) -> Result<FaceId> {
        let id = FaceId::new(self.faces.len());
        for v in [v0, v1, v2] {
            if v.index() >= self.vertices.len() {
                return Err(MeshError::InvalidVertexIndex {
                    face: id.index(),
                    vertex: v.index(),
                });
            }
        }
        self.faces.push(Face::new(v0.raw(), v1.raw(), v2.raw()));
        Ok(id)
    }

    // ==================== Validation ====================

    /// Check that every face index refers to an existing vertex.
    pub fn validate(&self) -> Result<()> {
        let n = self.vertices.len();
        for (fi, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.corners().iter().find(|&&vi| vi >= n) {
                return Err(MeshError::InvalidVertexIndex {
                    face: fi,
                    vertex: bad,
                });
            }
        }
        Ok(())
    }
}
