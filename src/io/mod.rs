//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save |
//! |--------|-----------|------|------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ |
//! | glTF | `.gltf`, `.glb` | ✓ | ✗ |
//!
//! Both formats carry texture coordinates, which every [`UvMesh`] needs.
//!
//! ```no_run
//! use uvmorph::io::{load, save};
//!
//! let mesh = load("model.glb").unwrap();
//! save(&mesh, "model.obj").unwrap();
//! ```

pub mod gltf;
pub mod obj;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::UvMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// glTF format.
    Gltf,
    /// glTF binary format.
    Glb,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "gltf" => Some(Format::Gltf),
            "glb" => Some(Format::Glb),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    fn detect(path: &Path) -> Result<Format> {
        Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("(none)")
                .to_string(),
        })
    }
}

/// Load a mesh, choosing the format by file extension.
pub fn load<P: AsRef<Path>>(path: P) -> Result<UvMesh> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Obj => obj::load(path),
        Format::Gltf | Format::Glb => gltf::load(path),
    }
}

/// Save a mesh, choosing the format by file extension.
pub fn save<P: AsRef<Path>>(mesh: &UvMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match Format::detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Gltf | Format::Glb => Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: "glTF saving is not supported".to_string(),
        }),
    }
}
