//! Wavefront OBJ format support.
//!
//! Only the records that matter for a textured triangle mesh are read:
//! `v` (position), `vt` (texture coordinate) and `f` (face). Normals,
//! groups, materials and everything else are skipped.
//!
//! OBJ indexes positions and texture coordinates separately, while a
//! [`UvMesh`] vertex carries both. Every distinct `position/uv` pair used by
//! a face becomes one mesh vertex, so vertices on a UV seam are split. A face
//! corner without a texture index gets the UV `(0, 0)`.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point2, Point3};

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, IndexBase, UvMesh};

/// Parse a mesh from OBJ text.
///
/// # Example
///
/// ```
/// use uvmorph::io::obj;
///
/// let text = "\
/// v 0 0 0
/// v 1 0 0
/// v 1 1 0
/// v 0 1 0
/// vt 0 0
/// vt 1 0
/// vt 1 1
/// vt 0 1
/// f 1/1 2/2 3/3 4/4
/// ";
/// let mesh = obj::read(text.as_bytes()).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_faces(), 2);
/// ```
pub fn read<R: BufRead>(reader: R) -> Result<UvMesh> {
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut tex_coords: Vec<Point2<f64>> = Vec::new();

    let mut corner_map: HashMap<(usize, Option<usize>), usize> = HashMap::new();
    let mut out_positions: Vec<Point3<f64>> = Vec::new();
    let mut out_uvs: Vec<Point2<f64>> = Vec::new();
    let mut polygons: Vec<Vec<usize>> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let [x, y, z] = parse_floats::<3>(&mut tokens, line_no, "v")?;
                positions.push(Point3::new(x, y, z));
            }
            Some("vt") => {
                // `v` and `w` are optional; a missing `v` reads as 0
                let [u] = parse_floats::<1>(&mut tokens, line_no, "vt")?;
                let v = match tokens.next() {
                    Some(token) => token
                        .parse::<f64>()
                        .map_err(|_| MeshError::parse(line_no, format!("invalid number `{}`", token)))?,
                    None => 0.0,
                };
                tex_coords.push(Point2::new(u, v));
            }
            Some("f") => {
                let mut polygon = Vec::new();
                for token in tokens {
                    let (pi, ti) =
                        parse_corner(token, positions.len(), tex_coords.len(), line_no)?;
                    let index = *corner_map.entry((pi, ti)).or_insert_with(|| {
                        out_positions.push(positions[pi]);
                        out_uvs.push(ti.map_or_else(Point2::origin, |t| tex_coords[t]));
                        out_positions.len() - 1
                    });
                    polygon.push(index);
                }
                if polygon.len() < 3 {
                    return Err(MeshError::parse(
                        line_no,
                        format!("face has {} corners, need at least 3", polygon.len()),
                    ));
                }
                polygons.push(polygon);
            }
            _ => {}
        }
    }

    let untextured = corner_map.keys().filter(|(_, t)| t.is_none()).count();
    if untextured > 0 {
        log::warn!("{} face corners have no texture coordinate, using (0, 0)", untextured);
    }

    build_from_polygons(&out_positions, &out_uvs, &polygons, IndexBase::ZeroBased)
}

fn parse_floats<const N: usize>(
    tokens: &mut std::str::SplitWhitespace<'_>,
    line: usize,
    record: &str,
) -> Result<[f64; N]> {
    let mut values = [0.0; N];
    for value in values.iter_mut() {
        let token = tokens
            .next()
            .ok_or_else(|| MeshError::parse(line, format!("`{}` needs {} values", record, N)))?;
        *value = token
            .parse()
            .map_err(|_| MeshError::parse(line, format!("invalid number `{}`", token)))?;
    }
    Ok(values)
}

/// Parse one `f` corner (`p`, `p/t`, `p//n` or `p/t/n`) into 0-based indices.
fn parse_corner(
    token: &str,
    num_positions: usize,
    num_tex_coords: usize,
    line: usize,
) -> Result<(usize, Option<usize>)> {
    let mut parts = token.split('/');
    let position = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MeshError::parse(line, format!("malformed face corner `{}`", token)))?;
    let position = resolve_index(position, num_positions, line)?;

    let tex = match parts.next() {
        Some(s) if !s.is_empty() => Some(resolve_index(s, num_tex_coords, line)?),
        _ => None,
    };

    Ok((position, tex))
}

/// Resolve a 1-based or negative (relative) OBJ index to a 0-based one.
fn resolve_index(token: &str, count: usize, line: usize) -> Result<usize> {
    let raw: i64 = token
        .parse()
        .map_err(|_| MeshError::parse(line, format!("invalid index `{}`", token)))?;

    let resolved = if raw > 0 {
        raw - 1
    } else {
        count as i64 + raw
    };

    if raw == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(MeshError::parse(
            line,
            format!("index {} out of range for {} elements", raw, count),
        ));
    }
    Ok(resolved as usize)
}

/// Load a mesh from an OBJ file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<UvMesh> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mesh = read(BufReader::new(file)).map_err(|e| match e {
        MeshError::Io(_) => e,
        other => MeshError::LoadError {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    })?;
    log::info!(
        "loaded {} ({} vertices, {} faces)",
        path.display(),
        mesh.num_vertices(),
        mesh.num_faces()
    );
    Ok(mesh)
}

/// Write a mesh as OBJ text.
///
/// Each mesh vertex becomes one `v` and one `vt` record with the same index,
/// and faces are written 1-based as `f a/a b/b c/c`.
pub fn write<W: Write>(mesh: &UvMesh, mut writer: W) -> Result<()> {
    writeln!(writer, "# {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces())?;

    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.position.x, v.position.y, v.position.z)?;
    }
    for v in mesh.vertices() {
        writeln!(writer, "vt {} {}", v.uv.x, v.uv.y)?;
    }
    for face in mesh.faces() {
        let [a, b, c] = face.indices.map(|i| i as u64 + 1);
        writeln!(writer, "f {a}/{a} {b}/{b} {c}/{c}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>>(mesh: &UvMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write(mesh, BufWriter::new(file))
}
