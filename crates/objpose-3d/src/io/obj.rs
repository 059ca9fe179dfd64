use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{error::GeometryError, mesh::TriangleMesh};

/// Read the geometry of a Wavefront OBJ file.
///
/// Only `v` and `f` statements are used; texture coordinates, normals, materials and
/// groups are ignored. Polygons are triangulated as fans.
///
/// # Arguments
///
/// * `path` - The path to the OBJ file.
///
/// # Returns
///
/// The triangle mesh stored in the file.
pub fn read_obj(path: impl AsRef<Path>) -> Result<TriangleMesh, GeometryError> {
    let file = File::open(path)?;
    parse_obj(BufReader::new(file))
}

/// Parse OBJ geometry from any buffered reader.
pub fn parse_obj(reader: impl BufRead) -> Result<TriangleMesh, GeometryError> {
    let mut mesh = TriangleMesh::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => {
                let mut vertex = [0.0; 3];
                for coord in vertex.iter_mut() {
                    let token = parts
                        .next()
                        .ok_or_else(|| parse_error(lineno, "vertex with less than 3 coordinates"))?;
                    *coord = token
                        .parse()
                        .map_err(|e| parse_error(lineno, format!("{token}: {e}")))?;
                }
                mesh.vertices.push(vertex);
            }
            Some("f") => {
                let indices = parts
                    .map(|token| resolve_index(token, mesh.vertices.len(), lineno))
                    .collect::<Result<Vec<_>, _>>()?;
                if indices.len() < 3 {
                    return Err(parse_error(lineno, "face with less than 3 vertices"));
                }
                for k in 1..indices.len() - 1 {
                    mesh.faces.push([indices[0], indices[k], indices[k + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

fn parse_error(line: usize, message: impl Into<String>) -> GeometryError {
    GeometryError::MeshParse {
        line,
        message: message.into(),
    }
}

/// Turn a face token (`7`, `7/1`, `7//3`, `-1/2/3`) into a 0-based vertex index.
fn resolve_index(token: &str, num_vertices: usize, line: usize) -> Result<usize, GeometryError> {
    let vertex = token.split('/').next().unwrap_or(token);
    let index: i64 = vertex
        .parse()
        .map_err(|e| parse_error(line, format!("{token}: {e}")))?;

    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => num_vertices as i64 + i,
        _ => return Err(parse_error(line, "face index 0")),
    };

    if resolved < 0 || resolved as usize >= num_vertices {
        return Err(parse_error(
            line,
            format!("face index {index} out of range for {num_vertices} vertices"),
        ));
    }
    Ok(resolved as usize)
}
