use crate::assets::LoadError;

use super::{MeshData, Vertex};

/// Parses a pre-triangulated OBJ-like mesh into an un-indexed triangle list.
///
/// Recognized records:
/// - `v x y z`   position
/// - `vn x y z`  normal
/// - `vt u v`    texture coordinate
/// - `f a b c …` face, each token `vertex[/uv][/normal]`, 1-based
///
/// Every face token emits exactly one vertex; faces are not fan-triangulated.
/// A uv/normal component that is empty, non-positive (`-1` marks "absent") or
/// out of range falls back to `(0, 0)` / `(0, 0, 0)`. The `v` coordinate is
/// flipped (`1 - v`) so that `v = 0` addresses the first image row.
///
/// Other record kinds (`o`, `g`, `s`, `mtllib`, `usemtl`, comments) are ignored.
pub fn parse_obj(bytes: &[u8]) -> Result<MeshData, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|e| LoadError::Malformed {
        reason: format!("mesh source is not UTF-8: {e}"),
    })?;

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut vertices: Vec<Vertex> = Vec::new();

    for (line_no, raw) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let mut fields = raw.split_whitespace();
        let Some(kind) = fields.next() else { continue };

        match kind {
            "v" => positions.push(parse_floats(fields, line_no, 3)?),
            "vn" => normals.push(parse_floats(fields, line_no, 3)?),
            "vt" => uvs.push(parse_floats(fields, line_no, 1)?),
            "f" => {
                for token in fields {
                    let mut parts = token.split('/');
                    let position = parts
                        .next()
                        .and_then(parse_index)
                        .and_then(|i| positions.get(i))
                        .ok_or_else(|| LoadError::Malformed {
                            reason: format!("line {line_no}: face token `{token}` has no valid position"),
                        })?;
                    let uv = parts.next().and_then(parse_index).and_then(|i| uvs.get(i));
                    let normal = parts.next().and_then(parse_index).and_then(|i| normals.get(i));

                    vertices.push(Vertex::new(
                        *position,
                        normal.copied().unwrap_or([0.0; 3]),
                        uv.map_or([0.0, 0.0], |&[u, v]| [u, 1.0 - v]),
                    ));
                }
            }
            _ => {}
        }
    }

    if vertices.is_empty() {
        return Err(LoadError::EmptyMesh);
    }

    log::debug!(
        "parsed mesh: {} positions, {} normals, {} uvs -> {} vertices",
        positions.len(),
        normals.len(),
        uvs.len(),
        vertices.len()
    );

    Ok(MeshData::new(vertices, None))
}

/// Converts a 1-based OBJ index into a 0-based one. Empty, zero and negative
/// components (including the `-1` sentinel) mean "absent".
fn parse_index(s: &str) -> Option<usize> {
    match s.parse::<i64>() {
        Ok(i) if i > 0 => Some((i - 1) as usize),
        _ => None,
    }
}

/// Reads up to `N` floats; at least `required` must be present. Missing
/// optional trailing components are zero.
fn parse_floats<'a, const N: usize>(
    fields: impl Iterator<Item = &'a str>,
    line_no: usize,
    required: usize,
) -> Result<[f32; N], LoadError> {
    let mut out = [0.0f32; N];
    let mut count = 0;
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().map_err(|_| LoadError::Malformed {
            reason: format!("line {line_no}: `{field}` is not a number"),
        })?;
        count += 1;
    }
    if count < required {
        return Err(LoadError::Malformed {
            reason: format!("line {line_no}: expected {required} components, found {count}"),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# one textured triangle
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 0.25
vn 0 0 1
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn emits_one_vertex_per_face_token() {
        let mesh = parse_obj(TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.as_floats().len(), 24);
        assert!(mesh.indices.is_none());
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[1].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn flips_v_coordinate() {
        let mesh = parse_obj(TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.vertices[0].uv, [0.0, 1.0]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 0.75]);
    }

    #[test]
    fn missing_components_default_to_zero() {
        let src = "v 1 2 3\nv 4 5 6\nv 7 8 9\nf 1 2//-1 3/-1/-1\n";
        let mesh = parse_obj(src.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        for v in &mesh.vertices {
            assert_eq!(v.normal, [0.0; 3]);
            assert_eq!(v.uv, [0.0, 0.0]);
        }
        assert_eq!(mesh.vertices[2].position, [7.0, 8.0, 9.0]);
    }

    #[test]
    fn out_of_range_normal_is_absent() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1//5 2//5 3//5\n";
        let mesh = parse_obj(src.as_bytes()).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0; 3]));
    }

    #[test]
    fn quad_face_is_not_fan_triangulated() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = parse_obj(src.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
    }

    #[test]
    fn no_faces_is_empty_mesh() {
        let src = "v 0 0 0\nv 1 0 0\nvn 0 0 1\n";
        assert!(matches!(parse_obj(src.as_bytes()), Err(LoadError::EmptyMesh)));
        assert!(matches!(parse_obj(b""), Err(LoadError::EmptyMesh)));
    }

    #[test]
    fn face_without_position_is_malformed() {
        let src = "v 0 0 0\nf 1 2 3\n";
        assert!(matches!(parse_obj(src.as_bytes()), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn non_utf8_is_malformed() {
        assert!(matches!(parse_obj(&[0xff, 0xfe, 0x00]), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn ignores_unknown_records() {
        let src = "o head\ng default\ns off\nusemtl skin\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        assert_eq!(parse_obj(src.as_bytes()).unwrap().vertex_count(), 3);
    }
}
