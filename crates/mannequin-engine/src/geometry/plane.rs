use super::{MeshData, Vertex};

/// Builds the unit decal quad: XY plane, facing +Z, `[-0.5, 0.5]²`.
///
/// `v = 0` is the top edge so image row 0 lands at the top of the quad.
pub fn decal_plane() -> MeshData {
    let n = [0.0, 0.0, 1.0];
    let vertices = vec![
        Vertex::new([-0.5, -0.5, 0.0], n, [0.0, 1.0]),
        Vertex::new([0.5, -0.5, 0.0], n, [1.0, 1.0]),
        Vertex::new([0.5, 0.5, 0.0], n, [1.0, 0.0]),
        Vertex::new([-0.5, 0.5, 0.0], n, [0.0, 0.0]),
    ];
    MeshData::new(vertices, Some(vec![0, 1, 2, 0, 2, 3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_edge_samples_first_row() {
        let plane = decal_plane();
        for v in &plane.vertices {
            let expected_v = if v.position[1] > 0.0 { 0.0 } else { 1.0 };
            assert_eq!(v.uv[1], expected_v);
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn two_ccw_triangles_facing_z() {
        let plane = decal_plane();
        let idx = plane.indices.as_deref().unwrap();
        assert_eq!(idx, [0, 1, 2, 0, 2, 3]);
        for tri in idx.chunks_exact(3) {
            let p = |i: u16| glam::Vec3::from(plane.vertices[i as usize].position);
            let n = (p(tri[1]) - p(tri[0])).cross(p(tri[2]) - p(tri[0]));
            assert!(n.z > 0.0);
        }
    }
}
