use super::{MeshData, Vertex};

/// One cube face: outward normal and its four corners, counter-clockwise when
/// seen from outside. Corner order matches the UV order below.
struct Face {
    normal: [f32; 3],
    corners: [[f32; 3]; 4],
}

const H: f32 = 0.5;

const FACES: [Face; 6] = [
    // -Z
    Face {
        normal: [0.0, 0.0, -1.0],
        corners: [[H, -H, -H], [-H, -H, -H], [-H, H, -H], [H, H, -H]],
    },
    // +Z
    Face {
        normal: [0.0, 0.0, 1.0],
        corners: [[-H, -H, H], [H, -H, H], [H, H, H], [-H, H, H]],
    },
    // -Y
    Face {
        normal: [0.0, -1.0, 0.0],
        corners: [[-H, -H, -H], [H, -H, -H], [H, -H, H], [-H, -H, H]],
    },
    // +Y
    Face {
        normal: [0.0, 1.0, 0.0],
        corners: [[-H, H, H], [H, H, H], [H, H, -H], [-H, H, -H]],
    },
    // -X
    Face {
        normal: [-1.0, 0.0, 0.0],
        corners: [[-H, -H, -H], [-H, -H, H], [-H, H, H], [-H, H, -H]],
    },
    // +X
    Face {
        normal: [1.0, 0.0, 0.0],
        corners: [[H, -H, H], [H, -H, -H], [H, H, -H], [H, H, H]],
    },
];

const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Builds the unit cube (`[-0.5, 0.5]³`) used for the torso and limbs.
///
/// Faces do not share vertices: 24 vertices, each face with its own normal
/// and a full `[0,0]-[1,1]` UV square, and 36 indices (two triangles per
/// face, `0-1-2 / 0-2-3`).
pub fn unit_cube() -> MeshData {
    let mut vertices = Vec::with_capacity(FACES.len() * 4);
    let mut indices = Vec::with_capacity(FACES.len() * 6);

    for face in &FACES {
        let start = vertices.len() as u16;
        for (corner, uv) in face.corners.iter().zip(FACE_UVS) {
            vertices.push(Vertex::new(*corner, face.normal, uv));
        }
        indices.extend_from_slice(&[start, start + 1, start + 2, start, start + 2, start + 3]);
    }

    MeshData::new(vertices, Some(indices))
}
