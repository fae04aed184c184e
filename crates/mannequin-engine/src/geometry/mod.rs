//! CPU-side geometry.
//!
//! Every mesh uses the same interleaved layout (`Vertex`, 8 floats per
//! vertex). Procedural shapes carry an index buffer; parsed meshes are plain
//! triangle lists.

mod cube;
mod mesh;
mod obj;
mod plane;
mod vertex;

pub use cube::unit_cube;
pub use mesh::MeshData;
pub use obj::parse_obj;
pub use plane::decal_plane;
pub use vertex::{Vertex, VERTEX_STRIDE_FLOATS};
