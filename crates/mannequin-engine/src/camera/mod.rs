//! Fixed orbit camera and headlight.
//!
//! The camera is computed once when a renderer is built; every render reuses
//! the same view/projection and light direction.

mod orbit;

pub use orbit::{Camera, OrbitParams};
