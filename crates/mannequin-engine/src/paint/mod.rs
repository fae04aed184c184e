//! Color model shared by the avatar description and the renderers.
//!
//! Colors are straight alpha and linear. Blending follows the classic
//! `src * src_alpha + dst * (1 - src_alpha)` policy, so no premultiplication
//! happens on the CPU side.

pub mod color;

pub use color::{Rgb, Rgba, unorm8};
