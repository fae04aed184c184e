//! Headless GPU device and the wgpu implementation of [`Backend`].
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a surface
//! - owning offscreen color + depth targets
//! - reading the color target back into CPU memory
//!
//! [`Backend`]: crate::render::Backend

mod backend;
mod gpu;
mod init;
mod readback;

pub use backend::GpuBackend;
pub use gpu::Gpu;
pub use init::GpuInit;
