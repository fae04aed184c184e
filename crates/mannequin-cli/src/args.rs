use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "mannequin")]
#[command(about = "Render a humanoid avatar to a PNG")]
#[command(version)]
pub struct Cli {
    /// Avatar description (colors, decals, hats, dimensions) as JSON
    #[arg(long)]
    pub avatar: Option<PathBuf>,

    /// Directory mesh and texture paths are resolved against
    #[arg(long, default_value = ".")]
    pub assets: PathBuf,

    #[arg(long, default_value_t = 512)]
    pub width: u32,

    #[arg(long, default_value_t = 512)]
    pub height: u32,

    /// Head mesh (OBJ), relative to --assets
    #[arg(long, default_value = "head.obj")]
    pub head: String,

    /// Render without a head mesh
    #[arg(long, conflicts_with = "head")]
    pub no_head: bool,

    #[arg(long, value_enum, default_value_t = BackendKind::Software)]
    pub backend: BackendKind,

    /// Orbit radius
    #[arg(long)]
    pub radius: Option<f32>,

    /// Orbit polar angle in radians, measured from +Y
    #[arg(long)]
    pub polar: Option<f32>,

    /// Orbit azimuth in radians, measured from +Z towards +X
    #[arg(long)]
    pub azimuth: Option<f32>,

    /// Print the draw stream before rendering
    #[arg(long)]
    pub dump_draws: bool,

    /// Log filter, env_logger syntax (falls back to RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,

    /// Output PNG
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum BackendKind {
    /// CPU rasterizer, deterministic
    Software,
    /// Headless wgpu
    Gpu,
}
