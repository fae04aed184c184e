//! `mannequin`: renders an avatar to a PNG.

mod args;
mod avatar_file;

use anyhow::{Context, Result};
use clap::Parser;

use mannequin_engine::assets::DirAssets;
use mannequin_engine::camera::OrbitParams;
use mannequin_engine::device::{GpuBackend, GpuInit};
use mannequin_engine::logging::{LoggingConfig, init_logging};
use mannequin_engine::render::Backend;
use mannequin_engine::render::raster::SoftwareBackend;
use mannequin_engine::{AvatarRenderer, RendererConfig};

use args::{BackendKind, Cli};
use avatar_file::AvatarFile;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..LoggingConfig::default()
    });

    let avatar = match &cli.avatar {
        Some(path) => AvatarFile::load(path)?,
        None => AvatarFile::default(),
    };

    match cli.backend {
        BackendKind::Software => run(SoftwareBackend::new(), &cli, avatar),
        BackendKind::Gpu => {
            let backend = GpuBackend::new(GpuInit::default()).context("gpu backend unavailable")?;
            let info = backend.gpu().adapter_info();
            log::info!("gpu adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);
            run(backend, &cli, avatar)
        }
    }
}

/// Camera orbit from the command line, checked before any backend work.
fn orbit_params(cli: &Cli) -> Result<OrbitParams> {
    let defaults = OrbitParams::default();
    let orbit = OrbitParams {
        radius: cli.radius.unwrap_or(defaults.radius),
        polar: cli.polar.unwrap_or(defaults.polar),
        azimuth: cli.azimuth.unwrap_or(defaults.azimuth),
        ..defaults
    };
    orbit.validate().context("invalid camera orbit")?;
    Ok(orbit)
}


fn run<B: Backend>(backend: B, cli: &Cli, avatar: AvatarFile) -> Result<()> {
    let orbit = orbit_params(cli)?;
    let config = RendererConfig {
        width: cli.width,
        height: cli.height,
        head_mesh: (!cli.no_head).then(|| cli.head.clone()),
        orbit,
        ..RendererConfig::default()
    };

    let mut renderer = AvatarRenderer::new(backend, DirAssets::new(&cli.assets), config)?;
    avatar.apply(&mut renderer);

    if cli.dump_draws {
        for item in renderer.draw_list().iter() {
            let mesh = item.cmd.mesh();
            let p = item.cmd.placement();
            println!(
                "{:<11} {:>5} verts  pos [{:.3}, {:.3}, {:.3}]  scale [{:.3}, {:.3}, {:.3}]",
                item.tag.to_string(),
                mesh.vertex_count(),
                p.position.x,
                p.position.y,
                p.position.z,
                p.scale.x,
                p.scale.y,
                p.scale.z,
            );
        }
    }

    let image = renderer.render()?;
    image
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    log::info!("wrote {} ({}x{})", cli.output.display(), image.width(), image.height());
    Ok(())
}
