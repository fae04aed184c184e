//! `AvatarRenderer`: the façade tying assets, avatar state, layout, camera and
//! a render backend together.

use anyhow::{Context, Result, ensure};
use image::RgbaImage;

use crate::assets::AssetSource;
use crate::avatar::{AvatarConfig, HatAttachment, HatConfig, resolve_mesh, resolve_texture};
use crate::camera::{Camera, OrbitParams};
use crate::framebuffer::extract_image;
use crate::geometry::{decal_plane, unit_cube};
use crate::paint::Rgb;
use crate::render::{Backend, Mesh, RenderCtx};
use crate::scene::layout::{decal_placement, hat_placement, part_placement};
use crate::scene::{
    BodyPart, CubeCmd, DecalPlaneCmd, DecalSlot, Dimensions, DrawCmd, DrawList, DrawTag, MeshCmd,
};

/// Construction parameters for [`AvatarRenderer`].
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub width: u32,
    pub height: u32,
    /// Head mesh path, resolved through the asset source. `None` renders a
    /// headless avatar.
    pub head_mesh: Option<String>,
    pub dimensions: Dimensions,
    pub orbit: OrbitParams,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            head_mesh: Some("head.obj".to_string()),
            dimensions: Dimensions::default(),
            orbit: OrbitParams::default(),
        }
    }
}

/// Composites and renders a single avatar.
///
/// Geometry and camera are built once in [`new`](Self::new). Setters mutate
/// the avatar between renders and release the backend resources they replace.
pub struct AvatarRenderer<B: Backend> {
    backend: B,
    assets: Box<dyn AssetSource>,

    width: u32,
    height: u32,
    camera: Camera,

    cube: Mesh,
    plane: Mesh,

    avatar: AvatarConfig,
    dimensions: Dimensions,
    hats: Vec<HatAttachment>,
}

impl<B: Backend> AvatarRenderer<B> {
    /// Uploads the procedural cube and decal plane, builds the camera and
    /// resolves the head mesh.
    ///
    /// A head mesh that fails to load is not an error: the avatar renders
    /// without a head.
    pub fn new(mut backend: B, assets: impl AssetSource + 'static, config: RendererConfig) -> Result<Self> {
        ensure!(
            config.width > 0 && config.height > 0,
            "output size must be positive, got {}x{}",
            config.width,
            config.height
        );
        config.orbit.validate().context("invalid camera orbit")?;

        let cube = backend.upload_mesh(&unit_cube()).context("failed to upload cube mesh")?;
        let plane = backend.upload_mesh(&decal_plane()).context("failed to upload decal plane")?;
        let camera = Camera::orbit(&config.orbit, config.width, config.height);

        let assets: Box<dyn AssetSource> = Box::new(assets);
        let head_mesh = config
            .head_mesh
            .as_deref()
            .and_then(|path| resolve_mesh(&mut backend, assets.as_ref(), path));

        log::info!(
            "avatar renderer {}x{}, head mesh {}",
            config.width,
            config.height,
            if head_mesh.is_some() { "loaded" } else { "absent" }
        );

        Ok(Self {
            backend,
            assets,
            width: config.width,
            height: config.height,
            camera,
            cube,
            plane,
            avatar: AvatarConfig { head_mesh, ..AvatarConfig::default() },
            dimensions: config.dimensions,
            hats: Vec::new(),
        })
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn avatar(&self) -> &AvatarConfig {
        &self.avatar
    }

    pub fn hats(&self) -> &[HatAttachment] {
        &self.hats
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ── setters ──────────────────────────────────────────────────────────

    /// Sets a part color by key (`head`, `torso`, `leftArm`, ...). Unknown
    /// keys are ignored.
    pub fn set_part_color(&mut self, key: &str, color: impl Into<Rgb>) {
        match key.parse::<BodyPart>() {
            Ok(part) => self.set_color(part, color.into()),
            Err(err) => log::debug!("set_part_color: {err}; ignored"),
        }
    }

    pub fn set_color(&mut self, part: BodyPart, color: Rgb) {
        self.avatar.colors.set(part, color);
    }

    /// Loads a decal for `head` or `torso`. Any other key is ignored without
    /// touching the asset source.
    pub fn set_part_decal(&mut self, key: &str, path: &str) {
        match key.parse::<BodyPart>().map(BodyPart::decal_slot) {
            Ok(Some(slot)) => self.set_decal(slot, path),
            Ok(None) => log::debug!("set_part_decal: {key} does not take decals; ignored"),
            Err(err) => log::debug!("set_part_decal: {err}; ignored"),
        }
    }

    /// Replaces the decal in `slot`. On load failure the slot ends up empty.
    pub fn set_decal(&mut self, slot: DecalSlot, path: &str) {
        let texture = resolve_texture(&mut self.backend, self.assets.as_ref(), path);
        if let Some(old) = std::mem::replace(self.avatar.decal_mut(slot), texture) {
            self.backend.release_texture(old);
        }
    }

    pub fn clear_decal(&mut self, slot: DecalSlot) {
        if let Some(old) = self.avatar.decal_mut(slot).take() {
            self.backend.release_texture(old);
        }
    }

    /// Replaces the whole hat list.
    ///
    /// Every hat is resolved before the old list is released, so the list is
    /// never observed half-replaced.
    pub fn set_hat(&mut self, config: impl Into<HatConfig>) {
        let head_color = self.avatar.colors.get(BodyPart::Head);

        let hats: Vec<HatAttachment> = config
            .into()
            .into_vec()
            .into_iter()
            .map(|desc| {
                let mesh = match desc.mesh.as_deref() {
                    Some(path) => resolve_mesh(&mut self.backend, self.assets.as_ref(), path),
                    None => {
                        log::warn!("hat without a mesh path; it will not be drawn");
                        None
                    }
                };
                let texture = desc
                    .texture
                    .as_deref()
                    .and_then(|path| resolve_texture(&mut self.backend, self.assets.as_ref(), path));
                HatAttachment {
                    mesh,
                    texture,
                    scale: desc.scale.unwrap_or(glam::Vec3::ONE),
                    position: desc.position.unwrap_or(glam::Vec3::ZERO),
                    color: desc.color.unwrap_or(head_color),
                }
            })
            .collect();

        for old in std::mem::replace(&mut self.hats, hats) {
            self.release_hat(old);
        }
    }

    /// Replaces the head mesh. A failed load leaves the avatar headless.
    pub fn set_head_mesh(&mut self, path: &str) {
        let mesh = resolve_mesh(&mut self.backend, self.assets.as_ref(), path);
        if let Some(old) = std::mem::replace(&mut self.avatar.head_mesh, mesh) {
            self.backend.release_mesh(old);
        }
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.dimensions = dimensions;
    }

    fn release_hat(&mut self, hat: HatAttachment) {
        if let Some(mesh) = hat.mesh {
            self.backend.release_mesh(mesh);
        }
        if let Some(texture) = hat.texture {
            self.backend.release_texture(texture);
        }
    }

    // ── frame ────────────────────────────────────────────────────────────

    /// Builds the draw stream for the current state.
    ///
    /// Order: torso, torso decal, arms, legs, head, head decal, hats.
    pub fn draw_list(&self) -> DrawList {
        let dims = &self.dimensions;
        let colors = &self.avatar.colors;
        let mut list = DrawList::new();

        let cube = |part: BodyPart| {
            DrawCmd::Cube(CubeCmd {
                mesh: self.cube,
                placement: part_placement(part, dims),
                color: colors.get(part),
                lighting: true,
            })
        };
        let decal = |slot: DecalSlot| {
            self.avatar.decal(slot).map(|texture| {
                DrawCmd::DecalPlane(DecalPlaneCmd {
                    mesh: self.plane,
                    placement: decal_placement(slot, dims),
                    texture,
                })
            })
        };

        list.push(DrawTag::Torso, cube(BodyPart::Torso));
        if let Some(cmd) = decal(DecalSlot::Torso) {
            list.push(DrawTag::TorsoDecal, cmd);
        }

        list.push(DrawTag::LeftArm, cube(BodyPart::LeftArm));
        list.push(DrawTag::RightArm, cube(BodyPart::RightArm));
        list.push(DrawTag::LeftLeg, cube(BodyPart::LeftLeg));
        list.push(DrawTag::RightLeg, cube(BodyPart::RightLeg));

        if let Some(mesh) = self.avatar.head_mesh {
            list.push(
                DrawTag::Head,
                DrawCmd::Mesh(MeshCmd {
                    mesh,
                    placement: part_placement(BodyPart::Head, dims),
                    color: colors.get(BodyPart::Head),
                    decal: None,
                    lighting: true,
                }),
            );
        }
        if let Some(cmd) = decal(DecalSlot::Head) {
            list.push(DrawTag::HeadDecal, cmd);
        }

        for (i, hat) in self.hats.iter().enumerate() {
            let Some(mesh) = hat.mesh else { continue };
            list.push(
                DrawTag::Hat(i),
                DrawCmd::Mesh(MeshCmd {
                    mesh,
                    placement: hat_placement(hat.position, hat.scale, dims),
                    color: hat.color,
                    decal: hat.texture,
                    lighting: true,
                }),
            );
        }

        list
    }

    /// Renders the avatar and returns a top-down RGBA image.
    pub fn render(&mut self) -> Result<RgbaImage> {
        let list = self.draw_list();
        let ctx = RenderCtx::new(&self.camera, self.width, self.height);
        log::debug!("render {}x{}: {} draws", self.width, self.height, list.len());

        let fb = self.backend.execute(&ctx, &list).context("backend failed to execute frame")?;
        extract_image(&fb)
    }
}
