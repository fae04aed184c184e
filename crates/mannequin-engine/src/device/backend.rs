use std::num::NonZeroU64;

use anyhow::{Context, Result, ensure};
use bytemuck::{Pod, Zeroable};
use slotmap::SlotMap;
use wgpu::util::DeviceExt;

use crate::assets::TextureImage;
use crate::framebuffer::{Framebuffer, RowOrigin};
use crate::geometry::{MeshData, Vertex};
use crate::render::{Backend, DepthMode, DrawState, Mesh, MeshHandle, RenderCtx, TextureHandle};
use crate::scene::DrawList;

use super::readback::read_texture_rgba8;
use super::{Gpu, GpuInit};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Per-draw uniform block. Layout matches `DrawUniform` in `avatar.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct DrawUniform {
    mvp: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color: [f32; 4],
    light_dir: [f32; 4],
    flags: [u32; 4],
}

impl DrawUniform {
    fn from_state(state: &DrawState, has_decal: bool) -> Self {
        Self {
            mvp: state.mvp.to_cols_array_2d(),
            model: state.model.to_cols_array_2d(),
            color: state.color.to_vec3().extend(1.0).to_array(),
            light_dir: state.light_dir.extend(0.0).to_array(),
            flags: [has_decal as u32, 0, 0, 0],
        }
    }
}

const DRAW_UNIFORM_SIZE: u64 = std::mem::size_of::<DrawUniform>() as u64;

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRS,
    }
}

/// `src·a + dst·(1 − a)` on color and alpha alike.
fn straight_alpha_blend() -> wgpu::BlendState {
    let c = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState { color: c, alpha: c }
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: Option<wgpu::Buffer>,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Offscreen color + depth pair sized to the last render.
struct OffscreenTargets {
    width: u32,
    height: u32,
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl OffscreenTargets {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("mannequin color target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COLOR_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("mannequin depth target"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        Self {
            width,
            height,
            color_view: color.create_view(&wgpu::TextureViewDescriptor::default()),
            depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
            color,
        }
    }
}

/// Dynamic-offset uniform ring, one slot per draw.
struct UniformArena {
    stride: u64,
    capacity: usize,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// wgpu implementation of [`Backend`]: renders offscreen and reads the color
/// target back top-down.
pub struct GpuBackend {
    gpu: Gpu,

    opaque_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,

    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    uniforms: Option<UniformArena>,
    targets: Option<OffscreenTargets>,

    meshes: SlotMap<MeshHandle, GpuMesh>,
    textures: SlotMap<TextureHandle, GpuTexture>,

    /// Bound when a draw has no decal so the bind group layout stays uniform.
    white: GpuTexture,
}

impl GpuBackend {
    /// Acquires a headless device and builds the pipelines.
    pub fn new(init: GpuInit) -> Result<Self> {
        Ok(Self::with_gpu(Gpu::new_blocking(init)?))
    }

    /// Builds the pipelines on an existing device.
    ///
    /// Shader validation errors surface through wgpu's uncaptured error
    /// handler and are fatal.
    pub fn with_gpu(gpu: Gpu) -> Self {
        let device = gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mannequin avatar shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/avatar.wgsl").into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mannequin draw uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(DRAW_UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mannequin decal bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mannequin avatar pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        let make_pipeline = |label: &str, depth: DepthMode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[vertex_layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: COLOR_FORMAT,
                        blend: Some(straight_alpha_blend()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth.writes_depth(),
                    depth_compare: match depth {
                        DepthMode::Opaque => wgpu::CompareFunction::Less,
                        DepthMode::Overlay => wgpu::CompareFunction::LessEqual,
                    },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            })
        };

        let opaque_pipeline = make_pipeline("mannequin opaque pipeline", DepthMode::Opaque);
        let overlay_pipeline = make_pipeline("mannequin decal pipeline", DepthMode::Overlay);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mannequin decal sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white = create_texture(&gpu, &texture_layout, &sampler, &TextureImage::solid(1, 1, [255; 4]));

        Self {
            gpu,
            opaque_pipeline,
            overlay_pipeline,
            uniform_layout,
            texture_layout,
            sampler,
            uniforms: None,
            targets: None,
            meshes: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            white,
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    fn ensure_targets(&mut self, width: u32, height: u32) {
        if self.targets.as_ref().is_some_and(|t| t.width == width && t.height == height) {
            return;
        }
        self.targets = Some(OffscreenTargets::new(self.gpu.device(), width, height));
    }

    fn ensure_uniforms(&mut self, draws: usize) {
        if self.uniforms.as_ref().is_some_and(|u| u.capacity >= draws) {
            return;
        }
        let device = self.gpu.device();
        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = DRAW_UNIFORM_SIZE.div_ceil(align) * align;
        let capacity = draws.max(16).next_power_of_two();

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mannequin draw uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mannequin draw uniform bind group"),
            layout: &self.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(DRAW_UNIFORM_SIZE),
                }),
            }],
        });

        self.uniforms = Some(UniformArena { stride, capacity, buffer, bind_group });
    }
}

fn create_texture(
    gpu: &Gpu,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &TextureImage,
) -> GpuTexture {
    let (width, height) = (image.width(), image.height());
    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };

    let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("mannequin decal texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    gpu.queue().write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.pixels(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("mannequin decal bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry { binding: 0, resource: wgpu::BindingResource::TextureView(&view) },
            wgpu::BindGroupEntry { binding: 1, resource: wgpu::BindingResource::Sampler(sampler) },
        ],
    });

    GpuTexture { _texture: texture, bind_group }
}

impl Backend for GpuBackend {
    fn upload_mesh(&mut self, data: &MeshData) -> Result<Mesh> {
        ensure!(!data.is_empty(), "cannot upload an empty mesh");
        let device = self.gpu.device();

        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mannequin mesh vbo"),
            contents: bytemuck::cast_slice(&data.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let ibo = match &data.indices {
            Some(indices) => {
                let n = data.vertices.len();
                ensure!(
                    indices.iter().all(|&i| (i as usize) < n),
                    "index buffer references vertices past {n}"
                );
                Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mannequin mesh ibo"),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                }))
            }
            None => None,
        };

        let id = self.meshes.insert(GpuMesh { vbo, ibo });
        Ok(Mesh::new(id, data))
    }

    fn release_mesh(&mut self, mesh: Mesh) {
        match self.meshes.remove(mesh.handle()) {
            Some(m) => {
                m.vbo.destroy();
                if let Some(ibo) = m.ibo {
                    ibo.destroy();
                }
            }
            None => log::debug!("release of unknown mesh {:?}", mesh.handle()),
        }
    }

    fn upload_texture(&mut self, image: &TextureImage) -> Result<TextureHandle> {
        let limit = self.gpu.device().limits().max_texture_dimension_2d;
        ensure!(
            image.width() <= limit && image.height() <= limit,
            "texture {}x{} exceeds device limit {limit}",
            image.width(),
            image.height()
        );
        let tex = create_texture(&self.gpu, &self.texture_layout, &self.sampler, image);
        Ok(self.textures.insert(tex))
    }

    fn release_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(texture).is_none() {
            log::debug!("release of unknown texture {texture:?}");
        }
    }

    fn execute(&mut self, ctx: &RenderCtx, list: &DrawList) -> Result<Framebuffer> {
        ensure!(ctx.width > 0 && ctx.height > 0, "render target has zero size");

        self.ensure_targets(ctx.width, ctx.height);
        self.ensure_uniforms(list.len());

        let (Some(targets), Some(uniforms)) = (self.targets.as_ref(), self.uniforms.as_ref()) else {
            anyhow::bail!("gpu targets were not created");
        };

        // Resolve every draw first so uniforms go up in one write.
        struct Prepared<'a> {
            slot: u32,
            mesh: Mesh,
            gpu_mesh: &'a GpuMesh,
            decal: &'a wgpu::BindGroup,
            depth: DepthMode,
        }

        let mut staging = vec![0u8; (uniforms.stride * list.len() as u64) as usize];
        let mut prepared = Vec::with_capacity(list.len());

        for item in list.iter() {
            let state = DrawState::resolve(&item.cmd, ctx);

            let Some(gpu_mesh) = self.meshes.get(state.mesh.handle()) else {
                log::warn!("{}: mesh {:?} is not resident; skipped", item.tag, state.mesh.handle());
                continue;
            };

            let decal = match state.decal {
                None => None,
                Some(handle) => match self.textures.get(handle) {
                    Some(tex) => Some(tex),
                    None if state.depth == DepthMode::Overlay => {
                        log::warn!("{}: decal texture {handle:?} is not resident; skipped", item.tag);
                        continue;
                    }
                    None => {
                        log::warn!("{}: decal texture {handle:?} is not resident; drawing without it", item.tag);
                        None
                    }
                },
            };

            let slot = prepared.len() as u32;
            let offset = (uniforms.stride * slot as u64) as usize;
            let uniform = DrawUniform::from_state(&state, decal.is_some());
            staging[offset..offset + DRAW_UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(&uniform));

            prepared.push(Prepared {
                slot,
                mesh: state.mesh,
                gpu_mesh,
                decal: &decal.unwrap_or(&self.white).bind_group,
                depth: state.depth,
            });
        }

        if !staging.is_empty() {
            self.gpu.queue().write_buffer(&uniforms.buffer, 0, &staging);
        }

        let mut encoder = self.gpu.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mannequin frame encoder"),
        });

        {
            let clear = ctx.clear;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mannequin avatar pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &targets.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for draw in &prepared {
                let pipeline = match draw.depth {
                    DepthMode::Opaque => &self.opaque_pipeline,
                    DepthMode::Overlay => &self.overlay_pipeline,
                };
                rpass.set_pipeline(pipeline);
                let dynamic_offset = (uniforms.stride * draw.slot as u64) as u32;
                rpass.set_bind_group(0, &uniforms.bind_group, &[dynamic_offset]);
                rpass.set_bind_group(1, draw.decal, &[]);
                rpass.set_vertex_buffer(0, draw.gpu_mesh.vbo.slice(..));

                match (&draw.gpu_mesh.ibo, draw.mesh.index_count()) {
                    (Some(ibo), Some(count)) => {
                        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
                        rpass.draw_indexed(0..count, 0, 0..1);
                    }
                    _ => rpass.draw(0..draw.mesh.vertex_count(), 0..1),
                }
            }
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));

        let pixels = read_texture_rgba8(self.gpu.device(), self.gpu.queue(), &targets.color, ctx.width, ctx.height)
            .context("failed to read back color target")?;

        Ok(Framebuffer {
            width: ctx.width,
            height: ctx.height,
            origin: RowOrigin::TopLeft,
            pixels,
        })
    }
}
