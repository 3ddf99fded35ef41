use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::coords::{PixelRect, Rgba, Vec2};
use crate::render::SpriteVertex;

use super::{DeviceError, Gpu, MaterialId, MeshHandle, RenderDevice, TargetId, UniformValue};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

// ── uniforms ──────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct OrthoUniform {
    center: [f32; 2],
    half_size: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
struct EffectUniform {
    time: f32,
    start_time: f32,
    uv_scale: [f32; 2],
}

impl SpriteVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4, // color
        2 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

// ── resources ─────────────────────────────────────────────────────────────

struct GpuTarget {
    color: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    width: u32,
    height: u32,
}

struct GpuMesh {
    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    index_count: u32,
}

struct EffectMaterial {
    label: String,
    pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    uniforms: EffectUniform,
    input: Option<TargetId>,
}

enum GpuMaterial {
    Sprite { bind_group: wgpu::BindGroup },
    Effect(EffectMaterial),
}

/// [`RenderDevice`] backed by wgpu.
///
/// Every command is encoded and submitted on its own. Uniform writes are ordered
/// before the submit that follows them, so per-draw orthographic state needs no
/// dynamic offsets.
///
/// The presentation surface is an owned texture the size of the screen; hosts
/// copy or read it back after [`Compositor::render`](crate::compositor::Compositor::render).
pub struct WgpuDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,

    sampler: wgpu::Sampler,
    sprite_pipeline: wgpu::RenderPipeline,
    texture_bgl: wgpu::BindGroupLayout,
    effect_bgl: wgpu::BindGroupLayout,
    ortho_ubo: wgpu::Buffer,
    ortho_bind_group: wgpu::BindGroup,

    presentation: GpuTarget,
    targets: HashMap<TargetId, GpuTarget>,
    meshes: HashMap<MeshHandle, GpuMesh>,
    materials: HashMap<MaterialId, GpuMaterial>,
    next_target: u32,
    next_mesh: u32,
    next_material: u32,

    bound: Option<TargetId>,
    viewport: Option<PixelRect>,
    ortho: Option<OrthoUniform>,
}

impl WgpuDevice {
    /// Creates the device-side pipelines and a `width`x`height` presentation texture.
    pub fn new(gpu: &Gpu, width: u32, height: u32) -> Result<Self, DeviceError> {
        let device = gpu.device().clone();
        let queue = gpu.queue().clone();

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ember sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let ortho_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ember ortho bgl"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX, ortho_min_binding_size())],
        });

        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ember texture bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let effect_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("ember effect bgl"),
            entries: &[
                uniform_entry(
                    0,
                    wgpu::ShaderStages::VERTEX_FRAGMENT,
                    effect_min_binding_size(),
                ),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let ortho_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ember ortho ubo"),
            size: std::mem::size_of::<OrthoUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let ortho_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ember ortho bind group"),
            layout: &ortho_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ortho_ubo.as_entire_binding(),
            }],
        });

        let sprite_pipeline = create_sprite_pipeline(&device, &ortho_bgl, &texture_bgl);
        let presentation = create_target(&device, width, height)?;

        let mut this = Self {
            device,
            queue,
            sampler,
            sprite_pipeline,
            texture_bgl,
            effect_bgl,
            ortho_ubo,
            ortho_bind_group,
            presentation,
            targets: HashMap::new(),
            meshes: HashMap::new(),
            materials: HashMap::new(),
            next_target: 0,
            next_mesh: 0,
            next_material: 0,
            bound: None,
            viewport: None,
            ortho: None,
        };

        let white = this.create_sprite_material("ember white", &[255; 4], 1, 1)?;
        debug_assert_eq!(white, MaterialId::DEFAULT);

        Ok(this)
    }

    /// Texture the compositor blits finished viewports into.
    pub fn presentation_texture(&self) -> &wgpu::Texture {
        &self.presentation.color
    }

    /// Uploads straight-alpha RGBA8 pixels as a sprite material.
    pub fn create_sprite_material(
        &mut self,
        label: &str,
        rgba: &[u8],
        width: u32,
        height: u32,
    ) -> Result<MaterialId, DeviceError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected || expected == 0 {
            return Err(DeviceError::TextureSize { expected, actual: rgba.len() });
        }

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let id = MaterialId(self.next_material);
        self.next_material += 1;
        self.materials.insert(id, GpuMaterial::Sprite { bind_group });
        Ok(id)
    }

    /// Builds a full-screen effect from a WGSL fragment stage.
    ///
    /// `fragment_src` is appended to the effect prelude (uniforms `effect.time`,
    /// `effect.start_time`, input `input_tex`/`input_samp`) and must define
    /// `fn fs_main(in: FullscreenOut) -> @location(0) vec4<f32>`.
    pub fn create_effect(&mut self, label: &str, fragment_src: &str) -> Result<MaterialId, DeviceError> {
        if !fragment_src.contains("fn fs_main") {
            let err = DeviceError::EffectCreation {
                label: label.to_string(),
                reason: "missing `fs_main` entry point".to_string(),
            };
            log::warn!("{err}");
            return Err(err);
        }

        let source = format!("{}\n{}", include_str!("shaders/effect_prelude.wgsl"), fragment_src);
        let shader = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline_layout = self.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&self.effect_bgl],
            immediate_size: 0,
        });

        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let ubo = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<EffectUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let id = MaterialId(self.next_material);
        self.next_material += 1;
        self.materials.insert(
            id,
            GpuMaterial::Effect(EffectMaterial {
                label: label.to_string(),
                pipeline,
                ubo,
                uniforms: EffectUniform::default(),
                input: None,
            }),
        );
        log::debug!("effect `{label}` created as {id:?}");
        Ok(id)
    }

    fn bound_target(&self) -> &GpuTarget {
        match self.bound {
            Some(id) => self.targets.get(&id).unwrap_or(&self.presentation),
            None => &self.presentation,
        }
    }

    /// Pixel viewport on the bound target, clamped to its size.
    fn pass_viewport(&self, target: &GpuTarget) -> (u32, u32) {
        match self.viewport {
            Some(rect) => (rect.width.min(target.width).max(1), rect.height.min(target.height).max(1)),
            None => (target.width, target.height),
        }
    }

    fn encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    fn submit(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl RenderDevice for WgpuDevice {
    fn create_target(&mut self, width: u32, height: u32) -> Result<TargetId, DeviceError> {
        let target = create_target(&self.device, width, height)?;
        let id = TargetId(self.next_target);
        self.next_target += 1;
        self.targets.insert(id, target);
        Ok(id)
    }

    fn release_target(&mut self, target: TargetId) {
        if self.targets.remove(&target).is_none() {
            log::warn!("release_target: {}", DeviceError::UnknownTarget(target));
        }
        if self.bound == Some(target) {
            self.bound = None;
        }
    }

    fn bind_target(&mut self, target: TargetId) {
        self.bound = checked_binding(&self.targets, target);
    }

    fn unbind(&mut self) {
        self.bound = None;
        self.viewport = None;
    }

    fn set_viewport(&mut self, rect: PixelRect) {
        self.viewport = Some(rect);
    }

    fn clear_color(&mut self, color: Rgba) {
        let mut encoder = self.encoder("ember clear color");
        {
            let target = self.bound_target();
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember clear color"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: color.r as f64,
                            g: color.g as f64,
                            b: color.b as f64,
                            a: color.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.submit(encoder);
    }

    fn clear_depth(&mut self) {
        let mut encoder = self.encoder("ember clear depth");
        {
            let target = self.bound_target();
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember clear depth"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }
        self.submit(encoder);
    }

    fn begin_orthographic(&mut self, size: Vec2, center: Vec2) {
        self.ortho = Some(OrthoUniform {
            center: [center.x, center.y],
            half_size: [(size.x * 0.5).max(f32::EPSILON), (size.y * 0.5).max(f32::EPSILON)],
        });
    }

    fn end_orthographic(&mut self) {
        self.ortho = None;
    }

    fn upload_mesh(&mut self, vertices: &[SpriteVertex], indices: &[u32]) -> MeshHandle {
        let vbo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ember mesh vbo"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ember mesh ibo"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let handle = MeshHandle(self.next_mesh);
        self.next_mesh = self.next_mesh.wrapping_add(1);
        self.meshes.insert(handle, GpuMesh { vbo, ibo, index_count: indices.len() as u32 });
        handle
    }

    fn release_mesh(&mut self, mesh: MeshHandle) {
        if self.meshes.remove(&mesh).is_none() {
            log::warn!("release_mesh: {}", DeviceError::UnknownMesh(mesh));
        }
    }

    fn draw_mesh(&mut self, mesh: MeshHandle, material: MaterialId) {
        let Some(ortho) = self.ortho else {
            log::warn!("draw_mesh outside of an orthographic region; skipped");
            return;
        };
        let Some(gpu_mesh) = self.meshes.get(&mesh) else {
            log::warn!("draw_mesh: {}", DeviceError::UnknownMesh(mesh));
            return;
        };
        let Some(GpuMaterial::Sprite { bind_group }) = self.materials.get(&material) else {
            log::warn!("draw_mesh: {} is not a sprite material", DeviceError::UnknownMaterial(material));
            return;
        };
        if gpu_mesh.index_count == 0 {
            return;
        }

        self.queue.write_buffer(&self.ortho_ubo, 0, bytemuck::bytes_of(&ortho));

        let mut encoder = self.encoder("ember draw mesh");
        {
            let target = self.bound_target();
            let (vw, vh) = self.pass_viewport(target);
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_viewport(0.0, 0.0, vw as f32, vh as f32, 0.0, 1.0);
            rpass.set_pipeline(&self.sprite_pipeline);
            rpass.set_bind_group(0, &self.ortho_bind_group, &[]);
            rpass.set_bind_group(1, bind_group, &[]);
            rpass.set_vertex_buffer(0, gpu_mesh.vbo.slice(..));
            rpass.set_index_buffer(gpu_mesh.ibo.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
        }
        self.submit(encoder);
    }

    fn set_uniform(&mut self, material: MaterialId, name: &str, value: UniformValue) {
        match self.materials.get_mut(&material) {
            Some(GpuMaterial::Effect(effect)) => match (name, value) {
                ("gTime", UniformValue::Float(v)) => effect.uniforms.time = v,
                ("gStartTime", UniformValue::Float(v)) => effect.uniforms.start_time = v,
                _ => log::debug!("effect `{}` has no uniform `{name}`; ignored", effect.label),
            },
            Some(GpuMaterial::Sprite { .. }) => {
                log::trace!("sprite material {material:?} ignores uniform `{name}`");
            }
            None => log::warn!("set_uniform: {}", DeviceError::UnknownMaterial(material)),
        }
    }

    fn set_effect_input(&mut self, material: MaterialId, target: TargetId) {
        match self.materials.get_mut(&material) {
            Some(GpuMaterial::Effect(effect)) => effect.input = Some(target),
            _ => log::warn!("set_effect_input: {} is not an effect", DeviceError::UnknownMaterial(material)),
        }
    }

    fn draw_fullscreen(&mut self, material: MaterialId) {
        let Some(GpuMaterial::Effect(effect)) = self.materials.get(&material) else {
            log::warn!("draw_fullscreen: {} is not an effect", DeviceError::UnknownMaterial(material));
            return;
        };
        let Some(input) = effect.input.and_then(|id| self.targets.get(&id)) else {
            log::warn!("effect `{}` has no input target; skipped", effect.label);
            return;
        };

        let target = self.bound_target();
        let (vw, vh) = self.pass_viewport(target);
        let uniforms = EffectUniform {
            uv_scale: [vw as f32 / input.width as f32, vh as f32 / input.height as f32],
            ..effect.uniforms
        };
        self.queue.write_buffer(&effect.ubo, 0, bytemuck::bytes_of(&uniforms));

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ember effect bind group"),
            layout: &self.effect_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: effect.ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&input.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let mut encoder = self.encoder("ember effect");
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("ember effect pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_viewport(0.0, 0.0, vw as f32, vh as f32, 0.0, 1.0);
            rpass.set_pipeline(&effect.pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }
        self.submit(encoder);
    }

    fn blit(&mut self, target: TargetId, dest: PixelRect) {
        let Some(src) = self.targets.get(&target) else {
            log::warn!("blit: {}", DeviceError::UnknownTarget(target));
            return;
        };
        let dst = &self.presentation;

        // Viewports are bottom-left based; textures are top-left based.
        let width = dest.width.min(src.width).min(dst.width.saturating_sub(dest.x));
        let height = dest.height.min(src.height);
        let Some(top) = dst.height.checked_sub(dest.y + height) else {
            log::warn!("blit destination {dest:?} is outside the presentation surface");
            return;
        };
        if width == 0 || height == 0 {
            return;
        }

        let mut encoder = self.encoder("ember blit");
        encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &src.color,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: &dst.color,
                mip_level: 0,
                origin: wgpu::Origin3d { x: dest.x, y: top, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        self.submit(encoder);
    }
}

// ── construction helpers ──────────────────────────────────────────────────

fn create_target(device: &wgpu::Device, width: u32, height: u32) -> Result<GpuTarget, DeviceError> {
    let limit = device.limits().max_texture_dimension_2d;
    if width == 0 || height == 0 || width > limit || height > limit {
        return Err(DeviceError::TargetCreation {
            width,
            height,
            reason: format!("size must be within 1..={limit}"),
        });
    }

    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let color = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("ember target color"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC
            | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let depth = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("ember target depth"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    Ok(GpuTarget {
        color_view: color.create_view(&wgpu::TextureViewDescriptor::default()),
        depth_view: depth.create_view(&wgpu::TextureViewDescriptor::default()),
        color,
        width,
        height,
    })
}

fn create_sprite_pipeline(
    device: &wgpu::Device,
    ortho_bgl: &wgpu::BindGroupLayout,
    texture_bgl: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("ember sprite shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("shaders/sprite.wgsl").into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("ember sprite pipeline layout"),
        bind_group_layouts: &[ortho_bgl, texture_bgl],
        immediate_size: 0,
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("ember sprite pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[SpriteVertex::layout()],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: TARGET_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
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
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    min_binding_size: std::num::NonZeroU64,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: Some(min_binding_size),
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

// Both uniform structs are 16 bytes, so these never hit the fallback.
fn ortho_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<OrthoUniform>() as u64).unwrap_or(std::num::NonZeroU64::MIN)
}

fn effect_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<EffectUniform>() as u64).unwrap_or(std::num::NonZeroU64::MIN)
}

/// Binding for `target`, or the presentation texture (`None`) when it is unknown.
fn checked_binding<V>(targets: &HashMap<TargetId, V>, target: TargetId) -> Option<TargetId> {
    if targets.contains_key(&target) {
        Some(target)
    } else {
        log::warn!("bind_target: {}; drawing to the presentation texture", DeviceError::UnknownTarget(target));
        None
    }
}
