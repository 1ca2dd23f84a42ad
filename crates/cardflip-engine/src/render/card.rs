//! Textured card-face renderer.
//!
//! Each face is a unit quad scaled and placed by its model matrix, sampled
//! from its own [`GpuImage`]. Faces are sorted back-to-front and drawn with
//! back-face culling, so a card's hidden side never shows through.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::render::common::{
    premul_alpha_blend, uniform_min_binding_size, QuadVertex, QUAD_INDICES, QUAD_VERTICES,
};
use crate::render::{RenderCtx, RenderTarget};

/// A face texture resident on the GPU.
///
/// Owns the texture; [`GpuImage::destroy`] frees it immediately instead of
/// waiting for the last handle to drop.
pub struct GpuImage {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl GpuImage {
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Releases the GPU memory backing this image.
    pub fn destroy(self) {
        self.texture.destroy();
    }
}

impl std::fmt::Debug for GpuImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Scene lighting applied to every face.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub directional: f32,
    /// Position of the directional light; it shines toward the origin.
    pub direction: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.8,
            directional: 0.5,
            direction: Vec3::new(5.0, 5.0, 5.0),
        }
    }
}

/// One face to draw this frame.
pub struct FaceDraw<'a> {
    /// Maps the unit quad `[-0.5, 0.5]²` (facing +Z) to world space.
    pub model: Mat4,
    pub opacity: f32,
    pub image: &'a GpuImage,
}

/// Renderer for card faces.
#[derive(Default)]
pub struct CardRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    globals_layout: Option<wgpu::BindGroupLayout>,
    image_layout: Option<wgpu::BindGroupLayout>,
    globals_group: Option<wgpu::BindGroup>,
    globals_ubo: Option<wgpu::Buffer>,
    sampler: Option<wgpu::Sampler>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
}

impl CardRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads straight-alpha RGBA8 pixels as a face texture.
    ///
    /// `rgba.len()` must equal `width * height * 4`.
    pub fn upload(
        &mut self,
        ctx: &RenderCtx<'_>,
        label: &str,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> anyhow::Result<GpuImage> {
        anyhow::ensure!(width > 0 && height > 0, "face image {label} has zero area");
        let max = ctx.max_texture_dimension();
        anyhow::ensure!(
            width <= max && height <= max,
            "face image {label} is {width}x{height}, device limit is {max}"
        );
        anyhow::ensure!(
            rgba.len() == width as usize * height as usize * 4,
            "face image {label} has {} bytes, expected {}",
            rgba.len(),
            width as usize * height as usize * 4
        );

        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        let (Some(layout), Some(sampler)) = (self.image_layout.as_ref(), self.sampler.as_ref())
        else {
            anyhow::bail!("card pipeline unavailable");
        };

        let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Ok(GpuImage { texture, bind_group, width, height })
    }

    /// Draws `faces` on top of the target's current contents.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        lighting: &Lighting,
        faces: &[FaceDraw<'_>],
    ) {
        if faces.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);
        self.ensure_static_buffers(ctx);
        self.ensure_globals(ctx);

        // Farthest first; clip-space w grows with view depth.
        let mut order: Vec<usize> = (0..faces.len())
            .filter(|&i| faces[i].opacity > 0.0)
            .collect();
        let depth = |i: usize| (view_proj * faces[i].model * Vec4::W).w;
        order.sort_by(|&a, &b| depth(b).total_cmp(&depth(a)));

        if order.is_empty() {
            return;
        }

        let instances: Vec<FaceInstance> = order
            .iter()
            .map(|&i| FaceInstance::new(faces[i].model, faces[i].opacity))
            .collect();

        self.write_globals(ctx, view_proj, lighting);
        self.ensure_instance_capacity(ctx, instances.len());

        let Some(instance_vbo) = self.instance_vbo.as_ref() else { return; };
        ctx.queue.write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let Some(pipeline) = self.pipeline.as_ref() else { return; };
        let Some(globals)  = self.globals_group.as_ref() else { return; };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return; };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return; };

        let mut rpass = target.load_pass("cardflip card pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, globals, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

        for (slot, &i) in order.iter().enumerate() {
            let slot = slot as u32;
            rpass.set_bind_group(1, &faces[i].image.bind_group, &[]);
            rpass.draw_indexed(0..6, 0, slot..slot + 1);
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cardflip card shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/card.wgsl").into()),
        });

        let globals_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("cardflip card globals bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: uniform_min_binding_size::<Globals>(),
                    },
                    count: None,
                }],
            });

        let image_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("cardflip card image bgl"),
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

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("cardflip card pipeline layout"),
                bind_group_layouts: &[&globals_layout, &image_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cardflip card pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), FaceInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.globals_layout = Some(globals_layout);
        self.image_layout = Some(image_layout);
        self.globals_group = None;
        self.globals_ubo = None;
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cardflip card sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    fn ensure_globals(&mut self, ctx: &RenderCtx<'_>) {
        if self.globals_group.is_some() && self.globals_ubo.is_some() {
            return;
        }
        let Some(layout) = self.globals_layout.as_ref() else { return; };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cardflip card globals ubo"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cardflip card globals"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.globals_ubo = Some(ubo);
        self.globals_group = Some(group);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }
        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cardflip card quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));
        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cardflip card quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn write_globals(&mut self, ctx: &RenderCtx<'_>, view_proj: Mat4, lighting: &Lighting) {
        let Some(ubo) = self.globals_ubo.as_ref() else { return; };
        let dir = lighting.direction.normalize_or_zero();
        let globals = Globals {
            view_proj: view_proj.to_cols_array_2d(),
            light: [dir.x, dir.y, dir.z, lighting.ambient],
            params: [lighting.directional, 0.0, 0.0, 0.0],
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&globals));
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(16);
        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cardflip card instance vbo"),
            size: (new_cap * std::mem::size_of::<FaceInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    /// xyz = direction toward the light, w = ambient intensity
    light: [f32; 4],
    /// x = directional intensity
    params: [f32; 4],
}

/// Instance data layout (80 bytes): model matrix columns at loc 1-4,
/// `params.x` = opacity at loc 5.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FaceInstance {
    model: [[f32; 4]; 4],
    params: [f32; 4],
}

impl FaceInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4
    ];

    fn new(model: Mat4, opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            params: [opacity.clamp(0.0, 1.0), 0.0, 0.0, 0.0],
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FaceInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
