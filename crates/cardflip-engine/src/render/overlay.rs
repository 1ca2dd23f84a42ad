//! Solid-color overlay renderer for [`DrawList`] shapes.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::common::{
    premul_alpha_blend, target_color, uniform_min_binding_size, QuadVertex, ViewportUniform,
    QUAD_INDICES, QUAD_VERTICES,
};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{DrawList, Shape};

/// Draws the shapes of a [`DrawList`] on top of the target.
///
/// GPU objects are created on first use and rebuilt when the surface format
/// changes. The instance buffer grows in powers of two and is never shrunk.
#[derive(Default)]
pub struct OverlayRenderer {
    gpu: Option<OverlayGpu>,
    instances: Vec<ShapeInstance>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, list: &mut DrawList) {
        self.instances.clear();
        self.instances.extend(
            list.paint_order()
                .filter_map(|shape| ShapeInstance::from_shape(shape, ctx.surface_format)),
        );
        if self.instances.is_empty() {
            return;
        }

        let gpu = match &mut self.gpu {
            Some(gpu) if gpu.format == ctx.surface_format => gpu,
            slot => slot.insert(OverlayGpu::new(ctx)),
        };
        gpu.upload(ctx, &self.instances);

        let mut pass = target.load_pass("cardflip overlay pass");
        pass.set_pipeline(&gpu.pipeline);
        pass.set_bind_group(0, &gpu.bind_group, &[]);
        pass.set_vertex_buffer(0, gpu.quad_vbo.slice(..));
        pass.set_vertex_buffer(1, gpu.instance_vbo.slice(..));
        pass.set_index_buffer(gpu.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        pass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..self.instances.len() as u32);
    }
}

struct OverlayGpu {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    screen_ubo: wgpu::Buffer,
    quad_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    instance_vbo: wgpu::Buffer,
    instance_capacity: usize,
}

const MIN_INSTANCES: usize = 32;

impl OverlayGpu {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let device = ctx.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cardflip overlay shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cardflip overlay bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: uniform_min_binding_size::<ViewportUniform>(),
                },
                count: None,
            }],
        });

        let screen_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("cardflip overlay screen ubo"),
            size: std::mem::size_of::<ViewportUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cardflip overlay bind group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_ubo.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cardflip overlay pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cardflip overlay pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout(), ShapeInstance::layout()],
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
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let quad_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cardflip overlay quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cardflip overlay quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            screen_ubo,
            quad_vbo,
            quad_ibo,
            instance_vbo: instance_buffer(device, MIN_INSTANCES),
            instance_capacity: MIN_INSTANCES,
        }
    }

    fn upload(&mut self, ctx: &RenderCtx<'_>, instances: &[ShapeInstance]) {
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_vbo = instance_buffer(ctx.device, self.instance_capacity);
        }

        let screen = ViewportUniform {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(&self.screen_ubo, 0, bytemuck::bytes_of(&screen));
        ctx.queue.write_buffer(&self.instance_vbo, 0, bytemuck::cast_slice(instances));
    }
}

fn instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("cardflip overlay instance vbo"),
        size: (capacity * std::mem::size_of::<ShapeInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Per-shape vertex data, 40 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct ShapeInstance {
    center: [f32; 2],
    half_size: [f32; 2],
    radius_rotation: [f32; 2],
    color: [f32; 4],
}

impl ShapeInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }

    /// `None` for shapes that would not cover a pixel.
    fn from_shape(shape: &Shape, format: wgpu::TextureFormat) -> Option<Self> {
        let rect = shape.rect.normalized();
        if rect.is_empty() || shape.color.a <= 0.0 {
            return None;
        }
        let half = rect.size * 0.5;
        Some(Self {
            center: rect.center().to_array(),
            half_size: half.to_array(),
            radius_rotation: [shape.effective_radius(), shape.rotation],
            color: target_color(shape.color, format),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::Color;

    #[test]
    fn instance_is_centered_with_clamped_radius() {
        let shape = Shape::rounded_rect(Rect::new(10.0, 20.0, 40.0, 8.0), 99.0, Color::WHITE);
        let inst = ShapeInstance::from_shape(&shape, wgpu::TextureFormat::Bgra8Unorm).unwrap();
        assert_eq!(inst.center, [30.0, 24.0]);
        assert_eq!(inst.half_size, [20.0, 4.0]);
        assert_eq!(inst.radius_rotation, [4.0, 0.0]);
        assert_eq!(inst.color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn empty_and_transparent_shapes_are_skipped() {
        let fmt = wgpu::TextureFormat::Bgra8Unorm;
        let flat = Shape::rounded_rect(Rect::new(0.0, 0.0, 0.0, 5.0), 0.0, Color::WHITE);
        let clear = Shape::rounded_rect(Rect::new(0.0, 0.0, 5.0, 5.0), 0.0, Color::transparent());
        assert!(ShapeInstance::from_shape(&flat, fmt).is_none());
        assert!(ShapeInstance::from_shape(&clear, fmt).is_none());
    }
}
