//! Flat-colored world-space triangles (color shader).

use std::ops::Range;

use crate::render::binding::{grown_capacity, UniformBinding};
use crate::render::camera::CameraUniform;
use crate::render::shaders::{self, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::render::vertex::ColorVertex;
use crate::render::RenderCtx;
use crate::scene::{DrawCmd, DrawList};

use super::common::{alpha_blend, camera_binding, clamp_range, triangle_list};

/// Color mesh renderer.
///
/// Drawable `DrawCmd::Mesh` triangles are concatenated in paint order into one vertex buffer;
/// each contiguous run of meshes is one non-indexed call over its slice. No culling, so
/// winding does not matter.
#[derive(Default)]
pub struct ColorRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    camera: Option<UniformBinding<CameraUniform>>,

    vertex_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    scratch: Vec<ColorVertex>,
    uploaded: u32,
    warned_skipped: bool,
}

impl ColorRenderer {
    const MIN_VERTEX_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads the vertices of every drawable mesh in `draw_list`, in paint order, and the
    /// camera matrix. Returns the uploaded vertex count.
    ///
    /// Meshes that are not whole triangles or contain non-finite vertices are skipped
    /// (one-time debug message).
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, draw_list: &mut DrawList) -> u32 {
        self.uploaded = 0;

        let skipped = collect_vertices(draw_list, &mut self.scratch);
        if skipped > 0 && !self.warned_skipped {
            log::debug!("ColorRenderer: skipped {skipped} malformed mesh(es)");
            self.warned_skipped = true;
        }

        if self.scratch.is_empty() {
            return 0;
        }

        if self.camera.is_none() {
            self.camera = Some(camera_binding(ctx.device, "ventura color camera"));
        }
        self.ensure_pipeline(ctx);
        self.ensure_vertex_capacity(ctx, self.scratch.len());

        let Some(vertex_vbo) = self.vertex_vbo.as_ref() else { return 0 };
        ctx.queue.write_buffer(vertex_vbo, 0, bytemuck::cast_slice(&self.scratch));

        if let Some(camera) = self.camera.as_ref() {
            camera.write(ctx.queue, &CameraUniform::new(ctx.view_projection));
        }

        self.uploaded = self.scratch.len() as u32;
        self.uploaded
    }

    /// Records a non-indexed draw of the uploaded vertices in `vertices`.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, vertices: Range<u32>) {
        let vertices = clamp_range(vertices, self.uploaded);
        if vertices.is_empty() {
            return;
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(camera) = self.camera.as_ref() else { return };
        let Some(vertex_vbo) = self.vertex_vbo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera.bind_group(), &[]);
        rpass.set_vertex_buffer(0, vertex_vbo.slice(..));
        rpass.draw(vertices, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(camera) = self.camera.as_ref() else { return };

        let shader =
            shaders::create_module(ctx.device, "ventura color shader", shaders::COLOR_WGSL);

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("ventura color pipeline layout"),
                bind_group_layouts: &[camera.bind_group_layout()],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ventura color pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[ColorVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: triangle_list(None),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("ColorRenderer: built pipeline for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required_vertices: usize) {
        if required_vertices <= self.vertex_capacity && self.vertex_vbo.is_some() {
            return;
        }

        let new_cap = grown_capacity(required_vertices, Self::MIN_VERTEX_CAPACITY);
        let new_size = (new_cap * std::mem::size_of::<ColorVertex>()) as u64;

        self.vertex_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("ventura color vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vertex_capacity = new_cap;
    }
}

/// Fills `out` with the vertices of every well-formed mesh in paint order.
///
/// Returns the number of meshes skipped.
pub(crate) fn collect_vertices(draw_list: &mut DrawList, out: &mut Vec<ColorVertex>) -> usize {
    out.clear();
    let mut skipped = 0;

    for item in draw_list.iter_in_paint_order() {
        let DrawCmd::Mesh(mesh) = &item.cmd else { continue };
        if !mesh.is_drawable() {
            skipped += 1;
            continue;
        }
        out.extend_from_slice(&mesh.vertices);
    }

    skipped
}
