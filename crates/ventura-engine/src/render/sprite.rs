//! Textured instanced quads (sprite shader).

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::render::binding::{StorageBinding, TextureBinding, UniformBinding};
use crate::render::camera::CameraUniform;
use crate::render::shaders::{self, FRAGMENT_ENTRY, TEXTURED_FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::render::texture::Texture;
use crate::render::vertex::{SpriteVertex, SPRITE_QUAD_INDICES, SPRITE_QUAD_VERTICES};
use crate::render::RenderCtx;
use crate::scene::{DrawCmd, DrawList};

use super::common::{alpha_blend, camera_binding, clamp_range, triangle_list};

/// Per-instance record in the `@group(1)` storage array.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub transform: [[f32; 4]; 4],
}

impl SpriteInstance {
    #[inline]
    pub fn new(transform: Mat4) -> Self {
        Self { transform: transform.to_cols_array_2d() }
    }
}

/// Which fragment entry point the sprite pipeline uses.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum SpriteShading {
    /// `fs_main`: every sprite fragment is opaque red.
    #[default]
    Placeholder,
    /// `fs_textured`: samples the sprite texture.
    Textured,
}

impl SpriteShading {
    pub fn fragment_entry(self) -> &'static str {
        match self {
            SpriteShading::Placeholder => FRAGMENT_ENTRY,
            SpriteShading::Textured => TEXTURED_FRAGMENT_ENTRY,
        }
    }
}

/// Image bound at `@group(2)`.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteTexture {
    /// 1x1 texture of one RGBA8 color.
    Solid([u8; 4]),
    /// Tightly packed RGBA8 pixels.
    Rgba8 { width: u32, height: u32, pixels: Vec<u8> },
    /// Encoded PNG or JPEG bytes.
    Encoded(Vec<u8>),
}

impl Default for SpriteTexture {
    fn default() -> Self {
        SpriteTexture::Solid([255; 4])
    }
}

/// Sprite renderer.
///
/// Every drawable `DrawCmd::Sprite` becomes one instance of the unit quad. Instances are
/// uploaded once per frame to a read-only storage buffer in paint order; each contiguous run
/// of sprites is then one instanced call over its slice of that buffer.
#[derive(Default)]
pub struct SpriteRenderer {
    shading: SpriteShading,
    texture_source: SpriteTexture,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    camera: Option<UniformBinding<CameraUniform>>,
    instances: Option<StorageBinding<SpriteInstance>>,
    texture: Option<TextureBinding>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_ibo: Option<wgpu::Buffer>,

    scratch: Vec<SpriteInstance>,
    uploaded: u32,
    warned_non_finite: bool,
    warned_overflow: bool,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shading(mut self, shading: SpriteShading) -> Self {
        self.set_shading(shading);
        self
    }

    pub fn with_texture(mut self, texture: SpriteTexture) -> Self {
        self.set_texture(texture);
        self
    }

    pub fn shading(&self) -> SpriteShading {
        self.shading
    }

    /// Switches the fragment entry point; the pipeline is rebuilt on the next `prepare`.
    pub fn set_shading(&mut self, shading: SpriteShading) {
        if self.shading != shading {
            self.shading = shading;
            self.pipeline = None;
        }
    }

    /// Replaces the sprite texture; it is uploaded on the next `prepare`.
    pub fn set_texture(&mut self, texture: SpriteTexture) {
        self.texture_source = texture;
        self.texture = None;
        self.pipeline = None;
    }

    /// Uploads the drawable sprites of `draw_list` in paint order and the camera matrix.
    ///
    /// Returns the uploaded instance count. Sprites with non-finite transforms are skipped
    /// (one-time warning); sprites past the device storage limit are dropped.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, draw_list: &mut DrawList) -> u32 {
        self.uploaded = 0;

        let skipped = collect_instances(draw_list, &mut self.scratch);
        if skipped > 0 && !self.warned_non_finite {
            log::warn!("SpriteRenderer: skipped {skipped} sprite(s) with non-finite transforms");
            self.warned_non_finite = true;
        }

        if self.scratch.is_empty() {
            return 0;
        }

        self.ensure_bindings(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);

        let max = StorageBinding::<SpriteInstance>::max_elements(ctx.device);
        if self.scratch.len() > max {
            if !self.warned_overflow {
                log::warn!(
                    "SpriteRenderer: {} sprites exceed the device limit of {max}; \
                     extra sprites dropped",
                    self.scratch.len()
                );
                self.warned_overflow = true;
            }
            self.scratch.truncate(max);
        }

        if let Some(instances) = self.instances.as_mut() {
            instances.ensure_capacity(ctx.device, self.scratch.len());
            instances.write_slice(ctx.queue, &self.scratch);
        }
        if let Some(camera) = self.camera.as_ref() {
            camera.write(ctx.queue, &CameraUniform::new(ctx.view_projection));
        }

        self.uploaded = self.scratch.len() as u32;
        self.uploaded
    }

    /// Records one instanced draw of the uploaded instances in `instances`.
    ///
    /// The range is clamped to what [`prepare`](Self::prepare) uploaded, so the shader never
    /// indexes past the storage array.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>, instances: Range<u32>) {
        let instances = clamp_range(instances, self.uploaded);
        if instances.is_empty() {
            return;
        }

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(camera) = self.camera.as_ref() else { return };
        let Some(storage) = self.instances.as_ref() else { return };
        let Some(texture) = self.texture.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };
        let Some(quad_ibo) = self.quad_ibo.as_ref() else { return };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera.bind_group(), &[]);
        rpass.set_bind_group(1, storage.bind_group(), &[]);
        rpass.set_bind_group(2, texture.bind_group(), &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.set_index_buffer(quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..SPRITE_QUAD_INDICES.len() as u32, 0, instances);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.camera.is_none() {
            self.camera = Some(camera_binding(ctx.device, "ventura sprite camera"));
        }

        if self.instances.is_none() {
            self.instances = Some(StorageBinding::new(
                ctx.device,
                "ventura sprite instances",
                wgpu::ShaderStages::VERTEX,
            ));
        }

        if self.texture.is_none() {
            let texture = self.create_texture(ctx);
            let binding = TextureBinding::new(ctx.device, "ventura sprite texture", texture);
            let (width, height) = binding.texture().size();
            log::debug!("SpriteRenderer: sprite texture {width}x{height}");
            self.texture = Some(binding);
        }
    }

    fn create_texture(&self, ctx: &RenderCtx<'_>) -> Texture {
        const LABEL: &str = "ventura sprite texture";

        let (device, queue) = (ctx.device, ctx.queue);
        let result = match &self.texture_source {
            SpriteTexture::Solid(rgba) => return Texture::solid(device, queue, *rgba, LABEL),
            SpriteTexture::Rgba8 { width, height, pixels } => {
                Texture::from_rgba8(device, queue, *width, *height, pixels, LABEL)
            }
            SpriteTexture::Encoded(bytes) => Texture::from_bytes(device, queue, bytes, LABEL),
        };

        result.unwrap_or_else(|e| {
            log::warn!("SpriteRenderer: {e:#}; using a white texture");
            Texture::solid(ctx.device, ctx.queue, [255; 4], LABEL)
        })
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let (Some(camera), Some(instances), Some(texture)) =
            (self.camera.as_ref(), self.instances.as_ref(), self.texture.as_ref())
        else {
            return;
        };

        let shader =
            shaders::create_module(ctx.device, "ventura sprite shader", shaders::SPRITE_WGSL);

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("ventura sprite pipeline layout"),
                bind_group_layouts: &[
                    camera.bind_group_layout(),
                    instances.bind_group_layout(),
                    texture.bind_group_layout(),
                ],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ventura sprite pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[SpriteVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(self.shading.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Mirrored transforms (one negative scale axis) wind clockwise and are culled.
            primitive: triangle_list(Some(wgpu::Face::Back)),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!(
            "SpriteRenderer: built pipeline for {:?} ({})",
            ctx.surface_format,
            self.shading.fragment_entry()
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad_vbo.is_some() && self.quad_ibo.is_some() {
            return;
        }

        self.quad_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ventura sprite quad vbo"),
            contents: bytemuck::cast_slice(&SPRITE_QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.quad_ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ventura sprite quad ibo"),
            contents: bytemuck::cast_slice(&SPRITE_QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }
}

/// Fills `out` with one instance per sprite in paint order.
///
/// Returns the number of sprites skipped because their transform is not finite.
pub(crate) fn collect_instances(draw_list: &mut DrawList, out: &mut Vec<SpriteInstance>) -> usize {
    out.clear();
    let mut skipped = 0;

    for item in draw_list.iter_in_paint_order() {
        let DrawCmd::Sprite(cmd) = &item.cmd else { continue };
        if !cmd.is_drawable() {
            skipped += 1;
            continue;
        }
        out.push(SpriteInstance::new(cmd.transform.matrix()));
    }

    skipped
}
