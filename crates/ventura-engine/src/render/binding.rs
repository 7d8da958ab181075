//! Typed single-resource bind groups.
//!
//! Each binding owns its GPU resource together with the bind group layout and bind group
//! that expose it at `binding = 0` (plus `binding = 1` for the sampler of a texture).
//! The group index is chosen by the pipeline layout that consumes the binding.

use std::marker::PhantomData;
use std::num::NonZeroU64;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::texture::Texture;

fn layout_label(label: &str) -> String {
    format!("{label} bgl")
}

fn group_label(label: &str) -> String {
    format!("{label} bind group")
}

/// Minimum binding size for one `T`. Zero-sized `T` disables the check.
fn min_binding_size<T>() -> Option<NonZeroU64> {
    NonZeroU64::new(std::mem::size_of::<T>() as u64)
}

// ── uniform ───────────────────────────────────────────────────────────────

/// One `T` in a uniform buffer.
pub struct UniformBinding<T: Pod> {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: Pod> UniformBinding<T> {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        visibility: wgpu::ShaderStages,
        initial: &T,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&layout_label(label)),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: min_binding_size::<T>(),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&group_label(label)),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self { buffer, bind_group_layout, bind_group, _marker: PhantomData }
    }

    /// Queues a write of `value`; visible to every draw submitted afterwards.
    pub fn write(&self, queue: &wgpu::Queue, value: &T) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(value));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

// ── storage ───────────────────────────────────────────────────────────────

/// Growable read-only storage array of `T`.
///
/// Capacity grows by powers of two. Growing replaces the buffer and the bind group; the
/// layout stays valid, so pipelines built against it are unaffected.
pub struct StorageBinding<T: Pod> {
    label: String,
    buffer: wgpu::Buffer,
    capacity: usize,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    _marker: PhantomData<T>,
}

impl<T: Pod> StorageBinding<T> {
    pub const MIN_CAPACITY: usize = 64;

    pub fn new(device: &wgpu::Device, label: &str, visibility: wgpu::ShaderStages) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&layout_label(label)),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: min_binding_size::<T>(),
                },
                count: None,
            }],
        });

        let (buffer, bind_group) =
            Self::create_buffer(device, label, &bind_group_layout, Self::MIN_CAPACITY);

        Self {
            label: label.to_string(),
            buffer,
            capacity: Self::MIN_CAPACITY,
            bind_group_layout,
            bind_group,
            _marker: PhantomData,
        }
    }

    fn create_buffer(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&group_label(label)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        (buffer, bind_group)
    }

    /// Largest element count a single binding may expose on `device`.
    pub fn max_elements(device: &wgpu::Device) -> usize {
        let limit = device.limits().max_storage_buffer_binding_size as usize;
        limit / std::mem::size_of::<T>().max(1)
    }

    /// Grows the buffer so it holds at least `required` elements.
    ///
    /// Returns `true` when the buffer (and bind group) were replaced. Previous contents are
    /// not preserved.
    pub fn ensure_capacity(&mut self, device: &wgpu::Device, required: usize) -> bool {
        if required <= self.capacity {
            return false;
        }

        // Never allocate past what one binding may expose.
        let new_cap = grown_capacity(required, Self::MIN_CAPACITY)
            .min(Self::max_elements(device).max(required));
        let (buffer, bind_group) =
            Self::create_buffer(device, &self.label, &self.bind_group_layout, new_cap);

        log::debug!("{}: storage capacity {} -> {}", self.label, self.capacity, new_cap);

        self.buffer = buffer;
        self.bind_group = bind_group;
        self.capacity = new_cap;
        true
    }

    /// Queues a write of `items` starting at element 0.
    ///
    /// # Panics
    /// Panics (debug only) if `items` exceeds the current capacity.
    pub fn write_slice(&self, queue: &wgpu::Queue, items: &[T]) {
        debug_assert!(items.len() <= self.capacity, "storage write exceeds capacity");
        if items.is_empty() {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(items));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Power-of-two capacity covering `required`, never below `min`.
pub(crate) fn grown_capacity(required: usize, min: usize) -> usize {
    required.next_power_of_two().max(min)
}

// ── texture ───────────────────────────────────────────────────────────────

/// 2D filterable texture at `binding = 0` and its sampler at `binding = 1`.
pub struct TextureBinding {
    texture: Texture,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl TextureBinding {
    pub fn new(device: &wgpu::Device, label: &str, texture: Texture) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&layout_label(label)),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&group_label(label)),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
            ],
        });

        Self { texture, bind_group_layout, bind_group }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
