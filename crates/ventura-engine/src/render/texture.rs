use anyhow::{Context, Result};

/// Sampled 2D texture (RGBA8, sRGB) with its sampler.
pub struct Texture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
}

impl Texture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Decodes an encoded image (PNG or JPEG) and uploads it.
    pub fn from_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        bytes: &[u8],
        label: &str,
    ) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .with_context(|| format!("failed to decode texture image `{label}`"))?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        Self::from_rgba8(device, queue, width, height, &rgba, label)
    }

    /// Uploads tightly packed RGBA8 pixels, row-major from the top-left corner.
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
        label: &str,
    ) -> Result<Self> {
        check_dimensions(width, height, device.limits().max_texture_dimension_2d)
            .with_context(|| format!("texture `{label}`"))?;
        let expected = rgba8_len(width, height);
        anyhow::ensure!(
            pixels.len() == expected,
            "texture `{label}`: expected {expected} bytes for {width}x{height}, got {}",
            pixels.len()
        );

        Ok(Self::upload(device, queue, width, height, pixels, label))
    }

    /// 1x1 texture of a single color.
    pub fn solid(device: &wgpu::Device, queue: &wgpu::Queue, rgba: [u8; 4], label: &str) -> Self {
        Self::upload(device, queue, 1, 1, &rgba, label)
    }

    fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self { texture, view, sampler }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.texture.width(), self.texture.height())
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

/// Rejects empty images and images wider or taller than `max` texels.
fn check_dimensions(width: u32, height: u32, max: u32) -> Result<()> {
    anyhow::ensure!(width > 0 && height > 0, "zero size {width}x{height}");
    anyhow::ensure!(
        width <= max && height <= max,
        "{width}x{height} exceeds the device limit of {max} texels per side"
    );
    Ok(())
}

fn rgba8_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_len_is_four_bytes_per_pixel() {
        assert_eq!(rgba8_len(1, 1), 4);
        assert_eq!(rgba8_len(16, 8), 512);
    }

    // ── dimensions ──

    #[test]
    fn dimensions_up_to_the_limit_are_accepted() {
        assert!(check_dimensions(1, 1, 2048).is_ok());
        assert!(check_dimensions(2048, 2048, 2048).is_ok());
        assert!(check_dimensions(2048, 1, 2048).is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(check_dimensions(0, 16, 2048).is_err());
        assert!(check_dimensions(16, 0, 2048).is_err());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let err = check_dimensions(8192, 4, 2048).unwrap_err();
        assert!(err.to_string().contains("2048"), "got {err}");
        assert!(check_dimensions(4, 2049, 2048).is_err());
    }
}
