use winit::dpi::PhysicalSize;

use super::GpuInit;

/// Window surface plus the configuration last applied to it.
///
/// wgpu rejects a 0x0 configuration, so a zero-area size is only recorded
/// and the surface stays unconfigured until the window has area again.
pub(crate) struct WindowSurface<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    configured: bool,
}

impl<'w> WindowSurface<'w> {
    pub(crate) fn new(
        surface: wgpu::Surface<'w>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: PhysicalSize<u32>,
        init: &GpuInit,
    ) -> Option<Self> {
        let caps = surface.get_capabilities(adapter);
        let format = pick_format(&caps.formats, init.srgb)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode(),
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: init.max_frame_latency,
        };

        let mut this = Self { surface, config, configured: false };
        this.configure(device);
        Some(this)
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    pub(crate) fn has_area(&self) -> bool {
        self.config.width > 0 && self.config.height > 0
    }

    pub(crate) fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        if size == self.size() && self.configured {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.configure(device);
    }

    /// Re-applies the current configuration, e.g. after the surface was lost.
    pub(crate) fn configure(&mut self, device: &wgpu::Device) {
        self.configured = self.has_area();
        if self.configured {
            self.surface.configure(device, &self.config);
        }
    }

    pub(crate) fn is_configured(&self) -> bool {
        self.configured
    }

    pub(crate) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}

/// sRGB BGRA/RGBA when asked for and offered, otherwise the platform's first choice.
fn pick_format(offered: &[wgpu::TextureFormat], srgb: bool) -> Option<wgpu::TextureFormat> {
    const SRGB: [wgpu::TextureFormat; 2] = [
        wgpu::TextureFormat::Bgra8UnormSrgb,
        wgpu::TextureFormat::Rgba8UnormSrgb,
    ];
    srgb.then(|| SRGB.into_iter().find(|f| offered.contains(f)))
        .flatten()
        .or_else(|| offered.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    #[test]
    fn srgb_is_preferred_when_offered() {
        let offered = [F::Bgra8Unorm, F::Rgba8UnormSrgb];
        assert_eq!(pick_format(&offered, true), Some(F::Rgba8UnormSrgb));
        assert_eq!(pick_format(&offered, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_the_first_format() {
        assert_eq!(pick_format(&[F::Rgba16Float], true), Some(F::Rgba16Float));
        assert_eq!(pick_format(&[], true), None);
    }
}
