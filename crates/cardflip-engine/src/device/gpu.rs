use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::WindowSurface;
use super::GpuInit;

/// Device, queue and the surface of one window.
///
/// Dropping it releases every GPU object it created; the window must
/// outlive it.
pub struct Gpu<'w> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: WindowSurface<'w>,
}

/// One acquired swapchain image and the encoder recording into it.
///
/// Hand it back through [`Gpu::present`] promptly; the next image cannot be
/// acquired while it is held.
pub struct GpuFrame {
    texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no GPU adapter can present to this window")?;

        // Ask for the adapter's real texture limit so large faces fit.
        let limits = wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits());
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("cardflip device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open GPU device")?;

        let surface = WindowSurface::new(surface, &adapter, &device, window.inner_size(), &init)
            .context("surface reports no usable formats")?;

        let info = adapter.get_info();
        log::info!(
            "gpu: {} ({:?}), surface {:?}, max texture {}",
            info.name,
            info.backend,
            surface.format(),
            device.limits().max_texture_dimension_2d
        );

        Ok(Self { device, queue, surface })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface.format()
    }

    /// Drawable size in physical pixels; may be zero while minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.surface.size()
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        self.surface.resize(&self.device, size);
    }

    /// Acquires the next swapchain image.
    ///
    /// `Ok(None)` means skip this frame: the window has no area, or the
    /// surface was stale and has been reconfigured for the next attempt.
    /// Running out of memory is the only error.
    pub fn begin_frame(&mut self) -> Result<Option<GpuFrame>> {
        if !self.surface.is_configured() {
            return Ok(None);
        }

        let texture = match self.surface.acquire() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface outdated; reconfiguring");
                self.surface.configure(&self.device);
                return Ok(None);
            }
            Err(e @ (wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other)) => {
                log::debug!("frame skipped: {e}");
                return Ok(None);
            }
            Err(e @ wgpu::SurfaceError::OutOfMemory) => {
                return Err(e).context("GPU out of memory acquiring a frame");
            }
        };

        let view = texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cardflip frame"),
        });
        Ok(Some(GpuFrame { texture, view, encoder }))
    }

    /// Submits the frame's commands and shows the image.
    pub fn present(&self, frame: GpuFrame) {
        let GpuFrame { texture, view, encoder } = frame;
        self.queue.submit([encoder.finish()]);
        drop(view);
        texture.present();
    }
}
