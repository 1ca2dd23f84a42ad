/// Knobs for [`Gpu::new`](super::Gpu::new).
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Render into an sRGB surface when the platform offers one. Face
    /// textures are sRGB, so this keeps card colors true to their hex values.
    pub srgb: bool,
    /// Pace presentation to the display. Turning it off is only useful for
    /// profiling the frame loop.
    pub vsync: bool,
    pub power: wgpu::PowerPreference,
    /// Frames the CPU may queue ahead of the display.
    pub max_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            srgb: true,
            vsync: true,
            power: wgpu::PowerPreference::HighPerformance,
            max_frame_latency: 2,
        }
    }
}

impl GpuInit {
    pub(crate) fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync { wgpu::PresentMode::AutoVsync } else { wgpu::PresentMode::AutoNoVsync }
    }
}
