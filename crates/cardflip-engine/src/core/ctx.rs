use winit::window::{CursorIcon, Window};

use crate::coords::Viewport;
use crate::device::Gpu;
use crate::input::{InputFrame, InputState};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameTime;

use super::app::AppControl;

/// Read access to the window, in the units the carousel works in.
pub struct WindowCtx<'a> {
    pub window: &'a Window,
}

impl WindowCtx<'_> {
    /// `(width, height)` in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        let size = self.window.inner_size().to_logical::<f32>(self.window.scale_factor());
        (size.width, size.height)
    }

    pub fn viewport(&self) -> Viewport {
        let (w, h) = self.logical_size();
        Viewport::new(w, h)
    }

    pub fn scale_factor(&self) -> f32 {
        self.window.scale_factor() as f32
    }

    pub fn set_cursor(&self, cursor: CursorIcon) {
        self.window.set_cursor(cursor);
    }
}

/// Everything [`App::on_frame`](super::App::on_frame) gets for one frame.
///
/// `'w` is the window borrow held by the [`Gpu`].
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl FrameCtx<'_, '_> {
    /// A render context for work outside [`FrameCtx::render`], such as
    /// texture uploads.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.window.viewport(),
            self.window.scale_factor(),
        )
    }

    /// Clears to `background`, lets `draw` record on top, and presents.
    ///
    /// Frames the surface cannot provide are skipped silently. Only a lost
    /// device asks the runtime to exit.
    pub fn render<F>(&mut self, background: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return AppControl::Continue,
            Err(e) => {
                log::error!("{e:#}");
                return AppControl::Exit;
            }
        };

        let bg = if self.gpu.surface_format().is_srgb() { background.to_linear() } else { background };
        let _ = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cardflip background"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(bg.r),
                        g: f64::from(bg.g),
                        b: f64::from(bg.b),
                        a: f64::from(bg.a),
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

        let rctx = self.render_ctx();
        draw(&rctx, &mut RenderTarget::new(&mut frame.encoder, &frame.view));

        self.window.window.pre_present_notify();
        self.gpu.present(frame);
        AppControl::Continue
    }
}
