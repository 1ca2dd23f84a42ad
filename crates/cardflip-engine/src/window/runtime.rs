use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "cardflip".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Opens one window and drives `app` until it exits or the window closes.
pub struct Runtime;

impl Runtime {
    pub fn run<A: App + 'static>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut host = Host {
            config,
            gpu_init,
            app,
            surface: None,
            occluded: false,
            failure: None,
        };
        event_loop.run_app(&mut host).context("event loop failed")?;

        match host.failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// The window, its GPU surface and the per-window input and clock.
#[self_referencing]
struct Surface {
    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Host<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    surface: Option<Surface>,
    /// Fully hidden windows get no frames; the clock restarts on reveal.
    occluded: bool,
    failure: Option<anyhow::Error>,
}

impl<A: App> Host<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<Surface> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;
        let gpu_init = self.gpu_init.clone();

        SurfaceTryBuilder {
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
    }

    fn request_redraw(&self) {
        if let Some(surface) = &self.surface {
            surface.with_window(|w| w.request_redraw());
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        // Drops the GPU surface ahead of the window it borrows.
        self.surface = None;
        event_loop.exit();
    }

    fn frame(&mut self) -> AppControl {
        let Some(surface) = &mut self.surface else {
            return AppControl::Continue;
        };
        let app = &mut self.app;
        surface.with_mut(|s| {
            let mut ctx = FrameCtx {
                window: WindowCtx { window: s.window },
                gpu: s.gpu,
                input: s.input,
                input_frame: s.input_frame,
                time: s.clock.tick(),
            };
            let control = app.on_frame(&mut ctx);
            s.input_frame.clear();
            control
        })
    }

    fn resized(&mut self) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        let app = &mut self.app;
        surface.with_mut(|s| {
            s.gpu.resize(s.window.inner_size());
            app.on_resize(&WindowCtx { window: s.window });
        });
        self.request_redraw();
    }
}

impl<A: App> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            self.request_redraw();
            return;
        }
        match self.open(event_loop) {
            Ok(surface) => {
                surface.with_window(|w| w.request_redraw());
                self.surface = Some(surface);
            }
            Err(e) => {
                log::error!("{e:#}");
                self.failure = Some(e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if !self.occluded && self.app.wants_redraw() {
            self.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(surface) = &mut self.surface else {
            return;
        };
        surface.with_mut(|s| {
            if let Some(ev) = translate_window_event(s.window, s.input.pointer, &event) {
                s.input.apply_event(s.input_frame, ev);
            }
        });

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.shutdown(event_loop),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resized(),
            WindowEvent::Occluded(hidden) => {
                log::debug!("window {}", if hidden { "hidden" } else { "visible" });
                self.occluded = hidden;
                if !hidden {
                    if let Some(surface) = &mut self.surface {
                        surface.with_clock_mut(|clock| clock.reset());
                    }
                    self.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if self.frame() == AppControl::Exit {
                    self.shutdown(event_loop);
                }
            }
            _ => {}
        }
    }
}
