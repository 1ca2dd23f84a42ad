use winit::event::WindowEvent;

use super::ctx::{FrameCtx, WindowCtx};

/// What the runtime should do after a callback.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Callbacks the runtime drives. Everything runs on the event-loop thread.
pub trait App {
    /// Raw window events, seen before the runtime reacts to them.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// The surface now matches the window's new size or scale factor.
    fn on_resize(&mut self, window: &WindowCtx<'_>) {
        let _ = window;
    }

    /// Keep requesting frames. When this turns `false` the loop sleeps until
    /// the next window event.
    fn wants_redraw(&self) -> bool {
        true
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
