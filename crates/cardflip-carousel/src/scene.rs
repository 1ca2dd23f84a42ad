//! Camera, lighting and surface state shared by every card.
//!
//! [`SceneHost`] owns the one [`SceneContext`] of a carousel instance and the
//! running flag of its redraw loop. The host window asks
//! [`SceneHost::begin_frame`] each frame; once disposed it answers `None` and
//! nothing more is drawn.

use glam::{Mat4, Vec3};

use cardflip_engine::coords::Viewport;
use cardflip_engine::render::Lighting;

use crate::config::{CameraConfig, LightingConfig};
use crate::error::InitializationError;

/// Surface dimensions in logical pixels plus the device pixel ratio.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        Self { width, height, scale_factor }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    fn has_area(&self) -> bool {
        self.viewport().has_area()
    }
}

/// Camera and surface parameters derived from the current surface size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SceneContext {
    pub fov_y_deg: f32,
    pub aspect: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    /// Logical surface size.
    pub width: f32,
    pub height: f32,
    /// Device pixel ratio, capped.
    pub pixel_ratio: f32,
}

impl SceneContext {
    fn compute(surface: SurfaceSize, camera: &CameraConfig) -> Self {
        let narrow = surface.width < camera.narrow_breakpoint;
        let (fov_y_deg, distance) = if narrow {
            (camera.narrow_fov_deg, camera.narrow_distance)
        } else {
            (camera.wide_fov_deg, camera.wide_distance)
        };

        Self {
            fov_y_deg,
            aspect: surface.viewport().aspect(),
            distance,
            near: camera.near,
            far: camera.far,
            width: surface.width,
            height: surface.height,
            pixel_ratio: surface.scale_factor.min(camera.max_pixel_ratio),
        }
    }

    /// Perspective camera on +Z looking at the origin.
    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.distance), Vec3::ZERO, Vec3::Y);
        proj * view
    }

    /// Render resolution in physical pixels.
    pub fn drawable_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }
}

/// What a frame needs to draw the cards.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameView {
    pub view_proj: Mat4,
    pub lighting: Lighting,
    pub context: SceneContext,
}

#[derive(Debug)]
pub struct SceneHost {
    camera: CameraConfig,
    lighting: Lighting,
    context: Option<SceneContext>,
    running: bool,
    frames_drawn: u64,
}

impl SceneHost {
    pub fn new(camera: CameraConfig, lighting: &LightingConfig) -> Self {
        let [x, y, z] = lighting.directional_position;
        Self {
            camera,
            lighting: Lighting {
                ambient: lighting.ambient,
                directional: lighting.directional,
                direction: Vec3::new(x, y, z),
            },
            context: None,
            running: false,
            frames_drawn: 0,
        }
    }

    /// Sets up the camera for `surface` and starts the redraw loop.
    pub fn initialize(&mut self, surface: SurfaceSize) -> Result<SceneContext, InitializationError> {
        if !surface.has_area() {
            return Err(InitializationError { width: surface.width, height: surface.height });
        }

        let ctx = SceneContext::compute(surface, &self.camera);
        log::debug!(
            "scene initialized at {}x{} (fov {}, distance {}, dpr {})",
            ctx.width,
            ctx.height,
            ctx.fov_y_deg,
            ctx.distance,
            ctx.pixel_ratio
        );
        self.context = Some(ctx);
        self.running = true;
        Ok(ctx)
    }

    /// Recomputes the camera for a new surface size.
    ///
    /// A host that failed to initialize retries here. A zero-area surface
    /// keeps the previous context and yields `None`.
    pub fn on_resize(&mut self, surface: SurfaceSize) -> Option<SceneContext> {
        if !self.running {
            if self.context.is_some() {
                // Disposed hosts stay disposed.
                return None;
            }
            return self.initialize(surface).ok();
        }
        if !surface.has_area() {
            return None;
        }

        let ctx = SceneContext::compute(surface, &self.camera);
        self.context = Some(ctx);
        Some(ctx)
    }

    /// Stops the redraw loop. Later frames draw nothing.
    pub fn dispose(&mut self) {
        if self.running {
            log::debug!("scene disposed after {} frames", self.frames_drawn);
        }
        self.running = false;
    }

    /// Accounts for one drawn frame and returns its camera, or `None` when
    /// nothing should be drawn.
    pub fn begin_frame(&mut self) -> Option<FrameView> {
        if !self.running {
            return None;
        }
        let context = self.context?;
        self.frames_drawn += 1;
        Some(FrameView { view_proj: context.view_proj(), lighting: self.lighting, context })
    }

    #[inline]
    pub fn context(&self) -> Option<SceneContext> {
        self.context
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    #[inline]
    pub fn lighting(&self) -> Lighting {
        self.lighting
    }
}
