//! 3D flip-card carousel.
//!
//! Cards are rendered from [`CardData`] into face images by the
//! [`TextureFactory`], animated by per-card [`CardController`]s using
//! timelines from the [`TimelineLibrary`], and sequenced by the
//! [`Carousel`]. [`CarouselEngine`] ties them to a window surface, input and
//! the GPU renderers of `cardflip-engine`.
//!
//! All timing runs on a virtual clock: callers pass elapsed time in, which
//! keeps the whole sequence deterministic under test.

pub mod card;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod navigation;
pub mod orchestrator;
pub mod scene;
pub mod scheduler;
pub mod texture;
pub mod timeline;

pub use card::{CardData, CardTheme, Face};
pub use config::CarouselConfig;
pub use controller::{CardController, CardVisualState};
pub use engine::CarouselEngine;
pub use error::{CarouselError, ConfigError, InitializationError, TextureCreationError};
pub use navigation::{NavAction, NavState};
pub use orchestrator::{Carousel, Direction, TeardownReport};
pub use scene::{SceneContext, SceneHost, SurfaceSize};
pub use texture::{CanvasRasterizer, FaceImage, FaceRasterizer, TextureFactory};
pub use timeline::TimelineLibrary;
