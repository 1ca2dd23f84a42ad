use std::path::PathBuf;

/// Errors the carousel degrades on instead of propagating to the host.
#[derive(Debug, thiserror::Error)]
pub enum CarouselError {
    #[error(transparent)]
    Initialization(#[from] InitializationError),
    #[error(transparent)]
    TextureCreation(#[from] TextureCreationError),
}

/// The drawing surface was unusable at mount time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("surface unavailable: {width}x{height} has no drawable area")]
pub struct InitializationError {
    pub width: f32,
    pub height: f32,
}

/// A face image could not be allocated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot create {width}x{height} face texture: {reason}")]
pub struct TextureCreationError {
    pub width: u32,
    pub height: u32,
    pub reason: TextureFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextureFailure {
    #[error("zero area")]
    ZeroArea,
    #[error("exceeds the {max}px limit")]
    TooLarge { max: u32 },
    #[error("pixel buffer allocation failed")]
    AllocationFailed,
}

impl TextureCreationError {
    pub fn new(width: u32, height: u32, reason: TextureFailure) -> Self {
        Self { width, height, reason }
    }
}

/// Configuration or card deck files that could not be read.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid carousel config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid card deck: {0}")]
    Json(#[from] serde_json::Error),
}
