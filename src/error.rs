//! Error types for orbitfield.
//!
//! The per-frame engine never fails: degenerate input is clamped instead.
//! Errors only come from the edges of the crate (config files, snapshots,
//! window and GPU setup).

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading, saving or validating a [`crate::config::SceneConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors setting up or driving the on-screen presenter.
#[derive(Debug, Error)]
pub enum PresentError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    #[error("failed to acquire surface texture: {0}")]
    Acquire(#[from] wgpu::SurfaceError),
}

/// Errors rendering a headless snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot has no drawing surface")]
    NoSurface,
}

/// Top-level error used by the binary.
#[derive(Debug, Error)]
pub enum OrbitfieldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Present(#[from] PresentError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
