//! Error types for the Troupe viewer
//!
//! The per-frame operations (build, hover, panel) never fail. Everything that touches
//! the file system, parses user data, or talks to the GPU reports through [`TroupeError`].

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading data or setting up the renderer
#[derive(Debug, Error)]
pub enum TroupeError {
    /// The roster or config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persona roster is not valid JSON or has the wrong shape
    #[error("invalid persona roster: {0}")]
    Roster(#[from] serde_json::Error),

    /// The viewer config is not valid TOML
    #[error("invalid viewer config: {0}")]
    Config(#[from] toml::de::Error),

    /// An extension field tried to shadow one of the record's own fields
    #[error("`{0}` is a reserved persona field and cannot be used as an extra")]
    ReservedField(String),

    #[error("failed to create render surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("the adapter cannot present to this surface")]
    UnsupportedSurface,

    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

pub type Result<T> = std::result::Result<T, TroupeError>;
