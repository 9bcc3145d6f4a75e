//! Bridges an OS-managed activity window and its surface callbacks to a native runtime running on
//! its own thread.
//!
//! [`LifecycleRoot`] handles activity creation: one-time native init plus the [`WorkerThread`],
//! window flags, and attaching a surface view. The [`SurfaceBridge`] it owns relays each surface
//! callback to the [`platform::NativeRuntime`] synchronously and in order.

use crate::config::ConfigError;
use crate::platform::PlatformError;
use thiserror::Error;

pub mod config;
pub mod lifecycle;
pub mod native;
pub mod paths;
pub mod platform;
pub mod process;
pub mod surface_bridge;
pub mod worker;

pub use config::Config;
pub use lifecycle::{LifecycleRoot, SavedState};
pub use native::{DemoRuntime, SurfaceSlot};
pub use process::ProcessInitFlag;
pub use surface_bridge::{SurfaceBridge, SurfaceEvent, SurfaceState};
pub use worker::WorkerThread;

pub fn version() -> &'static str {
    option_env!("VERSION").unwrap_or("v0.0.0-dev")
}

#[derive(Debug, Error)]
pub enum SurfaceLinkFatalError {
    #[error("{0}")]
    Error(String),
    #[error("Platform error: {0}")]
    PlatformError(#[from] PlatformError),
    #[error("Could not spawn worker thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type SurfaceLinkResult<T> = Result<T, SurfaceLinkFatalError>;

impl From<&str> for SurfaceLinkFatalError {
    fn from(value: &str) -> Self {
        SurfaceLinkFatalError::Error(value.to_owned())
    }
}

impl From<String> for SurfaceLinkFatalError {
    fn from(error: String) -> Self {
        SurfaceLinkFatalError::Error(error)
    }
}
