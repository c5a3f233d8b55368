//! Error types for Sinkswitch core.

use thiserror::Error;

use crate::renderer::RendererService;

/// Failure of an external device-level command or file.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code:?}: {stderr}")]
    CommandFailed { program: String, code: Option<i32>, stderr: String },

    #[error("Config field '{field}' not found in {path}")]
    ConfigFieldMissing { field: String, path: String },

    #[error("Invalid MAC address: {0}")]
    InvalidMac(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for device-level operations.
pub type DeviceResult<T> = std::result::Result<T, DeviceError>;

/// Failure of the session state store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No active session ID found")]
    NoActiveSession,

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session store error: {0}")]
    Backend(String),
}

/// Result type for session store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors returned by the output switch controller.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("Invalid output target: {0}")]
    InvalidTarget(String),

    #[error("No connected Bluetooth device available")]
    NoBluetoothDeviceAvailable,

    #[error("Bluetooth discovery failed: {0}")]
    DiscoveryAdapterFailure(#[source] DeviceError),

    #[error("Failed to rewrite Bluetooth sink config: {0}")]
    ConfigWriteFailure(#[source] DeviceError),

    #[error("Failed to connect Bluetooth device: {0}")]
    ConnectCommandFailure(#[source] DeviceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors returned by the renderer service controller.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid renderer request: {0}")]
    InvalidRendererRequest(String),

    #[error("Failed to start {service}: {source}")]
    ServiceStartFailed {
        service: RendererService,
        #[source]
        source: DeviceError,
    },

    #[error("Failed to stop {service}: {source}")]
    ServiceStopFailed {
        service: RendererService,
        #[source]
        source: DeviceError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
