//! Error types for the application shell
//!
//! Covers settings persistence, board setup and the runtime's command queue.
//! Gameplay itself never errors; refusals come back as dispatch outcomes.

use kfchess_engine::EngineError;
use thiserror::Error;

/// Errors that can occur outside the engine's gameplay paths
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings, script or thread I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("Settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),

    /// The configured board could not be built
    #[error("Board setup failed: {0}")]
    Setup(#[from] EngineError),

    /// The tick thread is gone and no longer accepts commands
    #[error("Runtime stopped: {message}")]
    RuntimeStopped { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
