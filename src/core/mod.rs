//! Core module - settings and error types for the application shell
//!
//! # Resources
//!
//! - [`GameSettings`] - engine tuning, starting layout, log filter and key
//!   bindings, persisted as `settings.json`
//! - [`CoreError`] - failures outside gameplay (I/O, parsing, setup)

pub mod error;
pub mod settings;

pub use error::{CoreError, CoreResult};
pub use settings::GameSettings;
