pub mod core;
pub mod input;
pub mod render;
pub mod runtime;

pub use crate::core::{CoreError, CoreResult, GameSettings};
pub use runtime::{build_engine, build_engine_with_log, GameHandle, GameRuntime, RuntimeEvent};
