//! Scope-Core: Foundation types for the live biosignal pipeline
//!
//! Frames, pipeline configuration and error types shared by the
//! acquisition and presentation sides.

pub mod config;
pub mod error;
pub mod frame;

pub use config::*;
pub use error::{ScopeError, ScopeResult};
pub use frame::*;
