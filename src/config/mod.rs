//! Configuration module for Serum Writer
//!
//! User preferences and their JSON persistence in the platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
