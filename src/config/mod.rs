//! Greeter configuration
//!
//! - **schema**: every group/key the greeter reads and its default
//! - **greeter**: the resolved, immutable `Config` and its loader

pub mod error;
pub mod greeter;
pub mod schema;

// Re-export commonly used types
pub use error::ConfigLoadError;
pub use greeter::Config;
