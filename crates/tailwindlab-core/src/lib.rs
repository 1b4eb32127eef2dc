// Core modules
pub mod config;
pub mod error;
pub mod lock;
pub mod version;

// Re-export commonly used types
pub use error::{Result, TailwindlabError};
pub use version::VersionSelector;
