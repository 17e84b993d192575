// src/project/mod.rs
pub mod service;
pub mod store;
pub mod types;

// Re-export for easy use elsewhere
pub use service::ProjectService;
pub use store::ProjectStore;
pub use types::{CodeVersion, Project, VersionDetails};
