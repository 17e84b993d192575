// src/lib.rs

pub mod analysis;
pub mod api;
pub mod comparison;
pub mod config;
pub mod db;
pub mod error;
pub mod explain;
pub mod identity;
pub mod issues;
pub mod llm;
pub mod project;
pub mod state;
pub mod stats;

pub use error::{Result, VersusError};
pub use identity::Owner;
pub use state::AppState;
