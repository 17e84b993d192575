// src/api/http/mod.rs

pub mod analyses;
pub mod comparisons;
pub mod health;
pub mod projects;
pub mod router;
pub mod stats;
pub mod versions;
