// src/lib.rs
//! Stagecraft Scene Toolkit
//!
//! Batch automation for 3D content pipelines: OBJ import/export, blend-shape
//! setup from matched geometry, and the hierarchy, naming and lighting chores
//! around them, all built on a small in-memory scene graph.

pub mod deform;
pub mod error;
pub mod matcher;
pub mod naming;
pub mod obj;
pub mod prelude;
pub mod scene;
pub mod tools;

// Re-export main types for convenience
pub use error::{Result, ToolkitError};
pub use matcher::{match_candidates, GeometryRef, MatchResult};
pub use scene::Scene;
