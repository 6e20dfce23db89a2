//! # Scene Module
//!
//! This module provides the in-memory scene graph the batch tools operate
//! on: named nodes with parent/child ordering, mesh payloads, selection
//! state and the spatial queries (vertex counts, world transforms, bounds)
//! that the matcher and the tools are written against.
//!
//! ## Key Components
//!
//! - [`Scene`] - Slot-arena scene graph with unique names and ordered hierarchy
//! - [`Node`] / [`NodeKind`] - A named slot and its kind-specific payload
//! - [`MeshData`] - Triangulated CPU-side mesh buffers with pipeline metadata
//! - [`Aabb`] - Axis-aligned bounds with conservative re-fitting under transforms
//!
//! ## Usage
//!
//! ```
//! use stagecraft::scene::{MeshData, Scene};
//!
//! let mut scene = Scene::new();
//! let geo = scene.add_mesh(
//!     "helmet",
//!     MeshData::new(
//!         vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!         vec![0, 1, 2],
//!     ),
//! );
//! assert_eq!(scene.vertex_count(&geo).unwrap(), 3);
//! ```

pub mod mesh;
pub mod node;
pub mod scene;

// Re-export commonly used types
pub use mesh::{Aabb, MeshData};
pub use node::{
    BlendShapeData, CameraData, ControllerData, DisplaySettings, LightData, LightKind, Node,
    NodeId, NodeKind,
};
pub use scene::Scene;
