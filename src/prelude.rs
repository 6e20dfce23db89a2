//! # Stagecraft Prelude
//!
//! This module provides a convenient way to import the types and functions a
//! typical batch script touches, reducing boilerplate imports.
//!
//! ## Usage
//!
//! ```rust
//! use stagecraft::prelude::*;
//! ```
//!
//! This brings the scene graph, matcher and tools into scope:
//!
//! ```
//! use stagecraft::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut scene = Scene::new();
//!     let geo = scene.add_mesh(
//!         "helmet",
//!         MeshData::new(
//!             vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!             vec![0, 1, 2],
//!         ),
//!     );
//!     scene.select(&[geo])?;
//!     apply_type_suffixes(&mut scene, true)?;
//!     assert!(scene.exists("helmet_geo"));
//!     Ok(())
//! }
//! ```

// Re-export error handling
pub use crate::error::{Result, ToolkitError};

// Re-export the scene graph
pub use crate::scene::{
    Aabb, BlendShapeData, CameraData, ControllerData, DisplaySettings, LightData, LightKind,
    MeshData, Node, NodeId, NodeKind, Scene,
};

// Re-export matching and deformation
pub use crate::deform::{
    bake_blend_shapes, blend_shape_selection, build_controller, create_blend_shape,
    mirror_blend_shapes,
};
pub use crate::matcher::{match_candidates, match_candidates_with, GeometryRef, MatchResult};

// Re-export the OBJ pipeline
pub use crate::obj::{
    export_objs, import_blend_batch, import_blend_single, import_objs, BlendImportOptions,
    BlendImportReport, ExportMode, ExportOptions, ImportMode, ImportOptions, ImportReport,
};

// Re-export the batch tools
pub use crate::tools::camera::{reset_pan_zoom, zoom_in, zoom_out};
pub use crate::tools::cleanup::remove_color_sets;
pub use crate::tools::{
    apply_type_suffixes, batch_combine, create_light_rig, mirror_hierarchy, restore_hierarchy,
    select_stored, sort_selection, store_hierarchy, CombineOptions, ComponentKind,
    ComponentSelection, HierarchyPreset,
};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3};
