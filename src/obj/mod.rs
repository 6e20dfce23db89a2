//! # OBJ Pipeline Module
//!
//! Everything that moves geometry between `.obj` files and the scene:
//!
//! - [`import_objs`] - Batch file import with name sanitizing, collision
//!   marking and per-batch grouping
//! - [`export_objs`] - Selection-driven export, one file per mesh or one
//!   combined file
//! - [`import_blend_batch`] / [`import_blend_single`] - Import straight into
//!   blend shapes on matching scene geometry
//!
//! Files are parsed with `tobj`, triangulated and single-indexed, so every
//! mesh that comes out of here is ready for vertex-count comparison.
//!
//! ## Usage
//!
//! ```no_run
//! use stagecraft::obj::{import_objs, ImportOptions};
//! use stagecraft::scene::Scene;
//!
//! let mut scene = Scene::new();
//! let report = import_objs(
//!     &mut scene,
//!     &["assets/helmet.obj", "assets/visor.obj"],
//!     &ImportOptions::default(),
//! )
//! .unwrap();
//! println!("imported {:?} into {:?}", report.new_geos, report.group);
//! ```

pub mod blend;
pub mod export;
pub mod import;

// Re-export commonly used types
pub use blend::{import_blend_batch, import_blend_single, BlendImportOptions, BlendImportReport};
pub use export::{export_objs, ExportMode, ExportOptions};
pub use import::{import_objs, ImportMode, ImportOptions, ImportReport};

use crate::scene::MeshData;

/// Flattens every model in a loaded OBJ into one triangulated mesh,
/// offsetting indices model by model.
pub(crate) fn mesh_from_models(models: &[tobj::Model]) -> MeshData {
    let mut merged = MeshData::default();
    for model in models {
        let mesh = &model.mesh;
        let offset = merged.positions.len() as u32;
        merged
            .positions
            .extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
        merged.indices.extend(mesh.indices.iter().map(|i| i + offset));
    }
    merged
}
