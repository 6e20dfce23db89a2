//! # OBJ Import
//!
//! Loads `.obj` files into mesh nodes, one batch at a time. Each batch gets
//! its own numbered group (`OBJ_import_001_grp`, `OBJ_import_002_grp`, ...)
//! so an import can be inspected or thrown away as a unit.
//!
//! Node names come from the file stem with anything outside `[0-9A-Za-z]`
//! replaced by underscores. A stem whose name is already taken in the scene
//! gets the `_obj` import marker appended, which is exactly the token the
//! matcher strips when pairing imports with existing geometry.

use std::path::Path;

use log::{debug, info, warn};

use crate::error::Result;
use crate::naming::{self, IMPORT_MARKER};
use crate::obj::mesh_from_models;
use crate::scene::{MeshData, Scene};

/// Prefix and suffix of the per-batch group name.
pub const IMPORT_GROUP_PREFIX: &str = "OBJ_import_";
pub const IMPORT_GROUP_SUFFIX: &str = "_grp";

/// Whether a batch stays as separate meshes or is fused into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Combine every imported mesh into a single node named after the first.
    Single,
    /// Keep one mesh node per file.
    Batch,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub mode: ImportMode,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            mode: ImportMode::Batch,
        }
    }
}

/// What an import produced: the mesh nodes now in the scene (post-combine
/// in [`ImportMode::Single`]) and the group that holds them.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub new_geos: Vec<String>,
    pub group: Option<String>,
}

/// Next free batch group name, `OBJ_import_###_grp` with the number one past
/// the highest already in the scene.
fn next_import_group(scene: &Scene) -> String {
    let highest = scene
        .ls()
        .into_iter()
        .filter_map(|name| {
            let middle = name
                .strip_prefix(IMPORT_GROUP_PREFIX)?
                .strip_suffix(IMPORT_GROUP_SUFFIX)?;
            middle.parse::<u32>().ok()
        })
        .max()
        .unwrap_or(0);
    format!("{}{:03}{}", IMPORT_GROUP_PREFIX, highest + 1, IMPORT_GROUP_SUFFIX)
}

/// Imports a batch of OBJ files and groups the results.
///
/// An empty path list is treated as a cancelled pick: it logs and returns an
/// empty report rather than failing. Files that parse but contain no
/// geometry are skipped with a warning. Unreadable or malformed files abort
/// the import with the loader's error.
pub fn import_objs<P: AsRef<Path>>(
    scene: &mut Scene,
    paths: &[P],
    options: &ImportOptions,
) -> Result<ImportReport> {
    if paths.is_empty() {
        warn!("no files selected, nothing imported");
        return Ok(ImportReport::default());
    }

    let mut new_geos = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;
        let mesh = mesh_from_models(&models);
        if mesh.vertex_count() == 0 {
            warn!("`{}` contains no geometry, skipped", path.display());
            continue;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "geo".to_string());
        let mut name = naming::sanitize_stem(&stem);
        if scene.exists(&name) {
            // Mark the import so the matcher can pair it with the original.
            name.push_str(IMPORT_MARKER);
        }
        let assigned = scene.add_mesh(&name, mesh);
        debug!("imported `{}` as `{assigned}`", path.display());
        new_geos.push(assigned);
    }

    if new_geos.is_empty() {
        warn!("no geometry found in {} files", paths.len());
        return Ok(ImportReport::default());
    }

    let group = scene.add_group(&next_import_group(scene));
    for geo in &new_geos {
        scene.parent(geo, &group)?;
    }

    if options.mode == ImportMode::Single && new_geos.len() > 1 {
        let mut parts = Vec::with_capacity(new_geos.len());
        for geo in &new_geos {
            parts.push(scene.mesh(geo)?.clone());
        }
        let merged = MeshData::merge(parts.iter());
        let first = new_geos[0].clone();
        for geo in &new_geos {
            scene.delete(geo)?;
        }
        let combined = scene.add_mesh(&first, merged);
        scene.parent(&combined, &group)?;
        info!("{} OBJs imported and combined into `{combined}`", paths.len());
        return Ok(ImportReport {
            new_geos: vec![combined],
            group: Some(group),
        });
    }

    info!("{} OBJs imported into `{group}`", new_geos.len());
    Ok(ImportReport {
        new_geos,
        group: Some(group),
    })
}
