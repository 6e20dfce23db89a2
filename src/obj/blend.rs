//! # Blend-Shape Import
//!
//! The pipeline this crate exists for: bring a batch of OBJ files in, pair
//! each one with the scene geometry it is a sculpt of, and turn every pair
//! into a blend shape driven by one controller.
//!
//! The batch flow snapshots the scene's geometry *before* importing so
//! imports can never match each other, imports with [`import_objs`], runs
//! the [`matcher`](crate::matcher) over the new names, builds a deformer per
//! accepted pair and finally wires the controller (or bakes, when history is
//! being deleted). Whatever failed to match is left in the import group for
//! inspection; the group itself only goes away when it ends up empty.
//!
//! The single flow targets one selected mesh instead: every import with a
//! matching vertex count becomes a zero-weight blend shape on that mesh and
//! the whole import group is discarded afterwards.

use std::path::Path;

use log::{info, warn};

use crate::deform::{build_controller, create_blend_shape};
use crate::error::Result;
use crate::matcher::{match_candidates, GeometryRef};
use crate::obj::import::{import_objs, ImportMode, ImportOptions};
use crate::scene::Scene;

#[derive(Debug, Clone, Default)]
pub struct BlendImportOptions {
    /// Bake the new blend shapes immediately instead of leaving them live
    /// behind a controller.
    pub delete_history: bool,
}

/// What a blend-shape import did, by node name. `imported` lists the meshes
/// as they came in; the matched ones were consumed into the deformers named
/// by `blend_shaped`.
#[derive(Debug, Clone, Default)]
pub struct BlendImportReport {
    pub imported: Vec<String>,
    pub blend_shaped: Vec<String>,
    pub unmatched: Vec<String>,
    pub controller: Option<String>,
    pub group: Option<String>,
}

/// Imports OBJ files and blend-shapes each onto the existing geometry it
/// matches by name and vertex count.
///
/// Matched pairs deform at weight 1 behind a single controller (unless
/// `delete_history` bakes them). An empty path list logs and returns an
/// empty report. An ambiguous scene (two geometries whose names collide
/// case-insensitively) fails before anything is created, though the files
/// themselves are already imported at that point and stay in their group.
pub fn import_blend_batch<P: AsRef<Path>>(
    scene: &mut Scene,
    paths: &[P],
    options: &BlendImportOptions,
) -> Result<BlendImportReport> {
    if paths.is_empty() {
        warn!("no files selected, no blend shapes created");
        return Ok(BlendImportReport::default());
    }

    // Snapshot before importing so candidates never match each other.
    let existing = scene.geometry_refs();

    let imported = import_objs(
        scene,
        paths,
        &ImportOptions {
            mode: ImportMode::Batch,
        },
    )?;
    if imported.new_geos.is_empty() {
        return Ok(BlendImportReport::default());
    }

    let candidates: Vec<GeometryRef> = imported
        .new_geos
        .iter()
        .map(GeometryRef::new)
        .collect();
    let matched = match_candidates(&candidates, &existing, |geo| {
        scene.vertex_count(geo.as_str())
    })?;

    let mut blend_shaped = Vec::with_capacity(matched.pairs().len());
    for (candidate, target) in matched.pairs() {
        let deformer = create_blend_shape(scene, candidate.as_str(), target.as_str(), 1.0)?;
        blend_shaped.push(deformer);
    }
    let controller = build_controller(scene, &blend_shaped, options.delete_history)?;

    // The group only survives if something unmatched is still in it.
    let mut group = imported.group.clone();
    if let Some(name) = &imported.group {
        if scene.children_of(name)?.is_empty() {
            scene.delete(name)?;
            group = None;
        }
    }

    info!(
        "{} imported, {} blend shaped, {} unmatched",
        imported.new_geos.len(),
        blend_shaped.len(),
        matched.unmatched().len()
    );
    Ok(BlendImportReport {
        imported: imported.new_geos,
        blend_shaped,
        unmatched: matched.unmatched().iter().map(|g| g.to_string()).collect(),
        controller,
        group,
    })
}

/// Imports OBJ files as zero-weight blend shapes on the one selected mesh.
///
/// Every import whose vertex count equals the target's becomes a deformer
/// at weight 0, ready to be dialed in by hand; no controller is built. The
/// import group and everything left in it are deleted at the end. Requires
/// exactly one selected node; any other selection logs a warning and
/// returns an empty report.
pub fn import_blend_single<P: AsRef<Path>>(
    scene: &mut Scene,
    paths: &[P],
) -> Result<BlendImportReport> {
    let selected = scene.selected();
    if selected.len() != 1 {
        warn!(
            "blend-shape import needs exactly one selected geometry, found {}",
            selected.len()
        );
        return Ok(BlendImportReport::default());
    }
    let target = selected[0].clone();
    let target_count = scene.vertex_count(&target)?;

    if paths.is_empty() {
        warn!("no files selected, no blend shapes created");
        return Ok(BlendImportReport::default());
    }

    let imported = import_objs(
        scene,
        paths,
        &ImportOptions {
            mode: ImportMode::Batch,
        },
    )?;

    let mut blend_shaped = Vec::new();
    let mut unmatched = Vec::new();
    for geo in &imported.new_geos {
        if scene.vertex_count(geo)? == target_count {
            blend_shaped.push(create_blend_shape(scene, geo, &target, 0.0)?);
        } else {
            unmatched.push(geo.clone());
        }
    }

    // Leftovers are not worth keeping here; the whole batch group goes.
    if let Some(name) = &imported.group {
        if scene.exists(name) {
            scene.delete(name)?;
        }
    }

    info!(
        "{} of {} imports blend shaped onto `{target}`",
        blend_shaped.len(),
        imported.new_geos.len()
    );
    Ok(BlendImportReport {
        imported: imported.new_geos,
        blend_shaped,
        unmatched,
        controller: None,
        group: None,
    })
}
