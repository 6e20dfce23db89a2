//! # Hierarchy Tools
//!
//! Save and restore parenting as JSON presets, mirror hierarchies across the
//! YZ plane, and sort siblings alphabetically.
//!
//! A preset maps each node name to its parent's name, with `"world"`
//! standing in for the root level:
//!
//! ```json
//! {
//!     "L_arm": "L_arm_grp",
//!     "L_arm_grp": "world"
//! }
//! ```
//!
//! Restoring only re-parents what it can: missing nodes and missing parents
//! are warned about and skipped, never fatal, so a preset taken from one
//! asset version remains usable on the next.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use cgmath::{Matrix4, Vector3};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::naming;
use crate::scene::Scene;

/// Parent name recorded for root-level nodes.
pub const WORLD_PARENT: &str = "world";

/// Node-to-parent map as stored on disk. Keys are kept sorted so presets
/// diff cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyPreset(pub BTreeMap<String, String>);

impl HierarchyPreset {
    /// Captures the parent of every given node from the scene.
    pub fn capture(scene: &Scene, names: &[String]) -> Result<Self> {
        let mut map = BTreeMap::new();
        for name in names {
            let parent = scene
                .parent_of(name)?
                .unwrap_or_else(|| WORLD_PARENT.to_string());
            map.insert(name.clone(), parent);
        }
        Ok(Self(map))
    }
}

/// Writes the selection's parenting to a JSON preset and returns it. An
/// empty selection still writes an (empty) preset, with a warning.
pub fn store_hierarchy(scene: &Scene, path: &Path) -> Result<HierarchyPreset> {
    let selected = scene.selected();
    if selected.is_empty() {
        warn!("nothing selected, storing an empty hierarchy preset");
    }
    let preset = HierarchyPreset::capture(scene, &selected)?;
    serde_json::to_writer_pretty(File::create(path)?, &preset)?;
    info!(
        "stored parenting of {} nodes to {}",
        preset.0.len(),
        path.display()
    );
    Ok(preset)
}

/// Re-applies a stored preset to the selected nodes. Returns the nodes that
/// were actually re-parented.
///
/// Selected nodes without a preset entry, entries whose parent no longer
/// exists, and `"world"` entries are skipped with a warning or a debug note.
pub fn restore_hierarchy(scene: &mut Scene, path: &Path) -> Result<Vec<String>> {
    let preset: HierarchyPreset = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let mut reparented = Vec::new();
    for name in scene.selected() {
        let parent = match preset.0.get(&name) {
            Some(p) => p.clone(),
            None => {
                warn!("`{name}` has no entry in the preset, skipped");
                continue;
            }
        };
        if parent == WORLD_PARENT {
            debug!("`{name}` is stored at the root level, left alone");
            continue;
        }
        if !scene.exists(&parent) {
            warn!("stored parent `{parent}` of `{name}` does not exist, skipped");
            continue;
        }
        if scene.parent_of(&name)?.as_deref() == Some(parent.as_str()) {
            debug!("`{name}` is already under `{parent}`");
            continue;
        }
        scene.parent(&name, &parent)?;
        reparented.push(name);
    }
    info!("re-parented {} nodes from {}", reparented.len(), path.display());
    Ok(reparented)
}

/// Selects whatever nodes of a stored preset still exist and returns every
/// stored name. Missing nodes are warned about.
pub fn select_stored(scene: &mut Scene, path: &Path) -> Result<Vec<String>> {
    let preset: HierarchyPreset = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    let stored: Vec<String> = preset.0.keys().cloned().collect();
    let present: Vec<String> = stored
        .iter()
        .filter(|name| scene.exists(name))
        .cloned()
        .collect();
    if present.len() != stored.len() {
        warn!(
            "{} stored geometries are no longer in the scene",
            stored.len() - present.len()
        );
    }
    scene.select(&present)?;
    Ok(stored)
}

/// Sorts the selected nodes alphabetically within their sibling lists by
/// moving each to the front in reverse order.
pub fn sort_selection(scene: &mut Scene) -> Result<()> {
    let mut names = scene.selected();
    if names.is_empty() {
        warn!("nothing selected, nothing sorted");
        return Ok(());
    }
    names.sort();
    for name in names.iter().rev() {
        scene.reorder_front(name)?;
    }
    Ok(())
}

/// Bakes the subtree's accumulated transforms into its meshes and resets
/// every transform to identity, keeping positions relative to the root's
/// parent intact. Mirror determinants flip triangle winding inside
/// `apply_transform`.
pub(crate) fn freeze_subtree(scene: &mut Scene, root: &str) -> Result<()> {
    let mut names = vec![root.to_string()];
    names.extend(scene.descendants(root)?);

    // Pre-order guarantees a parent's accumulated transform is computed
    // before its children need it.
    let mut accumulated: BTreeMap<String, Matrix4<f32>> = BTreeMap::new();
    for name in &names {
        let local = scene.node(name)?.local_transform();
        let parent_acc = scene
            .parent_of(name)?
            .and_then(|p| accumulated.get(&p).copied());
        let acc = match parent_acc {
            Some(pa) => pa * local,
            None => local,
        };
        accumulated.insert(name.clone(), acc);
    }

    for name in &names {
        if let Some(acc) = accumulated.get(name).copied() {
            if let Some(mesh) = scene.node_mut(name)?.mesh_mut() {
                mesh.apply_transform(&acc);
            }
            let node = scene.node_mut(name)?;
            node.translation = Vector3::new(0.0, 0.0, 0.0);
            node.rotation = Vector3::new(0.0, 0.0, 0.0);
            node.scale = Vector3::new(1.0, 1.0, 1.0);
        }
    }
    Ok(())
}

/// Mirrors each selected hierarchy across the YZ plane of its own pivot.
///
/// Every selected root is duplicated, scaled by -1 in X, renamed by dropping
/// the duplication digit and swapping the `L_`/`R_` side prefix, then frozen
/// so the mirrored geometry carries identity transforms. A rename that would
/// collide with an existing node keeps the duplicate's numbered name. The
/// new roots are selected and returned.
pub fn mirror_hierarchy(scene: &mut Scene) -> Result<Vec<String>> {
    let selected = scene.selected();
    if selected.is_empty() {
        warn!("nothing selected to mirror");
        return Ok(Vec::new());
    }

    let mut new_roots = Vec::with_capacity(selected.len());
    for root in &selected {
        let duplicate = scene.duplicate(root)?;
        scene.node_mut(&duplicate)?.scale.x *= -1.0;

        let mut members = vec![duplicate.clone()];
        members.extend(scene.descendants(&duplicate)?);

        let mut mirrored_root = duplicate.clone();
        for member in members {
            let stripped = naming::strip_copy_suffix(&member);
            let target = naming::swap_side_prefix(stripped);
            if target == member || scene.exists(&target) {
                continue;
            }
            let assigned = scene.rename(&member, &target)?;
            if member == mirrored_root {
                mirrored_root = assigned;
            }
        }

        freeze_subtree(scene, &mirrored_root)?;
        new_roots.push(mirrored_root);
    }

    scene.select(&new_roots)?;
    info!("mirrored {} hierarchies", new_roots.len());
    Ok(new_roots)
}
