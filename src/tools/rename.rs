//! # Type-Suffix Renamer
//!
//! Appends a conventional suffix to node names based on what the node is:
//! `_geo` for meshes, `_jnt` for joints, `_loc` for locators, `_crv` for
//! curves and `_grp` for everything else. Cameras are left alone entirely.
//!
//! A group with exactly one child is treated as that child's transform and
//! takes the child's suffix, so the usual group-over-mesh pattern comes out
//! as `helmet_geo`, not `helmet_grp`.

use log::{debug, info};

use crate::error::{Result, ToolkitError};
use crate::scene::{NodeKind, Scene};

/// Suffix for a node kind; `None` means the kind is never renamed.
fn type_suffix(kind: &NodeKind) -> Option<&'static str> {
    match kind {
        NodeKind::Mesh(_) => Some("geo"),
        NodeKind::Joint => Some("jnt"),
        NodeKind::Locator => Some("loc"),
        NodeKind::Curve => Some("crv"),
        NodeKind::Camera(_) => None,
        _ => Some("grp"),
    }
}

fn depth(scene: &Scene, name: &str) -> Result<usize> {
    let mut depth = 0;
    let mut cursor = scene.parent_of(name)?;
    while let Some(parent) = cursor {
        depth += 1;
        cursor = scene.parent_of(&parent)?;
    }
    Ok(depth)
}

/// The suffix a node should carry, looking through single-child groups to
/// the child's kind.
fn suffix_for(scene: &Scene, name: &str) -> Result<Option<&'static str>> {
    let node = scene.node(name)?;
    if matches!(node.kind, NodeKind::Group) {
        let children = scene.children_of(name)?;
        if children.len() == 1 {
            return Ok(type_suffix(&scene.node(&children[0])?.kind));
        }
    }
    Ok(type_suffix(&node.kind))
}

/// Renames nodes to carry their type suffix. With `selection_only`, the
/// selected nodes and everything below them are processed (an empty
/// selection is an error); otherwise the whole scene is. Returns the new
/// names of the nodes that actually changed.
///
/// Nodes already ending in their suffix are skipped, as are cameras and
/// non-DAG nodes (deformers, controllers). Leaves rename before their
/// ancestors.
pub fn apply_type_suffixes(scene: &mut Scene, selection_only: bool) -> Result<Vec<String>> {
    let mut targets: Vec<String> = Vec::new();
    if selection_only {
        let selected = scene.selected();
        if selected.is_empty() {
            return Err(ToolkitError::EmptySelection);
        }
        for picked in selected {
            if !targets.contains(&picked) {
                targets.push(picked.clone());
            }
            for below in scene.descendants(&picked)? {
                if !targets.contains(&below) {
                    targets.push(below);
                }
            }
        }
    } else {
        targets = scene.ls();
    }
    targets.retain(|name| {
        scene
            .node(name)
            .map(|n| n.kind.is_dag())
            .unwrap_or(false)
    });

    // Leaf-first: deepest nodes rename before their ancestors.
    let mut ordered: Vec<(usize, String)> = Vec::with_capacity(targets.len());
    for name in targets {
        ordered.push((depth(scene, &name)?, name));
    }
    ordered.sort_by(|a, b| b.0.cmp(&a.0));

    let mut renamed = Vec::new();
    for (_, name) in ordered {
        let suffix = match suffix_for(scene, &name)? {
            Some(s) => s,
            None => {
                debug!("`{name}` keeps its name");
                continue;
            }
        };
        if name.ends_with(&format!("_{suffix}")) {
            continue;
        }
        let assigned = scene.rename(&name, &format!("{name}_{suffix}"))?;
        renamed.push(assigned);
    }

    info!("renamed {} nodes", renamed.len());
    Ok(renamed)
}
