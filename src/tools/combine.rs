//! # Batch Combine
//!
//! Fuses selected meshes into fewer nodes. With no filters the whole
//! selection becomes one mesh; the subdivision and material-tag filters
//! split the selection into buckets first and combine each bucket on its
//! own, so a cage never gets welded to a render mesh and differently-tagged
//! parts stay apart.
//!
//! Combination happens in world space, then the result is re-expressed in
//! the first member's parent frame, which is where the combined node is
//! parented. The combined node takes the first member's name.

use cgmath::SquareMatrix;
use log::{info, warn};

use crate::error::Result;
use crate::naming;
use crate::scene::{MeshData, Scene};

#[derive(Debug, Clone, Copy, Default)]
pub struct CombineOptions {
    /// Keep subdivision cages separate from plain meshes.
    pub use_subdiv: bool,
    /// Keep differently material-tagged meshes separate.
    pub use_tags: bool,
}

type BucketKey = (Option<bool>, Option<String>);

/// Partitions the selected meshes by the active filters, preserving
/// selection order within and across buckets.
fn bucket_selection(scene: &Scene, options: &CombineOptions) -> Vec<Vec<String>> {
    let mut buckets: Vec<(BucketKey, Vec<String>)> = Vec::new();
    for name in scene.selected() {
        let mesh = match scene.mesh(&name) {
            Ok(m) => m,
            Err(_) => continue,
        };
        let key: BucketKey = (
            options.use_subdiv.then_some(mesh.subdiv),
            if options.use_tags {
                naming::material_tag(&name)
            } else {
                None
            },
        );
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(name),
            None => buckets.push((key, vec![name])),
        }
    }
    buckets.into_iter().map(|(_, members)| members).collect()
}

/// Fuses one bucket into a single mesh named after its first member.
fn combine_bucket(scene: &mut Scene, members: &[String]) -> Result<String> {
    let first = members[0].clone();
    let parent = scene.parent_of(&first)?;

    // Union in world space, then bring the result into the parent's frame.
    let mut parts = Vec::with_capacity(members.len());
    let mut any_subdiv = false;
    for member in members {
        let world = scene.world_transform(member)?;
        let mut part = scene.mesh(member)?.clone();
        any_subdiv |= part.subdiv;
        part.apply_transform(&world);
        parts.push(part);
    }
    let mut merged = MeshData::merge(parts.iter());
    merged.subdiv = any_subdiv;
    if let Some(parent_name) = &parent {
        if let Some(inverse) = scene.world_transform(parent_name)?.invert() {
            merged.apply_transform(&inverse);
        }
    }

    for member in members {
        scene.delete(member)?;
    }
    let combined = scene.add_mesh(&first, merged);
    if let Some(parent_name) = &parent {
        scene.parent(&combined, parent_name)?;
    }
    info!("combined {} meshes into `{combined}`", members.len());
    Ok(combined)
}

/// Combines the selected meshes, bucketed by the active filters. Buckets
/// with a single member are left alone. Returns the combined node names and
/// selects them.
pub fn batch_combine(scene: &mut Scene, options: &CombineOptions) -> Result<Vec<String>> {
    let buckets = bucket_selection(scene, options);
    if buckets.is_empty() {
        warn!("no meshes selected, nothing combined");
        return Ok(Vec::new());
    }

    let mut combined = Vec::new();
    for members in &buckets {
        if members.len() < 2 {
            continue;
        }
        combined.push(combine_bucket(scene, members)?);
    }

    if combined.is_empty() {
        warn!("every bucket had a single mesh, nothing combined");
        return Ok(Vec::new());
    }
    scene.select(&combined)?;
    Ok(combined)
}
