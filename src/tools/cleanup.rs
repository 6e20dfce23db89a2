//! # Scene Cleanup
//!
//! Housekeeping passes that strip stale pipeline data off meshes before an
//! asset moves on. Today that means painted color sets, which sculpting
//! leaves behind and which bloat every export downstream.

use log::{info, warn};

use crate::error::Result;
use crate::scene::Scene;

/// Meshes a cleanup pass should touch: every mesh in the scene, or the
/// selected meshes plus the meshes below the selection.
fn cleanup_targets(scene: &Scene, entire_scene: bool) -> Result<Vec<String>> {
    if entire_scene {
        return Ok(scene.mesh_names());
    }
    let mut targets: Vec<String> = Vec::new();
    for picked in scene.selected() {
        if scene.node(&picked)?.is_mesh() && !targets.contains(&picked) {
            targets.push(picked.clone());
        }
        for below in scene.descendants(&picked)? {
            if scene.node(&below)?.is_mesh() && !targets.contains(&below) {
                targets.push(below);
            }
        }
    }
    Ok(targets)
}

/// Deletes every color set on the targeted meshes and returns how many sets
/// were removed. An empty target list just warns.
pub fn remove_color_sets(scene: &mut Scene, entire_scene: bool) -> Result<usize> {
    let targets = cleanup_targets(scene, entire_scene)?;
    if targets.is_empty() {
        warn!("no meshes to clean");
        return Ok(0);
    }

    let mut removed = 0;
    for name in &targets {
        let mesh = scene.mesh_mut(name)?;
        removed += mesh.color_sets.len();
        mesh.color_sets.clear();
    }

    if removed > 0 {
        warn!("{removed} color sets were deleted");
    } else {
        info!("no color sets found");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshData;

    fn painted_tri(sets: &[&str]) -> MeshData {
        let mut mesh = MeshData::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        );
        mesh.color_sets = sets.iter().map(|s| s.to_string()).collect();
        mesh
    }

    #[test]
    fn test_entire_scene_sweep() {
        let mut scene = Scene::new();
        scene.add_mesh("a", painted_tri(&["ao", "dirt"]));
        scene.add_mesh("b", painted_tri(&["mask"]));

        let removed = remove_color_sets(&mut scene, true).unwrap();
        assert_eq!(removed, 3);
        assert!(scene.mesh("a").unwrap().color_sets.is_empty());
        assert!(scene.mesh("b").unwrap().color_sets.is_empty());
    }

    #[test]
    fn test_selection_sweep_covers_descendants() {
        let mut scene = Scene::new();
        let grp = scene.add_group("grp");
        let inside = scene.add_mesh("inside", painted_tri(&["ao"]));
        scene.parent(&inside, &grp).unwrap();
        scene.add_mesh("outside", painted_tri(&["ao"]));
        scene.select(&["grp"]).unwrap();

        let removed = remove_color_sets(&mut scene, false).unwrap();
        assert_eq!(removed, 1);
        assert!(scene.mesh("inside").unwrap().color_sets.is_empty());
        assert_eq!(scene.mesh("outside").unwrap().color_sets, vec!["ao"]);
    }

    #[test]
    fn test_clean_scene_reports_zero() {
        let mut scene = Scene::new();
        scene.add_mesh("a", painted_tri(&[]));
        assert_eq!(remove_color_sets(&mut scene, true).unwrap(), 0);
    }

    #[test]
    fn test_no_targets_is_a_no_op() {
        let mut scene = Scene::new();
        scene.add_group("grp");
        assert_eq!(remove_color_sets(&mut scene, false).unwrap(), 0);
        assert_eq!(remove_color_sets(&mut scene, true).unwrap(), 0);
    }
}
