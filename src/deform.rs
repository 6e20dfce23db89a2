//! # Blend-Shape Deformation
//!
//! Builds blend-shape deformers from matched mesh pairs and the single
//! controller that drives them.
//!
//! A deformer stores per-vertex deltas (source position minus target
//! position), so a weight of 1 reproduces the source shape exactly and the
//! source mesh can be consumed at creation time. The controller is one
//! scalar fanned out to the envelope of every deformer it drives, clamped to
//! `[0, 1]`. Baking writes the evaluated positions back into the target mesh
//! and deletes its deformers, which is what "delete history" amounts to
//! here.
//!
//! Besides the matched-pair path the importer drives, two selection-driven
//! shortcuts live here: [`blend_shape_selection`] wires each selected mesh
//! to its suffixed sculpt counterpart, and [`mirror_blend_shapes`] reshapes
//! a side-prefixed mesh's opposite number into its mirror image.

use log::{debug, info, warn};

use crate::error::{Result, ToolkitError};
use crate::naming;
use crate::scene::{BlendShapeData, ControllerData, NodeKind, Scene};
use crate::tools::hierarchy::freeze_subtree;

/// Name given to the fan-out controller.
pub const CONTROLLER_NAME: &str = "bShape_ctrl";

/// Base name for deformer nodes; the scene numbers repeats.
pub const BLEND_SHAPE_BASE: &str = "blendShape1";

/// Adds a deformer node for `source` on `target`, leaving the source mesh in
/// the scene.
fn add_deformer(scene: &mut Scene, source: &str, target: &str, weight: f32) -> Result<String> {
    let source_positions = scene.mesh(source)?.positions.clone();
    let target_mesh = scene.mesh(target)?;
    if source_positions.len() != target_mesh.vertex_count() {
        return Err(ToolkitError::VertexCountMismatch {
            source_name: source.to_string(),
            source_count: source_positions.len(),
            target_name: target.to_string(),
            target_count: target_mesh.vertex_count(),
        });
    }

    let deltas: Vec<[f32; 3]> = source_positions
        .iter()
        .zip(&target_mesh.positions)
        .map(|(s, t)| [s[0] - t[0], s[1] - t[1], s[2] - t[2]])
        .collect();

    let deformer = scene.add_node(
        BLEND_SHAPE_BASE,
        NodeKind::BlendShape(BlendShapeData {
            target: target.to_string(),
            source_name: source.to_string(),
            deltas,
            weight,
            envelope: 1.0,
        }),
    );
    debug!("blend shape `{deformer}`: `{source}` -> `{target}` at weight {weight}");
    Ok(deformer)
}

/// Creates a blend shape deforming `target` toward `source` and consumes the
/// source mesh. Returns the deformer's name.
///
/// Both nodes must be meshes with the same vertex count; the deformer's
/// deltas are computed against the target's base positions and its envelope
/// starts at 1.
pub fn create_blend_shape(
    scene: &mut Scene,
    source: &str,
    target: &str,
    weight: f32,
) -> Result<String> {
    let deformer = add_deformer(scene, source, target, weight)?;
    scene.delete(source)?;
    Ok(deformer)
}

/// Blend-shapes each selected mesh from its `<name>_<suffix>` counterpart.
///
/// Sculptors keep variant meshes next to the original under a suffix
/// convention (`arm` / `arm_sculpt`); this wires every such pair up at
/// weight 1 without consuming the sculpt, so it stays editable. Selected
/// nodes without a counterpart, non-mesh pairs and topology mismatches are
/// skipped with a note rather than aborting the batch. Returns the new
/// deformer names; an empty selection just warns.
pub fn blend_shape_selection(scene: &mut Scene, suffix: &str) -> Result<Vec<String>> {
    let selected = scene.selected();
    if selected.is_empty() {
        warn!("nothing selected, no blend shapes created");
        return Ok(Vec::new());
    }

    let mut deformers = Vec::new();
    for name in &selected {
        let counterpart = format!("{name}_{suffix}");
        if !scene.exists(&counterpart) {
            debug!("`{name}` has no `{counterpart}` counterpart, skipped");
            continue;
        }
        match add_deformer(scene, &counterpart, name, 1.0) {
            Ok(deformer) => deformers.push(deformer),
            Err(err @ (ToolkitError::NotAMesh(_) | ToolkitError::VertexCountMismatch { .. })) => {
                warn!("`{counterpart}` not blend shaped onto `{name}`: {err}");
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        "{} of {} selected meshes blend shaped from their `_{suffix}` counterparts",
        deformers.len(),
        selected.len()
    );
    Ok(deformers)
}

/// Reshapes each side-prefixed selected mesh's opposite counterpart into its
/// mirror image.
///
/// Every selected `L_`/`R_` mesh is duplicated, mirrored across the YZ plane
/// (negated X scale, then frozen), blend-shaped at weight 1 onto the
/// opposite-side mesh and baked straight in, so `R_arm` ends up as the exact
/// mirror of `L_arm` with no live deformer left behind. The mirrored
/// duplicate is consumed. Selected nodes without a side prefix or without an
/// opposite counterpart are skipped with a note. Returns the reshaped
/// counterpart names.
pub fn mirror_blend_shapes(scene: &mut Scene) -> Result<Vec<String>> {
    let selected = scene.selected();
    if selected.is_empty() {
        warn!("nothing selected to mirror");
        return Ok(Vec::new());
    }

    let mut reshaped = Vec::new();
    for name in &selected {
        let target = naming::swap_side_prefix(name);
        if target == *name {
            debug!("`{name}` has no side prefix, skipped");
            continue;
        }
        if !scene.exists(&target) {
            warn!("`{name}` has no `{target}` counterpart, skipped");
            continue;
        }

        let duplicate = scene.duplicate(name)?;
        scene.node_mut(&duplicate)?.scale.x *= -1.0;
        freeze_subtree(scene, &duplicate)?;
        create_blend_shape(scene, &duplicate, &target, 1.0)?;
        bake_blend_shapes(scene, &target)?;
        reshaped.push(target);
    }

    info!("{} meshes reshaped to mirror their opposite side", reshaped.len());
    Ok(reshaped)
}

/// Wires the given deformers to a single controller, or bakes them away.
///
/// With `suppress_controller` set, the deformers' targets are baked instead
/// (deltas written into the meshes, deformers deleted) and no node is
/// created. An empty deformer list is a no-op either way. Returns the
/// controller's name when one was created.
pub fn build_controller(
    scene: &mut Scene,
    deformers: &[String],
    suppress_controller: bool,
) -> Result<Option<String>> {
    if deformers.is_empty() {
        return Ok(None);
    }

    if suppress_controller {
        let mut targets: Vec<String> = Vec::new();
        for deformer in deformers {
            if let NodeKind::BlendShape(bs) = &scene.node(deformer)?.kind {
                if !targets.contains(&bs.target) {
                    targets.push(bs.target.clone());
                }
            }
        }
        for target in &targets {
            bake_blend_shapes(scene, target)?;
        }
        info!("baked {} blend shapes into {} meshes", deformers.len(), targets.len());
        return Ok(None);
    }

    let controller = scene.add_node(
        CONTROLLER_NAME,
        NodeKind::Controller(ControllerData {
            amount: 1.0,
            driven: deformers.to_vec(),
        }),
    );
    info!("controller `{controller}` drives {} blend shapes", deformers.len());
    Ok(Some(controller))
}

/// Bakes every blend shape on `mesh` into its base positions and deletes the
/// deformers. Returns how many deformers were removed.
pub fn bake_blend_shapes(scene: &mut Scene, mesh: &str) -> Result<usize> {
    let evaluated = scene.evaluated_positions(mesh)?;
    let deformers = scene.blend_shapes_on(mesh);
    scene.mesh_mut(mesh)?.positions = evaluated;
    for deformer in &deformers {
        scene.delete(deformer)?;
    }
    debug!("baked {} blend shapes into `{mesh}`", deformers.len());
    Ok(deformers.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MeshData;

    fn tri_at(y: f32) -> MeshData {
        MeshData::new(
            vec![[0.0, y, 0.0], [1.0, y, 0.0], [0.0, y + 1.0, 0.0]],
            vec![0, 1, 2],
        )
    }

    fn quad() -> MeshData {
        MeshData::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_create_consumes_source_and_stores_deltas() {
        let mut scene = Scene::new();
        scene.add_mesh("face", tri_at(0.0));
        scene.add_mesh("face_obj", tri_at(2.0));

        let deformer = create_blend_shape(&mut scene, "face_obj", "face", 1.0).unwrap();
        assert!(!scene.exists("face_obj"));
        assert_eq!(scene.blend_shapes_on("face"), vec![deformer.clone()]);

        match &scene.node(&deformer).unwrap().kind {
            NodeKind::BlendShape(bs) => {
                assert_eq!(bs.deltas[0], [0.0, 2.0, 0.0]);
                assert_eq!(bs.weight, 1.0);
                assert_eq!(bs.envelope, 1.0);
                assert_eq!(bs.source_name, "face_obj");
            }
            _ => panic!("not a blend shape"),
        }

        // Full weight reproduces the source shape.
        let evaluated = scene.evaluated_positions("face").unwrap();
        assert_eq!(evaluated[0], [0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_create_rejects_topology_mismatch() {
        let mut scene = Scene::new();
        scene.add_mesh("face", tri_at(0.0));
        scene.add_mesh("face_obj", quad());
        let err = create_blend_shape(&mut scene, "face_obj", "face", 1.0).unwrap_err();
        assert!(matches!(err, ToolkitError::VertexCountMismatch { .. }));
        // Nothing was consumed on failure.
        assert!(scene.exists("face_obj"));
    }

    #[test]
    fn test_create_rejects_non_mesh() {
        let mut scene = Scene::new();
        scene.add_group("grp");
        scene.add_mesh("face", tri_at(0.0));
        assert!(matches!(
            create_blend_shape(&mut scene, "grp", "face", 1.0),
            Err(ToolkitError::NotAMesh(_))
        ));
    }

    #[test]
    fn test_controller_drives_all_deformers() {
        let mut scene = Scene::new();
        scene.add_mesh("face", tri_at(0.0));
        scene.add_mesh("face_obj", tri_at(2.0));
        scene.add_mesh("jaw", tri_at(0.0));
        scene.add_mesh("jaw_obj", tri_at(4.0));
        let d1 = create_blend_shape(&mut scene, "face_obj", "face", 1.0).unwrap();
        let d2 = create_blend_shape(&mut scene, "jaw_obj", "jaw", 1.0).unwrap();

        let controller = build_controller(&mut scene, &[d1, d2], false)
            .unwrap()
            .unwrap();
        // The locator name artists know from the shelf button.
        assert_eq!(controller, "bShape_ctrl");
        assert_eq!(controller, CONTROLLER_NAME);

        scene.set_controller_amount(&controller, 0.5).unwrap();
        let face = scene.evaluated_positions("face").unwrap();
        let jaw = scene.evaluated_positions("jaw").unwrap();
        assert!((face[0][1] - 1.0).abs() < 1e-6);
        assert!((jaw[0][1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_controller_skipped_for_no_deformers() {
        let mut scene = Scene::new();
        assert_eq!(build_controller(&mut scene, &[], false).unwrap(), None);
        assert_eq!(build_controller(&mut scene, &[], true).unwrap(), None);
        assert!(!scene.exists(CONTROLLER_NAME));
    }

    #[test]
    fn test_suppress_bakes_instead() {
        let mut scene = Scene::new();
        scene.add_mesh("face", tri_at(0.0));
        scene.add_mesh("face_obj", tri_at(2.0));
        let d = create_blend_shape(&mut scene, "face_obj", "face", 1.0).unwrap();

        let controller = build_controller(&mut scene, &[d.clone()], true).unwrap();
        assert_eq!(controller, None);
        assert!(!scene.exists(&d));
        assert!(!scene.exists(CONTROLLER_NAME));
        // Deltas were written into the mesh itself.
        assert_eq!(scene.mesh("face").unwrap().positions[0], [0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_selection_pairs_by_suffix_and_keeps_sources() {
        let mut scene = Scene::new();
        scene.add_mesh("arm", tri_at(0.0));
        scene.add_mesh("arm_sculpt", tri_at(2.0));
        scene.add_mesh("leg", tri_at(0.0));
        scene.add_mesh("leg_sculpt", tri_at(4.0));
        scene.select(&["arm", "leg"]).unwrap();

        let deformers = blend_shape_selection(&mut scene, "sculpt").unwrap();
        assert_eq!(deformers.len(), 2);
        // The sculpts stay in the scene, still editable.
        assert!(scene.exists("arm_sculpt"));
        assert!(scene.exists("leg_sculpt"));

        // Weight 1: each original already shows its sculpt's shape.
        let arm = scene.evaluated_positions("arm").unwrap();
        assert_eq!(arm[0], [0.0, 2.0, 0.0]);
        let leg = scene.evaluated_positions("leg").unwrap();
        assert_eq!(leg[0], [0.0, 4.0, 0.0]);
    }

    #[test]
    fn test_selection_skips_missing_and_mismatched_counterparts() {
        let mut scene = Scene::new();
        scene.add_mesh("arm", tri_at(0.0));
        scene.add_mesh("boot", tri_at(0.0));
        scene.add_mesh("boot_sculpt", quad()); // wrong topology
        scene.add_mesh("face", tri_at(0.0));
        scene.add_mesh("face_sculpt", tri_at(1.0));
        scene.select(&["arm", "boot", "face"]).unwrap();

        let deformers = blend_shape_selection(&mut scene, "sculpt").unwrap();
        assert_eq!(deformers.len(), 1);
        assert_eq!(scene.blend_shapes_on("face"), deformers);
        assert!(scene.blend_shapes_on("arm").is_empty());
        assert!(scene.blend_shapes_on("boot").is_empty());
    }

    #[test]
    fn test_selection_empty_is_a_no_op() {
        let mut scene = Scene::new();
        scene.add_mesh("arm", tri_at(0.0));
        scene.add_mesh("arm_sculpt", tri_at(2.0));
        assert!(blend_shape_selection(&mut scene, "sculpt")
            .unwrap()
            .is_empty());
        assert!(scene.blend_shapes_on("arm").is_empty());
    }

    #[test]
    fn test_mirror_reshapes_the_opposite_side() {
        let mut scene = Scene::new();
        // An asymmetric left arm and a placeholder right arm.
        scene.add_mesh("L_arm", tri_at(0.0));
        scene.mesh_mut("L_arm").unwrap().positions[1] = [3.0, 0.0, 0.0];
        scene.add_mesh("R_arm", tri_at(0.0));
        scene.select(&["L_arm"]).unwrap();

        let reshaped = mirror_blend_shapes(&mut scene).unwrap();
        assert_eq!(reshaped, vec!["R_arm"]);

        // The right arm is now the exact mirror, baked in with no live
        // deformer and no leftover duplicate.
        let mesh = scene.mesh("R_arm").unwrap();
        assert_eq!(mesh.positions[1], [-3.0, 0.0, 0.0]);
        assert!(scene.blend_shapes_on("R_arm").is_empty());
        assert!(!scene.exists("L_arm1"));

        // The left side is untouched.
        assert_eq!(scene.mesh("L_arm").unwrap().positions[1], [3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mirror_works_from_either_side() {
        let mut scene = Scene::new();
        scene.add_mesh("R_leg", tri_at(0.0));
        scene.mesh_mut("R_leg").unwrap().positions[1] = [-2.0, 0.0, 0.0];
        scene.add_mesh("L_leg", tri_at(0.0));
        scene.select(&["R_leg"]).unwrap();

        let reshaped = mirror_blend_shapes(&mut scene).unwrap();
        assert_eq!(reshaped, vec!["L_leg"]);
        assert_eq!(scene.mesh("L_leg").unwrap().positions[1], [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_mirror_skips_unprefixed_and_unpaired_meshes() {
        let mut scene = Scene::new();
        scene.add_mesh("spine", tri_at(0.0));
        scene.add_mesh("L_orphan", tri_at(0.0));
        scene.select(&["spine", "L_orphan"]).unwrap();

        let reshaped = mirror_blend_shapes(&mut scene).unwrap();
        assert!(reshaped.is_empty());
        // No duplicates were left behind by the skips.
        assert!(!scene.exists("spine1"));
        assert!(!scene.exists("L_orphan1"));
    }

    #[test]
    fn test_mirror_pivots_on_the_source_transform() {
        use cgmath::Vector3;

        let mut scene = Scene::new();
        let left = scene.add_mesh("L_fin", tri_at(0.0));
        scene.node_mut(&left).unwrap().translation = Vector3::new(2.0, 0.0, 0.0);
        let right = scene.add_mesh("R_fin", tri_at(0.0));
        scene.node_mut(&right).unwrap().translation = Vector3::new(-2.0, 0.0, 0.0);
        scene.select(&["L_fin"]).unwrap();

        mirror_blend_shapes(&mut scene).unwrap();
        // Mirroring happens about the source's own pivot plane at x = 2, and
        // the freeze bakes translate * mirror into the duplicate, so the
        // target's new shape carries x -> 2 - x. Its own transform is
        // untouched.
        let mesh = scene.mesh("R_fin").unwrap();
        assert_eq!(mesh.positions[0], [2.0, 0.0, 0.0]);
        assert_eq!(mesh.positions[1], [1.0, 0.0, 0.0]);
        assert_eq!(
            scene.node("R_fin").unwrap().translation,
            Vector3::new(-2.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_bake_at_zero_weight_changes_nothing() {
        let mut scene = Scene::new();
        scene.add_mesh("face", tri_at(0.0));
        scene.add_mesh("face_obj", tri_at(2.0));
        create_blend_shape(&mut scene, "face_obj", "face", 0.0).unwrap();

        let removed = bake_blend_shapes(&mut scene, "face").unwrap();
        assert_eq!(removed, 1);
        assert_eq!(scene.mesh("face").unwrap().positions[0], [0.0, 0.0, 0.0]);
        assert!(scene.blend_shapes_on("face").is_empty());
    }
}
