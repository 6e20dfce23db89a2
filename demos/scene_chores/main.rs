//! # Scene Chores Demo
//!
//! A tour of the batch tools around the blend-shape pipeline, strung
//! together the way an artist would fire them from a shelf: block out one
//! side of a prop, mirror it, combine the halves, fix the names and drop a
//! light rig on the result.
//!
//! ## What this demo shows:
//! - Mirroring a hierarchy across the YZ plane with `L_`/`R_` renaming
//! - Combining selected meshes into one node
//! - Type-suffix renaming (`_geo`, `_grp`, ...)
//! - Fitting a three-point light rig to the scene bounds
//! - Storing and restoring parenting as a JSON preset
//!
//! ## Usage:
//! ```bash
//! cargo run --example scene_chores
//! ```

use anyhow::Result;
use stagecraft::prelude::*;
use stagecraft::tools::hierarchy;

fn wedge() -> MeshData {
    MeshData::new(
        vec![
            [0.5, 0.0, 0.0],
            [2.0, 0.0, 0.0],
            [2.0, 1.0, 0.0],
            [0.5, 1.0, 1.0],
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

fn main() -> Result<()> {
    env_logger::init();

    // Block out the left half of a prop.
    let mut scene = Scene::new();
    let grp = scene.add_group("L_wing");
    let geo = scene.add_mesh("L_panel", wedge());
    scene.parent(&geo, &grp)?;

    // Mirror it: duplicate, negate X, swap the side prefix, freeze.
    scene.select(&[grp.as_str()])?;
    let mirrored = mirror_hierarchy(&mut scene)?;
    println!("mirrored {grp} into {mirrored:?}");

    // Weld both panels into one mesh under the left group.
    scene.select(&["L_panel", "R_panel"])?;
    let combined = batch_combine(&mut scene, &CombineOptions::default())?;
    println!("combined into {combined:?}");

    // Conventional suffixes for everything that is left.
    let renamed = apply_type_suffixes(&mut scene, false)?;
    println!("renamed: {renamed:?}");

    // A rig fitted to whatever the scene bounds are now.
    if let Some(rig) = create_light_rig(&mut scene)? {
        println!("light rig under `{rig}`");
    }

    // Snapshot the parenting so a later cleanup can put it back.
    let preset_path = std::env::temp_dir().join("stagecraft_chores_preset.json");
    let everything = scene.ls();
    scene.select(&everything)?;
    let preset = hierarchy::store_hierarchy(&scene, &preset_path)?;
    println!("stored {} parent entries", preset.0.len());

    println!("\noutliner:");
    for root in scene.root_names() {
        println!("  {root}");
        for child in scene.descendants(&root)? {
            println!("    {child}");
        }
    }

    std::fs::remove_file(&preset_path)?;
    Ok(())
}
