//! # Blend-Shape Pipeline Demo
//!
//! This is the walkthrough for the pipeline stagecraft exists for: export
//! geometry, sculpt it elsewhere, bring it back and have every sculpt land
//! as a blend shape on the mesh it belongs to.
//!
//! ## What this demo shows:
//! - How to build a scene and export its meshes as OBJ files
//! - How the importer marks name collisions with the `_obj` token
//! - How the matcher pairs imports with scene geometry by name and vertex count
//! - How matched imports become blend shapes behind a single controller
//!
//! ## Usage:
//! ```bash
//! cargo run --example blend_shape_pipeline
//! ```
//!
//! The demo works entirely in a temp directory and prints what happened at
//! each stage; run with `RUST_LOG=debug` to watch the matcher's decisions.

use std::fs;

use anyhow::Result;
use stagecraft::prelude::*;

fn tri(y: f32) -> MeshData {
    MeshData::new(
        vec![[0.0, y, 0.0], [1.0, y, 0.0], [0.0, y + 1.0, 0.0]],
        vec![0, 1, 2],
    )
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = std::env::temp_dir().join("stagecraft_blend_demo");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir)?;

    // Stage 1: a scene with two meshes, exported one file per mesh.
    let mut scene = Scene::new();
    scene.add_mesh("helmet", tri(0.0));
    scene.add_mesh("glove", tri(0.0));
    scene.select(&["helmet", "glove"])?;
    let exported = export_objs(&mut scene, &dir, &ExportOptions::default())?;
    println!("exported: {exported:?}");

    // Stage 2: "sculpt" the exported files by nudging their vertices. In a
    // real pipeline this happens in a sculpting package.
    for name in &exported {
        let path = dir.join(format!("{name}.obj"));
        let sculpted = fs::read_to_string(&path)?.replace("v 0 0 0", "v 0 2 0");
        fs::write(&path, sculpted)?;
    }

    // Stage 3: import the sculpts back. The names collide with the live
    // meshes, so each import comes in as `<name>_obj`, the matcher pairs it
    // with its original, and the pair becomes a weight-1 blend shape.
    let paths: Vec<_> = exported.iter().map(|n| dir.join(format!("{n}.obj"))).collect();
    let report = import_blend_batch(&mut scene, &paths, &BlendImportOptions::default())?;
    println!("blend shaped: {:?}", report.blend_shaped);
    println!("unmatched:    {:?}", report.unmatched);

    // Stage 4: the controller fades every sculpt in and out together.
    let controller = report.controller.expect("matched imports make a controller");
    for amount in [1.0, 0.5, 0.0] {
        scene.set_controller_amount(&controller, amount)?;
        let helmet = scene.evaluated_positions("helmet")?;
        println!("{controller} = {amount}: helmet vertex 0 sits at {:?}", helmet[0]);
    }

    fs::remove_dir_all(&dir)?;
    Ok(())
}
