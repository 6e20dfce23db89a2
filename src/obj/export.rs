//! # OBJ Export
//!
//! Writes selected meshes to `.obj` files. The selection is expanded to
//! every mesh at or below the selected nodes, so picking a group exports its
//! contents. Positions are written as currently evaluated, i.e. with live
//! blend shapes applied, in local space.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Result, ToolkitError};
use crate::scene::Scene;

/// One file per mesh, or everything concatenated into a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// One `.obj` named after the first mesh, all meshes as `g` blocks.
    Single,
    /// One `.obj` per mesh, named after it.
    Batch,
}

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub mode: ExportMode,
    /// Replace files that already exist instead of failing.
    pub force_overwrite: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            mode: ExportMode::Batch,
            force_overwrite: false,
        }
    }
}

/// Expands the selection to exportable meshes, in selection order with
/// descendants after their ancestor and duplicates dropped.
fn exportable_meshes(scene: &Scene) -> Result<Vec<String>> {
    let mut geos: Vec<String> = Vec::new();
    for picked in scene.selected() {
        if scene.node(&picked)?.is_mesh() && !geos.contains(&picked) {
            geos.push(picked.clone());
        }
        for below in scene.descendants(&picked)? {
            if scene.node(&below)?.is_mesh() && !geos.contains(&below) {
                geos.push(below);
            }
        }
    }
    Ok(geos)
}

fn check_target(path: &Path, force_overwrite: bool) -> Result<()> {
    if path.exists() && !force_overwrite {
        return Err(ToolkitError::WouldOverwrite(path.to_path_buf()));
    }
    Ok(())
}

/// Appends one mesh as a `g` block, offsetting face indices by the number of
/// vertices already written to the file.
fn write_geo(out: &mut impl Write, scene: &Scene, geo: &str, offset: &mut u32) -> Result<()> {
    let positions = scene.evaluated_positions(geo)?;
    let mesh = scene.mesh(geo)?;
    writeln!(out, "g {geo}")?;
    for p in &positions {
        writeln!(out, "v {} {} {}", p[0], p[1], p[2])?;
    }
    for tri in mesh.indices.chunks_exact(3) {
        writeln!(
            out,
            "f {} {} {}",
            tri[0] + *offset + 1,
            tri[1] + *offset + 1,
            tri[2] + *offset + 1
        )?;
    }
    *offset += positions.len() as u32;
    Ok(())
}

/// Exports the selected meshes into `dir` and re-selects exactly what was
/// written. Returns the exported mesh names.
///
/// An empty selection (or one with no meshes under it) logs a warning and
/// returns an empty list. Existing files fail with
/// [`ToolkitError::WouldOverwrite`] unless `force_overwrite` is set; targets
/// are checked up front so a refused batch writes nothing at all.
pub fn export_objs(scene: &mut Scene, dir: &Path, options: &ExportOptions) -> Result<Vec<String>> {
    let geos = exportable_meshes(scene)?;
    if geos.is_empty() {
        warn!("nothing selected to export");
        return Ok(Vec::new());
    }

    match options.mode {
        ExportMode::Batch => {
            let targets: Vec<PathBuf> = geos
                .iter()
                .map(|geo| dir.join(format!("{geo}.obj")))
                .collect();
            for target in &targets {
                check_target(target, options.force_overwrite)?;
            }
            for (geo, target) in geos.iter().zip(&targets) {
                let mut out = BufWriter::new(File::create(target)?);
                let mut offset = 0;
                write_geo(&mut out, scene, geo, &mut offset)?;
                out.flush()?;
            }
        }
        ExportMode::Single => {
            let target = dir.join(format!("{}.obj", geos[0]));
            check_target(&target, options.force_overwrite)?;
            let mut out = BufWriter::new(File::create(&target)?);
            let mut offset = 0;
            for geo in &geos {
                write_geo(&mut out, scene, geo, &mut offset)?;
            }
            out.flush()?;
        }
    }

    scene.select(&geos)?;
    info!("{} geometries exported to {}", geos.len(), dir.display());
    Ok(geos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::test_support::scratch_dir;
    use crate::obj::{import_objs, ImportOptions};
    use crate::scene::MeshData;

    fn tri_at(y: f32) -> MeshData {
        MeshData::new(
            vec![[0.0, y, 0.0], [1.0, y, 0.0], [0.0, y + 1.0, 0.0]],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_batch_export_writes_one_file_per_mesh() {
        let dir = scratch_dir("export_batch");
        let mut scene = Scene::new();
        let grp = scene.add_group("props_grp");
        let rock = scene.add_mesh("rock", tri_at(0.0));
        scene.parent(&rock, &grp).unwrap();
        scene.add_mesh("stick", tri_at(1.0));
        scene.select(&["props_grp", "stick"]).unwrap();

        let exported = export_objs(&mut scene, &dir, &ExportOptions::default()).unwrap();
        assert_eq!(exported, vec!["rock", "stick"]);
        assert!(dir.join("rock.obj").exists());
        assert!(dir.join("stick.obj").exists());
        // Export re-selects exactly the meshes it wrote.
        assert_eq!(scene.selected(), vec!["rock", "stick"]);
    }

    #[test]
    fn test_export_round_trips_through_import() {
        let dir = scratch_dir("export_roundtrip");
        let mut scene = Scene::new();
        scene.add_mesh("rock", tri_at(2.5));
        scene.select(&["rock"]).unwrap();
        export_objs(&mut scene, &dir, &ExportOptions::default()).unwrap();

        let mut other = Scene::new();
        let report = import_objs(
            &mut other,
            &[dir.join("rock.obj")],
            &ImportOptions::default(),
        )
        .unwrap();
        assert_eq!(report.new_geos, vec!["rock"]);
        assert_eq!(
            other.mesh("rock").unwrap().positions,
            scene.mesh("rock").unwrap().positions
        );
    }

    #[test]
    fn test_single_mode_concatenates_with_offsets() {
        let dir = scratch_dir("export_single");
        let mut scene = Scene::new();
        scene.add_mesh("hull", tri_at(0.0));
        scene.add_mesh("deck", tri_at(3.0));
        scene.select(&["hull", "deck"]).unwrap();

        let exported = export_objs(
            &mut scene,
            &dir,
            &ExportOptions {
                mode: ExportMode::Single,
                force_overwrite: false,
            },
        )
        .unwrap();
        assert_eq!(exported.len(), 2);
        assert!(dir.join("hull.obj").exists());
        assert!(!dir.join("deck.obj").exists());

        let text = std::fs::read_to_string(dir.join("hull.obj")).unwrap();
        assert!(text.contains("g hull"));
        assert!(text.contains("g deck"));
        // Second mesh's face indices start after the first mesh's vertices.
        assert!(text.contains("f 4 5 6"));
    }

    #[test]
    fn test_overwrite_is_refused_without_force() {
        let dir = scratch_dir("export_overwrite");
        let mut scene = Scene::new();
        scene.add_mesh("rock", tri_at(0.0));
        scene.select(&["rock"]).unwrap();

        export_objs(&mut scene, &dir, &ExportOptions::default()).unwrap();
        let err = export_objs(&mut scene, &dir, &ExportOptions::default()).unwrap_err();
        assert!(matches!(err, ToolkitError::WouldOverwrite(_)));

        let forced = export_objs(
            &mut scene,
            &dir,
            &ExportOptions {
                mode: ExportMode::Batch,
                force_overwrite: true,
            },
        );
        assert!(forced.is_ok());
    }

    #[test]
    fn test_empty_selection_exports_nothing() {
        let dir = scratch_dir("export_empty");
        let mut scene = Scene::new();
        scene.add_mesh("rock", tri_at(0.0));
        let exported = export_objs(&mut scene, &dir, &ExportOptions::default()).unwrap();
        assert!(exported.is_empty());

        // A selection with no meshes under it behaves the same.
        scene.add_group("empty_grp");
        scene.select(&["empty_grp"]).unwrap();
        let exported = export_objs(&mut scene, &dir, &ExportOptions::default()).unwrap();
        assert!(exported.is_empty());
    }

    #[test]
    fn test_export_applies_live_blend_shapes() {
        use crate::deform::create_blend_shape;

        let dir = scratch_dir("export_deformed");
        let mut scene = Scene::new();
        scene.add_mesh("face", tri_at(0.0));
        scene.add_mesh("face_obj", tri_at(2.0));
        create_blend_shape(&mut scene, "face_obj", "face", 1.0).unwrap();
        scene.select(&["face"]).unwrap();

        export_objs(&mut scene, &dir, &ExportOptions::default()).unwrap();
        let text = std::fs::read_to_string(dir.join("face.obj")).unwrap();
        assert!(text.contains("v 0 2 0"));
    }
}
