//! # Camera Pan/Zoom
//!
//! Nudges a camera's 2D pan/zoom in fixed steps and toggles its per-camera
//! display settings. Every pan or zoom step switches 2D pan/zoom on first,
//! so a camera fresh out of the box reacts to the first keypress.
//!
//! Zooming in shrinks the zoom factor (1.0 is neutral), mirroring how a 2D
//! zoom narrows the visible region.

use log::{debug, info};

use crate::error::{Result, ToolkitError};
use crate::scene::{CameraData, NodeKind, Scene};

/// Zoom factor change per step.
pub const ZOOM_STEP: f32 = 0.1;
/// Pan offset change per step.
pub const PAN_STEP: f32 = 0.02;

fn camera_mut<'a>(scene: &'a mut Scene, camera: &str) -> Result<&'a mut CameraData> {
    match &mut scene.node_mut(camera)?.kind {
        NodeKind::Camera(data) => Ok(data),
        _ => Err(ToolkitError::NotACamera(camera.to_string())),
    }
}

fn camera_ref<'a>(scene: &'a Scene, camera: &str) -> Result<&'a CameraData> {
    match &scene.node(camera)?.kind {
        NodeKind::Camera(data) => Ok(data),
        _ => Err(ToolkitError::NotACamera(camera.to_string())),
    }
}

/// Switches 2D pan/zoom on without moving anything.
pub fn enable_pan_zoom(scene: &mut Scene, camera: &str) -> Result<()> {
    camera_mut(scene, camera)?.pan_zoom_enabled = true;
    Ok(())
}

/// Current `(zoom, horizontal pan, vertical pan)` of a camera.
pub fn pan_zoom_state(scene: &Scene, camera: &str) -> Result<(f32, f32, f32)> {
    let data = camera_ref(scene, camera)?;
    Ok((data.zoom, data.horizontal_pan, data.vertical_pan))
}

/// Zooms in one step and returns the new zoom factor.
pub fn zoom_in(scene: &mut Scene, camera: &str) -> Result<f32> {
    let data = camera_mut(scene, camera)?;
    data.pan_zoom_enabled = true;
    data.zoom -= ZOOM_STEP;
    debug!("`{camera}` zoom {}", data.zoom);
    Ok(data.zoom)
}

/// Zooms out one step and returns the new zoom factor.
pub fn zoom_out(scene: &mut Scene, camera: &str) -> Result<f32> {
    let data = camera_mut(scene, camera)?;
    data.pan_zoom_enabled = true;
    data.zoom += ZOOM_STEP;
    debug!("`{camera}` zoom {}", data.zoom);
    Ok(data.zoom)
}

/// Pans one step left and returns the new horizontal pan.
pub fn pan_left(scene: &mut Scene, camera: &str) -> Result<f32> {
    let data = camera_mut(scene, camera)?;
    data.pan_zoom_enabled = true;
    data.horizontal_pan -= PAN_STEP;
    Ok(data.horizontal_pan)
}

/// Pans one step right and returns the new horizontal pan.
pub fn pan_right(scene: &mut Scene, camera: &str) -> Result<f32> {
    let data = camera_mut(scene, camera)?;
    data.pan_zoom_enabled = true;
    data.horizontal_pan += PAN_STEP;
    Ok(data.horizontal_pan)
}

/// Pans one step up and returns the new vertical pan.
pub fn pan_up(scene: &mut Scene, camera: &str) -> Result<f32> {
    let data = camera_mut(scene, camera)?;
    data.pan_zoom_enabled = true;
    data.vertical_pan += PAN_STEP;
    Ok(data.vertical_pan)
}

/// Pans one step down and returns the new vertical pan.
pub fn pan_down(scene: &mut Scene, camera: &str) -> Result<f32> {
    let data = camera_mut(scene, camera)?;
    data.pan_zoom_enabled = true;
    data.vertical_pan -= PAN_STEP;
    Ok(data.vertical_pan)
}

/// Puts pan and zoom back to neutral, leaving 2D pan/zoom enabled.
pub fn reset_pan_zoom(scene: &mut Scene, camera: &str) -> Result<()> {
    let data = camera_mut(scene, camera)?;
    data.pan_zoom_enabled = true;
    data.zoom = 1.0;
    data.horizontal_pan = 0.0;
    data.vertical_pan = 0.0;
    info!("`{camera}` pan/zoom was reset");
    Ok(())
}

/// Flips selection highlighting for this camera's view; returns the new
/// state.
pub fn toggle_selection_highlight(scene: &mut Scene, camera: &str) -> Result<bool> {
    let display = &mut camera_mut(scene, camera)?.display;
    display.selection_highlight = !display.selection_highlight;
    Ok(display.selection_highlight)
}

/// Flips wireframe-on-shaded for this camera's view; returns the new state.
pub fn toggle_wireframe_on_shaded(scene: &mut Scene, camera: &str) -> Result<bool> {
    let display = &mut camera_mut(scene, camera)?.display;
    display.wireframe_on_shaded = !display.wireframe_on_shaded;
    Ok(display.wireframe_on_shaded)
}

/// Flips polygon mesh visibility for this camera's view; returns the new
/// state.
pub fn toggle_polymesh_display(scene: &mut Scene, camera: &str) -> Result<bool> {
    let display = &mut camera_mut(scene, camera)?.display;
    display.show_polymeshes = !display.show_polymeshes;
    Ok(display.show_polymeshes)
}
