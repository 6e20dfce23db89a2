//! # Three-Point Light Rig
//!
//! Drops a key/rim/fill rig around whatever geometry is in the scene,
//! sized and positioned from the scene bounds. An empty scene gets a rig
//! fitted to a nominal character volume instead, so look-dev can start
//! before any geometry lands.

use cgmath::{InnerSpace, Vector3};
use log::info;

use crate::error::Result;
use crate::scene::{Aabb, LightData, LightKind, Scene};

/// Group holding the whole rig; its presence means a rig was already built.
pub const LIGHT_RIG_GROUP: &str = "light_rig_grp";

const KEY_LIGHT: &str = "key_light";
const RIM_LIGHT: &str = "rim_light";
const FILL_LIGHT: &str = "fill_light";
const RIM_TARGET: &str = "rim_light_target_null";

/// Bounds assumed for an empty scene, roughly a standing character.
fn fallback_bounds() -> Aabb {
    Aabb::new(Vector3::new(-5.0, 0.0, -5.0), Vector3::new(5.0, 15.0, 5.0))
}

/// Beyond this coordinate the scene counts as huge and the lights scale up.
const LARGE_SCENE_THRESHOLD: f32 = 200.0;

const SMALL_SCALE: f32 = 3.0;
const LARGE_SCALE: f32 = 20.0;

fn shadowed_light(kind: LightKind) -> LightData {
    let mut light = LightData::new(kind);
    light.depth_map_shadows = true;
    light.dmap_resolution = 4096;
    light.dmap_filter_size = 4;
    light
}

/// Euler degrees (pitch, yaw, 0) that point a node's -Z axis from `from`
/// toward `to`.
fn aim_rotation(from: Vector3<f32>, to: Vector3<f32>) -> Vector3<f32> {
    let dir = (to - from).normalize();
    let pitch = dir.y.clamp(-1.0, 1.0).asin().to_degrees();
    let yaw = (-dir.x).atan2(-dir.z).to_degrees();
    Vector3::new(pitch, yaw, 0.0)
}

/// Builds the rig and returns its group name, or `None` when a rig already
/// exists.
///
/// The key is a shadowed directional above the bounds' maximum corner, the
/// rim a cool shadowed spot behind the minimum corner aimed at a locator at
/// mid-height, and the fill a dim ambient. Everything is grouped under
/// [`LIGHT_RIG_GROUP`], which is moved to the front of the outliner.
pub fn create_light_rig(scene: &mut Scene) -> Result<Option<String>> {
    if scene.exists(LIGHT_RIG_GROUP) {
        info!("light rig already exists, nothing created");
        return Ok(None);
    }

    let bounds = scene.scene_bounds().unwrap_or_else(fallback_bounds);
    let coords = [
        bounds.min.x,
        bounds.min.y,
        bounds.min.z,
        bounds.max.x,
        bounds.max.y,
        bounds.max.z,
    ];
    let scale = if coords.iter().any(|c| c.abs() > LARGE_SCENE_THRESHOLD) {
        LARGE_SCALE
    } else {
        SMALL_SCALE
    };

    let key = scene.add_light(KEY_LIGHT, shadowed_light(LightKind::Directional));
    {
        let node = scene.node_mut(&key)?;
        node.translation = Vector3::new(
            (bounds.max.x + bounds.max.x / 3.0).round(),
            (bounds.max.y + bounds.max.y / 3.0).round(),
            (bounds.max.z + bounds.max.z / 2.0).round(),
        );
        node.rotation = Vector3::new(-35.0, 20.0, 0.0);
        node.scale = Vector3::new(scale, scale, scale);
    }

    let target = scene.add_locator(RIM_TARGET);
    let target_position = Vector3::new(0.0, (bounds.max.y / 2.0).round(), 0.0);
    scene.node_mut(&target)?.translation = target_position;

    let mut rim_light = shadowed_light(LightKind::Spot);
    rim_light.color = [0.6, 0.8, 1.0];
    rim_light.intensity = 1.25;
    rim_light.penumbra_angle = 50.0;
    let rim = scene.add_light(RIM_LIGHT, rim_light);
    {
        let rim_position = Vector3::new(
            (bounds.min.x + bounds.min.x / 3.0).round(),
            (bounds.max.y + bounds.max.y / 3.0).round(),
            (bounds.min.z + bounds.min.z / 2.0).round(),
        );
        let node = scene.node_mut(&rim)?;
        node.translation = rim_position;
        node.rotation = aim_rotation(rim_position, target_position);
        node.scale = Vector3::new(scale, scale, scale);
    }

    let mut fill_light = LightData::new(LightKind::Ambient);
    fill_light.intensity = 0.35;
    let fill = scene.add_light(FILL_LIGHT, fill_light);

    let group = scene.add_group(LIGHT_RIG_GROUP);
    for light in [&key, &rim, &target, &fill] {
        scene.parent(light, &group)?;
    }
    scene.reorder_front(&group)?;

    info!("light rig created at scale {scale}");
    Ok(Some(group))
}
