//! # Scene Nodes
//!
//! A node is a named slot in the scene graph with a local transform and a
//! [`NodeKind`] payload. Plain DAG kinds (groups, meshes, locators, joints,
//! curves, cameras, lights) can parent each other; blend shapes and
//! controllers are non-DAG nodes that live at the root and reference other
//! nodes by name.

use cgmath::{Deg, Matrix4, Vector3};

use crate::scene::mesh::MeshData;

/// Stable handle to a node slot. Ids stay valid for the lifetime of the node
/// and are never reused within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// What a node is, together with its kind-specific payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh(MeshData),
    Locator,
    Joint,
    Curve,
    Camera(CameraData),
    Light(LightData),
    /// Per-vertex offset deformer targeting a mesh node by name.
    BlendShape(BlendShapeData),
    /// Scalar driver fanned out to a set of blend shapes.
    Controller(ControllerData),
}

impl NodeKind {
    /// Short lower-case label used in logs and listings.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Mesh(_) => "mesh",
            NodeKind::Locator => "locator",
            NodeKind::Joint => "joint",
            NodeKind::Curve => "curve",
            NodeKind::Camera(_) => "camera",
            NodeKind::Light(_) => "light",
            NodeKind::BlendShape(_) => "blendShape",
            NodeKind::Controller(_) => "controller",
        }
    }

    /// Whether the node takes part in the transform hierarchy. Deformers and
    /// controllers do not.
    pub fn is_dag(&self) -> bool {
        !matches!(self, NodeKind::BlendShape(_) | NodeKind::Controller(_))
    }
}

/// 2D pan/zoom state plus per-camera display toggles.
#[derive(Debug, Clone)]
pub struct CameraData {
    pub pan_zoom_enabled: bool,
    pub zoom: f32,
    pub horizontal_pan: f32,
    pub vertical_pan: f32,
    pub display: DisplaySettings,
}

impl CameraData {
    pub fn new() -> Self {
        Self {
            pan_zoom_enabled: false,
            zoom: 1.0,
            horizontal_pan: 0.0,
            vertical_pan: 0.0,
            display: DisplaySettings::new(),
        }
    }
}

impl Default for CameraData {
    fn default() -> Self {
        Self::new()
    }
}

/// Viewport display toggles tied to a camera.
#[derive(Debug, Clone)]
pub struct DisplaySettings {
    pub selection_highlight: bool,
    pub wireframe_on_shaded: bool,
    pub show_polymeshes: bool,
}

impl DisplaySettings {
    pub fn new() -> Self {
        Self {
            selection_highlight: true,
            wireframe_on_shaded: false,
            show_polymeshes: true,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Directional,
    Spot,
    Ambient,
}

/// Light payload; fields not meaningful for a kind (penumbra on a
/// directional, say) simply stay at their defaults.
#[derive(Debug, Clone)]
pub struct LightData {
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
    pub penumbra_angle: f32,
    pub depth_map_shadows: bool,
    pub dmap_resolution: u32,
    pub dmap_filter_size: u32,
}

impl LightData {
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            penumbra_angle: 0.0,
            depth_map_shadows: false,
            dmap_resolution: 512,
            dmap_filter_size: 1,
        }
    }
}

/// One blend-shape deformer: per-vertex deltas applied to `target`, scaled
/// by `envelope * weight`. `deltas` always has exactly as many entries as
/// the target mesh had vertices when the deformer was created.
#[derive(Debug, Clone)]
pub struct BlendShapeData {
    /// Mesh node the deltas displace.
    pub target: String,
    /// Name the consumed source mesh had, kept for reporting.
    pub source_name: String,
    pub deltas: Vec<[f32; 3]>,
    pub weight: f32,
    pub envelope: f32,
}

/// Controller payload: a single clamped amount fanned out to the envelopes
/// of the blend shapes in `driven`.
#[derive(Debug, Clone)]
pub struct ControllerData {
    pub amount: f32,
    pub driven: Vec<String>,
}

/// A named slot in the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Local translation.
    pub translation: Vector3<f32>,
    /// Local Euler rotation in degrees, applied X then Y then Z.
    pub rotation: Vector3<f32>,
    /// Local per-axis scale.
    pub scale: Vector3<f32>,
}

impl Node {
    pub(crate) fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            parent: None,
            children: Vec::new(),
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh(_))
    }

    pub fn mesh(&self) -> Option<&MeshData> {
        match &self.kind {
            NodeKind::Mesh(data) => Some(data),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut MeshData> {
        match &mut self.kind {
            NodeKind::Mesh(data) => Some(data),
            _ => None,
        }
    }

    /// Composes the local transform as translate * rotateZ * rotateY *
    /// rotateX * scale, i.e. scale first, X-axis rotation before Y before Z,
    /// translation last.
    pub fn local_transform(&self) -> Matrix4<f32> {
        let translate = Matrix4::from_translation(self.translation);
        let rotate = Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_x(Deg(self.rotation.x));
        let scale = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        translate * rotate * scale
    }

    /// True if the transform is still at its identity defaults.
    pub fn has_identity_transform(&self) -> bool {
        self.translation == Vector3::new(0.0, 0.0, 0.0)
            && self.rotation == Vector3::new(0.0, 0.0, 0.0)
            && self.scale == Vector3::new(1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn test_local_transform_order() {
        let mut node = Node::new("n".to_string(), NodeKind::Group);
        node.translation = Vector3::new(10.0, 0.0, 0.0);
        node.scale = Vector3::new(2.0, 2.0, 2.0);
        // Scale applies before translation: (1,0,0) -> (2,0,0) -> (12,0,0).
        let moved = node.local_transform() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((moved.x - 12.0).abs() < 1e-5);
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(NodeKind::Group.label(), "group");
        assert_eq!(NodeKind::Mesh(MeshData::default()).label(), "mesh");
        assert!(NodeKind::Group.is_dag());
        assert!(!NodeKind::Controller(ControllerData {
            amount: 1.0,
            driven: Vec::new(),
        })
        .is_dag());
    }

    #[test]
    fn test_camera_defaults() {
        let cam = CameraData::default();
        assert_eq!(cam.zoom, 1.0);
        assert!(!cam.pan_zoom_enabled);
        assert!(cam.display.selection_highlight);
        assert!(!cam.display.wireframe_on_shaded);
        assert!(cam.display.show_polymeshes);
    }
}
