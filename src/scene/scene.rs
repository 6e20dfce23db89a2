//! # Scene Graph
//!
//! An in-memory stand-in for a host application's scene: a slot arena of
//! named [`Node`]s with parent/child ordering, an ordered selection list and
//! the queries the batch tools are written against (listing, vertex counts,
//! world transforms, scene bounds).
//!
//! ## Guarantees
//!
//! * Names are unique. Inserting or renaming to a taken name appends a
//!   counter (`geo`, `geo1`, `geo2`, ...).
//! * [`NodeId`]s stay valid until their node is deleted and are never reused
//!   within one scene.
//! * Child lists, root list and selection keep insertion order; `ls` walks
//!   nodes in creation order.
//! * Deleting a node deletes its whole subtree, plus any blend shape whose
//!   target went away, and scrubs dangling names from controllers and the
//!   selection.
//!
//! ## Usage
//!
//! ```
//! use stagecraft::scene::Scene;
//!
//! let mut scene = Scene::new();
//! let grp = scene.add_group("props_grp");
//! let rock = scene.add_group("rock");
//! scene.parent(&rock, &grp).unwrap();
//! assert_eq!(scene.children_of(&grp).unwrap(), vec!["rock"]);
//! ```

use std::collections::HashMap;

use cgmath::Matrix4;
use log::debug;

use crate::error::{Result, ToolkitError};
use crate::matcher::GeometryRef;
use crate::naming;
use crate::scene::mesh::{Aabb, MeshData};
use crate::scene::node::{CameraData, LightData, Node, NodeId, NodeKind};

/// Slot-arena scene graph with unique names and ordered hierarchy.
pub struct Scene {
    /// Node storage; deleted slots become `None` so ids stay stable.
    slots: Vec<Option<Node>>,
    /// Name -> id for every live node.
    by_name: HashMap<String, NodeId>,
    /// Ids of live nodes without a parent, in insertion order.
    roots: Vec<NodeId>,
    /// Ordered selection.
    selection: Vec<NodeId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            by_name: HashMap::new(),
            roots: Vec::new(),
            selection: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // insertion

    fn insert(&mut self, name: &str, kind: NodeKind) -> NodeId {
        let name = naming::unique_name(name, |n| self.by_name.contains_key(n));
        let label = kind.label();
        let id = NodeId(self.slots.len());
        self.slots.push(Some(Node::new(name.clone(), kind)));
        self.by_name.insert(name.clone(), id);
        self.roots.push(id);
        debug!("added {label} `{name}`");
        id
    }

    /// Adds a node of any kind, uniquifying `name` if it is taken. Returns
    /// the name actually assigned.
    pub fn add_node(&mut self, name: &str, kind: NodeKind) -> String {
        let id = self.insert(name, kind);
        self.node_ref(id).name.clone()
    }

    pub fn add_group(&mut self, name: &str) -> String {
        self.add_node(name, NodeKind::Group)
    }

    pub fn add_mesh(&mut self, name: &str, data: MeshData) -> String {
        self.add_node(name, NodeKind::Mesh(data))
    }

    pub fn add_locator(&mut self, name: &str) -> String {
        self.add_node(name, NodeKind::Locator)
    }

    pub fn add_joint(&mut self, name: &str) -> String {
        self.add_node(name, NodeKind::Joint)
    }

    pub fn add_curve(&mut self, name: &str) -> String {
        self.add_node(name, NodeKind::Curve)
    }

    pub fn add_camera(&mut self, name: &str) -> String {
        self.add_node(name, NodeKind::Camera(CameraData::new()))
    }

    pub fn add_light(&mut self, name: &str, data: LightData) -> String {
        self.add_node(name, NodeKind::Light(data))
    }

    // ------------------------------------------------------------------
    // lookup

    fn node_ref(&self, id: NodeId) -> &Node {
        self.slots[id.0].as_ref().expect("live node id")
    }

    fn node_mut_ref(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0].as_mut().expect("live node id")
    }

    fn lookup(&self, name: &str) -> Result<NodeId> {
        self.id_of(name)
            .ok_or_else(|| ToolkitError::GeometryLookup(name.to_string()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Result<&Node> {
        Ok(self.node_ref(self.lookup(name)?))
    }

    pub fn node_mut(&mut self, name: &str) -> Result<&mut Node> {
        let id = self.lookup(name)?;
        Ok(self.node_mut_ref(id))
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Live nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Every live node name in creation order.
    pub fn ls(&self) -> Vec<String> {
        self.iter().map(|n| n.name.clone()).collect()
    }

    /// Names of all mesh nodes in creation order.
    pub fn mesh_names(&self) -> Vec<String> {
        self.iter()
            .filter(|n| n.is_mesh())
            .map(|n| n.name.clone())
            .collect()
    }

    /// All mesh nodes as [`GeometryRef`]s, ready to feed the matcher.
    pub fn geometry_refs(&self) -> Vec<GeometryRef> {
        self.mesh_names().into_iter().map(GeometryRef::new).collect()
    }

    pub fn mesh(&self, name: &str) -> Result<&MeshData> {
        self.node(name)?
            .mesh()
            .ok_or_else(|| ToolkitError::NotAMesh(name.to_string()))
    }

    pub fn mesh_mut(&mut self, name: &str) -> Result<&mut MeshData> {
        self.node_mut(name)?
            .mesh_mut()
            .ok_or_else(|| ToolkitError::NotAMesh(name.to_string()))
    }

    pub fn vertex_count(&self, name: &str) -> Result<usize> {
        Ok(self.mesh(name)?.vertex_count())
    }

    // ------------------------------------------------------------------
    // hierarchy

    pub fn parent_of(&self, name: &str) -> Result<Option<String>> {
        let node = self.node(name)?;
        Ok(node.parent.map(|p| self.node_ref(p).name.clone()))
    }

    pub fn children_of(&self, name: &str) -> Result<Vec<String>> {
        let node = self.node(name)?;
        Ok(node
            .children
            .iter()
            .map(|&c| self.node_ref(c).name.clone())
            .collect())
    }

    /// Names of every node below `name` in depth-first pre-order, the node
    /// itself excluded.
    pub fn descendants(&self, name: &str) -> Result<Vec<String>> {
        let id = self.lookup(name)?;
        let mut ids = Vec::new();
        self.collect_subtree(id, &mut ids);
        Ok(ids[1..]
            .iter()
            .map(|&d| self.node_ref(d).name.clone())
            .collect())
    }

    /// Root node names in order.
    pub fn root_names(&self) -> Vec<String> {
        self.roots
            .iter()
            .map(|&r| self.node_ref(r).name.clone())
            .collect()
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        out.push(id);
        let children = self.node_ref(id).children.clone();
        for child in children {
            self.collect_subtree(child, out);
        }
    }

    /// Removes `id` from whatever sibling list currently holds it.
    fn detach(&mut self, id: NodeId) {
        match self.node_ref(id).parent {
            Some(p) => self.node_mut_ref(p).children.retain(|&c| c != id),
            None => self.roots.retain(|&r| r != id),
        }
        self.node_mut_ref(id).parent = None;
    }

    fn attach(&mut self, id: NodeId, parent: NodeId) {
        self.detach(id);
        self.node_mut_ref(parent).children.push(id);
        self.node_mut_ref(id).parent = Some(parent);
    }

    /// Moves `child` under `new_parent`, appending it to the end of the
    /// parent's child list. Fails if that would create a cycle.
    pub fn parent(&mut self, child: &str, new_parent: &str) -> Result<()> {
        let child_id = self.lookup(child)?;
        let parent_id = self.lookup(new_parent)?;

        // Walking up from the new parent must never reach the child.
        let mut probe = Some(parent_id);
        while let Some(p) = probe {
            if p == child_id {
                return Err(ToolkitError::CyclicParent {
                    child: child.to_string(),
                    parent: new_parent.to_string(),
                });
            }
            probe = self.node_ref(p).parent;
        }

        self.attach(child_id, parent_id);
        debug!("parented `{child}` under `{new_parent}`");
        Ok(())
    }

    /// Moves `child` back to the root level.
    pub fn unparent(&mut self, child: &str) -> Result<()> {
        let id = self.lookup(child)?;
        self.detach(id);
        self.roots.push(id);
        Ok(())
    }

    /// Moves a node to the front of its sibling list.
    pub fn reorder_front(&mut self, name: &str) -> Result<()> {
        let id = self.lookup(name)?;
        match self.node_ref(id).parent {
            Some(p) => {
                let children = &mut self.node_mut_ref(p).children;
                children.retain(|&c| c != id);
                children.insert(0, id);
            }
            None => {
                self.roots.retain(|&r| r != id);
                self.roots.insert(0, id);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // rename / delete / duplicate

    /// Renames a node. The new name is uniquified like an insert; the name
    /// actually assigned is returned. References held by blend shapes and
    /// controllers follow the rename.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<String> {
        let id = self.lookup(old)?;
        if old == new {
            return Ok(new.to_string());
        }
        let unique = naming::unique_name(new, |n| self.by_name.contains_key(n));
        self.by_name.remove(old);
        self.by_name.insert(unique.clone(), id);
        self.node_mut_ref(id).name = unique.clone();

        for node in self.slots.iter_mut().flatten() {
            match &mut node.kind {
                NodeKind::BlendShape(bs) if bs.target == old => bs.target = unique.clone(),
                NodeKind::Controller(ctrl) => {
                    for driven in &mut ctrl.driven {
                        if driven == old {
                            *driven = unique.clone();
                        }
                    }
                }
                _ => {}
            }
        }

        debug!("renamed `{old}` -> `{unique}`");
        Ok(unique)
    }

    /// Deletes a node and its whole subtree. Blend shapes whose target died
    /// are deleted too, and controllers and the selection drop dangling
    /// entries.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let id = self.lookup(name)?;
        self.detach(id);

        let mut doomed = Vec::new();
        self.collect_subtree(id, &mut doomed);
        let doomed_names: Vec<String> = doomed
            .iter()
            .map(|&d| self.node_ref(d).name.clone())
            .collect();

        for &d in &doomed {
            let node_name = self.node_ref(d).name.clone();
            self.by_name.remove(&node_name);
            self.slots[d.0] = None;
        }
        self.selection.retain(|s| !doomed.contains(s));

        // Deformers aimed at a deleted mesh go with it.
        let orphaned: Vec<String> = self
            .iter()
            .filter_map(|n| match &n.kind {
                NodeKind::BlendShape(bs) if doomed_names.contains(&bs.target) => {
                    Some(n.name.clone())
                }
                _ => None,
            })
            .collect();
        for deformer in &orphaned {
            self.delete(deformer)?;
        }

        for node in self.slots.iter_mut().flatten() {
            if let NodeKind::Controller(ctrl) = &mut node.kind {
                ctrl.driven.retain(|d| !doomed_names.contains(d));
            }
        }

        debug!("deleted `{}` ({} nodes)", name, doomed_names.len());
        Ok(())
    }

    /// Deep-copies a subtree. The copy lands next to the original (same
    /// parent) with uniquified names, and the new root name is returned.
    pub fn duplicate(&mut self, name: &str) -> Result<String> {
        let src_id = self.lookup(name)?;
        let src_parent = self.node_ref(src_id).parent;

        let mut ids = Vec::new();
        self.collect_subtree(src_id, &mut ids);

        let mut mapping: HashMap<NodeId, NodeId> = HashMap::new();
        let mut new_root = String::new();
        for &old_id in &ids {
            let (old_name, kind, translation, rotation, scale, old_parent) = {
                let n = self.node_ref(old_id);
                (
                    n.name.clone(),
                    n.kind.clone(),
                    n.translation,
                    n.rotation,
                    n.scale,
                    n.parent,
                )
            };
            let new_id = self.insert(&old_name, kind);
            {
                let n = self.node_mut_ref(new_id);
                n.translation = translation;
                n.rotation = rotation;
                n.scale = scale;
            }
            let target_parent = if old_id == src_id {
                src_parent
            } else {
                old_parent.and_then(|p| mapping.get(&p).copied())
            };
            if let Some(p) = target_parent {
                self.attach(new_id, p);
            }
            if old_id == src_id {
                new_root = self.node_ref(new_id).name.clone();
            }
            mapping.insert(old_id, new_id);
        }

        debug!("duplicated `{name}` as `{new_root}`");
        Ok(new_root)
    }

    // ------------------------------------------------------------------
    // selection

    /// Replaces the selection. All names must resolve; duplicates collapse
    /// to their first mention so order stays meaningful.
    pub fn select<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let id = self.lookup(name.as_ref())?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        self.selection = ids;
        Ok(())
    }

    /// Appends one node to the selection if it is not already in it.
    pub fn select_add(&mut self, name: &str) -> Result<()> {
        let id = self.lookup(name)?;
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected node names in selection order.
    pub fn selected(&self) -> Vec<String> {
        self.selection
            .iter()
            .map(|&s| self.node_ref(s).name.clone())
            .collect()
    }

    // ------------------------------------------------------------------
    // transforms and bounds

    /// Local-to-world matrix accumulated up the parent chain.
    pub fn world_transform(&self, name: &str) -> Result<Matrix4<f32>> {
        let mut id = self.lookup(name)?;
        let mut matrix = self.node_ref(id).local_transform();
        while let Some(p) = self.node_ref(id).parent {
            matrix = self.node_ref(p).local_transform() * matrix;
            id = p;
        }
        Ok(matrix)
    }

    /// World-space bounds over every mesh in the scene, `None` when there is
    /// no geometry.
    pub fn scene_bounds(&self) -> Option<Aabb> {
        let mut acc: Option<Aabb> = None;
        for node in self.iter() {
            let local = match node.mesh().and_then(|m| m.aabb()) {
                Some(b) => b,
                None => continue,
            };
            let world = match self.world_transform(&node.name) {
                Ok(m) => m,
                Err(_) => continue,
            };
            let fitted = local.transform(&world);
            acc = Some(match acc {
                Some(a) => a.union(fitted),
                None => fitted,
            });
        }
        acc
    }

    // ------------------------------------------------------------------
    // deformation

    /// Names of the blend shapes currently targeting `mesh`, in creation
    /// order.
    pub fn blend_shapes_on(&self, mesh: &str) -> Vec<String> {
        self.iter()
            .filter_map(|n| match &n.kind {
                NodeKind::BlendShape(bs) if bs.target == mesh => Some(n.name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Vertex positions of `name` with every blend shape applied, each
    /// scaled by its `envelope * weight`. Base positions are untouched.
    pub fn evaluated_positions(&self, name: &str) -> Result<Vec<[f32; 3]>> {
        let mut positions = self.mesh(name)?.positions.clone();
        for node in self.iter() {
            if let NodeKind::BlendShape(bs) = &node.kind {
                if bs.target == name {
                    let factor = bs.envelope * bs.weight;
                    if factor != 0.0 {
                        for (p, d) in positions.iter_mut().zip(&bs.deltas) {
                            p[0] += d[0] * factor;
                            p[1] += d[1] * factor;
                            p[2] += d[2] * factor;
                        }
                    }
                }
            }
        }
        Ok(positions)
    }

    /// Sets a controller's amount, clamped to `[0, 1]`, and pushes it into
    /// the envelope of every blend shape the controller drives. Returns the
    /// clamped value.
    pub fn set_controller_amount(&mut self, name: &str, value: f32) -> Result<f32> {
        let clamped = value.clamp(0.0, 1.0);
        let driven = match &self.node(name)?.kind {
            NodeKind::Controller(ctrl) => ctrl.driven.clone(),
            _ => return Err(ToolkitError::NotAController(name.to_string())),
        };
        for deformer in &driven {
            if let Ok(node) = self.node_mut(deformer) {
                if let NodeKind::BlendShape(bs) = &mut node.kind {
                    bs.envelope = clamped;
                }
            }
        }
        if let NodeKind::Controller(ctrl) = &mut self.node_mut(name)?.kind {
            ctrl.amount = clamped;
        }
        debug!("controller `{name}` set to {clamped}");
        Ok(clamped)
    }

    // ------------------------------------------------------------------
    // diagnostics

    /// Pairs of mesh names that collide once lower-cased, i.e. names the
    /// matcher would reject as ambiguous. Useful as a pre-import health
    /// check.
    pub fn normalized_name_collisions(&self) -> Vec<(String, String)> {
        let mut seen: HashMap<String, String> = HashMap::new();
        let mut collisions = Vec::new();
        for name in self.mesh_names() {
            let key = name.to_lowercase();
            match seen.get(&key) {
                Some(first) => collisions.push((first.clone(), name)),
                None => {
                    seen.insert(key, name);
                }
            }
        }
        collisions
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
