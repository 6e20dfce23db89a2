//! # Batch Tools Module
//!
//! The scene chores that surround the blend-shape pipeline, each one a small
//! selection-driven batch operation:
//!
//! - [`combine`] - Fuse selected meshes, optionally bucketed by subdivision
//!   flag or material tag
//! - [`hierarchy`] - JSON parenting presets, hierarchy mirroring, sibling
//!   sorting
//! - [`rename`] - Type-suffix renaming (`_geo`, `_jnt`, `_grp`, ...)
//! - [`lightrig`] - Three-point light rig fitted to the scene bounds
//! - [`camera`] - 2D pan/zoom stepping and per-camera display toggles
//! - [`components`] - Capture a component selection and re-apply it to other
//!   geometry
//! - [`cleanup`] - Strip stale color sets
//!
//! Tools follow the host conventions the rest of the crate does: a missing
//! selection is a logged no-op rather than an error, and anything a tool
//! creates or renames is reported back by name.

pub mod camera;
pub mod cleanup;
pub mod combine;
pub mod components;
pub mod hierarchy;
pub mod lightrig;
pub mod rename;

// Re-export commonly used types
pub use combine::{batch_combine, CombineOptions};
pub use components::{ComponentKind, ComponentSelection};
pub use hierarchy::{
    mirror_hierarchy, restore_hierarchy, select_stored, sort_selection, store_hierarchy,
    HierarchyPreset,
};
pub use lightrig::create_light_rig;
pub use rename::apply_type_suffixes;
