//! # Toolkit Errors
//!
//! Every fallible operation in the crate returns [`ToolkitError`] through the
//! crate-wide [`Result`] alias. Host-style "cancellations" (an empty path
//! list, exporting with nothing selected) are deliberately *not* errors; those
//! operations log a warning and return an empty result instead.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// Errors raised by scene queries, matching and the batch tools.
#[derive(Debug, Error)]
pub enum ToolkitError {
    /// A referenced node no longer resolves, e.g. it was deleted between
    /// listing and use.
    #[error("geometry `{0}` does not exist in the scene")]
    GeometryLookup(String),

    /// Two existing geometry names collapse to the same normalized key, so a
    /// candidate could pair with either of them.
    #[error("existing geometries `{first}` and `{second}` both normalize to `{key}`")]
    AmbiguousMatch {
        key: String,
        first: String,
        second: String,
    },

    /// Blend-shape source and target disagree on topology.
    #[error("`{source_name}` has {source_count} vertices but `{target_name}` has {target_count}")]
    VertexCountMismatch {
        source_name: String,
        source_count: usize,
        target_name: String,
        target_count: usize,
    },

    /// The node exists but is not a mesh.
    #[error("node `{0}` is not a mesh")]
    NotAMesh(String),

    /// The node exists but is not a camera.
    #[error("node `{0}` is not a camera")]
    NotACamera(String),

    /// The node exists but is not a controller.
    #[error("node `{0}` is not a controller")]
    NotAController(String),

    /// An operation that requires a selection ran with none.
    #[error("nothing is selected")]
    EmptySelection,

    /// A component string does not look like `name.kind[index]`.
    #[error("component `{0}` is not of the form `name.kind[index]`")]
    MalformedComponent(String),

    /// Re-parenting a node under itself or one of its descendants.
    #[error("cannot parent `{child}` under `{parent}`")]
    CyclicParent { child: String, parent: String },

    /// Refusing to clobber an existing file without `force_overwrite`.
    #[error("`{0}` already exists; pass force_overwrite to replace it")]
    WouldOverwrite(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("failed to load OBJ: {0}")]
    ObjLoad(#[from] tobj::LoadError),
}
