//! # Component Selection Capture
//!
//! Records a component selection (`face.vtx[3]`, `face.e[0:4]`, ...) as a
//! component kind plus bare index tokens, detached from the geometry it was
//! made on, so the same vertices/edges/faces can be re-selected on other
//! geometry with identical topology.

use std::fmt;

use crate::error::{Result, ToolkitError};

/// Component namespaces a selection can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Vertex,
    Edge,
    Face,
    Uv,
}

impl ComponentKind {
    /// Token used between the geometry name and the index brackets.
    pub fn token(&self) -> &'static str {
        match self {
            ComponentKind::Vertex => "vtx",
            ComponentKind::Edge => "e",
            ComponentKind::Face => "f",
            ComponentKind::Uv => "map",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "vtx" => Some(ComponentKind::Vertex),
            "e" => Some(ComponentKind::Edge),
            "f" => Some(ComponentKind::Face),
            "map" => Some(ComponentKind::Uv),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Splits `name.token[index]` into its three parts.
fn split_component(component: &str) -> Result<(&str, &str, &str)> {
    let malformed = || ToolkitError::MalformedComponent(component.to_string());
    let (geo, rest) = component.split_once('.').ok_or_else(malformed)?;
    let (token, rest) = rest.split_once('[').ok_or_else(malformed)?;
    let index = rest.strip_suffix(']').ok_or_else(malformed)?;
    if geo.is_empty() || token.is_empty() || index.is_empty() {
        return Err(malformed());
    }
    Ok((geo, token, index))
}

/// A captured component selection: one kind and the index tokens it covered.
/// Index tokens are kept verbatim, so ranges like `0:4` survive the trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSelection {
    kind: ComponentKind,
    indices: Vec<String>,
}

impl ComponentSelection {
    /// Parses a component selection. The kind is taken from the first entry
    /// (mixed-kind selections follow the first, as a host's selection list
    /// would); every entry contributes its index token. Fails on an empty
    /// list, an entry that does not look like `name.kind[index]`, or an
    /// unknown kind token.
    pub fn capture<S: AsRef<str>>(components: &[S]) -> Result<Self> {
        let first = components.first().ok_or(ToolkitError::EmptySelection)?;
        let (_, token, _) = split_component(first.as_ref())?;
        let kind = ComponentKind::from_token(token)
            .ok_or_else(|| ToolkitError::MalformedComponent(first.as_ref().to_string()))?;

        let mut indices = Vec::with_capacity(components.len());
        for component in components {
            let (_, _, index) = split_component(component.as_ref())?;
            indices.push(index.to_string());
        }
        Ok(Self { kind, indices })
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    /// Expands the captured indices onto other geometry, producing one
    /// component string per geometry/index combination, geometry-major.
    pub fn apply<S: AsRef<str>>(&self, geos: &[S]) -> Vec<String> {
        let mut components = Vec::with_capacity(geos.len() * self.indices.len());
        for geo in geos {
            for index in &self.indices {
                components.push(format!("{}.{}[{}]", geo.as_ref(), self.kind.token(), index));
            }
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_vertices() {
        let picked = ComponentSelection::capture(&["face.vtx[3]", "face.vtx[7:9]"]).unwrap();
        assert_eq!(picked.kind(), ComponentKind::Vertex);
        assert_eq!(picked.indices(), &["3".to_string(), "7:9".to_string()]);
    }

    #[test]
    fn test_kind_follows_first_entry() {
        let picked = ComponentSelection::capture(&["face.e[0]", "face.vtx[1]"]).unwrap();
        assert_eq!(picked.kind(), ComponentKind::Edge);
        assert_eq!(picked.indices().len(), 2);
    }

    #[test]
    fn test_apply_is_geometry_major() {
        let picked = ComponentSelection::capture(&["face.f[2]", "face.f[5]"]).unwrap();
        let applied = picked.apply(&["head", "jaw"]);
        assert_eq!(
            applied,
            vec!["head.f[2]", "head.f[5]", "jaw.f[2]", "jaw.f[5]"]
        );
    }

    #[test]
    fn test_uv_token_round_trips() {
        let picked = ComponentSelection::capture(&["shell.map[12]"]).unwrap();
        assert_eq!(picked.kind(), ComponentKind::Uv);
        assert_eq!(picked.apply(&["shell"]), vec!["shell.map[12]"]);
    }

    #[test]
    fn test_malformed_components_are_rejected() {
        for bad in ["face", "face.vtx", "face.vtx[3", "face.[3]", ".vtx[3]", "face.vtx[]"] {
            assert!(matches!(
                ComponentSelection::capture(&[bad]),
                Err(ToolkitError::MalformedComponent(_))
            ));
        }
        // An unknown kind token is malformed too.
        assert!(matches!(
            ComponentSelection::capture(&["face.vtxFace[3]"]),
            Err(ToolkitError::MalformedComponent(_))
        ));
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        assert!(matches!(
            ComponentSelection::capture::<&str>(&[]),
            Err(ToolkitError::EmptySelection)
        ));
    }
}
