//! # Name/Topology Matcher
//!
//! Pairs freshly imported geometry with geometry already in the scene so the
//! blend-shape pipeline knows what deforms what. Matching is pure name and
//! topology logic; the scene only participates through an injected
//! vertex-count callback, which keeps the whole thing testable with a plain
//! closure.
//!
//! ## Matching Rules
//!
//! A candidate pairs with an existing geometry when:
//!
//! 1. the candidate's name, lower-cased and with one trailing import marker
//!    (`_obj` by default) stripped, equals the existing name lower-cased, and
//! 2. both meshes report the same vertex count.
//!
//! Candidates that fail either test land in `unmatched`, in their original
//! order. Two *existing* names that collapse to the same key make every
//! lookup ambiguous, so that case fails up front with
//! [`ToolkitError::AmbiguousMatch`] before any pairing happens. Several
//! candidates pairing with one existing geometry is fine; the fan-in just
//! stacks deformers on that target.
//!
//! ## Usage
//!
//! ```
//! use stagecraft::matcher::{match_candidates, GeometryRef};
//!
//! let candidates = [GeometryRef::new("helmet_obj"), GeometryRef::new("visor")];
//! let existing = [GeometryRef::new("helmet")];
//! let result = match_candidates(&candidates, &existing, |_| Ok(42)).unwrap();
//!
//! assert_eq!(result.pairs().len(), 1);
//! assert_eq!(result.unmatched(), &[GeometryRef::new("visor")]);
//! ```

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::error::{Result, ToolkitError};
use crate::naming::{self, IMPORT_MARKER};

/// A geometry referenced by name. The name is the identity; whether it still
/// resolves is the scene's business, checked through the vertex-count
/// callback at match time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryRef(String);

impl GeometryRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeometryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GeometryRef {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for GeometryRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for GeometryRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of one matching pass: accepted pairs in candidate order plus the
/// candidates nothing accepted. Every candidate appears in exactly one of
/// the two lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    pairs: Vec<(GeometryRef, GeometryRef)>,
    unmatched: Vec<GeometryRef>,
}

impl MatchResult {
    /// Accepted `(candidate, existing)` pairs in candidate order.
    pub fn pairs(&self) -> &[(GeometryRef, GeometryRef)] {
        &self.pairs
    }

    /// Candidates that matched nothing, in candidate order.
    pub fn unmatched(&self) -> &[GeometryRef] {
        &self.unmatched
    }

    /// The existing geometry a candidate was paired with, if any.
    pub fn target_of(&self, candidate: &GeometryRef) -> Option<&GeometryRef> {
        self.pairs
            .iter()
            .find(|(c, _)| c == candidate)
            .map(|(_, existing)| existing)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty() && self.unmatched.is_empty()
    }
}

/// Matches `candidates` against `existing` using the default `_obj` import
/// marker. See [`match_candidates_with`] for the full contract.
pub fn match_candidates<F>(
    candidates: &[GeometryRef],
    existing: &[GeometryRef],
    vertex_count_of: F,
) -> Result<MatchResult>
where
    F: FnMut(&GeometryRef) -> Result<usize>,
{
    match_candidates_with(candidates, existing, IMPORT_MARKER, vertex_count_of)
}

/// Matches `candidates` against `existing` with an explicit import marker.
///
/// `vertex_count_of` is only consulted for name-matched pairs, and its
/// errors (a geometry deleted out from under the match, say) propagate
/// unchanged. The function never touches either input list; calling it twice
/// with the same arguments gives the same result.
pub fn match_candidates_with<F>(
    candidates: &[GeometryRef],
    existing: &[GeometryRef],
    marker: &str,
    mut vertex_count_of: F,
) -> Result<MatchResult>
where
    F: FnMut(&GeometryRef) -> Result<usize>,
{
    let mut by_key: HashMap<String, &GeometryRef> = HashMap::with_capacity(existing.len());
    for geo in existing {
        // Existing names are taken as-is, just case-folded.
        let key = geo.as_str().to_lowercase();
        if let Some(first) = by_key.insert(key.clone(), geo) {
            return Err(ToolkitError::AmbiguousMatch {
                key,
                first: first.to_string(),
                second: geo.to_string(),
            });
        }
    }

    let mut pairs = Vec::new();
    let mut unmatched = Vec::new();
    for candidate in candidates {
        let key = naming::normalized_key(candidate.as_str(), marker);
        let target = match by_key.get(key.as_str()) {
            Some(&target) => target,
            None => {
                debug!("`{candidate}` matched no existing geometry");
                unmatched.push(candidate.clone());
                continue;
            }
        };
        let candidate_count = vertex_count_of(candidate)?;
        let target_count = vertex_count_of(target)?;
        if candidate_count == target_count {
            pairs.push((candidate.clone(), target.clone()));
        } else {
            debug!(
                "`{candidate}` ({candidate_count} verts) rejected against `{target}` ({target_count} verts)"
            );
            unmatched.push(candidate.clone());
        }
    }

    Ok(MatchResult { pairs, unmatched })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::HashMap;

    fn refs(names: &[&str]) -> Vec<GeometryRef> {
        names.iter().map(|n| GeometryRef::from(*n)).collect()
    }

    fn counts(table: &[(&str, usize)]) -> impl FnMut(&GeometryRef) -> crate::Result<usize> {
        let map: HashMap<String, usize> = table
            .iter()
            .map(|(n, c)| (n.to_string(), *c))
            .collect();
        move |geo: &GeometryRef| {
            map.get(geo.as_str())
                .copied()
                .ok_or_else(|| crate::ToolkitError::GeometryLookup(geo.to_string()))
        }
    }

    #[test]
    fn test_marker_suffix_pairs_with_existing() {
        let result = match_candidates(
            &refs(&["helmet_obj"]),
            &refs(&["helmet"]),
            counts(&[("helmet_obj", 100), ("helmet", 100)]),
        )
        .unwrap();
        assert_eq!(
            result.pairs(),
            &[(GeometryRef::from("helmet_obj"), GeometryRef::from("helmet"))]
        );
        assert!(result.unmatched().is_empty());
    }

    #[test]
    fn test_exact_name_pairs_without_marker() {
        let result = match_candidates(
            &refs(&["glove"]),
            &refs(&["glove"]),
            counts(&[("glove", 8)]),
        )
        .unwrap();
        assert_eq!(result.pairs().len(), 1);
    }

    #[test]
    fn test_case_is_ignored() {
        let result = match_candidates(
            &refs(&["Helmet_OBJ"]),
            &refs(&["HELMET"]),
            counts(&[("Helmet_OBJ", 10), ("HELMET", 10)]),
        )
        .unwrap();
        assert_eq!(result.pairs().len(), 1);
        assert_eq!(result.pairs()[0].1, GeometryRef::from("HELMET"));
    }

    #[test]
    fn test_vertex_count_gate() {
        let result = match_candidates(
            &refs(&["boot_obj"]),
            &refs(&["boot"]),
            counts(&[("boot_obj", 120), ("boot", 80)]),
        )
        .unwrap();
        assert!(result.pairs().is_empty());
        assert_eq!(result.unmatched(), &[GeometryRef::from("boot_obj")]);
    }

    #[test]
    fn test_unknown_name_goes_unmatched() {
        let result = match_candidates(
            &refs(&["visor"]),
            &refs(&["helmet"]),
            counts(&[("visor", 10), ("helmet", 10)]),
        )
        .unwrap();
        assert!(result.pairs().is_empty());
        assert_eq!(result.unmatched(), &[GeometryRef::from("visor")]);
    }

    #[test]
    fn test_empty_candidates_is_empty_result() {
        let result = match_candidates(&[], &refs(&["helmet"]), counts(&[("helmet", 10)])).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_every_candidate_lands_in_exactly_one_list() {
        let candidates = refs(&["helmet_obj", "glove_obj", "boot_obj", "strap"]);
        let result = match_candidates(
            &candidates,
            &refs(&["helmet", "glove", "boot"]),
            counts(&[
                ("helmet_obj", 100),
                ("helmet", 100),
                ("glove_obj", 50),
                ("glove", 50),
                ("boot_obj", 120),
                ("boot", 80),
                ("strap", 4),
            ]),
        )
        .unwrap();
        assert_eq!(result.pairs().len(), 2);
        assert_eq!(result.unmatched().len(), 2);
        // Order follows candidate order in both lists.
        assert_eq!(result.pairs()[0].0, GeometryRef::from("helmet_obj"));
        assert_eq!(result.pairs()[1].0, GeometryRef::from("glove_obj"));
        assert_eq!(
            result.unmatched(),
            &[GeometryRef::from("boot_obj"), GeometryRef::from("strap")]
        );
    }

    #[test]
    fn test_same_inputs_same_result() {
        let candidates = refs(&["helmet_obj", "strap"]);
        let existing = refs(&["helmet"]);
        let table = [("helmet_obj", 9), ("helmet", 9), ("strap", 2)];
        let first = match_candidates(&candidates, &existing, counts(&table)).unwrap();
        let second = match_candidates(&candidates, &existing, counts(&table)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ambiguous_existing_names_fail_up_front() {
        let err = match_candidates(
            &refs(&["helmet_obj"]),
            &refs(&["Helmet", "helmet"]),
            counts(&[("helmet_obj", 10), ("Helmet", 10), ("helmet", 10)]),
        )
        .unwrap_err();
        match err {
            ToolkitError::AmbiguousMatch { key, first, second } => {
                assert_eq!(key, "helmet");
                assert_eq!(first, "Helmet");
                assert_eq!(second, "helmet");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_fan_in_is_allowed() {
        let result = match_candidates(
            &refs(&["helmet", "helmet_obj"]),
            &refs(&["helmet"]),
            counts(&[("helmet", 10), ("helmet_obj", 10)]),
        )
        .unwrap();
        assert_eq!(result.pairs().len(), 2);
        assert_eq!(result.pairs()[0].1, GeometryRef::from("helmet"));
        assert_eq!(result.pairs()[1].1, GeometryRef::from("helmet"));
    }

    #[test]
    fn test_lookup_errors_propagate() {
        let err = match_candidates(&refs(&["helmet_obj"]), &refs(&["helmet"]), |geo| {
            Err(crate::ToolkitError::GeometryLookup(geo.to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, ToolkitError::GeometryLookup(_)));
    }

    #[test]
    fn test_counts_only_queried_for_name_matches() {
        let calls = Cell::new(0usize);
        let result = match_candidates(&refs(&["visor", "strap"]), &refs(&["helmet"]), |_| {
            calls.set(calls.get() + 1);
            Ok(1)
        })
        .unwrap();
        assert_eq!(result.unmatched().len(), 2);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_custom_marker() {
        let result = match_candidates_with(
            &refs(&["helmet_import"]),
            &refs(&["helmet"]),
            "_import",
            counts(&[("helmet_import", 10), ("helmet", 10)]),
        )
        .unwrap();
        assert_eq!(result.pairs().len(), 1);
    }

    #[test]
    fn test_target_of() {
        let result = match_candidates(
            &refs(&["helmet_obj"]),
            &refs(&["helmet"]),
            counts(&[("helmet_obj", 10), ("helmet", 10)]),
        )
        .unwrap();
        assert_eq!(
            result.target_of(&GeometryRef::from("helmet_obj")),
            Some(&GeometryRef::from("helmet"))
        );
        assert_eq!(result.target_of(&GeometryRef::from("ghost")), None);
    }
}
