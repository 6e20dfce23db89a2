//! # Naming Rules
//!
//! Pure string helpers shared by the matcher, the OBJ importer and the batch
//! tools. Everything here is deterministic and scene-free so the rules can be
//! tested (and reasoned about) in isolation.
//!
//! The conventions encoded below come from how pipelines actually name
//! things:
//!
//! * imported duplicates get an `_obj` marker appended when their name is
//!   already taken,
//! * material tags sit between a double underscore and a `_geo` suffix
//!   (`panel__painted_red_metal_geo`),
//! * mirrored nodes swap an `L_`/`R_` side prefix and drop the copy digit the
//!   duplication added.

/// Marker token appended to an imported geometry whose preferred name is
/// already taken. The matcher strips one trailing occurrence of this token
/// before comparing names.
pub const IMPORT_MARKER: &str = "_obj";

/// Divider between a geometry's own name and its material tag.
pub const TAG_DIVIDER: &str = "__";

/// Normalizes a candidate name for matching: lower-case it, then strip one
/// trailing `marker` token if present.
///
/// The marker comparison happens after lower-casing, so `Helmet_OBJ` and
/// `helmet_obj` normalize identically. A name that consists of nothing but
/// the marker is returned as-is rather than collapsing to an empty key.
pub fn normalized_key(name: &str, marker: &str) -> String {
    let lower = name.to_lowercase();
    match lower.strip_suffix(&marker.to_lowercase()) {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => lower,
    }
}

/// Replaces every character outside `[0-9A-Za-z]` with an underscore, which
/// is what scene-node names allow. File stems like `hero v2.1` turn into
/// `hero_v2_1`.
pub fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Swaps a leading `L_` prefix for `R_` and vice versa. Names without a side
/// prefix come back unchanged; occurrences past the first two characters are
/// left alone so `arm_R_upper` is not mangled.
pub fn swap_side_prefix(name: &str) -> String {
    if let Some(rest) = name.strip_prefix("L_") {
        format!("R_{rest}")
    } else if let Some(rest) = name.strip_prefix("R_") {
        format!("L_{rest}")
    } else {
        name.to_string()
    }
}

/// Drops a single trailing `1` from a name, the digit duplication appends to
/// keep names unique. `R_arm1` becomes `R_arm`; `R_arm11` only loses one
/// digit because only one duplication is being undone.
pub fn strip_copy_suffix(name: &str) -> &str {
    name.strip_suffix('1').unwrap_or(name)
}

/// Extracts the material tag from a name of the form
/// `<mesh>__<tag>_geo`, e.g. `panel__painted_red_metal_geo` yields
/// `painted_red_metal`. Returns `None` when the name carries no divider.
pub fn material_tag(name: &str) -> Option<String> {
    let tag = name.split(TAG_DIVIDER).nth(1)?;
    Some(tag.strip_suffix("_geo").unwrap_or(tag).to_string())
}

/// Finds the first free name by appending an increasing number to `base`.
/// `taken` reports whether a name is already in use. The bare base is tried
/// first, then `base1`, `base2`, ...
pub fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut n: u32 = 1;
    loop {
        let candidate = format!("{base}{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
