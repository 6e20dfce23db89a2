//! # Mesh Data
//!
//! CPU-side mesh payload carried by mesh nodes: flat position and index
//! buffers plus the per-mesh metadata the batch tools care about (color set
//! names, the subdivision flag). Geometry here is always triangulated; the
//! OBJ importer takes care of that on the way in.

use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};

/// Axis-aligned bounding box in whatever space its points were taken from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Fits a box around a point cloud. Returns `None` for an empty slice.
    pub fn from_points(points: &[[f32; 3]]) -> Option<Self> {
        let first = points.first()?;
        let mut min = Vector3::from(*first);
        let mut max = min;
        for p in &points[1..] {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            min.z = min.z.min(p[2]);
            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
            max.z = max.z.max(p[2]);
        }
        Some(Self { min, max })
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(self, other: Self) -> Self {
        Self {
            min: Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Re-fits the box after a transform. All eight corners are run through
    /// the matrix and a new axis-aligned box is fitted around the results,
    /// which keeps the box conservative under rotation.
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let mut min = Vector3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = Vector3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        for corner in corners {
            let moved = matrix * Vector4::new(corner.x, corner.y, corner.z, 1.0);
            min.x = min.x.min(moved.x);
            min.y = min.y.min(moved.y);
            min.z = min.z.min(moved.z);
            max.x = max.x.max(moved.x);
            max.y = max.y.max(moved.y);
            max.z = max.z.max(moved.z);
        }
        Self { min, max }
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }
}

/// Triangulated mesh payload.
///
/// `positions` holds one `[x, y, z]` entry per vertex and `indices` holds
/// three entries per triangle. `color_sets` and `subdiv` carry pipeline
/// metadata that survives import/combine and that the cleanup and combine
/// tools key off.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    /// Names of painted color sets on this mesh.
    pub color_sets: Vec<String>,
    /// Marks the mesh as a subdivision cage.
    pub subdiv: bool,
}

impl MeshData {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            color_sets: Vec::new(),
            subdiv: false,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Local-space bounds, `None` for a mesh with no vertices.
    pub fn aabb(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Concatenates several meshes into one buffer pair, offsetting indices
    /// as it goes. Color sets are unioned (first occurrence wins the slot);
    /// the subdiv flag is left cleared for the caller to decide.
    pub fn merge<'a>(parts: impl IntoIterator<Item = &'a MeshData>) -> MeshData {
        let mut merged = MeshData::default();
        for part in parts {
            let offset = merged.positions.len() as u32;
            merged.positions.extend_from_slice(&part.positions);
            merged
                .indices
                .extend(part.indices.iter().map(|i| i + offset));
            for set in &part.color_sets {
                if !merged.color_sets.contains(set) {
                    merged.color_sets.push(set.clone());
                }
            }
        }
        merged
    }

    /// Bakes a transform into the vertex positions. A matrix with negative
    /// determinant (a mirror) flips every triangle's winding so the surface
    /// keeps facing outward.
    pub fn apply_transform(&mut self, matrix: &Matrix4<f32>) {
        for p in &mut self.positions {
            let moved = matrix * Vector4::new(p[0], p[1], p[2], 1.0);
            *p = [moved.x, moved.y, moved.z];
        }
        if matrix.determinant() < 0.0 {
            for tri in self.indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
    }

    /// Copy of this mesh mirrored across the YZ plane, with winding fixed.
    pub fn mirrored_x(&self) -> MeshData {
        let mut mirrored = self.clone();
        mirrored.apply_transform(&Matrix4::from_nonuniform_scale(-1.0, 1.0, 1.0));
        mirrored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    fn quad() -> MeshData {
        MeshData::new(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_aabb_from_points() {
        let bounds = Aabb::from_points(&quad().positions).unwrap();
        assert_eq!(bounds.min, Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vector3::new(1.0, 1.0, 0.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_aabb_union() {
        let a = Aabb::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Vector3::new(0.0, -2.0, 0.0), Vector3::new(3.0, 0.5, 1.0));
        let u = a.union(b);
        assert_eq!(u.min, Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(u.max, Vector3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_aabb_transform_refits_under_rotation() {
        let unit = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let rotated = unit.transform(&Matrix4::from_angle_y(Deg(45.0)));
        // A rotated unit cube needs a wider axis-aligned box.
        let expected = 2.0_f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-5);
        assert!((rotated.max.z - expected).abs() < 1e-5);
        assert!((rotated.max.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let merged = MeshData::merge([&quad(), &quad()]);
        assert_eq!(merged.vertex_count(), 8);
        assert_eq!(merged.triangle_count(), 4);
        assert_eq!(&merged.indices[6..], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_merge_unions_color_sets() {
        let mut a = quad();
        a.color_sets = vec!["ao".to_string(), "dirt".to_string()];
        let mut b = quad();
        b.color_sets = vec!["dirt".to_string(), "mask".to_string()];
        let merged = MeshData::merge([&a, &b]);
        assert_eq!(merged.color_sets, vec!["ao", "dirt", "mask"]);
    }

    #[test]
    fn test_mirror_flips_winding() {
        let mirrored = quad().mirrored_x();
        assert_eq!(mirrored.positions[1], [-1.0, 0.0, 0.0]);
        // 0,1,2 becomes 0,2,1 so the triangle still faces the viewer.
        assert_eq!(&mirrored.indices[..3], &[0, 2, 1]);
    }

    #[test]
    fn test_translation_keeps_winding() {
        let mut mesh = quad();
        mesh.apply_transform(&Matrix4::from_translation(Vector3::new(5.0, 0.0, 0.0)));
        assert_eq!(mesh.positions[0], [5.0, 0.0, 0.0]);
        assert_eq!(&mesh.indices[..3], &[0, 1, 2]);
    }
}
