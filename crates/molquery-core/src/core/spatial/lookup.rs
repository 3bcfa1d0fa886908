use crate::core::models::ids::{ElementIndex, UnitId};
use crate::core::models::structure::Structure;
use crate::core::models::subset::UniqueSubsetBuilder;
use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::fmt;

// Slack on the squared radius handed to the tree; hits are re-checked against the exact value.
const RADIUS_SLACK: f64 = 1e-9;

/// Spatial index over every element of one structure, in transformed coordinates.
///
/// Each tree item is the position of an `(unit, element)` entry; the item payload is the
/// entry's index. Any number of entries may share a coordinate (planar ligands, stacked
/// symmetry copies). An empty structure has no tree.
pub struct StructureLookup3d {
    tree: Option<ImmutableKdTree<f64, 3>>,
    entries: Vec<(UnitId, ElementIndex)>,
}

impl StructureLookup3d {
    pub fn new(structure: &Structure) -> Self {
        let mut positions: Vec<[f64; 3]> = Vec::with_capacity(structure.element_count());
        let mut entries = Vec::with_capacity(structure.element_count());
        for (unit, element) in structure.elements() {
            if let Some(p) = unit.position(element) {
                positions.push([p.x, p.y, p.z]);
                entries.push((unit.id(), element));
            }
        }
        let tree = (!positions.is_empty()).then(|| ImmutableKdTree::new_from_slice(&positions));
        Self { tree, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn for_each_within(
        &self,
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
        mut f: impl FnMut(UnitId, ElementIndex),
    ) {
        let Some(tree) = &self.tree else {
            return;
        };
        if radius < 0.0 || !radius.is_finite() {
            return;
        }
        let radius_sq = radius * radius;
        let query_sq = radius_sq + radius_sq.max(1.0) * RADIUS_SLACK;
        for hit in tree.within_unsorted::<SquaredEuclidean>(&[x, y, z], query_sq) {
            if hit.distance <= radius_sq {
                let (unit_id, element) = self.entries[hit.item as usize];
                f(unit_id, element);
            }
        }
    }

    /// Records every element within `radius` of `(x, y, z)` into `builder`.
    ///
    /// Returns the number of hits, counting elements the builder already held.
    pub fn find_into_builder(
        &self,
        x: f64,
        y: f64,
        z: f64,
        radius: f64,
        builder: &mut UniqueSubsetBuilder<'_>,
    ) -> usize {
        let mut hits = 0;
        self.for_each_within(x, y, z, radius, |unit_id, element| {
            builder.add_to_unit(unit_id, element);
            hits += 1;
        });
        hits
    }

    /// Returns every `(unit, element)` within `radius` of `(x, y, z)`, in index order.
    pub fn find(&self, x: f64, y: f64, z: f64, radius: f64) -> Vec<(UnitId, ElementIndex)> {
        let mut hits = Vec::new();
        self.for_each_within(x, y, z, radius, |unit_id, element| {
            hits.push((unit_id, element));
        });
        hits.sort_unstable();
        hits
    }

    /// Returns `true` if any element lies within `radius` of `(x, y, z)`.
    pub fn check(&self, x: f64, y: f64, z: f64, radius: f64) -> bool {
        let mut found = false;
        self.for_each_within(x, y, z, radius, |_, _| found = true);
        found
    }

    /// Convenience form of [`Self::find`] taking a point.
    pub fn find_around(&self, center: &Point3<f64>, radius: f64) -> Vec<(UnitId, ElementIndex)> {
        self.find(center.x, center.y, center.z, radius)
    }
}

impl fmt::Debug for StructureLookup3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructureLookup3d")
            .field("entries", &self.entries.len())
            .finish()
    }
}
