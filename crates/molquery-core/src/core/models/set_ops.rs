//! Element-wise set operations between structures.
//!
//! Units are matched by id and their ascending element arrays merged in one pass. The
//! unit object (model, transform) of the left operand is kept when both sides hold a
//! unit with the same id.

use super::ids::{ElementIndex, UnitId};
use super::structure::Structure;
use super::unit::Unit;
use itertools::{EitherOrBoth, Itertools};
use std::collections::BTreeMap;

impl Structure {
    /// Every element contained in either structure.
    pub fn union(&self, other: &Structure) -> Structure {
        if other.is_empty() || self.same_as(other) {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let units = merge_units(self, other)
            .map(|pair| match pair {
                EitherOrBoth::Left(unit) | EitherOrBoth::Right(unit) => unit.clone(),
                EitherOrBoth::Both(a, b) => a.with_elements(union_elements(a, b)),
            })
            .collect();
        Structure::from_sorted_units(units)
    }

    /// Elements contained in both structures.
    pub fn intersect(&self, other: &Structure) -> Structure {
        if self.same_as(other) {
            return self.clone();
        }
        if self.is_empty() || other.is_empty() {
            return Structure::empty();
        }
        let units = merge_units(self, other)
            .filter_map(|pair| match pair {
                EitherOrBoth::Both(a, b) => Some(a.with_elements(intersect_elements(a, b))),
                _ => None,
            })
            .collect();
        Structure::from_sorted_units(units)
    }

    /// Elements of `self` that are not contained in `other`.
    pub fn subtract(&self, other: &Structure) -> Structure {
        if self.same_as(other) {
            return Structure::empty();
        }
        if self.is_empty() || other.is_empty() {
            return self.clone();
        }
        let units = merge_units(self, other)
            .filter_map(|pair| match pair {
                EitherOrBoth::Left(unit) => Some(unit.clone()),
                EitherOrBoth::Right(_) => None,
                EitherOrBoth::Both(a, b) => Some(a.with_elements(subtract_elements(a, b))),
            })
            .collect();
        Structure::from_sorted_units(units)
    }

    /// Returns `true` if every element of `self` is contained in `other`.
    pub fn is_subset_of(&self, other: &Structure) -> bool {
        self.units().iter().all(|unit| {
            other.unit(unit.id()).is_some_and(|target| {
                unit.elements()
                    .iter()
                    .all(|&element| target.contains(element))
            })
        })
    }

    /// Returns `true` if no element is contained in both structures.
    pub fn is_disjoint_from(&self, other: &Structure) -> bool {
        self.intersect(other).is_empty()
    }

    /// Reduces any number of structures into one by element-wise union.
    pub fn union_all<'a>(structures: impl IntoIterator<Item = &'a Structure>) -> Structure {
        let mut structures = structures.into_iter();
        let Some(first) = structures.next() else {
            return Structure::empty();
        };
        let Some(second) = structures.next() else {
            return first.clone();
        };

        let mut accumulated: BTreeMap<UnitId, (Unit, Vec<ElementIndex>)> = BTreeMap::new();
        for structure in [first, second].into_iter().chain(structures) {
            for unit in structure.units() {
                accumulated
                    .entry(unit.id())
                    .or_insert_with(|| (unit.clone(), Vec::new()))
                    .1
                    .extend_from_slice(unit.elements());
            }
        }

        let units = accumulated
            .into_values()
            .map(|(unit, mut elements)| {
                elements.sort_unstable();
                elements.dedup();
                unit.with_elements(elements)
            })
            .collect();
        Structure::from_sorted_units(units)
    }
}

fn merge_units<'a>(
    a: &'a Structure,
    b: &'a Structure,
) -> impl Iterator<Item = EitherOrBoth<&'a Unit, &'a Unit>> {
    a.units()
        .iter()
        .merge_join_by(b.units().iter(), |x, y| x.id().cmp(&y.id()))
}

fn union_elements(a: &Unit, b: &Unit) -> Vec<ElementIndex> {
    a.elements()
        .iter()
        .merge_join_by(b.elements().iter(), |x, y| x.cmp(y))
        .map(|pair| match pair {
            EitherOrBoth::Left(&x) | EitherOrBoth::Right(&x) | EitherOrBoth::Both(&x, _) => x,
        })
        .collect()
}

fn intersect_elements(a: &Unit, b: &Unit) -> Vec<ElementIndex> {
    a.elements()
        .iter()
        .merge_join_by(b.elements().iter(), |x, y| x.cmp(y))
        .filter_map(|pair| match pair {
            EitherOrBoth::Both(&x, _) => Some(x),
            _ => None,
        })
        .collect()
}

fn subtract_elements(a: &Unit, b: &Unit) -> Vec<ElementIndex> {
    a.elements()
        .iter()
        .merge_join_by(b.elements().iter(), |x, y| x.cmp(y))
        .filter_map(|pair| match pair {
            EitherOrBoth::Left(&x) => Some(x),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::model::Model;
    use crate::core::models::unit::UnitKind;
    use nalgebra::Point3;
    use std::sync::Arc;

    fn structure(units: &[(UnitId, &[ElementIndex])]) -> Structure {
        let model = Arc::new(Model::coarse("spheres", vec![Point3::origin(); 16]));
        let units = units
            .iter()
            .map(|&(id, elements)| {
                Unit::new(id, UnitKind::Spheres, Arc::clone(&model), elements.to_vec()).unwrap()
            })
            .collect();
        Structure::new(units).unwrap()
    }

    #[test]
    fn union_merges_units_and_elements() {
        let a = structure(&[(1, &[0, 2, 4]), (2, &[1])]);
        let b = structure(&[(1, &[2, 3]), (3, &[5])]);
        assert_eq!(
            a.union(&b),
            structure(&[(1, &[0, 2, 3, 4]), (2, &[1]), (3, &[5])])
        );
    }

    #[test]
    fn intersect_keeps_shared_elements_only() {
        let a = structure(&[(1, &[0, 2, 4]), (2, &[1])]);
        let b = structure(&[(1, &[2, 3, 4]), (3, &[5])]);
        assert_eq!(a.intersect(&b), structure(&[(1, &[2, 4])]));
    }

    #[test]
    fn intersect_drops_units_that_become_empty() {
        let a = structure(&[(1, &[0]), (2, &[1])]);
        let b = structure(&[(1, &[1]), (2, &[1])]);
        let result = a.intersect(&b);
        assert_eq!(result.unit_count(), 1);
        assert_eq!(result.unit(2).unwrap().elements(), &[1]);
    }

    #[test]
    fn subtract_removes_elements_of_other() {
        let a = structure(&[(1, &[0, 2, 4]), (2, &[1])]);
        let b = structure(&[(1, &[2]), (2, &[1]), (3, &[5])]);
        assert_eq!(a.subtract(&b), structure(&[(1, &[0, 4])]));
    }

    #[test]
    fn operations_with_empty_structure() {
        let a = structure(&[(1, &[0, 1])]);
        let empty = Structure::empty();
        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);
        assert!(a.intersect(&empty).is_empty());
        assert_eq!(a.subtract(&empty), a);
        assert!(empty.subtract(&a).is_empty());
    }

    #[test]
    fn subtract_from_itself_is_empty() {
        let a = structure(&[(1, &[0, 1])]);
        assert!(a.subtract(&a.clone()).is_empty());
    }

    #[test]
    fn union_all_reduces_many_structures() {
        let parts = [
            structure(&[(1, &[0])]),
            structure(&[(1, &[3]), (2, &[2])]),
            structure(&[(2, &[2, 7])]),
        ];
        assert_eq!(
            Structure::union_all(&parts),
            structure(&[(1, &[0, 3]), (2, &[2, 7])])
        );
        let none: [Structure; 0] = [];
        assert!(Structure::union_all(&none).is_empty());
        assert_eq!(Structure::union_all(&parts[..1]), parts[0]);
    }

    #[test]
    fn subset_and_disjoint_checks() {
        let a = structure(&[(1, &[0, 2])]);
        let b = structure(&[(1, &[0, 1, 2]), (2, &[3])]);
        let c = structure(&[(2, &[4])]);
        assert!(a.is_subset_of(&b));
        assert!(!b.is_subset_of(&a));
        assert!(a.is_disjoint_from(&c));
        assert!(!a.is_disjoint_from(&b));
    }
}
