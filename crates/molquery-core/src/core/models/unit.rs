use super::error::ModelError;
use super::ids::{ElementIndex, UnitId};
use super::model::Model;
use super::segmentation::Segmentation;
use nalgebra::{Isometry3, Point3};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Granularity of the elements a unit holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Elements are atoms of an atomic hierarchy with residue segmentation.
    Atomic,
    /// Coarse-grained spheres.
    Spheres,
    /// Coarse-grained gaussians.
    Gaussians,
}

#[derive(Debug, Error)]
#[error("Invalid unit kind string")]
pub struct ParseUnitKindError;

impl FromStr for UnitKind {
    type Err = ParseUnitKindError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atomic" => Ok(UnitKind::Atomic),
            "spheres" => Ok(UnitKind::Spheres),
            "gaussians" => Ok(UnitKind::Gaussians),
            _ => Err(ParseUnitKindError),
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UnitKind::Atomic => "Atomic",
                UnitKind::Spheres => "Spheres",
                UnitKind::Gaussians => "Gaussians",
            }
        )
    }
}

/// An ascending subset of one model's elements, placed by a rigid transform.
///
/// Units are cheap to clone: the element array and the model are reference counted, so
/// every structure derived from the same source shares its coordinate data.
#[derive(Clone)]
pub struct Unit {
    id: UnitId,
    kind: UnitKind,
    elements: Arc<[ElementIndex]>,
    model: Arc<Model>,
    transform: Isometry3<f64>,
}

impl Unit {
    /// Creates a unit over the given elements of `model`.
    ///
    /// Elements are sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingHierarchy`] for an atomic unit over a model without an
    /// atomic hierarchy, and [`ModelError::ElementOutOfRange`] if an element does not
    /// exist in the model.
    pub fn new(
        id: UnitId,
        kind: UnitKind,
        model: Arc<Model>,
        mut elements: Vec<ElementIndex>,
    ) -> Result<Self, ModelError> {
        if kind == UnitKind::Atomic && model.hierarchy().is_none() {
            return Err(ModelError::MissingHierarchy { unit_id: id });
        }
        elements.sort_unstable();
        elements.dedup();
        if let Some(&element) = elements.last() {
            if element >= model.element_count() {
                return Err(ModelError::ElementOutOfRange {
                    unit_id: id,
                    element,
                    count: model.element_count(),
                });
            }
        }
        Ok(Self {
            id,
            kind,
            elements: elements.into(),
            model,
            transform: Isometry3::identity(),
        })
    }

    /// Creates a unit holding every element of `model`.
    pub fn whole(id: UnitId, kind: UnitKind, model: Arc<Model>) -> Result<Self, ModelError> {
        let elements = (0..model.element_count()).collect();
        Self::new(id, kind, model, elements)
    }

    /// Places the unit's model coordinates with a rigid transform (symmetry operator).
    pub fn with_transform(mut self, transform: Isometry3<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// Returns a unit sharing this unit's identity, model and transform but holding
    /// `elements`, which must be ascending, unique and in range for the model.
    pub(crate) fn with_elements(&self, elements: Vec<ElementIndex>) -> Self {
        debug_assert!(elements.windows(2).all(|w| w[0] < w[1]));
        if let Some(&last) = elements.last() {
            assert!(
                last < self.model.element_count(),
                "element {last} is out of range for unit {} (model has {} elements)",
                self.id,
                self.model.element_count()
            );
        }
        Self {
            id: self.id,
            kind: self.kind,
            elements: elements.into(),
            model: Arc::clone(&self.model),
            transform: self.transform,
        }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    pub fn is_atomic(&self) -> bool {
        self.kind == UnitKind::Atomic
    }

    pub fn elements(&self) -> &[ElementIndex] {
        &self.elements
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn contains(&self, element: ElementIndex) -> bool {
        self.elements.binary_search(&element).is_ok()
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    pub fn transform(&self) -> &Isometry3<f64> {
        &self.transform
    }

    /// Returns the transformed position of `element` in the unit's model numbering.
    pub fn position(&self, element: ElementIndex) -> Option<Point3<f64>> {
        self.model
            .position(element)
            .map(|position| self.transform.transform_point(position))
    }

    /// Returns the residue segmentation for atomic units.
    pub fn residue_segments(&self) -> Option<&Segmentation> {
        if !self.is_atomic() {
            return None;
        }
        self.model
            .hierarchy()
            .map(|hierarchy| hierarchy.residue_segments())
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind && self.elements == other.elements
    }
}

impl Eq for Unit {}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unit")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("model", &self.model.label())
            .field("elements", &self.elements.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Translation3, UnitQuaternion};

    fn coarse_model(count: usize) -> Arc<Model> {
        let positions = (0..count)
            .map(|i| Point3::new(i as f64, 0.0, 0.0))
            .collect();
        Arc::new(Model::coarse("coarse", positions))
    }

    #[test]
    fn new_sorts_and_deduplicates_elements() {
        let unit = Unit::new(1, UnitKind::Spheres, coarse_model(10), vec![7, 2, 7, 0]).unwrap();
        assert_eq!(unit.elements(), &[0, 2, 7]);
        assert!(unit.contains(2));
        assert!(!unit.contains(3));
    }

    #[test]
    fn new_rejects_out_of_range_elements() {
        let result = Unit::new(3, UnitKind::Spheres, coarse_model(4), vec![1, 4]);
        assert!(matches!(
            result,
            Err(ModelError::ElementOutOfRange {
                unit_id: 3,
                element: 4,
                count: 4
            })
        ));
    }

    #[test]
    fn atomic_unit_requires_hierarchy() {
        let result = Unit::whole(5, UnitKind::Atomic, coarse_model(2));
        assert!(matches!(
            result,
            Err(ModelError::MissingHierarchy { unit_id: 5 })
        ));
    }

    #[test]
    fn coarse_unit_has_no_residue_segments() {
        let unit = Unit::whole(1, UnitKind::Gaussians, coarse_model(3)).unwrap();
        assert!(unit.residue_segments().is_none());
        assert_eq!(unit.element_count(), 3);
    }

    #[test]
    fn position_applies_transform() {
        let transform = Isometry3::from_parts(
            Translation3::new(0.0, 10.0, 0.0),
            UnitQuaternion::identity(),
        );
        let unit = Unit::whole(1, UnitKind::Spheres, coarse_model(3))
            .unwrap()
            .with_transform(transform);
        assert_eq!(unit.position(2), Some(Point3::new(2.0, 10.0, 0.0)));
        assert_eq!(unit.position(3), None);
    }

    #[test]
    fn equality_compares_identity_and_elements() {
        let model = coarse_model(5);
        let a = Unit::new(1, UnitKind::Spheres, Arc::clone(&model), vec![1, 2]).unwrap();
        let b = Unit::new(1, UnitKind::Spheres, Arc::clone(&model), vec![2, 1]).unwrap();
        let c = Unit::new(2, UnitKind::Spheres, model, vec![1, 2]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn unit_kind_round_trips_through_strings() {
        assert_eq!("atomic".parse::<UnitKind>().unwrap(), UnitKind::Atomic);
        assert_eq!("Spheres".parse::<UnitKind>().unwrap(), UnitKind::Spheres);
        assert_eq!(UnitKind::Gaussians.to_string(), "Gaussians");
        assert!("residue".parse::<UnitKind>().is_err());
    }
}
