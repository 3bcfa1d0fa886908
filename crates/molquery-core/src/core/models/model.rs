use super::error::ModelError;
use super::ids::ElementIndex;
use super::segmentation::Segmentation;
use nalgebra::Point3;

/// Per-atom annotation of an atomic hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomRecord {
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// The chemical element symbol (e.g., "C", "N").
    pub element: String,
}

/// Per-residue annotation of an atomic hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueRecord {
    pub seq_id: isize, // Residue sequence number from the source data
    pub name: String,  // Name of the residue (e.g., "ALA", "GLY")
    pub chain: char,   // Identifier of the parent chain
}

/// Atom/residue hierarchy of an atomic model.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicHierarchy {
    atoms: Vec<AtomRecord>,
    residues: Vec<ResidueRecord>,
    residue_segments: Segmentation,
}

impl AtomicHierarchy {
    /// Creates a hierarchy, checking that the segmentation covers every atom and
    /// that there is one residue record per segment.
    pub fn new(
        atoms: Vec<AtomRecord>,
        residues: Vec<ResidueRecord>,
        residue_segments: Segmentation,
    ) -> Result<Self, ModelError> {
        if residue_segments.element_count() != atoms.len() {
            return Err(ModelError::HierarchyMismatch {
                hierarchy: residue_segments.element_count(),
                positions: atoms.len(),
            });
        }
        if residue_segments.segment_count() != residues.len() {
            return Err(ModelError::InvalidSegmentation {
                position: residues.len().min(residue_segments.segment_count()),
            });
        }
        Ok(Self {
            atoms,
            residues,
            residue_segments,
        })
    }

    pub fn atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    pub fn residues(&self) -> &[ResidueRecord] {
        &self.residues
    }

    pub fn residue_segments(&self) -> &Segmentation {
        &self.residue_segments
    }

    pub fn atom(&self, element: ElementIndex) -> Option<&AtomRecord> {
        self.atoms.get(element)
    }

    pub fn residue_index(&self, element: ElementIndex) -> Option<usize> {
        self.residue_segments.segment_of(element)
    }

    pub fn residue_of(&self, element: ElementIndex) -> Option<&ResidueRecord> {
        self.residue_index(element)
            .and_then(|index| self.residues.get(index))
    }
}

/// Shared coordinate and hierarchy data that units refer to.
///
/// A model is never modified once built; structures derived from one another share the
/// same `Arc<Model>` and only differ in the element subsets their units select.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    label: String,
    positions: Vec<Point3<f64>>,
    hierarchy: Option<AtomicHierarchy>,
}

impl Model {
    /// Creates an atomic model from positions and a matching hierarchy.
    pub fn atomic(
        label: &str,
        positions: Vec<Point3<f64>>,
        hierarchy: AtomicHierarchy,
    ) -> Result<Self, ModelError> {
        if hierarchy.atoms().len() != positions.len() {
            return Err(ModelError::HierarchyMismatch {
                hierarchy: hierarchy.atoms().len(),
                positions: positions.len(),
            });
        }
        Ok(Self {
            label: label.to_string(),
            positions,
            hierarchy: Some(hierarchy),
        })
    }

    /// Creates a coarse-grained model (spheres, gaussians) without residue hierarchy.
    pub fn coarse(label: &str, positions: Vec<Point3<f64>>) -> Self {
        Self {
            label: label.to_string(),
            positions,
            hierarchy: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn element_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn position(&self, element: ElementIndex) -> Option<&Point3<f64>> {
        self.positions.get(element)
    }

    pub fn hierarchy(&self) -> Option<&AtomicHierarchy> {
        self.hierarchy.as_ref()
    }
}
