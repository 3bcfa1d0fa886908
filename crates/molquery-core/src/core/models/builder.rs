use super::error::ModelError;
use super::ids::ElementIndex;
use super::model::{AtomRecord, AtomicHierarchy, Model, ResidueRecord};
use super::segmentation::Segmentation;
use nalgebra::Point3;

/// Builds an atomic [`Model`] chain by chain, residue by residue.
///
/// Atoms are numbered in insertion order, and every residue owns the contiguous run of
/// atoms added after it was started, which yields the residue segmentation directly.
pub struct ModelBuilder {
    label: String,
    positions: Vec<Point3<f64>>,
    atoms: Vec<AtomRecord>,
    residues: Vec<ResidueRecord>,

    // --- Builder-specific state for efficient construction ---
    residue_offsets: Vec<ElementIndex>,
    current_chain: Option<char>,
}

impl ModelBuilder {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            positions: Vec::new(),
            atoms: Vec::new(),
            residues: Vec::new(),
            residue_offsets: Vec::new(),
            current_chain: None,
        }
    }

    pub fn start_chain(&mut self, id: char) -> &mut Self {
        self.current_chain = Some(id);
        self
    }

    pub fn start_residue(&mut self, seq_id: isize, name: &str) -> &mut Self {
        let chain = self
            .current_chain
            .expect("Must start a chain before starting a residue");
        self.residue_offsets.push(self.atoms.len());
        self.residues.push(ResidueRecord {
            seq_id,
            name: name.to_string(),
            chain,
        });
        self
    }

    pub fn add_atom(&mut self, name: &str, element: &str, position: Point3<f64>) -> &mut Self {
        assert!(
            !self.residues.is_empty(),
            "Cannot add atom without a current residue"
        );
        self.atoms.push(AtomRecord {
            name: name.to_string(),
            element: element.to_string(),
        });
        self.positions.push(position);
        self
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Finalizes the model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyResidue`] if a residue was started without atoms.
    pub fn build(self) -> Result<Model, ModelError> {
        let mut offsets = self.residue_offsets;
        offsets.push(self.atoms.len());

        if let Some(position) = offsets.windows(2).position(|w| w[0] == w[1]) {
            let residue = &self.residues[position];
            return Err(ModelError::EmptyResidue {
                seq_id: residue.seq_id,
                name: residue.name.clone(),
            });
        }

        let segmentation = Segmentation::from_offsets(offsets)?;
        let hierarchy = AtomicHierarchy::new(self.atoms, self.residues, segmentation)?;
        Model::atomic(&self.label, self.positions, hierarchy)
    }
}
