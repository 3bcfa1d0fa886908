use crate::core::models::structure::Structure;
use std::collections::HashMap;

/// Result of evaluating a query: structures derived from a source structure.
///
/// A singleton holds exactly one structure that stands for the whole query result and
/// lets combinators take per-structure fast paths. A sequence holds any number of
/// structures. Both remember the source they were derived from.
#[derive(Debug, Clone)]
pub enum StructureSelection {
    Singleton {
        source: Structure,
        structure: Structure,
    },
    Sequence {
        source: Structure,
        structures: Vec<Structure>,
    },
}

impl StructureSelection {
    pub fn singleton(source: Structure, structure: Structure) -> Self {
        Self::Singleton { source, structure }
    }

    pub fn sequence(source: Structure, structures: Vec<Structure>) -> Self {
        Self::Sequence { source, structures }
    }

    pub fn empty(source: Structure) -> Self {
        Self::sequence(source, Vec::new())
    }

    pub fn source(&self) -> &Structure {
        match self {
            Self::Singleton { source, .. } | Self::Sequence { source, .. } => source,
        }
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self, Self::Singleton { .. })
    }

    /// The selected structures. An empty singleton yields none.
    pub fn structures(&self) -> &[Structure] {
        match self {
            Self::Singleton { structure, .. } if structure.is_empty() => &[],
            Self::Singleton { structure, .. } => std::slice::from_ref(structure),
            Self::Sequence { structures, .. } => structures,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Structure> {
        self.structures().iter()
    }

    pub fn structure_count(&self) -> usize {
        self.structures().len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure_count() == 0
    }

    /// Calls `f` with each structure and its position in the selection.
    pub fn for_each(&self, mut f: impl FnMut(&Structure, usize)) {
        for (index, structure) in self.structures().iter().enumerate() {
            f(structure, index);
        }
    }

    /// Element-wise union of every selected structure.
    pub fn union_structure(&self) -> Structure {
        match self {
            Self::Singleton { structure, .. } => structure.clone(),
            Self::Sequence { structures, .. } => Structure::union_all(structures),
        }
    }
}

impl<'a> IntoIterator for &'a StructureSelection {
    type Item = &'a Structure;
    type IntoIter = std::slice::Iter<'a, Structure>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Collects structures into a sequence, keeping the first of any equal structures.
///
/// Structures are bucketed by content hash and compared element-wise only within a
/// bucket. Empty structures are never added.
pub struct UniqueStructuresBuilder {
    source: Structure,
    structures: Vec<Structure>,
    buckets: HashMap<u64, Vec<usize>>,
}

impl UniqueStructuresBuilder {
    pub fn new(source: Structure) -> Self {
        Self {
            source,
            structures: Vec::new(),
            buckets: HashMap::new(),
        }
    }

    /// Adds `structure` unless it is empty or already present. Returns `true` if added.
    pub fn add(&mut self, structure: Structure) -> bool {
        if structure.is_empty() {
            return false;
        }
        let bucket = self.buckets.entry(structure.hash_code()).or_default();
        if bucket
            .iter()
            .any(|&index| self.structures[index] == structure)
        {
            return false;
        }
        bucket.push(self.structures.len());
        self.structures.push(structure);
        true
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn into_selection(self) -> StructureSelection {
        StructureSelection::sequence(self.source, self.structures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn singleton_counts_one_unless_empty() {
        let source = testing::two_chain_structure();
        let selection = StructureSelection::singleton(source.clone(), source.clone());
        assert!(selection.is_singleton());
        assert_eq!(selection.structure_count(), 1);

        let empty = StructureSelection::singleton(source.clone(), Structure::empty());
        assert_eq!(empty.structure_count(), 0);
        assert!(empty.is_empty());
        assert!(empty.source().same_as(&source));
    }

    #[test]
    fn sequence_counts_its_structures() {
        let source = testing::two_chain_structure();
        let a = testing::subset(&source, &[(1, &[0])]);
        let b = testing::subset(&source, &[(2, &[1])]);
        let selection = StructureSelection::sequence(source, vec![a.clone(), b.clone()]);
        assert!(!selection.is_singleton());
        assert_eq!(selection.structure_count(), 2);

        let mut seen = Vec::new();
        selection.for_each(|structure, index| seen.push((index, structure.clone())));
        assert_eq!(seen, vec![(0, a), (1, b)]);
    }

    #[test]
    fn union_structure_merges_sequence() {
        let source = testing::two_chain_structure();
        let a = testing::subset(&source, &[(1, &[0, 2])]);
        let b = testing::subset(&source, &[(1, &[2, 3]), (2, &[5])]);
        let selection = StructureSelection::sequence(source.clone(), vec![a, b]);
        assert_eq!(
            selection.union_structure(),
            testing::subset(&source, &[(1, &[0, 2, 3]), (2, &[5])])
        );
        assert!(StructureSelection::empty(source).union_structure().is_empty());
    }

    #[test]
    fn unique_builder_drops_duplicates_and_empty_structures() {
        let source = testing::two_chain_structure();
        let mut builder = UniqueStructuresBuilder::new(source.clone());
        assert!(builder.add(testing::subset(&source, &[(1, &[0, 1])])));
        assert!(!builder.add(testing::subset(&source, &[(1, &[1, 0])])));
        assert!(!builder.add(Structure::empty()));
        assert!(builder.add(testing::subset(&source, &[(1, &[0])])));
        assert_eq!(builder.len(), 2);

        let selection = builder.into_selection();
        assert!(!selection.is_singleton());
        assert_eq!(selection.structure_count(), 2);
        assert!(selection.source().same_as(&source));
    }
}
