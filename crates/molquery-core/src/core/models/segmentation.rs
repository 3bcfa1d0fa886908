use super::error::ModelError;
use super::ids::ElementIndex;
use std::ops::Range;

/// Partition of a model's element space into contiguous segments (residues).
///
/// Segment `i` spans `[offsets[i], offsets[i + 1])`. Offsets start at 0 and increase
/// strictly, so every segment holds at least one element. A reverse table maps each
/// element to the segment containing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    offsets: Vec<ElementIndex>,
    index: Vec<usize>,
}

/// A run of consecutive positions in an element slice that fall into one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Index of the segment in the segmentation.
    pub index: usize,
    /// First position (inclusive) in the iterated element slice.
    pub start: usize,
    /// Last position (exclusive) in the iterated element slice.
    pub end: usize,
}

impl Segmentation {
    /// Creates a segmentation from an offset table of length `segment_count + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidSegmentation`] if the table is empty, does not start
    /// at 0, or is not strictly increasing.
    pub fn from_offsets(offsets: Vec<ElementIndex>) -> Result<Self, ModelError> {
        if offsets.first() != Some(&0) {
            return Err(ModelError::InvalidSegmentation { position: 0 });
        }
        if let Some(position) = offsets.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ModelError::InvalidSegmentation {
                position: position + 1,
            });
        }

        let element_count = offsets[offsets.len() - 1];
        let mut index = Vec::with_capacity(element_count);
        for (segment, bounds) in offsets.windows(2).enumerate() {
            index.extend(std::iter::repeat_n(segment, bounds[1] - bounds[0]));
        }

        Ok(Self { offsets, index })
    }

    pub fn segment_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn element_count(&self) -> usize {
        self.index.len()
    }

    pub fn offsets(&self) -> &[ElementIndex] {
        &self.offsets
    }

    /// Returns the segment containing `element`, if the element is in range.
    pub fn segment_of(&self, element: ElementIndex) -> Option<usize> {
        self.index.get(element).copied()
    }

    /// Returns the element range covered by `segment`.
    ///
    /// # Panics
    ///
    /// Panics if `segment` is not smaller than [`Self::segment_count`].
    pub fn range(&self, segment: usize) -> Range<ElementIndex> {
        self.offsets[segment]..self.offsets[segment + 1]
    }

    /// Iterates the segments touched by an ascending element slice.
    ///
    /// Each step jumps directly past the current segment with a binary search, so the
    /// cost depends on the number of touched segments and not on the total number of
    /// segments in the model. Every element of the slice must be in range.
    pub fn transient_segments<'a>(&'a self, elements: &'a [ElementIndex]) -> TransientSegments<'a> {
        TransientSegments {
            segmentation: self,
            elements,
            position: 0,
        }
    }
}

/// Iterator returned by [`Segmentation::transient_segments`].
pub struct TransientSegments<'a> {
    segmentation: &'a Segmentation,
    elements: &'a [ElementIndex],
    position: usize,
}

impl Iterator for TransientSegments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.position;
        let first = *self.elements.get(start)?;
        let index = self.segmentation.index[first];
        let segment_end = self.segmentation.offsets[index + 1];
        let end = start
            + self.elements[start..].partition_point(|&element| element < segment_end);
        self.position = end;
        Some(Segment { index, start, end })
    }
}
