//! Radius-bounded neighbor queries over the element positions of a structure.

pub mod lookup;
