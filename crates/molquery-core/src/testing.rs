//! Shared fixtures for unit tests.

use crate::core::models::builder::ModelBuilder;
use crate::core::models::ids::{ElementIndex, UnitId};
use crate::core::models::model::Model;
use crate::core::models::structure::Structure;
use crate::core::models::unit::{Unit, UnitKind};
use crate::engine::context::QueryContext;
use crate::engine::error::EngineError;
use crate::engine::query::{StructureQuery, from_fn};
use crate::engine::selection::StructureSelection;
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

const ATOMS_PER_RESIDUE: usize = 5;
const ATOM_NAMES: [(&str, &str); ATOMS_PER_RESIDUE] =
    [("N", "N"), ("CA", "C"), ("C", "C"), ("O", "O"), ("CB", "C")];
const RESIDUE_NAMES: [&str; 4] = ["ALA", "GLY", "SER", "LYS"];

/// Chain `A` of `residue_count` residues with five atoms each, laid out on the x axis at
/// 1.5 Å spacing.
pub fn chain_model(residue_count: usize) -> Arc<Model> {
    let mut builder = ModelBuilder::new("chain");
    builder.start_chain('A');
    for residue in 0..residue_count {
        builder.start_residue(residue as isize + 1, RESIDUE_NAMES[residue % RESIDUE_NAMES.len()]);
        for (name, element) in ATOM_NAMES {
            let k = builder.atom_count() as f64;
            builder.add_atom(name, element, Point3::new(k * 1.5, 0.0, 0.0));
        }
    }
    Arc::new(builder.build().unwrap())
}

pub fn translation(x: f64, y: f64, z: f64) -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity())
}

/// Two atomic units of 20 atoms (4 residues of 5) sharing one model; unit 2 is
/// translated 40 Å along z.
pub fn two_chain_structure() -> Structure {
    let model = chain_model(4);
    Structure::new(vec![
        Unit::whole(1, UnitKind::Atomic, Arc::clone(&model)).unwrap(),
        Unit::whole(2, UnitKind::Atomic, model)
            .unwrap()
            .with_transform(translation(0.0, 0.0, 40.0)),
    ])
    .unwrap()
}

pub fn coarse_unit(id: UnitId) -> Unit {
    let positions = (0..6)
        .map(|k| {
            let k = k as f64;
            Point3::new(k * 2.0 + 0.3, 10.0 + k * 0.02, k * 0.003 + 0.5)
        })
        .collect();
    Unit::whole(id, UnitKind::Spheres, Arc::new(Model::coarse("spheres", positions))).unwrap()
}

pub fn coarse_structure() -> Structure {
    Structure::new(vec![coarse_unit(3)]).unwrap()
}

/// The two chains of [`two_chain_structure`] plus coarse unit 3.
pub fn mixed_structure() -> Structure {
    let mut units = two_chain_structure().units().to_vec();
    units.push(coarse_unit(3));
    Structure::new(units).unwrap()
}

/// `count` atomic units of two residues each, every unit shifted by a distinct offset.
pub fn many_unit_structure(count: usize) -> Structure {
    let model = chain_model(2);
    let units = (0..count)
        .map(|u| {
            let offset = u as f64;
            Unit::whole(u as UnitId, UnitKind::Atomic, Arc::clone(&model))
                .unwrap()
                .with_transform(translation(offset * 0.37, offset * 0.53 + 100.0, offset * 0.71))
        })
        .collect();
    Structure::new(units).unwrap()
}

/// Substructure of `source` holding the listed elements.
pub fn subset(source: &Structure, units: &[(UnitId, &[ElementIndex])]) -> Structure {
    let mut builder = source.subset_builder();
    for &(unit_id, elements) in units {
        builder.set_unit(unit_id, elements);
    }
    builder.into_structure()
}

/// Query yielding `structure` as a singleton over the current input.
pub fn select_one(structure: Structure) -> impl StructureQuery {
    from_fn(move |ctx: &mut QueryContext| {
        Ok(StructureSelection::singleton(
            ctx.input_structure().clone(),
            structure.clone(),
        ))
    })
}

/// Query yielding `structures` as a sequence over the current input.
pub fn select(structures: Vec<Structure>) -> impl StructureQuery {
    from_fn(move |ctx: &mut QueryContext| {
        Ok(StructureSelection::sequence(
            ctx.input_structure().clone(),
            structures.clone(),
        ))
    })
}

/// Wraps `query`, counting its evaluations in `calls`.
pub fn counted<Q: StructureQuery>(query: Q, calls: Rc<Cell<usize>>) -> impl StructureQuery {
    from_fn(move |ctx: &mut QueryContext| {
        calls.set(calls.get() + 1);
        query.evaluate(ctx)
    })
}

pub fn failing() -> impl StructureQuery {
    from_fn(|_: &mut QueryContext| Err(EngineError::Internal("failing query".to_string())))
}
