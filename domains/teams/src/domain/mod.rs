//! Teams domain layer: entities, role routing, validation

pub mod entities;
pub mod routing;
pub mod validation;
