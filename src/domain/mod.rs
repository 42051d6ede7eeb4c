// Domain layer: models and ports (interfaces) shared by the rest of the crate.

pub mod model;
pub mod ports;
