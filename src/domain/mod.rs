// Domain layer: value types and ports (interfaces) to the external collaborators.

pub mod model;
pub mod ports;
