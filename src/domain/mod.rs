// Domain layer: task/submission models and the ports the marketplace talks through.

pub mod model;
pub mod ports;
