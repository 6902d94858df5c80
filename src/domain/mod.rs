// Domain layer: participant and assignment models, plus the ports the pipeline is built on.

pub mod model;
pub mod ports;
pub mod strategy;
