// Domain layer: knowledge records, match results and the ports the core talks through.

pub mod model;
pub mod ports;
