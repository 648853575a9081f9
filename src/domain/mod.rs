// Domain layer: cube model, query types and ports. No I/O here.

pub mod model;
pub mod ports;
