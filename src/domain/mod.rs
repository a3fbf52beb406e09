// Domain layer: records, summary rows and the ports the adapters implement.

pub mod model;
pub mod ports;
