// Domain layer: request/response model and the ports the facade depends on.

pub mod model;
pub mod ports;
