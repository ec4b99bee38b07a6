// Domain layer: models and the ports the selector and renderer talk through.

pub mod model;
pub mod ports;
