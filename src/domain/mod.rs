// Domain layer: store/product model, result-set views and the ports the core talks through.

pub mod model;
pub mod ports;
pub mod view;
