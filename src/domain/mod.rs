// Domain layer: transient models and the host capabilities (ports) the components consume.

pub mod model;
pub mod ports;
