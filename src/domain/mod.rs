// Domain layer: core models and ports (capabilities the services are built over).

pub mod model;
pub mod ports;
