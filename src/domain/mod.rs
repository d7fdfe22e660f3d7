// Domain layer: host-canonical models, GitHub resource shapes and ports.
// No I/O here.

pub mod model;
pub mod ports;
pub mod remote;
