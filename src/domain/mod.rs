// Domain layer: boat records and the storage/config ports. No I/O here.

pub mod model;
pub mod ports;
