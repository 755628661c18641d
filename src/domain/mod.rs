// Domain layer: source/target records, translation tables and ports (interfaces).

pub mod mapping;
pub mod model;
pub mod output;
pub mod ports;
pub mod target;
