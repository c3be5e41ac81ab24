pub mod allocation;
pub mod cargo_map;
pub mod service;

pub use allocation::{allocate_cargo, allocate_order_cargo, AllocatedCost};
pub use cargo_map::{resolve_cargo_total, CargoMaps, TariffFallback};
