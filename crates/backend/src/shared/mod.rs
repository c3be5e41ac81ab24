pub mod config;
pub mod data;
pub mod fields;
pub mod format;
pub mod marketplaces;
pub mod period;
