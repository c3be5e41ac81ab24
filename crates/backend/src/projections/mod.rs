pub mod p900_cargo_allocation;
pub mod p901_profit_lines;
