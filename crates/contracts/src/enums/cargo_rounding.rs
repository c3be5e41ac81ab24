use serde::{Deserialize, Serialize};

/// Rounding policy for cargo shares allocated to order lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoRounding {
    /// Exact proportional shares. The sum matches the order total up to
    /// floating-point drift; no remainder correction.
    #[default]
    Exact,
    /// Shares floored to cents, leftover cents handed out one at a time to the
    /// largest fractional remainders (ties: larger weight, then line order).
    LargestRemainder,
}

impl CargoRounding {
    pub fn code(&self) -> &'static str {
        match self {
            CargoRounding::Exact => "exact",
            CargoRounding::LargestRemainder => "largest_remainder",
        }
    }
}
