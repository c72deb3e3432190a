use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

/// How `round()` resolves exact midpoints.
///
/// The service's SQL backend rounds half away from zero, which is the
/// default. `HalfEven` matches banker's rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    #[default]
    HalfAwayFromZero,
    HalfEven,
}

impl RoundingMode {
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// How text values are ordered by `order by` and by `<`, `<=`, `>`, `>=`.
///
/// `eq` and `ne` stay ordinal under every collation. Case-insensitive
/// matching is written explicitly with `tolower`/`toupper`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCollation {
    /// Compare lowercased text first, falling back to byte order on ties.
    ///
    /// The tie-break keeps the order total and in step with ordinal
    /// equality: `"Alien"` and `"alien"` are unequal and never compare
    /// `Equal`.
    #[default]
    CaseInsensitive,
    Ordinal,
}

/// Semantic knobs that must agree with the service being checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub rounding: RoundingMode,
    pub collation: TextCollation,
}
