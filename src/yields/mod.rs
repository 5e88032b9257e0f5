pub mod events;
pub mod piecewise;
pub mod point;

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;

pub use events::{collect_events, scale_event};
pub use piecewise::{IntervalYield, PiecewiseYield, accumulate_intervals, accumulate_yield};
pub use point::{YieldMeasurement, compute_yield, compute_yield_at, measure_yield};

/// `(to - from) / from * 100`. Caller guarantees `from != 0`.
pub(crate) fn percent_change(from: &BigDecimal, to: &BigDecimal) -> BigDecimal {
    (to - from) / from * BigDecimal::from(100)
}

pub fn to_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
