//! Sales metric arithmetic
//!
//! APC and progress percentages are computed with `rust_decimal` so that
//! rounding is exact half-up rather than binary float rounding.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Upper bound of a progress percentage
pub const MAX_PROGRESS: i64 = 100;

fn round_whole(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

/// Average per customer: `spd / std` rounded half-up, 0 when there were no transactions.
pub fn apc(spd: i64, std: i64) -> i64 {
    if std <= 0 {
        return 0;
    }
    Decimal::from(spd)
        .checked_div(Decimal::from(std))
        .map(round_whole)
        .unwrap_or(0)
}

/// Percentage of target reached, capped at 100 and rounded to two decimals.
///
/// A target of zero or less yields 0.
pub fn progress_percent(actual: i64, target: i64) -> f64 {
    if target <= 0 || actual <= 0 {
        return 0.0;
    }
    let pct = Decimal::from(actual)
        .checked_mul(Decimal::from(100))
        .and_then(|v| v.checked_div(Decimal::from(target)))
        .unwrap_or(Decimal::from(MAX_PROGRESS))
        .min(Decimal::from(MAX_PROGRESS))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    pct.to_f64().unwrap_or(0.0)
}

/// Whole-number percentage of `done` over `total`, 0 for an empty set.
pub fn completion_percent(done: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    let pct = Decimal::from(done as u64) * Decimal::from(100) / Decimal::from(total as u64);
    round_whole(pct).min(MAX_PROGRESS)
}

/// One day of sales figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyFigures {
    pub spd: i64,
    pub std: i64,
    pub pulsa: i64,
}

impl DailyFigures {
    pub fn new(spd: i64, std: i64, pulsa: i64) -> Self {
        Self { spd, std, pulsa }
    }

    pub fn apc(&self) -> i64 {
        apc(self.spd, self.std)
    }
}

/// Totals row of a monthly report
///
/// SPD, STD and pulsa are sums; APC is the mean of the daily APC values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SalesTotals {
    pub days: usize,
    pub spd: i64,
    pub std: i64,
    pub apc: i64,
    pub pulsa: i64,
}

impl SalesTotals {
    pub fn from_days<I>(days: I) -> Self
    where
        I: IntoIterator<Item = DailyFigures>,
    {
        let mut totals = SalesTotals::default();
        let mut apc_sum = Decimal::ZERO;
        for day in days {
            totals.days += 1;
            totals.spd = totals.spd.saturating_add(day.spd);
            totals.std = totals.std.saturating_add(day.std);
            totals.pulsa = totals.pulsa.saturating_add(day.pulsa);
            apc_sum += Decimal::from(day.apc());
        }
        if totals.days > 0 {
            totals.apc = round_whole(apc_sum / Decimal::from(totals.days as u64));
        }
        totals
    }
}
