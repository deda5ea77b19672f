//! KPI Target Model

use serde::{Deserialize, Serialize};

use crate::metrics::{SalesTotals, progress_percent};

/// Target for one store, month and shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Target {
    pub id: i64,
    pub store_id: i64,
    /// `YYYY-MM`
    pub month: String,
    pub shift: i64,
    pub target_spd: i64,
    pub target_std: i64,
    pub target_apc: i64,
    pub target_pulsa: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Target {
    pub fn figures(&self) -> TargetFigures {
        TargetFigures {
            spd: self.target_spd,
            std: self.target_std,
            apc: self.target_apc,
            pulsa: self.target_pulsa,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCreate {
    pub month: String,
    pub shift: i64,
    pub target_spd: i64,
    pub target_std: i64,
    pub target_apc: i64,
    #[serde(default)]
    pub target_pulsa: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetUpdate {
    pub target_spd: Option<i64>,
    pub target_std: Option<i64>,
    pub target_apc: Option<i64>,
    pub target_pulsa: Option<i64>,
}

/// The four target values, possibly combined across shifts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFigures {
    pub spd: i64,
    pub std: i64,
    pub apc: i64,
    pub pulsa: i64,
}

impl TargetFigures {
    /// Whole-store target: sums of SPD, STD and pulsa, mean of the APC targets
    pub fn combine(targets: &[Target]) -> Self {
        if targets.is_empty() {
            return Self::default();
        }
        let mut combined = targets.iter().fold(Self::default(), |acc, t| Self {
            spd: acc.spd.saturating_add(t.target_spd),
            std: acc.std.saturating_add(t.target_std),
            apc: acc.apc.saturating_add(t.target_apc),
            pulsa: acc.pulsa.saturating_add(t.target_pulsa),
        });
        combined.apc = crate::metrics::apc(combined.apc, targets.len() as i64);
        combined
    }
}

/// Actual vs target for a single metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricProgress {
    pub actual: i64,
    pub target: i64,
    /// 0..=100, two decimals
    pub percent: f64,
}

impl MetricProgress {
    pub fn new(actual: i64, target: i64) -> Self {
        Self {
            actual,
            target,
            percent: progress_percent(actual, target),
        }
    }

    pub fn is_achieved(&self) -> bool {
        self.target > 0 && self.actual >= self.target
    }
}

/// Progress of a store (optionally a single shift) toward its monthly target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetProgress {
    pub store_id: i64,
    pub month: String,
    /// `None` means all shifts combined
    pub shift: Option<i64>,
    pub has_target: bool,
    pub days_reported: usize,
    pub spd: MetricProgress,
    pub std: MetricProgress,
    pub apc: MetricProgress,
    pub pulsa: MetricProgress,
}

impl TargetProgress {
    pub fn compute(
        store_id: i64,
        month: impl Into<String>,
        shift: Option<i64>,
        targets: &[Target],
        actual: SalesTotals,
    ) -> Self {
        let target = TargetFigures::combine(targets);
        Self {
            store_id,
            month: month.into(),
            shift,
            has_target: !targets.is_empty(),
            days_reported: actual.days,
            spd: MetricProgress::new(actual.spd, target.spd),
            std: MetricProgress::new(actual.std, target.std),
            apc: MetricProgress::new(actual.apc, target.apc),
            pulsa: MetricProgress::new(actual.pulsa, target.pulsa),
        }
    }
}
