use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Rolling windows reported on the dashboard.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SalesPeriod {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl SalesPeriod {
    /// All periods in display order.
    pub const ALL: [SalesPeriod; 4] = [
        SalesPeriod::Daily,
        SalesPeriod::Weekly,
        SalesPeriod::Monthly,
        SalesPeriod::Yearly,
    ];

    /// Length of the rolling window in days.
    pub fn days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
            Self::Yearly => 365,
        }
    }

    /// Inclusive lower bound of the window ending at `now`.
    pub fn window_start(&self, now: NaiveDateTime) -> NaiveDateTime {
        now - Duration::days(self.days())
    }

    /// Label shown on the chart axis.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

/// Order count and revenue for one period.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodTotals {
    /// Number of orders placed in the period.
    pub count: i64,
    /// Revenue in the smallest currency unit.
    pub total_cents: i64,
}

/// Sales figures for every dashboard period.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct SalesOverview {
    pub daily: PeriodTotals,
    pub weekly: PeriodTotals,
    pub monthly: PeriodTotals,
    pub yearly: PeriodTotals,
}

/// One bar of the sales chart.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChartPoint {
    pub name: &'static str,
    /// Period revenue in currency units.
    pub value: f64,
}

impl SalesOverview {
    pub fn totals(&self, period: SalesPeriod) -> PeriodTotals {
        match period {
            SalesPeriod::Daily => self.daily,
            SalesPeriod::Weekly => self.weekly,
            SalesPeriod::Monthly => self.monthly,
            SalesPeriod::Yearly => self.yearly,
        }
    }

    pub fn set_totals(&mut self, period: SalesPeriod, totals: PeriodTotals) {
        match period {
            SalesPeriod::Daily => self.daily = totals,
            SalesPeriod::Weekly => self.weekly = totals,
            SalesPeriod::Monthly => self.monthly = totals,
            SalesPeriod::Yearly => self.yearly = totals,
        }
    }

    /// Bar chart series in `Daily, Weekly, Monthly, Yearly` order.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        SalesPeriod::ALL
            .iter()
            .map(|period| ChartPoint {
                name: period.label(),
                value: self.totals(*period).total_cents as f64 / 100.0,
            })
            .collect()
    }
}
