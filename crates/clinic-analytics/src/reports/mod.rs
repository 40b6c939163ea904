//! 报表视图
//!
//! 每个报表都是对 [`AnalyticsTable`](crate::AnalyticsTable) 的只读聚合，
//! 表为空时返回空集合与 `None`，不会出错。

mod department;
mod doctor;
mod overview;
mod patients;
mod revenue;
mod trends;

pub use department::{
    department_analytics, department_symptoms, DepartmentAnalytics, DepartmentStats,
    DepartmentSymptoms,
};
pub use doctor::{doctor_analytics, doctor_schedule, DoctorAnalytics, DoctorSchedule, DoctorStats};
pub use overview::{overview, OverviewReport, AGE_HISTOGRAM_BINS};
pub use patients::{patient_details, PatientFilter, PatientRow, PatientSearchResult};
pub use revenue::{
    revenue_analytics, DateRange, DoctorRevenue, RevenueAnalytics, RevenuePeriod, RevenuePoint,
};
pub use trends::{
    trend_analysis, CorrelationMatrix, MonthlyMetrics, TrendAnalysis, CORRELATION_COLUMNS,
};

use crate::table::AnalyticsRow;
use std::collections::BTreeMap;

/// 按键分组，组内保持原始顺序
pub(crate) fn group_rows<'a, K, F>(
    rows: &'a [AnalyticsRow],
    key: F,
) -> BTreeMap<K, Vec<&'a AnalyticsRow>>
where
    K: Ord,
    F: Fn(&'a AnalyticsRow) -> K,
{
    let mut groups: BTreeMap<K, Vec<&AnalyticsRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(row);
    }
    groups
}

pub(crate) fn sum_of<'a, F>(rows: impl IntoIterator<Item = &'a AnalyticsRow>, value: F) -> f64
where
    F: Fn(&AnalyticsRow) -> f64,
{
    rows.into_iter().map(value).sum()
}

pub(crate) fn mean_of<'a, F>(rows: &[&'a AnalyticsRow], value: F) -> Option<f64>
where
    F: Fn(&AnalyticsRow) -> f64,
{
    let values: Vec<f64> = rows.iter().map(|row| value(row)).collect();
    crate::stats::mean(&values)
}
