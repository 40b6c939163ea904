//! 营收报表
//!
//! 按日期区间筛选后，按日、周、月或季度汇总收入趋势。

use chrono::{Datelike, NaiveDate};
use clinic_core::{ClinicError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{group_rows, sum_of};
use crate::stats::mean;
use crate::table::{month_name, AnalyticsRow, AnalyticsTable};

const TOP_DOCTORS: usize = 10;

/// 营收趋势的时间粒度
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RevenuePeriod {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl fmt::Display for RevenuePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RevenuePeriod::Daily => "Daily",
            RevenuePeriod::Weekly => "Weekly",
            RevenuePeriod::Monthly => "Monthly",
            RevenuePeriod::Quarterly => "Quarterly",
        };
        f.write_str(label)
    }
}

impl FromStr for RevenuePeriod {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(RevenuePeriod::Daily),
            "weekly" => Ok(RevenuePeriod::Weekly),
            "monthly" => Ok(RevenuePeriod::Monthly),
            "quarterly" => Ok(RevenuePeriod::Quarterly),
            other => Err(ClinicError::Validation(format!("unknown revenue period: {}", other))),
        }
    }
}

/// 闭区间日期过滤，缺省端不设限
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ClinicError::Validation(format!(
                    "start date {} is after end date {}",
                    s, e
                )));
            }
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RevenuePoint {
    pub period: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoctorRevenue {
    pub doctor: String,
    pub department: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueAnalytics {
    pub range: DateRange,
    pub period: RevenuePeriod,
    pub patients: usize,
    pub total_revenue: f64,
    pub consultation_revenue: f64,
    pub lab_revenue: f64,
    pub mean_revenue_per_patient: Option<f64>,
    /// 按营收升序
    pub by_department: Vec<RevenuePoint>,
    pub trend: Vec<RevenuePoint>,
    pub top_doctors: Vec<DoctorRevenue>,
}

pub fn revenue_analytics(
    table: &AnalyticsTable,
    range: DateRange,
    period: RevenuePeriod,
) -> RevenueAnalytics {
    let rows: Vec<AnalyticsRow> = table
        .rows()
        .iter()
        .filter(|r| range.contains(r.date()))
        .cloned()
        .collect();

    let billing: Vec<f64> = rows.iter().map(|r| r.record.total_billing).collect();

    let mut by_department: Vec<RevenuePoint> = group_rows(&rows, |r| r.record.department.as_str())
        .into_iter()
        .map(|(name, group)| RevenuePoint {
            period: name.to_string(),
            revenue: sum_of(group, |r| r.record.total_billing),
        })
        .collect();
    by_department.sort_by(|a, b| a.revenue.total_cmp(&b.revenue));

    let mut top_doctors: Vec<DoctorRevenue> =
        group_rows(&rows, |r| (r.record.doctor_name.as_str(), r.record.department.as_str()))
            .into_iter()
            .map(|((doctor, department), group)| DoctorRevenue {
                doctor: doctor.to_string(),
                department: department.to_string(),
                revenue: sum_of(group, |r| r.record.total_billing),
            })
            .collect();
    top_doctors.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.doctor.cmp(&b.doctor))
    });
    top_doctors.truncate(TOP_DOCTORS);

    RevenueAnalytics {
        range,
        period,
        patients: rows.len(),
        total_revenue: billing.iter().sum(),
        consultation_revenue: sum_of(&rows, |r| r.record.consultation_fee),
        lab_revenue: sum_of(&rows, |r| r.record.lab_cost),
        mean_revenue_per_patient: mean(&billing),
        by_department,
        trend: revenue_trend(&rows, period),
        top_doctors,
    }
}

fn revenue_trend(rows: &[AnalyticsRow], period: RevenuePeriod) -> Vec<RevenuePoint> {
    // 排序键与展示标签分开，月份按日历顺序而非字母顺序
    let mut buckets: BTreeMap<(i64, String), f64> = BTreeMap::new();

    for row in rows {
        let date = row.date();
        let key = match period {
            RevenuePeriod::Daily => (date.num_days_from_ce() as i64, date.to_string()),
            RevenuePeriod::Weekly => {
                let week = date.iso_week();
                (
                    week.year() as i64 * 100 + week.week() as i64,
                    format!("{}-W{:02}", week.year(), week.week()),
                )
            }
            RevenuePeriod::Monthly => (date.month() as i64, month_name(date.month()).to_string()),
            RevenuePeriod::Quarterly => (((date.month() - 1) / 3 + 1) as i64, row.quarter.clone()),
        };
        *buckets.entry(key).or_insert(0.0) += row.record.total_billing;
    }

    buckets
        .into_iter()
        .map(|((_, period), revenue)| RevenuePoint { period, revenue })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures::record;
    use clinic_core::TimeSlot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn table() -> AnalyticsTable {
        AnalyticsTable::new(vec![
            record(
                "P001",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 3, 4),
                TimeSlot::TenAm,
                900.0,
                &["ECG"],
                800.0,
            ),
            record(
                "P002",
                "Neurology",
                "Dr. Sanjay Verma",
                (2024, 1, 10),
                TimeSlot::TwoPm,
                1200.0,
                &[],
                0.0,
            ),
            record(
                "P003",
                "Neurology",
                "Dr. Sanjay Verma",
                (2024, 11, 20),
                TimeSlot::TwoPm,
                1200.0,
                &["MRI"],
                5000.0,
            ),
            record(
                "P004",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 3, 5),
                TimeSlot::TenAm,
                900.0,
                &[],
                0.0,
            ),
        ])
    }

    #[test]
    fn test_totals_and_composition() {
        let report = revenue_analytics(&table(), DateRange::default(), RevenuePeriod::Daily);

        assert_eq!(report.patients, 4);
        assert_eq!(report.total_revenue, 10000.0);
        assert_eq!(report.consultation_revenue, 4200.0);
        assert_eq!(report.lab_revenue, 5800.0);
        assert_eq!(report.mean_revenue_per_patient, Some(2500.0));

        let departments: Vec<_> = report.by_department.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(departments, vec!["Cardiology", "Neurology"]);
        assert_eq!(report.top_doctors[0].doctor, "Dr. Sanjay Verma");
    }

    #[test]
    fn test_range_is_inclusive() {
        let range = DateRange::new(Some(date(2024, 3, 4)), Some(date(2024, 3, 5))).unwrap();
        let report = revenue_analytics(&table(), range, RevenuePeriod::Daily);
        assert_eq!(report.patients, 2);
        assert_eq!(report.trend.len(), 2);
        assert_eq!(report.trend[0].period, "2024-03-04");

        assert!(DateRange::new(Some(date(2024, 3, 5)), Some(date(2024, 3, 4))).is_err());
    }

    #[test]
    fn test_monthly_trend_in_calendar_order() {
        let report = revenue_analytics(&table(), DateRange::default(), RevenuePeriod::Monthly);
        let months: Vec<_> = report.trend.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(months, vec!["January", "March", "November"]);
        assert_eq!(report.trend[1].revenue, 2600.0);
    }

    #[test]
    fn test_weekly_and_quarterly_trend() {
        let weekly = revenue_analytics(&table(), DateRange::default(), RevenuePeriod::Weekly);
        assert_eq!(weekly.trend[0].period, "2024-W02");
        assert_eq!(weekly.trend[1].period, "2024-W10");
        assert_eq!(weekly.trend[1].revenue, 2600.0);

        let quarterly = revenue_analytics(&table(), DateRange::default(), RevenuePeriod::Quarterly);
        let quarters: Vec<_> = quarterly
            .trend
            .iter()
            .map(|p| (p.period.as_str(), p.revenue))
            .collect();
        assert_eq!(quarters, vec![("Q1", 3800.0), ("Q4", 6200.0)]);
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("weekly".parse::<RevenuePeriod>().unwrap(), RevenuePeriod::Weekly);
        assert_eq!(" Quarterly ".parse::<RevenuePeriod>().unwrap(), RevenuePeriod::Quarterly);
        assert!("hourly".parse::<RevenuePeriod>().is_err());
    }
}
