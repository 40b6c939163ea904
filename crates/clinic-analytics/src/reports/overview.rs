//! 总览报表
//!
//! 患者总数、总收入、医生数以及科室、年龄、月份分布。

use clinic_core::DepartmentCatalog;
use serde::Serialize;

use super::group_rows;
use crate::stats::{histogram, mean, value_counts, CountEntry, HistogramBin};
use crate::table::AnalyticsTable;

pub const AGE_HISTOGRAM_BINS: usize = 20;

/// 总览
#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub total_patients: usize,
    pub total_revenue: f64,
    pub mean_revenue_per_patient: Option<f64>,
    pub total_doctors: usize,
    pub patients_by_department: Vec<CountEntry>,
    pub patients_by_type: Vec<CountEntry>,
    pub patients_by_gender: Vec<CountEntry>,
    pub age_histogram: Vec<HistogramBin>,
    /// 按 `YYYY-MM` 升序
    pub patients_per_month: Vec<CountEntry>,
}

pub fn overview(table: &AnalyticsTable, departments: &DepartmentCatalog) -> OverviewReport {
    let rows = table.rows();
    let billing: Vec<f64> = rows.iter().map(|r| r.record.total_billing).collect();
    let ages: Vec<f64> = rows.iter().map(|r| r.record.age as f64).collect();

    let patients_per_month = group_rows(rows, |r| r.year_month.clone())
        .into_iter()
        .map(|(label, group)| CountEntry {
            label,
            count: group.len(),
        })
        .collect();

    OverviewReport {
        total_patients: rows.len(),
        total_revenue: billing.iter().sum(),
        mean_revenue_per_patient: mean(&billing),
        total_doctors: departments.doctor_count(),
        patients_by_department: value_counts(rows.iter().map(|r| r.record.department.as_str())),
        patients_by_type: value_counts(rows.iter().map(|r| r.record.patient_type.label())),
        patients_by_gender: value_counts(rows.iter().map(|r| r.record.gender.label())),
        age_histogram: histogram(&ages, AGE_HISTOGRAM_BINS),
        patients_per_month,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures::record;
    use clinic_core::TimeSlot;

    #[test]
    fn test_overview_totals() {
        let table = AnalyticsTable::new(vec![
            record(
                "P001",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 2, 1),
                TimeSlot::TenAm,
                900.0,
                &[],
                0.0,
            ),
            record(
                "P002",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 1, 9),
                TimeSlot::TenAm,
                900.0,
                &["ECG"],
                800.0,
            ),
            record(
                "P003",
                "Neurology",
                "Dr. Sanjay Verma",
                (2024, 2, 3),
                TimeSlot::TwoPm,
                1100.0,
                &[],
                0.0,
            ),
        ]);

        let report = overview(&table, &DepartmentCatalog::standard());
        assert_eq!(report.total_patients, 3);
        assert_eq!(report.total_revenue, 3700.0);
        assert_eq!(report.total_doctors, 18);
        assert_eq!(report.patients_by_department[0].label, "Cardiology");
        assert_eq!(report.patients_by_department[0].count, 2);
        assert_eq!(report.age_histogram.len(), AGE_HISTOGRAM_BINS);

        let months: Vec<_> = report
            .patients_per_month
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(months, vec![("2024-01", 1), ("2024-02", 2)]);
    }

    #[test]
    fn test_overview_of_empty_table() {
        let report = overview(&AnalyticsTable::default(), &DepartmentCatalog::standard());
        assert_eq!(report.total_patients, 0);
        assert_eq!(report.mean_revenue_per_patient, None);
        assert!(report.age_histogram.is_empty());
    }
}
