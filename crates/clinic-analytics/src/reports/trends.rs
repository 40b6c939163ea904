//! 趋势分析

use serde::Serialize;

use super::{group_rows, mean_of, sum_of};
use crate::stats::{pearson, value_counts, CountEntry};
use crate::table::{weekday_name, AnalyticsRow, AnalyticsTable, WEEKDAYS};

/// 参与相关性分析的数值列
pub const CORRELATION_COLUMNS: [&str; 7] = [
    "age",
    "num_symptoms",
    "num_lab_tests",
    "consultation_fee",
    "lab_cost",
    "total_billing",
    "doctor_experience",
];

fn column_value(row: &AnalyticsRow, column: usize) -> f64 {
    let record = &row.record;
    match column {
        0 => record.age as f64,
        1 => row.num_symptoms as f64,
        2 => row.num_lab_tests as f64,
        3 => record.consultation_fee,
        4 => record.lab_cost,
        5 => record.total_billing,
        _ => record.doctor_experience as f64,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyMetrics {
    pub month: String,
    pub patients: usize,
    pub revenue: f64,
    pub mean_consultation_fee: f64,
    pub mean_lab_tests: f64,
}

/// 相关系数矩阵，无定义的系数序列化为 `null`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendAnalysis {
    /// 按 `YYYY-MM` 升序
    pub monthly: Vec<MonthlyMetrics>,
    /// 周一到周日，无预约的日期计 0
    pub by_weekday: Vec<CountEntry>,
    pub peak_time_slots: Vec<CountEntry>,
    pub correlation: CorrelationMatrix,
}

pub fn trend_analysis(table: &AnalyticsTable) -> TrendAnalysis {
    let rows = table.rows();

    let monthly = group_rows(rows, |r| r.year_month.clone())
        .into_iter()
        .map(|(month, group)| MonthlyMetrics {
            month,
            patients: group.len(),
            revenue: sum_of(group.iter().copied(), |r| r.record.total_billing),
            mean_consultation_fee: mean_of(&group, |r| r.record.consultation_fee).unwrap_or(0.0),
            mean_lab_tests: mean_of(&group, |r| r.num_lab_tests as f64).unwrap_or(0.0),
        })
        .collect();

    let by_weekday = WEEKDAYS
        .iter()
        .map(|day| CountEntry {
            label: weekday_name(*day).to_string(),
            count: rows.iter().filter(|r| r.weekday() == *day).count(),
        })
        .collect();

    TrendAnalysis {
        monthly,
        by_weekday,
        peak_time_slots: value_counts(rows.iter().map(|r| r.record.appointment_time.label())),
        correlation: correlation_matrix(rows),
    }
}

fn correlation_matrix(rows: &[AnalyticsRow]) -> CorrelationMatrix {
    let series: Vec<Vec<f64>> = (0..CORRELATION_COLUMNS.len())
        .map(|column| rows.iter().map(|row| column_value(row, column)).collect())
        .collect();

    let values = series
        .iter()
        .map(|xs| series.iter().map(|ys| pearson(xs, ys)).collect())
        .collect();

    CorrelationMatrix {
        columns: CORRELATION_COLUMNS.iter().map(|c| c.to_string()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures::record;
    use clinic_core::TimeSlot;

    fn table() -> AnalyticsTable {
        AnalyticsTable::new(vec![
            record(
                "P001",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 1, 1),
                TimeSlot::TenAm,
                900.0,
                &["ECG"],
                800.0,
            ),
            record(
                "P002",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 1, 2),
                TimeSlot::TenAm,
                1000.0,
                &[],
                0.0,
            ),
            record(
                "P003",
                "Neurology",
                "Dr. Sanjay Verma",
                (2024, 2, 6),
                TimeSlot::TwoPm,
                1200.0,
                &["MRI", "CT Scan"],
                12000.0,
            ),
        ])
    }

    #[test]
    fn test_monthly_metrics() {
        let report = trend_analysis(&table());
        assert_eq!(report.monthly.len(), 2);
        assert_eq!(report.monthly[0].month, "2024-01");
        assert_eq!(report.monthly[0].patients, 2);
        assert_eq!(report.monthly[0].revenue, 2700.0);
        assert_eq!(report.monthly[0].mean_consultation_fee, 950.0);
        assert_eq!(report.monthly[1].mean_lab_tests, 2.0);
    }

    #[test]
    fn test_weekdays_include_missing_days() {
        let report = trend_analysis(&table());
        let days: Vec<_> = report.by_weekday.iter().map(|e| (e.label.as_str(), e.count)).collect();
        assert_eq!(
            days,
            vec![
                ("Monday", 1),
                ("Tuesday", 2),
                ("Wednesday", 0),
                ("Thursday", 0),
                ("Friday", 0),
                ("Saturday", 0),
                ("Sunday", 0),
            ]
        );
        assert_eq!(report.peak_time_slots[0].label, "10:00 AM");
    }

    #[test]
    fn test_correlation_matrix() {
        let report = trend_analysis(&table());
        let matrix = &report.correlation;

        assert_eq!(matrix.columns.len(), 7);
        let diagonal = matrix.get("lab_cost", "lab_cost").unwrap();
        assert!((diagonal - 1.0).abs() < 1e-9);
        assert!(matrix.get("lab_cost", "total_billing").unwrap() > 0.9);

        // 所有记录年龄相同，方差为零
        assert_eq!(matrix.get("age", "lab_cost"), None);
        let json = serde_json::to_value(matrix).unwrap();
        assert!(json["values"][0][4].is_null());
    }
}
