//! 科室报表

use serde::Serialize;

use super::{group_rows, mean_of, sum_of};
use crate::stats::{mean, value_counts, CountEntry};
use crate::table::AnalyticsTable;

/// 科室症状排行的长度
const TOP_SYMPTOMS: usize = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DepartmentStats {
    pub department: String,
    pub patients: usize,
    pub total_revenue: f64,
    pub mean_consultation_fee: f64,
    pub lab_revenue: f64,
    pub mean_lab_tests: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentAnalytics {
    /// 按科室名排序
    pub departments: Vec<DepartmentStats>,
    pub busiest: Option<String>,
    pub highest_revenue: Option<String>,
    pub mean_patients_per_department: Option<f64>,
}

/// 单个科室的症状排行与概况
#[derive(Debug, Clone, Serialize)]
pub struct DepartmentSymptoms {
    pub department: String,
    pub top_symptoms: Vec<CountEntry>,
    pub patients: usize,
    pub mean_age: Option<f64>,
    pub total_revenue: f64,
}

pub fn department_analytics(table: &AnalyticsTable) -> DepartmentAnalytics {
    let departments: Vec<DepartmentStats> =
        group_rows(table.rows(), |r| r.record.department.as_str())
            .into_iter()
            .map(|(name, group)| DepartmentStats {
                department: name.to_string(),
                patients: group.len(),
                total_revenue: sum_of(group.iter().copied(), |r| r.record.total_billing),
                mean_consultation_fee: mean_of(&group, |r| r.record.consultation_fee)
                    .unwrap_or(0.0),
                lab_revenue: sum_of(group.iter().copied(), |r| r.record.lab_cost),
                mean_lab_tests: mean_of(&group, |r| r.num_lab_tests as f64).unwrap_or(0.0),
        })
        .collect();

    // 并列时取名称靠前的科室
    let busiest = departments
        .iter()
        .max_by(|a, b| a.patients.cmp(&b.patients).then_with(|| b.department.cmp(&a.department)))
        .map(|d| d.department.clone());

    let highest_revenue = departments
        .iter()
        .max_by(|a, b| {
            a.total_revenue
                .total_cmp(&b.total_revenue)
                .then_with(|| b.department.cmp(&a.department))
        })
        .map(|d| d.department.clone());

    let counts: Vec<f64> = departments.iter().map(|d| d.patients as f64).collect();

    DepartmentAnalytics {
        busiest,
        highest_revenue,
        mean_patients_per_department: mean(&counts),
        departments,
    }
}

/// 科室不存在于表中时返回 `None`
pub fn department_symptoms(table: &AnalyticsTable, department: &str) -> Option<DepartmentSymptoms> {
    let rows: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| r.record.department == department)
        .collect();

    if rows.is_empty() {
        return None;
    }

    let mut top_symptoms = value_counts(
        rows.iter()
            .flat_map(|r| r.record.symptoms.iter().map(String::as_str)),
    );
    top_symptoms.truncate(TOP_SYMPTOMS);

    Some(DepartmentSymptoms {
        department: department.to_string(),
        top_symptoms,
        patients: rows.len(),
        mean_age: mean_of(&rows, |r| r.record.age as f64),
        total_revenue: sum_of(rows.iter().copied(), |r| r.record.total_billing),
    })
}
