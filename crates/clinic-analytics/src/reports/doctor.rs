//! 医生报表：接诊量、收入与排班分布

use clinic_core::TimeSlot;
use serde::Serialize;

use super::{group_rows, mean_of, sum_of};
use crate::stats::{mean, CountEntry};
use crate::table::{weekday_name, AnalyticsTable, WEEKDAYS};

/// 单个医生的业绩
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DoctorStats {
    pub doctor: String,
    pub patients: usize,
    pub total_revenue: f64,
    pub mean_consultation_fee: f64,
    pub department: String,
    pub experience_years: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorAnalytics {
    /// 按接诊人数降序
    pub doctors: Vec<DoctorStats>,
    pub top_by_patients: Option<DoctorStats>,
    pub top_by_revenue: Option<DoctorStats>,
    pub mean_patients_per_doctor: Option<f64>,
}

/// 单个医生的时段与星期分布
#[derive(Debug, Clone, Serialize)]
pub struct DoctorSchedule {
    pub doctor: String,
    pub patients: usize,
    /// 按时段先后排列，只包含有预约的时段
    pub by_time_slot: Vec<CountEntry>,
    /// 周一到周日，只包含有预约的日期
    pub by_day_of_week: Vec<CountEntry>,
}

pub fn doctor_analytics(table: &AnalyticsTable) -> DoctorAnalytics {
    let mut doctors: Vec<DoctorStats> = group_rows(table.rows(), |r| r.record.doctor_name.as_str())
        .into_iter()
        .map(|(name, group)| DoctorStats {
            doctor: name.to_string(),
            patients: group.len(),
            total_revenue: sum_of(group.iter().copied(), |r| r.record.total_billing),
            mean_consultation_fee: mean_of(&group, |r| r.record.consultation_fee).unwrap_or(0.0),
            // 同名医生取首条记录的科室与年资
            department: group[0].record.department.clone(),
            experience_years: group[0].record.doctor_experience,
        })
        .collect();

    doctors.sort_by(|a, b| b.patients.cmp(&a.patients).then_with(|| a.doctor.cmp(&b.doctor)));

    let top_by_revenue = doctors
        .iter()
        .max_by(|a, b| {
            a.total_revenue
                .total_cmp(&b.total_revenue)
                .then_with(|| b.doctor.cmp(&a.doctor))
        })
        .cloned();

    let counts: Vec<f64> = doctors.iter().map(|d| d.patients as f64).collect();

    DoctorAnalytics {
        top_by_patients: doctors.first().cloned(),
        top_by_revenue,
        mean_patients_per_doctor: mean(&counts),
        doctors,
    }
}

/// 医生不存在于表中时返回 `None`
pub fn doctor_schedule(table: &AnalyticsTable, doctor: &str) -> Option<DoctorSchedule> {
    let rows: Vec<_> = table
        .rows()
        .iter()
        .filter(|r| r.record.doctor_name == doctor)
        .collect();

    if rows.is_empty() {
        return None;
    }

    let by_time_slot = TimeSlot::ALL
        .iter()
        .map(|slot| CountEntry {
            label: slot.label().to_string(),
            count: rows.iter().filter(|r| r.record.appointment_time == *slot).count(),
        })
        .filter(|entry| entry.count > 0)
        .collect();

    let by_day_of_week = WEEKDAYS
        .iter()
        .map(|day| CountEntry {
            label: weekday_name(*day).to_string(),
            count: rows.iter().filter(|r| r.weekday() == *day).count(),
        })
        .filter(|entry| entry.count > 0)
        .collect();

    Some(DoctorSchedule {
        doctor: doctor.to_string(),
        patients: rows.len(),
        by_time_slot,
        by_day_of_week,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::fixtures::record;

    fn table() -> AnalyticsTable {
        AnalyticsTable::new(vec![
            // 2024-01-01 是周一
            record(
                "P001",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 1, 1),
                TimeSlot::TenAm,
                900.0,
                &[],
                0.0,
            ),
            record(
                "P002",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 1, 2),
                TimeSlot::FivePm,
                900.0,
                &[],
                0.0,
            ),
            record(
                "P003",
                "Cardiology",
                "Dr. Ravi Kumar",
                (2024, 1, 8),
                TimeSlot::TenAm,
                1000.0,
                &[],
                0.0,
            ),
            record(
                "P004",
                "Neurology",
                "Dr. Sanjay Verma",
                (2024, 1, 3),
                TimeSlot::TwoPm,
                1200.0,
                &["MRI"],
                5000.0,
            ),
        ])
    }

    #[test]
    fn test_doctor_ranking() {
        let report = doctor_analytics(&table());

        assert_eq!(report.doctors.len(), 2);
        assert_eq!(report.doctors[0].doctor, "Dr. Ravi Kumar");
        assert_eq!(report.doctors[0].patients, 3);
        assert_eq!(report.doctors[0].total_revenue, 2800.0);
        assert!((report.doctors[0].mean_consultation_fee - 933.333).abs() < 1e-3);

        assert_eq!(report.top_by_patients.unwrap().doctor, "Dr. Ravi Kumar");
        assert_eq!(report.top_by_revenue.unwrap().doctor, "Dr. Sanjay Verma");
        assert_eq!(report.mean_patients_per_doctor, Some(2.0));
    }

    #[test]
    fn test_doctor_schedule() {
        let schedule = doctor_schedule(&table(), "Dr. Ravi Kumar").unwrap();
        assert_eq!(schedule.patients, 3);

        let slots: Vec<_> = schedule
            .by_time_slot
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(slots, vec![("10:00 AM", 2), ("5:00 PM", 1)]);

        let days: Vec<_> = schedule
            .by_day_of_week
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(days, vec![("Monday", 2), ("Tuesday", 1)]);

        assert!(doctor_schedule(&table(), "Dr. Nobody").is_none());
    }

    #[test]
    fn test_empty_table() {
        let report = doctor_analytics(&AnalyticsTable::default());
        assert!(report.doctors.is_empty());
        assert!(report.top_by_patients.is_none());
        assert_eq!(report.mean_patients_per_doctor, None);
    }
}
