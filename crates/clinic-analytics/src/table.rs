//! 分析表
//!
//! 在预约记录之上附加报表所需的派生列。

use chrono::{Datelike, NaiveDate, Weekday};
use clinic_core::AppointmentRecord;
use serde::Serialize;

pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    NAMES.get(month.saturating_sub(1) as usize).copied().unwrap_or("Unknown")
}

/// 带派生列的分析行
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsRow {
    #[serde(flatten)]
    pub record: AppointmentRecord,
    pub day_of_week: &'static str,
    pub month: &'static str,
    pub year: i32,
    pub quarter: String,
    pub year_month: String,
    pub num_symptoms: usize,
    pub num_lab_tests: usize,
}

impl AnalyticsRow {
    pub fn new(record: AppointmentRecord) -> Self {
        let date = record.appointment_date;
        Self {
            day_of_week: weekday_name(date.weekday()),
            month: month_name(date.month()),
            year: date.year(),
            quarter: quarter_label(date),
            year_month: date.format("%Y-%m").to_string(),
            num_symptoms: record.symptoms.len(),
            num_lab_tests: record.lab_tests.len(),
            record,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.record.appointment_date
    }

    pub fn weekday(&self) -> Weekday {
        self.record.appointment_date.weekday()
    }
}

pub fn quarter_label(date: NaiveDate) -> String {
    format!("Q{}", (date.month() - 1) / 3 + 1)
}

/// 报表使用的整张表
#[derive(Debug, Clone, Default)]
pub struct AnalyticsTable {
    rows: Vec<AnalyticsRow>,
}

impl AnalyticsTable {
    pub fn new(records: impl IntoIterator<Item = AppointmentRecord>) -> Self {
        Self {
            rows: records.into_iter().map(AnalyticsRow::new).collect(),
        }
    }

    pub fn rows(&self) -> &[AnalyticsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 追加运行期间登记的记录
    pub fn extend(&mut self, records: impl IntoIterator<Item = AppointmentRecord>) {
        self.rows.extend(records.into_iter().map(AnalyticsRow::new));
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use clinic_core::{AppointmentRecord, BloodGroup, Gender, PatientType, TimeSlot};

    #[allow(clippy::too_many_arguments)]
    pub fn record(
        id: &str,
        department: &str,
        doctor: &str,
        date: (i32, u32, u32),
        slot: TimeSlot,
        fee: f64,
        lab_tests: &[&str],
        lab_cost: f64,
    ) -> AppointmentRecord {
        AppointmentRecord {
            patient_id: id.to_string(),
            name: format!("Patient {}", id),
            age: 30,
            gender: Gender::Female,
            blood_group: BloodGroup::OPositive,
            mobile: "9876543210".to_string(),
            email: format!("{}@email.com", id.to_lowercase()),
            date_of_birth: None,
            department: department.to_string(),
            doctor_id: None,
            doctor_name: doctor.to_string(),
            doctor_room: "101".to_string(),
            doctor_experience: 10,
            symptoms: vec!["fever".to_string()],
            lab_tests: lab_tests.iter().map(|t| t.to_string()).collect(),
            lab_cost,
            consultation_fee: fee,
            total_billing: fee + lab_cost,
            appointment_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            appointment_time: slot,
            patient_type: PatientType::NewPatient,
            booked_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::TimeSlot;

    #[test]
    fn test_derived_columns() {
        let row = AnalyticsRow::new(fixtures::record(
            "P001",
            "Cardiology",
            "Dr. Ravi Kumar",
            (2024, 8, 14),
            TimeSlot::TenAm,
            900.0,
            &["ECG", "Blood Test"],
            1000.0,
        ));

        assert_eq!(row.day_of_week, "Wednesday");
        assert_eq!(row.month, "August");
        assert_eq!(row.year, 2024);
        assert_eq!(row.quarter, "Q3");
        assert_eq!(row.year_month, "2024-08");
        assert_eq!(row.num_symptoms, 1);
        assert_eq!(row.num_lab_tests, 2);
    }

    #[test]
    fn test_quarter_boundaries() {
        let d = |m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
        assert_eq!(quarter_label(d(1)), "Q1");
        assert_eq!(quarter_label(d(3)), "Q1");
        assert_eq!(quarter_label(d(4)), "Q2");
        assert_eq!(quarter_label(d(12)), "Q4");
    }
}
