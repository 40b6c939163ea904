//! 患者明细：多条件筛选与按姓名或编号的模糊搜索

use chrono::NaiveDate;
use clinic_core::{Gender, PatientType, TimeSlot};
use serde::{Deserialize, Serialize};

use crate::table::{AnalyticsRow, AnalyticsTable};

/// 患者明细过滤条件，空集合表示不过滤
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientFilter {
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub genders: Vec<Gender>,
    #[serde(default)]
    pub patient_types: Vec<PatientType>,
    /// 按患者编号、姓名、手机号做不区分大小写的子串搜索
    #[serde(default)]
    pub search: Option<String>,
}

impl PatientFilter {
    fn matches_filters(&self, row: &AnalyticsRow) -> bool {
        let record = &row.record;
        (self.departments.is_empty() || self.departments.iter().any(|d| d == &record.department))
            && (self.genders.is_empty() || self.genders.contains(&record.gender))
            && (self.patient_types.is_empty() || self.patient_types.contains(&record.patient_type))
    }

    fn matches_search(&self, row: &AnalyticsRow) -> bool {
        let term = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term.to_lowercase(),
            _ => return true,
        };
        let record = &row.record;
        [&record.patient_id, &record.name, &record.mobile]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// 明细表的一行
#[derive(Debug, Clone, Serialize)]
pub struct PatientRow {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub mobile: String,
    pub department: String,
    pub doctor_name: String,
    pub doctor_room: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: TimeSlot,
    pub symptoms: String,
    pub lab_tests: String,
    pub consultation_fee: f64,
    pub lab_cost: f64,
    pub total_billing: f64,
}

impl From<&AnalyticsRow> for PatientRow {
    fn from(row: &AnalyticsRow) -> Self {
        let r = &row.record;
        Self {
            patient_id: r.patient_id.clone(),
            name: r.name.clone(),
            age: r.age,
            gender: r.gender,
            mobile: r.mobile.clone(),
            department: r.department.clone(),
            doctor_name: r.doctor_name.clone(),
            doctor_room: r.doctor_room.clone(),
            appointment_date: r.appointment_date,
            appointment_time: r.appointment_time,
            symptoms: r.symptoms_joined(),
            lab_tests: r.lab_tests_joined(),
            consultation_fee: r.consultation_fee,
            lab_cost: r.lab_cost,
            total_billing: r.total_billing,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientSearchResult {
    /// 过滤后的记录数
    pub showing: usize,
    pub total: usize,
    pub patients: Vec<PatientRow>,
    /// 有搜索词时的命中数
    pub matches: Option<usize>,
}

impl PatientSearchResult {
    pub fn summary(&self) -> String {
        format!("Showing {} of {} patients", self.showing, self.total)
    }
}

pub fn patient_details(table: &AnalyticsTable, filter: &PatientFilter) -> PatientSearchResult {
    let filtered: Vec<&AnalyticsRow> = table
        .rows()
        .iter()
        .filter(|row| filter.matches_filters(row))
        .collect();

    let searching = filter.search.as_deref().is_some_and(|s| !s.trim().is_empty());
    let patients: Vec<PatientRow> = filtered
        .iter()
        .filter(|row| filter.matches_search(row))
        .map(|row| PatientRow::from(*row))
        .collect();

    PatientSearchResult {
        showing: filtered.len(),
        total: table.len(),
        matches: searching.then_some(patients.len()),
        patients,
    }
}
