//! 核心数据模型定义

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ClinicError;
use crate::utils::comma_list;

/// 血型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::AbPositive,
        BloodGroup::AbNegative,
        BloodGroup::OPositive,
        BloodGroup::ONegative,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::AbPositive => "AB+",
            BloodGroup::AbNegative => "AB-",
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
        }
    }
}

/// 性别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// 患者类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PatientType {
    #[serde(rename = "New Patient")]
    NewPatient,
    #[serde(rename = "Existing Patient")]
    ExistingPatient,
}

impl PatientType {
    pub const ALL: [PatientType; 2] = [PatientType::NewPatient, PatientType::ExistingPatient];

    pub fn label(&self) -> &'static str {
        match self {
            PatientType::NewPatient => "New Patient",
            PatientType::ExistingPatient => "Existing Patient",
        }
    }
}

/// 就诊时段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeSlot {
    #[serde(rename = "10:00 AM")]
    TenAm,
    #[serde(rename = "11:00 AM")]
    ElevenAm,
    #[serde(rename = "2:00 PM")]
    TwoPm,
    #[serde(rename = "4:00 PM")]
    FourPm,
    #[serde(rename = "5:00 PM")]
    FivePm,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 5] = [
        TimeSlot::TenAm,
        TimeSlot::ElevenAm,
        TimeSlot::TwoPm,
        TimeSlot::FourPm,
        TimeSlot::FivePm,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeSlot::TenAm => "10:00 AM",
            TimeSlot::ElevenAm => "11:00 AM",
            TimeSlot::TwoPm => "2:00 PM",
            TimeSlot::FourPm => "4:00 PM",
            TimeSlot::FivePm => "5:00 PM",
        }
    }
}

macro_rules! impl_label_traits {
    ($($ty:ident),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }

            impl FromStr for $ty {
                type Err = ClinicError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let wanted = s.trim();
                    $ty::ALL
                        .iter()
                        .copied()
                        .find(|value| value.label().eq_ignore_ascii_case(wanted))
                        .ok_or_else(|| {
                            ClinicError::Validation(format!("未知的{}取值: {}", stringify!($ty), s))
                        })
                }
            }
        )*
    };
}

impl_label_traits!(BloodGroup, Gender, PatientType, TimeSlot);

/// 医生信息
///
/// `id` 由科室名与医生姓名派生，目录重排不会改变医生身份。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub room: String,
    pub experience_years: u32,
    pub patient_count: u32, // 已确认预约数
}

/// 科室
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub name: String,
    pub doctors: Vec<Doctor>,
}

/// 预约时选定医生的快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoctorRef {
    pub id: Uuid,
    pub name: String,
    pub room: String,
    pub experience_years: u32,
}

impl From<&Doctor> for DoctorRef {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            name: doctor.name.clone(),
            room: doctor.room.clone(),
            experience_years: doctor.experience_years,
        }
    }
}

/// 第一步：患者基本信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Demographics {
    pub name: String,
    pub age: u32,
    pub blood_group: BloodGroup,
    pub gender: Gender,
    pub mobile: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

/// 第四步：检验项目及费用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabSelection {
    pub tests: Vec<String>,
    pub lab_cost: f64,
}

/// 第五步：时段、患者类型与计费
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleDetails {
    pub time_slot: TimeSlot,
    pub appointment_date: NaiveDate,
    pub patient_type: PatientType,
    pub consultation_fee: f64,
    pub total_billing: f64,
}

/// 登记向导累积的患者数据
///
/// 每个字段只在对应步骤校验通过后才会被写入。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientIntake {
    pub demographics: Option<Demographics>,
    pub symptoms: Option<Vec<String>>,
    pub department: Option<String>,
    pub doctor: Option<DoctorRef>,
    pub lab_selection: Option<LabSelection>,
    pub schedule: Option<ScheduleDetails>,
}

impl PatientIntake {
    /// 所有步骤的数据是否齐全
    pub fn is_complete(&self) -> bool {
        self.demographics.is_some()
            && self.symptoms.is_some()
            && self.department.is_some()
            && self.doctor.is_some()
            && self.lab_selection.is_some()
            && self.schedule.is_some()
    }

    pub fn lab_cost(&self) -> f64 {
        self.lab_selection.as_ref().map(|l| l.lab_cost).unwrap_or(0.0)
    }
}

/// 已确认预约的不可变快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentRecord {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub blood_group: BloodGroup,
    pub mobile: String,
    pub email: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    pub department: String,
    #[serde(default)]
    pub doctor_id: Option<Uuid>,
    pub doctor_name: String,
    pub doctor_room: String,
    pub doctor_experience: u32,
    #[serde(with = "comma_list")]
    pub symptoms: Vec<String>,
    #[serde(with = "comma_list")]
    pub lab_tests: Vec<String>,
    pub lab_cost: f64,
    pub consultation_fee: f64,
    pub total_billing: f64,
    pub appointment_date: NaiveDate,
    pub appointment_time: TimeSlot,
    pub patient_type: PatientType,
    #[serde(default)]
    pub booked_at: Option<DateTime<Utc>>,
}

impl AppointmentRecord {
    /// 从完整的登记数据生成预约快照
    ///
    /// 登记数据不完整时返回 `None`。
    pub fn from_intake(
        patient_id: String,
        intake: &PatientIntake,
        booked_at: DateTime<Utc>,
    ) -> Option<Self> {
        let demographics = intake.demographics.as_ref()?;
        let doctor = intake.doctor.as_ref()?;
        let lab = intake.lab_selection.as_ref()?;
        let schedule = intake.schedule.as_ref()?;

        Some(Self {
            patient_id,
            name: demographics.name.clone(),
            age: demographics.age,
            gender: demographics.gender,
            blood_group: demographics.blood_group,
            mobile: demographics.mobile.clone(),
            email: demographics.email.clone(),
            date_of_birth: Some(demographics.date_of_birth),
            department: intake.department.clone()?,
            doctor_id: Some(doctor.id),
            doctor_name: doctor.name.clone(),
            doctor_room: doctor.room.clone(),
            doctor_experience: doctor.experience_years,
            symptoms: intake.symptoms.clone()?,
            lab_tests: lab.tests.clone(),
            lab_cost: lab.lab_cost,
            consultation_fee: schedule.consultation_fee,
            total_billing: schedule.total_billing,
            appointment_date: schedule.appointment_date,
            appointment_time: schedule.time_slot,
            patient_type: schedule.patient_type,
            booked_at: Some(booked_at),
        })
    }

    pub fn symptoms_joined(&self) -> String {
        comma_list::join(&self.symptoms)
    }

    pub fn lab_tests_joined(&self) -> String {
        comma_list::join(&self.lab_tests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        assert_eq!("ab+".parse::<BloodGroup>().unwrap(), BloodGroup::AbPositive);
        assert_eq!("New Patient".parse::<PatientType>().unwrap(), PatientType::NewPatient);
        assert_eq!(" 2:00 pm ".parse::<TimeSlot>().unwrap(), TimeSlot::TwoPm);
        assert!("Select".parse::<Gender>().is_err());
    }

    #[test]
    fn test_wire_labels() {
        let json = serde_json::to_string(&TimeSlot::TenAm).unwrap();
        assert_eq!(json, "\"10:00 AM\"");
        let group: BloodGroup = serde_json::from_str("\"O-\"").unwrap();
        assert_eq!(group, BloodGroup::ONegative);
    }

    #[test]
    fn test_incomplete_intake_yields_no_record() {
        let intake = PatientIntake::default();
        assert!(!intake.is_complete());
        assert!(AppointmentRecord::from_intake("P001".to_string(), &intake, Utc::now()).is_none());
    }

    #[test]
    fn test_record_uses_tabular_lists_on_the_wire() {
        let json = r#"{
            "patient_id": "P007",
            "name": "Amit Shah",
            "age": 41,
            "gender": "Male",
            "blood_group": "B+",
            "mobile": "9876543210",
            "email": "patient7@email.com",
            "department": "Cardiology",
            "doctor_name": "Dr. Ravi Kumar",
            "doctor_room": "201",
            "doctor_experience": 6,
            "symptoms": "chest pain, palpitations",
            "lab_tests": "None",
            "lab_cost": 0,
            "consultation_fee": 900,
            "total_billing": 900,
            "appointment_date": "2024-03-11",
            "appointment_time": "11:00 AM",
            "patient_type": "Existing Patient"
        }"#;

        let record: AppointmentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.symptoms, vec!["chest pain", "palpitations"]);
        assert!(record.lab_tests.is_empty());
        assert_eq!(record.lab_tests_joined(), "None");
        assert!(record.booked_at.is_none());

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["symptoms"], "chest pain, palpitations");
    }
}
