//! 向导各步骤的表单及校验
//!
//! 每个校验函数一次性返回该步骤的全部错误信息，校验通过时返回可直接存入登记数据的值。

use chrono::NaiveDate;
use clinic_core::utils::normalize_label;
use clinic_core::validation::{
    validate_age, validate_appointment_date, validate_billing, validate_date_of_birth,
    validate_email, validate_mobile, validate_name,
};
use clinic_core::{
    BloodGroup, Demographics, DepartmentCatalog, DoctorRef, Gender, LabSelection, LabTestCatalog,
    PatientType, ScheduleDetails, SymptomDepartmentMap, TimeSlot,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// 校验失败时的错误列表
pub type StepErrors = Vec<String>;

/// 下拉框的占位选项，等同于未选择
pub const PLACEHOLDER: &str = "Select";

/// 第一步表单
///
/// 下拉框字段保存原始标签，缺省、空串或占位选项都视为未选择。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientInfoForm {
    pub name: String,
    pub age: i64,
    #[serde(default)]
    pub blood_group: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    pub mobile: String,
    pub email: String,
    pub date_of_birth: NaiveDate,
}

/// 第二步表单
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymptomsForm {
    pub symptoms: Vec<String>,
    pub department: Option<String>,
}

/// 第三步表单
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctorSelectionForm {
    pub doctor_id: Option<Uuid>,
}

/// 第四步表单，检验项目可以为空
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabTestsForm {
    pub tests: Vec<String>,
}

/// 第五步表单
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleForm {
    #[serde(default)]
    pub time_slot: Option<String>,
    pub appointment_date: NaiveDate,
    #[serde(default)]
    pub patient_type: Option<String>,
    pub consultation_fee: f64,
}

/// 解析下拉框取值，未选择或未知标签时记录错误
fn choice<T: FromStr>(
    raw: Option<&str>,
    field: &str,
    missing: &str,
    errors: &mut StepErrors,
) -> Option<T> {
    match raw.map(str::trim) {
        None | Some("") => {
            errors.push(missing.to_string());
            None
        }
        Some(label) if label.eq_ignore_ascii_case(PLACEHOLDER) => {
            errors.push(missing.to_string());
            None
        }
        Some(label) => match label.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(format!("Unknown {}: {}", field, label));
                None
            }
        },
    }
}

pub fn validate_patient_info(
    form: &PatientInfoForm,
    today: NaiveDate,
) -> Result<Demographics, StepErrors> {
    let mut errors = Vec::new();

    if let Err(msg) = validate_name(&form.name) {
        errors.push(format!("Name: {}", msg));
    }
    if let Err(msg) = validate_age(form.age) {
        errors.push(format!("Age: {}", msg));
    }
    let blood_group: Option<BloodGroup> = choice(
        form.blood_group.as_deref(),
        "blood group",
        "Please select a blood group",
        &mut errors,
    );
    let gender: Option<Gender> = choice(
        form.gender.as_deref(),
        "gender",
        "Please select a gender",
        &mut errors,
    );
    if let Err(msg) = validate_mobile(&form.mobile) {
        errors.push(format!("Mobile: {}", msg));
    }
    if let Err(msg) = validate_email(&form.email) {
        errors.push(format!("Email: {}", msg));
    }
    if let Err(msg) = validate_date_of_birth(form.date_of_birth, today) {
        errors.push(format!("Date of Birth: {}", msg));
    }

    match (blood_group, gender, u32::try_from(form.age)) {
        (Some(blood_group), Some(gender), Ok(age)) if errors.is_empty() => Ok(Demographics {
            name: form.name.trim().to_string(),
            age,
            blood_group,
            gender,
            mobile: form.mobile.trim().to_string(),
            email: form.email.clone(),
            date_of_birth: form.date_of_birth,
        }),
        _ => Err(errors),
    }
}

/// 校验症状与科室，返回归一化后的症状列表和所选科室
pub fn validate_symptoms(
    form: &SymptomsForm,
    symptom_map: &SymptomDepartmentMap,
) -> Result<(Vec<String>, String), StepErrors> {
    let mut errors = Vec::new();
    let mut symptoms: Vec<String> = Vec::new();

    for raw in &form.symptoms {
        let symptom = normalize_label(raw);
        if symptom_map.department_for(&symptom).is_none() {
            errors.push(format!("Unknown symptom: {}", raw.trim()));
        } else if !symptoms.contains(&symptom) {
            symptoms.push(symptom);
        }
    }

    if form.symptoms.is_empty() {
        errors.push("Please select at least one symptom".to_string());
    }

    let suggested = symptom_map.suggest_departments(symptoms.as_slice());
    let department = match form.department.as_deref().map(str::trim) {
        None | Some("") => {
            errors.push("Please select a department".to_string());
            None
        }
        Some(department) => match suggested.iter().find(|d| d.eq_ignore_ascii_case(department)) {
            Some(found) => Some(found.clone()),
            None => {
                errors.push(format!(
                    "Department {} is not among the suggested departments",
                    department
                ));
                None
            }
        },
    };

    match department {
        Some(department) if errors.is_empty() => Ok((symptoms, department)),
        _ => Err(errors),
    }
}

pub fn validate_doctor_selection(
    form: &DoctorSelectionForm,
    department: &str,
    catalog: &DepartmentCatalog,
) -> Result<DoctorRef, StepErrors> {
    let Some(doctor_id) = form.doctor_id else {
        return Err(vec!["Please select a doctor".to_string()]);
    };

    catalog
        .find_doctor(department, doctor_id)
        .map(DoctorRef::from)
        .ok_or_else(|| vec![format!("Selected doctor is not available in {}", department)])
}

/// 校验检验项目并计算费用，重复项只计一次
pub fn validate_lab_tests(
    form: &LabTestsForm,
    lab_tests: &LabTestCatalog,
) -> Result<LabSelection, StepErrors> {
    let mut errors = Vec::new();
    let mut tests: Vec<String> = Vec::new();

    for raw in &form.tests {
        match lab_tests.find(raw) {
            Some(test) if !tests.contains(&test.name) => tests.push(test.name.clone()),
            Some(_) => {}
            None => errors.push(format!("Unknown lab test: {}", raw.trim())),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let lab_cost = lab_tests
        .total_cost(&tests)
        .map_err(|e| vec![e.to_string()])?;
    Ok(LabSelection {
        tests,
        lab_cost: f64::from(lab_cost),
    })
}

/// 校验时段与计费，通过时计算总金额 = 诊费 + 检验费
pub fn validate_schedule(
    form: &ScheduleForm,
    lab_cost: f64,
    today: NaiveDate,
) -> Result<ScheduleDetails, StepErrors> {
    let mut errors = Vec::new();

    let time_slot: Option<TimeSlot> = choice(
        form.time_slot.as_deref(),
        "time slot",
        "Please select a time slot",
        &mut errors,
    );
    let patient_type: Option<PatientType> = choice(
        form.patient_type.as_deref(),
        "patient type",
        "Please select patient type",
        &mut errors,
    );
    if let Err(msg) = validate_billing(form.consultation_fee) {
        errors.push(format!("Consultation Fee: {}", msg));
    }
    if let Err(msg) = validate_appointment_date(form.appointment_date, today) {
        errors.push(format!("Appointment Date: {}", msg));
    }

    match (time_slot, patient_type) {
        (Some(time_slot), Some(patient_type)) if errors.is_empty() => Ok(ScheduleDetails {
            time_slot,
            appointment_date: form.appointment_date,
            patient_type,
            consultation_fee: form.consultation_fee,
            total_billing: form.consultation_fee + lab_cost,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn patient_form() -> PatientInfoForm {
        PatientInfoForm {
            name: "Asha Rao".to_string(),
            age: 34,
            blood_group: Some("O+".to_string()),
            gender: Some("Female".to_string()),
            mobile: "98765-43210".to_string(),
            email: "asha@example.com".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 2, 14).unwrap(),
        }
    }

    #[test]
    fn test_patient_info_accepts_valid_form() {
        let demographics = validate_patient_info(&patient_form(), today()).unwrap();
        assert_eq!(demographics.age, 34);
        assert_eq!(demographics.blood_group, BloodGroup::OPositive);
    }

    #[test]
    fn test_patient_info_reports_every_error() {
        let form = PatientInfoForm {
            name: "".to_string(),
            age: 0,
            blood_group: None,
            gender: None,
            mobile: "12345".to_string(),
            email: "not-an-email".to_string(),
            ..patient_form()
        };

        let errors = validate_patient_info(&form, today()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Name: Name cannot be empty",
                "Age: Age must be between 1 and 120",
                "Please select a blood group",
                "Please select a gender",
                "Mobile: Mobile number must be exactly 10 digits",
                "Email: Please enter a valid email address",
            ]
        );
    }

    #[test]
    fn test_dropdown_placeholder_counts_as_unselected() {
        let form = PatientInfoForm {
            blood_group: Some(PLACEHOLDER.to_string()),
            gender: Some("".to_string()),
            ..patient_form()
        };
        assert_eq!(
            validate_patient_info(&form, today()).unwrap_err(),
            vec!["Please select a blood group", "Please select a gender"]
        );

        let form = PatientInfoForm {
            blood_group: Some("Z+".to_string()),
            gender: Some(" female ".to_string()),
            ..patient_form()
        };
        assert_eq!(
            validate_patient_info(&form, today()).unwrap_err(),
            vec!["Unknown blood group: Z+"]
        );
    }

    #[test]
    fn test_symptoms_require_department_from_suggestions() {
        let map = SymptomDepartmentMap::standard();

        let form = SymptomsForm {
            symptoms: vec!["Chest Pain".to_string(), "headache".to_string()],
            department: Some("Neurology".to_string()),
        };
        let (symptoms, department) = validate_symptoms(&form, &map).unwrap();
        assert_eq!(symptoms, vec!["chest pain", "headache"]);
        assert_eq!(department, "Neurology");

        let form = SymptomsForm {
            symptoms: vec!["fever".to_string()],
            department: Some("Cardiology".to_string()),
        };
        let errors = validate_symptoms(&form, &map).unwrap_err();
        assert_eq!(
            errors,
            vec!["Department Cardiology is not among the suggested departments"]
        );
    }

    #[test]
    fn test_symptoms_empty_selection() {
        let map = SymptomDepartmentMap::standard();
        let errors = validate_symptoms(&SymptomsForm::default(), &map).unwrap_err();
        assert_eq!(
            errors,
            vec!["Please select at least one symptom", "Please select a department"]
        );
    }

    #[test]
    fn test_lab_tests_cost() {
        let catalog = LabTestCatalog::standard();
        let form = LabTestsForm {
            tests: vec!["X-ray".to_string(), "CBC".to_string(), "x-ray".to_string()],
        };
        let selection = validate_lab_tests(&form, &catalog).unwrap();
        assert_eq!(selection.tests, vec!["X-ray", "CBC"]);
        assert_eq!(selection.lab_cost, 1200.0);

        let none = validate_lab_tests(&LabTestsForm::default(), &catalog).unwrap();
        assert!(none.tests.is_empty());
        assert_eq!(none.lab_cost, 0.0);
    }

    #[test]
    fn test_schedule_total_and_errors() {
        let form = ScheduleForm {
            time_slot: Some("2:00 PM".to_string()),
            appointment_date: today(),
            patient_type: Some("New Patient".to_string()),
            consultation_fee: 500.0,
        };
        let schedule = validate_schedule(&form, 1200.0, today()).unwrap();
        assert_eq!(schedule.total_billing, 1700.0);

        let form = ScheduleForm {
            time_slot: Some("select".to_string()),
            patient_type: None,
            consultation_fee: 0.0,
            ..form
        };
        let errors = validate_schedule(&form, 0.0, today()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "Please select a time slot",
                "Please select patient type",
                "Consultation Fee: Billing amount must be greater than 0",
            ]
        );
    }

    #[test]
    fn test_doctor_selection() {
        let catalog = DepartmentCatalog::standard();
        let doctor = &catalog.department("Radiology").unwrap().doctors[1];

        let form = DoctorSelectionForm {
            doctor_id: Some(doctor.id),
        };
        assert_eq!(
            validate_doctor_selection(&form, "Radiology", &catalog).unwrap().name,
            "Dr. Anjali Patel"
        );
        assert!(validate_doctor_selection(&form, "Neurology", &catalog).is_err());
        assert_eq!(
            validate_doctor_selection(&DoctorSelectionForm::default(), "Radiology", &catalog)
                .unwrap_err(),
            vec!["Please select a doctor"]
        );
    }
}
