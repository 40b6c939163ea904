//! 静态目录
//!
//! 检验项目价目表、科室医生名录以及症状到科室的映射。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ClinicError, Result};
use crate::models::{Department, Doctor};
use crate::utils::{doctor_id, normalize_label};

/// 检验项目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabTest {
    pub name: String,
    pub price: u32,
}

/// 检验项目价目表，只读
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabTestCatalog {
    tests: Vec<LabTest>,
}

impl LabTestCatalog {
    pub fn new(tests: Vec<LabTest>) -> Self {
        Self { tests }
    }

    pub fn standard() -> Self {
        let tests = [
            ("X-ray", 1000),
            ("MRI", 12000),
            ("CT Scan", 10000),
            ("LFT", 800),
            ("RFT", 700),
            ("CBC", 200),
        ]
        .into_iter()
        .map(|(name, price)| LabTest {
            name: name.to_string(),
            price,
        })
        .collect();

        Self::new(tests)
    }

    pub fn tests(&self) -> &[LabTest] {
        &self.tests
    }

    /// 查找检验项目（忽略大小写）
    pub fn find(&self, name: &str) -> Option<&LabTest> {
        let wanted = normalize_label(name);
        self.tests.iter().find(|t| normalize_label(&t.name) == wanted)
    }

    pub fn price(&self, name: &str) -> Option<u32> {
        self.find(name).map(|t| t.price)
    }

    /// 计算一组检验项目的总费用
    pub fn total_cost<S: AsRef<str>>(&self, names: &[S]) -> Result<u32> {
        names.iter().try_fold(0u32, |acc, name| {
            self.price(name.as_ref())
                .map(|price| acc + price)
                .ok_or_else(|| ClinicError::NotFound(format!("Lab test {}", name.as_ref())))
        })
    }
}

/// 症状到科室的多对一映射，按录入顺序保存
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomDepartmentMap {
    entries: Vec<(String, String)>,
}

impl SymptomDepartmentMap {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(symptom, department)| (normalize_label(&symptom), department))
            .collect();
        Self { entries }
    }

    pub fn standard() -> Self {
        let entries = [
            ("fever", "General Medicine"),
            ("cough", "General Medicine"),
            ("cold", "General Medicine"),
            ("vomiting", "General Medicine"),
            ("chest pain", "Cardiology"),
            ("heart pain", "Cardiology"),
            ("palpitations", "Cardiology"),
            ("headache", "Neurology"),
            ("migraine", "Neurology"),
            ("dizziness", "Neurology"),
            ("child fever", "Pediatrician"),
            ("vaccination", "Pediatrician"),
            ("kidney pain", "Nephrologist"),
            ("urinary issues", "Nephrologist"),
            ("x-ray", "Radiology"),
            ("scan", "Radiology"),
        ]
        .into_iter()
        .map(|(s, d)| (s.to_string(), d.to_string()))
        .collect();

        Self::new(entries)
    }

    /// 所有可选症状
    pub fn symptoms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn department_for(&self, symptom: &str) -> Option<&str> {
        let wanted = normalize_label(symptom);
        self.entries
            .iter()
            .find(|(s, _)| *s == wanted)
            .map(|(_, d)| d.as_str())
    }

    /// 根据所选症状推荐科室
    ///
    /// 结果去重，并按症状的选择顺序排列；未知症状被忽略。
    pub fn suggest_departments<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<String> {
        let mut suggested: Vec<String> = Vec::new();
        for symptom in symptoms {
            if let Some(department) = self.department_for(symptom.as_ref()) {
                if !suggested.iter().any(|d| d == department) {
                    suggested.push(department.to_string());
                }
            }
        }
        suggested
    }
}

/// 科室与医生名录
///
/// 名录本身只读，唯一可变的是医生的接诊计数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCatalog {
    departments: Vec<Department>,
}

impl DepartmentCatalog {
    pub fn new(departments: Vec<Department>) -> Self {
        Self { departments }
    }

    pub fn standard() -> Self {
        let roster: [(&str, [(&str, &str, u32); 3]); 6] = [
            (
                "General Medicine",
                [
                    ("Dr. Meera Shah", "101", 5),
                    ("Dr. Raj Patel", "102", 7),
                    ("Dr. Neha Sharma", "103", 3),
                ],
            ),
            (
                "Cardiology",
                [
                    ("Dr. Ravi Kumar", "201", 6),
                    ("Dr. Priya Gupta", "202", 4),
                    ("Dr. Anjali Singh", "203", 2),
                ],
            ),
            (
                "Neurology",
                [
                    ("Dr. Sanjay Verma", "301", 8),
                    ("Dr. Anjali Sharma", "302", 5),
                    ("Dr. Ravi Patel", "303", 3),
                ],
            ),
            (
                "Pediatrician",
                [
                    ("Dr. Neha Gupta", "401", 4),
                    ("Dr. Sanjay Singh", "402", 6),
                    ("Dr. Priya Patel", "403", 2),
                ],
            ),
            (
                "Nephrologist",
                [
                    ("Dr. Ravi Sharma", "501", 7),
                    ("Dr. Neha Patel", "502", 5),
                    ("Dr. Sanjay Gupta", "503", 3),
                ],
            ),
            (
                "Radiology",
                [
                    ("Dr. Priya Singh", "601", 6),
                    ("Dr. Anjali Patel", "602", 4),
                    ("Dr. Ravi Gupta", "603", 2),
                ],
            ),
        ];

        let departments = roster
            .into_iter()
            .map(|(department, doctors)| Department {
                name: department.to_string(),
                doctors: doctors
                    .into_iter()
                    .map(|(name, room, experience_years)| Doctor {
                        id: doctor_id(department, name),
                        name: name.to_string(),
                        room: room.to_string(),
                        experience_years,
                        patient_count: 0,
                    })
                    .collect(),
            })
            .collect();

        Self::new(departments)
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn department(&self, name: &str) -> Option<&Department> {
        self.departments.iter().find(|d| d.name == name)
    }

    pub fn doctor_count(&self) -> usize {
        self.departments.iter().map(|d| d.doctors.len()).sum()
    }

    /// 在指定科室内按标识查找医生
    pub fn find_doctor(&self, department: &str, doctor_id: Uuid) -> Option<&Doctor> {
        self.department(department)?
            .doctors
            .iter()
            .find(|doctor| doctor.id == doctor_id)
    }

    /// 医生接诊计数加一，返回新的计数
    pub fn record_patient(&mut self, department: &str, doctor_id: Uuid) -> Result<u32> {
        let doctor = self
            .departments
            .iter_mut()
            .find(|d| d.name == department)
            .and_then(|d| d.doctors.iter_mut().find(|doctor| doctor.id == doctor_id))
            .ok_or_else(|| {
                ClinicError::NotFound(format!("Doctor {} in department {}", doctor_id, department))
            })?;

        doctor.patient_count += 1;
        tracing::debug!("Doctor {} now has {} patients", doctor.name, doctor.patient_count);
        Ok(doctor.patient_count)
    }
}

/// 门诊全部静态目录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HospitalCatalog {
    pub lab_tests: LabTestCatalog,
    pub symptoms: SymptomDepartmentMap,
    pub departments: DepartmentCatalog,
}

impl HospitalCatalog {
    pub fn standard() -> Self {
        Self {
            lab_tests: LabTestCatalog::standard(),
            symptoms: SymptomDepartmentMap::standard(),
            departments: DepartmentCatalog::standard(),
        }
    }
}

impl Default for HospitalCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lab_cost() {
        let catalog = LabTestCatalog::standard();
        assert_eq!(catalog.total_cost(&["X-ray", "CBC"]).unwrap(), 1200);
        assert_eq!(catalog.total_cost::<&str>(&[]).unwrap(), 0);
        assert_eq!(catalog.price("ct scan"), Some(10000));
        assert!(catalog.total_cost(&["PET"]).is_err());
    }

    #[test]
    fn test_department_suggestions() {
        let map = SymptomDepartmentMap::standard();
        assert_eq!(
            map.suggest_departments(&["chest pain", "headache"]),
            vec!["Cardiology", "Neurology"]
        );
        assert_eq!(
            map.suggest_departments(&["Fever", "cough", "vomiting"]),
            vec!["General Medicine"]
        );
        assert!(map.suggest_departments(&["sneezing"]).is_empty());
        assert_eq!(map.department_for("  X-Ray "), Some("Radiology"));
    }

    #[test]
    fn test_standard_roster() {
        let catalog = DepartmentCatalog::standard();
        assert_eq!(catalog.departments().len(), 6);
        assert_eq!(catalog.doctor_count(), 18);

        let cardiology = catalog.department("Cardiology").unwrap();
        assert_eq!(cardiology.doctors[0].name, "Dr. Ravi Kumar");
        assert_eq!(cardiology.doctors[0].room, "201");
    }

    #[test]
    fn test_record_patient_by_id() {
        let mut catalog = DepartmentCatalog::standard();
        let id = doctor_id("Neurology", "Dr. Anjali Sharma");

        assert_eq!(catalog.record_patient("Neurology", id).unwrap(), 1);
        assert_eq!(catalog.record_patient("Neurology", id).unwrap(), 2);
        assert_eq!(catalog.find_doctor("Neurology", id).unwrap().patient_count, 2);

        // 同一医生不属于其他科室
        assert!(catalog.record_patient("Cardiology", id).is_err());
        assert!(catalog.find_doctor("Cardiology", id).is_none());
    }
}
