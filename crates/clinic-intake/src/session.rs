//! 登记会话
//!
//! 每个用户会话独立持有当前步骤与已填写的数据，生命周期与会话绑定。

use chrono::{DateTime, NaiveDate, Utc};
use clinic_core::catalog::LabTest;
use clinic_core::{
    Demographics, Doctor, DoctorRef, HospitalCatalog, PatientIntake, PatientType, TimeSlot,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state_machine::{IntakeStateMachine, WizardEvent, WizardStep};

/// 单个登记会话
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeSession {
    pub id: Uuid,
    pub step: WizardStep,
    pub intake: PatientIntake,
    /// 最近一次提交的校验错误
    pub errors: Vec<String>,
    /// 确认后分配的患者编号
    pub booked_patient_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IntakeSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            step: WizardStep::PatientInfo,
            intake: PatientIntake::default(),
            errors: Vec::new(),
            booked_patient_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn move_to(&mut self, step: WizardStep) {
        self.step = step;
        self.errors.clear();
        self.updated_at = Utc::now();
    }

    pub(crate) fn reject(&mut self, errors: Vec<String>) {
        self.errors = errors;
        self.updated_at = Utc::now();
    }

    /// 清空登记数据并回到第一步
    pub(crate) fn reset(&mut self) {
        self.intake = PatientIntake::default();
        self.booked_patient_id = None;
        self.move_to(WizardStep::PatientInfo);
    }

    /// 生成渲染所需的视图
    pub fn view(
        &self,
        catalog: &HospitalCatalog,
        state_machine: &IntakeStateMachine,
    ) -> SessionView {
        let suggested_departments = self
            .intake
            .symptoms
            .as_deref()
            .map(|symptoms| catalog.symptoms.suggest_departments(symptoms))
            .unwrap_or_default();

        let doctors = self
            .intake
            .department
            .as_deref()
            .and_then(|name| catalog.departments.department(name))
            .map(|department| department.doctors.clone())
            .unwrap_or_default();

        let summary = if self.step == WizardStep::Confirmation {
            ConfirmationSummary::build(self, catalog)
        } else {
            None
        };

        SessionView {
            session_id: self.id,
            step: self.step,
            step_number: self.step.number(),
            step_title: self.step.title().to_string(),
            intake: self.intake.clone(),
            errors: self.errors.clone(),
            available_events: state_machine.get_possible_events(self.step),
            suggested_departments,
            doctors,
            lab_cost: self.intake.lab_cost(),
            summary,
        }
    }
}

impl Default for IntakeSession {
    fn default() -> Self {
        Self::new()
    }
}

/// 会话视图：字段回显、错误列表、推荐科室和确认摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub step_number: u8,
    pub step_title: String,
    pub intake: PatientIntake,
    pub errors: Vec<String>,
    /// 当前步骤下合法的向导事件
    pub available_events: Vec<WizardEvent>,
    pub suggested_departments: Vec<String>,
    pub doctors: Vec<Doctor>,
    pub lab_cost: f64,
    pub summary: Option<ConfirmationSummary>,
}

/// 预约确认摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationSummary {
    pub patient_id: String,
    pub patient: Demographics,
    pub patient_type: PatientType,
    pub department: String,
    pub doctor: DoctorRef,
    pub appointment_date: NaiveDate,
    pub time_slot: TimeSlot,
    pub symptoms: Vec<String>,
    pub lab_tests: Vec<LabTest>,
    pub consultation_fee: f64,
    pub lab_cost: f64,
    pub total_billing: f64,
}

impl ConfirmationSummary {
    fn build(session: &IntakeSession, catalog: &HospitalCatalog) -> Option<Self> {
        let intake = &session.intake;
        let schedule = intake.schedule.as_ref()?;
        let lab = intake.lab_selection.as_ref()?;

        let lab_tests = lab
            .tests
            .iter()
            .filter_map(|name| catalog.lab_tests.find(name).cloned())
            .collect();

        Some(Self {
            patient_id: session.booked_patient_id.clone()?,
            patient: intake.demographics.clone()?,
            patient_type: schedule.patient_type,
            department: intake.department.clone()?,
            doctor: intake.doctor.clone()?,
            appointment_date: schedule.appointment_date,
            time_slot: schedule.time_slot,
            symptoms: intake.symptoms.clone()?,
            lab_tests,
            consultation_fee: schedule.consultation_fee,
            lab_cost: lab.lab_cost,
            total_billing: schedule.total_billing,
        })
    }
}

/// 单步操作结果：下一个状态及校验错误
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepOutcome {
    pub session_id: Uuid,
    pub step: WizardStep,
    pub advanced: bool,
    pub errors: Vec<String>,
    /// 第二步按提交的症状推荐的科室
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_departments: Vec<String>,
}

impl StepOutcome {
    pub(crate) fn of(session: &IntakeSession, advanced: bool) -> Self {
        Self {
            session_id: session.id,
            step: session.step,
            advanced,
            errors: session.errors.clone(),
            suggested_departments: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
