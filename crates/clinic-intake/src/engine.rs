//! 登记引擎
//!
//! 协调状态机、会话、目录和预约记录簿。每个界面事件对应一个转换函数，
//! 返回下一个状态与校验错误，与渲染解耦。

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use clinic_core::{AppointmentRecord, ClinicError, HospitalCatalog, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::forms::{
    validate_doctor_selection, validate_lab_tests, validate_patient_info, validate_schedule,
    validate_symptoms, DoctorSelectionForm, LabTestsForm, PatientInfoForm, ScheduleForm,
    StepErrors, SymptomsForm,
};
use crate::ledger::AppointmentLedger;
use crate::session::{IntakeSession, SessionView, StepOutcome};
use crate::state_machine::{IntakeStateMachine, WizardEvent, WizardStep};

/// 医生接诊量
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoctorWorkload {
    pub doctor_id: Uuid,
    pub name: String,
    pub room: String,
    pub patients: u32,
}

/// 会话空闲超过该时长后在下一次创建会话时被回收
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

/// 登记引擎
#[derive(Debug)]
pub struct IntakeEngine {
    state_machine: IntakeStateMachine,
    catalog: HospitalCatalog,
    ledger: AppointmentLedger,
    sessions: HashMap<Uuid, IntakeSession>,
    session_ttl: Duration,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl IntakeEngine {
    /// 创建新的登记引擎
    pub fn new(catalog: HospitalCatalog) -> Self {
        Self {
            state_machine: IntakeStateMachine::new(),
            catalog,
            ledger: AppointmentLedger::new(),
            sessions: HashMap::new(),
            session_ttl: Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
            today: local_today,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// 替换“今天”的来源，用于日期校验
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// 开始一个新的登记会话，顺带回收空闲过久的会话
    pub fn create_session(&mut self) -> Uuid {
        self.evict_idle_sessions(Utc::now());

        let session = IntakeSession::new();
        let id = session.id;
        self.sessions.insert(id, session);
        tracing::info!("Created intake session {}", id);
        id
    }

    /// 回收最后一次操作早于 `now - ttl` 的会话，返回回收数量
    pub fn evict_idle_sessions(&mut self, now: DateTime<Utc>) -> usize {
        let ttl = self.session_ttl;
        let before = self.sessions.len();
        self.sessions.retain(|_, session| now - session.updated_at <= ttl);

        let evicted = before - self.sessions.len();
        if evicted > 0 {
            tracing::info!("Evicted {} idle intake session(s)", evicted);
        }
        evicted
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// 结束会话，已确认的预约记录保留
    pub fn close_session(&mut self, session_id: Uuid) -> Result<()> {
        self.sessions
            .remove(&session_id)
            .map(|_| tracing::info!("Closed intake session {}", session_id))
            .ok_or_else(|| ClinicError::NotFound(format!("Intake session {}", session_id)))
    }

    pub fn session(&self, session_id: Uuid) -> Result<&IntakeSession> {
        self.sessions
            .get(&session_id)
            .ok_or_else(|| ClinicError::NotFound(format!("Intake session {}", session_id)))
    }

    pub fn session_view(&self, session_id: Uuid) -> Result<SessionView> {
        Ok(self
            .session(session_id)?
            .view(&self.catalog, &self.state_machine))
    }

    /// 第一步：患者信息
    pub fn submit_patient_info(
        &mut self,
        session_id: Uuid,
        form: &PatientInfoForm,
    ) -> Result<StepOutcome> {
        let next = self.check(session_id, WizardEvent::Submit(WizardStep::PatientInfo))?;
        let result = validate_patient_info(form, (self.today)());

        let session = self.session_mut(session_id)?;
        Ok(apply(session, next, result, |intake, demographics| {
            intake.demographics = Some(demographics);
        }))
    }

    /// 第二步：症状与科室
    ///
    /// 结果中附带按本次提交的症状推荐的科室，被拒绝时也一样。
    pub fn submit_symptoms(
        &mut self,
        session_id: Uuid,
        form: &SymptomsForm,
    ) -> Result<StepOutcome> {
        let next = self.check(session_id, WizardEvent::Submit(WizardStep::Symptoms))?;
        let result = validate_symptoms(form, &self.catalog.symptoms);
        if let Ok((_, department)) = &result {
            tracing::debug!("Session {} chose department {}", session_id, department);
        }
        let suggested = self.suggest_departments(&form.symptoms);

        let session = self.session_mut(session_id)?;
        let mut outcome = apply(session, next, result, |intake, (symptoms, department)| {
            intake.symptoms = Some(symptoms);
            intake.department = Some(department);
        });
        outcome.suggested_departments = suggested;
        Ok(outcome)
    }

    /// 第三步：选择医生
    pub fn select_doctor(
        &mut self,
        session_id: Uuid,
        form: &DoctorSelectionForm,
    ) -> Result<StepOutcome> {
        let next = self.check(session_id, WizardEvent::Submit(WizardStep::DoctorSelection))?;
        let department = self.stored_department(session_id)?;
        let result = validate_doctor_selection(form, &department, &self.catalog.departments);

        let session = self.session_mut(session_id)?;
        Ok(apply(session, next, result, |intake, doctor| {
            intake.doctor = Some(doctor);
        }))
    }

    /// 第四步：检验项目
    pub fn submit_lab_tests(
        &mut self,
        session_id: Uuid,
        form: &LabTestsForm,
    ) -> Result<StepOutcome> {
        let next = self.check(session_id, WizardEvent::Submit(WizardStep::LabTests))?;
        let result = validate_lab_tests(form, &self.catalog.lab_tests);

        let session = self.session_mut(session_id)?;
        Ok(apply(session, next, result, |intake, selection| {
            intake.lab_selection = Some(selection);
        }))
    }

    /// 第五步：确认预约
    ///
    /// 校验通过后计算总金额、医生接诊计数加一并追加一条预约记录。
    pub fn confirm_appointment(
        &mut self,
        session_id: Uuid,
        form: &ScheduleForm,
    ) -> Result<StepOutcome> {
        let next = self.check(session_id, WizardEvent::Submit(WizardStep::Scheduling))?;
        let today = (self.today)();

        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| ClinicError::NotFound(format!("Intake session {}", session_id)))?;

        let schedule = match validate_schedule(form, session.intake.lab_cost(), today) {
            Ok(schedule) => schedule,
            Err(errors) => {
                tracing::warn!("Session {} booking rejected: {:?}", session_id, errors);
                session.reject(errors);
                return Ok(StepOutcome::of(session, false));
            }
        };

        // 走到第五步意味着科室和医生都已校验过；解析失败说明目录被改动
        let (department, doctor) = match (&session.intake.department, &session.intake.doctor) {
            (Some(department), Some(doctor)) => (department.clone(), doctor.clone()),
            _ => {
                tracing::error!("Session {} reached scheduling without a doctor", session_id);
                return Err(ClinicError::Internal(format!(
                    "session {} has no department or doctor at scheduling",
                    session_id
                )));
            }
        };
        if self.catalog.departments.find_doctor(&department, doctor.id).is_none() {
            tracing::error!("Doctor {} no longer listed in {}", doctor.id, department);
            return Err(ClinicError::Internal(format!(
                "doctor {} is no longer listed in {}",
                doctor.id, department
            )));
        }

        let mut completed = session.intake.clone();
        completed.schedule = Some(schedule);

        let patient_id = self.ledger.append(&completed, Utc::now())?.patient_id.clone();
        let patients = self.catalog.departments.record_patient(&department, doctor.id)?;

        session.intake = completed;
        session.booked_patient_id = Some(patient_id.clone());
        session.move_to(next);

        tracing::info!(
            "Session {} booked {} with {} ({} patients)",
            session_id,
            patient_id,
            doctor.name,
            patients
        );
        Ok(StepOutcome::of(session, true))
    }

    /// 后退一步，不清空已填写的数据
    pub fn go_back(&mut self, session_id: Uuid) -> Result<StepOutcome> {
        let previous = self.check(session_id, WizardEvent::Back)?;
        let session = self.session_mut(session_id)?;
        session.move_to(previous);
        tracing::debug!("Session {} moved back to step {}", session_id, previous.number());
        Ok(StepOutcome::of(session, false))
    }

    /// 预约完成后重新开始，历史记录与接诊计数不受影响
    pub fn restart(&mut self, session_id: Uuid) -> Result<StepOutcome> {
        self.check(session_id, WizardEvent::Restart)?;
        let session = self.session_mut(session_id)?;
        session.reset();
        tracing::info!("Session {} restarted", session_id);
        Ok(StepOutcome::of(session, false))
    }

    /// 根据症状推荐科室
    pub fn suggest_departments(&self, symptoms: &[String]) -> Vec<String> {
        let departments = self.catalog.symptoms.suggest_departments(symptoms);
        tracing::debug!("Suggested {:?} for symptoms {:?}", departments, symptoms);
        departments
    }

    /// 某科室各医生的接诊量
    pub fn department_workload(&self, department: &str) -> Result<Vec<DoctorWorkload>> {
        let department = self
            .catalog
            .departments
            .department(department)
            .ok_or_else(|| ClinicError::NotFound(format!("Department {}", department)))?;

        Ok(department
            .doctors
            .iter()
            .map(|doctor| DoctorWorkload {
                doctor_id: doctor.id,
                name: doctor.name.clone(),
                room: doctor.room.clone(),
                patients: doctor.patient_count,
            })
            .collect())
    }

    pub fn total_appointments(&self) -> usize {
        self.ledger.len()
    }

    pub fn appointments(&self) -> &[AppointmentRecord] {
        self.ledger.records()
    }

    pub fn catalog(&self) -> &HospitalCatalog {
        &self.catalog
    }

    /// 校验事件在会话当前步骤下是否合法，返回目标步骤
    fn check(&self, session_id: Uuid, event: WizardEvent) -> Result<WizardStep> {
        let current = self.session(session_id)?.step;
        self.state_machine.transition(current, event)
    }

    fn session_mut(&mut self, session_id: Uuid) -> Result<&mut IntakeSession> {
        self.sessions
            .get_mut(&session_id)
            .ok_or_else(|| ClinicError::NotFound(format!("Intake session {}", session_id)))
    }

    fn stored_department(&self, session_id: Uuid) -> Result<String> {
        self.session(session_id)?
            .intake
            .department
            .clone()
            .ok_or_else(|| {
                tracing::error!(
                    "Session {} reached doctor selection without a department",
                    session_id
                );
                ClinicError::Internal(format!("session {} has no department", session_id))
            })
    }
}

impl Default for IntakeEngine {
    fn default() -> Self {
        Self::new(HospitalCatalog::standard())
    }
}

/// 根据校验结果写入数据并前进，或记录错误并停留
fn apply<T>(
    session: &mut IntakeSession,
    next: WizardStep,
    result: std::result::Result<T, StepErrors>,
    store: impl FnOnce(&mut clinic_core::PatientIntake, T),
) -> StepOutcome {
    match result {
        Ok(value) => {
            store(&mut session.intake, value);
            session.move_to(next);
            tracing::info!("Session {} advanced to step {}", session.id, next.number());
            StepOutcome::of(session, true)
        }
        Err(errors) => {
            tracing::warn!(
                "Session {} stays at step {}: {} error(s)",
                session.id,
                session.step.number(),
                errors.len()
            );
            session.reject(errors);
            StepOutcome::of(session, false)
        }
    }
}
