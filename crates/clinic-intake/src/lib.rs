//! # 门诊登记模块
//!
//! 提供多步骤预约登记向导：
//! - 向导状态机：六个线性步骤的合法转换
//! - 表单校验：每一步一次性给出全部错误
//! - 登记会话：按会话隔离的步骤与数据
//! - 预约记录簿：只追加的预约历史

pub mod engine;
pub mod forms;
pub mod ledger;
pub mod session;
pub mod state_machine;

// 重新导出主要类型
pub use engine::{DoctorWorkload, IntakeEngine, DEFAULT_SESSION_TTL_MINUTES};
pub use forms::{
    DoctorSelectionForm, LabTestsForm, PatientInfoForm, ScheduleForm, StepErrors, SymptomsForm,
    PLACEHOLDER,
};
pub use ledger::AppointmentLedger;
pub use session::{ConfirmationSummary, IntakeSession, SessionView, StepOutcome};
pub use state_machine::{IntakeStateMachine, WizardEvent, WizardStep};
