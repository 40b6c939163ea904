//! 登记向导状态机
//!
//! 六个线性步骤。只有提交并通过校验才能前进，后退一次一步且不清空已填数据。

use clinic_core::{ClinicError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 向导步骤
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    PatientInfo,     // 1 患者信息
    Symptoms,        // 2 症状与科室
    DoctorSelection, // 3 选择医生
    LabTests,        // 4 检验项目
    Scheduling,      // 5 时段与计费
    Confirmation,    // 6 预约确认
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::PatientInfo,
        WizardStep::Symptoms,
        WizardStep::DoctorSelection,
        WizardStep::LabTests,
        WizardStep::Scheduling,
        WizardStep::Confirmation,
    ];

    /// 步骤序号，从1开始
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::PatientInfo => 1,
            WizardStep::Symptoms => 2,
            WizardStep::DoctorSelection => 3,
            WizardStep::LabTests => 4,
            WizardStep::Scheduling => 5,
            WizardStep::Confirmation => 6,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|step| step.number() == number)
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::PatientInfo => "Patient Information",
            WizardStep::Symptoms => "Symptoms",
            WizardStep::DoctorSelection => "Select Doctor",
            WizardStep::LabTests => "Select Lab Tests",
            WizardStep::Scheduling => "Select Time Slot & Additional Details",
            WizardStep::Confirmation => "Appointment Confirmed",
        }
    }
}

/// 向导事件
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WizardEvent {
    /// 提交某一步的表单
    Submit(WizardStep),
    Back,
    Restart,
}

/// 向导状态机
#[derive(Debug)]
pub struct IntakeStateMachine {
    transitions: HashMap<(WizardStep, WizardEvent), WizardStep>,
}

impl IntakeStateMachine {
    /// 创建新的状态机实例
    pub fn new() -> Self {
        let mut transitions = HashMap::new();

        for from in WizardStep::ALL {
            if from == WizardStep::Confirmation {
                // 预约确认后只能重新开始
                transitions.insert((from, WizardEvent::Restart), WizardStep::PatientInfo);
                continue;
            }

            // 当前步骤及之前的表单都可以（重新）提交，成功后进入该表单的下一步
            for form in WizardStep::ALL.iter().copied().filter(|form| *form <= from) {
                if let Some(to) = form.next() {
                    transitions.insert((from, WizardEvent::Submit(form)), to);
                }
            }

            if let Some(to) = from.previous() {
                transitions.insert((from, WizardEvent::Back), to);
            }
        }

        Self { transitions }
    }

    /// 检查状态转换是否有效
    pub fn can_transition(&self, from: WizardStep, event: WizardEvent) -> bool {
        self.transitions.contains_key(&(from, event))
    }

    /// 执行状态转换
    pub fn transition(&self, from: WizardStep, event: WizardEvent) -> Result<WizardStep> {
        self.transitions
            .get(&(from, event))
            .copied()
            .ok_or_else(|| ClinicError::InvalidStateTransition {
                from: format!("{:?}", from),
                event: format!("{:?}", event),
            })
    }

    /// 获取某一步骤下的所有合法事件
    pub fn get_possible_events(&self, current: WizardStep) -> Vec<WizardEvent> {
        let mut events: Vec<WizardEvent> = self
            .transitions
            .keys()
            .filter(|(state, _)| *state == current)
            .map(|(_, event)| *event)
            .collect();
        events.sort_by_key(|event| match event {
            WizardEvent::Submit(step) => step.number(),
            WizardEvent::Back => 10,
            WizardEvent::Restart => 11,
        });
        events
    }
}

impl Default for IntakeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbering() {
        assert_eq!(WizardStep::PatientInfo.number(), 1);
        assert_eq!(WizardStep::Confirmation.number(), 6);
        assert_eq!(WizardStep::from_number(3), Some(WizardStep::DoctorSelection));
        assert_eq!(WizardStep::from_number(7), None);
        assert_eq!(WizardStep::PatientInfo.previous(), None);
        assert_eq!(WizardStep::Confirmation.next(), None);
    }

    #[test]
    fn test_forward_only_through_current_form() {
        let sm = IntakeStateMachine::new();

        assert_eq!(
            sm.transition(WizardStep::PatientInfo, WizardEvent::Submit(WizardStep::PatientInfo))
                .unwrap(),
            WizardStep::Symptoms
        );
        // 不能跳过尚未到达的步骤
        assert!(!sm.can_transition(
            WizardStep::PatientInfo,
            WizardEvent::Submit(WizardStep::Symptoms)
        ));
        assert!(!sm.can_transition(
            WizardStep::LabTests,
            WizardEvent::Submit(WizardStep::Scheduling)
        ));
    }

    #[test]
    fn test_resubmitting_earlier_form() {
        let sm = IntakeStateMachine::new();
        let to = sm
            .transition(WizardStep::LabTests, WizardEvent::Submit(WizardStep::Symptoms))
            .unwrap();
        assert_eq!(to, WizardStep::DoctorSelection);
    }

    #[test]
    fn test_back_and_restart() {
        let sm = IntakeStateMachine::new();

        assert!(!sm.can_transition(WizardStep::PatientInfo, WizardEvent::Back));
        assert_eq!(
            sm.transition(WizardStep::Scheduling, WizardEvent::Back).unwrap(),
            WizardStep::LabTests
        );
        assert!(!sm.can_transition(WizardStep::Confirmation, WizardEvent::Back));
        assert!(!sm.can_transition(WizardStep::LabTests, WizardEvent::Restart));
        assert_eq!(
            sm.transition(WizardStep::Confirmation, WizardEvent::Restart).unwrap(),
            WizardStep::PatientInfo
        );
    }

    #[test]
    fn test_confirmation_is_locked() {
        let sm = IntakeStateMachine::new();
        assert_eq!(
            sm.get_possible_events(WizardStep::Confirmation),
            vec![WizardEvent::Restart]
        );

        let result = sm.transition(
            WizardStep::Confirmation,
            WizardEvent::Submit(WizardStep::Scheduling),
        );
        assert!(matches!(result, Err(ClinicError::InvalidStateTransition { .. })));
    }

    #[test]
    fn test_possible_events_at_scheduling() {
        let sm = IntakeStateMachine::new();
        let events = sm.get_possible_events(WizardStep::Scheduling);
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], WizardEvent::Submit(WizardStep::PatientInfo));
        assert_eq!(events[4], WizardEvent::Submit(WizardStep::Scheduling));
        assert_eq!(events[5], WizardEvent::Back);
    }
}
