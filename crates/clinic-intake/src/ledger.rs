//! 预约记录簿
//!
//! 只追加，不修改、不删除。

use chrono::{DateTime, Utc};
use clinic_core::utils::patient_id;
use clinic_core::{AppointmentRecord, ClinicError, PatientIntake, Result};

/// 已确认预约的有序序列
#[derive(Debug, Default)]
pub struct AppointmentLedger {
    records: Vec<AppointmentRecord>,
}

impl AppointmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为完整的登记数据生成快照并追加，返回新记录
    pub fn append(
        &mut self,
        intake: &PatientIntake,
        booked_at: DateTime<Utc>,
    ) -> Result<&AppointmentRecord> {
        let id = patient_id(self.records.len() + 1);
        let record = AppointmentRecord::from_intake(id, intake, booked_at).ok_or_else(|| {
            ClinicError::Internal("cannot book an incomplete patient intake".to_string())
        })?;

        tracing::info!(
            "Appended appointment {} for {} with {}",
            record.patient_id,
            record.name,
            record.doctor_name
        );
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn records(&self) -> &[AppointmentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
